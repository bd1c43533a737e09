//! The catalog controller: one per product family.
//!
//! Owns the snapshot and the query state, and is the only writer of
//! either. Refreshes are tagged with a monotonically increasing sequence
//! number; an outcome is applied only if it belongs to the most recently
//! issued refresh, so a slow, superseded fetch can never overwrite a newer
//! snapshot. Recomputing the view is synchronous and cannot fail.
//!
//! ```text
//! Idle --refresh--> Loading --ok--> Ready
//!                      |   \--err--> Error --refresh--> Loading
//!                      \-- (snapshot kept while Loading: stale-while-revalidate)
//! ```

use shrine_catalog::{AssetResolver, select};
use shrine_core::{CatalogRecord, QueryPatch, QueryState};
use tokio_util::sync::CancellationToken;

use crate::config::FamilyConfig;
use crate::error::FetchError;
use crate::fetcher::{EndpointFetcher, FetchAttempt, FetchOutcome};
use crate::transport::Transport;

/// Lifecycle of the controller's snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Idle,
    Loading,
    Ready,
    Error,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Loading => write!(f, "loading"),
            Self::Ready => write!(f, "ready"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// The derived view handed to presentation. Always present, possibly empty.
#[derive(Debug)]
pub struct CatalogView<'a> {
    pub status: Status,
    pub records: Vec<&'a CatalogRecord>,
    pub error: Option<&'a FetchError>,
}

/// Handle for one issued refresh.
///
/// Carries everything needed to run the fetch without borrowing the
/// controller, so several refreshes can be in flight at once.
#[derive(Debug)]
pub struct RefreshTicket {
    seq: u64,
    cancel: CancellationToken,
    endpoints: Vec<String>,
}

impl RefreshTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

pub struct CatalogController<T> {
    config: FamilyConfig,
    fetcher: EndpointFetcher<T>,
    resolver: AssetResolver,
    snapshot: Vec<CatalogRecord>,
    source: Option<String>,
    query: QueryState,
    view: Vec<usize>,
    status: Status,
    error: Option<FetchError>,
    issued: u64,
    in_flight: Option<CancellationToken>,
}

impl<T: Transport> CatalogController<T> {
    pub fn new(config: FamilyConfig, transport: T) -> Self {
        let fetcher = EndpointFetcher::new(
            transport,
            config.collection_keys.clone(),
            config.request_timeout,
        );
        let resolver = config.resolver();
        Self {
            config,
            fetcher,
            resolver,
            snapshot: Vec::new(),
            source: None,
            query: QueryState::default(),
            view: Vec::new(),
            status: Status::Idle,
            error: None,
            issued: 0,
            in_flight: None,
        }
    }

    pub fn config(&self) -> &FamilyConfig {
        &self.config
    }

    pub fn fetcher(&self) -> &EndpointFetcher<T> {
        &self.fetcher
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn query(&self) -> &QueryState {
        &self.query
    }

    /// The most recently accepted snapshot, unfiltered.
    pub fn snapshot(&self) -> &[CatalogRecord] {
        &self.snapshot
    }

    /// Endpoint that produced the current snapshot.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Resolved image URL for a record of this family.
    pub fn image_url(&self, record: &CatalogRecord) -> String {
        self.resolver.resolve(record)
    }

    /// Issue a new refresh and enter `Loading`.
    ///
    /// Any older in-flight refresh is cancelled. Its outcome would be
    /// discarded anyway; cancelling just stops the network work early.
    pub fn begin_refresh(&mut self) -> RefreshTicket {
        if let Some(previous) = self.in_flight.take() {
            previous.cancel();
        }
        self.issued += 1;
        let cancel = CancellationToken::new();
        self.in_flight = Some(cancel.clone());
        self.status = Status::Loading;
        self.error = None;
        log::debug!(
            "{}: refresh #{} issued",
            self.config.family.short_name(),
            self.issued
        );
        RefreshTicket {
            seq: self.issued,
            cancel,
            endpoints: self.config.endpoints.clone(),
        }
    }

    /// Apply a refresh outcome if it belongs to the latest refresh.
    ///
    /// Returns `false` when the ticket was superseded and the outcome was
    /// discarded.
    pub fn complete_refresh(&mut self, ticket: RefreshTicket, outcome: FetchOutcome) -> bool {
        if ticket.seq != self.issued {
            log::debug!(
                "{}: discarding outcome of refresh #{} (latest is #{})",
                self.config.family.short_name(),
                ticket.seq,
                self.issued
            );
            return false;
        }
        self.in_flight = None;

        match outcome {
            FetchOutcome::Success { records, endpoint } => {
                self.snapshot = records;
                self.source = Some(endpoint);
                self.status = Status::Ready;
                self.error = None;
                self.recompute();
            }
            FetchOutcome::Failure(e) => {
                // The previous snapshot stays on screen behind the error.
                self.status = Status::Error;
                self.error = Some(e);
            }
        }
        true
    }

    /// Fetch and apply in one step. Returns the candidate trace.
    pub async fn refresh(&mut self) -> Vec<FetchAttempt> {
        let ticket = self.begin_refresh();
        let report = self
            .fetcher
            .fetch(ticket.endpoints(), ticket.cancel_token())
            .await;
        self.complete_refresh(ticket, report.outcome);
        report.attempts
    }

    /// Merge a partial query and recompute the view. Never changes status.
    pub fn set_query(&mut self, patch: QueryPatch) {
        self.query.apply(patch);
        self.recompute();
    }

    /// The last computed view with the current status.
    pub fn view(&self) -> CatalogView<'_> {
        CatalogView {
            status: self.status,
            records: self.view.iter().map(|&i| &self.snapshot[i]).collect(),
            error: self.error.as_ref(),
        }
    }

    fn recompute(&mut self) {
        self.view = select(&self.snapshot, &self.query, &self.config.searchable_fields);
    }
}
