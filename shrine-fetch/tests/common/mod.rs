#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use shrine_core::Family;
use shrine_fetch::{FamilyConfig, FetchError, RawResponse, Transport};
use tokio::time::Duration;

pub const BASE: &str = "https://api.example.org";

/// How the scripted transport answers one URL.
#[derive(Debug, Clone)]
pub enum Script {
    Respond(u16, String),
    Fail(String),
    /// Never answers; only a timeout or cancellation ends the request.
    Hang,
    Delayed(Duration, u16, String),
}

/// In-memory transport that answers from a script and records every URL
/// it was asked for. Unscripted URLs fail like a refused connection.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    scripts: Rc<RefCell<HashMap<String, Script>>>,
    calls: Rc<RefCell<Vec<String>>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, url: &str, script: Script) -> Self {
        self.set(url, script);
        self
    }

    pub fn set(&self, url: &str, script: Script) {
        self.scripts.borrow_mut().insert(url.to_string(), script);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<RawResponse, FetchError> {
        self.calls.borrow_mut().push(url.to_string());
        let script = self.scripts.borrow().get(url).cloned();
        match script {
            None => Err(FetchError::network("connection refused")),
            Some(Script::Fail(msg)) => Err(FetchError::Network(msg)),
            Some(Script::Respond(status, body)) => Ok(RawResponse {
                status,
                body: body.into_bytes(),
            }),
            Some(Script::Hang) => std::future::pending().await,
            Some(Script::Delayed(delay, status, body)) => {
                tokio::time::sleep(delay).await;
                Ok(RawResponse {
                    status,
                    body: body.into_bytes(),
                })
            }
        }
    }
}

pub fn url(path: &str) -> String {
    format!("{BASE}{path}")
}

/// Family config with the given endpoints and a short timeout.
pub fn family_config(family: Family, paths: &[&str]) -> FamilyConfig {
    let mut cfg = FamilyConfig::defaults(family, BASE);
    cfg.endpoints = paths.iter().map(|p| url(p)).collect();
    cfg.request_timeout = Duration::from_millis(50);
    cfg
}

/// `{ "data": [...] }` body with `n` active gemstones.
pub fn gem_body(n: usize) -> String {
    let records: Vec<serde_json::Value> = (1..=n)
        .map(|i| {
            serde_json::json!({
                "_id": format!("gem-{i}"),
                "name": format!("Gem {i}"),
                "category": "gem",
                "price": 1000 * i,
                "image": format!("gem-{i}.jpg"),
            })
        })
        .collect();
    serde_json::json!({ "data": records }).to_string()
}
