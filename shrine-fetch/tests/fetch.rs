mod common;

use common::{Script, ScriptedTransport, family_config, gem_body, url};
use shrine_core::Family;
use shrine_fetch::{EndpointFetcher, FetchError, FetchOutcome};
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

fn fetcher(transport: ScriptedTransport) -> EndpointFetcher<ScriptedTransport> {
    EndpointFetcher::new(
        transport,
        vec!["gemstones".to_string()],
        Duration::from_millis(50),
    )
}

#[tokio::test]
async fn stops_at_the_first_successful_candidate() {
    let paths = ["/a", "/b", "/c", "/d"];
    let transport = ScriptedTransport::new()
        .with(&url("/a"), Script::Respond(404, "{}".to_string()))
        .with(&url("/b"), Script::Fail("dns failure".to_string()))
        .with(&url("/c"), Script::Respond(200, gem_body(2)))
        .with(&url("/d"), Script::Respond(200, gem_body(9)));
    let endpoints = family_config(Family::Gemstones, &paths).endpoints;
    let f = fetcher(transport.clone());

    let report = f.fetch(&endpoints, &CancellationToken::new()).await;

    assert_eq!(transport.calls(), [url("/a"), url("/b"), url("/c")]);
    match report.outcome {
        FetchOutcome::Success { records, endpoint } => {
            assert_eq!(records.len(), 2);
            assert_eq!(endpoint, url("/c"));
        }
        other => panic!("expected success, got {other:?}"),
    }
    assert_eq!(report.attempts.len(), 3);
    assert_eq!(report.attempts[2].result, Ok(2));
}

#[tokio::test]
async fn timeout_then_server_error_then_success() {
    let transport = ScriptedTransport::new()
        .with(&url("/slow"), Script::Hang)
        .with(&url("/broken"), Script::Respond(500, "Internal Server Error".to_string()))
        .with(&url("/good"), Script::Respond(200, gem_body(4)));
    let endpoints = family_config(Family::Gemstones, &["/slow", "/broken", "/good"]).endpoints;

    let report = fetcher(transport)
        .fetch(&endpoints, &CancellationToken::new())
        .await;

    assert!(matches!(report.attempts[0].result, Err(FetchError::Network(_))));
    assert_eq!(
        report.attempts[1].result,
        Err(FetchError::Http {
            status: 500,
            url: url("/broken")
        })
    );
    match report.outcome {
        FetchOutcome::Success { records, .. } => assert_eq!(records.len(), 4),
        other => panic!("expected success, got {other:?}"),
    }
}

#[tokio::test]
async fn all_failing_reports_the_last_reason() {
    let transport = ScriptedTransport::new()
        .with(&url("/a"), Script::Respond(503, String::new()))
        .with(&url("/b"), Script::Respond(200, "<!doctype html>".to_string()))
        .with(&url("/c"), Script::Respond(200, r#"{"items": []}"#.to_string()));
    let endpoints = family_config(Family::Gemstones, &["/a", "/b", "/c"]).endpoints;

    let report = fetcher(transport)
        .fetch(&endpoints, &CancellationToken::new())
        .await;

    assert_eq!(report.attempts.len(), 3);
    assert!(matches!(report.attempts[1].result, Err(FetchError::Parse(_))));
    assert!(matches!(
        report.outcome,
        FetchOutcome::Failure(FetchError::Shape(_))
    ));
}

#[tokio::test]
async fn empty_candidate_list_is_a_failure_not_a_panic() {
    let report = fetcher(ScriptedTransport::new())
        .fetch(&[], &CancellationToken::new())
        .await;
    assert_eq!(report.outcome, FetchOutcome::Failure(FetchError::NoEndpoints));
    assert!(report.attempts.is_empty());
}

#[tokio::test]
async fn cancellation_abandons_the_in_flight_request() {
    let transport = ScriptedTransport::new()
        .with(&url("/hang"), Script::Hang)
        .with(&url("/next"), Script::Respond(200, gem_body(1)));
    let endpoints = family_config(Family::Gemstones, &["/hang", "/next"]).endpoints;
    let f = EndpointFetcher::new(
        transport.clone(),
        vec!["gemstones".to_string()],
        Duration::from_secs(30),
    );
    let token = CancellationToken::new();

    let (report, _) = tokio::join!(f.fetch(&endpoints, &token), async {
        tokio::time::sleep(Duration::from_millis(20)).await;
        token.cancel();
    });

    assert_eq!(report.outcome, FetchOutcome::Failure(FetchError::Cancelled));
    assert_eq!(transport.calls(), [url("/hang")]);
    assert_eq!(report.attempts.len(), 1);
    assert_eq!(report.attempts[0].endpoint, url("/hang"));
    assert_eq!(report.attempts[0].result, Err(FetchError::Cancelled));
}

#[tokio::test]
async fn already_cancelled_token_contacts_nothing() {
    let transport = ScriptedTransport::new().with(&url("/a"), Script::Respond(200, gem_body(1)));
    let endpoints = family_config(Family::Gemstones, &["/a"]).endpoints;
    let token = CancellationToken::new();
    token.cancel();

    let report = fetcher(transport.clone()).fetch(&endpoints, &token).await;

    assert_eq!(report.outcome, FetchOutcome::Failure(FetchError::Cancelled));
    assert!(transport.calls().is_empty());
}
