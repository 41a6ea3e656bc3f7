#![allow(unused)]
//! HTTP lookup integration harness.
//!
//! # What this covers
//!
//! - **Wire format**: `HttpLookup` against a fake service decodes
//!   `sickCd`/`sickNm` records in service order and sends the query
//!   percent-encoded.
//! - **Failures**: non-2xx answers become `LookupError::Status` with the
//!   service's message; an unreachable service is a transport error.
//! - **Full stack**: a configured session over real HTTP against the bundled
//!   mock server, including the response cache.
//!
//! These tests use real sockets, so they run on real time with a short
//! debounce instead of `tokio::time::pause()`.
//!
//! # Running
//!
//! ```sh
//! cargo test --test remote_harness
//! ```

mod common;
use common::fake_lookup_api::FakeLookupApi;
use common::*;

use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use typeahead::mock_server;
use typeahead_core::collab::search_path;
use typeahead_core::config::Config;
use typeahead_core::{Lookup, LookupError, MemoryStore, SearchSession, Suggestion};
use typeahead_remote::HttpLookup;

async fn start_mock_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        mock_server::serve_on(listener).await.unwrap();
    });
    format!("http://{addr}/sick")
}

fn session_for(endpoint: &str) -> (SearchSession, Arc<Recorder>) {
    let config = Config::from_toml(&format!(
        r#"
        [lookup]
        endpoint = "{endpoint}"
        debounce_ms = 20
        "#
    ))
    .unwrap();
    let recorder = Recorder::new();
    let lookup = Arc::new(HttpLookup::new(config.lookup.endpoint.clone()).unwrap());
    let session = SearchSession::from_config(&config, lookup, Arc::new(MemoryStore::new()), recorder.clone())
        .with_reporter(recorder.clone());
    (session, recorder)
}

async fn pump(session: &mut SearchSession) -> bool {
    tokio::time::timeout(Duration::from_secs(5), session.pump())
        .await
        .expect("lookup result within 5s")
}

// ---------------------------------------------------------------------------
// HttpLookup against the fake service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn decodes_service_records() {
    let api = FakeLookupApi::start().await.unwrap();
    api.set_body("암", CANCER_JSON).await;
    let lookup = HttpLookup::new(api.endpoint()).unwrap();

    let got = lookup.lookup("암").await.unwrap();
    assert_eq!(got, cancer_suggestions());
    assert_eq!(api.requests().await, vec!["암"]);
}

#[tokio::test]
async fn reserved_characters_survive_the_query_string() {
    let api = FakeLookupApi::start().await.unwrap();
    let lookup = HttpLookup::new(api.endpoint()).unwrap();

    let got = lookup.lookup("a&b=c d").await.unwrap();
    assert!(got.is_empty());
    assert_eq!(api.requests().await, vec!["a&b=c d"]);
}

#[tokio::test]
async fn error_status_carries_service_message() {
    let api = FakeLookupApi::start().await.unwrap();
    api.fail_with(503, r#"{"message":"maintenance"}"#).await;
    let lookup = HttpLookup::new(api.endpoint()).unwrap();

    let err = lookup.lookup("암").await.unwrap_err();
    assert_eq!(
        err,
        LookupError::Status {
            status: 503,
            message: "maintenance".into()
        }
    );
}

#[tokio::test]
async fn malformed_body_is_a_decode_error() {
    let api = FakeLookupApi::start().await.unwrap();
    api.set_body("암", "<html>oops</html>").await;
    let lookup = HttpLookup::new(api.endpoint()).unwrap();

    assert!(matches!(lookup.lookup("암").await, Err(LookupError::Decode(_))));
}

#[tokio::test]
async fn unreachable_service_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let lookup = HttpLookup::new(format!("http://{addr}/sick")).unwrap();

    assert!(matches!(lookup.lookup("암").await, Err(LookupError::Transport(_))));
}

// ---------------------------------------------------------------------------
// Full stack
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_over_mock_server() {
    let endpoint = start_mock_server().await;
    let (mut session, recorder) = session_for(&endpoint);

    session.open();
    session.type_text("암");
    assert!(pump(&mut session).await);
    assert_eq!(
        session.state().recommended_labels(),
        vec!["간암", "피부암", "위암", "폐암", "대장암", "유방암", "갑상선암"]
    );

    session.arrow_down();
    session.arrow_down();
    session.enter(false);
    assert_eq!(recorder.routes(), vec![search_path("피부암")]);
    assert_eq!(session.state().cached_terms, vec!["피부암"]);
}

#[tokio::test]
async fn mock_server_answers_blank_query_with_empty_list() {
    let endpoint = start_mock_server().await;
    let lookup = HttpLookup::new(endpoint).unwrap();
    assert_eq!(lookup.lookup("").await.unwrap(), Vec::<Suggestion>::new());
    assert_eq!(lookup.lookup("간경").await.unwrap(), vec![Suggestion::new("K74", "간경변증")]);
}

#[tokio::test]
async fn service_failure_is_reported_through_session() {
    let api = FakeLookupApi::start().await.unwrap();
    api.fail_with(500, "").await;
    let (mut session, recorder) = session_for(&api.endpoint());

    session.type_text("암");
    assert!(!pump(&mut session).await);
    assert_eq!(
        recorder.errors(),
        vec![LookupError::Status {
            status: 500,
            message: "Internal Server Error".into()
        }]
    );
}

#[tokio::test]
async fn response_cache_spares_the_service() {
    let api = FakeLookupApi::start().await.unwrap();
    api.set_body("암", CANCER_JSON).await;
    let (mut session, _recorder) = session_for(&api.endpoint());

    for text in ["암", "간", "암"] {
        session.type_text(text);
        assert!(pump(&mut session).await);
    }

    assert_eq!(api.requests().await, vec!["암", "간"]);
    assert_eq!(session.state().recommended_labels(), vec!["간암", "피부암"]);
}
