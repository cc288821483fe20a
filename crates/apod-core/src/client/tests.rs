//! Feed client tests against a scripted in-memory transport.

use super::*;
use crate::record::MediaType;
use crate::transport::{TransportError, TransportResponse};
use serde_json::json;
use std::sync::Mutex;

type Reply = Box<dyn Fn(&Url, usize) -> Result<TransportResponse, TransportError> + Send + Sync>;

/// Transport that records every requested URL and answers from a closure
/// given the URL and the 0-based call index.
struct ScriptedTransport {
    calls: Mutex<Vec<Url>>,
    reply: Reply,
}

impl ScriptedTransport {
    fn new(
        reply: impl Fn(&Url, usize) -> Result<TransportResponse, TransportError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            reply: Box::new(reply),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn last_query(&self, key: &str) -> Option<String> {
        let calls = self.calls.lock().unwrap();
        let url = calls.last()?;
        url.query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }
}

impl Transport for ScriptedTransport {
    async fn get(
        &self,
        url: &Url,
        _cancel: Option<&CancellationToken>,
    ) -> Result<TransportResponse, TransportError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(url.clone());
            calls.len() - 1
        };
        (self.reply)(url, index)
    }
}

fn ok_json(body: Value) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status: 200,
        status_text: "OK".to_string(),
        body: serde_json::to_vec(&body).unwrap(),
    })
}

fn status(code: u16, text: &str) -> Result<TransportResponse, TransportError> {
    Ok(TransportResponse {
        status: code,
        status_text: text.to_string(),
        body: Vec::new(),
    })
}

fn entry(date: &str) -> Value {
    json!({
        "date": date,
        "title": "Test Title",
        "explanation": "Test explanation",
        "media_type": "image",
        "url": "https://example.com/image.jpg",
        "hdurl": "https://example.com/image_hd.jpg",
        "service_version": "v1"
    })
}

fn client(retries: u32, transport: ScriptedTransport) -> FeedClient<ScriptedTransport> {
    let cfg = SdkConfig::new("DEMO_KEY")
        .with_retries(retries)
        .with_retry_delay_ms(0);
    FeedClient::with_transport(cfg, transport).unwrap()
}

#[tokio::test]
async fn get_one_returns_validated_record() {
    let c = client(1, ScriptedTransport::new(|_, _| ok_json(entry("2025-12-29"))));
    let record = c.get_one(None, None).await.unwrap();

    assert_eq!(record.title(), "Test Title");
    assert_eq!(record.media_type(), MediaType::Image);
    assert_eq!(serde_json::to_value(&record).unwrap(), entry("2025-12-29"));
    assert_eq!(c.transport().call_count(), 1);
    assert_eq!(c.transport().last_query("api_key").as_deref(), Some("DEMO_KEY"));
    assert_eq!(c.transport().last_query("date"), None);
}

#[tokio::test]
async fn get_one_treats_empty_date_as_today() {
    let c = client(0, ScriptedTransport::new(|_, _| ok_json(entry("2024-03-01"))));
    c.get_one(Some(""), None).await.unwrap();
    assert_eq!(c.transport().last_query("date"), None);
    assert_eq!(c.transport().last_query("api_key").as_deref(), Some("DEMO_KEY"));
}

#[tokio::test]
async fn get_one_sends_date() {
    let c = client(0, ScriptedTransport::new(|_, _| ok_json(entry("2024-02-29"))));
    let record = c.get_one(Some("2024-02-29"), None).await.unwrap();
    assert_eq!(record.date(), "2024-02-29");
    assert_eq!(c.transport().last_query("date").as_deref(), Some("2024-02-29"));
}

#[tokio::test]
async fn api_failure_is_retried_then_reported() {
    let c = client(
        1,
        ScriptedTransport::new(|_, _| status(500, "Internal Server Error")),
    );
    let err = c.get_one(None, None).await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    assert!(err.to_string().contains("500"));
    assert_eq!(c.transport().call_count(), 2);
}

#[tokio::test]
async fn validation_failure_is_reported_after_retries() {
    let c = client(2, ScriptedTransport::new(|_, _| ok_json(json!({ "invalid": "data" }))));
    match c.get_one(None, None).await {
        Err(ApodError::Validation(e)) => {
            assert!(e.mentions("title"));
            assert!(e.mentions("url"));
        }
        other => panic!("expected Validation, got {:?}", other),
    }
    assert_eq!(c.transport().call_count(), 3);
}

#[tokio::test]
async fn pre_cancelled_token_skips_transport() {
    let c = client(3, ScriptedTransport::new(|_, _| ok_json(json!([]))));
    let token = CancellationToken::new();
    token.cancel();

    let err = c
        .get_range("2024-01-01", "2024-01-07", Some(&token))
        .await
        .unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(c.transport().call_count(), 0);
}

#[tokio::test]
async fn aborted_transport_is_not_retried() {
    let c = client(3, ScriptedTransport::new(|_, _| Err(TransportError::Aborted)));
    let err = c.get_random(2, None).await.unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(c.transport().call_count(), 1);
}

#[tokio::test]
async fn token_fired_mid_call_stops_retries() {
    let token = CancellationToken::new();
    let fire = token.clone();
    let c = client(
        3,
        ScriptedTransport::new(move |_, _| {
            fire.cancel();
            Err(TransportError::NoResponse("connection reset".into()))
        }),
    );
    let err = c.get_one(None, Some(&token)).await.unwrap_err();
    assert!(matches!(err, ApodError::Network(_)));
    assert_eq!(c.transport().call_count(), 1);
}

#[tokio::test]
async fn network_failure_recovers_on_retry() {
    let c = client(
        2,
        ScriptedTransport::new(|_, i| {
            if i == 0 {
                Err(TransportError::NoResponse("connection refused".into()))
            } else {
                ok_json(entry("2025-01-01"))
            }
        }),
    );
    let record = c.get_one(None, None).await.unwrap();
    assert_eq!(record.date(), "2025-01-01");
    assert_eq!(c.transport().call_count(), 2);
}

#[tokio::test]
async fn malformed_json_is_decode_failure() {
    let c = client(
        1,
        ScriptedTransport::new(|_, _| {
            Ok(TransportResponse {
                status: 200,
                status_text: "OK".into(),
                body: b"<html>oops</html>".to_vec(),
            })
        }),
    );
    let err = c.get_one(None, None).await.unwrap_err();
    assert!(matches!(err, ApodError::Decode(_)));
    assert_eq!(c.transport().call_count(), 2);
}

#[tokio::test]
async fn get_random_sends_count_and_keeps_order() {
    let c = client(
        0,
        ScriptedTransport::new(|_, _| ok_json(json!([entry("2001-05-05"), entry("1999-09-09")]))),
    );
    let records = c.get_random(2, None).await.unwrap();
    assert_eq!(c.transport().last_query("count").as_deref(), Some("2"));
    let dates: Vec<_> = records.iter().map(Record::date).collect();
    assert_eq!(dates, ["2001-05-05", "1999-09-09"]);
}

#[tokio::test]
async fn get_random_accepts_empty_and_short_answers() {
    let c = client(0, ScriptedTransport::new(|_, _| ok_json(json!([]))));
    assert!(c.get_random(0, None).await.unwrap().is_empty());

    let c = client(0, ScriptedTransport::new(|_, _| ok_json(json!([entry("2010-10-10")]))));
    assert_eq!(c.get_random(100_000, None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn get_range_sends_both_dates() {
    let c = client(
        0,
        ScriptedTransport::new(|_, _| {
            ok_json(json!([entry("2024-01-01"), entry("2024-01-02"), entry("2024-01-03")]))
        }),
    );
    let records = c.get_range("2024-01-01", "2024-01-03", None).await.unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0].date(), "2024-01-01");
    assert_eq!(records[2].date(), "2024-01-03");
    let t = c.transport();
    assert_eq!(t.last_query("start_date").as_deref(), Some("2024-01-01"));
    assert_eq!(t.last_query("end_date").as_deref(), Some("2024-01-03"));
}

#[tokio::test]
async fn single_object_for_array_call_is_rejected() {
    let c = client(0, ScriptedTransport::new(|_, _| ok_json(entry("2024-01-01"))));
    let err = c.get_random(1, None).await.unwrap_err();
    assert!(matches!(err, ApodError::Validation(_)));
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let c = client(
        0,
        ScriptedTransport::new(|url, _| {
            if url.query_pairs().any(|(k, _)| k == "count") {
                ok_json(json!([entry("2020-02-02"), entry("2020-03-03")]))
            } else {
                ok_json(entry("2020-01-01"))
            }
        }),
    );
    let (one, many) = tokio::join!(c.get_one(None, None), c.get_random(2, None));
    assert_eq!(one.unwrap().date(), "2020-01-01");
    assert_eq!(many.unwrap().len(), 2);
    assert_eq!(c.transport().call_count(), 2);
}

#[test]
fn invalid_base_url_is_rejected() {
    let cfg = SdkConfig::new("k").with_base_url("not a url");
    let err = FeedClient::with_transport(cfg, ScriptedTransport::new(|_, _| ok_json(json!([]))))
        .unwrap_err();
    assert!(matches!(err, ApodError::InvalidUrl(_)));
}

#[test]
fn policy_comes_from_config() {
    let cfg = SdkConfig::new("k").with_retries(4).with_retry_delay_ms(20);
    let c = FeedClient::with_transport(cfg, ScriptedTransport::new(|_, _| ok_json(json!([]))))
        .unwrap();
    assert_eq!(c.policy().max_retries, 4);
    assert_eq!(c.policy().delay, std::time::Duration::from_millis(20));
}

#[test]
fn debug_output_hides_api_key() {
    let cfg = SdkConfig::new("super-secret");
    let c = FeedClient::with_transport(cfg, ScriptedTransport::new(|_, _| ok_json(json!([]))))
        .unwrap();
    let shown = format!("{:?}", c);
    assert!(shown.contains("api.nasa.gov"));
    assert!(!shown.contains("super-secret"));
}
