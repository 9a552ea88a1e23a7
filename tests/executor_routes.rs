mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use common::*;
use pix_gateway_client::config::RouteConfig;
use pix_gateway_client::routing::RouteTable;
use pix_gateway_client::{GatewayError, Payload, RequestDescriptor, RequestExecutor};
use serde_json::json;

const WALLET_URL: &str = "https://api.cakto.com.br/gateway/wallet";

fn wallet_request() -> RequestDescriptor {
    RequestDescriptor::post_json(WALLET_URL, &json!({})).unwrap()
}

#[tokio::test]
async fn test_direct_timeout_falls_through_to_first_relay() {
    let direct = start_stalled_backend(Duration::from_secs(3)).await;
    let relay1 = start_mock_backend(200, r#"{"data":{"balance":150.5}}"#).await;
    let relay2 = start_mock_backend(200, r#"{"never":"used"}"#).await;
    let executor = executor_with(direct.addr, &[&relay1, &relay2], deadlines(200, 2_000));

    let start = Instant::now();
    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"data": {"balance": 150.5}})));
    assert!(start.elapsed() < Duration::from_secs(2), "direct deadline not enforced");
    assert_eq!(direct.hits(), 1);
    assert_eq!(relay1.hits(), 1);
    assert_eq!(relay2.hits(), 0);
}

#[tokio::test]
async fn test_all_routes_blocked_exhausts() {
    let direct = start_mock_backend(200, BLOCKED_PAGE).await;
    let relay1 = start_mock_backend(200, BLOCKED_PAGE).await;
    let relay2 = start_mock_backend(403, "<html><body>Forbidden</body></html>").await;
    let relay3 = start_mock_backend(200, "  <!doctype html><p>rate limited</p>").await;
    let executor = executor_with(direct.addr, &[&relay1, &relay2, &relay3], deadlines(1_000, 1_000));

    let err = executor.execute(&wallet_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Exhausted { attempts: 4 }));
    let message = err.to_string();
    assert!(message.contains("ad blockers"));
    assert!(message.contains("VPN"));
    for backend in [&direct, &relay1, &relay2, &relay3] {
        assert_eq!(backend.hits(), 1);
    }
}

#[tokio::test]
async fn test_direct_unauthorized_is_fatal() {
    let direct = start_mock_backend(401, r#"{"message":"Unauthenticated."}"#).await;
    let relay1 = start_mock_backend(200, r#"{"data":{}}"#).await;
    let relay2 = start_mock_backend(200, r#"{"data":{}}"#).await;
    let executor = executor_with(direct.addr, &[&relay1, &relay2], deadlines(1_000, 1_000));

    let err = executor.execute(&wallet_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Credentials));
    assert!(err.to_string().contains("credentials"));
    assert_eq!(relay1.hits(), 0);
    assert_eq!(relay2.hits(), 0);
}

#[tokio::test]
async fn test_direct_unauthorized_html_page_is_fatal() {
    let direct = start_mock_backend(401, "<html><body>401 Authorization Required</body></html>").await;
    let relay1 = start_mock_backend(200, r#"{"balance": 1}"#).await;
    let executor = executor_with(direct.addr, &[&relay1], deadlines(1_000, 1_000));

    let err = executor.execute(&wallet_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Credentials));
    assert_eq!(relay1.hits(), 0);
}

#[tokio::test]
async fn test_relay_unauthorized_html_page_is_blocked_relay() {
    let relay1 = start_mock_backend(401, "<!DOCTYPE html><p>proxy login</p>").await;
    let relay2 = start_mock_backend(200, r#"{"balance": 1}"#).await;
    let executor = executor_with(closed_addr().await, &[&relay1, &relay2], deadlines(1_000, 1_000));

    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"balance": 1})));
    assert_eq!(relay2.hits(), 1);
}

#[tokio::test]
async fn test_relay_unauthorized_is_fatal() {
    let relay1 = start_mock_backend(401, r#"{"message":"Unauthenticated."}"#).await;
    let relay2 = start_mock_backend(200, r#"{"data":{}}"#).await;
    let executor = executor_with(closed_addr().await, &[&relay1, &relay2], deadlines(1_000, 1_000));

    let err = executor.execute(&wallet_request()).await.unwrap_err();

    assert!(matches!(err, GatewayError::Credentials));
    assert_eq!(relay1.hits(), 1);
    assert_eq!(relay2.hits(), 0);
}

#[tokio::test]
async fn test_second_relay_answers_and_third_is_never_tried() {
    let direct = start_mock_backend(500, r#"{"error":"upstream"}"#).await;
    let relay1 = start_mock_backend(200, BLOCKED_PAGE).await;
    let relay2 = start_mock_backend(200, r#"{"balance": 150.5, "currency": "BRL"}"#).await;
    let relay3 = start_mock_backend(200, r#"{"balance": 0, "currency": "BRL"}"#).await;
    let executor = executor_with(direct.addr, &[&relay1, &relay2, &relay3], deadlines(1_000, 1_000));

    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"balance": 150.5, "currency": "BRL"})));
    assert_eq!(relay2.hits(), 1);
    assert_eq!(relay3.hits(), 0);
}

#[tokio::test]
async fn test_plain_text_success_is_returned_trimmed() {
    let direct = start_mock_backend(403, "forbidden").await;
    let relay1 = start_mock_backend(200, "  OK\n").await;
    let executor = executor_with(direct.addr, &[&relay1], deadlines(1_000, 1_000));

    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Text("OK".to_string()));
}

#[tokio::test]
async fn test_relay_failing_status_advances() {
    let direct = start_mock_backend(503, "").await;
    let relay1 = start_mock_backend(422, r#"{"message":"invalid pix key"}"#).await;
    let relay2 = start_mock_backend(200, r#"{"ok":true}"#).await;
    let executor = executor_with(direct.addr, &[&relay1, &relay2], deadlines(1_000, 1_000));

    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"ok": true})));
    assert_eq!(relay1.hits(), 1);
}

#[tokio::test]
async fn test_relay_timeout_advances() {
    let direct = start_mock_backend(500, "").await;
    let relay1 = start_stalled_backend(Duration::from_secs(3)).await;
    let relay2 = start_mock_backend(200, r#"{"ok":true}"#).await;
    let executor = executor_with(direct.addr, &[&relay1, &relay2], deadlines(1_000, 300));

    let start = Instant::now();
    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"ok": true})));
    assert!(start.elapsed() < Duration::from_secs(2));
}

#[tokio::test]
async fn test_transport_error_advances() {
    let relay1 = start_mock_backend(200, r#"{"ok":true}"#).await;
    let executor = executor_with(closed_addr().await, &[&relay1], deadlines(1_000, 1_000));

    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"ok": true})));
    assert_eq!(relay1.hits(), 1);
}

#[tokio::test]
async fn test_attempts_carry_credentials_and_request_id() {
    let direct = start_mock_backend(500, "").await;
    let relay1 = start_mock_backend(200, "{}").await;
    let executor = executor_with(direct.addr, &[&relay1], deadlines(1_000, 1_000));

    executor.execute(&wallet_request()).await.unwrap();

    let direct_req = direct.requests()[0].to_ascii_lowercase();
    let relay_req = relay1.requests()[0].to_ascii_lowercase();
    for req in [&direct_req, &relay_req] {
        assert!(req.contains(&format!("client-id: {}", TEST_CLIENT_ID)));
        assert!(req.contains(&format!("x-client-secret: {}", TEST_CLIENT_SECRET)));
        assert!(req.contains("x-requested-with: xmlhttprequest"));
        assert!(req.contains("content-type: application/json"));
    }

    let request_id = |req: &str| {
        req.lines()
            .find_map(|l| l.strip_prefix("x-request-id: "))
            .map(str::to_string)
    };
    let id = request_id(direct_req.as_str()).expect("request id header");
    assert_eq!(request_id(relay_req.as_str()), Some(id));
}

#[tokio::test]
async fn test_relay_receives_encoded_target_with_cache_buster() {
    let direct = start_mock_backend(500, "").await;
    let relay1 = start_mock_backend(200, "{}").await;
    let executor = executor_with(direct.addr, &[&relay1], deadlines(1_000, 1_000));

    executor.execute(&wallet_request()).await.unwrap();

    let request_line = relay1.requests()[0].lines().next().unwrap().to_string();
    let prefix = "POST /relay?url=https%3A%2F%2Fapi.cakto.com.br%2Fgateway%2Fwallet%3Fcb%3D";
    assert!(request_line.starts_with(prefix), "unexpected request line: {}", request_line);
    let timestamp = request_line[prefix.len()..].split(' ').next().unwrap();
    assert!(timestamp.parse::<u128>().is_ok());
}

#[tokio::test]
async fn test_invocations_are_independent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let direct = start_programmable_backend(move |_| {
        let n = counter.fetch_add(1, Ordering::SeqCst);
        async move {
            if n == 0 {
                (401, "{}".to_string())
            } else {
                (200, r#"{"ok":true}"#.to_string())
            }
        }
    })
    .await;
    let relay1 = start_mock_backend(200, "{}").await;
    let executor = executor_with(direct.addr, &[&relay1], deadlines(1_000, 1_000));

    assert!(matches!(
        executor.execute(&wallet_request()).await,
        Err(GatewayError::Credentials)
    ));
    // A fatal outcome leaves no state behind.
    let payload = executor.execute(&wallet_request()).await.unwrap();
    assert_eq!(payload, Payload::Json(json!({"ok": true})));
    assert_eq!(relay1.hits(), 0);
}

#[tokio::test]
async fn test_concurrent_invocations() {
    let direct = start_mock_backend(200, r#"{"ok":true}"#).await;
    let executor = executor_with(direct.addr, &[], deadlines(1_000, 1_000));

    let handles: Vec<_> = (0..5)
        .map(|_| {
            let executor = executor.clone();
            tokio::spawn(async move { executor.execute(&wallet_request()).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().is_ok());
    }
    assert_eq!(direct.hits(), 5);
}

#[tokio::test]
async fn test_disabled_relay_is_skipped() {
    let relay1 = start_mock_backend(200, r#"{"from":"relay1"}"#).await;
    let relay2 = start_mock_backend(200, r#"{"from":"relay2"}"#).await;

    let mut disabled = RouteConfig::relay("relay1", &relay1.relay_endpoint(), "cb");
    disabled.enabled = false;
    let table = RouteTable::from_config(&[
        disabled,
        RouteConfig::relay("relay2", &relay2.relay_endpoint(), "cb"),
    ]);
    assert_eq!(table.len(), 1);

    let executor = RequestExecutor::new(test_client(), table, deadlines(1_000, 1_000), &credentials()).unwrap();
    let payload = executor.execute(&wallet_request()).await.unwrap();

    assert_eq!(payload, Payload::Json(json!({"from": "relay2"})));
    assert_eq!(relay1.hits(), 0);
}
