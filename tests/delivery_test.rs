//! End-to-end delivery tests against a local HTTP server.

use mailgun_client::{Attachment, DeliveryError, MailgunClient, Message, SendingOptions};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::io::Write;
use wiremock::matchers::{body_string_contains, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const DOMAIN: &str = "mg.example.com";
// base64("api:key-test")
const AUTHORIZATION: &str = "Basic YXBpOmtleS10ZXN0";

fn client_for(server: &MockServer) -> MailgunClient {
    MailgunClient::builder()
        .api_key("key-test")
        .domain(DOMAIN)
        .base_url(format!("{}/v3", server.uri()))
        .build()
        .expect("Failed to build client")
}

fn simple_message() -> Message {
    Message::builder()
        .from(("Example", "hello@mg.example.com"))
        .to(("Bob", "bob@x.com"))
        .subject("Hi")
        .text_body("hello")
        .build()
        .expect("valid message")
}

async fn received_form(server: &MockServer) -> Vec<(String, String)> {
    let requests = server.received_requests().await.expect("recording enabled");
    assert_eq!(requests.len(), 1);
    url::form_urlencoded::parse(&requests[0].body)
        .into_owned()
        .collect()
}

#[tokio::test]
async fn test_deliver_urlencoded_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/messages"))
        .and(header("authorization", AUTHORIZATION))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(header_regex("user-agent", "^mailgun-client/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "<20240301093000.1.ABC@mg.example.com>",
            "message": "Queued. Thank you."
        })))
        .expect(1)
        .mount(&server)
        .await;

    let receipt = client_for(&server)
        .deliver(&simple_message())
        .await
        .expect("delivery succeeds");

    assert_eq!(receipt.id, "<20240301093000.1.ABC@mg.example.com>");
    assert_eq!(receipt.message.as_deref(), Some("Queued. Thank you."));

    let form = received_form(&server).await;
    assert_eq!(
        form,
        vec![
            ("from".to_string(), "Example <hello@mg.example.com>".to_string()),
            ("to".to_string(), "Bob <bob@x.com>".to_string()),
            ("subject".to_string(), "Hi".to_string()),
            ("text".to_string(), "hello".to_string()),
        ]
    );
}

#[tokio::test]
async fn test_deliver_full_field_set() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "full"})))
        .mount(&server)
        .await;

    let custom = json!({"plan": "pro", "seats": 3});
    let message = Message::builder()
        .from("hello@mg.example.com")
        .to(("Bob", "bob@x.com"))
        .to("alice@x.com")
        .cc("carol@x.com")
        .bcc("audit@x.com")
        .subject("Quarterly")
        .text_body("text version")
        .html_body("<p>html version</p>")
        .reply_to(("Support", "support@mg.example.com"))
        .header("X-Campaign", "q3")
        .custom_var("account", custom.clone())
        .recipient_vars(
            json!({"bob@x.com": {"id": 1}, "alice@x.com": {"id": 2}})
                .as_object()
                .cloned()
                .unwrap_or_default(),
        )
        .tag("quarterly")
        .tag("finance")
        .sending_options(SendingOptions {
            test_mode: Some(true),
            ..Default::default()
        })
        .build()
        .expect("valid message");

    client_for(&server)
        .deliver(&message)
        .await
        .expect("delivery succeeds");

    let form = received_form(&server).await;
    let get = |name: &str| -> Vec<&str> {
        form.iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    };

    assert_eq!(get("to"), vec!["Bob <bob@x.com>, alice@x.com"]);
    assert_eq!(get("cc"), vec!["carol@x.com"]);
    assert_eq!(get("bcc"), vec!["audit@x.com"]);
    assert_eq!(get("html"), vec!["<p>html version</p>"]);
    assert_eq!(get("h:Reply-To"), vec!["support@mg.example.com"]);
    assert_eq!(get("h:X-Campaign"), vec!["q3"]);
    assert_eq!(get("o:tag"), vec!["quarterly", "finance"]);
    assert_eq!(get("o:testmode"), vec!["yes"]);

    let account: Value = serde_json::from_str(get("v:account")[0]).expect("valid JSON");
    assert_eq!(account, custom);

    let recipient_vars: Value =
        serde_json::from_str(get("recipient-variables")[0]).expect("valid JSON");
    assert_eq!(recipient_vars["alice@x.com"]["id"], json!(2));
}

#[tokio::test]
async fn test_deliver_multipart_with_file_attachments() {
    let dir = tempfile::tempdir().expect("temp dir");
    let report_path = dir.path().join("report.pdf");
    let mut report = std::fs::File::create(&report_path).expect("create file");
    report.write_all(b"%PDF-1.4 test").expect("write file");
    drop(report);

    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v3/mg.example.com/messages"))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .and(body_string_contains(
            r#"name="attachment"; filename="report.pdf""#,
        ))
        .and(body_string_contains(r#"name="inline"; filename="logo.png""#))
        .and(body_string_contains("%PDF-1.4 test"))
        .and(body_string_contains(r#"name="subject""#))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "mp-1"})))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::builder()
        .from("hello@mg.example.com")
        .to("bob@x.com")
        .subject("Report")
        .html_body(r#"<img src="cid:logo.png">"#)
        .attachment(Attachment::from_path(&report_path))
        .attachment(Attachment::from_data("logo.png", b"\x89PNG".to_vec()).inline())
        .build()
        .expect("valid message");

    let receipt = client_for(&server)
        .deliver(&message)
        .await
        .expect("delivery succeeds");

    assert_eq!(receipt.id, "mp-1");
}

#[tokio::test]
async fn test_deliver_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).deliver(&simple_message()).await;

    match result {
        Err(DeliveryError::Authentication { body }) => assert_eq!(body, "unauthorized"),
        other => panic!("Expected Authentication error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deliver_provider_error_with_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_json(json!({"message": "'to' parameter is missing"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).deliver(&simple_message()).await;

    match result {
        Err(DeliveryError::Provider { status, payload }) => {
            assert_eq!(status, 400);
            assert_eq!(payload, Some(json!({"message": "'to' parameter is missing"})));
        }
        other => panic!("Expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deliver_server_error_without_body_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .deliver(&simple_message())
        .await
        .expect_err("500 must fail");

    assert!(err.is_retryable());
    match err {
        DeliveryError::Provider { status, payload } => {
            assert_eq!(status, 500);
            assert_eq!(payload, None);
        }
        other => panic!("Expected Provider error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_deliver_malformed_success_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
        .mount(&server)
        .await;

    let result = client_for(&server).deliver(&simple_message()).await;

    assert!(matches!(result, Err(DeliveryError::Serialization { .. })));
}

#[tokio::test]
async fn test_deliver_transport_failure() {
    let client = MailgunClient::builder()
        .api_key("key-test")
        .domain(DOMAIN)
        .base_url("http://127.0.0.1:1/v3")
        .build()
        .expect("Failed to build client");

    let result = client.deliver(&simple_message()).await;

    assert!(matches!(result, Err(DeliveryError::Transport { .. })));
}
