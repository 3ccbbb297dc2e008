use async_trait::async_trait;
use axum::body::Bytes;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum_test::TestServer;
use pay_api::{create_router, AppConfig, AppState};
use pay_core::{
    IntentStatus, NewPaymentIntent, PaymentError, PaymentGateway, PaymentIntent, PaymentResult,
    WebhookEvent,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Clone, Copy)]
enum Outcome {
    Ok,
    ProviderError,
    NetworkError,
    Timeout,
    Panic,
}

struct FakeGateway {
    outcome: Outcome,
    calls: AtomicUsize,
}

impl FakeGateway {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond(&self, intent: PaymentIntent) -> PaymentResult<PaymentIntent> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.outcome {
            Outcome::Ok => Ok(intent),
            Outcome::ProviderError => Err(PaymentError::ProviderError {
                provider: "stripe".to_string(),
                message: "No such payment_intent: 'pi_missing'".to_string(),
            }),
            Outcome::NetworkError => Err(PaymentError::NetworkError(
                "error sending request for url (https://api.stripe.com/v1/payment_intents)"
                    .to_string(),
            )),
            Outcome::Timeout => Err(PaymentError::Timeout("operation timed out".to_string())),
            Outcome::Panic => panic!("gateway exploded"),
        }
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_intent(&self, intent: &NewPaymentIntent) -> PaymentResult<PaymentIntent> {
        self.respond(PaymentIntent {
            id: "pi_fake".to_string(),
            client_secret: Some("pi_fake_secret_123".to_string()),
            status: IntentStatus::RequiresPaymentMethod,
            amount: intent.amount.as_i64().unwrap_or_default(),
            currency: intent.currency.as_str().unwrap_or_default().to_string(),
        })
    }

    async fn retrieve_intent(&self, intent_id: &str) -> PaymentResult<PaymentIntent> {
        self.respond(PaymentIntent {
            id: intent_id.to_string(),
            client_secret: None,
            status: IntentStatus::Succeeded,
            amount: 4200,
            currency: "usd".to_string(),
        })
    }

    fn verify_webhook(&self, _payload: &[u8], _signature: &str) -> PaymentResult<WebhookEvent> {
        Err(PaymentError::Configuration("webhooks are not faked".to_string()))
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}

fn server_with(gateway: Arc<FakeGateway>, config: AppConfig) -> TestServer {
    let state = AppState::with_gateway(config, gateway);
    TestServer::new(create_router(state)).unwrap()
}

fn server(gateway: Arc<FakeGateway>) -> TestServer {
    server_with(gateway, AppConfig::default())
}

#[tokio::test]
async fn create_intent_returns_client_secret() {
    let gateway = FakeGateway::new(Outcome::Ok);
    let server = server(gateway.clone());

    let response = server
        .post("/api/v1/payment/create-intent")
        .json(&json!({ "amount": 1999, "currency": "usd" }))
        .await;

    response.assert_status(StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["clientSecret"], "pi_fake_secret_123");
    assert_eq!(body["paymentIntentId"], "pi_fake");
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn missing_fields_are_rejected_before_the_provider_is_called() {
    let gateway = FakeGateway::new(Outcome::Ok);
    let server = server(gateway.clone());

    for body in [
        json!({ "amount": 1000 }),
        json!({ "currency": "usd" }),
        json!({}),
        json!({ "amount": null, "currency": "usd" }),
    ] {
        let response = server
            .post("/api/v1/payment/create-intent")
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["error"], "Missing required fields");
    }

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn non_object_bodies_are_missing_fields() {
    let gateway = FakeGateway::new(Outcome::Ok);
    let server = server(gateway.clone());

    for body in [json!([1000, "usd"]), json!("usd"), json!(1000), Value::Null] {
        let response = server
            .post("/api/v1/payment/create-intent")
            .json(&body)
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Missing required fields" })
        );
    }

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let gateway = FakeGateway::new(Outcome::Ok);
    let server = server(gateway.clone());

    let response = server
        .post("/api/v1/payment/create-intent")
        .bytes(Bytes::from_static(b"{\"amount\": 10"))
        .content_type("application/json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn provider_errors_are_surfaced_as_bad_request() {
    let server = server(FakeGateway::new(Outcome::ProviderError));

    let response = server
        .post("/api/v1/payment/create-intent")
        .json(&json!({ "amount": -5, "currency": "usd" }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"],
        "No such payment_intent: 'pi_missing'"
    );
}

#[tokio::test]
async fn local_faults_are_generic_500s() {
    let server = server(FakeGateway::new(Outcome::NetworkError));

    let response = server
        .post("/api/v1/payment/create-intent")
        .json(&json!({ "amount": 500, "currency": "eur" }))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "Internal server error" }));

    let response = server.get("/api/v1/payment/pi_123").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json::<Value>(), json!({ "error": "Internal server error" }));
}

#[tokio::test]
async fn provider_timeout_is_a_gateway_timeout() {
    let server = server(FakeGateway::new(Outcome::Timeout));

    let response = server.get("/api/v1/payment/pi_slow").await;

    response.assert_status(StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(
        response.json::<Value>()["error"],
        "Payment provider timed out"
    );
}

#[tokio::test]
async fn payment_status_is_relayed() {
    let gateway = FakeGateway::new(Outcome::Ok);
    let server = server(gateway.clone());

    let response = server.get("/api/v1/payment/pi_abc").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "succeeded", "amount": 4200, "currency": "usd" })
    );
    assert_eq!(gateway.calls(), 1);
}

#[tokio::test]
async fn unknown_payment_is_a_bad_request() {
    let server = server(FakeGateway::new(Outcome::ProviderError));

    let response = server.get("/api/v1/payment/pi_missing").await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unmatched_routes_return_json_404() {
    let server = server(FakeGateway::new(Outcome::Ok));

    for path in ["/nope", "/api/v2/payment/pi_1", "/api/v1/payment/pi_1/refund"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::NOT_FOUND);
        assert_eq!(response.json::<Value>(), json!({ "error": "Not Found" }));
    }
}

#[tokio::test]
async fn wrong_method_on_payment_routes_returns_json_405() {
    let gateway = FakeGateway::new(Outcome::Ok);
    let server = server(gateway.clone());

    for path in ["/api/v1/payment/webhook", "/api/v1/payment/create-intent"] {
        let response = server.get(path).await;
        response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "error": "Method Not Allowed" })
        );
    }

    let response = server.delete("/api/v1/payment/pi_1").await;
    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Method Not Allowed" })
    );

    assert_eq!(gateway.calls(), 0);
}

#[tokio::test]
async fn panics_become_internal_server_errors() {
    let server = server(FakeGateway::new(Outcome::Panic));

    let response = server.get("/api/v1/payment/pi_boom").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response.json::<Value>(),
        json!({ "error": "Internal Server Error" })
    );
}

#[tokio::test]
async fn health_reports_service() {
    let server = server(FakeGateway::new(Outcome::Ok));

    let response = server.get("/health").await;

    response.assert_status(StatusCode::OK);
    assert_eq!(response.json::<Value>()["status"], "healthy");
}

#[tokio::test]
async fn cors_allows_any_origin_by_default() {
    let server = server(FakeGateway::new(Outcome::Ok));

    let response = server
        .get("/api/v1/payment/pi_abc")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://anywhere.example"),
        )
        .await;

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("missing allow origin");
    assert_eq!(allow_origin, "*");
}

#[tokio::test]
async fn cors_pins_the_frontend_origin() {
    let config = AppConfig {
        frontend_url: Some("https://shop.example.com/".to_string()),
        ..AppConfig::default()
    };
    let server = server_with(FakeGateway::new(Outcome::Ok), config);

    let response = server
        .get("/api/v1/payment/pi_abc")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("https://shop.example.com"),
        )
        .await;

    let allow_origin = response
        .headers()
        .get("access-control-allow-origin")
        .expect("missing allow origin");
    assert_eq!(allow_origin, "https://shop.example.com");
}
