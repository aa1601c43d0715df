//! End-to-end tests of the calculate-shipping endpoint against a fake carrier.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use storefront_shipping::api::{self, AppState};
use storefront_shipping::messaging::ContactLinks;
use storefront_shipping::shipping::{HttpCarrierClient, QuoteFetcher};
use storefront_shipping::store::{InMemoryItemStore, ItemMeasurements};
use storefront_shipping::ShippingConfig;

const CALCULATE: &str = "/api/v2/me/shipment/calculate";

fn store() -> Arc<InMemoryItemStore> {
    Arc::new(
        InMemoryItemStore::new()
            .with_item("vase", ItemMeasurements { height: Some(30.0), width: Some(20.0), length: Some(20.0), weight: Some(1.2) })
            .with_item("poster", ItemMeasurements { height: Some(2.0), width: None, length: Some(60.0), weight: Some(0.2) }),
    )
}

fn app(server: &MockServer, config: ShippingConfig, contacts: Option<ContactLinks>) -> Router {
    let config = ShippingConfig { carrier_api_url: format!("{}{}", server.uri(), CALCULATE), ..config };
    let carrier = HttpCarrierClient::new(&config).unwrap();
    let fetcher = QuoteFetcher::new(config, store(), Arc::new(carrier));
    api::router(AppState::new(fetcher).with_contacts(contacts))
}

async fn post(app: Router, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri("/functions/v1/calculate-shipping")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn carrier_answering(template: ResponseTemplate, calls: u64) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(CALCULATE))
        .and(header("authorization", "Bearer token"))
        .respond_with(template)
        .expect(calls)
        .mount(&server)
        .await;
    server
}

#[tokio::test]
async fn quotes_cheapest_and_fastest() {
    let server = carrier_answering(
        ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "name": "PAC", "price": "32.50", "delivery_time": 9, "company": {"name": "Correios", "picture": "pac.png"}},
            {"id": 2, "name": "SEDEX", "price": "55.00", "delivery_time": 3, "company": {"name": "Correios", "picture": "sedex.png"}},
            {"id": 17, "name": "Mini Envios", "error": "Serviço indisponível para o trecho", "company": {"name": "Correios"}}
        ])),
        1,
    )
    .await;

    let (status, body) = post(app(&server, ShippingConfig::with_credential("token"), None), r#"{"cep": "01310-200", "product_id": "vase"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cheapest"], json!({"id": 1, "name": "PAC", "company": "Correios", "price": 32.5, "deliveryTime": 9}));
    assert_eq!(body["fastest"], json!({"id": 2, "name": "SEDEX", "company": "Correios", "price": 55.0, "deliveryTime": 3}));
    assert_eq!(body["allOptions"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn wrapped_single_option_reports_no_fastest() {
    let server = carrier_answering(
        ResponseTemplate::new(200).set_body_json(json!({"data": [
            {"id": "jad-1", "name": ".Package", "price": "21.90", "delivery_time": 5, "company": {"name": "Jadlog"}}
        ]})),
        1,
    )
    .await;

    let (_, body) = post(app(&server, ShippingConfig::with_credential("token"), None), r#"{"cep": "01310200", "product_id": "vase"}"#).await;
    assert_eq!(body["cheapest"]["id"], "jad-1");
    assert!(body["fastest"].is_null());
    assert_eq!(body["allOptions"][0], body["cheapest"]);
}

#[tokio::test]
async fn invalid_postal_code_is_answered_locally() {
    let server = carrier_answering(ResponseTemplate::new(200).set_body_json(json!([])), 0).await;
    let (status, body) = post(app(&server, ShippingConfig::with_credential("token"), None), r#"{"cep": "0131", "product_id": "vase"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "InvalidPostalCode");
    assert!(body["message"].as_str().unwrap().contains("8 digits"));
    assert!(body.get("contactUrl").is_none());
}

#[tokio::test]
async fn item_without_dimensions_is_answered_locally() {
    let server = carrier_answering(ResponseTemplate::new(200).set_body_json(json!([])), 0).await;
    let (_, body) = post(app(&server, ShippingConfig::with_credential("token"), None), r#"{"cep": "01310200", "product_id": "poster"}"#).await;
    assert_eq!(body["error"], "MissingDimensions");
}

#[tokio::test]
async fn missing_credential_is_answered_locally() {
    let server = carrier_answering(ResponseTemplate::new(200).set_body_json(json!([])), 0).await;
    let (_, body) = post(app(&server, ShippingConfig::without_credential(), None), r#"{"cep": "01310200", "product_id": "vase"}"#).await;
    assert_eq!(body["error"], "CarrierServiceUnavailable");
}

#[tokio::test]
async fn carrier_bad_request_means_manual_delivery() {
    let server = carrier_answering(ResponseTemplate::new(400).set_body_json(json!({"message": "CEP de destino inválido"})), 1).await;
    let contacts = ContactLinks::new("5547999990000");
    let (status, body) = post(app(&server, ShippingConfig::with_credential("token"), contacts), r#"{"cep": "89010-110", "product_id": "vase"}"#).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "UnserviceableAddress");
    let contact = body["contactUrl"].as_str().unwrap();
    assert!(contact.starts_with("https://wa.me/5547999990000?text="));
    assert!(contact.contains("vase"));
}

#[tokio::test]
async fn carrier_outage_is_a_carrier_error() {
    let server = carrier_answering(ResponseTemplate::new(503).set_body_string("upstream unavailable"), 1).await;
    let (_, body) = post(app(&server, ShippingConfig::with_credential("token"), None), r#"{"cep": "01310200", "product_id": "vase"}"#).await;
    assert_eq!(body["error"], "CarrierApiError");
}

#[tokio::test]
async fn error_envelope_without_options() {
    let server = carrier_answering(ResponseTemplate::new(200).set_body_json(json!({"error": "Origem e destino muito próximos"})), 1).await;
    let (_, body) = post(app(&server, ShippingConfig::with_credential("token"), None), r#"{"cep": "89010110", "product_id": "vase"}"#).await;
    assert_eq!(body["error"], "NoOptionsAvailable");
    assert!(body["message"].as_str().unwrap().contains("local deliveries"));
}

#[tokio::test]
async fn malformed_body_is_an_invalid_request() {
    let server = carrier_answering(ResponseTemplate::new(200).set_body_json(json!([])), 0).await;
    let (status, body) = post(app(&server, ShippingConfig::with_credential("token"), None), "{not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "InvalidRequest");
    assert!(body.get("contactUrl").is_none());
}

#[tokio::test]
async fn malformed_body_links_to_general_contact() {
    let server = carrier_answering(ResponseTemplate::new(200).set_body_json(json!([])), 0).await;
    let contacts = ContactLinks::new("5547999990000");
    let expected = contacts.as_ref().map(ContactLinks::general).unwrap();
    let (status, body) = post(app(&server, ShippingConfig::with_credential("token"), contacts), "{not json").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["error"], "InvalidRequest");
    assert_eq!(body["contactUrl"], expected);
}

#[tokio::test]
async fn health() {
    let server = MockServer::start().await;
    let response = app(&server, ShippingConfig::without_credential(), None)
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
