//! Axum adapter for the payment entry points
//!
//! Routes:
//! - POST /payments - Create a payment
//! - GET /payments - List payments, optionally `?currency=`
//! - GET /payments/{id} - Get one payment

use crate::core::request::RawRequest;
use crate::core::response::ApiResponse;
use crate::server::handlers::PaymentEndpoints;
use axum::body::Bytes;
use axum::extract::rejection::{BytesRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{Method, Uri};
use axum::{Router, routing::get};
use std::collections::HashMap;
use tower_http::trace::TraceLayer;

type PathParams = Result<Path<HashMap<String, String>>, PathRejection>;
type QueryParams = Result<Query<HashMap<String, String>>, QueryRejection>;
type BodyBytes = Result<Bytes, BytesRejection>;

// Extractor rejections are not answered by axum: the request still goes
// through the pipeline so every response keeps the JSON shape.

fn query_params(extracted: QueryParams) -> HashMap<String, String> {
    match extracted {
        Ok(Query(query)) => query,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Query string could not be decoded");
            HashMap::new()
        }
    }
}

fn body_bytes(extracted: BodyBytes) -> Bytes {
    extracted.unwrap_or_else(|rejection| {
        tracing::warn!(error = %rejection, "Request body could not be read");
        Bytes::new()
    })
}

/// Path parameter `key` taken from the last URI segment, still percent-encoded
fn undecoded_segment(uri: &Uri, key: &str) -> HashMap<String, String> {
    uri.path()
        .rsplit('/')
        .next()
        .filter(|segment| !segment.is_empty())
        .map(|segment| HashMap::from([(key.to_string(), segment.to_string())]))
        .unwrap_or_default()
}

fn raw_request(
    method: Method,
    uri: &Uri,
    path_params: HashMap<String, String>,
    query_params: HashMap<String, String>,
    body: Bytes,
) -> RawRequest {
    let mut request = RawRequest::new(method, uri.path());
    request.path_params = path_params;
    request.query_params = query_params;
    request.with_body(body.to_vec())
}

async fn create_payment(
    State(endpoints): State<PaymentEndpoints>,
    method: Method,
    uri: Uri,
    query: QueryParams,
    body: BodyBytes,
) -> ApiResponse {
    let request = raw_request(
        method,
        &uri,
        HashMap::new(),
        query_params(query),
        body_bytes(body),
    );
    endpoints.create.dispatch(request).await
}

async fn get_payment(
    State(endpoints): State<PaymentEndpoints>,
    method: Method,
    uri: Uri,
    path: PathParams,
    query: QueryParams,
    body: BodyBytes,
) -> ApiResponse {
    let path = match path {
        Ok(Path(path)) => path,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Path parameters could not be decoded");
            undecoded_segment(&uri, "id")
        }
    };

    let request = raw_request(method, &uri, path, query_params(query), body_bytes(body));
    endpoints.get.dispatch(request).await
}

async fn list_payments(
    State(endpoints): State<PaymentEndpoints>,
    method: Method,
    uri: Uri,
    query: QueryParams,
    body: BodyBytes,
) -> ApiResponse {
    let request = raw_request(
        method,
        &uri,
        HashMap::new(),
        query_params(query),
        body_bytes(body),
    );
    endpoints.list.dispatch(request).await
}

/// Build the payment routes
pub fn build_payment_routes(endpoints: PaymentEndpoints) -> Router {
    Router::new()
        .route("/payments", get(list_payments).post(create_payment))
        .route("/payments/{id}", get(get_payment))
        .layer(TraceLayer::new_for_http())
        .with_state(endpoints)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::PaymentService;
    use crate::storage::InMemoryPaymentRepository;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let service = PaymentService::new(Arc::new(InMemoryPaymentRepository::new()));
        build_payment_routes(PaymentEndpoints::new(service))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_raw_request_from_parts() {
        let uri: Uri = "/payments/abc?x=1".parse().unwrap();
        let request = raw_request(
            Method::GET,
            &uri,
            HashMap::from([("id".to_string(), "abc".to_string())]),
            HashMap::from([("x".to_string(), "1".to_string())]),
            Bytes::new(),
        );

        assert_eq!(request.path, "/payments/abc");
        assert_eq!(request.body, None);
        assert_eq!(request.path_params["id"], "abc");
        assert_eq!(request.query_params["x"], "1");
    }

    #[test]
    fn test_raw_request_keeps_body_bytes() {
        let uri: Uri = "/payments".parse().unwrap();
        let request = raw_request(
            Method::POST,
            &uri,
            HashMap::new(),
            HashMap::new(),
            Bytes::from_static(b"{\"amount\":1}"),
        );

        assert_eq!(request.body.as_deref(), Some(&b"{\"amount\":1}"[..]));
    }

    #[tokio::test]
    async fn test_post_payments_routes_to_create() {
        let request = Request::builder()
            .method("POST")
            .uri("/payments")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"amount":10,"currency":"nzd"}"#))
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["currency"], "NZD");
    }

    #[tokio::test]
    async fn test_get_payment_passes_path_id() {
        let request = Request::builder()
            .uri("/payments/123")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["message"], "Payment ID must be a valid UUID format");
    }

    #[tokio::test]
    async fn test_undecodable_path_id_is_json_400() {
        let request = Request::builder()
            .uri("/payments/%FF")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Payment ID must be a valid UUID format");
    }

    #[test]
    fn test_undecoded_segment() {
        let uri: Uri = "/payments/%FF".parse().unwrap();
        assert_eq!(undecoded_segment(&uri, "id")["id"], "%FF");

        let trailing: Uri = "/payments/".parse().unwrap();
        assert!(undecoded_segment(&trailing, "id").is_empty());
    }

    #[tokio::test]
    async fn test_list_payments_reads_query() {
        let request = Request::builder()
            .uri("/payments?currency=%20usd%20")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["data"], Value::Array(vec![]));
    }
}
