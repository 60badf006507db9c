//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::test as actix_test;
use actix_web::{web, App, HttpResponse};
use rstest::{fixture, rstest};
use serde::Deserialize;
use serde_json::json;

const TRACE_ID: &str = "00000000-0000-0000-0000-000000000000";

#[fixture]
fn backend_failure() -> Error {
    Error::internal("connection refused by 10.0.0.5")
        .with_trace_id(TRACE_ID)
        .with_details(json!({ "host": "10.0.0.5" }))
}

async fn decode(response: HttpResponse) -> Error {
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    serde_json::from_slice(&bytes).expect("error payload deserialises")
}

#[rstest]
#[case(ErrorCode::InvalidRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::OperationDisabled, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::NotFound, StatusCode::BAD_REQUEST)]
#[case(ErrorCode::Unsupported, StatusCode::NOT_IMPLEMENTED)]
#[case(ErrorCode::InternalError, StatusCode::INTERNAL_SERVER_ERROR)]
fn status_follows_error_code(#[case] code: ErrorCode, #[case] status: StatusCode) {
    assert_eq!(status_for(code), status);
}

#[rstest]
#[actix_web::test]
async fn internal_errors_are_redacted(backend_failure: Error) {
    let response = ResponseError::error_response(&backend_failure);
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok()),
        Some(TRACE_ID)
    );

    let payload = decode(response).await;
    assert_eq!(payload.code(), ErrorCode::InternalError);
    assert_eq!(payload.message(), "Internal server error");
    assert_eq!(payload.trace_id(), Some(TRACE_ID));
    assert!(payload.details().is_none());
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let error = Error::operation_disabled("create operation is disabled")
        .with_details(json!({ "operation": "create" }));

    let response = ResponseError::error_response(&error);
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers().get(TRACE_ID_HEADER).is_none());

    let payload = decode(response).await;
    assert_eq!(payload.code(), ErrorCode::OperationDisabled);
    assert_eq!(payload.message(), "create operation is disabled");
    assert_eq!(payload.details(), Some(&json!({ "operation": "create" })));
}

#[rstest]
fn actix_errors_become_redacted_internal_errors() {
    let err: Error = actix_web::error::ErrorBadRequest("boom").into();
    assert_eq!(err.code(), ErrorCode::InternalError);
    assert_eq!(err.message(), "Internal server error");
    assert!(err.details().is_none());
}

#[derive(Deserialize)]
struct SurnameOnly {
    #[expect(dead_code, reason = "only deserialised")]
    surname: String,
}

#[rstest]
#[case("{\"surname\": 1}")]
#[case("not json")]
#[actix_web::test]
async fn malformed_json_is_an_invalid_request(#[case] body: &'static str) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route(
                "/",
                web::post().to(|_: web::Json<SurnameOnly>| async { HttpResponse::Ok().finish() }),
            ),
    )
    .await;
    let req = actix_test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let payload: Error = actix_test::read_body_json(res).await;
    assert_eq!(payload.code(), ErrorCode::InvalidRequest);
}
