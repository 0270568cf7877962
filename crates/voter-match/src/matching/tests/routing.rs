use super::common::*;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceExt;

use crate::matching::directory::InMemoryDirectory;
use crate::matching::guard::RangePolicy;
use crate::matching::router::{issues_handler, match_handler, match_router, IssuesQuery};
use crate::matching::service::MatchService;

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&body).expect("serialize body")))
        .expect("request builds")
}

#[tokio::test]
async fn match_route_returns_ranked_candidates() {
    let router = match_router(Arc::new(build_service(RangePolicy::Reject)));

    let response = router
        .oneshot(post_json(
            "/api/v1/match-candidates",
            json!({
                "zipCode": ZIP,
                "responses": [
                    { "issueId": "i-schools", "position": 5, "importance": 5 },
                    { "issueId": "i-transit", "position": 4, "importance": 2 }
                ]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(true));
    let matches = payload["matches"].as_array().expect("matches array");
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["id"], json!("c-ada"));
    assert_eq!(matches[0]["matchPercentage"], json!(100));
    let detail = &matches[1]["agreementDetails"][1];
    assert_eq!(detail["issueId"], json!("i-transit"));
    assert_eq!(detail["candidatePosition"], json!(3));
    assert_eq!(detail["difference"], json!(1));
}

#[tokio::test]
async fn match_route_rejects_missing_parameters() {
    let router = match_router(Arc::new(build_service(RangePolicy::Reject)));

    let response = router
        .oneshot(post_json(
            "/api/v1/match-candidates",
            json!({ "zipCode": ZIP }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert_eq!(payload["error"], json!("Missing required parameters"));
}

#[tokio::test]
async fn match_route_treats_null_fields_as_missing() {
    for body in [
        json!({ "zipCode": ZIP, "responses": null }),
        json!({ "zipCode": null, "responses": [
            { "issueId": "i-schools", "position": 5, "importance": 5 }
        ] }),
    ] {
        let router = match_router(Arc::new(build_service(RangePolicy::Reject)));
        let response = router
            .oneshot(post_json("/api/v1/match-candidates", body))
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let payload = read_json_body(response).await;
        assert_eq!(payload["success"], json!(false));
        assert_eq!(payload["error"], json!("Missing required parameters"));
    }
}

#[tokio::test]
async fn match_route_wraps_malformed_bodies_in_error_shape() {
    let router = match_router(Arc::new(build_service(RangePolicy::Reject)));

    let response = router
        .oneshot(post_json(
            "/api/v1/match-candidates",
            json!({
                "zipCode": ZIP,
                "responses": [{ "issueId": "i-schools", "position": 2.5, "importance": 5 }]
            }),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
    assert!(payload["error"]
        .as_str()
        .expect("error message")
        .contains("position"));
}

#[tokio::test]
async fn match_route_rejects_non_json_content_type() {
    let router = match_router(Arc::new(build_service(RangePolicy::Reject)));

    let response = router
        .oneshot(
            Request::post("/api/v1/match-candidates")
                .body(Body::from("zipCode=77493"))
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
}

#[tokio::test]
async fn match_handler_reports_empty_area() {
    let service = Arc::new(build_service(RangePolicy::Reject));
    let request = crate::matching::guard::MatchRequest {
        zip_code: "99501".to_string(),
        responses: vec![response("i-transit", 2, 3)],
    };

    let response = match_handler::<InMemoryDirectory, InMemoryDirectory>(
        State(service),
        Ok(axum::Json(request)),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["matches"], json!([]));
    assert_eq!(payload["message"], json!("No candidates found for your area"));
}

#[tokio::test]
async fn match_handler_returns_internal_error_when_directory_offline() {
    let service = Arc::new(MatchService::new(
        Arc::new(OfflineDirectory),
        Arc::new(OfflineDirectory),
        RangePolicy::Reject,
    ));

    let response = match_handler::<OfflineDirectory, OfflineDirectory>(
        State(service),
        Ok(axum::Json(request(vec![response("i-schools", 5, 5)]))),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["success"], json!(false));
}

#[tokio::test]
async fn issues_route_filters_by_region() {
    let router = match_router(Arc::new(build_service(RangePolicy::Reject)));

    let response = router
        .oneshot(
            Request::get("/api/v1/issues?region=UT")
                .body(Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let titles: Vec<&str> = payload["issues"]
        .as_array()
        .expect("issues array")
        .iter()
        .filter_map(|issue| issue["id"].as_str())
        .collect();
    assert_eq!(titles, vec!["i-transit", "i-water"]);
}

#[tokio::test]
async fn issues_handler_lists_everything_without_region() {
    let service = Arc::new(build_service(RangePolicy::Reject));

    let response = issues_handler::<InMemoryDirectory, InMemoryDirectory>(
        State(service),
        Query(IssuesQuery::default()),
    )
    .await;

    let payload = read_json_body(response).await;
    assert_eq!(payload["issues"].as_array().map(Vec::len), Some(3));
    assert_eq!(payload["issues"][0]["category"], json!("local"));
}
