//! Integration tests for student API endpoints

use axum::http::{Method, StatusCode};
use serde_json::json;

mod helpers;
use helpers::{
    count_rows, create_student, empty_request, json_request, send, setup_test_app,
    setup_test_db,
};

#[tokio::test]
async fn test_create_student() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    let body = json!({ "name": "Asha", "roll_number": "R1", "class": "5", "section": "A" });
    let response = send(&app, json_request(Method::POST, "/api/v1/students", &body)).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let json = response.json();
    assert_eq!(json["status"], "success");
    assert!(uuid::Uuid::parse_str(json["student_id"].as_str().unwrap()).is_ok());
    assert_eq!(count_rows(&pool, "students").await, 1);
}

#[tokio::test]
async fn test_create_student_duplicate_roll_number() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;
    create_student(&app, "Asha", "R1").await;

    let body = json!({ "name": "Ravi", "roll_number": "R1", "class": "6", "section": "B" });
    let response = send(&app, json_request(Method::POST, "/api/v1/students", &body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json(),
        json!({ "roll_number": ["student with this roll number already exists."] })
    );
    assert_eq!(count_rows(&pool, "students").await, 1);

    // A different roll number is fine
    create_student(&app, "Ravi", "R2").await;
}

#[tokio::test]
async fn test_create_student_field_errors() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    let body = json!({ "name": "", "roll_number": "R1", "section": "TOOLONG" });
    let response = send(&app, json_request(Method::POST, "/api/v1/students", &body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let json = response.json();
    assert_eq!(json["name"], json!(["This field may not be blank."]));
    assert_eq!(json["class"], json!(["This field is required."]));
    assert_eq!(
        json["section"],
        json!(["Ensure this field has no more than 5 characters."])
    );
    assert!(json.get("roll_number").is_none());
    assert_eq!(count_rows(&pool, "students").await, 0);
}

#[tokio::test]
async fn test_create_student_numeric_fields_are_text() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    let body = json!({ "name": "Asha", "roll_number": "R1", "class": 5, "section": "A" });
    let response = send(&app, json_request(Method::POST, "/api/v1/students", &body)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let student_id = response.json()["student_id"].as_str().unwrap().to_string();
    let response = send(
        &app,
        empty_request(Method::GET, &format!("/api/v1/students/{}", student_id)),
    )
    .await;
    assert_eq!(response.json()["class"], "5");
}

#[tokio::test]
async fn test_create_student_mistyped_fields() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;

    let body = json!({ "name": ["Asha"], "roll_number": true, "class": null, "section": "A" });
    let response = send(&app, json_request(Method::POST, "/api/v1/students", &body)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    let json = response.json();
    assert_eq!(json["name"], json!(["Not a valid string."]));
    assert_eq!(json["roll_number"], json!(["Not a valid string."]));
    assert_eq!(json["class"], json!(["This field may not be null."]));
    assert!(json.get("section").is_none());
    assert!(json.get("error").is_none());
    assert_eq!(count_rows(&pool, "students").await, 0);
}

#[tokio::test]
async fn test_create_student_malformed_body() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/api/v1/students")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();
    let response = send(&app, request).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json()["error"].is_string());
}

#[tokio::test]
async fn test_get_student() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;
    let student_id = create_student(&app, "Asha", "R1").await;

    let uri = format!("/api/v1/students/{}", student_id);
    let response = send(&app, empty_request(Method::GET, &uri)).await;

    assert_eq!(response.status, StatusCode::OK);
    let json = response.json();
    assert_eq!(json["id"], student_id);
    assert_eq!(json["name"], "Asha");
    assert_eq!(json["roll_number"], "R1");
    assert_eq!(json["class"], "5");
    assert_eq!(json["section"], "A");
    assert!(json["created_at"].is_string());
}

#[tokio::test]
async fn test_get_student_not_found() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool).await;

    for uri in [
        format!("/api/v1/students/{}", uuid::Uuid::new_v4()),
        "/api/v1/students/42".to_string(),
    ] {
        let response = send(&app, empty_request(Method::GET, &uri)).await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json(), json!({ "error": "Student not found" }));
    }
}

#[tokio::test]
async fn test_delete_student_cascades() {
    let pool = setup_test_db().await;
    let app = setup_test_app(pool.clone()).await;
    let student_id = create_student(&app, "Asha", "R1").await;

    let submit = json!({ "subjects": [{ "name": "Math", "marks": 88 }], "final_comments": "Good" });
    let uri = format!("/api/v1/reportcards/{}", student_id);
    let response = send(&app, json_request(Method::POST, &uri, &submit)).await;
    assert_eq!(response.status, StatusCode::CREATED);

    let student_uri = format!("/api/v1/students/{}", student_id);
    let response = send(&app, empty_request(Method::DELETE, &student_uri)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({ "status": "deleted", "student_id": student_id }));

    assert_eq!(count_rows(&pool, "students").await, 0);
    assert_eq!(count_rows(&pool, "student_subjects").await, 0);
    assert_eq!(count_rows(&pool, "report_cards").await, 0);
    assert_eq!(count_rows(&pool, "subjects").await, 1);

    let response = send(&app, empty_request(Method::GET, &uri)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);

    let response = send(&app, empty_request(Method::DELETE, &student_uri)).await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
