//! Router-shape tests: route generation, metadata routes, augmentation
//! matching, and request validation that happens before any storage access.
//! The pool is lazy and never connects; only DB-free routes are exercised.

use admin_panel_sdk::{
    build_router, resolve, AugmentGroup, NameMatcher, PanelOptions, SchemaConfig, SchemaModel,
};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

fn schema_model() -> SchemaModel {
    let config: SchemaConfig = serde_json::from_value(serde_json::json!({
        "entities": [
            {
                "name": "User",
                "dbName": "users",
                "documentation": "Registered accounts",
                "fields": [
                    {"name": "id", "type": "Int", "isId": true, "hasDefault": true},
                    {"name": "email", "type": "String", "isUnique": true}
                ]
            },
            {
                "name": "Post",
                "fields": [
                    {"name": "id", "type": "Int", "isId": true, "hasDefault": true},
                    {"name": "title", "type": "String"}
                ]
            }
        ]
    }))
    .expect("schema config");
    resolve(&config).expect("resolve")
}

fn lazy_pool() -> sqlx::PgPool {
    sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost/never_connected")
        .expect("lazy pool")
}

fn router(options: PanelOptions) -> Router {
    build_router(lazy_pool(), schema_model(), options)
}

async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn every_entity_gets_a_fields_route_under_its_route_name() {
    let app = router(PanelOptions::default());
    let (status, body) = get(app.clone(), "/user/fields").await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["id", "email"]);

    let (status, _) = get(app, "/post/fields").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn route_names_are_lower_first_cased() {
    let app = router(PanelOptions::default());
    let (status, _) = get(app.clone(), "/Post/fields").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(app, "/post/fields").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn base_path_prefixes_all_routes() {
    let app = router(PanelOptions {
        base_path: "/admin".into(),
        ..Default::default()
    });
    let (status, _) = get(app.clone(), "/admin/user/fields").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(app, "/user/fields").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metadata_routes_list_all_entities_and_count() {
    let app = router(PanelOptions::default());
    let (status, body) = get(app.clone(), "/db-tables/list").await;
    assert_eq!(status, StatusCode::OK);
    let list = body.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["name"], "User");
    assert_eq!(list[0]["dbName"], "users");
    assert_eq!(list[0]["documentation"], "Registered accounts");
    assert_eq!(list[1]["dbName"], "Post");

    let (status, body) = get(app, "/db-tables/count").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, serde_json::json!(2));
}

#[tokio::test]
async fn custom_tables_path_is_honored() {
    let app = router(PanelOptions {
        tables_path: "meta".into(),
        ..Default::default()
    });
    let (status, _) = get(app.clone(), "/meta/count").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = get(app, "/db-tables/count").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn entity_predicate_drops_routes_but_not_metadata() {
    let app = router(PanelOptions {
        include_entity: Some(Arc::new(|e| e.name != "Post")),
        ..Default::default()
    });
    let (status, _) = get(app.clone(), "/post/fields").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = get(app.clone(), "/user/fields").await;
    assert_eq!(status, StatusCode::OK);
    // The metadata listing covers the whole schema, filtered or not.
    let (_, body) = get(app, "/db-tables/count").await;
    assert_eq!(body, serde_json::json!(2));
}

fn header_augmentation() -> AugmentGroup {
    AugmentGroup {
        augment: vec![Arc::new(|router: Router| {
            router.layer(axum::middleware::from_fn(
                |req: axum::extract::Request, next: axum::middleware::Next| async move {
                    let mut res = next.run(req).await;
                    res.headers_mut()
                        .insert("x-augmented", "1".parse().unwrap());
                    res
                },
            ))
        })],
        include: Some(vec![NameMatcher::literal("user")]),
        exclude: vec![],
    }
}

#[tokio::test]
async fn augmentation_include_applies_only_to_named_entity() {
    let app = router(PanelOptions {
        augmentations: vec![header_augmentation()],
        ..Default::default()
    });
    let response = app
        .clone()
        .oneshot(Request::builder().uri("/user/fields").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.headers().get("x-augmented").unwrap(), "1");

    let response = app
        .oneshot(Request::builder().uri("/post/fields").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert!(response.headers().get("x-augmented").is_none());
}

#[tokio::test]
async fn null_filters_is_an_explicit_bad_request() {
    // Rejected while reading the filters parameter, before any storage access.
    let app = router(PanelOptions::default());
    let (status, body) = get(app, "/user?filters=null").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
    assert!(body["error"]["details"].is_string());
}

#[tokio::test]
async fn non_object_create_body_is_bad_request() {
    let app = router(PanelOptions::default());
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/user")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("[1, 2]"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
