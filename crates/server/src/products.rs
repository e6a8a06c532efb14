use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, warn};

use storefront_core::domain::product::{Product, ProductInput};
use storefront_core::envelope::Envelope;
use storefront_core::errors::{CatalogError, ErrorKind};
use storefront_db::CatalogStore;

pub type Failure = (StatusCode, Json<Envelope<()>>);
type Reply<T> = Result<(StatusCode, Json<Envelope<T>>), Failure>;

pub fn router(store: CatalogStore) -> Router {
    Router::new()
        .route("/api/products", get(list_products).post(create_product))
        .route(
            "/api/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(store)
}

pub async fn list_products(State(store): State<CatalogStore>) -> Reply<Vec<Product>> {
    let products = store.list().await.map_err(failure)?;
    Ok((StatusCode::OK, Json(Envelope::ok(products))))
}

pub async fn get_product(
    State(store): State<CatalogStore>,
    Path(id): Path<String>,
) -> Reply<Product> {
    let product = store.find(&id).await.map_err(failure)?;
    Ok((StatusCode::OK, Json(Envelope::ok(product))))
}

pub async fn create_product(
    State(store): State<CatalogStore>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Reply<Product> {
    let Json(input) = payload.map_err(rejected_body)?;
    let product = store.create(input).await.map_err(failure)?;
    Ok((StatusCode::CREATED, Json(Envelope::ok(product))))
}

pub async fn update_product(
    State(store): State<CatalogStore>,
    Path(id): Path<String>,
    payload: Result<Json<ProductInput>, JsonRejection>,
) -> Reply<Product> {
    let Json(input) = payload.map_err(rejected_body)?;
    let product = store.update_by_id(&id, input).await.map_err(failure)?;
    Ok((StatusCode::OK, Json(Envelope::ok(product))))
}

pub async fn delete_product(
    State(store): State<CatalogStore>,
    Path(id): Path<String>,
) -> Reply<()> {
    store.delete_by_id(&id).await.map_err(failure)?;
    Ok((StatusCode::OK, Json(Envelope::ok_message("Product deleted"))))
}

/// Maps a store error onto its status code and the caller-facing message.
pub fn failure(error: CatalogError) -> Failure {
    let status = match error.kind() {
        ErrorKind::Validation | ErrorKind::MalformedIdentifier => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Backend => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_client_error() {
        info!(
            event_name = "catalog.request.rejected",
            status = status.as_u16(),
            error = %error,
            "catalog request rejected"
        );
    }
    (status, Json(Envelope::failure(error.user_message())))
}

fn rejected_body(rejection: JsonRejection) -> Failure {
    warn!(
        event_name = "catalog.request.invalid_body",
        error = %rejection.body_text(),
        "request body is not a valid product payload"
    );
    (
        StatusCode::BAD_REQUEST,
        Json(Envelope::failure(format!("Invalid request body: {}", rejection.body_text()))),
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        Router,
    };
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use storefront_core::domain::product::{Product, ProductId};
    use storefront_db::repositories::{
        InMemoryProductRepository, ProductRepository, RepositoryError,
    };
    use storefront_db::CatalogStore;

    use super::router;

    fn app() -> Router {
        router(CatalogStore::new(Arc::new(InMemoryProductRepository::default())))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };
        let response =
            app.clone().oneshot(request.body(body).expect("request")).await.expect("response");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn widget() -> Value {
        json!({"name": "Widget", "price": 9.99, "image": "http://x/y.png"})
    }

    #[tokio::test]
    async fn create_returns_201_with_stored_record() {
        let app = app();

        let (status, body) = send(&app, "POST", "/api/products", Some(widget())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], json!(true));
        assert_eq!(body["data"]["price"], json!(9.99));
        assert!(body["data"]["id"].as_str().is_some());
        assert!(body["data"]["createdAt"].as_str().is_some());
    }

    #[tokio::test]
    async fn create_with_missing_fields_is_400_envelope() {
        let app = app();

        let (status, body) =
            send(&app, "POST", "/api/products", Some(json!({"name": "Widget"}))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], json!(false));
        let message = body["message"].as_str().expect("message");
        assert!(message.contains("price is required"));
        assert!(message.contains("image is required"));
    }

    #[tokio::test]
    async fn malformed_json_is_400_envelope() {
        let app = app();
        let request = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from("{not json"))
            .expect("request");

        let response = app.oneshot(request).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
        let body: Value = serde_json::from_slice(&bytes).expect("json envelope");
        assert_eq!(body["success"], json!(false));
    }

    #[tokio::test]
    async fn malformed_id_is_400_and_unknown_id_is_404() {
        let app = app();

        let (status, body) =
            send(&app, "PUT", "/api/products/abc", Some(json!({"price": 1}))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], json!("Invalid Product ID"));

        let (status, _) = send(&app, "DELETE", "/api/products/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let unknown = format!("/api/products/{}", ProductId::new());
        let (status, body) = send(&app, "PUT", &unknown, Some(json!({"price": 1}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], json!("Product not found"));

        let (status, _) = send(&app, "DELETE", &unknown, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, listing) = send(&app, "GET", "/api/products", None).await;
        assert_eq!(listing["data"], json!([]));
    }

    #[tokio::test]
    async fn create_update_delete_scenario() {
        let app = app();

        let (_, created) = send(&app, "POST", "/api/products", Some(widget())).await;
        let id = created["data"]["id"].as_str().expect("id").to_string();
        let uri = format!("/api/products/{id}");

        let (status, updated) = send(&app, "PUT", &uri, Some(json!({"price": 12.5}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["data"]["price"], json!(12.5));
        assert_eq!(updated["data"]["name"], json!("Widget"));
        assert_eq!(updated["data"]["image"], json!("http://x/y.png"));

        let (status, fetched) = send(&app, "GET", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"], updated["data"]);

        let (status, deleted) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(deleted, json!({"success": true, "message": "Product deleted"}));

        let (status, listing) = send(&app, "GET", "/api/products", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(listing["data"], json!([]));

        let (status, _) = send(&app, "DELETE", &uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    struct UnreachableDatabase;

    fn outage() -> RepositoryError {
        RepositoryError::Decode("connection refused by /var/lib/storefront.db".to_string())
    }

    #[async_trait]
    impl ProductRepository for UnreachableDatabase {
        async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
            Err(outage())
        }
        async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, RepositoryError> {
            Err(outage())
        }
        async fn insert(&self, _product: Product) -> Result<(), RepositoryError> {
            Err(outage())
        }
        async fn update(&self, _product: Product) -> Result<bool, RepositoryError> {
            Err(outage())
        }
        async fn delete(&self, _id: &ProductId) -> Result<bool, RepositoryError> {
            Err(outage())
        }
    }

    #[tokio::test]
    async fn storage_failures_are_500_with_generic_message() {
        let app = router(CatalogStore::new(Arc::new(UnreachableDatabase)));
        let uri = format!("/api/products/{}", ProductId::new());
        let expected = json!({"success": false, "message": "Server error"});

        let attempts = [
            ("GET", "/api/products".to_string(), None),
            ("POST", "/api/products".to_string(), Some(widget())),
            ("GET", uri.clone(), None),
            ("PUT", uri.clone(), Some(json!({"price": 12.5}))),
            ("DELETE", uri, None),
        ];
        for (method, uri, body) in attempts {
            let (status, reply) = send(&app, method, &uri, body).await;

            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR, "{method} {uri}");
            assert_eq!(reply, expected, "{method} {uri}");
            assert!(!reply.to_string().contains("connection refused"));
        }
    }
}
