use actix_web::http::StatusCode;
use serde_json::json;
use woo_tools::{CatalogApiError, CatalogProductRef, PayloadImage};

use super::{
    helpers::{configure_webhook, post_request, sign},
    mocks::MockCatalog,
};
use crate::config::ReplicatorOptions;

fn sample_product() -> String {
    json!({
        "name": "Linen Shirt",
        "type": "simple",
        "status": "publish",
        "description": "A shirt.",
        "short_description": "Shirt",
        "price": "10.00",
        "regular_price": "15.00",
        "sale_price": "10.00",
        "categories": [{"id": 4}],
        "images": [{"src": "https://source.example.com/shirt.jpg"}],
        "attributes": [{
            "id": 7,
            "name": "Size",
            "slug": "size",
            "options": ["S", "M", "L"]
        }],
        "meta_data": [{"key": "_original_product_id", "value": "8841"}]
    })
    .to_string()
}

fn replication_ready_catalog() -> MockCatalog {
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| Ok(vec![]));
    catalog.expect_create_product().returning(|_| Ok(CatalogProductRef { id: 501 }));
    catalog.expect_create_variation().times(3).returning(|_, _| Ok(CatalogProductRef { id: 9000 }));
    catalog
}

#[actix_web::test]
async fn replicates_a_signed_product() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let signature = sign(&body);
    let configure = configure_webhook(replication_ready_catalog(), ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["product_id"], 501);
    assert_eq!(response["message"], "Product replicated with 3 variation(s).");
}

#[actix_web::test]
async fn variations_are_created_in_option_order_with_the_size_selection() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| Ok(vec![]));
    catalog.expect_create_product().withf(|payload| payload.product_type == "variable").returning(|_| {
        Ok(CatalogProductRef { id: 501 })
    });
    let mut seen = Vec::new();
    catalog.expect_create_variation().times(3).returning(move |product_id, variation| {
        assert_eq!(product_id, 501);
        assert_eq!(variation.attributes.len(), 1);
        assert_eq!(variation.attributes[0].id, 7);
        assert_eq!(variation.regular_price, "15.00");
        assert_eq!(variation.sale_price, "10.00");
        assert_eq!(variation.attributes[0].option, ["S", "M", "L"][seen.len()]);
        seen.push(variation.attributes[0].option.clone());
        Ok(CatalogProductRef { id: 9000 })
    });
    let configure = configure_webhook(catalog, ReplicatorOptions::default());
    let (status, _) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn missing_signature_is_rejected_with_401() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    // A strict mock: any outbound call would panic the test.
    let configure = configure_webhook(MockCatalog::new(), ReplicatorOptions::default());
    let (status, response) = post_request(&body, None, configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(response.contains("authentication_failure"));
}

#[actix_web::test]
async fn tampered_signature_is_rejected_with_401() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let mut signature = sign(&body);
    signature.replace_range(0..4, "AAAA");
    let configure = configure_webhook(MockCatalog::new(), ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(response.contains("authentication_failure"));
}

#[actix_web::test]
async fn signature_over_different_bytes_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    // Sign a semantically identical but differently serialized document. Verification must use the raw bytes, so
    // this must fail.
    let reserialized = format!(" {body}");
    let signature = sign(&reserialized);
    let configure = configure_webhook(MockCatalog::new(), ReplicatorOptions::default());
    let (status, _) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn malformed_json_is_rejected_with_400() {
    let _ = env_logger::try_init().ok();
    let body = "this is not json";
    let signature = sign(body);
    let configure = configure_webhook(MockCatalog::new(), ReplicatorOptions::default());
    let (status, response) = post_request(body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("malformed_input"));
}

#[actix_web::test]
async fn missing_origin_id_is_rejected_with_400() {
    let _ = env_logger::try_init().ok();
    let body = json!({"name": "Linen Shirt", "price": "10.00", "meta_data": []}).to_string();
    let signature = sign(&body);
    let configure = configure_webhook(MockCatalog::new(), ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(response.contains("malformed_input"));
    assert!(response.contains("origin identifier"));
}

#[actix_web::test]
async fn redelivered_product_is_skipped() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog
        .expect_find_by_origin_id()
        .withf(|origin_id| origin_id == "8841")
        .returning(|_| Ok(vec![CatalogProductRef { id: 777 }]));
    catalog.expect_create_product().times(0);
    catalog.expect_create_variation().times(0);
    let configure = configure_webhook(catalog, ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["product_id"], 777);
    assert_eq!(response["message"], "Product has already been replicated. Skipping.");
}

#[actix_web::test]
async fn existence_check_failure_aborts_with_500() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| {
        Err(CatalogApiError::QueryError { status: 503, message: "store down for maintenance".into() })
    });
    catalog.expect_create_product().times(0);
    let configure = configure_webhook(catalog, ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.contains("downstream_unavailable"));
    assert!(response.contains("store down for maintenance"));
}

#[actix_web::test]
async fn product_creation_failure_aborts_with_500() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| Ok(vec![]));
    catalog.expect_create_product().returning(|_| {
        Err(CatalogApiError::QueryError { status: 400, message: "woocommerce_rest_cannot_create".into() })
    });
    catalog.expect_create_variation().times(0);
    let configure = configure_webhook(catalog, ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.contains("downstream_unavailable"));
    assert!(response.contains("woocommerce_rest_cannot_create"));
}

#[actix_web::test]
async fn unparseable_price_skips_variations_but_still_replicates() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "name": "Linen Shirt",
        "price": "10.5€",
        "attributes": [{
            "id": 7,
            "name": "Size",
            "slug": "size",
            "options": ["S", "M", "L"]
        }],
        "meta_data": [{"key": "_original_product_id", "value": "8841"}]
    })
    .to_string();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| Ok(vec![]));
    catalog.expect_create_product().returning(|_| Ok(CatalogProductRef { id: 501 }));
    catalog.expect_create_variation().times(0);
    let configure = configure_webhook(catalog, ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["product_id"], 501);
    assert_eq!(response["message"], "Product replicated with 0 variation(s).");
}

#[actix_web::test]
async fn one_failed_variation_does_not_abort_the_others() {
    let _ = env_logger::try_init().ok();
    let body = sample_product();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| Ok(vec![]));
    catalog.expect_create_product().returning(|_| Ok(CatalogProductRef { id: 501 }));
    catalog.expect_create_variation().times(3).returning(|_, variation| {
        if variation.attributes[0].option == "M" {
            Err(CatalogApiError::RestResponseError("connection reset by peer".into()))
        } else {
            Ok(CatalogProductRef { id: 9000 })
        }
    });
    let configure = configure_webhook(catalog, ReplicatorOptions::default());
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["product_id"], 501);
    assert_eq!(response["message"], "Product replicated with 2 variation(s). 1 variation(s) could not be created.");
}

#[actix_web::test]
async fn failed_image_rehosts_are_skipped() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "name": "Linen Shirt",
        "price": "10.00",
        "images": [
            {"src": "https://source.example.com/a.jpg"},
            {"src": "https://source.example.com/dead-link.jpg"}
        ],
        "meta_data": [{"key": "_original_product_id", "value": "8841"}]
    })
    .to_string();
    let signature = sign(&body);
    let mut catalog = MockCatalog::new();
    catalog.expect_find_by_origin_id().returning(|_| Ok(vec![]));
    catalog.expect_rehost_image().times(2).returning(|src_url| {
        if src_url.contains("dead-link") {
            Err(CatalogApiError::MediaFetchError { url: src_url.to_string(), message: "HTTP 404".into() })
        } else {
            Ok(42)
        }
    });
    catalog
        .expect_create_product()
        .withf(|payload| payload.images == vec![PayloadImage::Rehosted { id: 42 }])
        .returning(|_| Ok(CatalogProductRef { id: 501 }));
    let options = ReplicatorOptions { rehost_images: true, ..ReplicatorOptions::default() };
    let configure = configure_webhook(catalog, options);
    let (status, response) = post_request(&body, Some(&signature), configure).await;
    assert_eq!(status, StatusCode::OK);
    let response: serde_json::Value = serde_json::from_str(&response).unwrap();
    assert_eq!(response["success"], true);
    assert_eq!(response["images_rehosted"], 1);
}

mod misc {
    use actix_web::{body::MessageBody, test, test::TestRequest, App};

    use crate::routes::health;

    #[actix_web::test]
    async fn health_endpoint() {
        let app = test::init_service(App::new().service(health)).await;
        let req = TestRequest::get().uri("/health").to_request();
        let (_req, res) = test::call_service(&app, req).await.into_parts();
        let status = res.status();
        let body = res.into_body().try_into_bytes().unwrap();
        assert!(status.is_success());
        assert_eq!(body, "👍️\n");
    }
}
