use actix_web::{body::MessageBody, http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use prg_common::Secret;

use super::mocks::MockCatalog;
use crate::{
    config::ReplicatorOptions,
    helpers::calculate_hmac,
    middleware::HmacMiddlewareFactory,
    replication::ReplicationApi,
    routes::ProductCreatedWebhookRoute,
};

pub const TEST_SECRET: &str = "wh_test_secret";
pub const SIGNATURE_HEADER: &str = "x-wc-webhook-signature";

/// A valid signature for the given body, as the source store would compute it.
pub fn sign(body: &str) -> String {
    calculate_hmac(TEST_SECRET, body.as_bytes())
}

/// Registers the webhook route backed by the given mock catalog.
pub fn configure_webhook(catalog: MockCatalog, options: ReplicatorOptions) -> impl FnOnce(&mut ServiceConfig) {
    move |cfg: &mut ServiceConfig| {
        let api = ReplicationApi::new(catalog, options);
        cfg.service(ProductCreatedWebhookRoute::<MockCatalog>::new()).app_data(web::Data::new(api));
    }
}

/// POSTs `body` to the webhook route behind the HMAC middleware and returns the response status and body. Middleware
/// rejections are rendered through their error response so callers always get a status code to assert on.
pub async fn post_request<F: FnOnce(&mut ServiceConfig)>(
    body: &str,
    signature: Option<&str>,
    configure: F,
) -> (StatusCode, String) {
    let mut req = TestRequest::post().uri("/webhook/product_created").set_payload(body.to_string());
    if let Some(signature) = signature {
        req = req.insert_header((SIGNATURE_HEADER, signature));
    }
    let req = req.to_request();
    let hmac = HmacMiddlewareFactory::new(SIGNATURE_HEADER, Secret::new(TEST_SECRET.to_string()), true);
    let app = App::new().wrap(hmac).configure(configure);
    let service = test::init_service(app).await;
    let (status, body) = match test::try_call_service(&service, req).await {
        Ok(res) => {
            let (_, res) = res.into_parts();
            let status = res.status();
            let body = res.into_body().try_into_bytes().unwrap();
            (status, body)
        },
        Err(e) => {
            let res = e.error_response();
            let status = res.status();
            let body = res.into_body().try_into_bytes().unwrap();
            (status, body)
        },
    };
    (status, String::from_utf8_lossy(&body).into_owned())
}
