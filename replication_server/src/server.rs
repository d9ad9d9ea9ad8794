use std::time::Duration;

use actix_web::{dev::Server, http::KeepAlive, middleware::Logger, web, App, HttpServer};
use woo_tools::WooApi;

use crate::{
    config::ServerConfig,
    errors::ServerError,
    middleware::HmacMiddlewareFactory,
    replication::ReplicationApi,
    routes::{health, ProductCreatedWebhookRoute},
};

pub async fn run_server(config: ServerConfig) -> Result<(), ServerError> {
    let srv = create_server_instance(config)?;
    srv.await.map_err(|e| ServerError::Unspecified(e.to_string()))
}

pub fn create_server_instance(config: ServerConfig) -> Result<Server, ServerError> {
    let woo_api = WooApi::new(config.woo_config.clone()).map_err(|e| ServerError::InitializeError(e.to_string()))?;
    let host = config.host.clone();
    let port = config.port;
    let srv = HttpServer::new(move || {
        let replication_api = ReplicationApi::new(woo_api.clone(), config.replicator.options.clone());
        let hmac = HmacMiddlewareFactory::new(
            &config.replicator.signature_header,
            config.replicator.webhook_secret.clone(),
            config.replicator.hmac_checks,
        );
        // The HMAC check wraps the whole webhook scope, so it is impossible to register a webhook route that skips
        // signature verification.
        let webhook_scope = web::scope("/wc").wrap(hmac).service(ProductCreatedWebhookRoute::<WooApi>::new());
        App::new()
            .wrap(Logger::new("%t (%D ms) %s %a %{Host}i %U").log_target("prg::access_log"))
            .app_data(web::Data::new(replication_api))
            .service(health)
            .service(webhook_scope)
    })
    .keep_alive(KeepAlive::Timeout(Duration::from_secs(600)))
    .bind((host.as_str(), port))?
    .run();
    Ok(srv)
}
