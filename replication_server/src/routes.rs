//! Request handler definitions
//!
//! Define each route and it handler here.
//! Handlers that are more than a line or two MUST go into a separate module. Keep this module neat and tidy 🙏
//!
//! A note about performance:
//! Since each worker thread processes its requests sequentially, handlers which block the current thread will cause
//! the current worker to stop processing new requests. For this reason, any long, non-cpu-bound operation (e.g. I/O,
//! network calls) should be expressed as futures or asynchronous functions. Async handlers get executed concurrently
//! by worker threads and thus don’t block execution.

use actix_web::{get, web, HttpRequest, HttpResponse, Responder};
use log::*;
use woo_tools::{Product, TargetCatalog};

use crate::{data_objects::ReplicationResponse, errors::ServerError, replication::ReplicationApi};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

//----------------------------------------------   Health  ----------------------------------------------------

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

//----------------------------------------------   Webhook  ----------------------------------------------------

route!(product_created_webhook => Post "/webhook/product_created" impl TargetCatalog);
/// Route handler for the product-creation webhook.
///
/// The HMAC middleware has already verified the signature over the raw body bytes by the time this handler runs, so
/// the body can safely be parsed here. The handler takes the raw bytes rather than a typed extractor so that a
/// malformed body maps onto our 400 envelope instead of actix's default error.
pub async fn product_created_webhook<B: TargetCatalog>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<ReplicationApi<B>>,
) -> Result<HttpResponse, ServerError> {
    trace!("🛒️ Received webhook request: {}", req.uri());
    let product = serde_json::from_slice::<Product>(&body).map_err(|e| {
        warn!("🛒️ Could not parse product payload. {e}");
        ServerError::CouldNotDeserializePayload(e.to_string())
    })?;
    let name = product.name.clone();
    let outcome = api.replicate(product).await?;
    let response = if outcome.skipped {
        info!("🛒️ Product '{name}' was already replicated as {}. No mutation performed.", outcome.product_id);
        ReplicationResponse::skipped(outcome.product_id)
    } else {
        info!(
            "🛒️ Product '{name}' replicated as {}. {} variation(s) created, {} failed.",
            outcome.product_id, outcome.variations_created, outcome.variations_failed
        );
        ReplicationResponse::replicated(&outcome)
    };
    Ok(HttpResponse::Ok().json(response))
}
