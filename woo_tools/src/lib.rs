mod api;
mod config;
mod error;
mod product;

pub mod helpers;

pub use api::{TargetCatalog, WooApi};
pub use config::WooConfig;
pub use error::CatalogApiError;
pub use product::{
    CatalogProductRef,
    MetaData,
    PayloadAttribute,
    PayloadImage,
    Product,
    ProductAttribute,
    ReplicationPayload,
    SourceImage,
    VariationAttribute,
    VariationRequest,
    ORIGIN_ID_META_KEY,
};
