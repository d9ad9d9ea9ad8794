//! The webhook-to-catalog replication pipeline.
//!
//! A single [`ReplicationApi::replicate`] call performs, in order: the idempotency check, image rehosting, payload
//! transformation, product creation, and per-option variation creation. Failures in the first and fourth steps abort
//! the request; failures in the others are caught per item and converted to omissions, since the parent product may
//! already be committed on the target store.

use log::*;
use prg_common::Cents;
use thiserror::Error;
use woo_tools::{
    helpers::parse_price,
    CatalogApiError,
    MetaData,
    PayloadAttribute,
    PayloadImage,
    Product,
    ProductAttribute,
    ReplicationPayload,
    TargetCatalog,
    VariationAttribute,
    VariationRequest,
    ORIGIN_ID_META_KEY,
};

use crate::config::ReplicatorOptions;

#[derive(Debug, Error)]
pub enum ReplicationError {
    #[error("Product metadata does not contain an origin identifier ({ORIGIN_ID_META_KEY})")]
    MissingOriginId,
    #[error("Could not check the target catalog for an existing replica. {0}")]
    ExistenceCheckFailed(#[source] CatalogApiError),
    #[error("Could not create the product in the target catalog. {0}")]
    ProductCreationFailed(#[source] CatalogApiError),
}

impl ReplicationError {
    /// The raw upstream response body, where one was captured.
    pub fn upstream_body(&self) -> Option<&str> {
        match self {
            Self::MissingOriginId => None,
            Self::ExistenceCheckFailed(e) | Self::ProductCreationFailed(e) => match e {
                CatalogApiError::QueryError { message, .. } => Some(message.as_str()),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationOutcome {
    pub product_id: i64,
    /// True when an existing replica was found and no mutation was performed.
    pub skipped: bool,
    /// Number of images successfully rehosted. `None` when rehosting is disabled.
    pub images_rehosted: Option<usize>,
    pub variations_created: usize,
    pub variations_failed: usize,
}

impl ReplicationOutcome {
    fn skipped(product_id: i64) -> Self {
        Self { product_id, skipped: true, images_rehosted: None, variations_created: 0, variations_failed: 0 }
    }
}

/// How option labels are recognised as the made-to-measure "custom size" entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomSizeRule {
    /// No option receives the custom-size markup.
    Disabled,
    /// Case-insensitive substring match on "custom".
    Substring,
    /// Exact match against a fixed set of labels.
    ExactLabels(Vec<String>),
}

impl CustomSizeRule {
    pub fn matches(&self, label: &str) -> bool {
        match self {
            Self::Disabled => false,
            Self::Substring => label.to_lowercase().contains("custom"),
            Self::ExactLabels(labels) => labels.iter().any(|l| l == label),
        }
    }
}

pub struct ReplicationApi<B> {
    catalog: B,
    options: ReplicatorOptions,
}

impl<B: TargetCatalog> ReplicationApi<B> {
    pub fn new(catalog: B, options: ReplicatorOptions) -> Self {
        Self { catalog, options }
    }

    /// Replicate a single source product into the target catalog.
    pub async fn replicate(&self, product: Product) -> Result<ReplicationOutcome, ReplicationError> {
        if self.options.check_idempotency {
            let origin_id = product.origin_id().ok_or(ReplicationError::MissingOriginId)?;
            let existing = self
                .catalog
                .find_by_origin_id(&origin_id)
                .await
                .map_err(ReplicationError::ExistenceCheckFailed)?;
            if let Some(replica) = existing.first() {
                info!(
                    "🛒️ A replica of product '{}' (origin id {origin_id}) already exists with id {}. Skipping.",
                    product.name, replica.id
                );
                return Ok(ReplicationOutcome::skipped(replica.id));
            }
        }
        let media_ids = if self.options.rehost_images { Some(self.rehost_images(&product).await) } else { None };
        let images_rehosted = media_ids.as_ref().map(Vec::len);
        let payload = build_payload(&product, &self.options, media_ids);
        let created = self.catalog.create_product(&payload).await.map_err(ReplicationError::ProductCreationFailed)?;
        let results = self.create_variations(created.id, &product).await;
        let variations_created = results.iter().filter(|r| r.is_ok()).count();
        let variations_failed = results.len() - variations_created;
        Ok(ReplicationOutcome {
            product_id: created.id,
            skipped: false,
            images_rehosted,
            variations_created,
            variations_failed,
        })
    }

    /// Each image is fetched and re-uploaded independently. A failed image is dropped from the payload; it never
    /// aborts the replication.
    async fn rehost_images(&self, product: &Product) -> Vec<i64> {
        let mut media_ids = Vec::with_capacity(product.images.len());
        for image in &product.images {
            match self.catalog.rehost_image(&image.src).await {
                Ok(id) => media_ids.push(id),
                Err(e) => warn!("🛒️ Could not rehost image {}. Skipping it. {e}", image.src),
            }
        }
        media_ids
    }

    /// Variation calls run strictly sequentially, in option order. Each failure is logged and skipped; the remaining
    /// options are still attempted, since the parent product has already been committed.
    async fn create_variations(&self, product_id: i64, product: &Product) -> Vec<Result<i64, CatalogApiError>> {
        let Some(attribute) = product.size_attribute() else {
            debug!("🛒️ Product '{}' declares no size attribute. No variations to create.", product.name);
            return vec![];
        };
        let prices = match base_prices(product, &self.options) {
            Ok(prices) => prices,
            Err(e) => {
                warn!("🛒️ Could not derive variation prices for '{}'. No variations will be created. {e}", product.name);
                return vec![];
            },
        };
        let mut results = Vec::with_capacity(attribute.options.len());
        for option in &attribute.options {
            let request = variation_request(attribute, option, prices, &self.options);
            let result = self
                .catalog
                .create_variation(product_id, &request)
                .await
                .map(|v| v.id)
                .inspect_err(|e| warn!("🛒️ Could not create variation '{option}' for product {product_id}. {e}"));
            results.push(result);
        }
        results
    }
}

/// Base (sale, regular) prices shared by all of a product's variations, before any custom-size markup.
fn base_prices(product: &Product, options: &ReplicatorOptions) -> Result<(Cents, Cents), CatalogApiError> {
    let sale = parse_price(&product.price)?;
    let regular = if product.regular_price.trim().is_empty() {
        sale + options.blank_regular_markup
    } else {
        parse_price(&product.regular_price)?
    };
    Ok((sale, regular))
}

/// The creation document for a single size option.
fn variation_request(
    attribute: &ProductAttribute,
    option: &str,
    (sale, regular): (Cents, Cents),
    options: &ReplicatorOptions,
) -> VariationRequest {
    let is_custom = options.custom_size_rule.matches(option);
    let (regular, sale) = if is_custom {
        let shifted_sale = if options.shift_sale_on_custom { regular } else { sale };
        (regular + options.custom_size_markup, shifted_sale)
    } else {
        (regular, sale)
    };
    VariationRequest {
        regular_price: regular.to_string(),
        sale_price: sale.to_string(),
        attributes: vec![VariationAttribute { id: attribute.id, option: option.to_string() }],
    }
}

/// Pure mapping from the source product to the document submitted to the target catalog. Performs no I/O and is
/// deterministic given its inputs.
pub fn build_payload(product: &Product, options: &ReplicatorOptions, media_ids: Option<Vec<i64>>) -> ReplicationPayload {
    let product_type =
        if options.force_variable_type { "variable".to_string() } else { product.product_type.clone() };
    let status = if options.force_draft_status { "draft".to_string() } else { product.status.clone() };
    let attributes = product
        .attributes
        .iter()
        .map(|a| PayloadAttribute {
            id: a.id,
            name: a.name.clone(),
            slug: a.slug.clone(),
            position: a.position.unwrap_or(0),
            visible: a.visible.unwrap_or(true),
            variation: a.variation.unwrap_or(true),
            options: a.options.clone(),
        })
        .collect();
    let images = match media_ids {
        Some(ids) => ids.into_iter().map(|id| PayloadImage::Rehosted { id }).collect(),
        None => product.images.iter().map(|i| PayloadImage::Linked { src: i.src.clone() }).collect(),
    };
    let mut meta_data = product.meta_data.clone();
    if options.check_idempotency && !meta_data.iter().any(|m| m.key == ORIGIN_ID_META_KEY) {
        if let Some(origin_id) = product.origin_id() {
            meta_data.push(MetaData { key: ORIGIN_ID_META_KEY.to_string(), value: origin_id.into() });
        }
    }
    ReplicationPayload {
        name: product.name.clone(),
        product_type,
        status,
        description: product.description.clone(),
        short_description: product.short_description.clone(),
        price: product.price.clone(),
        regular_price: product.regular_price.clone(),
        sale_price: product.sale_price.clone(),
        categories: product.categories.clone(),
        images,
        attributes,
        meta_data,
    }
}
