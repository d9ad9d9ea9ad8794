use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Metadata key that links a replicated product back to the product it was copied from. Used to detect webhook
/// re-deliveries before creating a duplicate.
pub const ORIGIN_ID_META_KEY: &str = "_original_product_id";

/// A product as delivered by the source store's product-creation webhook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Product {
    pub name: String,
    #[serde(rename = "type", default)]
    pub product_type: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub short_description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub regular_price: String,
    #[serde(default)]
    pub sale_price: String,
    /// Categories are passed through to the target catalog untouched.
    #[serde(default)]
    pub categories: Vec<Value>,
    #[serde(default)]
    pub images: Vec<SourceImage>,
    #[serde(default)]
    pub attributes: Vec<ProductAttribute>,
    #[serde(default)]
    pub meta_data: Vec<MetaData>,
}

impl Product {
    /// The origin identifier embedded in the product metadata, if any.
    pub fn origin_id(&self) -> Option<String> {
        self.meta_data.iter().find(|m| m.key == ORIGIN_ID_META_KEY).map(|m| match &m.value {
            Value::String(s) => s.clone(),
            v => v.to_string(),
        })
    }

    /// The attribute that drives variation creation, if the product declares one with at least one option.
    pub fn size_attribute(&self) -> Option<&ProductAttribute> {
        self.attributes.iter().find(|a| a.name.eq_ignore_ascii_case("size") && !a.options.is_empty())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceImage {
    pub src: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub visible: Option<bool>,
    #[serde(default)]
    pub variation: Option<bool>,
    #[serde(default)]
    pub options: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetaData {
    pub key: String,
    pub value: Value,
}

/// The product document submitted to the target catalog's creation endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplicationPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub status: String,
    pub description: String,
    pub short_description: String,
    pub price: String,
    pub regular_price: String,
    pub sale_price: String,
    pub categories: Vec<Value>,
    pub images: Vec<PayloadImage>,
    pub attributes: Vec<PayloadAttribute>,
    pub meta_data: Vec<MetaData>,
}

/// Images are submitted as `{src}` links, or as `{id}` references once rehosted on the target platform.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PayloadImage {
    Linked { src: String },
    Rehosted { id: i64 },
}

/// A source attribute with all the optional fields resolved to their defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayloadAttribute {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub position: i64,
    pub visible: bool,
    pub variation: bool,
    pub options: Vec<String>,
}

/// One purchasable variation, derived from a single size option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationRequest {
    pub regular_price: String,
    pub sale_price: String,
    pub attributes: Vec<VariationAttribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariationAttribute {
    pub id: i64,
    pub option: String,
}

/// Minimal view of a catalog product, as returned by creation and lookup calls.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CatalogProductRef {
    pub id: i64,
}
