use log::*;
use prg_common::Secret;

#[derive(Debug, Clone, Default)]
pub struct WooConfig {
    /// The full products endpoint of the target store, e.g. "https://shop.example.com/wp-json/wc/v3/products"
    pub products_url: String,
    pub api_key: Secret<String>,
    pub api_secret: Secret<String>,
}

impl WooConfig {
    pub fn new_from_env_or_default() -> Self {
        let products_url = std::env::var("PRG_WC_PRODUCTS_URL").unwrap_or_else(|_| {
            warn!("PRG_WC_PRODUCTS_URL not set, using (probably useless) default");
            "https://example.com/wp-json/wc/v3/products".to_string()
        });
        let api_key = Secret::new(std::env::var("PRG_WC_API_KEY").unwrap_or_else(|_| {
            warn!("PRG_WC_API_KEY not set, using (probably useless) default");
            "ck_00000000000000".to_string()
        }));
        let api_secret = Secret::new(std::env::var("PRG_WC_API_SECRET").unwrap_or_else(|_| {
            warn!("PRG_WC_API_SECRET not set, using (probably useless) default");
            "cs_00000000000000".to_string()
        }));
        Self { products_url, api_key, api_secret }
    }

    /// The platform media endpoint lives outside the catalog API root, so it is derived from the products URL by
    /// stripping the `/wc/...` suffix and substituting the generic media path.
    pub fn media_url(&self) -> String {
        match self.products_url.find("/wc/") {
            Some(idx) => format!("{}/wp/v2/media", &self.products_url[..idx]),
            None => format!("{}/wp/v2/media", self.products_url.trim_end_matches('/')),
        }
    }
}
