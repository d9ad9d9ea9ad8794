use std::sync::Arc;

use log::*;
use reqwest::{header::CONTENT_TYPE, multipart, Client, Method};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::WooConfig,
    product::{CatalogProductRef, ReplicationPayload, VariationRequest},
    CatalogApiError,
    ORIGIN_ID_META_KEY,
};

/// Write access to the target store's catalog. The webhook handler is generic over this trait so that the pipeline
/// can be exercised in tests without a live store.
#[allow(async_fn_in_trait)]
pub trait TargetCatalog {
    /// All catalog products carrying the given origin identifier in their metadata.
    async fn find_by_origin_id(&self, origin_id: &str) -> Result<Vec<CatalogProductRef>, CatalogApiError>;
    async fn create_product(&self, payload: &ReplicationPayload) -> Result<CatalogProductRef, CatalogApiError>;
    async fn create_variation(
        &self,
        product_id: i64,
        variation: &VariationRequest,
    ) -> Result<CatalogProductRef, CatalogApiError>;
    /// Fetch the image bytes from `src_url` and upload them to the target platform's media store, returning the new
    /// media id.
    async fn rehost_image(&self, src_url: &str) -> Result<i64, CatalogApiError>;
}

#[derive(Clone)]
pub struct WooApi {
    config: WooConfig,
    client: Arc<Client>,
}

impl WooApi {
    pub fn new(config: WooConfig) -> Result<Self, CatalogApiError> {
        let client = Client::builder().build().map_err(|e| CatalogApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        url: &str,
        params: &[(&str, &str)],
        body: Option<B>,
    ) -> Result<T, CatalogApiError> {
        trace!("Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .basic_auth(self.config.api_key.reveal(), Some(self.config.api_secret.reveal()));
        if !params.is_empty() {
            req = req.query(params);
        }
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| CatalogApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| CatalogApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| CatalogApiError::RestResponseError(e.to_string()))?;
            Err(CatalogApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.products_url.trim_end_matches('/'))
    }
}

impl TargetCatalog for WooApi {
    async fn find_by_origin_id(&self, origin_id: &str) -> Result<Vec<CatalogProductRef>, CatalogApiError> {
        debug!("Looking up products with origin id {origin_id}");
        let params = [("meta_key", ORIGIN_ID_META_KEY), ("meta_value", origin_id)];
        let matches = self.rest_query::<Vec<CatalogProductRef>, ()>(Method::GET, &self.url(""), &params, None).await?;
        debug!("Found {} product(s) carrying origin id {origin_id}", matches.len());
        Ok(matches)
    }

    async fn create_product(&self, payload: &ReplicationPayload) -> Result<CatalogProductRef, CatalogApiError> {
        debug!("Creating product '{}' in the target catalog", payload.name);
        let product = self
            .rest_query::<CatalogProductRef, &ReplicationPayload>(Method::POST, &self.url(""), &[], Some(payload))
            .await?;
        info!("Created product '{}' with id {}", payload.name, product.id);
        Ok(product)
    }

    async fn create_variation(
        &self,
        product_id: i64,
        variation: &VariationRequest,
    ) -> Result<CatalogProductRef, CatalogApiError> {
        let url = self.url(&format!("/{product_id}/variations"));
        let created =
            self.rest_query::<CatalogProductRef, &VariationRequest>(Method::POST, &url, &[], Some(variation)).await?;
        debug!("Created variation {} for product {product_id}", created.id);
        Ok(created)
    }

    async fn rehost_image(&self, src_url: &str) -> Result<i64, CatalogApiError> {
        #[derive(Deserialize)]
        struct MediaRef {
            id: i64,
        }
        debug!("Fetching image from {src_url}");
        let response = self
            .client
            .get(src_url)
            .send()
            .await
            .map_err(|e| CatalogApiError::MediaFetchError { url: src_url.to_string(), message: e.to_string() })?;
        if !response.status().is_success() {
            return Err(CatalogApiError::MediaFetchError {
                url: src_url.to_string(),
                message: format!("HTTP {}", response.status().as_u16()),
            });
        }
        let mime = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| CatalogApiError::MediaFetchError { url: src_url.to_string(), message: e.to_string() })?;
        let file_name = src_url
            .rsplit('/')
            .next()
            .and_then(|s| s.split('?').next())
            .filter(|s| !s.is_empty())
            .unwrap_or("image")
            .to_string();
        let part = multipart::Part::bytes(bytes.to_vec())
            .file_name(file_name)
            .mime_str(&mime)
            .map_err(|e| CatalogApiError::RestRequestError(e.to_string()))?;
        let form = multipart::Form::new().part("file", part);
        let response = self
            .client
            .post(self.config.media_url())
            .basic_auth(self.config.api_key.reveal(), Some(self.config.api_secret.reveal()))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CatalogApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            let media = response.json::<MediaRef>().await.map_err(|e| CatalogApiError::JsonError(e.to_string()))?;
            info!("Rehosted image {src_url} as media object {}", media.id);
            Ok(media.id)
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| CatalogApiError::RestResponseError(e.to_string()))?;
            Err(CatalogApiError::QueryError { status, message })
        }
    }
}
