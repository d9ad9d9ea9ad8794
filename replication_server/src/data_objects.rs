use serde::{Deserialize, Serialize};

use crate::replication::ReplicationOutcome;

/// Success envelope returned to the source store. Webhook errors use the JSON envelope from
/// [`crate::errors::ServerError`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images_rehosted: Option<usize>,
}

impl ReplicationResponse {
    pub fn replicated(outcome: &ReplicationOutcome) -> Self {
        let message = match outcome.variations_failed {
            0 => format!("Product replicated with {} variation(s).", outcome.variations_created),
            n => format!(
                "Product replicated with {} variation(s). {n} variation(s) could not be created.",
                outcome.variations_created
            ),
        };
        Self {
            success: true,
            message,
            product_id: Some(outcome.product_id),
            images_rehosted: outcome.images_rehosted,
        }
    }

    pub fn skipped(product_id: i64) -> Self {
        Self {
            success: true,
            message: "Product has already been replicated. Skipping.".to_string(),
            product_id: Some(product_id),
            images_rehosted: None,
        }
    }
}
