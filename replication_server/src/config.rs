use std::env;

use log::*;
use prg_common::{parse_boolean_flag, Cents, Secret};
use woo_tools::WooConfig;

use crate::replication::CustomSizeRule;

const DEFAULT_PRG_HOST: &str = "127.0.0.1";
const DEFAULT_PRG_PORT: u16 = 8480;
/// Markup applied to the regular price of "custom size" variations, in cents.
const DEFAULT_CUSTOM_SIZE_MARKUP: Cents = Cents::new(4000);
const DEFAULT_SIGNATURE_HEADER: &str = "x-wc-webhook-signature";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Connection details for the target store's catalog API.
    pub woo_config: WooConfig,
    /// Webhook verification and pipeline behaviour.
    pub replicator: ReplicatorConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_PRG_HOST.to_string(),
            port: DEFAULT_PRG_PORT,
            woo_config: WooConfig::default(),
            replicator: ReplicatorConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("PRG_HOST").ok().unwrap_or_else(|| DEFAULT_PRG_HOST.into());
        let port = env::var("PRG_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!(
                        "🪛️ {s} is not a valid port for PRG_PORT. {e} Using the default, {DEFAULT_PRG_PORT}, instead."
                    );
                    DEFAULT_PRG_PORT
                })
            })
            .ok()
            .unwrap_or(DEFAULT_PRG_PORT);
        let woo_config = WooConfig::new_from_env_or_default();
        let replicator = ReplicatorConfig::from_env_or_default();
        Self { host, port, woo_config, replicator }
    }
}

#[derive(Clone, Debug)]
pub struct ReplicatorConfig {
    /// Shared secret used to verify the webhook signature.
    pub webhook_secret: Secret<String>,
    /// Name of the header carrying the signature. Header lookup is case-insensitive.
    pub signature_header: String,
    /// If false, the signature check is skipped entirely. Only disable this for local development.
    pub hmac_checks: bool,
    pub options: ReplicatorOptions,
}

impl Default for ReplicatorConfig {
    fn default() -> Self {
        Self {
            webhook_secret: Secret::default(),
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
            hmac_checks: true,
            options: ReplicatorOptions::default(),
        }
    }
}

impl ReplicatorConfig {
    pub fn from_env_or_default() -> Self {
        let webhook_secret = Secret::new(env::var("PRG_WEBHOOK_SECRET").unwrap_or_else(|_| {
            error!("🪛️ PRG_WEBHOOK_SECRET is not set. Incoming webhooks will fail signature verification.");
            String::default()
        }));
        let signature_header =
            env::var("PRG_SIGNATURE_HEADER").ok().unwrap_or_else(|| DEFAULT_SIGNATURE_HEADER.to_string());
        let hmac_checks = parse_boolean_flag(env::var("PRG_HMAC_CHECKS").ok(), true);
        if !hmac_checks {
            warn!("🚨️ Webhook signature checks are disabled. Do not run like this in production.");
        }
        Self { webhook_secret, signature_header, hmac_checks, options: ReplicatorOptions::from_env_or_default() }
    }
}

/// The capability flags that distinguish the observed deployment variants of the replication pipeline. One handler,
/// parameterized here, subsumes all of them.
#[derive(Clone, Debug)]
pub struct ReplicatorOptions {
    /// Skip replication when a product with the same origin identifier already exists in the target catalog.
    pub check_idempotency: bool,
    /// Re-upload source images to the target platform's media store instead of linking to the source URLs.
    pub rehost_images: bool,
    /// Force the created product's type to "variable" rather than passing the source type through.
    pub force_variable_type: bool,
    /// Force the created product's status to "draft" rather than passing the source status through.
    pub force_draft_status: bool,
    /// Markup added to the regular price of options matching the custom-size rule.
    pub custom_size_markup: Cents,
    /// Markup added to the sale price to derive a regular price when the source leaves `regular_price` blank.
    pub blank_regular_markup: Cents,
    /// When a custom-size markup applies, also lift the sale price to the unadjusted regular price.
    pub shift_sale_on_custom: bool,
    pub custom_size_rule: CustomSizeRule,
}

impl Default for ReplicatorOptions {
    fn default() -> Self {
        Self {
            check_idempotency: true,
            rehost_images: false,
            force_variable_type: true,
            force_draft_status: false,
            custom_size_markup: DEFAULT_CUSTOM_SIZE_MARKUP,
            blank_regular_markup: Cents::new(0),
            shift_sale_on_custom: false,
            custom_size_rule: CustomSizeRule::Substring,
        }
    }
}

impl ReplicatorOptions {
    pub fn from_env_or_default() -> Self {
        let check_idempotency = parse_boolean_flag(env::var("PRG_IDEMPOTENCY_CHECKS").ok(), true);
        let rehost_images = parse_boolean_flag(env::var("PRG_IMAGE_REHOSTING").ok(), false);
        let force_variable_type = parse_boolean_flag(env::var("PRG_FORCE_VARIABLE_TYPE").ok(), true);
        let force_draft_status = parse_boolean_flag(env::var("PRG_FORCE_DRAFT_STATUS").ok(), false);
        let custom_size_markup = parse_cents_var("PRG_CUSTOM_SIZE_MARKUP", DEFAULT_CUSTOM_SIZE_MARKUP);
        let blank_regular_markup = parse_cents_var("PRG_BLANK_REGULAR_MARKUP", Cents::new(0));
        let shift_sale_on_custom = parse_boolean_flag(env::var("PRG_SHIFT_SALE_ON_CUSTOM").ok(), false);
        let custom_size_rule = custom_size_rule_from_env();
        Self {
            check_idempotency,
            rehost_images,
            force_variable_type,
            force_draft_status,
            custom_size_markup,
            blank_regular_markup,
            shift_sale_on_custom,
            custom_size_rule,
        }
    }
}

fn parse_cents_var(name: &str, default: Cents) -> Cents {
    env::var(name)
        .ok()
        .and_then(|s| {
            s.parse::<i64>()
                .map_err(|e| warn!("🪛️ Invalid configuration value for {name}: {s}. {e}. Using {default} instead."))
                .ok()
        })
        .map(Cents::from)
        .unwrap_or(default)
}

fn custom_size_rule_from_env() -> CustomSizeRule {
    match env::var("PRG_CUSTOM_SIZE_LABELS") {
        Err(_) => CustomSizeRule::Substring,
        Ok(s) if ["none", "false", "0"].contains(&s.to_lowercase().as_str()) => {
            info!("🪛️ Custom-size detection is disabled. No variation will receive the custom-size markup.");
            CustomSizeRule::Disabled
        },
        Ok(s) => {
            let labels = s.split(',').map(|l| l.trim().to_string()).filter(|l| !l.is_empty()).collect::<Vec<_>>();
            if labels.is_empty() {
                warn!("🪛️ PRG_CUSTOM_SIZE_LABELS was set but contains no labels. Falling back to substring matching.");
                CustomSizeRule::Substring
            } else {
                info!("🪛️ Custom-size labels: {}", labels.join(", "));
                CustomSizeRule::ExactLabels(labels)
            }
        },
    }
}
