use crate::app_config::{AppConfig, Cin7Credentials, ShopifyCredentials};
use crate::ConfigError;

const DEFAULT_CIN7_BASE_URL: &str = "https://inventory.dearsystems.com/ExternalApi/v2";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or a credential pair is
/// half-configured.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process, without touching `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid or a credential pair is
/// half-configured.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// The core parsing/validation logic is decoupled from the real environment
/// so tests drive it with a plain `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let shopify = credential_pair(
        &lookup,
        "SHOPIFY_SHOP_URL",
        "SHOPIFY_ACCESS_TOKEN",
    )?
    .map(|(shop_url, access_token)| ShopifyCredentials {
        shop_url,
        access_token,
        api_version: or_default("SHOPIFY_API_VERSION", "2024-04"),
    });

    let cin7 = credential_pair(&lookup, "CIN7_ACCOUNT_ID", "CIN7_API_KEY")?
        .map(|(account_id, api_key)| Cin7Credentials { account_id, api_key });

    let cin7_base_url = or_default("CIN7_BASE_URL", DEFAULT_CIN7_BASE_URL);
    let http_timeout_secs = parse_u64("CELLARMAN_HTTP_TIMEOUT_SECS", "30")?;
    let max_retries = parse_u32("CELLARMAN_MAX_RETRIES", "3")?;
    let retry_backoff_base_secs = parse_u64("CELLARMAN_RETRY_BACKOFF_BASE_SECS", "5")?;
    let supplier_page_size = parse_u32("CELLARMAN_SUPPLIER_PAGE_SIZE", "100")?;
    let conventions_path = lookup("CELLARMAN_CONVENTIONS_PATH").ok().map(PathBuf::from);
    let log_level = or_default("CELLARMAN_LOG_LEVEL", "info");

    if supplier_page_size == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "CELLARMAN_SUPPLIER_PAGE_SIZE".to_string(),
            reason: "page size must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        shopify,
        cin7,
        cin7_base_url,
        http_timeout_secs,
        max_retries,
        retry_backoff_base_secs,
        supplier_page_size,
        conventions_path,
        log_level,
    })
}

/// Reads a two-variable credential pair. Both present → `Some`, both absent →
/// `None`, exactly one present → error, since a half-configured integration
/// would silently behave like a disabled one.
fn credential_pair<F>(
    lookup: &F,
    first_var: &str,
    second_var: &str,
) -> Result<Option<(String, String)>, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    match (lookup(first_var), lookup(second_var)) {
        (Ok(first), Ok(second)) => Ok(Some((first, second))),
        (Err(_), Err(_)) => Ok(None),
        (Ok(_), Err(_)) => Err(ConfigError::MissingEnvVar(second_var.to_string())),
        (Err(_), Ok(_)) => Err(ConfigError::MissingEnvVar(first_var.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn empty_env_yields_disconnected_config() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert!(cfg.shopify.is_none());
        assert!(cfg.cin7.is_none());
        assert_eq!(cfg.cin7_base_url, DEFAULT_CIN7_BASE_URL);
        assert_eq!(cfg.http_timeout_secs, 30);
        assert_eq!(cfg.max_retries, 3);
        assert_eq!(cfg.supplier_page_size, 100);
    }

    #[test]
    fn full_shopify_pair_is_parsed() {
        let mut map = HashMap::new();
        map.insert("SHOPIFY_SHOP_URL", "example.myshopify.com");
        map.insert("SHOPIFY_ACCESS_TOKEN", "shpat_test");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let shopify = cfg.shopify.expect("shopify credentials expected");
        assert_eq!(shopify.shop_url, "example.myshopify.com");
        assert_eq!(shopify.api_version, "2024-04");
    }

    #[test]
    fn half_configured_shopify_pair_errors() {
        let mut map = HashMap::new();
        map.insert("SHOPIFY_SHOP_URL", "example.myshopify.com");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "SHOPIFY_ACCESS_TOKEN"),
            "expected MissingEnvVar(SHOPIFY_ACCESS_TOKEN), got: {result:?}"
        );
    }

    #[test]
    fn half_configured_cin7_pair_errors() {
        let mut map = HashMap::new();
        map.insert("CIN7_API_KEY", "key");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::MissingEnvVar(ref v)) if v == "CIN7_ACCOUNT_ID"),
            "expected MissingEnvVar(CIN7_ACCOUNT_ID), got: {result:?}"
        );
    }

    #[test]
    fn api_version_override() {
        let mut map = HashMap::new();
        map.insert("SHOPIFY_SHOP_URL", "example.myshopify.com");
        map.insert("SHOPIFY_ACCESS_TOKEN", "shpat_test");
        map.insert("SHOPIFY_API_VERSION", "2025-01");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.shopify.unwrap().api_version, "2025-01");
    }

    #[test]
    fn invalid_timeout_errors() {
        let mut map = HashMap::new();
        map.insert("CELLARMAN_HTTP_TIMEOUT_SECS", "not-a-number");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CELLARMAN_HTTP_TIMEOUT_SECS"),
            "expected InvalidEnvVar(CELLARMAN_HTTP_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn zero_page_size_rejected() {
        let mut map = HashMap::new();
        map.insert("CELLARMAN_SUPPLIER_PAGE_SIZE", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "CELLARMAN_SUPPLIER_PAGE_SIZE")
        );
    }

    #[test]
    fn conventions_path_is_optional() {
        let mut map = HashMap::new();
        map.insert("CELLARMAN_CONVENTIONS_PATH", "./conventions.yaml");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(
            cfg.conventions_path.unwrap().to_string_lossy(),
            "./conventions.yaml"
        );
    }

    #[test]
    fn debug_redacts_cin7_credentials() {
        let mut map = HashMap::new();
        map.insert("CIN7_ACCOUNT_ID", "acct");
        map.insert("CIN7_API_KEY", "super-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("[redacted]"));
    }
}
