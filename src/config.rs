//! Application configuration.
//!
//! Configuration is layered. Stock defaults are overridden by an optional
//! `config.toml`, which is in turn overridden by environment variables (the
//! deployment platform only lets operators set those):
//!
//! ```text
//! stock defaults  →  config.toml  →  environment (.env is loaded first)
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [newsletter]
//! title = "UX Curation"
//! locale = "fr"             # "fr" or "en": month names, headings, labels
//!
//! [defaults]
//! price = "Free"            # Event price when the cell is empty
//! language = "Français"     # Event language when the cell is empty
//!
//! [colors]
//! background = "#f4f4f7"
//! surface = "#ffffff"
//! text = "#1f1f29"
//! text_muted = "#6b6b7b"
//! accent = "#4f3bd1"
//! border = "#e4e4ec"
//!
//! [server]
//! host = "0.0.0.0"
//! port = 5001
//! output_dir = "output"
//! upload_dir = "uploads"
//! max_upload_mb = 16
//!
//! [auth]
//! enabled = false
//! username = "admin"
//! password = "changez-moi"
//! realm = "UX Curation - Accès restreint"
//! ```
//!
//! ## Environment
//!
//! | Variable | Overrides |
//! |----------|-----------|
//! | `PORT` | `server.port` |
//! | `OUTPUT_FOLDER` | `server.output_dir` |
//! | `UPLOAD_FOLDER` | `server.upload_dir` |
//! | `MAX_UPLOAD_MB` | `server.max_upload_mb` |
//! | `ENABLE_AUTH` | `auth.enabled` (`True`, `true`, `1`, `yes`) |
//! | `AUTH_USERNAME` | `auth.username` |
//! | `AUTH_PASSWORD` | `auth.password` |
//!
//! Unknown keys in `config.toml` are rejected to catch typos early.

use crate::locale::Locale;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Configuration loaded from `config.toml` and the environment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Newsletter identity and wording.
    pub newsletter: NewsletterConfig,
    /// Values used when a spreadsheet cell is empty.
    pub defaults: FieldDefaults,
    /// Email palette (inlined into the generated HTML).
    pub colors: ColorConfig,
    /// Web front end settings.
    pub server: ServerConfig,
    /// Optional HTTP basic-auth gate.
    pub auth: AuthConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.newsletter.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "newsletter.title must not be empty".into(),
            ));
        }
        if self.server.max_upload_mb == 0 || self.server.max_upload_mb > 1024 {
            return Err(ConfigError::Validation(
                "server.max_upload_mb must be 1-1024".into(),
            ));
        }
        if self.auth.enabled && (self.auth.username.is_empty() || self.auth.password.is_empty()) {
            return Err(ConfigError::Validation(
                "auth.username and auth.password are required when auth is enabled".into(),
            ));
        }
        Ok(())
    }

    /// Apply environment overrides.
    ///
    /// `lookup` is `std::env::var` in production; tests pass a map.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Validation(format!("PORT is not a valid port: {port}")))?;
        }
        if let Some(dir) = lookup("OUTPUT_FOLDER") {
            self.server.output_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("UPLOAD_FOLDER") {
            self.server.upload_dir = PathBuf::from(dir);
        }
        if let Some(mb) = lookup("MAX_UPLOAD_MB") {
            self.server.max_upload_mb = mb.trim().parse().map_err(|_| {
                ConfigError::Validation(format!("MAX_UPLOAD_MB is not a number: {mb}"))
            })?;
        }
        if let Some(flag) = lookup("ENABLE_AUTH") {
            self.auth.enabled = parse_flag(&flag);
        }
        if let Some(username) = lookup("AUTH_USERNAME") {
            self.auth.username = username;
        }
        if let Some(password) = lookup("AUTH_PASSWORD") {
            self.auth.password = password;
        }
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NewsletterConfig {
    /// Title shown in the email header and the browser tab.
    pub title: String,
    /// Language of month names, section headings and labels.
    pub locale: Locale,
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            title: "UX Curation".to_string(),
            locale: Locale::Fr,
        }
    }
}

/// Defaults applied to event cells that are missing or blank.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FieldDefaults {
    pub price: String,
    pub language: String,
}

impl Default for FieldDefaults {
    fn default() -> Self {
        Self {
            price: "Free".to_string(),
            language: "Français".to_string(),
        }
    }
}

/// Email palette. Email clients ignore most stylesheets, so every color is
/// written inline on the element that uses it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColorConfig {
    /// Page background around the newsletter body.
    pub background: String,
    /// Card and body background.
    pub surface: String,
    /// Primary text color.
    pub text: String,
    /// Secondary text (dates, footer, event details).
    pub text_muted: String,
    /// Headings, buttons and links.
    pub accent: String,
    /// Card borders and separators.
    pub border: String,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            background: "#f4f4f7".to_string(),
            surface: "#ffffff".to_string(),
            text: "#1f1f29".to_string(),
            text_muted: "#6b6b7b".to_string(),
            accent: "#4f3bd1".to_string(),
            border: "#e4e4ec".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Where generated newsletters are written and listed from.
    pub output_dir: PathBuf,
    /// Where uploaded spreadsheets are kept.
    pub upload_dir: PathBuf,
    /// Upload size ceiling in megabytes.
    pub max_upload_mb: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5001,
            output_dir: PathBuf::from("output"),
            upload_dir: PathBuf::from("uploads"),
            max_upload_mb: 16,
        }
    }
}

impl ServerConfig {
    pub fn max_upload_bytes(&self) -> usize {
        (self.max_upload_mb as usize).saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AuthConfig {
    pub enabled: bool,
    pub username: String,
    pub password: String,
    /// Realm sent in the `WWW-Authenticate` challenge.
    pub realm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            username: "admin".to_string(),
            password: "changez-moi".to_string(),
            realm: "UX Curation - Accès restreint".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(dir: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = dir.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    Ok(config)
}

/// Load config from `config.toml` in `dir` (stock defaults when absent),
/// apply environment overrides through `lookup`, then validate.
pub fn load_config<F>(dir: &Path, lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = resolve_config(stock_defaults_value()?, load_raw_config(dir)?)?;
    config.apply_env(lookup)?;
    config.validate()?;
    Ok(config)
}

/// Environment lookup used outside tests.
pub fn process_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# curation-letter configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.
#
# Environment variables win over this file:
#   PORT, OUTPUT_FOLDER, UPLOAD_FOLDER, MAX_UPLOAD_MB,
#   ENABLE_AUTH, AUTH_USERNAME, AUTH_PASSWORD

# ---------------------------------------------------------------------------
# Newsletter
# ---------------------------------------------------------------------------
[newsletter]
# Shown in the email header and the browser tab.
title = "UX Curation"

# "fr" or "en". Drives month names, section headings and button labels.
locale = "fr"

# ---------------------------------------------------------------------------
# Defaults for empty event cells
# ---------------------------------------------------------------------------
[defaults]
price = "Free"
language = "Français"

# ---------------------------------------------------------------------------
# Email palette (inlined on every element)
# ---------------------------------------------------------------------------
[colors]
background = "#f4f4f7"
surface = "#ffffff"
text = "#1f1f29"
text_muted = "#6b6b7b"    # Dates, footer, event details
accent = "#4f3bd1"        # Headings, buttons, links
border = "#e4e4ec"

# ---------------------------------------------------------------------------
# Web front end
# ---------------------------------------------------------------------------
[server]
host = "0.0.0.0"
port = 5001

# Generated newsletters (listed by the history page).
output_dir = "output"

# Uploaded spreadsheets are kept here.
upload_dir = "uploads"

# Upload size ceiling.
max_upload_mb = 16

# ---------------------------------------------------------------------------
# HTTP basic authentication
# ---------------------------------------------------------------------------
[auth]
enabled = false
username = "admin"
password = "changez-moi"
realm = "UX Curation - Accès restreint"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn env_map(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_values() {
        let config = AppConfig::default();
        assert_eq!(config.newsletter.title, "UX Curation");
        assert_eq!(config.newsletter.locale, Locale::Fr);
        assert_eq!(config.defaults.price, "Free");
        assert_eq!(config.defaults.language, "Français");
        assert_eq!(config.server.port, 5001);
        assert_eq!(config.server.max_upload_mb, 16);
        assert!(!config.auth.enabled);
    }

    #[test]
    fn max_upload_bytes_is_megabytes() {
        let config = ServerConfig::default();
        assert_eq!(config.max_upload_bytes(), 16 * 1024 * 1024);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r##"
[colors]
accent = "#ff0000"
"##;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.colors.accent, "#ff0000");
        assert_eq!(config.colors.surface, "#ffffff");
        assert_eq!(config.server.port, 5001);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path(), no_env).unwrap();
        assert_eq!(config.newsletter.title, "UX Curation");
        assert_eq!(config.server.output_dir, PathBuf::from("output"));
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[newsletter]
title = "Design Digest"
locale = "en"

[defaults]
price = "Gratuit"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path(), no_env).unwrap();
        assert_eq!(config.newsletter.title, "Design Digest");
        assert_eq!(config.newsletter.locale, Locale::En);
        assert_eq!(config.defaults.price, "Gratuit");
        assert_eq!(config.defaults.language, "Français");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path(), no_env);
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
prot = 80
"#,
        )
        .unwrap();
        let result = load_config(tmp.path(), no_env);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_locale_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
[newsletter]
locale = "de"
"#,
        );
        assert!(result.is_err());
    }

    // =========================================================================
    // Environment overlay tests
    // =========================================================================

    #[test]
    fn env_overrides_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
[server]
port = 8000
"#,
        )
        .unwrap();
        let env = env_map(&[("PORT", "9000"), ("OUTPUT_FOLDER", "/srv/out")]);
        let config = load_config(tmp.path(), env).unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.output_dir, PathBuf::from("/srv/out"));
    }

    #[test]
    fn env_enables_auth() {
        let mut config = AppConfig::default();
        config
            .apply_env(env_map(&[
                ("ENABLE_AUTH", "True"),
                ("AUTH_USERNAME", "editor"),
                ("AUTH_PASSWORD", "s3cret"),
            ]))
            .unwrap();
        assert!(config.auth.enabled);
        assert_eq!(config.auth.username, "editor");
        assert_eq!(config.auth.password, "s3cret");
    }

    #[test]
    fn env_auth_flag_variants() {
        for (value, expected) in [("True", true), ("1", true), ("yes", true), ("False", false), ("", false)] {
            let mut config = AppConfig::default();
            config.apply_env(env_map(&[("ENABLE_AUTH", value)])).unwrap();
            assert_eq!(config.auth.enabled, expected, "ENABLE_AUTH={value:?}");
        }
    }

    #[test]
    fn env_invalid_port_is_error() {
        let mut config = AppConfig::default();
        let result = config.apply_env(env_map(&[("PORT", "eighty")]));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn env_max_upload() {
        let mut config = AppConfig::default();
        config.apply_env(env_map(&[("MAX_UPLOAD_MB", "2")])).unwrap();
        assert_eq!(config.server.max_upload_bytes(), 2 * 1024 * 1024);
    }

    // =========================================================================
    // Validation tests
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_upload_limit_bounds() {
        let mut config = AppConfig::default();
        config.server.max_upload_mb = 0;
        assert!(config.validate().is_err());
        config.server.max_upload_mb = 1025;
        assert!(config.validate().is_err());
        config.server.max_upload_mb = 1024;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_auth_requires_credentials() {
        let mut config = AppConfig::default();
        config.auth.enabled = true;
        config.auth.password = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("auth"));
    }

    #[test]
    fn validate_empty_title() {
        let mut config = AppConfig::default();
        config.newsletter.title = "  ".into();
        assert!(config.validate().is_err());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_deep_nested() {
        let base: toml::Value = toml::from_str(
            r##"
[colors]
accent = "#000"
text = "#111"
"##,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str(
            r##"
[colors]
accent = "#fff"
"##,
        )
        .unwrap();
        let merged = merge_toml(base, overlay);
        let colors = merged.get("colors").unwrap();
        assert_eq!(colors.get("accent").unwrap().as_str(), Some("#fff"));
        assert_eq!(colors.get("text").unwrap().as_str(), Some("#111"));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("port = 1").unwrap();
        let overlay: toml::Value = toml::from_str("port = 2").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("port").unwrap().as_integer(), Some(2));
    }

    #[test]
    fn load_raw_config_returns_none_when_no_file() {
        let tmp = TempDir::new().unwrap();
        assert!(load_raw_config(tmp.path()).unwrap().is_none());
    }

    // =========================================================================
    // stock_config_toml tests
    // =========================================================================

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = AppConfig::default();
        assert_eq!(config.newsletter.title, defaults.newsletter.title);
        assert_eq!(config.defaults, defaults.defaults);
        assert_eq!(config.colors.accent, defaults.colors.accent);
        assert_eq!(config.server.port, defaults.server.port);
        assert_eq!(config.auth.realm, defaults.auth.realm);
    }

    #[test]
    fn stock_config_toml_contains_all_sections() {
        let content = stock_config_toml();
        for section in ["[newsletter]", "[defaults]", "[colors]", "[server]", "[auth]"] {
            assert!(content.contains(section), "missing {section}");
        }
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value().unwrap();
        for key in ["newsletter", "defaults", "colors", "server", "auth"] {
            assert!(val.get(key).is_some(), "missing {key}");
        }
    }
}
