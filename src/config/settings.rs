//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files.  Every section carries
//! `#[serde(default)]`, so a settings file only needs the keys it changes.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::AppPaths;

/// Environment variable holding the Facebook page id.
pub const ENV_PAGE_ID: &str = "FB_PAGE_ID";
/// Environment variable holding the page access token.
pub const ENV_PAGE_TOKEN: &str = "FB_PAGE_TOKEN";

const DEFAULT_CALL_TO_ACTION: &str =
    "Check out XtraSpace App: https://play.google.com/store/apps/details?id=com.xtraspace.app";

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Configuration problems detected at startup.  All of them are fatal.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value required by the selected run mode is absent.
    #[error("missing required setting `{key}` (set it in settings.toml or via {env})")]
    Missing { key: &'static str, env: &'static str },

    /// `reply.confidence_threshold` must lie in `[0, 1]`.
    #[error("reply.confidence_threshold must be within [0, 1], got {0}")]
    InvalidThreshold(f32),

    /// `preprocess.max_len` must be at least one token.
    #[error("preprocess.max_len must be greater than zero")]
    ZeroMaxLen,

    /// At least one reply-worthy intent prefix is required.
    #[error("reply.intent_prefixes must not be empty")]
    NoIntentPrefixes,
}

// ---------------------------------------------------------------------------
// ArtifactConfig
// ---------------------------------------------------------------------------

/// Locations of the three static JSON artifacts exported with the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ArtifactConfig {
    /// Word → id map produced by the tokenizer.
    pub vocabulary: PathBuf,
    /// Ordered intent labels; index = model output slot.
    pub intent_labels: PathBuf,
    /// Province → id map with the `__reverse__` alias index.
    pub province_map: PathBuf,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            vocabulary: PathBuf::from("web_model/tokenizer_word_index.json"),
            intent_labels: PathBuf::from("web_model/intent_classes.json"),
            province_map: PathBuf::from("web_model/province_index.json"),
        }
    }
}

// ---------------------------------------------------------------------------
// PreprocessConfig
// ---------------------------------------------------------------------------

/// Tokenizer settings.  `max_len` must match the model's input width.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Fixed token sequence length fed to the model.
    pub max_len: usize,
    /// Replace every non-word, non-space character with a space before
    /// splitting.  Off by default: the deployed bot never stripped
    /// punctuation, and the model was validated against that behaviour.
    pub strip_punctuation: bool,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            max_len: 30,
            strip_punctuation: false,
        }
    }
}

// ---------------------------------------------------------------------------
// ClassifierConfig
// ---------------------------------------------------------------------------

/// Connection details for the model-serving endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of the serving host (e.g. `http://localhost:8501`).
    pub base_url: String,
    /// Model name as registered with the server.
    pub model: String,
    /// Name of the token-sequence input tensor.
    pub text_input: String,
    /// Name of the province-id input tensor.
    pub province_input: String,
    /// Maximum seconds to wait for one prediction.
    pub timeout_secs: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8501".into(),
            model: "intent_model_with_loc".into(),
            text_input: "text_input".into(),
            province_input: "prov_input".into(),
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// ReplyConfig
// ---------------------------------------------------------------------------

/// Policy and template for automated replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplyConfig {
    /// A reply is sent only when confidence is strictly above this value.
    pub confidence_threshold: f32,
    /// Intent label prefixes that mark a user as seeking a service.
    pub intent_prefixes: Vec<String>,
    /// Message template; `{intent}` and `{cta}` are substituted.
    pub template: String,
    /// Fixed call-to-action appended through `{cta}`.
    pub call_to_action: String,
}

impl Default for ReplyConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.6,
            intent_prefixes: vec!["looking_for_".into()],
            template: "Hi! It seems you’re {intent}. {cta}".into(),
            call_to_action: DEFAULT_CALL_TO_ACTION.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// DedupConfig
// ---------------------------------------------------------------------------

/// Seen-item tracking.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// When set, seen ids are persisted to this JSON file and reloaded on
    /// the next run.  `None` keeps them in memory for the current run only.
    pub persist_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// PlatformConfig
// ---------------------------------------------------------------------------

/// Graph API settings for fetching items and posting replies.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlatformConfig {
    /// Graph API host.
    pub base_url: String,
    /// Graph API version path segment.
    pub api_version: String,
    /// Page whose posts are monitored (comment-listener mode).
    pub page_id: Option<String>,
    /// Page access token.  Prefer supplying it via `FB_PAGE_TOKEN`.
    pub page_token: Option<String>,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// Phrases searched in keyword-search mode.
    pub search_keywords: Vec<String>,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            base_url: "https://graph.facebook.com".into(),
            api_version: "v19.0".into(),
            page_id: None,
            page_token: None,
            user_agent: "Mozilla/5.0 (XtraSpaceBot; +https://xtraspace.app)".into(),
            timeout_secs: 15,
            search_keywords: [
                "looking for bed space",
                "need a bed space",
                "bedspace in lusaka",
                "house on rent",
                "house for rent",
                "flat for rent",
                "apartment rent",
                "lodge in ndola",
                "bnb in chipata",
                "accommodation in livingstone",
                "event space kitwe",
                "hall for rent",
                "roommate in lusaka",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// DumpConfig
// ---------------------------------------------------------------------------

/// Settings for the dump mode, which writes search results to disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpConfig {
    /// Phrases searched when dumping.
    pub keywords: Vec<String>,
    /// Every file the dump is written to.
    pub output_paths: Vec<PathBuf>,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            keywords: vec![
                "rent house lusaka".into(),
                "lodge ndola".into(),
                "event space kitwe".into(),
            ],
            output_paths: vec![
                PathBuf::from("scraped_posts.json"),
                PathBuf::from("docs/scraped_posts.json"),
            ],
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use intent_responder::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let mut config = AppConfig::load().unwrap();
/// config.apply_env_overrides();
/// config.validate().unwrap();
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Static model artifacts.
    pub artifacts: ArtifactConfig,
    /// Tokenizer settings.
    pub preprocess: PreprocessConfig,
    /// Model-serving endpoint.
    pub classifier: ClassifierConfig,
    /// Reply policy and template.
    pub reply: ReplyConfig,
    /// Seen-item tracking.
    pub dedup: DedupConfig,
    /// Graph API access.
    pub platform: PlatformConfig,
    /// Dump mode.
    pub dump: DumpConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save to an explicit path, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Overlay `FB_PAGE_ID` / `FB_PAGE_TOKEN` from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Overlay page credentials from `lookup`; blank values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).filter(|v: &String| !v.trim().is_empty());

        if let Some(id) = non_blank(ENV_PAGE_ID) {
            self.platform.page_id = Some(id);
        }
        if let Some(token) = non_blank(ENV_PAGE_TOKEN) {
            self.platform.page_token = Some(token);
        }
    }

    /// Check the settings every run mode depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let threshold = self.reply.confidence_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ConfigError::InvalidThreshold(threshold));
        }
        if self.preprocess.max_len == 0 {
            return Err(ConfigError::ZeroMaxLen);
        }
        if self.reply.intent_prefixes.iter().all(|p| p.is_empty()) {
            return Err(ConfigError::NoIntentPrefixes);
        }
        Ok(())
    }

    /// Page access token, required by every mode that talks to the platform.
    pub fn require_page_token(&self) -> Result<&str, ConfigError> {
        self.platform
            .page_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or(ConfigError::Missing {
                key: "platform.page_token",
                env: ENV_PAGE_TOKEN,
            })
    }

    /// Page id, required by the comment-listener mode.
    pub fn require_page_id(&self) -> Result<&str, ConfigError> {
        self.platform
            .page_id
            .as_deref()
            .filter(|id| !id.is_empty())
            .ok_or(ConfigError::Missing {
                key: "platform.page_id",
                env: ENV_PAGE_ID,
            })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.artifacts.vocabulary, loaded.artifacts.vocabulary);
        assert_eq!(original.preprocess.max_len, loaded.preprocess.max_len);
        assert_eq!(original.classifier.base_url, loaded.classifier.base_url);
        assert_eq!(original.classifier.model, loaded.classifier.model);
        assert_eq!(
            original.reply.confidence_threshold,
            loaded.reply.confidence_threshold
        );
        assert_eq!(original.reply.intent_prefixes, loaded.reply.intent_prefixes);
        assert_eq!(original.reply.template, loaded.reply.template);
        assert_eq!(original.platform.api_version, loaded.platform.api_version);
        assert_eq!(
            original.platform.search_keywords,
            loaded.platform.search_keywords
        );
        assert_eq!(original.dump.output_paths, loaded.dump.output_paths);
    }

    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        assert_eq!(config.preprocess.max_len, 30);
        assert!(config.platform.page_token.is_none());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(
            &path,
            "[reply]\nconfidence_threshold = 0.75\n\n[platform]\npage_id = \"123\"\n",
        )
        .unwrap();

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.reply.confidence_threshold, 0.75);
        assert_eq!(config.reply.intent_prefixes, vec!["looking_for_"]);
        assert_eq!(config.platform.page_id.as_deref(), Some("123"));
        assert_eq!(config.platform.api_version, "v19.0");
        assert_eq!(config.preprocess.max_len, 30);
    }

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.preprocess.max_len, 30);
        assert!(!cfg.preprocess.strip_punctuation);
        assert_eq!(cfg.reply.confidence_threshold, 0.6);
        assert!(cfg.reply.call_to_action.contains("com.xtraspace.app"));
        assert_eq!(cfg.classifier.text_input, "text_input");
        assert_eq!(cfg.classifier.province_input, "prov_input");
        assert!(cfg.dedup.persist_path.is_none());
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn overrides_replace_credentials() {
        let env: HashMap<&str, &str> =
            HashMap::from([(ENV_PAGE_ID, "579954655210740"), (ENV_PAGE_TOKEN, "tok")]);

        let mut cfg = AppConfig::default();
        cfg.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.require_page_id(), Ok("579954655210740"));
        assert_eq!(cfg.require_page_token(), Ok("tok"));
    }

    #[test]
    fn blank_override_is_ignored() {
        let mut cfg = AppConfig::default();
        cfg.platform.page_token = Some("from-file".into());
        cfg.apply_overrides(|k| (k == ENV_PAGE_TOKEN).then(|| "  ".to_string()));

        assert_eq!(cfg.require_page_token(), Ok("from-file"));
    }

    #[test]
    fn missing_credentials_are_reported() {
        let cfg = AppConfig::default();
        assert!(matches!(
            cfg.require_page_token(),
            Err(ConfigError::Missing { env: ENV_PAGE_TOKEN, .. })
        ));
        assert!(matches!(
            cfg.require_page_id(),
            Err(ConfigError::Missing { env: ENV_PAGE_ID, .. })
        ));
    }

    #[test]
    fn threshold_outside_unit_range_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.reply.confidence_threshold = 1.5;
        assert_eq!(cfg.validate(), Err(ConfigError::InvalidThreshold(1.5)));

        cfg.reply.confidence_threshold = -0.1;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn zero_max_len_is_rejected() {
        let mut cfg = AppConfig::default();
        cfg.preprocess.max_len = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::ZeroMaxLen));
    }

    #[test]
    fn empty_prefixes_are_rejected() {
        let mut cfg = AppConfig::default();
        cfg.reply.intent_prefixes.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::NoIntentPrefixes));
    }
}
