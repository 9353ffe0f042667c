//! Configuration module for the intent responder.
//!
//! Provides `AppConfig` (top-level settings), one sub-config per pipeline
//! stage, `AppPaths` for cross-platform config/data directories, and TOML
//! persistence via `AppConfig::load_from` / `AppConfig::save_to`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, ArtifactConfig, ClassifierConfig, ConfigError, DedupConfig, DumpConfig,
    PlatformConfig, PreprocessConfig, ReplyConfig,
};
