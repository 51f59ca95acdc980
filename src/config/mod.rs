//! Configuration module for Voice Polish.
//!
//! Provides `AppConfig` (the read-only settings snapshot handed to every
//! pipeline call), its sub-configs, `AppPaths` for cross-platform data
//! directories, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, CleanupConfig, LlmConfig, NetworkConfig, OutputConfig, PersonalizationConfig,
    ProviderCredentials, SttConfig, ToneConfig, AUTO_LANGUAGE,
};
