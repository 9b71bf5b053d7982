//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).
//! On top of the library's [`AppConfig`], the CLI reads a `[generator]`
//! section describing the external command that produces model output.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;
use thiserror::Error;

use archsketch::{ArchsketchError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingEnv(Vec<String>),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for ArchsketchError {
    fn from(err: ConfigError) -> Self {
        ArchsketchError::Config(err.to_string())
    }
}

/// Full CLI configuration: the library sections plus `[generator]`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CliConfig {
    #[serde(flatten)]
    app: AppConfig,

    #[serde(default)]
    generator: GeneratorConfig,
}

impl CliConfig {
    /// Returns the library configuration.
    pub fn app(&self) -> &AppConfig {
        &self.app
    }

    /// Returns the generator command configuration.
    pub fn generator(&self) -> &GeneratorConfig {
        &self.generator
    }
}

/// External command producing model output.
///
/// The command receives the requirements on stdin and the provider
/// and model in the `ARCHSKETCH_PROVIDER` and `ARCHSKETCH_MODEL` environment
/// variables; its stdout is the response.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    command: Option<String>,
    args: Vec<String>,
    required_env: Vec<String>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            command: None,
            args: Vec::new(),
            required_env: vec!["GROQ_API_KEY".to_string()],
        }
    }
}

impl GeneratorConfig {
    /// Creates a generator configuration.
    pub fn new(command: impl Into<String>, args: Vec<String>, required_env: Vec<String>) -> Self {
        Self {
            command: Some(command.into()),
            args,
            required_env,
        }
    }

    /// Program to run, if configured.
    pub fn command(&self) -> Option<&str> {
        self.command.as_deref()
    }

    /// Arguments passed to the program.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Environment variables that must be set before the program is run.
    pub fn required_env(&self) -> &[String] {
        &self.required_env
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (archsketch/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Arguments
///
/// * `explicit_path` - Optional explicit path to config file
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<CliConfig, ArchsketchError> {
    // 1. Try the explicitly provided path first if available
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    // 2. Try the local project directory
    let local_config = Path::new("archsketch/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    // 3. Try the platform-specific config directory
    if let Some(proj_dirs) = ProjectDirs::from("com", "archsketch", "archsketch") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    // 4. If no config is found, return default config
    debug!("No configuration file found, using default configuration");
    Ok(CliConfig::default())
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: impl AsRef<Path>) -> Result<CliConfig, ArchsketchError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;

    let config: CliConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let file = NamedTempFile::new().unwrap();
        fs::write(file.path(), content).unwrap();
        file
    }

    #[test]
    fn test_load_full_config() {
        let file = write_config(
            r#"
            [model]
            provider = "groq"
            id = "llama-3.3-8b-versatile"

            [display]
            height = 600

            [generator]
            command = "llm"
            args = ["--stream"]
            required_env = []
            "#,
        );

        let config = load_config(Some(file.path())).unwrap();

        assert_eq!(config.app().model().id(), "llama-3.3-8b-versatile");
        assert_eq!(config.app().display().height(), 600);
        assert_eq!(config.generator().command(), Some("llm"));
        assert_eq!(config.generator().args(), ["--stream".to_string()]);
        assert!(config.generator().required_env().is_empty());
    }

    #[test]
    fn test_generator_defaults() {
        let file = write_config("[display]\nshow_controls = false\n");

        let config = load_config(Some(file.path())).unwrap();

        assert!(!config.app().display().show_controls());
        assert_eq!(config.generator().command(), None);
        assert_eq!(config.generator().required_env(), ["GROQ_API_KEY".to_string()]);
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/definitely/not/here.toml")).unwrap_err();

        assert!(matches!(err, ArchsketchError::Config(_)));
        assert!(err.to_string().contains("Missing configuration file"));
    }

    #[test]
    fn test_invalid_toml() {
        let file = write_config("[display\nheight = ");

        let err = load_config(Some(file.path())).unwrap_err();

        assert!(err.to_string().contains("Failed to parse TOML configuration"));
    }

    #[test]
    fn test_missing_env_message() {
        let err = ConfigError::MissingEnv(vec!["A_KEY".to_string(), "B_KEY".to_string()]);
        assert_eq!(
            err.to_string(),
            "Missing required environment variables: A_KEY, B_KEY"
        );
    }
}
