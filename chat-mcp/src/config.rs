//! Configuration loading (.chat-mcp.toml)

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::client::ClientOptions;
use crate::tools::ValidationOptions;

/// Default config file name
pub const CONFIG_FILE: &str = ".chat-mcp.toml";

/// Find a config file by walking up the directory tree, then checking global config.
///
/// Search order:
/// 1. Current directory and parent directories (walking up to root)
/// 2. Global config at ~/.config/chat-mcp/
fn find_config_file(filename: &str) -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let candidate = current.join(filename);
        if candidate.exists() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) => current = parent.to_path_buf(),
            None => break,
        }
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_path = config_dir.join("chat-mcp").join(filename);
        if global_path.exists() {
            return Some(global_path);
        }
    }

    None
}

/// Top-level configuration
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Chat section
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// How many times the backend may ask for tools within one user turn
    #[serde(default = "default_max_tool_rounds")]
    pub max_tool_rounds: usize,
}

/// Tools section
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsConfig {
    #[serde(default)]
    pub strict_schemas: bool,
    #[serde(default)]
    pub enforce_enum: bool,
}

// Default value functions
fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_max_tool_rounds() -> usize {
    5
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_tool_rounds: default_max_tool_rounds(),
        }
    }
}

impl ToolsConfig {
    pub fn client_options(&self) -> ClientOptions {
        ClientOptions {
            strict_schemas: self.strict_schemas,
            validation: ValidationOptions {
                enforce_enum: self.enforce_enum,
            },
        }
    }
}

impl FileConfig {
    /// Load config, falling back to defaults when no file is found
    pub fn load() -> Result<Self> {
        if let Some(config_path) = find_config_file(CONFIG_FILE) {
            tracing::debug!("Loading config from: {}", config_path.display());
            return Self::load_from_path(&config_path);
        }

        tracing::debug!("No {} found, using defaults", CONFIG_FILE);
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FileConfig::parse("").unwrap();
        assert_eq!(config.chat, ChatConfig::default());
        assert_eq!(config.chat.model, "gpt-4o-mini");
        assert_eq!(config.chat.max_tokens, 1000);
        assert!(!config.tools.strict_schemas);
        assert!(!config.tools.enforce_enum);
    }

    #[test]
    fn test_partial_sections() {
        let config = FileConfig::parse(
            r#"
            [chat]
            model = "llama3.1:8b"
            max_tool_rounds = 2

            [tools]
            enforce_enum = true
            "#,
        )
        .unwrap();

        assert_eq!(config.chat.model, "llama3.1:8b");
        assert_eq!(config.chat.max_tool_rounds, 2);
        assert_eq!(config.chat.temperature, 0.7);
        assert!(config.tools.client_options().validation.enforce_enum);
        assert!(!config.tools.client_options().strict_schemas);
    }

    #[test]
    fn test_load_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[chat]\ntemperature = 0.2").unwrap();

        let config = FileConfig::load_from_path(file.path()).unwrap();
        assert!((config.chat.temperature - 0.2).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_keys_rejected() {
        // Endpoint settings from a proxy setup are rejected, not ignored
        let err = FileConfig::parse("[chat]\napi_url = \"https://example.com/v1\"").unwrap_err();
        assert!(format!("{:#}", err).contains("api_url"));

        assert!(FileConfig::parse("[tools]\nenforce_enums = true").is_err());
    }

    #[test]
    fn test_invalid_config_errors() {
        assert!(FileConfig::parse("[chat]\nmax_tokens = \"lots\"").is_err());
    }
}
