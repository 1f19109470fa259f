//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars (`.env` included) → CLI flags.
//!
//! Config lives at `~/.jarvis/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct JarvisConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub gemini: GeminiConfig,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub speech: SpeechConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ServerConfig {
    pub port: Option<u16>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub api_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct ClientConfig {
    pub provider: Option<String>,
    pub proxy_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SpeechConfig {
    pub command: Option<String>,
    pub args: Option<Vec<String>>,
    pub language: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";
pub const DEFAULT_PROVIDER: &str = "proxy";
pub const DEFAULT_SPEECH_LANGUAGE: &str = "en-US";

// ============================================================================
// Resolved Config (concrete values)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub port: u16,
    /// Empty when unset; the proxy reports it on first use.
    pub gemini_api_key: String,
    pub gemini_api_url: String,
    pub provider: String,
    pub proxy_url: String,
    pub speech: Option<SpeechCommand>,
}

/// External speech-to-text program, one transcript per stdout line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeechCommand {
    pub program: String,
    pub args: Vec<String>,
    pub language: String,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.jarvis/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".jarvis").join("config.toml"))
}

/// Load config from `~/.jarvis/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `JarvisConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<JarvisConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(JarvisConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(JarvisConfig::default());
    }

    let contents = fs::read_to_string(&path).map_err(ConfigError::Io)?;
    let config = parse_config(&contents)?;
    info!("Loaded config from {}", path.display());
    Ok(config)
}

pub fn parse_config(contents: &str) -> Result<JarvisConfig, ConfigError> {
    let config: JarvisConfig = toml::from_str(contents).map_err(ConfigError::Parse)?;
    // Never log the API key.
    debug!(
        "Config: port={:?} provider={:?} speech={:?}",
        config.server.port, config.client.provider, config.speech.command
    );
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r#"# J.A.R.V.I.S. Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars / .env → CLI flags.

# [server]
# port = 3000                        # Or set PORT

# [gemini]
# api_key = "..."                    # Or set GEMINI_API_KEY
# api_url = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent"

# [client]
# provider = "proxy"                 # "proxy" or "gemini" (direct, needs api_key)
# proxy_url = "http://localhost:3000"

# [speech]
# command = "my-stt"                 # Prints one transcript per line on stdout
# args = ["--interim"]
# language = "en-US"                 # Passed to the command as JARVIS_SPEECH_LANG
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(
    config: &JarvisConfig,
    cli_provider: Option<&str>,
    cli_port: Option<u16>,
) -> ResolvedConfig {
    resolve_with(config, cli_provider, cli_port, |key| std::env::var(key).ok())
}

/// Same as [`resolve`], reading variables through `env` instead of the process environment.
pub fn resolve_with(
    config: &JarvisConfig,
    cli_provider: Option<&str>,
    cli_port: Option<u16>,
    env: impl Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    // Port: CLI → env → config → default
    let port = cli_port
        .or_else(|| {
            env("PORT").and_then(|p| match p.trim().parse() {
                Ok(port) => Some(port),
                Err(_) => {
                    warn!("Ignoring invalid PORT value: {}", p);
                    None
                }
            })
        })
        .or(config.server.port)
        .unwrap_or(DEFAULT_PORT);

    let gemini_api_key = env("GEMINI_API_KEY")
        .or_else(|| config.gemini.api_key.clone())
        .unwrap_or_default();

    let gemini_api_url = env("GEMINI_API_URL")
        .or_else(|| config.gemini.api_url.clone())
        .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string());

    let provider = cli_provider
        .map(|s| s.to_string())
        .or_else(|| env("JARVIS_PROVIDER"))
        .or_else(|| config.client.provider.clone())
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    let proxy_url = env("JARVIS_PROXY_URL")
        .or_else(|| config.client.proxy_url.clone())
        .unwrap_or_else(|| format!("http://localhost:{port}"));

    let speech = env("JARVIS_SPEECH_COMMAND")
        .or_else(|| config.speech.command.clone())
        .filter(|c| !c.trim().is_empty())
        .map(|program| SpeechCommand {
            program,
            args: config.speech.args.clone().unwrap_or_default(),
            language: config
                .speech
                .language
                .clone()
                .unwrap_or_else(|| DEFAULT_SPEECH_LANGUAGE.to_string()),
        });

    ResolvedConfig {
        port,
        gemini_api_key,
        gemini_api_url,
        provider,
        proxy_url,
        speech,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_resolve_uses_defaults_when_empty() {
        let resolved = resolve_with(&JarvisConfig::default(), None, None, env_of(&[]));
        assert_eq!(resolved.port, 3000);
        assert_eq!(resolved.gemini_api_key, "");
        assert_eq!(resolved.gemini_api_url, DEFAULT_GEMINI_API_URL);
        assert_eq!(resolved.provider, "proxy");
        assert_eq!(resolved.proxy_url, "http://localhost:3000");
        assert_eq!(resolved.speech, None);
    }

    #[test]
    fn test_env_overrides_config_file() {
        let config = parse_config(
            r#"
[server]
port = 8080

[gemini]
api_key = "from-file"
"#,
        )
        .unwrap();
        let resolved = resolve_with(
            &config,
            None,
            None,
            env_of(&[("PORT", "4000"), ("GEMINI_API_KEY", "from-env")]),
        );
        assert_eq!(resolved.port, 4000);
        assert_eq!(resolved.gemini_api_key, "from-env");
        assert_eq!(resolved.proxy_url, "http://localhost:4000");
    }

    #[test]
    fn test_cli_wins_over_everything() {
        let config = parse_config("[client]\nprovider = \"proxy\"\n[server]\nport = 1\n").unwrap();
        let resolved = resolve_with(
            &config,
            Some("gemini"),
            Some(9999),
            env_of(&[("JARVIS_PROVIDER", "proxy"), ("PORT", "2")]),
        );
        assert_eq!(resolved.provider, "gemini");
        assert_eq!(resolved.port, 9999);
    }

    #[test]
    fn test_invalid_port_env_falls_through() {
        let resolved = resolve_with(
            &JarvisConfig::default(),
            None,
            None,
            env_of(&[("PORT", "not-a-port")]),
        );
        assert_eq!(resolved.port, DEFAULT_PORT);
    }

    #[test]
    fn test_speech_section() {
        let config = parse_config(
            r#"
[speech]
command = "whisper-stream"
args = ["--model", "base"]
"#,
        )
        .unwrap();
        let resolved = resolve_with(&config, None, None, env_of(&[]));
        assert_eq!(
            resolved.speech,
            Some(SpeechCommand {
                program: "whisper-stream".into(),
                args: vec!["--model".into(), "base".into()],
                language: "en-US".into(),
            })
        );
    }

    #[test]
    fn test_blank_speech_command_means_no_engine() {
        let resolved = resolve_with(
            &JarvisConfig::default(),
            None,
            None,
            env_of(&[("JARVIS_SPEECH_COMMAND", "  ")]),
        );
        assert_eq!(resolved.speech, None);
    }

    #[test]
    fn test_malformed_toml_is_a_parse_error() {
        let err = parse_config("[server\nport = ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().starts_with("config parse error"));
    }
}
