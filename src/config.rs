// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from a secrets file and environment variables.
//!
//! Secrets are looked up in the TOML secrets file first and the process
//! environment second. Everything is read once at startup.

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

const DEFAULT_SECRETS_FILE: &str = ".streamlit/secrets.toml";
const DEFAULT_USERS_FILE: &str = "users.json";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-pro";
const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_GEMINI_TIMEOUT_SECS: u64 = 300;

/// Which persistence policy the deployment uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageConfig {
    /// Hosted backend with provider-issued identity and row-level security.
    Supabase { url: String, anon_key: String },
    /// Single JSON document on local disk.
    File { path: PathBuf },
}

impl StorageConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            StorageConfig::Supabase { .. } => "supabase",
            StorageConfig::File { .. } => "file",
        }
    }
}

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Public URL the app is served from (decides whether cookies are `Secure`)
    pub public_url: String,
    /// Persistence backend
    pub storage: StorageConfig,

    // --- Generative text API ---
    /// Gemini API key. Missing keys surface as generation errors, not startup errors.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub gemini_timeout_secs: u64,

    /// HS256 key for the session cookie (raw bytes)
    pub session_signing_key: Vec<u8>,
}

impl Config {
    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            public_url: "http://localhost:8080".to_string(),
            storage: StorageConfig::File {
                path: PathBuf::from(DEFAULT_USERS_FILE),
            },
            gemini_api_key: Some("test_gemini_key".to_string()),
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            gemini_timeout_secs: DEFAULT_GEMINI_TIMEOUT_SECS,
            session_signing_key: b"test_session_key_32_bytes_min!!!".to_vec(),
        }
    }

    /// Load configuration from the secrets file and environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let secrets_path =
            env::var("SECRETS_FILE").unwrap_or_else(|_| DEFAULT_SECRETS_FILE.to_string());
        let secrets = Secrets::load(Path::new(&secrets_path))?;

        Self::from_sources(&secrets, |name| env::var(name).ok())
    }

    /// Build configuration from an explicit secrets table and environment lookup.
    pub fn from_sources<F>(secrets: &Secrets, env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| secrets.get(name).or_else(|| env(name));

        let storage = match env("STORAGE_BACKEND")
            .unwrap_or_else(|| "supabase".to_string())
            .trim()
            .to_ascii_lowercase()
            .as_str()
        {
            "supabase" => {
                // Both halves of the credential pair come from the same source.
                let (url, anon_key) = match (
                    secrets.get("SUPABASE_URL"),
                    secrets.get("SUPABASE_ANON_KEY"),
                ) {
                    (Some(url), Some(key)) => (Some(url), Some(key)),
                    _ => (env("SUPABASE_URL"), env("SUPABASE_ANON_KEY")),
                };
                StorageConfig::Supabase {
                    url: url
                        .filter(|v| !v.trim().is_empty())
                        .ok_or(ConfigError::Missing("SUPABASE_URL"))?
                        .trim()
                        .trim_end_matches('/')
                        .to_string(),
                    anon_key: anon_key
                        .filter(|v| !v.trim().is_empty())
                        .ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?
                        .trim()
                        .to_string(),
                }
            }
            "file" => StorageConfig::File {
                path: PathBuf::from(
                    env("USERS_FILE").unwrap_or_else(|| DEFAULT_USERS_FILE.to_string()),
                ),
            },
            other => return Err(ConfigError::Invalid("STORAGE_BACKEND", other.to_string())),
        };

        Ok(Self {
            port: env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            public_url: env("PUBLIC_URL").unwrap_or_else(|| "http://localhost:8080".to_string()),
            storage,
            gemini_api_key: lookup("GEMINI_API_KEY")
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
            gemini_model: env("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            gemini_timeout_secs: env("GEMINI_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_GEMINI_TIMEOUT_SECS),
            session_signing_key: lookup("SESSION_SIGNING_KEY")
                .ok_or(ConfigError::Missing("SESSION_SIGNING_KEY"))?
                .into_bytes(),
        })
    }

    /// Whether cookies should carry the `Secure` attribute.
    pub fn secure_cookies(&self) -> bool {
        self.public_url.starts_with("https://")
    }
}

/// Flat key/value table read from the deployment secrets file.
#[derive(Debug, Clone, Default)]
pub struct Secrets {
    values: HashMap<String, String>,
}

impl Secrets {
    /// Read a TOML secrets file. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::parse(&raw),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(e) => Err(ConfigError::Secrets(format!("{}: {}", path.display(), e))),
        }
    }

    /// Parse top-level string keys out of a TOML document.
    pub fn parse(raw: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = raw
            .parse()
            .map_err(|e: toml::de::Error| ConfigError::Secrets(e.to_string()))?;

        let values = table
            .into_iter()
            .filter_map(|(key, value)| match value {
                toml::Value::String(s) => Some((key, s)),
                _ => None,
            })
            .collect();

        Ok(Self { values })
    }

    pub fn get(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration value: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),

    #[error("Failed to read secrets file: {0}")]
    Secrets(String),
}
