use std::{env, fmt, fs, path::Path, time::Duration};

use serde::Deserialize;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const GENERATE_PATH: &str = "/v1beta/models";
const DEFAULT_MODELS: [&str; 3] = ["gemini-1.5-flash", "gemini-pro", "gemini-1.0-pro"];
const DEFAULT_TIMEOUT_SECS: u64 = 10;
const API_KEYS_PATH: &str = "config/api_keys.json";
const PLACEHOLDER_KEY: &str = "YOUR_GEMINI_API_KEY_HERE";

/// Gemini configuration sourced from the environment, with `config/api_keys.json`
/// as a secondary key source.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub base_url: String,
    /// Tried in order until one answers.
    pub models: Vec<String>,
    pub timeout: Duration,
}

#[derive(Deserialize)]
struct ApiKeysFile {
    gemini_api_key: Option<String>,
}

impl GeminiConfig {
    pub fn from_env() -> Result<Self, GeminiConfigError> {
        Self::from_lookup(|name| env::var(name).ok(), Path::new(API_KEYS_PATH))
    }

    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        keys_file: &Path,
    ) -> Result<Self, GeminiConfigError> {
        let api_key = lookup("GEMINI_API_KEY")
            .and_then(usable_key)
            .or_else(|| read_key_file(keys_file))
            .ok_or(GeminiConfigError::MissingApiKey)?;

        let base_url = lookup("GEMINI_BASE_URL")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let models: Vec<String> = lookup("GEMINI_MODELS")
            .map(|value| {
                value
                    .split(',')
                    .map(|model| model.trim().to_string())
                    .filter(|model| !model.is_empty())
                    .collect()
            })
            .filter(|models: &Vec<String>| !models.is_empty())
            .unwrap_or_else(|| DEFAULT_MODELS.iter().map(|model| model.to_string()).collect());

        let timeout = lookup("GEMINI_TIMEOUT_SECS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
            .map(Duration::from_secs)
            .unwrap_or_else(|| Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        Ok(Self {
            api_key,
            base_url,
            models,
            timeout,
        })
    }

    pub fn generate_url(&self, model: &str) -> String {
        format!(
            "{}{}/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            GENERATE_PATH,
            model
        )
    }
}

fn usable_key(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed == PLACEHOLDER_KEY {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn read_key_file(path: &Path) -> Option<String> {
    let raw = fs::read_to_string(path).ok()?;
    let parsed: ApiKeysFile = serde_json::from_str(&raw).ok()?;
    parsed.gemini_api_key.and_then(usable_key)
}

#[derive(Debug)]
pub enum GeminiConfigError {
    MissingApiKey,
    ClientBuild(String),
}

impl fmt::Display for GeminiConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingApiKey => write!(f, "missing GEMINI_API_KEY"),
            Self::ClientBuild(message) => write!(f, "client build failure: {}", message),
        }
    }
}

impl std::error::Error for GeminiConfigError {}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::HashMap, time::SystemTime};

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    fn missing_file() -> std::path::PathBuf {
        env::temp_dir().join("mochapet_no_such_api_keys.json")
    }

    #[test]
    fn defaults_fill_everything_but_the_key() {
        let config =
            GeminiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", " abc ")]), &missing_file())
                .expect("key present");
        assert_eq!(config.api_key, "abc");
        assert_eq!(config.models, vec!["gemini-1.5-flash", "gemini-pro", "gemini-1.0-pro"]);
        assert_eq!(config.timeout, Duration::from_secs(10));
        assert_eq!(
            config.generate_url("gemini-pro"),
            "https://generativelanguage.googleapis.com/v1beta/models/gemini-pro:generateContent"
        );
    }

    #[test]
    fn placeholder_or_blank_keys_count_as_missing() {
        for key in ["", "   ", PLACEHOLDER_KEY] {
            let result = GeminiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", key)]), &missing_file());
            assert!(matches!(result, Err(GeminiConfigError::MissingApiKey)));
        }
    }

    #[test]
    fn key_file_is_a_secondary_source() {
        let unique_suffix = SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = env::temp_dir().join(format!("mochapet_api_keys_{}.json", unique_suffix));
        fs::write(&path, r#"{"gemini_api_key": "from-file"}"#).expect("write fixture");

        let config = GeminiConfig::from_lookup(lookup(&[]), &path).expect("file key");
        assert_eq!(config.api_key, "from-file");

        fs::write(&path, format!(r#"{{"gemini_api_key": "{}"}}"#, PLACEHOLDER_KEY))
            .expect("write fixture");
        assert!(GeminiConfig::from_lookup(lookup(&[]), &path).is_err());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = GeminiConfig::from_lookup(
            lookup(&[
                ("GEMINI_API_KEY", "k"),
                ("GEMINI_BASE_URL", "http://localhost:8080/"),
                ("GEMINI_MODELS", "a, b,,"),
                ("GEMINI_TIMEOUT_SECS", "3"),
            ]),
            &missing_file(),
        )
        .expect("valid");
        assert_eq!(config.models, vec!["a", "b"]);
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(
            config.generate_url("a"),
            "http://localhost:8080/v1beta/models/a:generateContent"
        );
    }
}
