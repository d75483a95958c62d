//! Service configuration types for Parley.
//!
//! [`AppConfig`] is deserialized from `{data_dir}/config.toml` by
//! parley-infra; [`ApiCredential`] models the one external string credential
//! the remote generator depends on.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder value shipped in setup instructions. A credential equal to
/// this sentinel is treated the same as no credential at all.
pub const PLACEHOLDER_API_KEY: &str = "your-api-key-here";

/// Which reply generator the service runs with.
///
/// Selection happens once at startup; handlers never branch on it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorKind {
    Pattern,
    Remote,
}

impl fmt::Display for GeneratorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorKind::Pattern => write!(f, "pattern"),
            GeneratorKind::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for GeneratorKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pattern" => Ok(GeneratorKind::Pattern),
            "remote" => Ok(GeneratorKind::Remote),
            other => Err(format!("invalid generator kind: '{other}'")),
        }
    }
}

/// Global service configuration parsed from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Which reply generator to wire in at startup.
    #[serde(default = "default_generator")]
    pub generator: GeneratorKind,
    /// Model identifier for the remote generator.
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_generator() -> GeneratorKind {
    GeneratorKind::Pattern
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            generator: default_generator(),
            model: default_model(),
        }
    }
}

/// The remote provider credential, resolved from the environment.
///
/// `Missing` covers an unset variable, an empty value, and the placeholder
/// sentinel; the remote generator runs in offline mode in all three cases
/// without treating any of them as an error.
#[derive(Debug, Clone)]
pub enum ApiCredential {
    Configured(SecretString),
    Missing,
}

impl ApiCredential {
    /// Classify a raw credential value.
    pub fn from_value(value: Option<String>) -> Self {
        match value {
            Some(v) => {
                let trimmed = v.trim();
                if trimmed.is_empty() || trimmed == PLACEHOLDER_API_KEY {
                    ApiCredential::Missing
                } else {
                    ApiCredential::Configured(SecretString::from(trimmed.to_string()))
                }
            }
            None => ApiCredential::Missing,
        }
    }

    pub fn is_configured(&self) -> bool {
        matches!(self, ApiCredential::Configured(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_kind_roundtrip() {
        for kind in [GeneratorKind::Pattern, GeneratorKind::Remote] {
            let s = kind.to_string();
            let parsed: GeneratorKind = s.parse().unwrap();
            assert_eq!(kind, parsed);
        }
    }

    #[test]
    fn test_app_config_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.generator, GeneratorKind::Pattern);
        assert_eq!(config.model, "gemini-2.0-flash");
    }

    #[test]
    fn test_app_config_parse() {
        let config: AppConfig = toml::from_str(
            r#"
generator = "remote"
model = "gemini-2.5-pro"
"#,
        )
        .unwrap();
        assert_eq!(config.generator, GeneratorKind::Remote);
        assert_eq!(config.model, "gemini-2.5-pro");
    }

    #[test]
    fn test_credential_missing_when_unset() {
        assert!(!ApiCredential::from_value(None).is_configured());
    }

    #[test]
    fn test_credential_missing_when_empty() {
        assert!(!ApiCredential::from_value(Some("   ".to_string())).is_configured());
    }

    #[test]
    fn test_credential_missing_when_placeholder() {
        let cred = ApiCredential::from_value(Some(PLACEHOLDER_API_KEY.to_string()));
        assert!(!cred.is_configured());
    }

    #[test]
    fn test_credential_configured() {
        let cred = ApiCredential::from_value(Some("AIza-real-key".to_string()));
        assert!(cred.is_configured());
    }
}
