//! Configuration for AI providers and image services.
//!
//! Credentials come from the environment or from an optional JSON file; they
//! are never compiled in. Values in the file win over defaults, and missing
//! keys are filled from the environment.

use crate::error::{ProviderError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// Supported LLM backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    DeepSeek,
    Anthropic,
    Gemini,
    Groq,
    HuggingFace,
    Ollama,
}

impl ProviderKind {
    /// Every backend, in the default try order.
    pub const ALL: [ProviderKind; 6] = [
        ProviderKind::DeepSeek,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Groq,
        ProviderKind::HuggingFace,
        ProviderKind::Ollama,
    ];

    pub fn display_name(&self) -> &'static str {
        match self {
            ProviderKind::DeepSeek => "DeepSeek",
            ProviderKind::Anthropic => "Anthropic",
            ProviderKind::Gemini => "Gemini",
            ProviderKind::Groq => "Groq",
            ProviderKind::HuggingFace => "Hugging Face",
            ProviderKind::Ollama => "Ollama",
        }
    }

    /// Environment variable holding the credential (or host, for Ollama).
    pub fn env_var(&self) -> &'static str {
        match self {
            ProviderKind::DeepSeek => "DEEPSEEK_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Groq => "GROQ_API_KEY",
            ProviderKind::HuggingFace => "HF_TOKEN",
            ProviderKind::Ollama => "OLLAMA_HOST",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::DeepSeek => "deepseek-chat",
            ProviderKind::Anthropic => "claude-3-5-haiku-latest",
            ProviderKind::Gemini => "gemini-1.5-flash",
            ProviderKind::Groq => "llama-3.1-8b-instant",
            ProviderKind::HuggingFace => "meta-llama/Llama-3.1-8B-Instruct",
            ProviderKind::Ollama => "llama3.1",
        }
    }

    pub fn default_endpoint(&self) -> &'static str {
        match self {
            ProviderKind::DeepSeek => "https://api.deepseek.com/chat/completions",
            ProviderKind::Anthropic => "https://api.anthropic.com/v1/messages",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com/v1beta/models",
            ProviderKind::Groq => "https://api.groq.com/openai/v1/chat/completions",
            ProviderKind::HuggingFace => "https://router.huggingface.co/v1/chat/completions",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }

    /// Hosted APIs answer quickly; local models and the shared HF router
    /// need longer.
    pub fn default_timeout_secs(&self) -> u64 {
        match self {
            ProviderKind::Groq => 30,
            ProviderKind::DeepSeek | ProviderKind::Anthropic | ProviderKind::Gemini => 60,
            ProviderKind::HuggingFace => 120,
            ProviderKind::Ollama => 180,
        }
    }

    /// Whether the backend works without an API key.
    pub fn is_keyless(&self) -> bool {
        matches!(self, ProviderKind::Ollama)
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ProviderKind {
    type Err = ProviderError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deepseek" => Ok(ProviderKind::DeepSeek),
            "anthropic" | "claude" => Ok(ProviderKind::Anthropic),
            "gemini" | "google" => Ok(ProviderKind::Gemini),
            "groq" => Ok(ProviderKind::Groq),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            "ollama" => Ok(ProviderKind::Ollama),
            other => Err(ProviderError::Config(format!("unknown provider '{other}'"))),
        }
    }
}

/// Per-backend overrides. Unset fields use the [`ProviderKind`] defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub endpoint: Option<String>,
    pub timeout_secs: Option<u64>,
}

/// Settings with every default applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedProvider {
    pub kind: ProviderKind,
    pub api_key: String,
    pub model: String,
    pub endpoint: String,
    pub timeout: Duration,
}

/// Image service credentials.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageSettings {
    pub pexels_key: Option<String>,
    pub unsplash_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for ImageSettings {
    fn default() -> Self {
        Self {
            pexels_key: None,
            unsplash_key: None,
            timeout_secs: 30,
        }
    }
}

/// Complete AI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Explicit try order. Empty means every configured backend in
    /// [`ProviderKind::ALL`] order.
    pub providers: Vec<ProviderKind>,
    pub deepseek: ProviderSettings,
    pub anthropic: ProviderSettings,
    pub gemini: ProviderSettings,
    pub groq: ProviderSettings,
    pub huggingface: ProviderSettings,
    pub ollama: ProviderSettings,
    pub images: ImageSettings,
}

impl AiConfig {
    /// Defaults plus credentials from the process environment.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_vars(|name| std::env::var(name).ok());
        config
    }

    /// Load a JSON config file, then fill missing credentials from the
    /// environment.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            ProviderError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let mut config = Self::from_json(&content)?;
        config.apply_vars(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Parse a JSON config without touching the environment.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| ProviderError::Config(format!("invalid config: {e}")))
    }

    /// Fill unset credentials from a variable lookup.
    pub fn apply_vars<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        for kind in ProviderKind::ALL {
            let value = lookup(kind.env_var());
            let settings = self.settings_mut(kind);
            if kind.is_keyless() {
                if settings.endpoint.is_none() {
                    settings.endpoint = value;
                }
            } else if settings.api_key.is_none() {
                settings.api_key = value;
            }
        }

        if self.images.pexels_key.is_none() {
            self.images.pexels_key = lookup("PEXELS_API_KEY");
        }
        if self.images.unsplash_key.is_none() {
            self.images.unsplash_key = lookup("UNSPLASH_ACCESS_KEY");
        }
    }

    pub fn settings(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::DeepSeek => &self.deepseek,
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::Gemini => &self.gemini,
            ProviderKind::Groq => &self.groq,
            ProviderKind::HuggingFace => &self.huggingface,
            ProviderKind::Ollama => &self.ollama,
        }
    }

    fn settings_mut(&mut self, kind: ProviderKind) -> &mut ProviderSettings {
        match kind {
            ProviderKind::DeepSeek => &mut self.deepseek,
            ProviderKind::Anthropic => &mut self.anthropic,
            ProviderKind::Gemini => &mut self.gemini,
            ProviderKind::Groq => &mut self.groq,
            ProviderKind::HuggingFace => &mut self.huggingface,
            ProviderKind::Ollama => &mut self.ollama,
        }
    }

    /// A backend is usable when it has a key, or needs none and has a host.
    pub fn is_configured(&self, kind: ProviderKind) -> bool {
        let settings = self.settings(kind);
        if kind.is_keyless() {
            settings.endpoint.is_some()
        } else {
            settings.api_key.is_some()
        }
    }

    /// Backends to try, in order.
    pub fn provider_order(&self) -> Vec<ProviderKind> {
        if self.providers.is_empty() {
            ProviderKind::ALL
                .into_iter()
                .filter(|&kind| self.is_configured(kind))
                .collect()
        } else {
            self.providers.clone()
        }
    }

    /// Apply defaults to one backend's settings.
    pub fn resolve(&self, kind: ProviderKind) -> Result<ResolvedProvider> {
        let settings = self.settings(kind);
        let api_key = match (&settings.api_key, kind.is_keyless()) {
            (Some(key), _) => key.clone(),
            (None, true) => String::new(),
            (None, false) => {
                return Err(ProviderError::AuthenticationError(format!(
                    "{} is not set",
                    kind.env_var()
                )))
            }
        };

        Ok(ResolvedProvider {
            kind,
            api_key,
            model: settings
                .model
                .clone()
                .unwrap_or_else(|| kind.default_model().to_string()),
            endpoint: settings
                .endpoint
                .clone()
                .unwrap_or_else(|| kind.default_endpoint().to_string()),
            timeout: Duration::from_secs(
                settings
                    .timeout_secs
                    .unwrap_or_else(|| kind.default_timeout_secs()),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_provider_kind_from_str() {
        assert_eq!("claude".parse::<ProviderKind>().unwrap(), ProviderKind::Anthropic);
        assert_eq!(" HF ".parse::<ProviderKind>().unwrap(), ProviderKind::HuggingFace);
        assert!("openai".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_apply_vars_fills_keys() {
        let mut config = AiConfig::default();
        config.apply_vars(vars(&[
            ("GROQ_API_KEY", "gsk-1"),
            ("OLLAMA_HOST", "http://gpu-box:11434"),
            ("PEXELS_API_KEY", "px"),
            ("DEEPSEEK_API_KEY", "  "),
        ]));

        assert_eq!(config.groq.api_key.as_deref(), Some("gsk-1"));
        assert_eq!(config.ollama.endpoint.as_deref(), Some("http://gpu-box:11434"));
        assert_eq!(config.images.pexels_key.as_deref(), Some("px"));
        assert_eq!(config.deepseek.api_key, None);
        assert_eq!(
            config.provider_order(),
            vec![ProviderKind::Groq, ProviderKind::Ollama]
        );
    }

    #[test]
    fn test_file_values_win_over_env() {
        let mut config = AiConfig::from_json(r#"{"anthropic": {"api_key": "from-file"}}"#).unwrap();
        config.apply_vars(vars(&[("ANTHROPIC_API_KEY", "from-env")]));
        assert_eq!(config.anthropic.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn test_explicit_order_kept() {
        let config =
            AiConfig::from_json(r#"{"providers": ["gemini", "deepseek"], "images": {"timeout_secs": 5}}"#)
                .unwrap();
        assert_eq!(
            config.provider_order(),
            vec![ProviderKind::Gemini, ProviderKind::DeepSeek]
        );
        assert_eq!(config.images.timeout_secs, 5);
    }

    #[test]
    fn test_resolve_defaults() {
        let mut config = AiConfig::default();
        config.deepseek.api_key = Some("sk".to_string());
        config.deepseek.timeout_secs = Some(10);

        let resolved = config.resolve(ProviderKind::DeepSeek).unwrap();
        assert_eq!(resolved.model, "deepseek-chat");
        assert_eq!(resolved.timeout, Duration::from_secs(10));

        let ollama = config.resolve(ProviderKind::Ollama).unwrap();
        assert_eq!(ollama.endpoint, "http://localhost:11434");
        assert_eq!(ollama.timeout, Duration::from_secs(180));

        assert!(matches!(
            config.resolve(ProviderKind::Gemini),
            Err(ProviderError::AuthenticationError(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(
            AiConfig::from_json("{not json"),
            Err(ProviderError::Config(_))
        ));
    }
}
