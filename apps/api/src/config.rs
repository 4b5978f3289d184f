use anyhow::{bail, Context, Result};

const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    Mock,
}

/// Application configuration loaded from environment variables.
/// Fails at startup when the selected provider has no API key.
#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_fallback_models: Vec<String>,
    pub mask_pii: bool,
    pub max_upload_bytes: usize,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let openai_api_key = optional_env("OPENAI_API_KEY");
        let gemini_api_key = optional_env("GEMINI_API_KEY");
        let provider = resolve_provider(
            optional_env("PROVIDER").as_deref(),
            openai_api_key.is_some(),
            gemini_api_key.is_some(),
        )?;

        Ok(Config {
            provider,
            openai_api_key,
            openai_model: optional_env("OPENAI_MODEL")
                .unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            gemini_api_key,
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_fallback_models: optional_env("GEMINI_FALLBACK_MODELS")
                .map(|list| split_list(&list))
                .unwrap_or_default(),
            mask_pii: optional_env("MASK_PII")
                .map(|v| parse_flag(&v))
                .transpose()
                .context("MASK_PII must be true or false")?
                .unwrap_or(false),
            max_upload_bytes: optional_env("MAX_UPLOAD_BYTES")
                .map(|v| v.parse::<usize>())
                .transpose()
                .context("MAX_UPLOAD_BYTES must be a byte count")?
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8787".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Gemini models in the order they are tried, without repeats.
    pub fn gemini_models(&self) -> Vec<String> {
        let mut models = vec![self.gemini_model.clone()];
        for model in &self.gemini_fallback_models {
            if !models.contains(model) {
                models.push(model.clone());
            }
        }
        models
    }

    /// Model name reported for the configured provider.
    pub fn model_label(&self) -> Option<&str> {
        match self.provider {
            ProviderKind::OpenAi => Some(&self.openai_model),
            ProviderKind::Gemini => Some(&self.gemini_model),
            ProviderKind::Mock => None,
        }
    }
}

/// Picks the provider from an explicit `PROVIDER` value or, when unset, from
/// whichever API key is present (OpenAI first).
pub fn resolve_provider(
    explicit: Option<&str>,
    has_openai_key: bool,
    has_gemini_key: bool,
) -> Result<ProviderKind> {
    let Some(name) = explicit else {
        return Ok(if has_openai_key {
            ProviderKind::OpenAi
        } else if has_gemini_key {
            ProviderKind::Gemini
        } else {
            ProviderKind::Mock
        });
    };

    match name.trim().to_ascii_lowercase().as_str() {
        "openai" if has_openai_key => Ok(ProviderKind::OpenAi),
        "openai" => bail!("PROVIDER=openai requires OPENAI_API_KEY"),
        "gemini" if has_gemini_key => Ok(ProviderKind::Gemini),
        "gemini" => bail!("PROVIDER=gemini requires GEMINI_API_KEY"),
        "mock" => Ok(ProviderKind::Mock),
        other => bail!("Unknown PROVIDER '{other}' (expected openai, gemini or mock)"),
    }
}

/// Reads a variable, treating blank values as unset.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_flag(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => bail!("not a boolean: '{other}'"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(provider: ProviderKind) -> Config {
        Config {
            provider,
            openai_api_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            gemini_fallback_models: vec![
                "gemini-2.0-flash".to_string(),
                DEFAULT_GEMINI_MODEL.to_string(),
            ],
            mask_pii: false,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            port: 8787,
            rust_log: "info".to_string(),
        }
    }

    #[test]
    fn test_provider_inferred_from_keys() {
        assert_eq!(resolve_provider(None, true, true).unwrap(), ProviderKind::OpenAi);
        assert_eq!(resolve_provider(None, false, true).unwrap(), ProviderKind::Gemini);
        assert_eq!(resolve_provider(None, false, false).unwrap(), ProviderKind::Mock);
    }

    #[test]
    fn test_explicit_provider_is_case_insensitive() {
        assert_eq!(resolve_provider(Some("Gemini"), false, true).unwrap(), ProviderKind::Gemini);
        assert_eq!(resolve_provider(Some("MOCK"), true, true).unwrap(), ProviderKind::Mock);
    }

    #[test]
    fn test_explicit_provider_without_key_fails() {
        let err = resolve_provider(Some("openai"), false, true).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
        assert!(resolve_provider(Some("gemini"), true, false).is_err());
    }

    #[test]
    fn test_unknown_provider_fails() {
        let err = resolve_provider(Some("claude"), true, true).unwrap_err();
        assert!(err.to_string().contains("Unknown PROVIDER 'claude'"));
    }

    #[test]
    fn test_gemini_models_preferred_first_without_repeats() {
        let models = config(ProviderKind::Gemini).gemini_models();
        assert_eq!(models, vec!["gemini-2.5-flash", "gemini-2.0-flash"]);
    }

    #[test]
    fn test_model_label() {
        assert_eq!(config(ProviderKind::OpenAi).model_label(), Some("gpt-4o-mini"));
        assert_eq!(config(ProviderKind::Mock).model_label(), None);
    }

    #[test]
    fn test_split_list_and_flags() {
        assert_eq!(split_list(" a, ,b ,"), vec!["a", "b"]);
        assert!(parse_flag("TRUE").unwrap());
        assert!(!parse_flag("0").unwrap());
        assert!(parse_flag("maybe").is_err());
    }
}
