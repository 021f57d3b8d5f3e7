use anyhow::{bail, Result};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "bankdesk",
    about = "Natural-language query assistant for an NBFC core-banking database"
)]
pub struct CliArgs {
    /// Path to the core-banking SQLite database
    #[arg(long, default_value = "nbfc_core_banking.db")]
    pub db: String,

    /// Path to the JSON data dictionary describing the database
    #[arg(long, default_value = "nbfc_data_dictionary.json")]
    pub dictionary: String,

    /// Answer a single question and exit instead of starting the interactive shell
    #[arg(long)]
    pub question: Option<String>,

    /// SQL batch file applied to the database before answering questions.
    /// Creates the database file if it does not exist yet.
    #[arg(long)]
    pub seed: Option<String>,

    /// Log level (error | warn | info | debug | trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

/// LLM connection settings, resolved from the environment at startup.
///
/// The API key has exactly one channel: a runtime environment variable. It is
/// never read from a config file and must not appear in any built artifact.
#[derive(Debug, Clone)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub api_key: String,
}

impl LlmSettings {
    pub fn from_env() -> Result<Self> {
        let api_key = match dotenv::var("MISTRAL_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => bail!(
                "MISTRAL_API_KEY is not set. Supply it at run time \
                 (e.g. `docker run -e MISTRAL_API_KEY=...`); the key is never \
                 baked into the image or read from a config file."
            ),
        };

        let base_url = dotenv::var("LLM_BASE_URL")
            .unwrap_or_else(|_| "https://api.mistral.ai/v1".to_string());
        let model =
            dotenv::var("LLM_MODEL").unwrap_or_else(|_| "open-mixtral-8x7b".to_string());

        Ok(Self {
            base_url,
            model,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test covering both branches — env vars are process-wide and the
    // test harness runs in parallel, so the set/unset pairs stay together.
    #[test]
    fn test_from_env_requires_api_key() {
        std::env::remove_var("MISTRAL_API_KEY");
        let err = LlmSettings::from_env().unwrap_err();
        assert!(err.to_string().contains("MISTRAL_API_KEY"));

        std::env::set_var("MISTRAL_API_KEY", "test-key");
        let settings = LlmSettings::from_env().unwrap();
        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.base_url, "https://api.mistral.ai/v1");
        assert_eq!(settings.model, "open-mixtral-8x7b");
        std::env::remove_var("MISTRAL_API_KEY");
    }
}
