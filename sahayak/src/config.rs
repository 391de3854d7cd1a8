use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub llm: Option<LlmConfig>,
    pub weather: Option<WeatherConfig>,
    pub twilio: Option<TwilioConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub auth_token: Option<String>,
    pub local_path: Option<String>,
}

/// JWT signing material. Access and refresh tokens use separate secrets
/// so a leaked access secret cannot mint long-lived refresh tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    pub access_secret: String,
    pub refresh_secret: String,
    pub access_expiration_secs: u64,
    pub refresh_expiration_secs: u64,
}

pub(crate) const FALLBACK_ACCESS_SECRET: &str = "fallback_access_secret";
pub(crate) const FALLBACK_REFRESH_SECRET: &str = "fallback_refresh_secret";

impl AuthConfig {
    /// True when either JWT secret is still a built-in fallback value.
    pub fn uses_fallback_secrets(&self) -> bool {
        self.access_secret == FALLBACK_ACCESS_SECRET
            || self.refresh_secret == FALLBACK_REFRESH_SECRET
    }
}

/// LLM configuration for chat/completion models
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    /// Vision-capable model for image diagnosis. Falls back to `model`.
    pub vision_model: Option<String>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub max_retries: u32,
}

/// OpenWeather access plus the in-process cache and prefetcher knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct WeatherConfig {
    pub api_key: String,
    pub base_url: String,
    pub geo_url: String,
    pub cache_ttl_secs: u64,
    pub prefetch_cities: Vec<String>,
    pub prefetch_interval_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TwilioConfig {
    pub account_sid: String,
    pub auth_token: String,
}

const DEFAULT_PREFETCH_CITIES: &[&str] = &[
    "bangalore",
    "chennai",
    "delhi",
    "mumbai",
    "kolkata",
    "hyderabad",
    "davangere",
];

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: env::var("SAHAYAK_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("SAHAYAK_PORT", 3000),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL").unwrap_or_else(|_| "file:sahayak.db".to_string()),
                auth_token: env::var("DATABASE_AUTH_TOKEN").ok(),
                local_path: env::var("DATABASE_LOCAL_PATH").ok(),
            },
            auth: AuthConfig {
                access_secret: env::var("JWT_ACCESS_SECRET")
                    .unwrap_or_else(|_| FALLBACK_ACCESS_SECRET.to_string()),
                refresh_secret: env::var("JWT_REFRESH_SECRET")
                    .unwrap_or_else(|_| FALLBACK_REFRESH_SECRET.to_string()),
                access_expiration_secs: parse_env_or("JWT_ACCESS_EXPIRATION", 3600),
                refresh_expiration_secs: parse_env_or("JWT_REFRESH_EXPIRATION", 2592000),
            },
            llm: env::var("LLM_MODEL").ok().map(|model| LlmConfig {
                model,
                vision_model: env::var("LLM_VISION_MODEL").ok(),
                api_key: env::var("LLM_API_KEY").ok(),
                base_url: env::var("LLM_BASE_URL").ok(),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 30),
                max_retries: parse_env_or("LLM_MAX_RETRIES", 3),
            }),
            weather: env::var("OPENWEATHER_API_KEY").ok().map(|api_key| WeatherConfig {
                api_key,
                base_url: env::var("OPENWEATHER_BASE_URL")
                    .unwrap_or_else(|_| "https://api.openweathermap.org/data/2.5".to_string()),
                geo_url: env::var("OPENWEATHER_GEO_URL")
                    .unwrap_or_else(|_| "https://api.openweathermap.org/geo/1.0".to_string()),
                cache_ttl_secs: parse_env_or("WEATHER_CACHE_TTL_SECS", 3600),
                prefetch_cities: env::var("WEATHER_PREFETCH_CITIES")
                    .map(|cities| cities.split(',').map(|s| s.trim().to_string()).collect())
                    .unwrap_or_else(|_| {
                        DEFAULT_PREFETCH_CITIES.iter().map(|s| s.to_string()).collect()
                    }),
                prefetch_interval_secs: parse_env_or("WEATHER_PREFETCH_INTERVAL_SECS", 3600),
            }),
            twilio: match (env::var("TWILIO_ACCOUNT_SID"), env::var("TWILIO_AUTH_TOKEN")) {
                (Ok(account_sid), Ok(auth_token)) => Some(TwilioConfig {
                    account_sid,
                    auth_token,
                }),
                _ => None,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known LLM providers that use OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_server_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("SAHAYAK_HOST");
        std::env::remove_var("SAHAYAK_PORT");

        let config = Config::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_auth_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("JWT_ACCESS_SECRET");
        std::env::remove_var("JWT_REFRESH_SECRET");
        std::env::remove_var("JWT_ACCESS_EXPIRATION");
        std::env::remove_var("JWT_REFRESH_EXPIRATION");

        let config = Config::default();
        assert_eq!(config.auth.access_secret, "fallback_access_secret");
        assert_eq!(config.auth.refresh_secret, "fallback_refresh_secret");
        assert_eq!(config.auth.access_expiration_secs, 3600);
        assert_eq!(config.auth.refresh_expiration_secs, 2592000);
        assert!(config.auth.uses_fallback_secrets());
    }

    #[test]
    fn test_configured_secrets_are_not_flagged_as_fallback() {
        let auth = AuthConfig {
            access_secret: "real-access-secret".to_string(),
            refresh_secret: "real-refresh-secret".to_string(),
            access_expiration_secs: 3600,
            refresh_expiration_secs: 2592000,
        };
        assert!(!auth.uses_fallback_secrets());

        let half_configured = AuthConfig {
            refresh_secret: FALLBACK_REFRESH_SECRET.to_string(),
            ..auth
        };
        assert!(half_configured.uses_fallback_secrets());
    }

    #[test]
    fn test_llm_config_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_VISION_MODEL");

        let config = Config::default();
        assert!(config.llm.is_none());

        std::env::set_var("LLM_MODEL", "openai/gpt-4o-mini");
        let config = Config::default();
        assert!(config.llm.is_some());
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "openai/gpt-4o-mini");
        assert!(llm.vision_model.is_none());
        assert_eq!(llm.timeout_secs, 30);
        assert_eq!(llm.max_retries, 3);

        std::env::remove_var("LLM_MODEL");
    }

    #[test]
    fn test_weather_config_from_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::remove_var("OPENWEATHER_API_KEY");
        let config = Config::default();
        assert!(config.weather.is_none());

        std::env::set_var("OPENWEATHER_API_KEY", "test-key");
        std::env::set_var("WEATHER_CACHE_TTL_SECS", "120");
        std::env::set_var("WEATHER_PREFETCH_CITIES", "mysore, hubli");

        let config = Config::default();
        let weather = config.weather.unwrap();
        assert_eq!(weather.api_key, "test-key");
        assert_eq!(weather.cache_ttl_secs, 120);
        assert_eq!(weather.prefetch_cities, vec!["mysore", "hubli"]);

        std::env::remove_var("OPENWEATHER_API_KEY");
        std::env::remove_var("WEATHER_CACHE_TTL_SECS");
        std::env::remove_var("WEATHER_PREFETCH_CITIES");
    }

    #[test]
    fn test_weather_prefetch_defaults() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("OPENWEATHER_API_KEY", "test-key");
        std::env::remove_var("WEATHER_PREFETCH_CITIES");
        std::env::remove_var("WEATHER_PREFETCH_INTERVAL_SECS");

        let config = Config::default();
        let weather = config.weather.unwrap();
        assert_eq!(weather.prefetch_cities.len(), 7);
        assert_eq!(weather.prefetch_cities[0], "bangalore");
        assert_eq!(weather.prefetch_interval_secs, 3600);

        std::env::remove_var("OPENWEATHER_API_KEY");
    }

    #[test]
    fn test_twilio_config_requires_both_vars() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("TWILIO_ACCOUNT_SID", "AC123");
        std::env::remove_var("TWILIO_AUTH_TOKEN");
        let config = Config::default();
        assert!(config.twilio.is_none());

        std::env::set_var("TWILIO_AUTH_TOKEN", "secret");
        let config = Config::default();
        assert!(config.twilio.is_some());

        std::env::remove_var("TWILIO_ACCOUNT_SID");
        std::env::remove_var("TWILIO_AUTH_TOKEN");
    }

    #[test]
    fn test_parse_env_or_valid_value() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();
        std::env::set_var("__TEST_PARSE_PORT", "8080");
        let result: u16 = parse_env_or("__TEST_PARSE_PORT", 3000);
        assert_eq!(result, 8080);
        std::env::remove_var("__TEST_PARSE_PORT");
    }

    #[test]
    fn test_parse_llm_provider_model() {
        assert_eq!(
            parse_llm_provider_model("openai/gpt-4o-mini"),
            ("openai", "gpt-4o-mini")
        );
        assert_eq!(
            parse_llm_provider_model("openrouter/meta-llama/llama-3-8b"),
            ("openrouter", "meta-llama/llama-3-8b")
        );
        assert_eq!(parse_llm_provider_model("llama3"), ("local", "llama3"));
    }
}
