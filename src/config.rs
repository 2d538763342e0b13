use dotenvy::dotenv;
use once_cell::sync::Lazy;
use std::env;
use std::time::Duration;

pub const DEFAULT_UPSTREAM_URL: &str = "https://api.pokemontcg.io/v2";

pub static CONFIG: Lazy<Config> = Lazy::new(|| {
    dotenv().ok(); // Load .env file if present
    Config {
        api_key: get_env_opt("POKEMONTCG_API_KEY"),
        upstream_url: get_env_or_default("CARDSCOUT_UPSTREAM_URL", DEFAULT_UPSTREAM_URL),
        bind_addr: get_env_or_default("CARDSCOUT_BIND", "0.0.0.0:3000"),
        static_dir: get_env_or_default("CARDSCOUT_STATIC_DIR", "static"),
        gateway_url: get_env_or_default("CARDSCOUT_GATEWAY_URL", "http://localhost:3000"),
        debounce: Duration::from_millis(parse_env_or_default("CARDSCOUT_DEBOUNCE_MS", 400)),
    }
});

pub struct Config {
    /// Sent as `X-Api-Key` upstream when present.
    pub api_key: Option<String>,
    pub upstream_url: String,
    pub bind_addr: String,
    pub static_dir: String,
    pub gateway_url: String,
    pub debounce: Duration,
}

fn get_env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn get_env_or_default(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env_or_default(key: &str, default: u64) -> u64 {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|e| {
            log::warn!("invalid {key} value {raw:?} ({e}), using default: {default}");
            default
        }),
        Err(_) => default,
    }
}
