use anyhow::{anyhow, Context, Result};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_API_BASE: &str = "https://api.themoviedb.org/3";
const DEFAULT_LANGUAGE: &str = "en-US";
const DEFAULT_WATCH_REGION: &str = "US";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3146";
const DEFAULT_CACHE_TTL_SECS: u64 = 300;
const DEFAULT_CACHE_CAPACITY: u64 = 1_000;
const DEFAULT_SEARCH_DEBOUNCE_MS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    /// TMDB v4 read access token, sent as a bearer token.
    pub tmdb_api_key: String,
    pub tmdb_api_base: String,
    pub language: String,
    pub watch_region: String,
    pub bind_addr: SocketAddr,
    pub cache_ttl: Duration,
    pub cache_capacity: u64,
    pub search_debounce: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let tmdb_api_key = get("TMDB_API_KEY").ok_or_else(|| anyhow!("TMDB_API_KEY must be set"))?;

        Ok(Self {
            tmdb_api_key,
            tmdb_api_base: get("TMDB_API_BASE").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
            language: get("TMDB_LANGUAGE").unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            watch_region: get("WATCH_REGION")
                .map(|r| r.to_uppercase())
                .unwrap_or_else(|| DEFAULT_WATCH_REGION.to_string()),
            bind_addr: parse_or("BIND_ADDR", get("BIND_ADDR"), DEFAULT_BIND_ADDR.parse()?)?,
            cache_ttl: Duration::from_secs(parse_or(
                "CACHE_TTL_SECS",
                get("CACHE_TTL_SECS"),
                DEFAULT_CACHE_TTL_SECS,
            )?),
            cache_capacity: parse_or(
                "CACHE_CAPACITY",
                get("CACHE_CAPACITY"),
                DEFAULT_CACHE_CAPACITY,
            )?,
            search_debounce: Duration::from_millis(parse_or(
                "SEARCH_DEBOUNCE_MS",
                get("SEARCH_DEBOUNCE_MS"),
                DEFAULT_SEARCH_DEBOUNCE_MS,
            )?),
        })
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => value
            .parse()
            .with_context(|| format!("Invalid value for {key}: '{value}'")),
        None => Ok(default),
    }
}
