use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

use crate::config::Config;

mod cache;
pub mod images;
pub mod models;

pub use cache::ResponseCache;
pub use models::{
    CombinedCredits, Credits, Details, ExternalIds, Images, ListItem, MediaType, Page, Person,
    SeasonDetails, TrailerFilter, TrendingPeriod, Videos, WatchProviders,
};

/// Upstream failures, kept apart from JSON decoding so handlers can tell a
/// missing title from an outage.
#[derive(Debug, Clone, Error)]
pub enum TmdbError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },
    #[error("{url} -> {status}: {body}")]
    Status { status: u16, url: String, body: String },
}

impl TmdbError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, TmdbError::Status { status: 404, .. })
    }
}

#[async_trait]
pub trait TmdbApi: Send + Sync {
    async fn popular(&self, kind: MediaType) -> Result<Page<ListItem>>;
    async fn trending(&self, kind: MediaType, period: TrendingPeriod) -> Result<Page<ListItem>>;
    async fn search_multi(&self, query: &str) -> Result<Page<ListItem>>;
    async fn trailer_feed(&self, filter: TrailerFilter) -> Result<Page<ListItem>>;
    async fn details(&self, kind: MediaType, id: i64) -> Result<Details>;
    async fn credits(&self, kind: MediaType, id: i64) -> Result<Credits>;
    async fn videos(&self, kind: MediaType, id: i64) -> Result<Videos>;
    async fn images(&self, kind: MediaType, id: i64) -> Result<Images>;
    async fn recommendations(&self, kind: MediaType, id: i64) -> Result<Page<ListItem>>;
    async fn watch_providers(&self, kind: MediaType, id: i64) -> Result<WatchProviders>;
    async fn external_ids(&self, kind: MediaType, id: i64) -> Result<ExternalIds>;
    async fn person(&self, id: i64) -> Result<Person>;
    async fn person_combined_credits(&self, id: i64) -> Result<CombinedCredits>;
    async fn season(&self, show_id: i64, season: u32) -> Result<SeasonDetails>;
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    language: String,
    watch_region: String,
    cache: ResponseCache,
}

impl TmdbClient {
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = header::HeaderMap::new();
        let mut auth = header::HeaderValue::from_str(&format!("Bearer {}", config.tmdb_api_key))
            .context("TMDB_API_KEY is not a valid header value")?;
        auth.set_sensitive(true);
        headers.insert(header::AUTHORIZATION, auth);
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(30))
            .user_agent(format!("reelscout/{}", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .context("Failed to build TMDB HTTP client")?;

        Ok(Self {
            client,
            base_url: config.tmdb_api_base.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            watch_region: config.watch_region.clone(),
            cache: ResponseCache::new(config.cache_capacity, config.cache_ttl),
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        build_url(&self.base_url, path, query)
    }

    /// Localised GET; image listings are fetched without a language so every
    /// asset comes back.
    async fn get_localized<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path, &[("language", &self.language)]);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let body = self.cache.get_or_fetch(url, self.fetch_text(url)).await?;
        let parsed: T = serde_json::from_str(&body)
            .with_context(|| format!("JSON parse failed for {url}"))?;
        Ok(parsed)
    }

    async fn fetch_text(&self, url: &str) -> Result<String, TmdbError> {
        debug!(%url, "TMDB GET");
        let res = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TmdbError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;
        let status = res.status();
        let text = res.text().await.map_err(|e| TmdbError::Request {
            url: url.to_string(),
            message: format!("reading body failed: {e}"),
        })?;
        if !status.is_success() {
            return Err(TmdbError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body: text,
            });
        }
        Ok(text)
    }
}

#[async_trait]
impl TmdbApi for TmdbClient {
    async fn popular(&self, kind: MediaType) -> Result<Page<ListItem>> {
        self.get_localized(&format!("/{kind}/popular")).await
    }

    async fn trending(&self, kind: MediaType, period: TrendingPeriod) -> Result<Page<ListItem>> {
        self.get_localized(&format!("/trending/{kind}/{}", period.as_path()))
            .await
    }

    async fn search_multi(&self, query: &str) -> Result<Page<ListItem>> {
        let url = self.url(
            "/search/multi",
            &[("language", &self.language), ("query", query)],
        );
        self.get_json(&url).await
    }

    async fn trailer_feed(&self, filter: TrailerFilter) -> Result<Page<ListItem>> {
        let (path, fixed) = filter.endpoint();
        let mut query: Vec<(&str, &str)> = fixed;
        query.insert(0, ("language", self.language.as_str()));
        if filter.is_regional() {
            query.push(("watch_region", self.watch_region.as_str()));
        }
        let url = self.url(path, &query);
        self.get_json(&url).await
    }

    async fn details(&self, kind: MediaType, id: i64) -> Result<Details> {
        self.get_localized(&format!("/{kind}/{id}")).await
    }

    async fn credits(&self, kind: MediaType, id: i64) -> Result<Credits> {
        self.get_localized(&format!("/{kind}/{id}/credits")).await
    }

    async fn videos(&self, kind: MediaType, id: i64) -> Result<Videos> {
        self.get_localized(&format!("/{kind}/{id}/videos")).await
    }

    async fn images(&self, kind: MediaType, id: i64) -> Result<Images> {
        let url = self.url(&format!("/{kind}/{id}/images"), &[]);
        self.get_json(&url).await
    }

    async fn recommendations(&self, kind: MediaType, id: i64) -> Result<Page<ListItem>> {
        self.get_localized(&format!("/{kind}/{id}/recommendations"))
            .await
    }

    async fn watch_providers(&self, kind: MediaType, id: i64) -> Result<WatchProviders> {
        let url = self.url(&format!("/{kind}/{id}/watch/providers"), &[]);
        self.get_json(&url).await
    }

    async fn external_ids(&self, kind: MediaType, id: i64) -> Result<ExternalIds> {
        let url = self.url(&format!("/{kind}/{id}/external_ids"), &[]);
        self.get_json(&url).await
    }

    async fn person(&self, id: i64) -> Result<Person> {
        self.get_localized(&format!("/person/{id}")).await
    }

    async fn person_combined_credits(&self, id: i64) -> Result<CombinedCredits> {
        self.get_localized(&format!("/person/{id}/combined_credits"))
            .await
    }

    async fn season(&self, show_id: i64, season: u32) -> Result<SeasonDetails> {
        self.get_localized(&format!("/tv/{show_id}/season/{season}"))
            .await
    }
}

fn build_url(base: &str, path: &str, query: &[(&str, &str)]) -> String {
    let mut url = format!("{base}{path}");
    for (i, (key, value)) in query.iter().enumerate() {
        url.push(if i == 0 { '?' } else { '&' });
        url.push_str(key);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}
