//! Home page views: popular grid, trending carousel, trailer carousel and
//! search results.

use anyhow::Result;
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, warn};

use crate::media::TrailerLink;
use crate::rating::{RatingGauge, CARD_GAUGE};
use crate::tmdb::images::{image_url, poster_url, ImageSize};
use crate::tmdb::{ListItem, MediaType, TmdbApi, TrailerFilter, TrendingPeriod};

/// Items shown per trailer filter.
const TRAILER_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub date: Option<String>,
    pub poster: String,
    pub rating: RatingGauge,
    pub href: String,
}

impl Card {
    /// `None` for entries that are not movies or shows.
    pub fn from_item(item: &ListItem) -> Option<Self> {
        let kind = item.media_kind()?;
        let date = item.display_date().map(str::to_string);
        let year = date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
            .unwrap_or("N/A")
            .to_string();
        Some(Self {
            id: item.id,
            media_type: kind,
            title: item.display_title().to_string(),
            year,
            date,
            poster: poster_url(item.poster_path.as_deref()),
            rating: RatingGauge::from_vote_average(item.vote_average, CARD_GAUGE),
            href: details_href(kind, item.id),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrailerCard {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub overview: String,
    pub image: String,
    pub href: String,
    pub trailer: Option<TrailerLink>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailerFilterOption {
    pub key: TrailerFilter,
    pub label: &'static str,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrailerSection {
    pub filters: Vec<TrailerFilterOption>,
    pub items: Vec<TrailerCard>,
}

pub fn details_href(kind: MediaType, id: i64) -> String {
    format!("/details/{kind}/{id}")
}

/// Fills in `media_type` for entries of a single-kind list so they survive
/// being merged with the other kind.
pub fn tag_media_type(items: Vec<ListItem>, kind: MediaType) -> Vec<ListItem> {
    items
        .into_iter()
        .map(|mut item| {
            if item.media_type.is_none() {
                item.media_type = Some(kind.as_path().to_string());
            }
            item
        })
        .collect()
}

/// Concatenates both lists and orders them by non-increasing popularity.
/// Ties keep their input order.
pub fn merge_by_popularity(first: Vec<ListItem>, second: Vec<ListItem>) -> Vec<ListItem> {
    let mut merged = first;
    merged.extend(second);
    merged.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    merged
}

pub fn cards(items: &[ListItem]) -> Vec<Card> {
    items.iter().filter_map(Card::from_item).collect()
}

pub async fn popular(tmdb: &dyn TmdbApi) -> Result<Vec<Card>> {
    let (movies, shows) = tokio::try_join!(
        tmdb.popular(MediaType::Movie),
        tmdb.popular(MediaType::Tv),
    )?;
    let merged = merge_by_popularity(
        tag_media_type(movies.results, MediaType::Movie),
        tag_media_type(shows.results, MediaType::Tv),
    );
    Ok(cards(&merged))
}

/// Trending movies followed by trending shows, each in TMDB's order.
pub async fn trending(tmdb: &dyn TmdbApi, period: TrendingPeriod) -> Result<Vec<Card>> {
    let (movies, shows) = tokio::try_join!(
        tmdb.trending(MediaType::Movie, period),
        tmdb.trending(MediaType::Tv, period),
    )?;
    let mut items = tag_media_type(movies.results, MediaType::Movie);
    items.extend(tag_media_type(shows.results, MediaType::Tv));
    Ok(cards(&items))
}

/// Blank queries return nothing without touching TMDB.
pub async fn search(tmdb: &dyn TmdbApi, query: &str) -> Result<Vec<Card>> {
    let query = query.trim();
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let page = tmdb.search_multi(query).await?;
    debug!(query, hits = page.results.len(), "search");
    Ok(cards(&page.results))
}

pub async fn trailers(tmdb: &dyn TmdbApi, filter: TrailerFilter) -> Result<TrailerSection> {
    let kind = filter.media_type();
    let page = tmdb.trailer_feed(filter).await?;
    let slots: Vec<ListItem> = page.results.into_iter().take(TRAILER_SLOTS).collect();

    let lookups = slots.iter().map(|item| async move {
        match tmdb.videos(kind, item.id).await {
            Ok(videos) => videos.youtube_trailer().map(|v| TrailerLink::new(&v.key)),
            Err(e) => {
                warn!("No trailer for {} {}: {:#}", kind, item.id, e);
                None
            }
        }
    });
    let links = join_all(lookups).await;

    let items = slots
        .iter()
        .zip(links)
        .map(|(item, trailer)| TrailerCard {
            id: item.id,
            media_type: kind,
            title: item
                .name
                .as_deref()
                .or(item.title.as_deref())
                .unwrap_or_default()
                .to_string(),
            overview: item.overview.clone().unwrap_or_default(),
            image: image_url(
                item.backdrop_path
                    .as_deref()
                    .or(item.poster_path.as_deref()),
                ImageSize::W500,
            ),
            href: details_href(kind, item.id),
            trailer,
        })
        .collect();

    let filters = TrailerFilter::ALL
        .iter()
        .map(|f| TrailerFilterOption {
            key: *f,
            label: f.label(),
            active: *f == filter,
        })
        .collect();

    Ok(TrailerSection { filters, items })
}
