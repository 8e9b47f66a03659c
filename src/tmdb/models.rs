//! Response shapes for the TMDB endpoints the views read.
//!
//! Only the fields some view renders are declared; serde ignores the rest.
//! Anything TMDB may omit or send as `null` is an `Option` or defaulted.

use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Movie,
    Tv,
}

impl MediaType {
    pub fn as_path(&self) -> &'static str {
        match self {
            MediaType::Movie => "movie",
            MediaType::Tv => "tv",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MediaType::Movie => "Movie",
            MediaType::Tv => "TV",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_path())
    }
}

impl FromStr for MediaType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.to_lowercase().as_str() {
            "movie" => Ok(MediaType::Movie),
            "tv" => Ok(MediaType::Tv),
            _ => Err(anyhow!("media type must be 'movie' or 'tv'")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendingPeriod {
    Day,
    Week,
}

impl TrendingPeriod {
    pub fn as_path(&self) -> &'static str {
        match self {
            TrendingPeriod::Day => "day",
            TrendingPeriod::Week => "week",
        }
    }
}

/// Feeds behind the home page trailer carousel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TrailerFilter {
    #[default]
    Popular,
    Streaming,
    OnTv,
    InTheatres,
}

/// Netflix, the provider the streaming feeds are narrowed to.
const STREAMING_PROVIDER: &str = "8";

impl TrailerFilter {
    pub const ALL: [TrailerFilter; 4] = [
        TrailerFilter::Popular,
        TrailerFilter::Streaming,
        TrailerFilter::OnTv,
        TrailerFilter::InTheatres,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TrailerFilter::Popular => "Popular",
            TrailerFilter::Streaming => "Streaming",
            TrailerFilter::OnTv => "On TV",
            TrailerFilter::InTheatres => "In Theatres",
        }
    }

    /// Media type of every item in the feed.
    pub fn media_type(&self) -> MediaType {
        match self {
            TrailerFilter::OnTv => MediaType::Tv,
            _ => MediaType::Movie,
        }
    }

    /// Upstream path and fixed query for the feed. Regional feeds also need
    /// `watch_region`, which the client appends.
    pub fn endpoint(&self) -> (&'static str, Vec<(&'static str, &'static str)>) {
        match self {
            TrailerFilter::Popular => ("/movie/popular", Vec::new()),
            TrailerFilter::Streaming => (
                "/discover/movie",
                vec![("with_watch_providers", STREAMING_PROVIDER)],
            ),
            TrailerFilter::OnTv => (
                "/discover/tv",
                vec![
                    ("page", "1"),
                    ("sort_by", "first_air_date.desc"),
                    ("with_watch_providers", STREAMING_PROVIDER),
                ],
            ),
            TrailerFilter::InTheatres => ("/movie/now_playing", Vec::new()),
        }
    }

    pub fn is_regional(&self) -> bool {
        matches!(self, TrailerFilter::Streaming | TrailerFilter::OnTv)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Page<T> {
    #[serde(default)]
    pub page: u32,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A movie, show or person entry from a list, search, trending or
/// recommendations response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListItem {
    pub id: i64,
    pub media_type: Option<String>,
    pub title: Option<String>,
    pub name: Option<String>,
    pub original_title: Option<String>,
    pub original_name: Option<String>,
    pub overview: Option<String>,
    pub poster_path: Option<String>,
    pub backdrop_path: Option<String>,
    pub release_date: Option<String>,
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub adult: bool,
    #[serde(default)]
    pub genre_ids: Vec<i64>,
    pub original_language: Option<String>,
}

impl ListItem {
    /// `None` for people and anything else that is not a title. Entries from
    /// single-kind lists carry no `media_type`; a `name` marks a show there.
    pub fn media_kind(&self) -> Option<MediaType> {
        match self.media_type.as_deref() {
            Some("movie") => Some(MediaType::Movie),
            Some("tv") => Some(MediaType::Tv),
            Some(_) => None,
            None if self.name.is_some() => Some(MediaType::Tv),
            None => Some(MediaType::Movie),
        }
    }

    pub fn display_title(&self) -> &str {
        let (first, second) = match self.media_kind() {
            Some(MediaType::Tv) => (&self.name, &self.title),
            _ => (&self.title, &self.name),
        };
        first
            .as_deref()
            .or(second.as_deref())
            .unwrap_or_default()
    }

    pub fn display_date(&self) -> Option<&str> {
        let (first, second) = match self.media_kind() {
            Some(MediaType::Tv) => (&self.first_air_date, &self.release_date),
            _ => (&self.release_date, &self.first_air_date),
        };
        first
            .as_deref()
            .or(second.as_deref())
            .filter(|d| !d.is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Genre {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Company {
    pub id: i64,
    pub name: String,
    pub logo_path: Option<String>,
    pub origin_country: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Creator {
    pub id: i64,
    pub name: String,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeasonSummary {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    #[serde(default)]
    pub episode_count: u32,
    pub season_number: u32,
    pub poster_path: Option<String>,
}

/// `/movie/{id}` and `/tv/{id}` share one shape; fields of the other kind
/// are simply absent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Details {
    pub id: i64,
    #[serde(default)]
    pub adult: bool,
    pub backdrop_path: Option<String>,
    pub poster_path: Option<String>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    pub homepage: Option<String>,
    pub original_language: Option<String>,
    pub overview: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub production_companies: Vec<Company>,
    pub status: Option<String>,
    pub tagline: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,

    pub title: Option<String>,
    pub original_title: Option<String>,
    pub release_date: Option<String>,
    pub budget: Option<u64>,
    pub revenue: Option<u64>,
    pub runtime: Option<u32>,
    pub imdb_id: Option<String>,

    pub name: Option<String>,
    pub original_name: Option<String>,
    pub first_air_date: Option<String>,
    pub last_air_date: Option<String>,
    #[serde(default)]
    pub created_by: Vec<Creator>,
    pub episode_run_time: Option<Vec<u32>>,
    pub number_of_episodes: Option<u32>,
    pub number_of_seasons: Option<u32>,
    #[serde(default)]
    pub seasons: Vec<SeasonSummary>,
    #[serde(rename = "type")]
    pub show_type: Option<String>,
    pub in_production: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CastMember {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub order: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CrewMember {
    pub id: i64,
    pub name: String,
    pub job: Option<String>,
    pub department: Option<String>,
    pub credit_id: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Videos {
    #[serde(default)]
    pub results: Vec<Video>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Video {
    pub id: String,
    pub key: String,
    pub name: String,
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    #[serde(default)]
    pub official: bool,
    pub published_at: Option<String>,
}

impl Videos {
    /// First YouTube trailer, the one the play buttons open.
    pub fn youtube_trailer(&self) -> Option<&Video> {
        self.results
            .iter()
            .find(|v| v.video_type == "Trailer" && v.site == "YouTube")
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Images {
    #[serde(default)]
    pub backdrops: Vec<ImageItem>,
    #[serde(default)]
    pub posters: Vec<ImageItem>,
    #[serde(default)]
    pub logos: Vec<ImageItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImageItem {
    pub file_path: String,
    #[serde(default)]
    pub aspect_ratio: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    pub iso_639_1: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SeasonDetails {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub poster_path: Option<String>,
    pub season_number: u32,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub episodes: Vec<Episode>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Episode {
    pub id: i64,
    pub name: String,
    pub overview: Option<String>,
    pub air_date: Option<String>,
    pub episode_number: u32,
    pub season_number: u32,
    pub still_path: Option<String>,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
    #[serde(default)]
    pub guest_stars: Vec<GuestStar>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GuestStar {
    pub id: i64,
    pub name: String,
    pub character: Option<String>,
    pub credit_id: Option<String>,
    pub profile_path: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchProviders {
    #[serde(default)]
    pub results: HashMap<String, ProviderCountry>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderCountry {
    pub link: Option<String>,
    #[serde(default)]
    pub flatrate: Vec<Provider>,
    #[serde(default)]
    pub rent: Vec<Provider>,
    #[serde(default)]
    pub buy: Vec<Provider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Provider {
    pub provider_id: i64,
    pub provider_name: String,
    pub logo_path: Option<String>,
    #[serde(default)]
    pub display_priority: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExternalIds {
    pub imdb_id: Option<String>,
    pub facebook_id: Option<String>,
    pub instagram_id: Option<String>,
    pub twitter_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Person {
    pub id: i64,
    pub name: String,
    pub biography: Option<String>,
    pub birthday: Option<String>,
    pub deathday: Option<String>,
    pub place_of_birth: Option<String>,
    pub known_for_department: Option<String>,
    pub profile_path: Option<String>,
    #[serde(default)]
    pub popularity: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CombinedCredits {
    #[serde(default)]
    pub cast: Vec<PersonCredit>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PersonCredit {
    #[serde(flatten)]
    pub item: ListItem,
    pub character: Option<String>,
    pub credit_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn media_kind_uses_explicit_type_then_name() {
        let person: ListItem =
            serde_json::from_value(json!({ "id": 1, "media_type": "person", "name": "A" }))
                .expect("person");
        assert_eq!(person.media_kind(), None);

        let show: ListItem =
            serde_json::from_value(json!({ "id": 2, "name": "Show" })).expect("show");
        assert_eq!(show.media_kind(), Some(MediaType::Tv));

        let movie: ListItem =
            serde_json::from_value(json!({ "id": 3, "title": "Film" })).expect("movie");
        assert_eq!(movie.media_kind(), Some(MediaType::Movie));
    }

    #[test]
    fn display_fields_follow_media_kind() {
        let show: ListItem = serde_json::from_value(json!({
            "id": 2,
            "media_type": "tv",
            "name": "Show",
            "first_air_date": "2019-04-01"
        }))
        .expect("show");
        assert_eq!(show.display_title(), "Show");
        assert_eq!(show.display_date(), Some("2019-04-01"));

        let movie: ListItem = serde_json::from_value(json!({
            "id": 3,
            "title": "Film",
            "release_date": ""
        }))
        .expect("movie");
        assert_eq!(movie.display_title(), "Film");
        assert_eq!(movie.display_date(), None);
    }

    #[test]
    fn details_tolerate_nulls_and_missing_fields() {
        let details: Details = serde_json::from_value(json!({
            "id": 9,
            "title": "Film",
            "tagline": null,
            "runtime": null,
            "type": "Scripted"
        }))
        .expect("details");
        assert!(details.genres.is_empty());
        assert_eq!(details.runtime, None);
        assert_eq!(details.show_type.as_deref(), Some("Scripted"));
    }

    #[test]
    fn picks_first_youtube_trailer() {
        let videos: Videos = serde_json::from_value(json!({
            "results": [
                { "id": "a", "key": "teaser", "name": "Teaser", "site": "YouTube", "type": "Teaser" },
                { "id": "b", "key": "vimeo", "name": "Trailer", "site": "Vimeo", "type": "Trailer" },
                { "id": "c", "key": "yt", "name": "Trailer", "site": "YouTube", "type": "Trailer" }
            ]
        }))
        .expect("videos");
        assert_eq!(videos.youtube_trailer().map(|v| v.key.as_str()), Some("yt"));
    }

    #[test]
    fn trailer_filters_parse_from_kebab_case() {
        let filter: TrailerFilter = serde_json::from_value(json!("in-theatres")).expect("filter");
        assert_eq!(filter, TrailerFilter::InTheatres);
        assert_eq!(TrailerFilter::OnTv.media_type(), MediaType::Tv);
        assert_eq!(TrailerFilter::OnTv.endpoint().0, "/discover/tv");
    }
}
