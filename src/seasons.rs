//! Season picker and the episode list for the selected season.

use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;

use crate::rating::{RatingGauge, CARD_GAUGE};
use crate::tmdb::images::{optional_image_url, ImageSize};
use crate::tmdb::models::{Episode, SeasonSummary};
use crate::tmdb::{SeasonDetails, TmdbApi};

pub const DEFAULT_SEASON: u32 = 1;
const GUEST_STARS_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonOption {
    pub value: u32,
    pub label: String,
}

/// Specials (season 0) are left out; the rest ascend by number.
pub fn season_options(seasons: &[SeasonSummary]) -> Vec<SeasonOption> {
    let mut valid: Vec<&SeasonSummary> = seasons.iter().filter(|s| s.season_number > 0).collect();
    valid.sort_by_key(|s| s.season_number);
    valid
        .into_iter()
        .map(|s| {
            let plain = format!("Season {}", s.season_number);
            let label = if s.name == plain {
                plain
            } else {
                format!("{} ({plain})", s.name)
            };
            SeasonOption {
                value: s.season_number,
                label,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct CrewCredit {
    pub job: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GuestCredit {
    pub character: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EpisodeView {
    pub id: i64,
    pub number: u32,
    pub name: String,
    pub air_date: Option<String>,
    pub runtime: Option<String>,
    pub rating: RatingGauge,
    pub still: Option<String>,
    pub overview: String,
    pub crew: Vec<CrewCredit>,
    pub guest_stars: Vec<GuestCredit>,
    pub more_guest_stars: usize,
}

impl From<&Episode> for EpisodeView {
    fn from(ep: &Episode) -> Self {
        let crew = ep
            .crew
            .iter()
            .filter_map(|member| match member.job.as_deref() {
                Some(job @ ("Director" | "Writer")) => Some(CrewCredit {
                    job: job.to_string(),
                    name: member.name.clone(),
                }),
                _ => None,
            })
            .collect();
        let guest_stars = ep
            .guest_stars
            .iter()
            .take(GUEST_STARS_SHOWN)
            .map(|g| GuestCredit {
                character: g.character.clone().unwrap_or_default(),
                name: g.name.clone(),
            })
            .collect();

        Self {
            id: ep.id,
            number: ep.episode_number,
            name: ep.name.clone(),
            air_date: ep.air_date.as_deref().and_then(display_date),
            runtime: ep.runtime.map(|r| format!("{r} min")),
            rating: RatingGauge::from_vote_average(ep.vote_average, CARD_GAUGE),
            still: optional_image_url(ep.still_path.as_deref(), ImageSize::W500),
            overview: ep
                .overview
                .clone()
                .filter(|o| !o.trim().is_empty())
                .unwrap_or_else(|| "No overview available.".to_string()),
            crew,
            guest_stars,
            more_guest_stars: ep.guest_stars.len().saturating_sub(GUEST_STARS_SHOWN),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonView {
    pub show_id: i64,
    pub season_number: u32,
    pub name: String,
    pub overview: Option<String>,
    pub episodes: Vec<EpisodeView>,
}

impl SeasonView {
    pub fn build(show_id: i64, season: &SeasonDetails) -> Self {
        Self {
            show_id,
            season_number: season.season_number,
            name: season.name.clone(),
            overview: season.overview.clone().filter(|o| !o.trim().is_empty()),
            episodes: season.episodes.iter().map(EpisodeView::from).collect(),
        }
    }
}

pub async fn season(tmdb: &dyn TmdbApi, show_id: i64, number: u32) -> Result<SeasonView> {
    let details = tmdb.season(show_id, number).await?;
    Ok(SeasonView::build(show_id, &details))
}

/// `2024-03-09` renders as `3/9/2024`; anything unparseable is shown as is.
pub fn display_date(raw: &str) -> Option<String> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date.format("%-m/%-d/%Y").to_string()),
        Err(_) => Some(raw.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn options_skip_specials_and_label_named_seasons() {
        let seasons: Vec<SeasonSummary> = serde_json::from_value(json!([
            { "id": 3, "name": "Season 2", "season_number": 2 },
            { "id": 1, "name": "Specials", "season_number": 0 },
            { "id": 2, "name": "Book One: Water", "season_number": 1 }
        ]))
        .expect("seasons");
        let options = season_options(&seasons);
        assert_eq!(
            options,
            vec![
                SeasonOption {
                    value: 1,
                    label: "Book One: Water (Season 1)".to_string()
                },
                SeasonOption {
                    value: 2,
                    label: "Season 2".to_string()
                },
            ]
        );
    }

    #[test]
    fn episode_view_filters_crew_and_truncates_guests() {
        let episode: Episode = serde_json::from_value(json!({
            "id": 10,
            "name": "Pilot",
            "overview": "",
            "air_date": "2008-01-20",
            "episode_number": 1,
            "season_number": 1,
            "still_path": null,
            "vote_average": 8.0,
            "runtime": 58,
            "crew": [
                { "id": 1, "name": "D", "job": "Director" },
                { "id": 2, "name": "W", "job": "Writer" },
                { "id": 3, "name": "E", "job": "Editor" }
            ],
            "guest_stars": [
                { "id": 1, "name": "G1", "character": "C1" },
                { "id": 2, "name": "G2", "character": "C2" },
                { "id": 3, "name": "G3", "character": "C3" },
                { "id": 4, "name": "G4", "character": "C4" },
                { "id": 5, "name": "G5", "character": "C5" },
                { "id": 6, "name": "G6", "character": "C6" },
                { "id": 7, "name": "G7", "character": "C7" }
            ]
        }))
        .expect("episode");

        let view = EpisodeView::from(&episode);
        let jobs: Vec<&str> = view.crew.iter().map(|c| c.job.as_str()).collect();
        assert_eq!(jobs, vec!["Director", "Writer"]);
        assert_eq!(view.guest_stars.len(), 5);
        assert_eq!(view.more_guest_stars, 2);
        assert_eq!(view.overview, "No overview available.");
        assert_eq!(view.still, None);
        assert_eq!(view.air_date.as_deref(), Some("1/20/2008"));
        assert_eq!(view.runtime.as_deref(), Some("58 min"));
    }

    #[test]
    fn display_date_keeps_unparseable_values() {
        assert_eq!(display_date(""), None);
        assert_eq!(display_date("2024-03-09").as_deref(), Some("3/9/2024"));
        assert_eq!(display_date("soon").as_deref(), Some("soon"));
    }
}
