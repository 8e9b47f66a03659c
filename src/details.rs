//! Title page for a movie or show.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Display;
use tracing::warn;

use crate::discover::{cards, tag_media_type, Card};
use crate::media::{MediaSection, MediaTab, TrailerLink};
use crate::rating::{RatingGauge, HEADER_GAUGE};
use crate::seasons::{season_options, SeasonOption, DEFAULT_SEASON};
use crate::tmdb::images::{image_url, optional_image_url, ImageSize};
use crate::tmdb::models::CastMember;
use crate::tmdb::{Credits, Details, ExternalIds, ListItem, MediaType, TmdbApi, WatchProviders};

const CAST_LIMIT: usize = 10;
const RECOMMENDATION_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fact {
    pub label: &'static str,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatorView {
    pub id: i64,
    pub name: String,
    pub job: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyView {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CastCard {
    pub id: i64,
    pub name: String,
    pub character: String,
    pub profile: String,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenreView {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderView {
    pub id: i64,
    pub name: String,
    pub logo: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WatchOptions {
    pub region: String,
    pub link: Option<String>,
    pub providers: Vec<ProviderView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SeasonPicker {
    pub selected: u32,
    pub options: Vec<SeasonOption>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DetailsView {
    pub id: i64,
    pub media_type: MediaType,
    pub title: String,
    pub year: String,
    pub adult: bool,
    pub genres: Vec<GenreView>,
    pub rating: RatingGauge,
    pub tagline: Option<String>,
    pub overview: String,
    pub poster: String,
    pub backdrop: Option<String>,
    pub trailer: Option<TrailerLink>,
    pub creators: Vec<CreatorView>,
    pub facts: Vec<Fact>,
    pub companies: Vec<CompanyView>,
    pub cast: Vec<CastCard>,
    pub seasons: Option<SeasonPicker>,
    pub media: MediaSection,
    pub recommendations: Vec<Card>,
    pub watch: Option<WatchOptions>,
    pub imdb_url: Option<String>,
}

pub async fn details(
    tmdb: &dyn TmdbApi,
    kind: MediaType,
    id: i64,
    watch_region: &str,
) -> Result<DetailsView> {
    let required = async {
        tokio::try_join!(
            tmdb.details(kind, id),
            tmdb.credits(kind, id),
            tmdb.videos(kind, id),
            tmdb.images(kind, id),
        )
    };
    let optional = async {
        tokio::join!(
            tmdb.recommendations(kind, id),
            tmdb.watch_providers(kind, id),
            tmdb.external_ids(kind, id),
        )
    };
    let (required, (recommendations, providers, external_ids)) = tokio::join!(required, optional);
    let (details, credits, videos, images) = required?;

    let recommendations = optional_part(recommendations, "recommendations", kind, id)
        .map(|page| page.results)
        .unwrap_or_default();
    let providers = optional_part(providers, "watch providers", kind, id);
    let external_ids = optional_part(external_ids, "external ids", kind, id);

    let trailer = videos.youtube_trailer().map(|v| TrailerLink::new(&v.key));
    let media = MediaSection::build(&videos.results, &images, MediaTab::default());
    let seasons = (kind == MediaType::Tv && !details.seasons.is_empty()).then(|| SeasonPicker {
        selected: DEFAULT_SEASON,
        options: season_options(&details.seasons),
    });

    let recommendations: Vec<Card> = recommendation_cards(kind, recommendations)
        .into_iter()
        .take(RECOMMENDATION_LIMIT)
        .collect();

    Ok(DetailsView {
        id: details.id,
        media_type: kind,
        title: details
            .title
            .clone()
            .or_else(|| details.name.clone())
            .unwrap_or_default(),
        year: release_year(&details),
        adult: details.adult,
        genres: details
            .genres
            .iter()
            .map(|g| GenreView {
                id: g.id,
                name: g.name.clone(),
            })
            .collect(),
        rating: RatingGauge::from_vote_average(details.vote_average, HEADER_GAUGE),
        tagline: details.tagline.clone().filter(|t| !t.trim().is_empty()),
        overview: details.overview.clone().unwrap_or_default(),
        poster: image_url(details.poster_path.as_deref(), ImageSize::W500),
        backdrop: optional_image_url(details.backdrop_path.as_deref(), ImageSize::Original),
        trailer,
        creators: creators(&details, &credits),
        facts: facts(&details),
        companies: details
            .production_companies
            .iter()
            .map(|c| CompanyView {
                id: c.id,
                name: c.name.clone(),
                logo: optional_image_url(c.logo_path.as_deref(), ImageSize::W500),
            })
            .collect(),
        cast: credits.cast.iter().take(CAST_LIMIT).map(cast_card).collect(),
        seasons,
        media,
        recommendations,
        watch: providers.and_then(|p| watch_options(&p, watch_region)),
        imdb_url: imdb_url(&details, external_ids.as_ref()),
    })
}

fn optional_part<T>(result: Result<T>, what: &str, kind: MediaType, id: i64) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("Skipping {} for {} {}: {:#}", what, kind, id, e);
            None
        }
    }
}

pub fn release_year(details: &Details) -> String {
    details
        .release_date
        .as_deref()
        .filter(|d| !d.is_empty())
        .or(details.first_air_date.as_deref())
        .unwrap_or_default()
        .chars()
        .take(4)
        .collect()
}

/// Show creators, then directors and creators from the crew.
pub fn creators(details: &Details, credits: &Credits) -> Vec<CreatorView> {
    let from_show = details.created_by.iter().map(|c| CreatorView {
        id: c.id,
        name: c.name.clone(),
        job: "Creator".to_string(),
    });
    let from_crew = credits.crew.iter().filter_map(|c| match c.job.as_deref() {
        Some(job @ ("Director" | "Creator")) => Some(CreatorView {
            id: c.id,
            name: c.name.clone(),
            job: job.to_string(),
        }),
        _ => None,
    });
    from_show.chain(from_crew).collect()
}

/// Facts with a value; zero budgets and runtimes count as unknown.
pub fn facts(details: &Details) -> Vec<Fact> {
    let runtime = details
        .runtime
        .filter(|r| *r > 0)
        .or_else(|| {
            details
                .episode_run_time
                .as_ref()
                .and_then(|r| r.first().copied())
        })
        .map(|r| format!("{r} min"));

    let candidates: [(&'static str, Option<String>); 8] = [
        ("Status", details.status.clone()),
        ("Type", details.show_type.clone()),
        ("Original Language", details.original_language.clone()),
        ("Runtime", runtime),
        ("Budget", details.budget.filter(|b| *b > 0).map(format_money)),
        ("Revenue", details.revenue.filter(|r| *r > 0).map(format_money)),
        ("Seasons", details.number_of_seasons.map(to_string)),
        ("Episodes", details.number_of_episodes.map(to_string)),
    ];
    candidates
        .into_iter()
        .filter_map(|(label, value)| {
            value
                .filter(|v| !v.is_empty())
                .map(|value| Fact { label, value })
        })
        .collect()
}

fn to_string<T: Display>(value: T) -> String {
    value.to_string()
}

/// `1234567` renders as `$1,234,567`.
pub fn format_money(amount: u64) -> String {
    let digits = amount.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("${grouped}")
}

fn cast_card(member: &CastMember) -> CastCard {
    CastCard {
        id: member.id,
        name: member.name.clone(),
        character: member.character.clone().unwrap_or_default(),
        profile: image_url(member.profile_path.as_deref(), ImageSize::W500),
        href: format!("/details/cast/{}", member.id),
    }
}

pub fn watch_options(providers: &WatchProviders, region: &str) -> Option<WatchOptions> {
    let country = providers.results.get(region)?;
    let mut flatrate: Vec<_> = country.flatrate.iter().collect();
    flatrate.sort_by_key(|p| p.display_priority);
    Some(WatchOptions {
        region: region.to_string(),
        link: country.link.clone(),
        providers: flatrate
            .into_iter()
            .map(|p| ProviderView {
                id: p.provider_id,
                name: p.provider_name.clone(),
                logo: optional_image_url(p.logo_path.as_deref(), ImageSize::W500),
            })
            .collect(),
    })
}

fn imdb_url(details: &Details, external_ids: Option<&ExternalIds>) -> Option<String> {
    let non_empty = |id: &Option<String>| id.clone().filter(|id| !id.trim().is_empty());
    external_ids
        .and_then(|ids| non_empty(&ids.imdb_id))
        .or_else(|| non_empty(&details.imdb_id))
        .map(|id| format!("https://www.imdb.com/title/{id}"))
}

/// Recommendations carry their own media type; older payloads fall back to
/// the parent title's kind.
pub fn recommendation_cards(kind: MediaType, items: Vec<ListItem>) -> Vec<Card> {
    cards(&tag_media_type(items, kind))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn details(value: serde_json::Value) -> Details {
        serde_json::from_value(value).expect("details")
    }

    #[test]
    fn money_groups_thousands() {
        assert_eq!(format_money(0), "$0");
        assert_eq!(format_money(999), "$999");
        assert_eq!(format_money(1_000), "$1,000");
        assert_eq!(format_money(63_000_000), "$63,000,000");
        assert_eq!(format_money(1_234_567), "$1,234,567");
    }

    #[test]
    fn movie_facts_skip_unknowns() {
        let d = details(json!({
            "id": 550,
            "title": "Fight Club",
            "status": "Released",
            "original_language": "en",
            "runtime": 139,
            "budget": 63000000,
            "revenue": 0
        }));
        let labels: Vec<&str> = facts(&d).iter().map(|f| f.label).collect();
        assert_eq!(labels, vec!["Status", "Original Language", "Runtime", "Budget"]);
        assert_eq!(facts(&d)[2].value, "139 min");
        assert_eq!(facts(&d)[3].value, "$63,000,000");
    }

    #[test]
    fn show_facts_use_episode_runtime_and_counts() {
        let d = details(json!({
            "id": 1396,
            "name": "Breaking Bad",
            "type": "Scripted",
            "episode_run_time": [45, 47],
            "number_of_seasons": 5,
            "number_of_episodes": 62
        }));
        let facts = facts(&d);
        let pairs: Vec<(&str, &str)> = facts.iter().map(|f| (f.label, f.value.as_str())).collect();
        assert_eq!(
            pairs,
            vec![
                ("Type", "Scripted"),
                ("Runtime", "45 min"),
                ("Seasons", "5"),
                ("Episodes", "62")
            ]
        );
    }

    #[test]
    fn creators_merge_show_creators_and_directing_crew() {
        let d = details(json!({
            "id": 1,
            "name": "Show",
            "created_by": [{ "id": 5, "name": "Vince" }]
        }));
        let credits: Credits = serde_json::from_value(json!({
            "cast": [],
            "crew": [
                { "id": 6, "name": "Dir", "job": "Director" },
                { "id": 7, "name": "Ed", "job": "Editor" }
            ]
        }))
        .expect("credits");
        let creators = creators(&d, &credits);
        assert_eq!(
            creators,
            vec![
                CreatorView {
                    id: 5,
                    name: "Vince".to_string(),
                    job: "Creator".to_string()
                },
                CreatorView {
                    id: 6,
                    name: "Dir".to_string(),
                    job: "Director".to_string()
                },
            ]
        );
    }

    #[test]
    fn year_prefers_release_then_first_air_date() {
        assert_eq!(
            release_year(&details(json!({ "id": 1, "release_date": "1999-10-15" }))),
            "1999"
        );
        assert_eq!(
            release_year(&details(json!({ "id": 1, "first_air_date": "2008-01-20" }))),
            "2008"
        );
        assert_eq!(release_year(&details(json!({ "id": 1 }))), "");
    }

    #[test]
    fn watch_options_pick_region_and_sort_by_priority() {
        let providers: WatchProviders = serde_json::from_value(json!({
            "results": {
                "US": {
                    "link": "https://www.themoviedb.org/movie/550/watch",
                    "flatrate": [
                        { "provider_id": 9, "provider_name": "Prime", "logo_path": "/p.jpg", "display_priority": 5 },
                        { "provider_id": 8, "provider_name": "Netflix", "logo_path": "/n.jpg", "display_priority": 1 }
                    ]
                }
            }
        }))
        .expect("providers");
        let watch = watch_options(&providers, "US").expect("US providers");
        let names: Vec<&str> = watch.providers.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Netflix", "Prime"]);
        assert!(watch_options(&providers, "GB").is_none());
    }

    #[test]
    fn imdb_url_prefers_external_ids() {
        let d = details(json!({ "id": 1, "imdb_id": "tt0000001" }));
        let ids = ExternalIds {
            imdb_id: Some("tt0137523".to_string()),
            ..Default::default()
        };
        assert_eq!(
            imdb_url(&d, Some(&ids)).as_deref(),
            Some("https://www.imdb.com/title/tt0137523")
        );
        assert_eq!(
            imdb_url(&d, None).as_deref(),
            Some("https://www.imdb.com/title/tt0000001")
        );
    }

    #[test]
    fn blank_external_imdb_id_falls_back_to_details() {
        let d = details(json!({ "id": 1, "imdb_id": "tt0000001" }));
        let ids = ExternalIds {
            imdb_id: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(
            imdb_url(&d, Some(&ids)).as_deref(),
            Some("https://www.imdb.com/title/tt0000001")
        );

        let blank = details(json!({ "id": 2, "imdb_id": "" }));
        assert_eq!(imdb_url(&blank, Some(&ids)), None);
    }

    #[test]
    fn cast_cards_link_to_person_pages() {
        let member: CastMember = serde_json::from_value(json!({
            "id": 819,
            "name": "Edward Norton",
            "character": "The Narrator",
            "profile_path": null
        }))
        .expect("cast");
        let card = cast_card(&member);
        assert_eq!(card.href, "/details/cast/819");
        assert_eq!(card.profile, crate::tmdb::images::NO_IMAGE);
    }
}
