//! Cast member page.

use anyhow::Result;
use serde::Serialize;

use crate::discover::details_href;
use crate::tmdb::images::{image_url, ImageSize};
use crate::tmdb::models::PersonCredit;
use crate::tmdb::{CombinedCredits, MediaType, Person, TmdbApi};

const KNOWN_FOR_LIMIT: usize = 8;

#[derive(Debug, Clone, Serialize)]
pub struct KnownForCard {
    pub id: i64,
    pub title: String,
    pub poster: String,
    pub label: &'static str,
    pub href: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    pub id: i64,
    pub name: String,
    pub biography: String,
    pub known_for_department: Option<String>,
    pub birthday: Option<String>,
    pub place_of_birth: Option<String>,
    pub deathday: Option<String>,
    pub profile: String,
    pub known_for: Vec<KnownForCard>,
}

impl PersonView {
    pub fn build(person: Person, credits: &CombinedCredits) -> Self {
        let non_empty = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            id: person.id,
            biography: non_empty(person.biography)
                .unwrap_or_else(|| "No biography available.".to_string()),
            known_for_department: person.known_for_department,
            birthday: person.birthday,
            place_of_birth: non_empty(person.place_of_birth),
            deathday: non_empty(person.deathday),
            profile: image_url(person.profile_path.as_deref(), ImageSize::W500),
            known_for: known_for(&credits.cast),
            name: person.name,
        }
    }
}

/// Most popular acting credits first.
pub fn known_for(cast: &[PersonCredit]) -> Vec<KnownForCard> {
    let mut credits: Vec<&PersonCredit> = cast.iter().collect();
    credits.sort_by(|a, b| b.item.popularity.total_cmp(&a.item.popularity));
    credits
        .into_iter()
        .take(KNOWN_FOR_LIMIT)
        .map(|credit| {
            let item = &credit.item;
            let kind = match item.media_type.as_deref() {
                Some("movie") => MediaType::Movie,
                _ => MediaType::Tv,
            };
            let title = item
                .title
                .as_deref()
                .or(item.name.as_deref())
                .unwrap_or_default()
                .to_string();
            KnownForCard {
                id: item.id,
                title,
                poster: image_url(item.poster_path.as_deref(), ImageSize::W500),
                label: kind.label(),
                href: details_href(kind, item.id),
            }
        })
        .collect()
}

pub async fn person(tmdb: &dyn TmdbApi, id: i64) -> Result<PersonView> {
    let (person, credits) =
        tokio::try_join!(tmdb.person(id), tmdb.person_combined_credits(id))?;
    Ok(PersonView::build(person, &credits))
}
