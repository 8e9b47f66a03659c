//! Fetch a title, season or person from TMDB and print the view JSON the
//! server would return.
//! Usage:
//!   cargo run --bin tmdb_props -- movie <tmdb_id>
//!   cargo run --bin tmdb_props -- tv <tmdb_id> [season_number]
//!   cargo run --bin tmdb_props -- person <tmdb_id>
//! Requires TMDB_API_KEY in the environment (.env supported).

use anyhow::{Context, Result};
use dotenvy::dotenv;
use reelscout::config::Config;
use reelscout::tmdb::{MediaType, TmdbApi, TmdbClient};
use reelscout::{details, person, seasons};
use serde_json::Value;
use std::env;

fn usage() -> anyhow::Error {
    anyhow::anyhow!("usage: tmdb_props <movie|tv|person> <tmdb_id> [season_number]")
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenv();
    let args: Vec<String> = env::args().skip(1).collect();
    let (kind, id) = match args.as_slice() {
        [kind, id, ..] => (kind.as_str(), id),
        _ => return Err(usage()),
    };
    let id: i64 = id.parse().context("tmdb_id must be a number")?;

    let config = Config::from_env()?;
    let client = TmdbClient::new(&config)?;
    let tmdb: &dyn TmdbApi = &client;

    let view: Value = match kind {
        "person" => serde_json::to_value(person::person(tmdb, id).await?)?,
        "tv" if args.len() > 2 => {
            let number: u32 = args[2].parse().context("season_number must be a number")?;
            serde_json::to_value(seasons::season(tmdb, id, number).await?)?
        }
        other => {
            let media: MediaType = other.parse().map_err(|_| usage())?;
            serde_json::to_value(details::details(tmdb, media, id, &config.watch_region).await?)?
        }
    };

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
