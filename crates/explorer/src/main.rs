//! `holonet-prefetch`: warm the catalog, resolve favorites, and log a
//! summary. Useful for checking configuration and connectivity.

use holonet_core::format::{format_date, format_number};
use holonet_explorer::{telemetry, Explorer, ExplorerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    telemetry::init_tracing()?;

    // --- Configuration ---
    let config = ExplorerConfig::from_env()?;
    tracing::info!(
        catalog = %config.catalog_base_url,
        backend = %config.backend_url,
        favorites_dir = %config.favorites_dir.display(),
        "Loaded explorer configuration",
    );

    let explorer = Explorer::from_config(&config)?;

    // --- Catalog ---
    let (characters, starships, films) =
        tokio::join!(explorer.characters(), explorer.starships(), explorer.films_by_episode());
    let characters = characters?;
    let starships = starships?;
    let films = films?;
    tracing::info!(
        characters = characters.len(),
        starships = starships.len(),
        films = films.len(),
        "Catalog prefetched",
    );

    for film in &films {
        tracing::info!(
            episode = film.episode_id,
            title = %film.title,
            released = %format_date(&film.release_date),
            "Film",
        );
    }

    if let Some(largest) = starships
        .iter()
        .max_by_key(|s| s.length.replace(',', "").parse::<f64>().unwrap_or(0.0) as u64)
    {
        tracing::info!(
            starship = %largest.name,
            length_m = %format_number(&largest.length),
            "Largest starship",
        );
    }

    // --- Favorites ---
    let favorites = explorer.load_favorites().await;
    tracing::info!(
        characters = favorites.characters.items.len(),
        starships = favorites.starships.items.len(),
        failed = favorites.characters.failed + favorites.starships.failed,
        "Favorites resolved",
    );

    Ok(())
}
