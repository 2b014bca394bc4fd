use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use vietlott_db::models::Game;
use vietlott_db::store::IngestReport;
use vietlott_engine::config::EngineConfig;
use vietlott_engine::engine::GameEngine;

pub fn data_file(game: Game, data_dir: &Path) -> PathBuf {
    data_dir.join(game.default_data_file())
}

/// Lit le fichier de tirages du jeu et construit son moteur.
pub fn load_engine(game: Game, path: &Path, config: EngineConfig) -> Result<(GameEngine, IngestReport)> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire les tirages {} depuis {:?}", game, path))?;

    let mut engine = GameEngine::new(game, config);
    let report = engine.load(&raw);
    Ok((engine, report))
}

/// Numéros saisis à la main : séparés par des espaces ou des virgules.
pub fn parse_numbers(input: &str) -> Result<Vec<u8>> {
    input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<u8>()
                .with_context(|| format!("Numéro invalide : '{}'", s))
        })
        .collect()
}

/// Champ optionnel d'un formulaire : vide = pas de valeur.
pub fn parse_optional<T: std::str::FromStr>(input: &str) -> Result<Option<T>> {
    let input = input.trim();
    if input.is_empty() || input == "-" {
        return Ok(None);
    }
    match input.parse::<T>() {
        Ok(v) => Ok(Some(v)),
        Err(_) => bail!("Valeur invalide : '{}'", input),
    }
}
