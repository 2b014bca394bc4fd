use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::models::{validate_draw, Combo, DrawRecord, Game, NumbersError};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("{found} champ(s) au lieu de 3 (DATE KỲ NUMÉROS)")]
    MissingFields { found: usize },
    #[error("numéro illisible '{0}'")]
    BadNumber(String),
    #[error("JSON invalide : {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Numbers(#[from] NumbersError),
}

pub fn parse_line(game: Game, line: &str) -> Result<DrawRecord, ParseError> {
    match game {
        Game::Lotto => parse_lotto_line(line),
        Game::Mega => parse_mega_line(line),
    }
}

/// `DATE KỲ NUMÉROS[|SPÉCIAL]`, les numéros étant concaténés par paires de chiffres.
pub fn parse_lotto_line(line: &str) -> Result<DrawRecord, ParseError> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(ParseError::MissingFields { found: parts.len() });
    }

    let (main, special) = match parts[2].split_once('|') {
        Some((main, special)) => (main, special),
        None => (parts[2], ""),
    };

    let chars: Vec<char> = main.chars().collect();
    let numbers = chars
        .chunks(2)
        .map(|pair| {
            let s: String = pair.iter().collect();
            if s.len() != 2 {
                return Err(ParseError::BadNumber(s));
            }
            s.parse::<u8>().map_err(|_| ParseError::BadNumber(s))
        })
        .collect::<Result<Vec<u8>, _>>()?;

    validate_draw(&numbers, Game::Lotto)?;

    Ok(DrawRecord {
        date: parts[0].to_string(),
        draw_id: parts[1].to_string(),
        numbers: Combo::new(numbers),
        special: if special.is_empty() {
            None
        } else {
            Some(special.to_string())
        },
    })
}

#[derive(Debug, Deserialize)]
struct MegaLine {
    date: Value,
    id: Value,
    result: Vec<u8>,
}

/// Une ligne JSONL `{"date": …, "id": …, "result": [..]}`.
pub fn parse_mega_line(line: &str) -> Result<DrawRecord, ParseError> {
    let raw: MegaLine = serde_json::from_str(line)?;
    validate_draw(&raw.result, Game::Mega)?;

    Ok(DrawRecord {
        date: json_text(&raw.date),
        draw_id: json_text(&raw.id),
        numbers: Combo::new(raw.result),
        special: None,
    })
}

// `id` est tantôt une chaîne, tantôt un entier selon la source
fn json_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
