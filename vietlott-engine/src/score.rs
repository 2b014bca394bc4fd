use vietlott_db::models::{format_number, Combo, Suggestion};

use crate::frequency::FrequencyTable;

/// Somme des fréquences historiques des numéros de la grille (0 pour un numéro jamais sorti).
pub fn score(candidate: &Combo, numbers: &FrequencyTable) -> u32 {
    candidate
        .numbers()
        .iter()
        .map(|&n| numbers.get(&format_number(n)))
        .sum()
}

/// Classe les grilles par score décroissant ; l'ordre de génération départage les égalités.
pub fn rank(candidates: Vec<Combo>, numbers: &FrequencyTable) -> Vec<Suggestion> {
    let mut scored: Vec<Suggestion> = candidates
        .into_iter()
        .map(|combo| {
            let s = score(&combo, numbers);
            Suggestion { combo, score: Some(s) }
        })
        .collect();
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored
}
