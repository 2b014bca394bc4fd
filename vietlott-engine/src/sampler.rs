use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use vietlott_db::models::{Combo, Game};

use crate::filter::{passes, Axes, ConstraintSpec};
use crate::frequency::FrequencyTable;

/// Relâchement progressif : exclus, puis pairs, puis somme, et les requis en dernier.
pub const PHASES: [Axes; 5] = [
    Axes { forbidden: true, even: true, sum: true, required: true },
    Axes { forbidden: false, even: true, sum: true, required: true },
    Axes { forbidden: false, even: false, sum: true, required: true },
    Axes { forbidden: false, even: false, sum: false, required: true },
    Axes::NONE,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorSettings {
    pub target_count: usize,
    pub max_attempts_per_phase: usize,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            target_count: 10,
            max_attempts_per_phase: 5000,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Generation {
    pub candidates: Vec<Combo>,
    /// Tirages aléatoires effectués, toutes phases confondues.
    pub attempts: usize,
    /// Nombre de phases parcourues (1 = contraintes complètes respectées).
    pub phases_used: usize,
}

pub fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_rng(&mut rand::rng()),
    }
}

/// `count` numéros distincts de 1 à `pool`, dans l'ordre du tirage.
pub fn draw_numbers(pool: u8, count: usize, rng: &mut StdRng) -> Vec<u8> {
    index::sample(rng, pool as usize, count)
        .into_iter()
        .map(|i| (i + 1) as u8)
        .collect()
}

pub fn quick_pick(game: Game, rng: &mut StdRng) -> Vec<u8> {
    let spec = game.quick_pick();
    let mut numbers = draw_numbers(spec.pool, spec.count, rng);
    if spec.sorted {
        numbers.sort_unstable();
    }
    numbers
}

/// Génère jusqu'à `target_count` combinaisons jamais sorties (absentes de `history`, la table
/// des grilles complètes), distinctes entre elles et conformes à `spec`. Un résultat incomplet, voire
/// vide, est un résultat valide.
pub fn generate(
    game: Game,
    history: &FrequencyTable,
    spec: &ConstraintSpec,
    settings: &GeneratorSettings,
    rng: &mut StdRng,
) -> Generation {
    let generation = generate_in_pool(game.pool_size(), game.draw_size(), history, spec, settings, rng);

    if generation.candidates.len() < settings.target_count {
        log::info!(
            "{} : seulement {} grilles sur {} après {} essais",
            game,
            generation.candidates.len(),
            settings.target_count,
            generation.attempts
        );
    }
    generation
}

/// Même algorithme pour `draw_size` numéros tirés dans 1..=`pool`.
pub fn generate_in_pool(
    pool: u8,
    draw_size: usize,
    history: &FrequencyTable,
    spec: &ConstraintSpec,
    settings: &GeneratorSettings,
    rng: &mut StdRng,
) -> Generation {
    let target = settings.target_count;
    let mut generation = Generation {
        candidates: Vec::with_capacity(target),
        ..Default::default()
    };
    let mut produced: HashSet<Combo> = HashSet::with_capacity(target);

    for (phase, axes) in PHASES.iter().enumerate() {
        if generation.candidates.len() >= target {
            break;
        }
        generation.phases_used = phase + 1;

        let mut attempts = 0;
        while generation.candidates.len() < target && attempts < settings.max_attempts_per_phase {
            attempts += 1;
            let candidate = Combo::new(draw_numbers(pool, draw_size, rng));

            if history.contains_key(&candidate.key())
                || produced.contains(&candidate)
                || !passes(&candidate, spec, *axes)
            {
                continue;
            }
            produced.insert(candidate.clone());
            generation.candidates.push(candidate);
        }
        generation.attempts += attempts;

        log::debug!(
            "{}/{} : phase {} {:?}, {} essais, {}/{} grilles",
            draw_size,
            pool,
            phase + 1,
            axes,
            attempts,
            generation.candidates.len(),
            target
        );
    }

    generation
}
