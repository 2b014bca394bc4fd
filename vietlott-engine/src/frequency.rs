use std::collections::HashMap;

use vietlott_db::models::{combo_key, format_number, DrawRecord};

/// Nombre de bộ 3 affichés dans la vue "top".
pub const TOP_SUBSETS: usize = 50;

/// Compteur d'occurrences indexé par clé canonique (`01-05-12`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyTable {
    counts: HashMap<String, u32>,
}

impl FrequencyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, key: String) {
        *self.counts.entry(key).or_insert(0) += 1;
    }

    pub fn get(&self, key: &str) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// `numbers` doit être trié.
    pub fn count_of(&self, numbers: &[u8]) -> u32 {
        self.get(&combo_key(numbers))
    }

    pub fn contains(&self, numbers: &[u8]) -> bool {
        self.contains_key(&combo_key(numbers))
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.counts.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Somme de tous les compteurs.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Entrées vues plus d'une fois, par fréquence décroissante (à égalité, par clé).
    pub fn repeated(&self, limit: Option<usize>) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.iter().filter(|&(_, c)| c > 1).collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        entries
    }

    /// Toutes les entrées par fréquence décroissante, puis par valeur numérique croissante.
    pub fn by_frequency(&self) -> Vec<(&str, u32)> {
        let mut entries: Vec<(&str, u32)> = self.iter().collect();
        entries.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| numeric_value(a.0).cmp(&numeric_value(b.0)))
                .then_with(|| a.0.cmp(b.0))
        });
        entries
    }
}

fn numeric_value(key: &str) -> u32 {
    key.parse().unwrap_or(u32::MAX)
}

/// Les trois tables d'un jeu, calculées une fois par chargement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frequencies {
    pub full_sets: FrequencyTable,
    pub subsets: FrequencyTable,
    pub numbers: FrequencyTable,
}

pub fn aggregate(draws: &[DrawRecord]) -> Frequencies {
    let mut freqs = Frequencies::default();

    for draw in draws {
        let numbers = draw.numbers();

        freqs.full_sets.increment(combo_key(numbers));

        for &n in numbers {
            freqs.numbers.increment(format_number(n));
        }

        // C(n, 3) bộ 3 par tirage, i < j < k
        for i in 0..numbers.len() {
            for j in (i + 1)..numbers.len() {
                for k in (j + 1)..numbers.len() {
                    freqs
                        .subsets
                        .increment(combo_key(&[numbers[i], numbers[j], numbers[k]]));
                }
            }
        }
    }

    freqs
}
