use std::fmt;
use std::ops::RangeInclusive;

use thiserror::Error;

/// Taille des sous-ensembles comptés dans les statistiques (bộ 3), identique pour les deux jeux.
pub const SUBSET_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Game {
    Lotto,
    Mega,
}

/// Ordre de `unique_dates_in_file_order` : le fichier Lotto est déjà du plus récent au plus
/// ancien, celui de Mega est chronologique et se lit donc à l'envers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    FirstSeen,
    Reversed,
}

/// Vérification "ce bộ số est-il déjà sorti ?".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryCheck {
    /// Tous les numéros saisis figurent dans le tirage.
    Containment,
    /// Le tirage complet est identique à la saisie.
    Exact,
}

/// Paramètres du tirage aléatoire affiché au-dessus des suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuickPick {
    pub pool: u8,
    pub count: usize,
    pub sorted: bool,
}

impl Game {
    pub const ALL: [Game; 2] = [Game::Lotto, Game::Mega];

    pub fn name(&self) -> &'static str {
        match self {
            Game::Lotto => "Lotto 5/35",
            Game::Mega => "Mega 6/45",
        }
    }

    pub fn pool_size(&self) -> u8 {
        match self {
            Game::Lotto => 35,
            Game::Mega => 45,
        }
    }

    pub fn draw_size(&self) -> usize {
        match self {
            Game::Lotto => 5,
            Game::Mega => 6,
        }
    }

    pub fn date_order(&self) -> DateOrder {
        match self {
            Game::Lotto => DateOrder::FirstSeen,
            Game::Mega => DateOrder::Reversed,
        }
    }

    pub fn history_check(&self) -> HistoryCheck {
        match self {
            Game::Lotto => HistoryCheck::Containment,
            Game::Mega => HistoryCheck::Exact,
        }
    }

    /// Nombre de numéros acceptés par la vérification d'historique.
    pub fn check_range(&self) -> RangeInclusive<usize> {
        match self {
            Game::Lotto => SUBSET_SIZE..=5,
            Game::Mega => 6..=6,
        }
    }

    /// Seules les suggestions Mega sont classées par fréquence cumulée.
    pub fn is_scored(&self) -> bool {
        matches!(self, Game::Mega)
    }

    pub fn recent_days(&self) -> usize {
        match self {
            Game::Lotto => 5,
            Game::Mega => 10,
        }
    }

    /// Limite de la vue "bộ complet sorti plus d'une fois" (`None` = tout afficher).
    pub fn full_set_view_limit(&self) -> Option<usize> {
        match self {
            Game::Lotto => None,
            Game::Mega => Some(20),
        }
    }

    pub fn quick_pick(&self) -> QuickPick {
        match self {
            // Numéros spéciaux Lotto, laissés dans l'ordre du tirage
            Game::Lotto => QuickPick { pool: 12, count: 3, sorted: false },
            Game::Mega => QuickPick { pool: 45, count: 6, sorted: true },
        }
    }

    pub fn default_data_file(&self) -> &'static str {
        match self {
            Game::Lotto => "lotto.txt",
            Game::Mega => "power645.jsonl",
        }
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Numéro affiché sur deux chiffres : `7` → `07`.
pub fn format_number(n: u8) -> String {
    format!("{:02}", n)
}

/// Clé canonique d'une combinaison : numéros triés, sur deux chiffres, joints par `-`.
/// `numbers` doit déjà être trié.
pub fn combo_key(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|&n| format_number(n))
        .collect::<Vec<_>>()
        .join("-")
}

/// Combinaison triée par ordre croissant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Combo(Vec<u8>);

impl Combo {
    pub fn new(mut numbers: Vec<u8>) -> Self {
        numbers.sort_unstable();
        Combo(numbers)
    }

    pub fn numbers(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn key(&self) -> String {
        combo_key(&self.0)
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }

    pub fn contains_all(&self, numbers: &[u8]) -> bool {
        numbers.iter().all(|&n| self.contains(n))
    }

    pub fn sum(&self) -> u32 {
        self.0.iter().map(|&n| n as u32).sum()
    }

    pub fn even_count(&self) -> usize {
        self.0.iter().filter(|&&n| n % 2 == 0).count()
    }

    pub fn padded(&self) -> Vec<String> {
        self.0.iter().map(|&n| format_number(n)).collect()
    }
}

impl fmt::Display for Combo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawRecord {
    pub date: String,
    pub draw_id: String,
    pub numbers: Combo,
    /// Partie après `|` dans le fichier Lotto, exclue des statistiques.
    pub special: Option<String>,
}

impl DrawRecord {
    pub fn numbers(&self) -> &[u8] {
        self.numbers.numbers()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub combo: Combo,
    pub score: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumbersError {
    #[error("attendu {expected} numéros, reçu {found}")]
    WrongCount { expected: String, found: usize },
    #[error("numéro {number} hors limites (1-{pool})")]
    OutOfRange { number: u8, pool: u8 },
    #[error("numéro en double : {0}")]
    Duplicate(u8),
}

/// Vérifie les bornes du pool et l'absence de doublons, sans contrainte de nombre.
pub fn validate_numbers(numbers: &[u8], pool: u8) -> Result<(), NumbersError> {
    for &n in numbers {
        if n < 1 || n > pool {
            return Err(NumbersError::OutOfRange { number: n, pool });
        }
    }
    for i in 0..numbers.len() {
        for j in (i + 1)..numbers.len() {
            if numbers[i] == numbers[j] {
                return Err(NumbersError::Duplicate(numbers[i]));
            }
        }
    }
    Ok(())
}

/// Un tirage complet : exactement `draw_size` numéros distincts dans le pool.
pub fn validate_draw(numbers: &[u8], game: Game) -> Result<(), NumbersError> {
    if numbers.len() != game.draw_size() {
        return Err(NumbersError::WrongCount {
            expected: game.draw_size().to_string(),
            found: numbers.len(),
        });
    }
    validate_numbers(numbers, game.pool_size())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_draw_ok() {
        assert!(validate_draw(&[1, 5, 12, 20, 33], Game::Lotto).is_ok());
        assert!(validate_draw(&[45, 44, 43, 42, 41, 40], Game::Mega).is_ok());
    }

    #[test]
    fn test_validate_draw_out_of_range() {
        assert_eq!(
            validate_draw(&[0, 2, 3, 4, 5], Game::Lotto),
            Err(NumbersError::OutOfRange { number: 0, pool: 35 })
        );
        assert!(validate_draw(&[1, 2, 3, 4, 36], Game::Lotto).is_err());
        assert!(validate_draw(&[1, 2, 3, 4, 5, 46], Game::Mega).is_err());
    }

    #[test]
    fn test_validate_draw_wrong_count() {
        assert!(matches!(
            validate_draw(&[1, 2, 3, 4, 5], Game::Mega),
            Err(NumbersError::WrongCount { found: 5, .. })
        ));
    }

    #[test]
    fn test_validate_draw_duplicates() {
        assert_eq!(
            validate_draw(&[1, 1, 3, 4, 5], Game::Lotto),
            Err(NumbersError::Duplicate(1))
        );
    }

    #[test]
    fn test_game_parameters() {
        assert_eq!(Game::Lotto.pool_size(), 35);
        assert_eq!(Game::Lotto.draw_size(), 5);
        assert_eq!(Game::Mega.pool_size(), 45);
        assert_eq!(Game::Mega.draw_size(), 6);
        assert!(Game::Mega.is_scored());
        assert!(!Game::Lotto.is_scored());
        assert_eq!(Game::Lotto.check_range(), 3..=5);
        assert_eq!(Game::Mega.check_range(), 6..=6);
    }

    #[test]
    fn test_combo_key_is_sorted_and_padded() {
        let combo = Combo::new(vec![33, 1, 12, 5, 20]);
        assert_eq!(combo.numbers(), &[1, 5, 12, 20, 33]);
        assert_eq!(combo.key(), "01-05-12-20-33");
        assert_eq!(combo.to_string(), "01-05-12-20-33");
        assert_eq!(combo.padded(), vec!["01", "05", "12", "20", "33"]);
    }

    #[test]
    fn test_combo_sum_and_even_count() {
        let combo = Combo::new(vec![1, 2, 3, 4, 10]);
        assert_eq!(combo.sum(), 20);
        assert_eq!(combo.even_count(), 3);
        assert!(combo.contains(10));
        assert!(combo.contains_all(&[1, 4]));
        assert!(!combo.contains_all(&[1, 5]));
    }
}
