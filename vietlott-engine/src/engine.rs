use rand::rngs::StdRng;
use thiserror::Error;

use vietlott_db::models::{validate_numbers, Combo, DrawRecord, Game, HistoryCheck, NumbersError, Suggestion};
use vietlott_db::store::{DrawStore, IngestReport};

use crate::config::EngineConfig;
use crate::filter::ConstraintSpec;
use crate::frequency::{aggregate, Frequencies};
use crate::sampler::{self, Generation};
use crate::score::rank;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckError {
    #[error("aucun numéro saisi")]
    Empty,
    #[error(transparent)]
    Numbers(#[from] NumbersError),
}

#[derive(Debug)]
pub struct CheckOutcome<'a> {
    pub query: Combo,
    pub matches: Vec<&'a DrawRecord>,
}

impl CheckOutcome<'_> {
    pub fn appeared(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Tout l'état d'un jeu : historique, fréquences, contraintes de l'utilisateur et réglages.
#[derive(Debug, Clone)]
pub struct GameEngine {
    game: Game,
    store: DrawStore,
    frequencies: Frequencies,
    constraints: ConstraintSpec,
    config: EngineConfig,
}

impl GameEngine {
    pub fn new(game: Game, config: EngineConfig) -> Self {
        Self {
            game,
            store: DrawStore::new(game),
            frequencies: Frequencies::default(),
            constraints: ConstraintSpec::default(),
            config,
        }
    }

    /// Charge `raw` puis recalcule les fréquences sur tout l'historique.
    pub fn load(&mut self, raw: &str) -> IngestReport {
        let report = self.store.ingest(raw);
        self.frequencies = aggregate(self.store.all_draws());
        report
    }

    pub fn game(&self) -> Game {
        self.game
    }

    pub fn store(&self) -> &DrawStore {
        &self.store
    }

    pub fn frequencies(&self) -> &Frequencies {
        &self.frequencies
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn constraints(&self) -> &ConstraintSpec {
        &self.constraints
    }

    pub fn constraints_mut(&mut self) -> &mut ConstraintSpec {
        &mut self.constraints
    }

    pub fn set_constraints(&mut self, spec: ConstraintSpec) {
        self.constraints = spec;
    }

    pub fn clear_constraints(&mut self) {
        self.constraints = ConstraintSpec::default();
    }

    pub fn generate(&self, rng: &mut StdRng) -> Generation {
        sampler::generate(
            self.game,
            &self.frequencies.full_sets,
            &self.constraints,
            &self.config.generator,
            rng,
        )
    }

    /// Grilles jamais sorties ; classées par fréquence cumulée pour les jeux notés.
    pub fn suggest(&self, rng: &mut StdRng) -> Vec<Suggestion> {
        let generation = self.generate(rng);
        if self.game.is_scored() {
            rank(generation.candidates, &self.frequencies.numbers)
        } else {
            generation
                .candidates
                .into_iter()
                .map(|combo| Suggestion { combo, score: None })
                .collect()
        }
    }

    pub fn quick_pick(&self, rng: &mut StdRng) -> Vec<u8> {
        sampler::quick_pick(self.game, rng)
    }

    /// Recherche d'une combinaison dans l'historique : inclusion pour Lotto, égalité pour Mega.
    pub fn check(&self, numbers: &[u8]) -> Result<CheckOutcome<'_>, CheckError> {
        if numbers.is_empty() {
            return Err(CheckError::Empty);
        }
        let range = self.game.check_range();
        if !range.contains(&numbers.len()) {
            let expected = if range.start() == range.end() {
                range.start().to_string()
            } else {
                format!("{} à {}", range.start(), range.end())
            };
            return Err(NumbersError::WrongCount {
                expected,
                found: numbers.len(),
            }
            .into());
        }
        validate_numbers(numbers, self.game.pool_size())?;

        let query = Combo::new(numbers.to_vec());
        let matches = match self.game.history_check() {
            HistoryCheck::Containment => self.store.draws_matching_all(query.numbers()),
            HistoryCheck::Exact => self.store.draws_equal_exactly(query.numbers()),
        };
        Ok(CheckOutcome { query, matches })
    }

    pub fn recent_draws(&self) -> Vec<&DrawRecord> {
        self.store.recent_draws(self.game.recent_days())
    }

    pub fn repeated_full_sets(&self) -> Vec<(&str, u32)> {
        self.frequencies.full_sets.repeated(self.game.full_set_view_limit())
    }

    pub fn top_subsets(&self) -> Vec<(&str, u32)> {
        self.frequencies.subsets.repeated(Some(self.config.top_subsets))
    }

    pub fn number_frequencies(&self) -> Vec<(&str, u32)> {
        self.frequencies.numbers.by_frequency()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const LOTTO: &str = "\
2025-01-04 00004 0105122033|03
2025-01-03 00003 0105122033|11
2025-01-02 00002 0105142230|02
2025-01-01 00001 0204060810
";

    const MEGA: &str = r#"{"date": "2024-01-01", "id": "00001", "result": [1, 2, 3, 4, 5, 6]}
{"date": "2024-01-03", "id": "00002", "result": [1, 2, 3, 4, 5, 7]}
{"date": "2024-01-05", "id": "00003", "result": [1, 2, 3, 40, 41, 45]}
{"broken"
"#;

    fn lotto_engine() -> GameEngine {
        let mut engine = GameEngine::new(Game::Lotto, EngineConfig::default());
        engine.load(LOTTO);
        engine
    }

    fn mega_engine() -> GameEngine {
        let mut engine = GameEngine::new(Game::Mega, EngineConfig::default());
        engine.load(MEGA);
        engine
    }

    #[test]
    fn test_load_aggregates_history() {
        let engine = mega_engine();
        assert_eq!(engine.store().len(), 3);
        assert_eq!(engine.frequencies().full_sets.total(), 3);
        assert_eq!(engine.frequencies().subsets.total(), 3 * 20);
        assert_eq!(engine.frequencies().numbers.total(), 3 * 6);
        assert_eq!(engine.frequencies().numbers.get("01"), 3);
    }

    #[test]
    fn test_reload_recomputes_from_scratch() {
        let mut engine = lotto_engine();
        engine.load("2025-01-05 00005 0105122033");
        assert_eq!(engine.store().len(), 5);
        assert_eq!(engine.frequencies().full_sets.get("01-05-12-20-33"), 3);
        assert_eq!(engine.frequencies().full_sets.total(), 5);
    }

    #[test]
    fn test_views() {
        let engine = lotto_engine();
        assert_eq!(engine.repeated_full_sets(), vec![("01-05-12-20-33", 2)]);

        let triples = engine.top_subsets();
        assert_eq!(triples[0], ("01-05-12", 2));
        assert!(triples.len() <= 50);

        let numbers = engine.number_frequencies();
        assert_eq!(numbers[0], ("01", 3));
        assert_eq!(numbers[1], ("05", 3));
    }

    #[test]
    fn test_recent_draws_uses_game_day_count() {
        let engine = lotto_engine();
        assert_eq!(engine.recent_draws().len(), 4);

        let engine = mega_engine();
        let ids: Vec<&str> = engine.recent_draws().iter().map(|d| d.draw_id.as_str()).collect();
        assert_eq!(ids, vec!["00003", "00002", "00001"]);
    }

    #[test]
    fn test_lotto_check_is_containment() {
        let engine = lotto_engine();
        let outcome = engine.check(&[12, 5, 1]).unwrap();
        assert_eq!(outcome.query.key(), "01-05-12");
        assert_eq!(outcome.matches.len(), 2);
        assert!(outcome.appeared());

        assert!(!engine.check(&[7, 9, 11]).unwrap().appeared());
    }

    #[test]
    fn test_lotto_check_rejects_bad_input() {
        let engine = lotto_engine();
        assert_eq!(engine.check(&[]).unwrap_err(), CheckError::Empty);
        assert!(matches!(
            engine.check(&[1, 2]),
            Err(CheckError::Numbers(NumbersError::WrongCount { found: 2, .. }))
        ));
        assert!(engine.check(&[1, 2, 3, 4, 5, 6]).is_err());
        assert!(matches!(
            engine.check(&[1, 2, 36]),
            Err(CheckError::Numbers(NumbersError::OutOfRange { number: 36, .. }))
        ));
        assert!(matches!(
            engine.check(&[1, 2, 2]),
            Err(CheckError::Numbers(NumbersError::Duplicate(2)))
        ));
    }

    #[test]
    fn test_mega_check_is_exact() {
        let engine = mega_engine();
        let outcome = engine.check(&[6, 5, 4, 3, 2, 1]).unwrap();
        assert_eq!(outcome.matches.len(), 1);
        assert_eq!(outcome.matches[0].draw_id, "00001");

        // Les trois tirages contiennent 1 2 3, mais seule l'égalité compte
        assert!(engine.check(&[1, 2, 3]).is_err());
        assert!(!engine.check(&[1, 2, 3, 4, 5, 8]).unwrap().appeared());
    }

    #[test]
    fn test_lotto_suggestions_unscored_and_unseen() {
        let engine = lotto_engine();
        let mut rng = StdRng::seed_from_u64(2024);
        let suggestions = engine.suggest(&mut rng);

        assert_eq!(suggestions.len(), 10);
        for s in &suggestions {
            assert_eq!(s.score, None);
            assert_eq!(s.combo.len(), 5);
            assert!(!engine.frequencies().full_sets.contains_key(&s.combo.key()));
        }
    }

    #[test]
    fn test_mega_suggestions_ranked_by_score() {
        let engine = mega_engine();
        let mut rng = StdRng::seed_from_u64(2024);
        let suggestions = engine.suggest(&mut rng);

        assert_eq!(suggestions.len(), 10);
        assert!(suggestions.iter().all(|s| s.score.is_some()));
        assert!(suggestions.windows(2).all(|w| w[0].score >= w[1].score));
        for s in &suggestions {
            assert_eq!(s.score, Some(crate::score::score(&s.combo, &engine.frequencies().numbers)));
        }
    }

    #[test]
    fn test_constraints_are_per_engine() {
        let mut lotto = lotto_engine();
        let mega = mega_engine();

        lotto.constraints_mut().required.insert(7);
        assert!(lotto.constraints().required.contains(&7));
        assert!(mega.constraints().is_empty());

        let mut rng = StdRng::seed_from_u64(99);
        assert!(lotto.suggest(&mut rng).iter().all(|s| s.combo.contains(7)));

        lotto.clear_constraints();
        assert!(lotto.constraints().is_empty());

        lotto.set_constraints(ConstraintSpec {
            sum_min: Some(300),
            ..Default::default()
        });
        let generation = lotto.generate(&mut rng);
        assert_eq!(generation.phases_used, 4);
        // Le spec de l'utilisateur n'est pas modifié par le relâchement
        assert_eq!(lotto.constraints().sum_min, Some(300));
    }

    #[test]
    fn test_empty_engine() {
        let engine = GameEngine::new(Game::Mega, EngineConfig::default());
        assert!(engine.store().is_empty());
        assert!(engine.repeated_full_sets().is_empty());
        assert!(engine.recent_draws().is_empty());
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(engine.suggest(&mut rng).len(), 10);
    }
}
