use crate::ingest::parse_line;
use crate::models::{DateOrder, DrawRecord, Game};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub total_lines: u32,
    pub inserted: u32,
    pub skipped: u32,
}

/// Historique des tirages d'un jeu, dans l'ordre du fichier source.
#[derive(Debug, Clone)]
pub struct DrawStore {
    game: Game,
    draws: Vec<DrawRecord>,
}

impl DrawStore {
    pub fn new(game: Game) -> Self {
        Self {
            game,
            draws: Vec::new(),
        }
    }

    pub fn game(&self) -> Game {
        self.game
    }

    /// Ajoute les tirages lisibles de `raw`. Les lignes mal formées sont ignorées une par une.
    pub fn ingest(&mut self, raw: &str) -> IngestReport {
        let mut report = IngestReport::default();

        for (idx, line) in raw.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            report.total_lines += 1;
            match parse_line(self.game, line) {
                Ok(draw) => {
                    self.draws.push(draw);
                    report.inserted += 1;
                }
                Err(e) => {
                    log::warn!("{} : ligne {} ignorée ({})", self.game, idx + 1, e);
                    report.skipped += 1;
                }
            }
        }

        log::info!(
            "{} : {} tirages chargés, {} lignes ignorées",
            self.game,
            report.inserted,
            report.skipped
        );
        report
    }

    pub fn all_draws(&self) -> &[DrawRecord] {
        &self.draws
    }

    pub fn len(&self) -> usize {
        self.draws.len()
    }

    pub fn is_empty(&self) -> bool {
        self.draws.is_empty()
    }

    /// Dates distinctes dans l'ordre propre au jeu (voir [`DateOrder`]).
    pub fn unique_dates_in_file_order(&self) -> Vec<&str> {
        let mut dates: Vec<&str> = Vec::new();
        for draw in &self.draws {
            if !dates.contains(&draw.date.as_str()) {
                dates.push(&draw.date);
            }
        }
        if self.game.date_order() == DateOrder::Reversed {
            dates.reverse();
        }
        dates
    }

    pub fn draws_on(&self, date: &str) -> Vec<&DrawRecord> {
        self.draws.iter().filter(|d| d.date == date).collect()
    }

    /// Tous les tirages des `days` premières dates.
    pub fn recent_draws(&self, days: usize) -> Vec<&DrawRecord> {
        self.unique_dates_in_file_order()
            .into_iter()
            .take(days)
            .flat_map(|date| self.draws_on(date))
            .collect()
    }

    pub fn draws_matching_all(&self, numbers: &[u8]) -> Vec<&DrawRecord> {
        self.draws
            .iter()
            .filter(|d| d.numbers.contains_all(numbers))
            .collect()
    }

    pub fn draws_equal_exactly(&self, numbers: &[u8]) -> Vec<&DrawRecord> {
        let mut wanted = numbers.to_vec();
        wanted.sort_unstable();
        self.draws
            .iter()
            .filter(|d| d.numbers() == wanted.as_slice())
            .collect()
    }
}
