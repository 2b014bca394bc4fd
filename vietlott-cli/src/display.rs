use comfy_table::{presets::UTF8_FULL, Cell, Color, ContentArrangement, Table};

use vietlott_db::models::{format_number, DrawRecord, Game, Suggestion};
use vietlott_db::store::IngestReport;
use vietlott_engine::engine::{CheckOutcome, GameEngine};
use vietlott_engine::filter::ConstraintSpec;

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

fn spaced(numbers: &[u8]) -> String {
    numbers.iter().map(|&n| format_number(n)).collect::<Vec<_>>().join(" ")
}

pub fn display_import_summary(game: Game, report: &IngestReport) {
    println!("{} : {} tirages chargés", game, report.inserted);
    if report.skipped > 0 {
        println!("  Lignes ignorées : {} sur {}", report.skipped, report.total_lines);
    }
}

pub fn display_quick_pick(game: Game, numbers: &[u8]) {
    let title = match game {
        Game::Lotto => "Numéros spéciaux",
        Game::Mega => "Numéros du jour",
    };
    println!("\n🎲 {title} : {}\n", spaced(numbers));
}

pub fn display_suggestions(game: Game, suggestions: &[Suggestion], constraints: &ConstraintSpec, target: usize) {
    println!("\n💡 Grilles {} jamais sorties ({})\n", game, constraints);

    if suggestions.is_empty() {
        println!("Aucune grille trouvée.");
        return;
    }

    let mut header = vec!["#", "Grille", "Somme", "Pairs"];
    if game.is_scored() {
        header.push("Score");
    }
    let mut table = new_table(header);

    for (i, sug) in suggestions.iter().enumerate() {
        let mut row = vec![
            Cell::new(i + 1),
            Cell::new(sug.combo.key()),
            Cell::new(sug.combo.sum()),
            Cell::new(sug.combo.even_count()),
        ];
        if let Some(score) = sug.score {
            row.push(Cell::new(score));
        }
        table.add_row(row);
    }
    println!("{table}");

    if suggestions.len() < target {
        println!(
            "(Contraintes trop strictes : {} grille(s) sur {} demandées)",
            suggestions.len(),
            target
        );
    }
}

pub fn display_recent(game: Game, draws: &[&DrawRecord]) {
    println!("\n📅 Résultats des {} derniers jours\n", game.recent_days());

    if draws.is_empty() {
        println!("Aucun tirage à afficher.");
        return;
    }

    let mut table = new_table(vec!["Date", "Tirage", "Numéros"]);
    for draw in draws {
        let numbers = match game {
            Game::Lotto => format!(
                "{} | {}",
                spaced(draw.numbers()),
                draw.special.as_deref().unwrap_or("-")
            ),
            Game::Mega => spaced(draw.numbers()),
        };
        table.add_row(vec![&draw.date, &draw.draw_id, &numbers]);
    }
    println!("{table}");
}

pub fn display_counts(title: &str, first_column: &str, entries: &[(&str, u32)]) {
    println!("\n── {title} ──");

    if entries.is_empty() {
        println!("Aucune donnée");
        return;
    }

    let mut table = new_table(vec![first_column, "Occurrences"]);
    for &(key, count) in entries {
        table.add_row(vec![key.to_string(), count.to_string()]);
    }
    println!("{table}");
}

pub fn display_stats(engine: &GameEngine) {
    let game = engine.game();
    println!("\n📊 Statistiques {} sur {} tirages", game, engine.store().len());

    display_counts(
        &format!("Grilles de {} numéros sorties plus d'une fois", game.draw_size()),
        "Grille",
        &engine.repeated_full_sets(),
    );
    display_counts(
        "Top des triplets sortis plus d'une fois",
        "Triplet",
        &engine.top_subsets(),
    );
    display_counts("Fréquence de chaque numéro", "Numéro", &engine.number_frequencies());
}

pub fn display_check(outcome: &CheckOutcome<'_>) {
    if !outcome.appeared() {
        println!("❌ La combinaison {} n'est jamais sortie", outcome.query);
        return;
    }

    println!(
        "✅ La combinaison {} est sortie {} fois",
        outcome.query,
        outcome.matches.len()
    );

    let mut table = new_table(vec!["Date", "Tirage", "Numéros"]);
    for draw in &outcome.matches {
        table.add_row(vec![
            Cell::new(&draw.date),
            Cell::new(&draw.draw_id).fg(Color::Green),
            Cell::new(spaced(draw.numbers())),
        ]);
    }
    println!("{table}");
}
