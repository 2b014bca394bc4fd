use std::io::{self, Write};
use std::path::Path;

use anyhow::{Context, Result};
use rand::rngs::StdRng;

use vietlott_db::models::format_number;
use vietlott_engine::config::save_constraints;
use vietlott_engine::engine::GameEngine;
use vietlott_engine::filter::ConstraintSpec;
use vietlott_engine::sampler::make_rng;

use crate::display::{display_recent, display_stats};
use crate::import::{parse_numbers, parse_optional};

#[derive(Debug, PartialEq)]
enum InteractiveCommand {
    Suggest,
    Constraints,
    Check,
    Stats,
    Recent,
    Clear,
    Save,
    Quit,
}

fn parse_command(input: &str) -> Option<InteractiveCommand> {
    match input.trim().to_lowercase().as_str() {
        "1" | "suggerer" | "suggérer" | "suggest" | "s" => Some(InteractiveCommand::Suggest),
        "2" | "contraintes" | "constraints" | "c" => Some(InteractiveCommand::Constraints),
        "3" | "verifier" | "vérifier" | "check" | "v" => Some(InteractiveCommand::Check),
        "4" | "stats" | "statistiques" => Some(InteractiveCommand::Stats),
        "5" | "recents" | "récents" | "recent" => Some(InteractiveCommand::Recent),
        "6" | "effacer" | "clear" => Some(InteractiveCommand::Clear),
        "7" | "sauver" | "save" => Some(InteractiveCommand::Save),
        "8" | "quitter" | "quit" | "q" | "exit" => Some(InteractiveCommand::Quit),
        _ => None,
    }
}

fn display_menu(engine: &GameEngine) {
    println!();
    println!("── Mode interactif {} ──", engine.game());
    println!("  Contraintes : {}", engine.constraints());
    println!("  1. suggerer    Nouvelles grilles");
    println!("  2. contraintes Modifier les contraintes");
    println!("  3. verifier    Chercher une combinaison");
    println!("  4. stats       Statistiques");
    println!("  5. recents     Derniers tirages");
    println!("  6. effacer     Effacer les contraintes");
    println!("  7. sauver      Sauver les contraintes");
    println!("  8. quitter     Quitter");
    println!();
}

fn prompt(msg: &str) -> Result<String> {
    print!("{}", msg);
    io::stdout().flush()?;
    let mut input = String::new();
    let read = io::stdin()
        .read_line(&mut input)
        .context("Erreur de lecture")?;
    if read == 0 {
        anyhow::bail!("Fin de l'entrée");
    }
    Ok(input.trim().to_string())
}

fn prompt_with_default(msg: &str, default: &str) -> Result<String> {
    let input = prompt(&format!("{} [{}] : ", msg, default))?;
    if input.is_empty() {
        Ok(default.to_string())
    } else {
        Ok(input)
    }
}

fn show_optional<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

fn show_set<'a>(numbers: impl Iterator<Item = &'a u8>) -> String {
    let joined = numbers.map(|&n| format_number(n)).collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        "-".to_string()
    } else {
        joined
    }
}

/// "-" vide le champ, une saisie vide garde la valeur actuelle.
fn cmd_constraints_interactive(engine: &mut GameEngine) -> Result<()> {
    let current = engine.constraints().clone();

    let sum_min = prompt_with_default("Somme minimale", &show_optional(current.sum_min))?;
    let sum_max = prompt_with_default("Somme maximale", &show_optional(current.sum_max))?;
    let even = prompt_with_default("Nombre de pairs", &show_optional(current.even_count))?;
    let required = prompt_with_default("Numéros obligatoires", &show_set(current.required.iter()))?;
    let forbidden = prompt_with_default("Numéros exclus", &show_set(current.forbidden.iter()))?;

    let required = if required == "-" { Vec::new() } else { parse_numbers(&required)? };
    let forbidden = if forbidden == "-" { Vec::new() } else { parse_numbers(&forbidden)? };

    let spec = ConstraintSpec {
        sum_min: parse_optional(&sum_min)?,
        sum_max: parse_optional(&sum_max)?,
        even_count: parse_optional(&even)?,
        required: required.into_iter().collect(),
        forbidden: forbidden.into_iter().collect(),
    };
    spec.validate(engine.game())?;
    println!("Contraintes : {}", spec);
    engine.set_constraints(spec);
    Ok(())
}

fn cmd_check_interactive(engine: &GameEngine) -> Result<()> {
    let range = engine.game().check_range();
    let input = prompt(&format!(
        "Numéros à vérifier ({} à {}, 1-{}) : ",
        range.start(),
        range.end(),
        engine.game().pool_size()
    ))?;
    let numbers = parse_numbers(&input)?;
    super::cmd_check(engine, &numbers)
}

fn cmd_save_interactive(engine: &GameEngine) -> Result<()> {
    let path = prompt_with_default("Fichier de sortie", "contraintes.json")?;
    save_constraints(engine.constraints(), Path::new(&path))?;
    println!("Contraintes sauvegardées dans {}", path);
    Ok(())
}

fn run_command(engine: &mut GameEngine, rng: &mut StdRng, command: InteractiveCommand) -> Result<()> {
    match command {
        InteractiveCommand::Suggest => super::cmd_suggest(engine, rng),
        InteractiveCommand::Constraints => cmd_constraints_interactive(engine),
        InteractiveCommand::Check => cmd_check_interactive(engine),
        InteractiveCommand::Stats => {
            display_stats(engine);
            Ok(())
        }
        InteractiveCommand::Recent => {
            display_recent(engine.game(), &engine.recent_draws());
            Ok(())
        }
        InteractiveCommand::Clear => {
            engine.clear_constraints();
            println!("Contraintes effacées.");
            Ok(())
        }
        InteractiveCommand::Save => cmd_save_interactive(engine),
        InteractiveCommand::Quit => Ok(()),
    }
}

pub fn run_interactive(engine: &mut GameEngine, seed: Option<u64>) -> Result<()> {
    println!("Bienvenue dans le mode interactif de vietlott !");

    // Un seul générateur pour la session : chaque "suggerer" donne une nouvelle liste
    let mut rng = make_rng(seed.or(engine.config().seed));

    loop {
        display_menu(engine);
        let input = match prompt("> ") {
            Ok(s) => s,
            Err(_) => break, // EOF / Ctrl+D
        };

        if input.is_empty() {
            continue;
        }

        match parse_command(&input) {
            Some(InteractiveCommand::Quit) => {
                println!("Au revoir !");
                break;
            }
            Some(command) => {
                if let Err(e) = run_command(engine, &mut rng, command) {
                    println!("Erreur: {e:#}");
                }
            }
            None => {
                println!("Commande inconnue : '{}'. Tapez un numéro (1-8) ou un nom de commande.", input);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_by_number() {
        assert_eq!(parse_command("1"), Some(InteractiveCommand::Suggest));
        assert_eq!(parse_command("2"), Some(InteractiveCommand::Constraints));
        assert_eq!(parse_command("3"), Some(InteractiveCommand::Check));
        assert_eq!(parse_command("4"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("5"), Some(InteractiveCommand::Recent));
        assert_eq!(parse_command("6"), Some(InteractiveCommand::Clear));
        assert_eq!(parse_command("7"), Some(InteractiveCommand::Save));
        assert_eq!(parse_command("8"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_by_name_and_alias() {
        assert_eq!(parse_command("suggerer"), Some(InteractiveCommand::Suggest));
        assert_eq!(parse_command("s"), Some(InteractiveCommand::Suggest));
        assert_eq!(parse_command("contraintes"), Some(InteractiveCommand::Constraints));
        assert_eq!(parse_command("c"), Some(InteractiveCommand::Constraints));
        assert_eq!(parse_command("vérifier"), Some(InteractiveCommand::Check));
        assert_eq!(parse_command("check"), Some(InteractiveCommand::Check));
        assert_eq!(parse_command("recent"), Some(InteractiveCommand::Recent));
        assert_eq!(parse_command("effacer"), Some(InteractiveCommand::Clear));
        assert_eq!(parse_command("save"), Some(InteractiveCommand::Save));
        assert_eq!(parse_command("q"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("exit"), Some(InteractiveCommand::Quit));
    }

    #[test]
    fn test_parse_command_case_insensitive() {
        assert_eq!(parse_command("QUIT"), Some(InteractiveCommand::Quit));
        assert_eq!(parse_command("Stats"), Some(InteractiveCommand::Stats));
        assert_eq!(parse_command("  Suggest "), Some(InteractiveCommand::Suggest));
    }

    #[test]
    fn test_parse_command_unknown() {
        assert_eq!(parse_command("foo"), None);
        assert_eq!(parse_command(""), None);
        assert_eq!(parse_command("9"), None);
    }

    #[test]
    fn test_show_helpers() {
        assert_eq!(show_optional::<u32>(None), "-");
        assert_eq!(show_optional(Some(120u32)), "120");
        assert_eq!(show_set([3u8, 17].iter()), "03 17");
        assert_eq!(show_set([].iter()), "-");
    }
}
