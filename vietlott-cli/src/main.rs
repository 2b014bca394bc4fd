mod display;
mod import;
mod interactive;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use rand::rngs::StdRng;

use crate::display::{
    display_check, display_import_summary, display_quick_pick, display_recent, display_stats,
    display_suggestions,
};
use crate::import::{data_file, load_engine};
use vietlott_db::models::Game;
use vietlott_engine::config::{load_config, load_constraints, EngineConfig};
use vietlott_engine::engine::GameEngine;
use vietlott_engine::filter::ConstraintSpec;
use vietlott_engine::sampler::make_rng;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum GameArg {
    Lotto,
    Mega,
}

impl From<GameArg> for Game {
    fn from(arg: GameArg) -> Self {
        match arg {
            GameArg::Lotto => Game::Lotto,
            GameArg::Mega => Game::Mega,
        }
    }
}

#[derive(Parser)]
#[command(name = "vietlott", about = "Analyseur de tirages Vietlott (Lotto 5/35, Mega 6/45)")]
struct Cli {
    /// Répertoire contenant lotto.txt et power645.jsonl
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    /// Fichier de configuration JSON (ignoré s'il n'existe pas)
    #[arg(long, global = true, default_value = "vietlott.json")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct GameOpt {
    /// Jeu analysé
    #[arg(short, long, default_value = "lotto")]
    game: GameArg,

    /// Fichier de tirages (défaut : fichier du jeu dans --data-dir)
    #[arg(short, long)]
    file: Option<PathBuf>,
}

#[derive(Args)]
struct ConstraintArgs {
    /// Somme minimale de la grille
    #[arg(long)]
    sum_min: Option<u32>,

    /// Somme maximale de la grille
    #[arg(long)]
    sum_max: Option<u32>,

    /// Nombre exact de numéros pairs
    #[arg(long)]
    even: Option<usize>,

    /// Numéros obligatoires (séparés par des virgules)
    #[arg(long, value_delimiter = ',')]
    require: Vec<u8>,

    /// Numéros exclus (séparés par des virgules)
    #[arg(long, value_delimiter = ',')]
    forbid: Vec<u8>,

    /// Fichier JSON de contraintes, complété par les options ci-dessus
    #[arg(long)]
    constraints: Option<PathBuf>,
}

impl ConstraintArgs {
    fn to_spec(&self, game: Game) -> Result<ConstraintSpec> {
        let mut spec = match &self.constraints {
            Some(path) => load_constraints(path)?,
            None => ConstraintSpec::default(),
        };
        if self.sum_min.is_some() {
            spec.sum_min = self.sum_min;
        }
        if self.sum_max.is_some() {
            spec.sum_max = self.sum_max;
        }
        if self.even.is_some() {
            spec.even_count = self.even;
        }
        spec.required.extend(self.require.iter().copied());
        spec.forbidden.extend(self.forbid.iter().copied());

        spec.validate(game)?;
        Ok(spec)
    }
}

#[derive(Subcommand)]
enum Command {
    /// Grilles et triplets sortis plusieurs fois, fréquence de chaque numéro
    Stats {
        #[command(flatten)]
        game: GameOpt,
    },

    /// Derniers tirages
    Recent {
        #[command(flatten)]
        game: GameOpt,
    },

    /// Suggérer des grilles jamais sorties
    Suggest {
        #[command(flatten)]
        game: GameOpt,

        #[command(flatten)]
        constraints: ConstraintArgs,

        /// Nombre de grilles
        #[arg(short, long)]
        count: Option<usize>,

        /// Essais maximum par phase de relâchement
        #[arg(long)]
        attempts: Option<usize>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Vérifier si une combinaison est déjà sortie
    Check {
        #[command(flatten)]
        game: GameOpt,

        /// Numéros à vérifier (3 à 5 pour Lotto, 6 pour Mega)
        #[arg(required = true)]
        numbers: Vec<u8>,
    },

    /// Tirage rapide (numéros spéciaux pour Lotto)
    QuickPick {
        #[command(flatten)]
        game: GameOpt,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Mode interactif (REPL)
    Interactive {
        #[command(flatten)]
        game: GameOpt,

        /// Fichier JSON de contraintes initiales
        #[arg(long)]
        constraints: Option<PathBuf>,

        /// Seed pour la reproductibilité
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let mut config = load_config_or_default(&cli.config)?;

    match cli.command {
        Command::Stats { game } => {
            let engine = open_engine(&game, &cli.data_dir, config)?;
            display_stats(&engine);
            Ok(())
        }
        Command::Recent { game } => {
            let engine = open_engine(&game, &cli.data_dir, config)?;
            display_recent(engine.game(), &engine.recent_draws());
            Ok(())
        }
        Command::Suggest {
            game,
            constraints,
            count,
            attempts,
            seed,
        } => {
            if let Some(count) = count {
                config.generator.target_count = count;
            }
            if let Some(attempts) = attempts {
                config.generator.max_attempts_per_phase = attempts;
            }
            let mut engine = open_engine(&game, &cli.data_dir, config)?;
            let spec = constraints.to_spec(engine.game())?;
            engine.set_constraints(spec);
            let mut rng = make_rng(seed.or(engine.config().seed));
            cmd_suggest(&engine, &mut rng)
        }
        Command::Check { game, numbers } => {
            let engine = open_engine(&game, &cli.data_dir, config)?;
            cmd_check(&engine, &numbers)
        }
        Command::QuickPick { game, seed } => {
            let game: Game = game.game.into();
            let mut rng = make_rng(seed.or(config.seed));
            display_quick_pick(game, &vietlott_engine::sampler::quick_pick(game, &mut rng));
            Ok(())
        }
        Command::Interactive {
            game,
            constraints,
            seed,
        } => {
            let mut engine = open_engine(&game, &cli.data_dir, config)?;
            if let Some(path) = constraints {
                let spec = load_constraints(&path)?;
                spec.validate(engine.game())
                    .with_context(|| format!("Contraintes invalides dans {}", path.display()))?;
                engine.set_constraints(spec);
            }
            interactive::run_interactive(&mut engine, seed)
        }
    }
}

fn load_config_or_default(path: &Path) -> Result<EngineConfig> {
    if !path.exists() {
        log::info!("Pas de fichier {:?}, configuration par défaut", path);
        return Ok(EngineConfig::default());
    }
    load_config(path)
}

fn open_engine(opt: &GameOpt, data_dir: &Path, config: EngineConfig) -> Result<GameEngine> {
    let game: Game = opt.game.into();
    let path = opt.file.clone().unwrap_or_else(|| data_file(game, data_dir));
    let (engine, report) = load_engine(game, &path, config)?;
    display_import_summary(game, &report);
    Ok(engine)
}

pub(crate) fn cmd_suggest(engine: &GameEngine, rng: &mut StdRng) -> Result<()> {
    display_quick_pick(engine.game(), &engine.quick_pick(rng));

    let suggestions = engine.suggest(rng);
    display_suggestions(
        engine.game(),
        &suggestions,
        engine.constraints(),
        engine.config().generator.target_count,
    );
    Ok(())
}

pub(crate) fn cmd_check(engine: &GameEngine, numbers: &[u8]) -> Result<()> {
    let outcome = engine.check(numbers)?;
    display_check(&outcome);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(constraints: Option<PathBuf>) -> ConstraintArgs {
        ConstraintArgs {
            sum_min: None,
            sum_max: None,
            even: None,
            require: Vec::new(),
            forbid: Vec::new(),
            constraints,
        }
    }

    fn constraints_file(json: &str) -> tempfile::NamedTempFile {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), json).unwrap();
        file
    }

    #[test]
    fn test_flags_without_file() {
        let mut a = args(None);
        a.sum_min = Some(80);
        a.require = vec![7, 3];
        let spec = a.to_spec(Game::Lotto).unwrap();
        assert_eq!(spec.sum_min, Some(80));
        assert_eq!(spec.sum_max, None);
        assert_eq!(spec.required.iter().copied().collect::<Vec<_>>(), vec![3, 7]);

        assert!(args(None).to_spec(Game::Mega).unwrap().is_empty());
    }

    #[test]
    fn test_flags_override_file_values() {
        let file = constraints_file(
            r#"{"sum_min": 90, "sum_max": 200, "even_count": 2, "required": [3], "forbidden": [4]}"#,
        );
        let mut a = args(Some(file.path().to_path_buf()));
        a.sum_min = Some(100);
        a.even = Some(3);
        a.require = vec![7];
        a.forbid = vec![8, 4];

        let spec = a.to_spec(Game::Lotto).unwrap();
        assert_eq!(spec.sum_min, Some(100));
        assert_eq!(spec.sum_max, Some(200));
        assert_eq!(spec.even_count, Some(3));
        assert_eq!(spec.required.iter().copied().collect::<Vec<_>>(), vec![3, 7]);
        assert_eq!(spec.forbidden.iter().copied().collect::<Vec<_>>(), vec![4, 8]);
    }

    #[test]
    fn test_out_of_pool_numbers_rejected() {
        let mut a = args(None);
        a.require = vec![36];
        assert!(a.to_spec(Game::Lotto).is_err());
        assert!(a.to_spec(Game::Mega).is_ok());

        let mut a = args(None);
        a.forbid = vec![0];
        assert!(a.to_spec(Game::Mega).is_err());

        let file = constraints_file(r#"{"sum_min": 150, "required": [99]}"#);
        assert!(args(Some(file.path().to_path_buf())).to_spec(Game::Lotto).is_err());
    }

    #[test]
    fn test_missing_constraints_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = args(Some(dir.path().join("absent.json"))).to_spec(Game::Lotto).unwrap_err();
        assert!(err.to_string().contains("Impossible de lire"));
    }
}
