use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::filter::ConstraintSpec;
use crate::frequency::TOP_SUBSETS;
use crate::sampler::GeneratorSettings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub generator: GeneratorSettings,
    pub top_subsets: usize,
    /// Seed fixe pour des suggestions reproductibles ; aléatoire sinon.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            generator: GeneratorSettings::default(),
            top_subsets: TOP_SUBSETS,
            seed: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<EngineConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let config: EngineConfig = serde_json::from_str(&json)
        .with_context(|| format!("JSON invalide dans {}", path.display()))?;
    Ok(config)
}

pub fn load_constraints(path: &Path) -> Result<ConstraintSpec> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let spec: ConstraintSpec = serde_json::from_str(&json)
        .with_context(|| format!("Contraintes invalides dans {}", path.display()))?;
    Ok(spec)
}

pub fn save_constraints(spec: &ConstraintSpec, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(spec)?;
    std::fs::write(path, json)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    Ok(())
}
