use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use vietlott_db::models::{format_number, validate_numbers, Combo, Game, NumbersError};

/// Contraintes saisies par l'utilisateur. Tous les champs vides = aucune contrainte.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConstraintSpec {
    pub sum_min: Option<u32>,
    pub sum_max: Option<u32>,
    pub even_count: Option<usize>,
    pub required: BTreeSet<u8>,
    pub forbidden: BTreeSet<u8>,
}

impl ConstraintSpec {
    pub fn is_empty(&self) -> bool {
        self.sum_min.is_none()
            && self.sum_max.is_none()
            && self.even_count.is_none()
            && self.required.is_empty()
            && self.forbidden.is_empty()
    }

    /// Numéros requis et exclus dans le pool du jeu. Un requis hors pool rendrait les
    /// phases 1 à 4 impossibles et ferait perdre toutes les autres contraintes.
    pub fn validate(&self, game: Game) -> Result<(), NumbersError> {
        for &n in self.required.iter().chain(self.forbidden.iter()) {
            validate_numbers(&[n], game.pool_size())?;
        }
        Ok(())
    }
}

impl fmt::Display for ConstraintSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "aucune contrainte");
        }

        let mut parts = Vec::new();
        match (self.sum_min, self.sum_max) {
            (Some(min), Some(max)) => parts.push(format!("somme {min}-{max}")),
            (Some(min), None) => parts.push(format!("somme ≥ {min}")),
            (None, Some(max)) => parts.push(format!("somme ≤ {max}")),
            (None, None) => {}
        }
        if let Some(even) = self.even_count {
            parts.push(format!("{even} pair(s)"));
        }
        let join = |set: &BTreeSet<u8>| {
            set.iter().map(|&n| format_number(n)).collect::<Vec<_>>().join(" ")
        };
        if !self.required.is_empty() {
            parts.push(format!("requis {}", join(&self.required)));
        }
        if !self.forbidden.is_empty() {
            parts.push(format!("exclus {}", join(&self.forbidden)));
        }
        write!(f, "{}", parts.join(", "))
    }
}

/// Axes de contrainte actifs. Le générateur les désactive un à un sans toucher au `ConstraintSpec`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Axes {
    pub forbidden: bool,
    pub even: bool,
    pub sum: bool,
    pub required: bool,
}

impl Axes {
    pub const ALL: Axes = Axes {
        forbidden: true,
        even: true,
        sum: true,
        required: true,
    };

    pub const NONE: Axes = Axes {
        forbidden: false,
        even: false,
        sum: false,
        required: false,
    };
}

pub fn passes(candidate: &Combo, spec: &ConstraintSpec, axes: Axes) -> bool {
    if spec.is_empty() {
        return true;
    }

    let sum = candidate.sum();
    let even_count = candidate.even_count();

    if axes.sum {
        if spec.sum_min.is_some_and(|min| sum < min) {
            return false;
        }
        if spec.sum_max.is_some_and(|max| sum > max) {
            return false;
        }
    }

    if axes.even && spec.even_count.is_some_and(|target| even_count != target) {
        return false;
    }

    if axes.required && !spec.required.iter().all(|&n| candidate.contains(n)) {
        return false;
    }

    if axes.forbidden && spec.forbidden.iter().any(|&n| candidate.contains(n)) {
        return false;
    }

    true
}
