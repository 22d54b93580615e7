//! Topping source and combo suggestion.
//!
//! The topping list is read once at startup from a directory of plain-text
//! files (one topping per line) and shared read-only between handlers.
//! Suggestions draw three distinct toppings without replacement.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;

/// Number of toppings in every combo
pub const COMBO_SIZE: usize = 3;

/// Prefix added to the description in spicy mode
pub const SPICY_PREFIX: &str = "🌶️🌶️🌶️ WILDLY SPICY ";

#[derive(Debug, thiserror::Error)]
pub enum ToppingError {
    #[error("Failed to read toppings from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Not enough toppings for a combo: need {}, have {available}", COMBO_SIZE)]
    InsufficientToppings { available: usize },
}

/// How suggestion descriptions are worded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToppingMode {
    #[default]
    Mild,
    Spicy,
}

impl ToppingMode {
    /// Parse a `TOPPING_MODE` value. Only "spicy" (any case) enables spicy mode.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("spicy") {
            ToppingMode::Spicy
        } else {
            ToppingMode::Mild
        }
    }
}

/// Immutable list of distinct candidate toppings.
#[derive(Debug, Clone)]
pub struct ToppingList {
    toppings: Vec<String>,
}

/// Three distinct toppings and their description.
#[derive(Debug, Clone, Serialize)]
pub struct ToppingCombo {
    pub toppings: Vec<String>,
    pub description: String,
}

impl ToppingList {
    /// Read every file in `dir`; each non-empty line is one topping.
    ///
    /// Order follows the directory listing and is not stable across platforms.
    /// A topping listed in several files is kept once.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ToppingError> {
        let dir = dir.as_ref();
        let mut toppings = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_error(dir))? {
            let path = entry.map_err(io_error(dir))?.path();
            if !path.is_file() {
                continue;
            }
            let contents = fs::read_to_string(&path).map_err(io_error(&path))?;
            toppings.extend(
                contents
                    .lines()
                    .map(|line| line.trim_end_matches('\r'))
                    .filter(|line| !line.trim().is_empty())
                    .map(str::to_string),
            );
            tracing::debug!(file = %path.display(), total = toppings.len(), "Loaded topping list");
        }

        let read = toppings.len();
        let list = Self::from_vec(toppings);
        if list.len() < read {
            tracing::debug!(duplicates = read - list.len(), "Dropped duplicate toppings");
        }
        Ok(list)
    }

    /// Build a list, dropping repeats after their first occurrence.
    pub fn from_vec(toppings: Vec<String>) -> Self {
        let mut seen = HashSet::with_capacity(toppings.len());
        let toppings = toppings
            .into_iter()
            .filter(|topping| seen.insert(topping.clone()))
            .collect();
        Self { toppings }
    }

    pub fn len(&self) -> usize {
        self.toppings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toppings.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.toppings
    }

    /// Pick three distinct toppings uniformly at random.
    pub fn suggest_combo<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        mode: ToppingMode,
    ) -> Result<ToppingCombo, ToppingError> {
        if self.toppings.len() < COMBO_SIZE {
            return Err(ToppingError::InsufficientToppings {
                available: self.toppings.len(),
            });
        }

        let toppings: Vec<String> = self
            .toppings
            .choose_multiple(rng, COMBO_SIZE)
            .cloned()
            .collect();
        let description = describe(&toppings, mode);

        Ok(ToppingCombo {
            toppings,
            description,
        })
    }
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ToppingError {
    let path = path.display().to_string();
    move |source| ToppingError::Io { path, source }
}

/// Join toppings as "a, b, and c", with the spicy prefix when enabled.
pub fn to_sentence(toppings: &[String], mode: ToppingMode) -> String {
    let mut sentence = String::new();
    if mode == ToppingMode::Spicy {
        sentence.push_str(SPICY_PREFIX);
    }

    let last = toppings.len().saturating_sub(1);
    for (index, topping) in toppings.iter().enumerate() {
        if index == last {
            sentence.push_str("and ");
            sentence.push_str(topping);
        } else {
            sentence.push_str(topping);
            sentence.push_str(", ");
        }
    }

    sentence
}

/// Full human-readable description of a combo.
pub fn describe(toppings: &[String], mode: ToppingMode) -> String {
    format!("Please enjoy this {} pizza!", to_sentence(toppings, mode))
}
