//! Static classification of units (the state table).
//!
//! Text format, one unit per line:
//!
//! ```text
//! # code votes category
//! PA 19 B
//! CA 54 D
//! TX 40 G
//! ```
//!
//! Category `B` is battleground, `D` strongly side A, `G` strongly side B.
//! Any malformed line fails the whole load so a report never starts on a
//! partial table.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::domain::{Category, UnitRecord};
use crate::error::AppError;

/// Immutable table of all units, in file order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateTable {
    units: Vec<UnitRecord>,
}

impl StateTable {
    pub fn load(path: &Path) -> Result<Self, AppError> {
        let text = fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read state table '{}': {e}", path.display())))?;
        let table = Self::parse(&text)
            .map_err(|e| AppError::config(format!("State table '{}': {}", path.display(), e.message())))?;
        table.log_summary();
        Ok(table)
    }

    pub fn parse(text: &str) -> Result<Self, AppError> {
        let mut units = Vec::new();
        let mut seen = HashSet::new();

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let fields: Vec<&str> = line.split_whitespace().collect();
            let [code, votes, category] = fields.as_slice() else {
                return Err(AppError::config(format!("line {line_no} is not a triplet")));
            };

            let weight = votes
                .parse::<u32>()
                .ok()
                .filter(|w| *w > 0)
                .ok_or_else(|| AppError::config(format!("line {line_no}: invalid vote count '{votes}'")))?;
            let category = Category::from_code(category).ok_or_else(|| {
                AppError::config(format!("line {line_no}: category '{category}' is not supported"))
            })?;

            let code = code.to_ascii_uppercase();
            if code.len() != 2 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
                return Err(AppError::config(format!("line {line_no}: state code '{code}' is not two letters")));
            }
            if !seen.insert(code.clone()) {
                return Err(AppError::config(format!("line {line_no}: duplicate state code {code}")));
            }

            units.push(UnitRecord {
                code,
                weight,
                category,
            });
        }

        if units.is_empty() {
            return Err(AppError::config("no states defined"));
        }

        Ok(Self { units })
    }

    pub fn units(&self) -> &[UnitRecord] {
        &self.units
    }

    pub fn get(&self, code: &str) -> Option<&UnitRecord> {
        self.units.iter().find(|u| u.code.eq_ignore_ascii_case(code))
    }

    pub fn total_weight(&self) -> u32 {
        self.units.iter().map(|u| u.weight).sum()
    }

    pub fn codes_in(&self, category: Category) -> Vec<&str> {
        self.units
            .iter()
            .filter(|u| u.category == category)
            .map(|u| u.code.as_str())
            .collect()
    }

    fn log_summary(&self) {
        for category in [Category::Battleground, Category::StronglyA, Category::StronglyB] {
            let codes = self.codes_in(category);
            tracing::info!(?category, count = codes.len(), states = %codes.join(","), "state table");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_triplets_and_skips_comments() {
        let table = StateTable::parse("# st ev cat\n\nPA 19 B\nca 54 D\n  TX   40 G  \n").unwrap();
        assert_eq!(table.units().len(), 3);
        assert_eq!(table.get("CA").unwrap().category, Category::StronglyA);
        assert_eq!(table.get("tx").unwrap().weight, 40);
        assert_eq!(table.total_weight(), 113);
        assert_eq!(table.codes_in(Category::Battleground), vec!["PA"]);
    }

    #[test]
    fn rejects_malformed_lines() {
        for bad in [
            "PA 19",
            "PA 19 B extra",
            "PA x B",
            "PA 0 B",
            "PA -3 B",
            "PA 19 Q",
            "PA 19 B\nPA 20 B",
            "# only",
            "PENN 19 B",
            "X 3 D",
            "P1 3 D",
        ] {
            assert!(StateTable::parse(bad).is_err(), "{bad:?}");
        }
    }

    #[test]
    fn long_codes_are_rejected_with_line() {
        let err = StateTable::parse("PA 19 B\nPENN 19 B\n").unwrap_err();
        assert!(err.message().contains("line 2: state code 'PENN'"), "{err}");
    }

    #[test]
    fn errors_name_the_line() {
        let err = StateTable::parse("PA 19 B\nOH 17 Z\n").unwrap_err();
        assert!(err.message().contains("line 2"), "{err}");
        assert_eq!(err.exit_code(), crate::error::EXIT_CONFIG);
    }
}
