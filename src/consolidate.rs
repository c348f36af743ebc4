use std::collections::BTreeMap;

use log::{debug, info};
use serde::Serialize;

use crate::{inference::WaveSchema, level::FieldLevel};

/// One storage level per field, general enough for every wave it appears in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ConsolidatedSchema {
    levels: BTreeMap<String, FieldLevel>,
}

impl ConsolidatedSchema {
    pub fn level(&self, field: &str) -> Option<FieldLevel> {
        self.levels.get(field).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    /// Folds one more observation of `field` into the schema.
    pub fn include(&mut self, field: &str, level: FieldLevel) {
        match self.levels.get_mut(field) {
            Some(existing) => *existing = existing.merge(level),
            None => {
                self.levels.insert(field.to_string(), level);
            }
        }
    }

    /// Raises `field` to at least `level`. Returns true when the level changed.
    pub fn escalate(&mut self, field: &str, level: FieldLevel) -> bool {
        match self.levels.get_mut(field) {
            Some(existing) if existing.merge(level) != *existing => {
                debug!("Escalating {field} from {existing} to {level}");
                *existing = existing.merge(level);
                true
            }
            _ => false,
        }
    }
}

impl FromIterator<(String, FieldLevel)> for ConsolidatedSchema {
    fn from_iter<T: IntoIterator<Item = (String, FieldLevel)>>(iter: T) -> Self {
        let mut schema = ConsolidatedSchema::default();
        for (field, level) in iter {
            schema.include(&field, level);
        }
        schema
    }
}

/// Merges the per-wave level maps. Fields need not appear in every wave.
pub fn consolidate(waves: &[WaveSchema]) -> ConsolidatedSchema {
    let mut merged = ConsolidatedSchema::default();
    for wave in waves {
        for (field, level) in &wave.levels {
            merged.include(field, *level);
        }
    }
    info!(
        "Consolidated {} field(s) across {} wave(s)",
        merged.len(),
        waves.len()
    );
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wave(number: u8, levels: &[(&str, FieldLevel)]) -> WaveSchema {
        WaveSchema {
            wave: number,
            fields: levels.iter().map(|(field, _)| field.to_string()).collect(),
            levels: levels
                .iter()
                .map(|(field, level)| (field.to_string(), *level))
                .collect(),
            ..WaveSchema::default()
        }
    }

    #[test]
    fn identical_levels_survive_unchanged() {
        let waves: Vec<_> = (1..=5)
            .map(|n| wave(n, &[("AGE", FieldLevel::Byte), ("SEX", FieldLevel::Boolean)]))
            .collect();
        let merged = consolidate(&waves);
        assert_eq!(merged.level("AGE"), Some(FieldLevel::Byte));
        assert_eq!(merged.level("SEX"), Some(FieldLevel::Boolean));
    }

    #[test]
    fn differing_levels_take_the_wider() {
        let waves = vec![
            wave(1, &[("INC", FieldLevel::Int), ("NAME", FieldLevel::Boolean)]),
            wave(2, &[("INC", FieldLevel::Double)]),
            wave(3, &[("INC", FieldLevel::Short), ("NAME", FieldLevel::String)]),
        ];
        let merged = consolidate(&waves);
        assert_eq!(merged.level("INC"), Some(FieldLevel::Double));
        assert_eq!(merged.level("NAME"), Some(FieldLevel::String));
    }

    #[test]
    fn fields_from_any_wave_are_included() {
        let waves = vec![
            wave(1, &[("A", FieldLevel::Byte)]),
            wave(4, &[("B", FieldLevel::Short)]),
        ];
        let merged = consolidate(&waves);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged.level("B"), Some(FieldLevel::Short));
    }

    #[test]
    fn escalate_only_widens() {
        let mut merged: ConsolidatedSchema =
            [("FLAG".to_string(), FieldLevel::Boolean)].into_iter().collect();
        assert!(merged.escalate("FLAG", FieldLevel::Byte));
        assert!(!merged.escalate("FLAG", FieldLevel::Boolean));
        assert!(!merged.escalate("MISSING", FieldLevel::Byte));
        assert_eq!(merged.level("FLAG"), Some(FieldLevel::Byte));
    }
}
