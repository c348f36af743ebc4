//! Splits the canonical field names of the five waves into wave groups.
//!
//! The groups mirror the generated class hierarchy:
//!
//! ```text
//! All (W1W2W3W4W5)
//! ├── W1W2 ── W1, W2
//! └── W3W4W5 ── W3
//!     └── W4W5 ── W4, W5
//! ```
//!
//! Each class declares only the fields of its own group, so along any single
//! chain from a wave up to `All` the groups must not overlap, and together they
//! must cover exactly the fields of that wave.

use std::collections::BTreeSet;

use log::info;
use serde::Serialize;

use crate::files::NWAVES;

pub type FieldSet = BTreeSet<String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum WaveGroup {
    Wave(u8),
    W1W2,
    W3W4W5,
    W4W5,
    All,
}

impl WaveGroup {
    /// Abstract ancestors, root first.
    pub const ABSTRACT: [WaveGroup; 4] = [
        WaveGroup::All,
        WaveGroup::W1W2,
        WaveGroup::W3W4W5,
        WaveGroup::W4W5,
    ];

    pub fn tag(self) -> String {
        match self {
            WaveGroup::Wave(wave) => format!("W{wave}"),
            WaveGroup::W1W2 => "W1W2".to_string(),
            WaveGroup::W3W4W5 => "W3W4W5".to_string(),
            WaveGroup::W4W5 => "W4W5".to_string(),
            WaveGroup::All => "W1W2W3W4W5".to_string(),
        }
    }

    pub fn waves(self) -> Vec<u8> {
        match self {
            WaveGroup::Wave(wave) => vec![wave],
            WaveGroup::W1W2 => vec![1, 2],
            WaveGroup::W3W4W5 => vec![3, 4, 5],
            WaveGroup::W4W5 => vec![4, 5],
            WaveGroup::All => (1..=NWAVES).collect(),
        }
    }

    /// The group this one's class extends; `None` for the root.
    pub fn parent(self) -> Option<WaveGroup> {
        match self {
            WaveGroup::Wave(1 | 2) => Some(WaveGroup::W1W2),
            WaveGroup::Wave(3) => Some(WaveGroup::W3W4W5),
            WaveGroup::Wave(_) => Some(WaveGroup::W4W5),
            WaveGroup::W1W2 | WaveGroup::W3W4W5 => Some(WaveGroup::All),
            WaveGroup::W4W5 => Some(WaveGroup::W3W4W5),
            WaveGroup::All => None,
        }
    }

    /// This group followed by its ancestors up to the root.
    pub fn chain(self) -> Vec<WaveGroup> {
        std::iter::successors(Some(self), |group| group.parent()).collect()
    }

    pub fn is_abstract(self) -> bool {
        !matches!(self, WaveGroup::Wave(_))
    }
}

/// Disjoint field groups driving the generated class hierarchy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldPartition {
    pub all: FieldSet,
    pub w12: FieldSet,
    pub w345: FieldSet,
    pub w45: FieldSet,
    pub residual: [FieldSet; NWAVES as usize],
}

impl FieldPartition {
    pub fn group(&self, group: WaveGroup) -> &FieldSet {
        match group {
            WaveGroup::Wave(wave) => &self.residual[usize::from(wave - 1)],
            WaveGroup::W1W2 => &self.w12,
            WaveGroup::W3W4W5 => &self.w345,
            WaveGroup::W4W5 => &self.w45,
            WaveGroup::All => &self.all,
        }
    }

    /// The groups declared along `wave`'s class chain, most specific first.
    pub fn applicable(&self, wave: u8) -> Vec<(WaveGroup, &FieldSet)> {
        WaveGroup::Wave(wave)
            .chain()
            .into_iter()
            .map(|group| (group, self.group(group)))
            .collect()
    }
}

fn intersect(sets: &[&FieldSet]) -> FieldSet {
    let Some((first, rest)) = sets.split_first() else {
        return FieldSet::new();
    };
    first
        .iter()
        .filter(|field| rest.iter().all(|set| set.contains(*field)))
        .cloned()
        .collect()
}

fn minus(set: &FieldSet, others: &[&FieldSet]) -> FieldSet {
    set.iter()
        .filter(|field| !others.iter().any(|other| other.contains(*field)))
        .cloned()
        .collect()
}

/// Partitions the per-wave field sets (wave 1 first).
pub fn partition(waves: &[FieldSet; NWAVES as usize]) -> FieldPartition {
    let [w1, w2, w3, w4, w5] = waves;
    let all = intersect(&[w1, w2, w3, w4, w5]);
    info!("{} field(s) common to waves 1, 2, 3, 4 and 5", all.len());
    let w12 = minus(&intersect(&[w1, w2]), &[&all]);
    info!("{} other field(s) common to waves 1 and 2", w12.len());
    let w345 = minus(&intersect(&[w3, w4, w5]), &[&all]);
    info!("{} other field(s) common to waves 3, 4 and 5", w345.len());
    let w45 = minus(&intersect(&[w4, w5]), &[&all, &w345]);
    info!("{} other field(s) common to waves 4 and 5", w45.len());
    let residual = [
        minus(w1, &[&all, &w12]),
        minus(w2, &[&all, &w12]),
        minus(w3, &[&all, &w345]),
        minus(w4, &[&all, &w345, &w45]),
        minus(w5, &[&all, &w345, &w45]),
    ];
    FieldPartition {
        all,
        w12,
        w345,
        w45,
        residual,
    }
}
