//! Cross-wave agreement of boolean sentinel codes.
//!
//! A field declared once in a shared ancestor class gets one initializer, so
//! every wave that shares it must code "false" and "true" the same way. When
//! two waves disagree on either code the field is kept as a byte instead.

use std::collections::BTreeMap;

use log::info;

use crate::{
    consolidate::ConsolidatedSchema,
    inference::{Sentinels, WaveSchema},
    level::FieldLevel,
    partition::{FieldPartition, WaveGroup},
};

/// Representative sentinels per shared class group and field.
///
/// A field can be declared in two classes on separate branches (`W1W2` and
/// `W4W5`), each with codes from its own member waves, so lookups are by group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SentinelMap {
    groups: BTreeMap<WaveGroup, BTreeMap<String, Sentinels>>,
}

impl SentinelMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, group: WaveGroup, field: &str) -> Option<Sentinels> {
        self.groups.get(&group)?.get(field).copied()
    }

    pub fn insert(&mut self, group: WaveGroup, field: impl Into<String>, codes: Sentinels) {
        self.groups
            .entry(group)
            .or_default()
            .insert(field.into(), codes);
    }

    /// Codes keyed by group tag, e.g. `W4W5`, for reporting.
    pub fn by_tag(&self) -> BTreeMap<String, BTreeMap<String, Sentinels>> {
        self.groups
            .iter()
            .map(|(group, fields)| (group.tag(), fields.clone()))
            .collect()
    }
}

/// Harmonizes sentinels of the `All` group and of the narrower shared groups.
///
/// `waves` is indexed by wave number minus one. Fields whose waves disagree are
/// escalated from `Boolean` to `Byte` in `consolidated` and left out of the
/// returned map.
pub fn reconcile(
    waves: &[WaveSchema],
    partition: &FieldPartition,
    consolidated: &mut ConsolidatedSchema,
) -> SentinelMap {
    let mut harmonized = SentinelMap::new();
    for group in WaveGroup::ABSTRACT {
        let members: Vec<&WaveSchema> = group
            .waves()
            .into_iter()
            .filter_map(|wave| waves.get(usize::from(wave - 1)))
            .collect();
        reconcile_group(group, &members, partition, consolidated, &mut harmonized);
    }
    harmonized
}

fn reconcile_group(
    group: WaveGroup,
    members: &[&WaveSchema],
    partition: &FieldPartition,
    consolidated: &mut ConsolidatedSchema,
    harmonized: &mut SentinelMap,
) {
    let mut escalated = 0usize;
    for field in partition.group(group) {
        if consolidated.level(field) != Some(FieldLevel::Boolean) {
            continue;
        }
        let observed: Vec<Sentinels> = members
            .iter()
            .filter_map(|wave| wave.sentinels(field))
            .collect();
        let Some(first) = observed.first().copied() else {
            continue;
        };
        let low_disagrees = observed.iter().any(|s| s.low != first.low);
        let high_disagrees = observed.iter().any(|s| s.high != first.high);
        if low_disagrees || high_disagrees {
            consolidated.escalate(field, FieldLevel::Byte);
            escalated += 1;
            info!(
                "{field} codes differ across waves {:?}; storing as byte",
                group.waves()
            );
        } else {
            harmonized.insert(group, field.clone(), first);
        }
    }
    if escalated > 0 {
        info!(
            "{escalated} {} boolean field(s) escalated to byte",
            group.tag()
        );
    }
}
