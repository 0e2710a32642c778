//! Completion rules. Pure functions over a checked-state snapshot.

use crate::model::pin::{BossEntry, Pin};
use crate::model::state::CheckedStates;

/// True iff `name` is stored as bare `true`.
pub fn is_item_complete(states: &CheckedStates, name: &str) -> bool {
    states.item(name) == Some(true)
}

/// True iff the location's own flag is set, in either stored form.
pub fn is_location_self_complete(states: &CheckedStates, name: &str) -> bool {
    match states.location(name) {
        Some(loc) => loc.is_checked(),
        None => is_item_complete(states, name),
    }
}

/// True iff the location has object form and records `boss` as done. A
/// location stored as a bare boolean has no per-boss progress.
pub fn is_boss_under_location_complete(states: &CheckedStates, location: &str, boss: &str) -> bool {
    states
        .location(location)
        .is_some_and(|loc| loc.boss_checked(boss))
}

/// Bosses that block `location` from counting as complete.
fn blocking_bosses(bosses: &[BossEntry]) -> impl Iterator<Item = &BossEntry> {
    bosses.iter().filter(|b| !b.optional)
}

/// A boss pin is complete when checked. A location needs its own flag plus
/// every non-optional boss under it.
pub fn is_pin_complete(states: &CheckedStates, pin: &Pin) -> bool {
    match pin {
        Pin::Boss(b) => is_item_complete(states, &b.info.label),
        Pin::Location(loc) => {
            let label = &loc.info.label;
            is_location_self_complete(states, label)
                && blocking_bosses(&loc.bosses)
                    .all(|b| is_boss_under_location_complete(states, label, &b.name))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::pin::{BossPin, LocationPin, PinInfo};
    use crate::model::state::LocationState;
    use indexmap::IndexMap;

    fn info(label: &str) -> PinInfo {
        PinInfo {
            label: label.to_string(),
            x: 0.0,
            y: 0.0,
            info: None,
            wiki: None,
            notes: None,
            difficulty: None,
        }
    }

    fn boss(name: &str, optional: bool) -> BossEntry {
        BossEntry {
            name: name.to_string(),
            optional,
            wiki: None,
            notes: None,
            difficulty: None,
        }
    }

    fn location(label: &str, bosses: Vec<BossEntry>) -> Pin {
        Pin::Location(LocationPin {
            info: info(label),
            bosses,
        })
    }

    fn loc_state(checked: Option<bool>, bosses: &[(&str, bool)]) -> LocationState {
        LocationState {
            checked,
            bosses: bosses
                .iter()
                .map(|(n, v)| (n.to_string(), *v))
                .collect::<IndexMap<_, _>>(),
        }
    }

    #[test]
    fn item_complete_only_for_bare_true() {
        let mut states = CheckedStates::new();
        states.insert_item("A", true);
        states.insert_item("B", false);
        states.insert_location("C", loc_state(Some(true), &[]));
        assert!(is_item_complete(&states, "A"));
        assert!(!is_item_complete(&states, "B"));
        assert!(!is_item_complete(&states, "C"));
        assert!(!is_item_complete(&states, "missing"));
    }

    #[test]
    fn location_self_reads_both_forms() {
        let mut states = CheckedStates::new();
        states.insert_item("Bare", true);
        states.insert_location("Obj", loc_state(Some(true), &[]));
        states.insert_location("NoFlag", loc_state(None, &[("X", true)]));
        states.insert_location("Off", loc_state(Some(false), &[]));
        assert!(is_location_self_complete(&states, "Bare"));
        assert!(is_location_self_complete(&states, "Obj"));
        assert!(!is_location_self_complete(&states, "NoFlag"));
        assert!(!is_location_self_complete(&states, "Off"));
        assert!(!is_location_self_complete(&states, "missing"));
    }

    #[test]
    fn bare_boolean_location_has_no_boss_progress() {
        let mut states = CheckedStates::new();
        states.insert_item("Stormveil", true);
        assert!(!is_boss_under_location_complete(&states, "Stormveil", "Godrick"));
    }

    #[test]
    fn boss_pin_uses_item_state() {
        let pin = Pin::Boss(BossPin { info: info("Margit") });
        let mut states = CheckedStates::new();
        assert!(!is_pin_complete(&states, &pin));
        states.insert_item("Margit", true);
        assert!(is_pin_complete(&states, &pin));
    }

    #[test]
    fn optional_boss_never_blocks() {
        let pin = location("Stormveil", vec![boss("A", true), boss("B", false)]);
        let mut states = CheckedStates::new();
        states.insert_location("Stormveil", loc_state(Some(true), &[("A", false), ("B", true)]));
        assert!(is_pin_complete(&states, &pin));
    }

    #[test]
    fn required_boss_blocks() {
        let pin = location("Stormveil", vec![boss("A", true), boss("B", false)]);
        let mut states = CheckedStates::new();
        states.insert_location("Stormveil", loc_state(Some(true), &[("A", true)]));
        assert!(!is_pin_complete(&states, &pin));
    }

    #[test]
    fn self_flag_required_even_when_bosses_done() {
        let pin = location("Stormveil", vec![boss("B", false)]);
        let mut states = CheckedStates::new();
        states.insert_location("Stormveil", loc_state(None, &[("B", true)]));
        assert!(!is_pin_complete(&states, &pin));
    }

    #[test]
    fn location_without_bosses_is_self_complete() {
        let pin = location("Church", vec![]);
        let mut states = CheckedStates::new();
        assert!(!is_pin_complete(&states, &pin));
        states.insert_item("Church", true);
        assert!(is_pin_complete(&states, &pin));
    }

    #[test]
    fn bare_true_location_with_required_boss_is_incomplete() {
        let pin = location("Stormveil", vec![boss("Godrick", false)]);
        let mut states = CheckedStates::new();
        states.insert_item("Stormveil", true);
        assert!(!is_pin_complete(&states, &pin));
    }
}
