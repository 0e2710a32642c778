use serde::Serialize;

use crate::model::pin::Pin;
use crate::model::state::CheckedStates;
use crate::ops::completion::{is_boss_under_location_complete, is_pin_complete};

/// Done/total pair
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub done: usize,
    pub total: usize,
}

impl Tally {
    fn add(&mut self, done: bool) {
        self.total += 1;
        if done {
            self.done += 1;
        }
    }
}

/// Completion counts across the catalog
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CompletionStats {
    /// Boss pins on the map
    pub bosses: Tally,
    pub locations: Tally,
    /// Bosses nested under locations, optional ones included
    pub location_bosses: Tally,
}

pub fn completion_stats(catalog: &[Pin], states: &CheckedStates) -> CompletionStats {
    let mut stats = CompletionStats::default();
    for pin in catalog {
        match pin {
            Pin::Boss(_) => stats.bosses.add(is_pin_complete(states, pin)),
            Pin::Location(loc) => {
                stats.locations.add(is_pin_complete(states, pin));
                for boss in &loc.bosses {
                    stats.location_bosses.add(is_boss_under_location_complete(
                        states,
                        &loc.info.label,
                        &boss.name,
                    ));
                }
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{load_catalog, parse_catalog};

    #[test]
    fn counts_by_kind() {
        let raw = parse_catalog(
            r#"
[[bosses]]
label = "Margit"
x = 0.0
y = 0.0

[[bosses]]
label = "Tree Sentinel"
x = 0.0
y = 0.0

[[locations]]
label = "Stormveil"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Godrick"

[[locations.bosses]]
name = "Grafted Scion"
optional = true
"#,
        )
        .unwrap();
        let catalog = load_catalog(&raw.bosses, &raw.locations);
        let mut states = CheckedStates::new();
        states.insert_item("Margit", true);
        states.location_mut("Stormveil").checked = Some(true);
        states
            .location_mut("Stormveil")
            .bosses
            .insert("Godrick".into(), true);

        let stats = completion_stats(&catalog, &states);
        assert_eq!(stats.bosses, Tally { done: 1, total: 2 });
        assert_eq!(stats.locations, Tally { done: 1, total: 1 });
        assert_eq!(stats.location_bosses, Tally { done: 1, total: 2 });
    }
}
