//! The only write path into the tracker state. Every mutation of the
//! persisted payload ends with a save.

use serde::Serialize;

use crate::io::store::StateStore;
use crate::model::pin::{Pin, PinKind};
use crate::ops::completion::{
    is_boss_under_location_complete, is_item_complete, is_location_self_complete,
};

/// What a cascade toggle changed, for the caller to report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub kind: PinKind,
    pub name: String,
    pub new_state: bool,
}

/// Store `name` as a bare boolean.
pub fn set_item_state(store: &mut StateStore, name: &str, checked: bool) {
    store.checked_states_mut().set_item(name, checked);
    store.save();
}

/// Flip `name`. A name already in object form flips its own flag.
pub fn toggle_item(store: &mut StateStore, name: &str) -> bool {
    let states = store.checked_states();
    let current = match states.location(name) {
        Some(loc) => loc.is_checked(),
        None => is_item_complete(states, name),
    };
    let next = !current;
    set_item_state(store, name, next);
    next
}

/// Set a location's own flag, moving it to object form if needed.
pub fn set_location_self_state(store: &mut StateStore, name: &str, checked: bool) {
    store.checked_states_mut().location_mut(name).checked = Some(checked);
    store.save();
}

pub fn toggle_location_self(store: &mut StateStore, name: &str) -> bool {
    let next = !is_location_self_complete(store.checked_states(), name);
    set_location_self_state(store, name, next);
    next
}

/// Set one boss under a location. A bare boolean location is upgraded to
/// object form with the old value kept as its own flag.
pub fn set_boss_state(store: &mut StateStore, location: &str, boss: &str, checked: bool) {
    store
        .checked_states_mut()
        .location_mut(location)
        .bosses
        .insert(boss.to_string(), checked);
    store.save();
}

pub fn toggle_boss_under_location(store: &mut StateStore, location: &str, boss: &str) -> bool {
    let next = !is_boss_under_location_complete(store.checked_states(), location, boss);
    set_boss_state(store, location, boss, next);
    next
}

/// Flip a pin together with everything under it.
///
/// A location's new state is the negation of its own flag, and every boss
/// entry under it (optional ones included) is set to that same value. The
/// whole change is written with a single save.
pub fn cascade_toggle(store: &mut StateStore, pin: &Pin) -> ToggleOutcome {
    let states = store.checked_states_mut();
    let new_state = match pin {
        Pin::Boss(b) => {
            let next = !is_item_complete(states, &b.info.label);
            states.set_item(&b.info.label, next);
            next
        }
        Pin::Location(loc) => {
            let next = !is_location_self_complete(states, &loc.info.label);
            let entry = states.location_mut(&loc.info.label);
            entry.checked = Some(next);
            for boss in &loc.bosses {
                entry.bosses.insert(boss.name.clone(), next);
            }
            next
        }
    };
    store.save();

    ToggleOutcome {
        kind: pin.kind(),
        name: pin.label().to_string(),
        new_state,
    }
}

/// Persisted view preference.
pub fn set_hide_completed(store: &mut StateStore, hide: bool) {
    store.set_hide_completed_flag(hide);
    store.save();
}

/// Session-only; not persisted, no event.
pub fn set_search_query(store: &mut StateStore, query: &str) {
    store.set_search_query_text(query);
}
