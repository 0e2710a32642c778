use std::fmt;

use indexmap::IndexMap;
use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Key holding a location's own flag inside its object form
pub const SELF_KEY: &str = "checked";

/// Per-location progress once any sub-state has been recorded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationState {
    /// The location's own flag. `None` when never recorded, so an object
    /// without a `checked` key survives a save/load cycle unchanged.
    pub checked: Option<bool>,
    /// Boss name → completion, scoped to this location
    pub bosses: IndexMap<String, bool>,
}

impl LocationState {
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }

    pub fn boss_checked(&self, boss: &str) -> bool {
        self.bosses.get(boss).copied().unwrap_or(false)
    }
}

/// Stored completion state for every item name.
///
/// A name lives in at most one of the two maps: `items` holds the bare
/// boolean form (bosses, and locations with no sub-state yet), `locations`
/// holds the object form. Moving a name from `items` to `locations` is one-way.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckedStates {
    items: IndexMap<String, bool>,
    locations: IndexMap<String, LocationState>,
}

impl CheckedStates {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty() && self.locations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len() + self.locations.len()
    }

    /// Bare boolean value for `name`, if stored in that form
    pub fn item(&self, name: &str) -> Option<bool> {
        self.items.get(name).copied()
    }

    /// Object form for `name`, if it has been upgraded
    pub fn location(&self, name: &str) -> Option<&LocationState> {
        self.locations.get(name)
    }

    pub fn items(&self) -> impl Iterator<Item = (&str, bool)> {
        self.items.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn locations(&self) -> impl Iterator<Item = (&str, &LocationState)> {
        self.locations.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Store a bare boolean. A name already in object form keeps that form
    /// and has its own flag set instead.
    pub(crate) fn set_item(&mut self, name: &str, value: bool) {
        if let Some(loc) = self.locations.get_mut(name) {
            loc.checked = Some(value);
            return;
        }
        self.items.insert(name.to_string(), value);
    }

    /// Object form for `name`, upgrading from the bare boolean form (which
    /// becomes `checked`) or creating an empty object if nothing was stored.
    pub(crate) fn location_mut(&mut self, name: &str) -> &mut LocationState {
        let items = &mut self.items;
        self.locations
            .entry(name.to_string())
            .or_insert_with(|| LocationState {
                checked: items.shift_remove(name),
                bosses: IndexMap::new(),
            })
    }

    pub fn insert_item(&mut self, name: impl Into<String>, value: bool) {
        let name = name.into();
        self.locations.shift_remove(&name);
        self.items.insert(name, value);
    }

    pub fn insert_location(&mut self, name: impl Into<String>, state: LocationState) {
        let name = name.into();
        self.items.shift_remove(&name);
        self.locations.insert(name, state);
    }
}

impl Serialize for CheckedStates {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (name, value) in &self.items {
            map.serialize_entry(name, value)?;
        }
        for (name, loc) in &self.locations {
            map.serialize_entry(name, &LocationWire(loc))?;
        }
        map.end()
    }
}

struct LocationWire<'a>(&'a LocationState);

impl Serialize for LocationWire<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let loc = self.0;
        let len = loc.bosses.len() + usize::from(loc.checked.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(checked) = loc.checked {
            map.serialize_entry(SELF_KEY, &checked)?;
        }
        for (boss, value) in &loc.bosses {
            map.serialize_entry(boss, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CheckedStates {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CheckedStatesVisitor)
    }
}

struct CheckedStatesVisitor;

impl<'de> Visitor<'de> for CheckedStatesVisitor {
    type Value = CheckedStates;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of item names to booleans or location objects")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut states = CheckedStates::new();
        while let Some((name, value)) = access.next_entry::<String, Value>()? {
            match value {
                Value::Bool(b) => states.insert_item(name, b),
                Value::Object(fields) => {
                    let mut loc = LocationState::default();
                    for (key, field) in fields {
                        // Non-boolean fields read as "not recorded"
                        let Value::Bool(b) = field else { continue };
                        if key == SELF_KEY {
                            loc.checked = Some(b);
                        } else {
                            loc.bosses.insert(key, b);
                        }
                    }
                    states.insert_location(name, loc);
                }
                // null, numbers, strings, arrays: treat as never stored
                _ => {}
            }
        }
        Ok(states)
    }
}

/// The whole durable record, read and written as one blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredData {
    pub checked_states: CheckedStates,
    pub hide_completed_items: bool,
}

/// Each field is read on its own: a field of the wrong type falls back to
/// its default without discarding the other. Only a non-object is an error.
impl<'de> Deserialize<'de> for StoredData {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let Value::Object(mut fields) = Value::deserialize(deserializer)? else {
            return Err(de::Error::custom("expected a JSON object"));
        };
        let checked_states = match fields.remove("checkedStates") {
            Some(value @ Value::Object(_)) => serde_json::from_value(value).unwrap_or_default(),
            _ => CheckedStates::default(),
        };
        let hide_completed_items = fields
            .get("hideCompletedItems")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        Ok(StoredData {
            checked_states,
            hide_completed_items,
        })
    }
}

/// Inputs to the view projection besides the catalog and checked states
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewPreferences {
    /// Persisted
    pub hide_completed_items: bool,
    /// Session-only
    pub active_search_query: String,
}
