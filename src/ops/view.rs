use crate::model::pin::Pin;
use crate::model::state::{CheckedStates, ViewPreferences};
use crate::ops::completion::is_pin_complete;

/// Queries this short (after trimming) do not filter.
pub const MIN_QUERY_LEN: usize = 3;

/// Normalized query, or `None` when it is too short to count as a search.
fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    (q.chars().count() >= MIN_QUERY_LEN).then_some(q)
}

/// Label match, or for locations, a match on any nested boss name.
/// `query` must already be lower-cased.
fn matches_query(pin: &Pin, query: &str) -> bool {
    pin.label().to_lowercase().contains(query)
        || pin
            .bosses()
            .iter()
            .any(|b| b.name.to_lowercase().contains(query))
}

/// The pins to present, in catalog order.
///
/// Completed pins are dropped when `hide_completed_items` is set; a query of
/// at least [`MIN_QUERY_LEN`] characters then keeps only matching pins.
pub fn project_view<'a>(
    catalog: &'a [Pin],
    states: &CheckedStates,
    prefs: &ViewPreferences,
) -> Vec<&'a Pin> {
    let query = normalize_query(&prefs.active_search_query);
    catalog
        .iter()
        .filter(|pin| !(prefs.hide_completed_items && is_pin_complete(states, pin)))
        .filter(|pin| query.as_deref().is_none_or(|q| matches_query(pin, q)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{load_catalog, parse_catalog};

    const CATALOG: &str = r#"
[[bosses]]
label = "Margit, the Fell Omen"
x = 0.0
y = 0.0

[[bosses]]
label = "Tree Sentinel"
x = 0.0
y = 0.0

[[locations]]
label = "Stormveil Castle"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Godrick the Grafted"

[[locations]]
label = "Chapel of Anticipation"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Grafted Scion"
optional = true

[[locations]]
label = "Murkwater Cave"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Patches"
"#;

    fn catalog() -> Vec<Pin> {
        let raw = parse_catalog(CATALOG).unwrap();
        load_catalog(&raw.bosses, &raw.locations)
    }

    fn prefs(hide: bool, query: &str) -> ViewPreferences {
        ViewPreferences {
            hide_completed_items: hide,
            active_search_query: query.to_string(),
        }
    }

    fn labels(pins: &[&Pin]) -> Vec<String> {
        pins.iter().map(|p| p.label().to_string()).collect()
    }

    #[test]
    fn no_filters_keeps_catalog_order() {
        let cat = catalog();
        let view = project_view(&cat, &CheckedStates::new(), &prefs(false, ""));
        assert_eq!(
            labels(&view),
            vec![
                "Margit, the Fell Omen",
                "Tree Sentinel",
                "Stormveil Castle",
                "Chapel of Anticipation",
                "Murkwater Cave",
            ]
        );
    }

    #[test]
    fn short_query_does_not_filter() {
        let cat = catalog();
        let states = CheckedStates::new();
        let all = project_view(&cat, &states, &prefs(false, ""));
        let short = project_view(&cat, &states, &prefs(false, "ma"));
        let padded = project_view(&cat, &states, &prefs(false, "  ma  "));
        assert_eq!(labels(&short), labels(&all));
        assert_eq!(labels(&padded), labels(&all));
    }

    #[test]
    fn query_matches_label_case_insensitively() {
        let cat = catalog();
        let view = project_view(&cat, &CheckedStates::new(), &prefs(false, "  TREE "));
        assert_eq!(labels(&view), vec!["Tree Sentinel"]);
    }

    #[test]
    fn query_matches_nested_boss_name() {
        let cat = catalog();
        let view = project_view(&cat, &CheckedStates::new(), &prefs(false, "graf"));
        assert_eq!(
            labels(&view),
            vec!["Stormveil Castle", "Chapel of Anticipation"]
        );
    }

    #[test]
    fn marg_matches_location_via_boss() {
        let raw = parse_catalog(
            r#"
[[locations]]
label = "Stormveil"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Margit"
"#,
        )
        .unwrap();
        let cat = load_catalog(&raw.bosses, &raw.locations);
        let view = project_view(&cat, &CheckedStates::new(), &prefs(false, "marg"));
        assert_eq!(labels(&view), vec!["Stormveil"]);
    }

    #[test]
    fn hide_completed_drops_complete_pins() {
        let cat = catalog();
        let mut states = CheckedStates::new();
        states.insert_item("Tree Sentinel", true);
        // optional boss unchecked, still complete
        states.insert_item("Chapel of Anticipation", true);
        // self flag set but required boss missing, stays visible
        states.insert_item("Stormveil Castle", true);

        let view = project_view(&cat, &states, &prefs(true, ""));
        assert_eq!(
            labels(&view),
            vec![
                "Margit, the Fell Omen",
                "Stormveil Castle",
                "Murkwater Cave",
            ]
        );
    }

    #[test]
    fn hide_and_query_combine() {
        let cat = catalog();
        let mut states = CheckedStates::new();
        states.insert_item("Chapel of Anticipation", true);
        let view = project_view(&cat, &states, &prefs(true, "graf"));
        assert_eq!(labels(&view), vec!["Stormveil Castle"]);
    }

    #[test]
    fn completed_pins_shown_when_not_hiding() {
        let cat = catalog();
        let mut states = CheckedStates::new();
        states.insert_item("Tree Sentinel", true);
        let view = project_view(&cat, &states, &prefs(false, "tree"));
        assert_eq!(labels(&view), vec!["Tree Sentinel"]);
    }
}
