use std::collections::HashSet;

use indexmap::IndexMap;
use serde::Serialize;

use crate::model::pin::{DifficultyTier, Pin, PinKind};

/// Structured result from `pt check`, suitable for --json output.
#[derive(Debug, Default, Serialize)]
pub struct CheckResult {
    pub valid: bool,
    pub errors: Vec<CheckError>,
    pub warnings: Vec<CheckWarning>,
}

/// A catalog defect that corrupts tracked state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckError {
    /// Two pins share a label, so they share one state entry
    #[serde(rename = "duplicate_label")]
    DuplicateLabel { label: String, kinds: Vec<PinKind> },
    /// A location lists the same boss name twice
    #[serde(rename = "duplicate_boss")]
    DuplicateBoss { location: String, boss: String },
}

/// A non-critical catalog issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CheckWarning {
    /// Difficulty text that falls in no known tier
    #[serde(rename = "unknown_difficulty")]
    UnknownDifficulty { item: String, difficulty: String },
}

/// Validate a catalog. Read-only.
///
/// Labels share one flat state namespace, so a boss pin and a location pin
/// with the same label collide just like two pins of the same kind.
pub fn check_catalog(catalog: &[Pin]) -> CheckResult {
    let mut result = CheckResult::default();

    let mut by_label: IndexMap<&str, Vec<PinKind>> = IndexMap::new();
    for pin in catalog {
        by_label.entry(pin.label()).or_default().push(pin.kind());
    }
    for (label, kinds) in by_label {
        if kinds.len() > 1 {
            result.errors.push(CheckError::DuplicateLabel {
                label: label.to_string(),
                kinds,
            });
        }
    }

    for pin in catalog {
        check_difficulty(pin.label(), pin.info().difficulty.as_deref(), &mut result);

        let mut seen = HashSet::new();
        for boss in pin.bosses() {
            if !seen.insert(boss.name.as_str()) {
                result.errors.push(CheckError::DuplicateBoss {
                    location: pin.label().to_string(),
                    boss: boss.name.clone(),
                });
            }
            let item = format!("{} / {}", pin.label(), boss.name);
            check_difficulty(&item, boss.difficulty.as_deref(), &mut result);
        }
    }

    result.valid = result.errors.is_empty();
    result
}

fn check_difficulty(item: &str, difficulty: Option<&str>, result: &mut CheckResult) {
    if let Some(text) = difficulty
        && DifficultyTier::classify(Some(text)) == DifficultyTier::Other
    {
        result.warnings.push(CheckWarning::UnknownDifficulty {
            item: item.to_string(),
            difficulty: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{load_catalog, parse_catalog};

    fn catalog(src: &str) -> Vec<Pin> {
        let raw = parse_catalog(src).unwrap();
        load_catalog(&raw.bosses, &raw.locations)
    }

    #[test]
    fn clean_catalog_is_valid() {
        let result = check_catalog(&catalog(
            r#"
[[bosses]]
label = "Margit"
x = 0.0
y = 0.0
difficulty = "Hard"

[[locations]]
label = "Stormveil"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Godrick"
difficulty = "very hard"
"#,
        ));
        assert!(result.valid);
        assert!(result.errors.is_empty());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn duplicate_label_across_kinds() {
        let result = check_catalog(&catalog(
            r#"
[[bosses]]
label = "Stormveil"
x = 0.0
y = 0.0

[[locations]]
label = "Stormveil"
x = 0.0
y = 0.0
"#,
        ));
        assert!(!result.valid);
        assert_eq!(
            result.errors,
            vec![CheckError::DuplicateLabel {
                label: "Stormveil".into(),
                kinds: vec![PinKind::Boss, PinKind::Location],
            }]
        );
    }

    #[test]
    fn duplicate_boss_within_location() {
        let result = check_catalog(&catalog(
            r#"
[[locations]]
label = "Stormveil"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Godrick"

[[locations.bosses]]
name = "Godrick"
"#,
        ));
        assert!(!result.valid);
        assert!(matches!(
            &result.errors[0],
            CheckError::DuplicateBoss { boss, .. } if boss == "Godrick"
        ));
    }

    #[test]
    fn same_boss_name_in_two_locations_is_fine() {
        let result = check_catalog(&catalog(
            r#"
[[locations]]
label = "A"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Night's Cavalry"

[[locations]]
label = "B"
x = 0.0
y = 0.0

[[locations.bosses]]
name = "Night's Cavalry"
"#,
        ));
        assert!(result.valid);
    }

    #[test]
    fn unknown_difficulty_warns() {
        let result = check_catalog(&catalog(
            r#"
[[locations]]
label = "Stormveil"
x = 0.0
y = 0.0
difficulty = "trivial"

[[locations.bosses]]
name = "Godrick"
difficulty = "spicy"
"#,
        ));
        assert!(result.valid);
        assert_eq!(
            result.warnings,
            vec![
                CheckWarning::UnknownDifficulty {
                    item: "Stormveil".into(),
                    difficulty: "trivial".into(),
                },
                CheckWarning::UnknownDifficulty {
                    item: "Stormveil / Godrick".into(),
                    difficulty: "spicy".into(),
                },
            ]
        );
    }
}
