use serde::{Deserialize, Serialize};

/// Which kind of catalog entry a pin is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PinKind {
    Boss,
    Location,
}

impl PinKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PinKind::Boss => "boss",
            PinKind::Location => "location",
        }
    }
}

/// A boss listed under a location
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossEntry {
    pub name: String,
    /// Optional bosses never block a location from counting as complete
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

/// Fields shared by every pin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinInfo {
    /// Unique label; doubles as the key into the checked-state map
    pub label: String,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wiki: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BossPin {
    #[serde(flatten)]
    pub info: PinInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationPin {
    #[serde(flatten)]
    pub info: PinInfo,
    /// Nested bosses, in catalog order
    pub bosses: Vec<BossEntry>,
}

/// A catalog entry. Immutable once the catalog is loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Pin {
    Boss(BossPin),
    Location(LocationPin),
}

impl Pin {
    pub fn kind(&self) -> PinKind {
        match self {
            Pin::Boss(_) => PinKind::Boss,
            Pin::Location(_) => PinKind::Location,
        }
    }

    pub fn info(&self) -> &PinInfo {
        match self {
            Pin::Boss(b) => &b.info,
            Pin::Location(l) => &l.info,
        }
    }

    pub fn label(&self) -> &str {
        &self.info().label
    }

    /// Nested bosses; empty for boss pins
    pub fn bosses(&self) -> &[BossEntry] {
        match self {
            Pin::Boss(_) => &[],
            Pin::Location(l) => &l.bosses,
        }
    }
}

/// Difficulty bucket derived from the free-form difficulty string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DifficultyTier {
    ExtremelyHard,
    VeryHard,
    Hard,
    Medium,
    /// A difficulty string that matches no known tier
    Other,
    /// No difficulty recorded
    Unrated,
}

/// Checked in order; "very hard" must be tested before "hard".
const TIER_KEYS: &[(&str, DifficultyTier)] = &[
    ("extremely hard", DifficultyTier::ExtremelyHard),
    ("very hard", DifficultyTier::VeryHard),
    ("hard", DifficultyTier::Hard),
    ("medium", DifficultyTier::Medium),
];

impl DifficultyTier {
    pub fn classify(difficulty: Option<&str>) -> DifficultyTier {
        let Some(text) = difficulty else {
            return DifficultyTier::Unrated;
        };
        let lower = text.to_lowercase();
        TIER_KEYS
            .iter()
            .find(|(key, _)| lower.contains(key))
            .map(|(_, tier)| *tier)
            .unwrap_or(DifficultyTier::Other)
    }

    pub fn label(self) -> &'static str {
        match self {
            DifficultyTier::ExtremelyHard => "extremely hard",
            DifficultyTier::VeryHard => "very hard",
            DifficultyTier::Hard => "hard",
            DifficultyTier::Medium => "medium",
            DifficultyTier::Other => "other",
            DifficultyTier::Unrated => "unrated",
        }
    }
}
