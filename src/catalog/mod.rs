use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::pin::{BossEntry, BossPin, LocationPin, Pin, PinInfo};

/// Catalog compiled into the binary
const BUILTIN_CATALOG: &str = include_str!("pins.toml");

/// Error type for reading an alternate catalog file
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("could not read catalog {path}: {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not parse catalog: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A boss definition as it appears in the raw catalog
#[derive(Debug, Clone, Deserialize)]
pub struct RawBoss {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub info: Option<String>,
    pub wiki: Option<String>,
    pub notes: Option<String>,
    pub difficulty: Option<String>,
}

/// A boss nested under a location in the raw catalog
#[derive(Debug, Clone, Deserialize)]
pub struct RawBossEntry {
    pub name: String,
    #[serde(default)]
    pub optional: bool,
    pub wiki: Option<String>,
    pub notes: Option<String>,
    pub difficulty: Option<String>,
}

/// A location definition as it appears in the raw catalog
#[derive(Debug, Clone, Deserialize)]
pub struct RawLocation {
    pub label: String,
    pub x: f64,
    pub y: f64,
    pub info: Option<String>,
    pub wiki: Option<String>,
    pub notes: Option<String>,
    pub difficulty: Option<String>,
    #[serde(default)]
    pub bosses: Vec<RawBossEntry>,
}

/// The two raw sequences a catalog is built from
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawCatalog {
    #[serde(default)]
    pub bosses: Vec<RawBoss>,
    #[serde(default)]
    pub locations: Vec<RawLocation>,
}

/// Normalize raw definitions into the pin catalog: all boss pins first,
/// then all location pins, each in source order.
pub fn load_catalog(bosses: &[RawBoss], locations: &[RawLocation]) -> Vec<Pin> {
    let boss_pins = bosses.iter().map(|b| {
        Pin::Boss(BossPin {
            info: PinInfo {
                label: b.label.clone(),
                x: b.x,
                y: b.y,
                info: b.info.clone(),
                wiki: b.wiki.clone(),
                notes: b.notes.clone(),
                difficulty: b.difficulty.clone(),
            },
        })
    });

    let location_pins = locations.iter().map(|loc| {
        Pin::Location(LocationPin {
            info: PinInfo {
                label: loc.label.clone(),
                x: loc.x,
                y: loc.y,
                info: loc.info.clone(),
                wiki: loc.wiki.clone(),
                notes: loc.notes.clone(),
                difficulty: loc.difficulty.clone(),
            },
            bosses: loc
                .bosses
                .iter()
                .map(|b| BossEntry {
                    name: b.name.clone(),
                    optional: b.optional,
                    wiki: b.wiki.clone(),
                    notes: b.notes.clone(),
                    difficulty: b.difficulty.clone(),
                })
                .collect(),
        })
    });

    boss_pins.chain(location_pins).collect()
}

/// Parse catalog TOML into its raw sequences.
pub fn parse_catalog(text: &str) -> Result<RawCatalog, CatalogError> {
    Ok(toml::from_str(text)?)
}

/// The built-in catalog.
pub fn builtin_catalog() -> Vec<Pin> {
    // The embedded file is checked by the tests below; a parse failure here
    // is a build defect, not a runtime condition.
    let raw = parse_catalog(BUILTIN_CATALOG).unwrap_or_else(|e| panic!("built-in catalog: {e}"));
    load_catalog(&raw.bosses, &raw.locations)
}

/// Load an alternate catalog from a TOML file.
pub fn read_catalog_file(path: &Path) -> Result<Vec<Pin>, CatalogError> {
    let text = fs::read_to_string(path).map_err(|e| CatalogError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;
    let raw = parse_catalog(&text)?;
    Ok(load_catalog(&raw.bosses, &raw.locations))
}

/// Built-in catalog unless a path is given.
pub fn resolve_catalog(path: Option<&Path>) -> Result<Vec<Pin>, CatalogError> {
    match path {
        Some(p) => read_catalog_file(p),
        None => Ok(builtin_catalog()),
    }
}
