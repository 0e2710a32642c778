use serde::Serialize;
use unicode_width::UnicodeWidthStr;

use crate::model::pin::{DifficultyTier, Pin, PinKind};
use crate::model::state::CheckedStates;
use crate::ops::check::{CheckError, CheckResult, CheckWarning};
use crate::ops::completion::{
    is_boss_under_location_complete, is_location_self_complete, is_pin_complete,
};
use crate::ops::mutation::ToggleOutcome;
use crate::ops::stats::{CompletionStats, Tally};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct PinJson {
    #[serde(rename = "type")]
    pub kind: PinKind,
    pub label: String,
    pub complete: bool,
    /// Own flag; only meaningful for locations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked: Option<bool>,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    pub tier: DifficultyTier,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bosses: Vec<BossJson>,
}

#[derive(Serialize)]
pub struct BossJson {
    pub name: String,
    pub optional: bool,
    pub complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wiki: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize)]
pub struct ItemStateJson {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub boss: Option<String>,
    pub new_state: bool,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn pin_to_json(pin: &Pin, states: &CheckedStates) -> PinJson {
    let info = pin.info();
    let checked = match pin.kind() {
        PinKind::Location => Some(is_location_self_complete(states, &info.label)),
        PinKind::Boss => None,
    };
    PinJson {
        kind: pin.kind(),
        label: info.label.clone(),
        complete: is_pin_complete(states, pin),
        checked,
        x: info.x,
        y: info.y,
        info: info.info.clone(),
        wiki: info.wiki.clone(),
        notes: info.notes.clone(),
        difficulty: info.difficulty.clone(),
        tier: DifficultyTier::classify(info.difficulty.as_deref()),
        bosses: pin
            .bosses()
            .iter()
            .map(|b| BossJson {
                name: b.name.clone(),
                optional: b.optional,
                complete: is_boss_under_location_complete(states, &info.label, &b.name),
                difficulty: b.difficulty.clone(),
                wiki: b.wiki.clone(),
                notes: b.notes.clone(),
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

fn mark(done: bool) -> char {
    if done { 'x' } else { ' ' }
}

fn kind_char(kind: PinKind) -> char {
    match kind {
        PinKind::Boss => 'B',
        PinKind::Location => 'L',
    }
}

/// Done count of bosses under a location, e.g. `1/3`
fn boss_progress(pin: &Pin, states: &CheckedStates) -> Option<String> {
    let bosses = pin.bosses();
    if bosses.is_empty() {
        return None;
    }
    let done = bosses
        .iter()
        .filter(|b| is_boss_under_location_complete(states, pin.label(), &b.name))
        .count();
    Some(format!("{}/{}", done, bosses.len()))
}

/// Format a single pin as a one-line summary, label padded to `label_width`
pub fn format_pin_line(pin: &Pin, states: &CheckedStates, label_width: usize) -> String {
    let label = pin.label();
    let mut line = format!(
        "[{}] {} {}",
        mark(is_pin_complete(states, pin)),
        kind_char(pin.kind()),
        label
    );

    let mut extras = Vec::new();
    if let Some(progress) = boss_progress(pin, states) {
        extras.push(progress);
    }
    let tier = DifficultyTier::classify(pin.info().difficulty.as_deref());
    if tier != DifficultyTier::Unrated {
        extras.push(tier.label().to_string());
    }
    if !extras.is_empty() {
        let pad = label_width.saturating_sub(label.width());
        line.push_str(&" ".repeat(pad));
        line.push_str("  ");
        line.push_str(&extras.join("  "));
    }
    line
}

/// Format a list of pins with aligned extras
pub fn format_pin_list(pins: &[&Pin], states: &CheckedStates) -> Vec<String> {
    let width = pins.iter().map(|p| p.label().width()).max().unwrap_or(0);
    pins.iter()
        .map(|p| format_pin_line(p, states, width))
        .collect()
}

/// Format detailed pin view
pub fn format_pin_detail(pin: &Pin, states: &CheckedStates) -> Vec<String> {
    let info = pin.info();
    let mut lines = vec![format!(
        "[{}] {} ({})",
        mark(is_pin_complete(states, pin)),
        info.label,
        pin.kind().as_str()
    )];

    if pin.kind() == PinKind::Location {
        lines.push(format!(
            "cleared: {}",
            if is_location_self_complete(states, &info.label) { "yes" } else { "no" }
        ));
    }
    if let Some(text) = &info.info {
        lines.push(format!("info: {}", text));
    }
    if let Some(d) = &info.difficulty {
        lines.push(format!("difficulty: {}", d));
    }
    if let Some(w) = &info.wiki {
        lines.push(format!("wiki: {}", w));
    }
    if let Some(n) = &info.notes {
        lines.push(format!("notes: {}", n));
    }
    lines.push(format!("position: {}, {}", info.x, info.y));

    if !pin.bosses().is_empty() {
        lines.push(String::new());
        lines.push("bosses:".to_string());
        for boss in pin.bosses() {
            let done = is_boss_under_location_complete(states, &info.label, &boss.name);
            let optional = if boss.optional { " (optional)" } else { "" };
            let difficulty = boss
                .difficulty
                .as_ref()
                .map(|d| format!(" - {}", d))
                .unwrap_or_default();
            lines.push(format!("  [{}] {}{}{}", mark(done), boss.name, optional, difficulty));
        }
    }
    lines
}

pub fn format_outcome(outcome: &ToggleOutcome) -> String {
    format!(
        "{} {} {}",
        outcome.kind.as_str(),
        outcome.name,
        if outcome.new_state { "checked" } else { "unchecked" }
    )
}

fn format_tally(t: Tally) -> String {
    format!("{}/{}", t.done, t.total)
}

pub fn format_stats(stats: &CompletionStats) -> Vec<String> {
    vec![
        format!("bosses:           {}", format_tally(stats.bosses)),
        format!("locations:        {}", format_tally(stats.locations)),
        format!("location bosses:  {}", format_tally(stats.location_bosses)),
    ]
}

pub fn format_check(result: &CheckResult) -> Vec<String> {
    let mut lines = Vec::new();
    for e in &result.errors {
        lines.push(match e {
            CheckError::DuplicateLabel { label, kinds } => format!(
                "error: label \"{}\" used by {} pins ({})",
                label,
                kinds.len(),
                kinds.iter().map(|k| k.as_str()).collect::<Vec<_>>().join(", ")
            ),
            CheckError::DuplicateBoss { location, boss } => {
                format!("error: \"{}\" lists boss \"{}\" twice", location, boss)
            }
        });
    }
    for w in &result.warnings {
        lines.push(match w {
            CheckWarning::UnknownDifficulty { item, difficulty } => {
                format!("warning: {}: unknown difficulty \"{}\"", item, difficulty)
            }
        });
    }
    if result.valid {
        lines.push("catalog ok".to_string());
    }
    lines
}
