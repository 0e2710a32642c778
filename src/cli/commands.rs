use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "pt", about = concat!("pintrack v", env!("CARGO_PKG_VERSION"), " - track what you have cleared on the map"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Directory holding saved progress (overrides config)
    #[arg(short = 'D', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,

    /// Pin catalog TOML to use instead of the built-in one
    #[arg(long, global = true)]
    pub catalog: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List pins, filtered by search and the hide-completed setting
    List(ListArgs),
    /// Show one pin and the state of its bosses
    Show(ShowArgs),
    /// Toggle an item's plain checked flag
    Toggle(ToggleArgs),
    /// Toggle a location's own flag
    Location(LocationArgs),
    /// Toggle one boss under a location
    Boss(BossArgs),
    /// Toggle a pin together with every boss under it
    Cascade(CascadeArgs),
    /// Hide or show completed pins in listings
    Hide(HideArgs),
    /// Print (or write) saved progress as JSON
    Export(ExportArgs),
    /// Replace saved progress with an exported file
    Import(ImportArgs),
    /// Validate the pin catalog
    Check,
    /// Show completion counts
    Stats,
}

#[derive(Args)]
pub struct ListArgs {
    /// Search text (3+ characters; matches labels and nested boss names)
    pub query: Option<String>,
    /// Include completed pins even when hiding is on
    #[arg(long)]
    pub all: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Pin label
    pub label: String,
}

#[derive(Args)]
pub struct ToggleArgs {
    /// Item name (boss label, or a location with no boss progress)
    pub name: String,
}

#[derive(Args)]
pub struct LocationArgs {
    /// Location label
    pub name: String,
}

#[derive(Args)]
pub struct BossArgs {
    /// Location label
    pub location: String,
    /// Boss name under that location
    pub boss: String,
}

#[derive(Args)]
pub struct CascadeArgs {
    /// Pin label
    pub label: String,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum Switch {
    On,
    Off,
}

#[derive(Args)]
pub struct HideArgs {
    /// on or off
    pub value: Switch,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Write to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// File produced by `pt export`
    pub file: PathBuf,
}
