use std::error::Error;
use std::fs;
use std::path::Path;

use crate::catalog;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::slot::FileSlot;
use crate::io::store::StateStore;
use crate::model::config::TrackerConfig;
use crate::model::pin::Pin;
use crate::ops::{check, mutation, stats, transfer, view};

type CmdResult = Result<(), Box<dyn Error>>;

/// Everything a command needs: the catalog and the open store
struct Session {
    catalog: Vec<Pin>,
    store: StateStore,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config = config_io::read_config()?;
    init_logging(&config.log_level);

    let mut session = open_session(&cli, &config)?;

    match cli.command {
        Commands::List(args) => cmd_list(&mut session, args),
        Commands::Show(args) => cmd_show(&session, args),
        Commands::Toggle(args) => cmd_toggle(&mut session, args),
        Commands::Location(args) => cmd_location(&mut session, args),
        Commands::Boss(args) => cmd_boss(&mut session, args),
        Commands::Cascade(args) => cmd_cascade(&mut session, args),
        Commands::Hide(args) => cmd_hide(&mut session, args),
        Commands::Export(args) => cmd_export(&session, args),
        Commands::Import(args) => cmd_import(&mut session, args),
        Commands::Check => cmd_check(&session),
        Commands::Stats => cmd_stats(&session),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Install the stderr log subscriber. Unknown levels fall back to warn.
fn init_logging(level: &str) {
    let level = level.parse().unwrap_or(tracing::Level::WARN);
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init();
}

fn open_session(cli: &Cli, config: &TrackerConfig) -> Result<Session, Box<dyn Error>> {
    let catalog_path = cli.catalog.as_deref().or(config.catalog.path.as_deref());
    let catalog = catalog::resolve_catalog(catalog_path)?;

    let data_dir = config_io::resolve_data_dir(config, cli.data_dir.as_deref());
    let slot = FileSlot::new(&data_dir, &config.storage.key);
    tracing::debug!(path = %slot.path().display(), "opening tracker state");

    Ok(Session {
        catalog,
        store: StateStore::open(slot),
        json: cli.json,
    })
}

fn find_pin<'a>(catalog: &'a [Pin], label: &str) -> Result<&'a Pin, String> {
    catalog
        .iter()
        .find(|p| p.label() == label)
        .ok_or_else(|| format!("no pin labeled '{}'", label))
}

fn find_location<'a>(catalog: &'a [Pin], label: &str) -> Result<&'a Pin, String> {
    let pin = find_pin(catalog, label)?;
    match pin {
        Pin::Location(_) => Ok(pin),
        Pin::Boss(_) => Err(format!("'{}' is a boss, not a location", label)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

fn print_item_state(session: &Session, name: &str, boss: Option<&str>, new_state: bool) -> CmdResult {
    if session.json {
        return print_json(&ItemStateJson {
            name: name.to_string(),
            boss: boss.map(str::to_string),
            new_state,
        });
    }
    let state = if new_state { "checked" } else { "unchecked" };
    match boss {
        Some(b) => println!("{} / {} {}", name, b, state),
        None => println!("{} {}", name, state),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(session: &mut Session, args: ListArgs) -> CmdResult {
    if let Some(q) = &args.query {
        mutation::set_search_query(&mut session.store, q);
    }
    let mut prefs = session.store.view_preferences();
    if args.all {
        prefs.hide_completed_items = false;
    }

    let states = session.store.checked_states();
    let pins = view::project_view(&session.catalog, states, &prefs);

    if session.json {
        let out: Vec<PinJson> = pins.iter().map(|p| pin_to_json(p, states)).collect();
        return print_json(&out);
    }
    print_lines(&format_pin_list(&pins, states));
    Ok(())
}

fn cmd_show(session: &Session, args: ShowArgs) -> CmdResult {
    let pin = find_pin(&session.catalog, &args.label)?;
    let states = session.store.checked_states();
    if session.json {
        return print_json(&pin_to_json(pin, states));
    }
    print_lines(&format_pin_detail(pin, states));
    Ok(())
}

fn cmd_check(session: &Session) -> CmdResult {
    let result = check::check_catalog(&session.catalog);
    if session.json {
        print_json(&result)?;
    } else {
        print_lines(&format_check(&result));
    }
    if !result.valid {
        return Err("catalog has errors".into());
    }
    Ok(())
}

fn cmd_stats(session: &Session) -> CmdResult {
    let result = stats::completion_stats(&session.catalog, session.store.checked_states());
    if session.json {
        return print_json(&result);
    }
    print_lines(&format_stats(&result));
    Ok(())
}

fn cmd_export(session: &Session, args: ExportArgs) -> CmdResult {
    let payload = transfer::export_payload(&session.store)?;
    let Some(output) = args.output else {
        println!("{}", payload);
        return Ok(());
    };
    let path = if output.is_dir() {
        output.join(transfer::export_file_name())
    } else {
        output
    };
    fs::write(&path, payload)?;
    eprintln!("exported to {}", path.display());
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_toggle(session: &mut Session, args: ToggleArgs) -> CmdResult {
    find_pin(&session.catalog, &args.name)?;
    let new_state = mutation::toggle_item(&mut session.store, &args.name);
    print_item_state(session, &args.name, None, new_state)
}

fn cmd_location(session: &mut Session, args: LocationArgs) -> CmdResult {
    find_location(&session.catalog, &args.name)?;
    let new_state = mutation::toggle_location_self(&mut session.store, &args.name);
    print_item_state(session, &args.name, None, new_state)
}

fn cmd_boss(session: &mut Session, args: BossArgs) -> CmdResult {
    let location = find_location(&session.catalog, &args.location)?;
    if !location.bosses().iter().any(|b| b.name == args.boss) {
        return Err(format!("'{}' has no boss named '{}'", args.location, args.boss).into());
    }
    let new_state =
        mutation::toggle_boss_under_location(&mut session.store, &args.location, &args.boss);
    print_item_state(session, &args.location, Some(&args.boss), new_state)
}

fn cmd_cascade(session: &mut Session, args: CascadeArgs) -> CmdResult {
    let pin = find_pin(&session.catalog, &args.label)?;
    let outcome = mutation::cascade_toggle(&mut session.store, pin);
    if session.json {
        return print_json(&outcome);
    }
    println!("{}", format_outcome(&outcome));
    Ok(())
}

fn cmd_hide(session: &mut Session, args: HideArgs) -> CmdResult {
    let hide = matches!(args.value, Switch::On);
    mutation::set_hide_completed(&mut session.store, hide);
    if session.json {
        return print_json(&serde_json::json!({ "hideCompletedItems": hide }));
    }
    println!("completed pins {}", if hide { "hidden" } else { "shown" });
    Ok(())
}

fn cmd_import(session: &mut Session, args: ImportArgs) -> CmdResult {
    let text = read_import_file(&args.file)?;
    let data = transfer::import_payload(&mut session.store, &text)?;
    let count = data.checked_states.len();
    if session.json {
        return print_json(&serde_json::json!({ "imported": count }));
    }
    println!("imported {} items from {}", count, args.file.display());
    Ok(())
}

fn read_import_file(path: &Path) -> Result<String, Box<dyn Error>> {
    fs::read_to_string(path)
        .map_err(|e| format!("could not read {}: {}", path.display(), e).into())
}
