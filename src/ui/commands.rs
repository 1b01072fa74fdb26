use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::LazyLock;

use smeta::files::{self, Format};
use smeta::ledger::{format_percentage, Ledger, LedgerError};
use smeta::models::{find_region, REGIONS};

use super::app::{App, InputMode, Pane, PendingAction, Screen};
use super::util::{expand_home, format_amount, parse_amount, split_item_args};

pub(crate) struct Command {
    pub(crate) description: &'static str,
    pub(crate) run: fn(&str, &mut App, &mut Ledger) -> anyhow::Result<()>,
}

macro_rules! register_command {
    ($name:expr, $desc:expr, $func:expr, $registry:expr) => {{
        $registry.insert(
            $name,
            Command {
                description: $desc,
                run: $func,
            },
        );
    }};
}

pub(crate) static COMMANDS: LazyLock<HashMap<&str, Command>> = LazyLock::new(|| {
    let mut r: HashMap<&str, Command> = HashMap::new();

    register_command!("q", "Quit Smeta", cmd_quit, r);
    register_command!("quit", "Quit Smeta", cmd_quit, r);
    register_command!("p", "Go to Planning", cmd_planning, r);
    register_command!("planning", "Go to Planning", cmd_planning, r);
    register_command!("m", "Go to Manage", cmd_manage, r);
    register_command!("manage", "Go to Manage", cmd_manage, r);
    register_command!("f", "Go to Files", cmd_files, r);
    register_command!("files", "Go to Files", cmd_files, r);
    register_command!("help", "Show available commands", cmd_help, r);
    register_command!("h", "Show available commands", cmd_help, r);
    register_command!(
        "region",
        "Select region (e.g. :region Quba)",
        cmd_region,
        r
    );
    register_command!("r", "Select region (e.g. :r Quba)", cmd_region, r);
    register_command!(
        "total",
        "Set total budget of the region (e.g. :total 10000)",
        cmd_total,
        r
    );
    register_command!("t", "Set total budget (e.g. :t 10000)", cmd_total, r);
    register_command!(
        "add",
        "Add item (e.g. :add 01 Road repairs 2500)",
        cmd_add,
        r
    );
    register_command!("a", "Add item (e.g. :a 01 Roads 2500)", cmd_add, r);
    register_command!(
        "edit",
        "Edit selected item (e.g. :edit 01 Roads 3000)",
        cmd_edit,
        r
    );
    register_command!("e", "Edit selected item", cmd_edit, r);
    register_command!(
        "delete-item",
        "Delete selected item",
        cmd_delete_item,
        r
    );
    register_command!(
        "delete-region",
        "Delete the region and all its items",
        cmd_delete_region,
        r
    );
    register_command!("clear-all", "Delete every region", cmd_clear_all, r);
    register_command!(
        "summary",
        "Show the region's totals in the status bar",
        cmd_summary,
        r
    );
    register_command!(
        "export",
        "Export all regions to xlsx (e.g. :export ~/smeta.xlsx)",
        cmd_export,
        r
    );
    register_command!(
        "export-json",
        "Export all regions to JSON",
        cmd_export_json,
        r
    );
    register_command!(
        "export-csv",
        "Export one CSV per region into a directory",
        cmd_export_csv,
        r
    );
    register_command!(
        "import",
        "Import xlsx/json/csv (e.g. :import ~/smeta.xlsx)",
        cmd_import,
        r
    );
    register_command!("i", "Import xlsx/json/csv", cmd_import, r);

    r
});

pub(crate) fn handle_command(input: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let trimmed = input.trim();
    let mut parts = trimmed.splitn(2, ' ');
    let cmd_name = parts.next().unwrap_or("");
    let args = parts.next().unwrap_or("").trim();

    if cmd_name.is_empty() {
        return Ok(());
    }

    if let Some(cmd) = COMMANDS.get(cmd_name) {
        (cmd.run)(args, app, ledger)?;
    } else {
        let suggestion = find_closest(cmd_name);
        app.set_status(format!(
            "Unknown command: :{cmd_name}. Did you mean :{suggestion}?"
        ));
    }

    Ok(())
}

fn find_closest(input: &str) -> String {
    COMMANDS
        .keys()
        .filter(|k| k.len() > 1)
        .min_by_key(|k| levenshtein(input, k))
        .unwrap_or(&"help")
        .to_string()
}

fn levenshtein(a: &str, b: &str) -> usize {
    let (a, b) = (a.as_bytes(), b.as_bytes());
    let mut prev: Vec<usize> = (0..=b.len()).collect();
    let mut curr = vec![0; b.len() + 1];

    for i in 1..=a.len() {
        curr[0] = i;
        for j in 1..=b.len() {
            let cost = if a[i - 1] == b[j - 1] { 0 } else { 1 };
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

/// Status-bar wording for a rejected ledger operation.
pub(crate) fn describe_error(err: &LedgerError, currency: &str) -> String {
    match err {
        LedgerError::BudgetExceeded { attempted, ceiling } => format!(
            "Over budget: items would total {} but the budget is {}",
            format_amount(*attempted, currency),
            format_amount(*ceiling, currency)
        ),
        other => other.to_string(),
    }
}

fn active_region(app: &mut App) -> Option<String> {
    let region = app.region.clone();
    if region.is_none() {
        app.set_status("No region selected. Use :region <name>");
    }
    region
}

// ── Command implementations ──────────────────────────────────

fn cmd_quit(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.running = false;
    Ok(())
}

fn cmd_planning(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Planning;
    Ok(())
}

fn cmd_manage(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Manage;
    app.pane = Pane::Regions;
    app.sync_record_selection(ledger);
    Ok(())
}

fn cmd_files(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.screen = Screen::Files;
    app.refresh_file_browser();
    Ok(())
}

fn cmd_help(_args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    app.show_help = true;
    Ok(())
}

fn cmd_region(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.set_status("Usage: :region <name>");
        return Ok(());
    }

    // Catalogue names win; any other name is taken as typed.
    let name = find_region(args).map_or_else(|| args.to_string(), str::to_string);
    app.search_input.clear();
    if let Some(pos) = REGIONS.iter().position(|r| *r == name) {
        app.picker_index = pos;
        app.picker_scroll = pos.saturating_sub(app.page() / 2);
    }
    if let Some(pos) = ledger.regions().position(|r| r == name) {
        app.record_index = pos;
    }
    let has_record = ledger.contains(&name);
    app.select_region(name.clone());
    app.set_status(if has_record {
        format!("Region: {name}")
    } else {
        format!("Region: {name} (no budget yet, set one with :total <amount>)")
    });
    Ok(())
}

fn cmd_total(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(region) = active_region(app) else {
        return Ok(());
    };
    let Some(amount) = parse_amount(args) else {
        app.set_status("Usage: :total <amount>");
        return Ok(());
    };

    match ledger.set_total_budget(&region, amount) {
        Ok(()) => {
            let over = ledger.record(&region).is_some_and(|r| r.is_over_budget());
            let msg = format!(
                "Budget for {region} set to {}",
                format_amount(amount, &app.currency)
            );
            app.set_status(if over {
                format!("{msg}; items now exceed it")
            } else {
                msg
            });
        }
        Err(e) => app.set_status(describe_error(&e, &app.currency)),
    }
    Ok(())
}

fn cmd_add(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(region) = active_region(app) else {
        return Ok(());
    };
    let (number, name, amount) = match split_item_args(args) {
        Ok(parts) => parts,
        Err(e) => {
            app.set_status(format!("Usage: :add <number> <name> <amount> ({e})"));
            return Ok(());
        }
    };

    match ledger.add_item(&region, &number, &name, amount) {
        Ok(index) => {
            app.item_index = index;
            app.set_status(format!(
                "Added {number} {name}: {}",
                format_amount(amount, &app.currency)
            ));
        }
        Err(e) => app.set_status(describe_error(&e, &app.currency)),
    }
    Ok(())
}

fn cmd_edit(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(region) = active_region(app) else {
        return Ok(());
    };
    let Some(item) = ledger
        .record(&region)
        .and_then(|r| r.items().get(app.item_index))
    else {
        app.set_status("Select an item first");
        return Ok(());
    };

    if args.is_empty() {
        // Enter editing mode with the current values
        app.command_input = format!("{} {} {}", item.number, item.name, item.amount.normalize());
        app.input_mode = InputMode::Editing;
        app.set_status("Edit <number> <name> <amount>, Enter to save");
        return Ok(());
    }

    let (number, name, amount) = match split_item_args(args) {
        Ok(parts) => parts,
        Err(e) => {
            app.set_status(format!("Usage: :edit <number> <name> <amount> ({e})"));
            return Ok(());
        }
    };

    match ledger.update_item(&region, app.item_index, &number, &name, amount) {
        Ok(()) => app.set_status(format!("Updated item {number}")),
        Err(e) => app.set_status(describe_error(&e, &app.currency)),
    }
    Ok(())
}

fn cmd_delete_item(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(region) = active_region(app) else {
        return Ok(());
    };
    let Some(item) = ledger
        .record(&region)
        .and_then(|r| r.items().get(app.item_index))
    else {
        app.set_status("No item to delete");
        return Ok(());
    };

    let message = format!("Delete item {} '{}' from {region}?", item.number, item.name);
    let index = app.item_index;
    app.confirm(message, PendingAction::DeleteItem { region, index });
    Ok(())
}

fn cmd_delete_region(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let region = if args.is_empty() {
        match active_region(app) {
            Some(r) => r,
            None => return Ok(()),
        }
    } else {
        args.to_string()
    };

    let Some(record) = ledger.record(&region) else {
        app.set_status(format!("No budget recorded for {region}"));
        return Ok(());
    };
    let count = record.items().len();
    app.confirm(
        format!(
            "Delete {region} and its {count} item{}?",
            if count == 1 { "" } else { "s" }
        ),
        PendingAction::DeleteRegion { region },
    );
    Ok(())
}

fn cmd_clear_all(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    if ledger.is_empty() {
        app.set_status("Nothing to clear");
        return Ok(());
    }
    app.confirm(
        format!("Delete all {} regions?", ledger.len()),
        PendingAction::ClearAll,
    );
    Ok(())
}

fn cmd_summary(_args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    let Some(region) = active_region(app) else {
        return Ok(());
    };
    match ledger.summary(&region) {
        Ok(s) => {
            let cur = app.currency.clone();
            app.set_status(format!(
                "{region}: total {} | used {} ({}) | remaining {}",
                format_amount(s.total_budget, &cur),
                format_amount(s.used_amount, &cur),
                format_percentage(s.used_percentage),
                format_amount(s.remaining_amount, &cur),
            ));
        }
        Err(e) => app.set_status(describe_error(&e, &app.currency)),
    }
    Ok(())
}

fn cmd_export(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    run_export(args, Format::Xlsx, app, ledger);
    Ok(())
}

fn cmd_export_json(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    run_export(args, Format::Json, app, ledger);
    Ok(())
}

fn cmd_export_csv(args: &str, app: &mut App, ledger: &mut Ledger) -> anyhow::Result<()> {
    run_export(args, Format::CsvDir, app, ledger);
    Ok(())
}

fn run_export(args: &str, default_format: Format, app: &mut App, ledger: &Ledger) {
    let (path, format) = if args.is_empty() {
        (
            app.export_dir.join(files::timestamped_name(default_format)),
            default_format,
        )
    } else {
        let path = expand_home(args);
        match files::Format::detect(&path) {
            Ok(detected) => (path, detected),
            Err(e) => {
                app.set_status(format!("Export failed: {e:#}"));
                return;
            }
        }
    };

    match files::export(ledger, &path, format, app.io_timeout) {
        Ok(written) => {
            app.set_status(format!(
                "Exported {} region{} to {}",
                ledger.len(),
                if ledger.len() == 1 { "" } else { "s" },
                path.display()
            ));
            app.last_export = written;
        }
        Err(e) => app.set_status(format!("Export failed: {e:#}")),
    }
}

fn cmd_import(args: &str, app: &mut App, _ledger: &mut Ledger) -> anyhow::Result<()> {
    if args.is_empty() {
        app.screen = Screen::Files;
        app.refresh_file_browser();
        app.set_status("Pick a file to import");
        return Ok(());
    }

    let path = expand_home(args);
    if !path.exists() {
        app.set_status(format!("File not found: {}", path.display()));
        return Ok(());
    }
    request_import(app, path);
    Ok(())
}

/// Ask for confirmation before importing `path` over the current ledger.
pub(crate) fn request_import(app: &mut App, path: PathBuf) {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());
    app.confirm(
        format!("Import {name}? Regions with the same name are replaced"),
        PendingAction::Import { path },
    );
}

/// Carry out a confirmed action.
pub(crate) fn run_pending(action: PendingAction, app: &mut App, ledger: &mut Ledger) {
    match action {
        PendingAction::DeleteItem { region, index } => {
            match ledger.delete_item(&region, index) {
                Ok(item) => app.set_status(format!("Deleted item {} '{}'", item.number, item.name)),
                Err(e) => app.set_status(describe_error(&e, &app.currency)),
            }
        }
        PendingAction::DeleteRegion { region } => match ledger.delete_region(&region) {
            Ok(_) => app.set_status(format!("Deleted {region}")),
            Err(e) => app.set_status(describe_error(&e, &app.currency)),
        },
        PendingAction::ClearAll => {
            let count = ledger.clear_all();
            app.set_status(format!(
                "Cleared {count} region{}",
                if count == 1 { "" } else { "s" }
            ));
        }
        PendingAction::Import { path } => match files::import(ledger, &path, app.io_timeout) {
            Ok(report) => {
                app.set_status(report.describe());
                if let Some(first) = report.imported.first() {
                    app.select_region(first.clone());
                }
                app.last_report = Some(report);
            }
            Err(e) => app.set_status(format!("Import failed: {e:#}")),
        },
    }
    app.clamp_cursors(ledger);
}
