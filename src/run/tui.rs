use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing::info;

use smeta::files::Format;
use smeta::ledger::Ledger;
use smeta::models::REGIONS;
use smeta::settings::Settings;

use crate::ui::app::{App, InputMode, Pane, Screen};
use crate::ui::commands;
use crate::ui::util::{scroll_down, scroll_to_bottom, scroll_to_top, scroll_up};

pub(crate) fn as_tui(ledger: &mut Ledger, settings: &Settings) -> Result<()> {
    let mut app = App::new(settings);
    app.refresh_file_browser();

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    info!("session started");
    let result = run_app(&mut terminal, &mut app, ledger);
    info!(regions = ledger.len(), "session ended");

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        eprintln!("Error: {e:?}");
    }

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    ledger: &mut Ledger,
) -> Result<()> {
    while app.running {
        terminal.draw(|f| {
            let content_height = f.area().height.saturating_sub(3) as usize;
            app.visible_rows = content_height.max(1);
            crate::ui::render::render(f, app, ledger);
        })?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if app.show_help {
                app.show_help = false;
                continue;
            }
            match app.input_mode {
                InputMode::Normal => handle_normal_input(key, app, ledger)?,
                InputMode::Command => handle_command_input(key, app, ledger)?,
                InputMode::Search => handle_search_input(key, app),
                InputMode::Editing => handle_editing_input(key, app, ledger)?,
                InputMode::Confirm => handle_confirm_input(key, app, ledger),
            }
            app.clamp_cursors(ledger);
        }
    }
    Ok(())
}

// ── Input handlers ───────────────────────────────────────────

fn handle_normal_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    if app.screen == Screen::Files && app.file_browser_input_focused {
        handle_file_browser_input(key, app);
        return Ok(());
    }

    match key.code {
        KeyCode::Char(':') => {
            app.input_mode = InputMode::Command;
            app.command_input.clear();
        }
        KeyCode::Char('/') if app.screen == Screen::Planning => {
            app.input_mode = InputMode::Search;
            app.pane = Pane::Regions;
            app.search_input.clear();
            app.picker_index = 0;
            app.picker_scroll = 0;
        }
        KeyCode::Char('q') | KeyCode::Char('c')
            if key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.running = false;
        }
        KeyCode::Char('d') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_down(app, ledger);
            }
        }
        KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            for _ in 0..app.visible_rows / 2 {
                handle_move_up(app, ledger);
            }
        }
        KeyCode::Char('j') | KeyCode::Down => handle_move_down(app, ledger),
        KeyCode::Char('k') | KeyCode::Up => handle_move_up(app, ledger),
        KeyCode::Char('h') | KeyCode::Left if app.screen != Screen::Files => {
            app.pane = Pane::Regions;
        }
        KeyCode::Char('l') | KeyCode::Right if app.screen != Screen::Files => {
            if app.active_item_count(ledger) > 0 {
                app.pane = Pane::Items;
            }
        }
        KeyCode::Char('1') => switch_screen(app, ledger, Screen::Planning),
        KeyCode::Char('2') => switch_screen(app, ledger, Screen::Manage),
        KeyCode::Char('3') => switch_screen(app, ledger, Screen::Files),
        KeyCode::Tab if app.screen == Screen::Files => {
            app.file_browser_input_focused = true;
        }
        KeyCode::Tab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let next = (idx + 1) % screens.len();
            switch_screen(app, ledger, screens[next]);
        }
        KeyCode::BackTab => {
            let screens = Screen::all();
            let idx = screens.iter().position(|s| *s == app.screen).unwrap_or(0);
            let prev = if idx == 0 { screens.len() - 1 } else { idx - 1 };
            switch_screen(app, ledger, screens[prev]);
        }
        KeyCode::Enter => handle_enter(app, ledger)?,
        KeyCode::Esc => handle_escape(app),
        KeyCode::Char('g') => handle_goto_top(app, ledger),
        KeyCode::Char('G') => handle_goto_bottom(app, ledger),
        KeyCode::Char('?') => {
            app.show_help = true;
        }
        KeyCode::Char('e') if app.pane == Pane::Items && app.screen != Screen::Files => {
            commands::handle_command("edit", app, ledger)?;
        }
        KeyCode::Char('D') if app.pane == Pane::Items && app.screen != Screen::Files => {
            commands::handle_command("delete-item", app, ledger)?;
        }
        KeyCode::Char('X') if app.screen == Screen::Manage => {
            commands::handle_command("delete-region", app, ledger)?;
        }
        KeyCode::Char('x') if app.screen == Screen::Files => {
            commands::handle_command("export", app, ledger)?;
        }
        KeyCode::Char('J') if app.screen == Screen::Files => {
            commands::handle_command("export-json", app, ledger)?;
        }
        KeyCode::Char('C') if app.screen == Screen::Files => {
            commands::handle_command("export-csv", app, ledger)?;
        }
        KeyCode::Char('.') if app.screen == Screen::Files => {
            app.file_browser_show_hidden = !app.file_browser_show_hidden;
            app.refresh_file_browser();
        }
        _ => {}
    }
    Ok(())
}

fn handle_file_browser_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Char(c) => {
            app.file_browser_filter.push(c);
            app.file_browser_index = 0;
            app.file_browser_scroll = 0;
        }
        KeyCode::Backspace => {
            if app.file_browser_filter.pop().is_none() {
                if let Some(parent) = app.file_browser_path.parent().map(|p| p.to_path_buf()) {
                    app.file_browser_path = parent;
                    app.refresh_file_browser();
                    app.file_browser_input_focused = true;
                }
            }
            app.file_browser_index = 0;
            app.file_browser_scroll = 0;
        }
        KeyCode::Down | KeyCode::Tab => {
            app.file_browser_input_focused = false;
        }
        KeyCode::Esc => {
            if !app.file_browser_filter.is_empty() {
                app.file_browser_filter.clear();
                app.file_browser_index = 0;
                app.file_browser_scroll = 0;
            } else {
                app.file_browser_input_focused = false;
            }
        }
        KeyCode::Enter => {
            let filtered = app.file_browser_filtered();
            if filtered.len() == 1 {
                app.file_browser_index = 0;
                open_selected_file(app);
            } else {
                app.file_browser_input_focused = false;
            }
        }
        _ => {}
    }
}

fn handle_command_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            commands::handle_command(&input, app, ledger)?;
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
        }
        KeyCode::Backspace => {
            if app.command_input.pop().is_none() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

/// Live-filters the region picker as the user types.
fn handle_search_input(key: event::KeyEvent, app: &mut App) {
    match key.code {
        KeyCode::Enter => {
            app.input_mode = InputMode::Normal;
            if let Some(region) = app.picker_region() {
                app.select_region(region);
                app.set_status(format!("Region: {region}"));
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.search_input.clear();
        }
        KeyCode::Backspace => {
            if app.search_input.pop().is_none() {
                app.input_mode = InputMode::Normal;
            }
        }
        KeyCode::Char(c) => app.search_input.push(c),
        _ => {}
    }
    app.picker_index = 0;
    app.picker_scroll = 0;
    if app.input_mode == InputMode::Normal && app.search_input.is_empty() {
        if let Some(pos) = app
            .region
            .as_deref()
            .and_then(|r| REGIONS.iter().position(|x| *x == r))
        {
            app.picker_index = pos;
            app.picker_scroll = pos.saturating_sub(app.page() / 2);
        }
    }
}

fn handle_editing_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match key.code {
        KeyCode::Enter => {
            let input = std::mem::take(&mut app.command_input);
            app.input_mode = InputMode::Normal;
            if !input.trim().is_empty() {
                commands::handle_command(&format!("edit {input}"), app, ledger)?;
            }
        }
        KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            app.command_input.clear();
            app.set_status("Edit cancelled");
        }
        KeyCode::Backspace => {
            app.command_input.pop();
        }
        KeyCode::Char(c) => app.command_input.push(c),
        _ => {}
    }
    Ok(())
}

fn handle_confirm_input(key: event::KeyEvent, app: &mut App, ledger: &mut Ledger) {
    app.input_mode = InputMode::Normal;
    let action = app.pending_action.take();
    app.confirm_message.clear();

    match (key.code, action) {
        (KeyCode::Char('y') | KeyCode::Char('Y'), Some(action)) => {
            commands::run_pending(action, app, ledger);
            if app.screen == Screen::Manage {
                app.sync_record_selection(ledger);
            }
        }
        _ => app.set_status("Cancelled"),
    }
}

// ── Navigation helpers ───────────────────────────────────────

fn switch_screen(app: &mut App, ledger: &Ledger, screen: Screen) {
    app.screen = screen;
    app.pane = Pane::Regions;
    match screen {
        Screen::Planning => {}
        Screen::Manage => app.sync_record_selection(ledger),
        Screen::Files => app.refresh_file_browser(),
    }
}

fn handle_move_down(app: &mut App, ledger: &Ledger) {
    let page = app.page();
    match (app.screen, app.pane) {
        (Screen::Files, _) => {
            let len = app.file_browser_filtered().len();
            scroll_down(&mut app.file_browser_index, &mut app.file_browser_scroll, len, page);
        }
        (_, Pane::Items) => {
            let len = app.active_item_count(ledger);
            scroll_down(&mut app.item_index, &mut app.item_scroll, len, page);
        }
        (Screen::Planning, Pane::Regions) => {
            let len = app.filtered_regions().len();
            scroll_down(&mut app.picker_index, &mut app.picker_scroll, len, page);
        }
        (Screen::Manage, Pane::Regions) => {
            scroll_down(&mut app.record_index, &mut app.record_scroll, ledger.len(), page);
            app.sync_record_selection(ledger);
        }
    }
}

fn handle_move_up(app: &mut App, ledger: &Ledger) {
    match (app.screen, app.pane) {
        (Screen::Files, _) => scroll_up(&mut app.file_browser_index, &mut app.file_browser_scroll),
        (_, Pane::Items) => scroll_up(&mut app.item_index, &mut app.item_scroll),
        (Screen::Planning, Pane::Regions) => {
            scroll_up(&mut app.picker_index, &mut app.picker_scroll);
        }
        (Screen::Manage, Pane::Regions) => {
            scroll_up(&mut app.record_index, &mut app.record_scroll);
            app.sync_record_selection(ledger);
        }
    }
}

fn handle_enter(app: &mut App, ledger: &mut Ledger) -> Result<()> {
    match (app.screen, app.pane) {
        (Screen::Planning, Pane::Regions) => {
            if let Some(region) = app.picker_region() {
                app.select_region(region);
                if app.active_item_count(ledger) > 0 {
                    app.pane = Pane::Items;
                }
                app.set_status(format!("Region: {region}"));
            }
        }
        (Screen::Manage, Pane::Regions) => {
            if app.active_item_count(ledger) > 0 {
                app.pane = Pane::Items;
            }
        }
        (Screen::Files, _) => open_selected_file(app),
        (_, Pane::Items) => commands::handle_command("edit", app, ledger)?,
    }
    Ok(())
}

/// Enter a directory, or ask to import the selected file.
fn open_selected_file(app: &mut App) {
    let Some(path) = app.selected_file().cloned() else {
        return;
    };
    if path.is_dir() {
        app.file_browser_path = path;
        app.refresh_file_browser();
    } else {
        match Format::detect(&path) {
            Ok(_) => commands::request_import(app, path),
            Err(e) => app.set_status(format!("{e:#}")),
        }
    }
}

fn handle_escape(app: &mut App) {
    match (app.screen, app.pane) {
        (Screen::Files, _) if !app.file_browser_filter.is_empty() => {
            app.file_browser_filter.clear();
            app.file_browser_index = 0;
            app.file_browser_scroll = 0;
        }
        (Screen::Planning | Screen::Manage, Pane::Items) => {
            app.pane = Pane::Regions;
        }
        _ => {
            app.status_message.clear();
            app.search_input.clear();
        }
    }
}

fn handle_goto_top(app: &mut App, ledger: &Ledger) {
    match (app.screen, app.pane) {
        (Screen::Files, _) => {
            scroll_to_top(&mut app.file_browser_index, &mut app.file_browser_scroll);
        }
        (_, Pane::Items) => scroll_to_top(&mut app.item_index, &mut app.item_scroll),
        (Screen::Planning, Pane::Regions) => {
            scroll_to_top(&mut app.picker_index, &mut app.picker_scroll);
        }
        (Screen::Manage, Pane::Regions) => {
            scroll_to_top(&mut app.record_index, &mut app.record_scroll);
            app.sync_record_selection(ledger);
        }
    }
}

fn handle_goto_bottom(app: &mut App, ledger: &Ledger) {
    let page = app.page();
    match (app.screen, app.pane) {
        (Screen::Files, _) => {
            let len = app.file_browser_filtered().len();
            scroll_to_bottom(&mut app.file_browser_index, &mut app.file_browser_scroll, len, page);
        }
        (_, Pane::Items) => {
            let len = app.active_item_count(ledger);
            scroll_to_bottom(&mut app.item_index, &mut app.item_scroll, len, page);
        }
        (Screen::Planning, Pane::Regions) => {
            let len = app.filtered_regions().len();
            scroll_to_bottom(&mut app.picker_index, &mut app.picker_scroll, len, page);
        }
        (Screen::Manage, Pane::Regions) => {
            scroll_to_bottom(&mut app.record_index, &mut app.record_scroll, ledger.len(), page);
            app.sync_record_selection(ledger);
        }
    }
}
