use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph, Wrap},
    Frame,
};

use smeta::ledger::Ledger;

use super::ledger_view::bordered;
use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);

    render_file_browser(f, chunks[0], app);

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(chunks[1]);
    render_export_panel(f, right[0], app, ledger);
    render_report(f, right[1], app);
}

fn render_file_browser(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5)])
        .split(area);

    let mut path_spans = vec![
        Span::styled(" Path: ", Style::default().fg(theme::TEXT_DIM)),
        Span::styled(
            app.file_browser_path.display().to_string(),
            Style::default().fg(theme::ACCENT),
        ),
    ];
    if app.file_browser_input_focused || !app.file_browser_filter.is_empty() {
        path_spans.push(Span::styled("  filter: ", theme::dim_style()));
        path_spans.push(Span::styled(
            &app.file_browser_filter,
            Style::default().fg(theme::YELLOW),
        ));
    }
    let path_display = Paragraph::new(Line::from(path_spans)).block(bordered(
        " Import: xlsx / xls / json / csv ".into(),
        app.file_browser_input_focused,
    ));
    f.render_widget(path_display, chunks[0]);

    let filtered = app.file_browser_filtered();
    let items: Vec<ListItem> = filtered
        .iter()
        .enumerate()
        .skip(app.file_browser_scroll)
        .take(chunks[1].height.saturating_sub(2) as usize)
        .filter_map(|(i, &idx)| app.file_browser_entries.get(idx).map(|p| (i, p)))
        .map(|(i, path)| {
            let file_name = path.file_name().and_then(|n| n.to_str()).unwrap_or("?");
            let name = if Some(path.as_path()) == app.file_browser_path.parent() {
                "📁 ..".to_string()
            } else if path.is_dir() {
                format!("📁 {file_name}")
            } else {
                format!("📄 {file_name}")
            };

            let style = if !app.file_browser_input_focused && i == app.file_browser_index {
                theme::selected_style()
            } else {
                theme::normal_style()
            };

            ListItem::new(Line::from(Span::styled(name, style)))
        })
        .collect();

    let list = List::new(items).block(bordered(
        " j/k navigate, Enter open/import, Tab filter, . hidden ".into(),
        !app.file_browser_input_focused,
    ));
    f.render_widget(list, chunks[1]);
}

fn render_export_panel(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let mut lines = vec![
        Line::from(Span::styled(
            format!(
                " {} region{} in the ledger",
                ledger.len(),
                if ledger.len() == 1 { "" } else { "s" }
            ),
            theme::normal_style(),
        )),
        Line::from(Span::styled(
            format!(" Default folder: {}", app.export_dir.display()),
            theme::dim_style(),
        )),
        Line::from(Span::styled(
            " x xlsx   J json   C csv folder   or :export <path>",
            theme::dim_style(),
        )),
    ];
    if let Some(last) = app.last_export.first() {
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::styled(" Last: ", theme::dim_style()),
            Span::styled(
                truncate(&last.display().to_string(), area.width.saturating_sub(10) as usize),
                Style::default().fg(theme::GREEN),
            ),
        ]));
    }

    let panel = Paragraph::new(lines).block(bordered(" Export ".into(), false));
    f.render_widget(panel, area);
}

fn render_report(f: &mut Frame, area: Rect, app: &App) {
    let Some(report) = &app.last_report else {
        let msg = Paragraph::new(Line::from(Span::styled(
            " Nothing imported yet",
            theme::dim_style(),
        )))
        .block(bordered(" Last import ".into(), false));
        f.render_widget(msg, area);
        return;
    };

    let mut lines = vec![Line::from(Span::styled(
        format!(" {}", report.describe()),
        Style::default()
            .fg(theme::ACCENT)
            .add_modifier(Modifier::BOLD),
    ))];
    for region in &report.imported {
        lines.push(Line::from(vec![
            Span::styled("  ✓ ", Style::default().fg(theme::GREEN)),
            Span::styled(region.as_str(), theme::normal_style()),
        ]));
    }
    for issue in &report.issues {
        lines.push(Line::from(vec![
            Span::styled("  ! ", Style::default().fg(theme::YELLOW)),
            Span::styled(issue.to_string(), theme::dim_style()),
        ]));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(bordered(" Last import ".into(), false));
    f.render_widget(panel, area);
}
