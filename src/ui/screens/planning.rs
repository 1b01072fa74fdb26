use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

use smeta::ledger::Ledger;
use smeta::models::REGIONS;

use super::ledger_view;
use crate::ui::app::{App, Pane};
use crate::ui::theme;
use crate::ui::util::truncate;

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(30), Constraint::Min(40)])
        .split(area);

    render_picker(f, chunks[0], app, ledger);

    let Some(region) = app.region.as_deref() else {
        ledger_view::render_no_record(f, chunks[1], "—");
        return;
    };
    let Some(record) = ledger.record(region) else {
        ledger_view::render_no_record(f, chunks[1], region);
        return;
    };

    let right = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(8), Constraint::Min(5)])
        .split(chunks[1]);
    ledger_view::render_summary(f, right[0], app, &record.summary());
    ledger_view::render_items(f, right[1], app, region, record, app.pane == Pane::Items);
}

fn render_picker(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let filtered = app.filtered_regions();
    let focused = app.pane == Pane::Regions;

    let items: Vec<ListItem> = filtered
        .iter()
        .enumerate()
        .skip(app.picker_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .filter_map(|(i, &idx)| REGIONS.get(idx).map(|name| (i, *name)))
        .map(|(i, name)| {
            let marker = if ledger.contains(name) { "● " } else { "  " };
            let style = if focused && i == app.picker_index {
                theme::selected_style()
            } else if app.region.as_deref() == Some(name) {
                Style::default().fg(theme::ACCENT)
            } else {
                theme::normal_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(marker, Style::default().fg(theme::GREEN)),
                Span::styled(truncate(name, 25), style),
            ]))
        })
        .collect();

    let title = if app.search_input.is_empty() {
        format!(" Regions ({}) ", filtered.len())
    } else {
        format!(" Regions /{} ({}) ", app.search_input, filtered.len())
    };
    let list = List::new(items).block(ledger_view::bordered(title, focused));
    f.render_widget(list, area);
}
