use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use smeta::ledger::Ledger;

use super::ledger_view;
use crate::ui::app::{App, Pane};
use crate::ui::theme;
use crate::ui::util::{format_amount, truncate};

pub(crate) fn render(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    if ledger.is_empty() {
        render_empty(f, area);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(44), Constraint::Min(40)])
        .split(area);

    render_records(f, chunks[0], app, ledger);

    match app.region.as_deref().and_then(|r| ledger.record(r).map(|rec| (r, rec))) {
        Some((region, record)) => ledger_view::render_items(
            f,
            chunks[1],
            app,
            region,
            record,
            app.pane == Pane::Items,
        ),
        None => ledger_view::render_no_record(f, chunks[1], app.region.as_deref().unwrap_or("—")),
    }
}

fn render_records(f: &mut Frame, area: Rect, app: &App, ledger: &Ledger) {
    let focused = app.pane == Pane::Regions;
    let items: Vec<ListItem> = ledger
        .iter()
        .enumerate()
        .skip(app.record_scroll)
        .take(area.height.saturating_sub(2) as usize)
        .map(|(i, (region, record))| {
            let style = if focused && i == app.record_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            let total_style = if record.is_over_budget() {
                Style::default().fg(theme::RED)
            } else {
                theme::dim_style()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<20}", truncate(region, 19)), style),
                Span::styled(
                    format!("{:>20}", format_amount(record.total_budget(), &app.currency)),
                    total_style,
                ),
            ]))
        })
        .collect();

    let list = List::new(items).block(ledger_view::bordered(
        format!(" Budgets ({}) ", ledger.len()),
        focused,
    ));
    f.render_widget(list, area);
}

fn render_empty(f: &mut Frame, area: Rect) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled("No budgets recorded", theme::dim_style())),
        Line::from(""),
        Line::from(Span::styled(
            "Plan one on the Planning tab or import a file with :import",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(ledger_view::bordered(" Budgets ".into(), false));
    f.render_widget(msg, area);
}
