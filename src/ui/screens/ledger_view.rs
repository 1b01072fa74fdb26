//! Widgets shared by the Planning and Manage screens.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};
use rust_decimal::Decimal;

use smeta::ledger::format_percentage;
use smeta::models::{BudgetRecord, Summary};

use crate::ui::app::App;
use crate::ui::theme;
use crate::ui::util::{format_amount, progress_bar, truncate};

pub(crate) fn bordered(title: String, focused: bool) -> Block<'static> {
    let border = if focused { theme::ACCENT } else { theme::OVERLAY };
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(Span::styled(title, theme::title_style()))
}

/// Items of `record` with their live percentage of the ceiling.
pub(crate) fn render_items(
    f: &mut Frame,
    area: Rect,
    app: &App,
    region: &str,
    record: &BudgetRecord,
    focused: bool,
) {
    let title = format!(" {region}: {} items ", record.items().len());
    if record.items().is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled("No items yet", theme::dim_style())),
            Line::from(""),
            Line::from(Span::styled(
                "Add one with :add <number> <name> <amount>",
                theme::dim_style(),
            )),
        ])
        .centered()
        .block(bordered(title, focused));
        f.render_widget(msg, area);
        return;
    }

    let header_cells = ["No.", "Item", "Amount", "Share"]
        .iter()
        .map(|h| Cell::from(*h).style(theme::header_style()));
    let header = Row::new(header_cells).height(1);

    let rows: Vec<Row> = record
        .items_with_percentages()
        .enumerate()
        .skip(app.item_scroll)
        .take(area.height.saturating_sub(3) as usize)
        .map(|(i, (item, pct))| {
            let style = if focused && i == app.item_index {
                theme::selected_style()
            } else if i % 2 == 1 {
                theme::alt_row_style()
            } else {
                theme::normal_style()
            };
            Row::new(vec![
                Cell::from(truncate(&item.number, 8)),
                Cell::from(truncate(&item.name, 40)),
                Cell::from(format_amount(item.amount, &app.currency)),
                Cell::from(format_percentage(pct)),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(22),
        Constraint::Length(9),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(bordered(title, focused));
    f.render_widget(table, area);
}

/// Total / used / remaining cards above a usage gauge.
pub(crate) fn render_summary(f: &mut Frame, area: Rect, app: &App, summary: &Summary) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(5), Constraint::Length(3)])
        .split(area);

    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(34),
            Constraint::Percentage(33),
            Constraint::Percentage(33),
        ])
        .split(rows[0]);

    let ratio = summary.usage_ratio();
    let usage = theme::usage_color(ratio);
    let remaining_color = if summary.remaining_amount < Decimal::ZERO {
        theme::RED
    } else {
        theme::GREEN
    };

    render_card(
        f,
        cards[0],
        "Total Budget",
        format_amount(summary.total_budget, &app.currency),
        theme::ACCENT,
        None,
    );
    render_card(
        f,
        cards[1],
        "Used",
        format_amount(summary.used_amount, &app.currency),
        usage,
        Some(format_percentage(summary.used_percentage)),
    );
    render_card(
        f,
        cards[2],
        "Remaining",
        format_amount(summary.remaining_amount, &app.currency),
        remaining_color,
        Some(format_percentage(summary.remaining_percentage())),
    );

    let gauge_width = rows[1].width.saturating_sub(4) as usize;
    let mut spans = vec![Span::styled(
        progress_bar(ratio, gauge_width.saturating_sub(2)),
        Style::default().fg(usage),
    )];
    if summary.is_over_budget() {
        spans = vec![Span::styled(
            " Over budget: items exceed the total. Raise the total or trim items ",
            Style::default().fg(theme::RED).add_modifier(Modifier::BOLD),
        )];
    }
    let gauge = Paragraph::new(Line::from(spans)).block(bordered(" Usage ".into(), false));
    f.render_widget(gauge, rows[1]);
}

fn render_card(
    f: &mut Frame,
    area: Rect,
    title: &str,
    value: String,
    color: Color,
    subtitle: Option<String>,
) {
    let text = Paragraph::new(vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(subtitle.unwrap_or_default(), theme::dim_style())),
    ])
    .centered()
    .block(bordered(format!(" {title} "), false));
    f.render_widget(text, area);
}

pub(crate) fn render_no_record(f: &mut Frame, area: Rect, region: &str) {
    let msg = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("No budget set for {region}"),
            theme::dim_style(),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Use :total <amount> to start planning",
            theme::dim_style(),
        )),
    ])
    .centered()
    .block(bordered(format!(" {region} "), false));
    f.render_widget(msg, area);
}
