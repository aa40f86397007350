use crate::app::state::SearchState;
use facility_map_core::Facility;
use facility_map_tui::cli::CliArgs;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::Buffer;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use ratatui::Frame;

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

pub struct ClearWidget;

impl Widget for ClearWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        ratatui::widgets::Clear.render(area, buf);
    }
}

fn key_line(key: &'static str, action: &'static str) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            format!("  {key:<10}"),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(action),
    ])
}

fn help_lines() -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Intermodal Facility Map",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("Hubs (two or more modes) are amber, single-mode facilities blue."),
        Line::from("Unselected facilities fade in as grey context when zoomed in."),
        Line::from(""),
        Line::from(Span::styled(
            "Keyboard Shortcuts:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        key_line("1-5", "Toggle Air, Rail, Bus, Ferry, Bike"),
        key_line("a / c", "Select all modes / clear selection"),
        key_line("arrows", "Pan"),
        key_line("+ / -", "Zoom in / out"),
        key_line("Tab / S-Tab", "Jump to the next / previous visible facility"),
        key_line("/", "Search facilities by name"),
        key_line("f", "Fit the view to the data"),
        key_line("? / F1", "Toggle this help"),
        key_line("q / Esc", "Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "CLI Options:",
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    for line in CliArgs::help_text().lines() {
        if line.starts_with("Usage") || line.starts_with("Options") || line.trim().is_empty() {
            continue;
        }
        lines.push(Line::from(line.to_string()));
    }

    lines
}

pub fn render_help_popup(f: &mut Frame<'_>, area: Rect) {
    let popup_area = centered_rect(80, 80, area);
    f.render_widget(ClearWidget, popup_area);

    let block = Block::default()
        .title("== Help & Keyboard Shortcuts ==")
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(
        Paragraph::new(Text::from(help_lines()))
            .block(block)
            .wrap(Wrap { trim: true }),
        popup_area,
    );

    let hint_area = Rect {
        x: popup_area.x,
        y: popup_area.y + popup_area.height.saturating_sub(2),
        width: popup_area.width,
        height: 1,
    };
    f.render_widget(
        Paragraph::new(Span::styled(
            "Press ? or Esc to close",
            Style::default().fg(Color::Gray),
        ))
        .alignment(Alignment::Center),
        hint_area,
    );
}

pub fn render_search_popup(
    search: &SearchState,
    facilities: &[Facility],
    f: &mut Frame<'_>,
    area: Rect,
) {
    let popup_area = centered_rect(60, 50, area);
    f.render_widget(ClearWidget, popup_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Find: ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("{}_", search.query),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
    ];

    if search.matches.is_empty() && !search.query.is_empty() {
        lines.push(Line::from(Span::styled(
            "No matching facility",
            Style::default().fg(Color::Gray),
        )));
    }

    for (position, index) in search.matches.iter().enumerate() {
        let Some(facility) = facilities.get(*index) else {
            continue;
        };
        let style = if position == search.selected {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let prefix = if position == search.selected { ">" } else { " " };
        lines.push(Line::from(Span::styled(
            format!("{prefix} {}", facility.name),
            style,
        )));
    }

    let block = Block::default()
        .title("Search (Enter to jump, Esc to cancel)")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Paragraph::new(lines).block(block), popup_area);
}
