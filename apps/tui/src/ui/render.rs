use crate::app::{App, LoadState};
use crate::ui::widgets::map::render_map;
use crate::ui::widgets::popup::{render_help_popup, render_search_popup};
use crate::ui::widgets::toggles::render_toggles;
use crate::ui::widgets::tooltip::render_tooltip;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use throbber_widgets_tui::{Throbber, WhichUse, BRAILLE_SIX};

pub fn ui(app: &mut App, f: &mut Frame<'_>) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Headline
            Constraint::Length(3), // Mode toggles
            Constraint::Min(5),    // Map
            Constraint::Length(1), // Status
        ])
        .split(f.area());

    render_header(app, f, layout[0]);
    render_toggles(app.controller.as_ref().map(|c| c.selection()), f, layout[1]);
    render_body(app, f, layout[2]);
    render_status(app, f, layout[3]);

    if let (Some(search), Some(controller)) = (&app.search, &app.controller) {
        render_search_popup(search, controller.facilities(), f, layout[2]);
    }

    if app.show_help {
        let area = f.area();
        render_help_popup(f, area);
    }
}

fn render_header(app: &App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("== Intermodal Facilities ==")
        .title_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let mut spans = vec![
        Span::styled("Intermodal share: ", Style::default().fg(Color::Gray)),
        Span::styled(
            app.headline().to_string(),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    if let Some(controller) = &app.controller {
        let counts = controller.counts();
        spans.push(Span::styled(
            format!(
                "   {} of {} facilities selected, {} hubs",
                counts.selected,
                controller.facilities().len(),
                counts.hubs
            ),
            Style::default().fg(Color::Gray),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}

fn render_body(app: &mut App, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title(format!(
            "Map  {:.2}, {:.2}  z{:.1}",
            app.camera.lat, app.camera.lon, app.camera.zoom
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let inner = block.inner(area);
    app.viewport = (inner.width.max(1), inner.height.max(1));

    match &app.load_state {
        LoadState::Loading => {
            f.render_widget(block, area);
            let throbber = Throbber::default()
                .label("Loading facilities...")
                .style(Style::default().fg(Color::Cyan))
                .throbber_style(
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .throbber_set(BRAILLE_SIX)
                .use_type(WhichUse::Spin);
            let line = Rect {
                x: inner.x + inner.width.saturating_sub(24) / 2,
                y: inner.y + inner.height / 2,
                width: 24.min(inner.width),
                height: 1.min(inner.height),
            };
            f.render_stateful_widget(throbber, line, &mut app.throbber);
        }
        LoadState::Failed(message) => {
            let text = vec![
                Line::from(Span::styled(
                    "Could not load facility data",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(message.clone()),
                Line::from(""),
                Line::from(Span::styled("Press q to quit", Style::default().fg(Color::Gray))),
            ];
            f.render_widget(
                Paragraph::new(text)
                    .block(block)
                    .alignment(Alignment::Center)
                    .wrap(Wrap { trim: true }),
                area,
            );
        }
        LoadState::Ready => {
            render_map(app, f, area, block);
            if app.search.is_none() {
                if let Some(facility) = app.hovered_facility() {
                    let pointer = (inner.x + inner.width / 2, inner.y + inner.height / 2);
                    render_tooltip(facility, pointer, f, inner);
                }
            }
        }
    }
}

fn render_status(app: &App, f: &mut Frame<'_>, area: Rect) {
    let hint = Span::styled(
        "  ?: Help | 1-5: Modes | /: Search | q: Quit",
        Style::default().fg(Color::DarkGray),
    );
    let line = Line::from(vec![
        Span::styled(app.status_message.clone(), Style::default().fg(Color::Gray)),
        hint,
    ]);
    f.render_widget(Paragraph::new(line), area);
}
