use facility_map_core::{Mode, Selection};
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn mode_color(mode: Mode) -> Color {
    let (r, g, b) = mode.rgb();
    Color::Rgb(r, g, b)
}

/// One chip per mode; active chips are filled with the mode colour.
pub fn toggle_line(selection: &Selection) -> Line<'static> {
    let mut spans = Vec::with_capacity(Mode::ALL.len() * 2 + 1);
    for mode in Mode::ALL {
        let label = format!(" {} {} ", mode.index() + 1, mode.label());
        let style = if selection.contains(mode) {
            Style::default()
                .fg(Color::Black)
                .bg(mode_color(mode))
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled(
        "a: all  c: clear",
        Style::default().fg(Color::Gray),
    ));
    Line::from(spans)
}

pub fn render_toggles(selection: Option<&Selection>, f: &mut Frame<'_>, area: Rect) {
    let block = Block::default()
        .title("Modes")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let line = selection.map_or_else(
        || Line::from(Span::styled("waiting for data", Style::default().fg(Color::Gray))),
        toggle_line,
    );
    f.render_widget(Paragraph::new(line).block(block), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn active_chips_are_filled() {
        let line = toggle_line(&Selection::from_modes([Mode::Ferry]));
        let ferry = line
            .spans
            .iter()
            .find(|span| span.content.contains("Ferry"))
            .map(|span| span.style.bg);
        let air = line
            .spans
            .iter()
            .find(|span| span.content.contains("Air"))
            .map(|span| span.style.bg);

        assert_eq!(ferry, Some(Some(mode_color(Mode::Ferry))));
        assert_eq!(air, Some(None));
    }

    #[test]
    fn chips_are_numbered_from_one() {
        let text = toggle_line(&Selection::all())
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect::<String>();
        assert!(text.contains(" 1 Air "));
        assert!(text.contains(" 5 Bike "));
    }
}
