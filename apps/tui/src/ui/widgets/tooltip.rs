use crate::app::state::CELL_PIXELS;
use crate::ui::widgets::popup::ClearWidget;
use crate::ui::widgets::toggles::mode_color;
use facility_map_core::tooltip::{place_near_pointer, TooltipContent};
use facility_map_core::Facility;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn content_lines(content: &TooltipContent) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        content.title.clone(),
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
    ))];

    if let Some(location) = &content.location {
        lines.push(Line::from(Span::styled(
            location.clone(),
            Style::default().fg(Color::Gray),
        )));
    }

    if !content.chips.is_empty() {
        let mut chips = Vec::with_capacity(content.chips.len() * 2);
        for chip in &content.chips {
            let color = chip.mode.map_or(Color::Gray, mode_color);
            chips.push(Span::styled(
                format!("[{}]", chip.label),
                Style::default().fg(color),
            ));
            chips.push(Span::raw(" "));
        }
        chips.pop();
        lines.push(Line::from(chips));
    }

    if let Some(score) = &content.score {
        lines.push(Line::from(vec![
            Span::styled("Connectivity score: ", Style::default().fg(Color::Gray)),
            Span::styled(score.clone(), Style::default().add_modifier(Modifier::BOLD)),
        ]));
    }

    lines.push(Line::from(Span::styled(
        content.summary.clone(),
        Style::default().fg(Color::Yellow),
    )));
    lines
}

/// Panel rectangle for `size` cells next to `pointer`, flipped to stay inside `area`.
pub fn panel_rect(pointer: (u16, u16), size: (u16, u16), area: Rect) -> Rect {
    let width = size.0.min(area.width);
    let height = size.1.min(area.height);
    let to_pixels = |cells: u16, axis: f64| f64::from(cells) * axis;

    let (x, y) = place_near_pointer(
        (
            to_pixels(pointer.0.saturating_sub(area.x), CELL_PIXELS.0),
            to_pixels(pointer.1.saturating_sub(area.y), CELL_PIXELS.1),
        ),
        (to_pixels(width, CELL_PIXELS.0), to_pixels(height, CELL_PIXELS.1)),
        (
            to_pixels(area.width, CELL_PIXELS.0),
            to_pixels(area.height, CELL_PIXELS.1),
        ),
    );

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (column, row) = (
        (x / CELL_PIXELS.0).round() as u16,
        (y / CELL_PIXELS.1).round() as u16,
    );

    Rect {
        x: area.x + column.min(area.width - width),
        y: area.y + row.min(area.height - height),
        width,
        height,
    }
}

/// Floating details panel for the hovered facility, anchored at `pointer`.
pub fn render_tooltip(facility: &Facility, pointer: (u16, u16), f: &mut Frame<'_>, area: Rect) {
    let content = TooltipContent::from_facility(facility);
    let lines = content_lines(&content);

    let widest = lines.iter().map(Line::width).max().unwrap_or(0);
    let size = (
        u16::try_from(widest + 2).unwrap_or(u16::MAX),
        u16::try_from(lines.len() + 2).unwrap_or(u16::MAX),
    );
    let rect = panel_rect(pointer, size, area);
    if rect.width < 3 || rect.height < 3 {
        return;
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    f.render_widget(ClearWidget, rect);
    f.render_widget(Paragraph::new(lines).block(block), rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facility() -> Facility {
        Facility {
            name: "Union Station".to_string(),
            modes: vec!["Rail".to_string(), "Bus".to_string()],
            mode_count: 2,
            connectivity_score: Some(8.04),
            region: Some("West".to_string()),
            state: None,
            urban_rural: Some("Urban".to_string()),
            coordinates: Some([-105.0, 39.75]),
        }
    }

    #[test]
    fn lines_follow_panel_order() {
        let lines = content_lines(&TooltipContent::from_facility(&facility()));
        let text = lines.iter().map(ToString::to_string).collect::<Vec<_>>();
        assert_eq!(
            text,
            vec![
                "Union Station",
                "West · Urban",
                "[Rail] [Bus]",
                "Connectivity score: 8.0",
                "Intermodal hub: 2 modes",
            ]
        );
    }

    #[test]
    fn panel_sits_below_right_then_flips() {
        let area = Rect::new(0, 0, 80, 24);
        let rect = panel_rect((10, 5), (20, 6), area);
        assert!(rect.x > 10 && rect.y > 5);

        let rect = panel_rect((75, 22), (20, 6), area);
        assert!(rect.x + rect.width <= 75);
        assert!(rect.y + rect.height <= 22);
    }

    #[test]
    fn panel_never_leaves_a_small_area() {
        let area = Rect::new(2, 3, 10, 4);
        let rect = panel_rect((5, 4), (30, 9), area);
        assert_eq!(rect, Rect::new(2, 3, 10, 4));
    }
}
