//! Hover panel content for a single facility.

use std::fmt::Write as _;

use crate::domain::Mode;
use crate::facility::Facility;

const POINTER_OFFSET: f64 = 12.0;

/// Escapes text for interpolation into HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

pub fn summary_line(mode_count: u32) -> String {
    match mode_count {
        0 => "No recognised modes".to_string(),
        1 => "Single-mode facility".to_string(),
        n => format!("Intermodal hub: {n} modes"),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModeChip {
    pub label: String,
    /// `None` for tags that are not a known mode.
    pub mode: Option<Mode>,
}

/// Everything the panel shows, already formatted but not yet escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TooltipContent {
    pub title: String,
    pub location: Option<String>,
    pub chips: Vec<ModeChip>,
    pub score: Option<String>,
    pub summary: String,
}

impl TooltipContent {
    pub fn from_facility(facility: &Facility) -> Self {
        let location = [&facility.region, &facility.state, &facility.urban_rural]
            .into_iter()
            .flatten()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" · ");

        let chips = facility
            .modes
            .iter()
            .map(|tag| ModeChip {
                label: tag.clone(),
                mode: Mode::parse(tag),
            })
            .collect();

        Self {
            title: facility.name.clone(),
            location: (!location.is_empty()).then_some(location),
            chips,
            score: facility
                .connectivity_score
                .filter(|score| score.is_finite())
                .map(|score| format!("{score:.1}")),
            summary: summary_line(facility.mode_count),
        }
    }

    /// Panel markup; every interpolated value is escaped.
    pub fn render_html(&self) -> String {
        let mut html = String::new();
        let _ = write!(html, "<div class=\"tt-title\">{}</div>", escape_html(&self.title));

        if let Some(location) = &self.location {
            let _ = write!(html, "<div class=\"tt-location\">{}</div>", escape_html(location));
        }

        if !self.chips.is_empty() {
            html.push_str("<div class=\"tt-modes\">");
            for chip in &self.chips {
                let color = chip.mode.map_or_else(|| "#9ca3af".to_string(), Mode::hex);
                let _ = write!(
                    html,
                    "<span class=\"tt-chip\" style=\"border-color:{color}\">{}</span>",
                    escape_html(&chip.label)
                );
            }
            html.push_str("</div>");
        }

        if let Some(score) = &self.score {
            let _ = write!(
                html,
                "<div class=\"tt-score\">Connectivity score: <strong>{}</strong></div>",
                escape_html(score)
            );
        }

        let _ = write!(html, "<div class=\"tt-summary\">{}</div>", escape_html(&self.summary));
        html
    }

    /// Plain lines for text front ends.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone()];
        if let Some(location) = &self.location {
            lines.push(location.clone());
        }
        if !self.chips.is_empty() {
            lines.push(
                self.chips
                    .iter()
                    .map(|chip| format!("[{}]", chip.label))
                    .collect::<Vec<_>>()
                    .join(" "),
            );
        }
        if let Some(score) = &self.score {
            lines.push(format!("Connectivity score: {score}"));
        }
        lines.push(self.summary.clone());
        lines
    }
}

/// Top-left corner for a `panel` sized box near `pointer`, kept inside `viewport`.
///
/// The panel sits below-right of the pointer and flips to the other side on
/// each axis where it would overflow.
pub fn place_near_pointer(pointer: (f64, f64), panel: (f64, f64), viewport: (f64, f64)) -> (f64, f64) {
    let place = |pointer: f64, size: f64, limit: f64| {
        let after = pointer + POINTER_OFFSET;
        if after + size <= limit {
            after
        } else {
            (pointer - POINTER_OFFSET - size).max(0.0)
        }
    };

    (
        place(pointer.0, panel.0, viewport.0),
        place(pointer.1, panel.1, viewport.1),
    )
}
