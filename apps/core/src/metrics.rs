use serde::{Deserialize, Serialize};

use crate::facility::Facility;
use crate::selection::{EmptySelection, Selection};

pub const HEADLINE_PLACEHOLDER: &str = "—";

/// Companion document with precomputed aggregates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MetricsSummary {
    #[serde(default)]
    pub overall: OverallMetrics,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverallMetrics {
    #[serde(default)]
    pub true_intermodal_pct: Option<f64>,
}

impl MetricsSummary {
    pub fn intermodal_percentage(&self) -> Option<u32> {
        self.overall.true_intermodal_pct.and_then(round_percentage)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadlineSource {
    #[default]
    Precomputed,
    Live,
}

impl HeadlineSource {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "precomputed" | "summary" => Some(Self::Precomputed),
            "live" => Some(Self::Live),
            _ => None,
        }
    }
}

/// Hub and total counts over the selected facilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SelectionCounts {
    pub selected: usize,
    pub hubs: usize,
}

impl SelectionCounts {
    pub fn percentage(&self) -> Option<u32> {
        if self.selected == 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratio = self.hubs as f64 / self.selected as f64;
        round_percentage(ratio * 100.0)
    }
}

pub fn count_selected(
    facilities: &[Facility],
    selection: &Selection,
    empty: EmptySelection,
) -> SelectionCounts {
    facilities
        .iter()
        .filter(|facility| selection.matches(facility, empty))
        .fold(SelectionCounts::default(), |mut counts, facility| {
            counts.selected += 1;
            if facility.is_hub() {
                counts.hubs += 1;
            }
            counts
        })
}

/// `round(100 * hubs / selected)` over the live selection, `None` when nothing is selected.
pub fn intermodal_percentage(
    facilities: &[Facility],
    selection: &Selection,
    empty: EmptySelection,
) -> Option<u32> {
    count_selected(facilities, selection, empty).percentage()
}

/// The headline shown above the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Headline(pub Option<u32>);

impl Headline {
    pub fn resolve(
        source: HeadlineSource,
        summary: Option<&MetricsSummary>,
        live: Option<u32>,
    ) -> Self {
        match source {
            HeadlineSource::Precomputed => Self(
                summary
                    .and_then(MetricsSummary::intermodal_percentage)
                    .or(live),
            ),
            HeadlineSource::Live => Self(live),
        }
    }
}

impl std::fmt::Display for Headline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(pct) => write!(f, "{pct}%"),
            None => f.write_str(HEADLINE_PLACEHOLDER),
        }
    }
}

fn round_percentage(value: f64) -> Option<u32> {
    if !value.is_finite() {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let rounded = value.round().clamp(0.0, 100.0) as u32;
    Some(rounded)
}
