//! Zoom-dependent opacity and radius policy.
//!
//! `evaluate` answers the question for a single facility; `layers` turns the
//! same policy into declarative expressions for the map library. Both read the
//! curves below, so the terminal view and the web map agree.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::facility::Facility;
use crate::selection::{EmptySelection, Selection};

/// Piecewise-linear function of zoom, clamped outside its stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<(f64, f64)>", into = "Vec<(f64, f64)>")]
pub struct ZoomCurve {
    stops: Vec<(f64, f64)>,
}

impl From<Vec<(f64, f64)>> for ZoomCurve {
    fn from(stops: Vec<(f64, f64)>) -> Self {
        Self::new(stops)
    }
}

impl From<ZoomCurve> for Vec<(f64, f64)> {
    fn from(curve: ZoomCurve) -> Self {
        curve.stops
    }
}

impl ZoomCurve {
    pub fn new(mut stops: Vec<(f64, f64)>) -> Self {
        stops.retain(|(zoom, value)| zoom.is_finite() && value.is_finite());
        stops.sort_by(|a, b| a.0.total_cmp(&b.0));
        stops.dedup_by(|later, earlier| later.0 == earlier.0);
        Self { stops }
    }

    pub fn constant(value: f64) -> Self {
        Self::new(vec![(0.0, value)])
    }

    pub fn stops(&self) -> &[(f64, f64)] {
        &self.stops
    }

    pub fn evaluate(&self, zoom: f64) -> f64 {
        let Some(&(first_zoom, first_value)) = self.stops.first() else {
            return 0.0;
        };
        if zoom <= first_zoom {
            return first_value;
        }

        for pair in self.stops.windows(2) {
            let (z0, v0) = pair[0];
            let (z1, v1) = pair[1];
            if zoom <= z1 {
                let t = (zoom - z0) / (z1 - z0);
                return t.mul_add(v1 - v0, v0);
            }
        }

        self.stops.last().map_or(first_value, |&(_, value)| value)
    }

    /// Pointwise sum; breakpoints are the union of both curves' stops.
    #[must_use]
    pub fn plus(&self, other: &Self) -> Self {
        let stops = self
            .stops
            .iter()
            .chain(other.stops.iter())
            .map(|&(zoom, _)| (zoom, self.evaluate(zoom) + other.evaluate(zoom)))
            .collect();
        Self::new(stops)
    }

    /// Chooses per feature between `self`, where `condition` holds, and
    /// `otherwise`. `["zoom"]` is only accepted as the input of a top-level
    /// interpolate, so the `case` sits inside each stop.
    pub fn case_expression(&self, condition: &Value, otherwise: &Self) -> Value {
        let branch = |zoom: f64| {
            json!(["case", condition, self.evaluate(zoom), otherwise.evaluate(zoom)])
        };
        let zooms = self
            .plus(otherwise)
            .stops
            .iter()
            .map(|&(zoom, _)| zoom)
            .collect::<Vec<_>>();
        if zooms.len() < 2 {
            return branch(zooms.first().copied().unwrap_or(0.0));
        }

        let mut expression = vec![json!("interpolate"), json!(["linear"]), json!(["zoom"])];
        for zoom in zooms {
            expression.push(json!(zoom));
            expression.push(branch(zoom));
        }
        Value::Array(expression)
    }

    /// `["interpolate", ["linear"], ["zoom"], z0, v0, ...]`, or a literal for
    /// flat curves.
    pub fn expression(&self) -> Value {
        match self.stops.as_slice() {
            [] => json!(0.0),
            [(_, value)] => json!(value),
            stops => {
                let mut expression = vec![json!("interpolate"), json!(["linear"]), json!(["zoom"])];
                for &(zoom, value) in stops {
                    expression.push(json!(zoom));
                    expression.push(json!(value));
                }
                Value::Array(expression)
            }
        }
    }
}

/// Consolidated visual policy for the facility layers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StylePolicy {
    /// Context features are hidden below this zoom.
    pub dim_start_zoom: f64,
    pub selected_opacity: ZoomCurve,
    pub context_opacity: ZoomCurve,
    pub radius: ZoomCurve,
    pub hub_bonus: ZoomCurve,
    pub empty_selection: EmptySelection,
}

impl Default for StylePolicy {
    fn default() -> Self {
        Self {
            dim_start_zoom: 7.0,
            selected_opacity: ZoomCurve::new(vec![(3.0, 0.55), (7.0, 0.8), (12.0, 0.95)]),
            context_opacity: ZoomCurve::new(vec![(7.0, 0.12), (12.0, 0.3)]),
            radius: ZoomCurve::new(vec![(3.0, 2.0), (7.0, 4.0), (12.0, 8.0), (16.0, 14.0)]),
            hub_bonus: ZoomCurve::new(vec![(3.0, 1.0), (12.0, 3.0)]),
            empty_selection: EmptySelection::ShowNothing,
        }
    }
}

impl StylePolicy {
    pub fn hub_radius(&self) -> ZoomCurve {
        self.radius.plus(&self.hub_bonus)
    }

    pub fn context_opacity_at(&self, zoom: f64) -> f64 {
        if zoom < self.dim_start_zoom {
            0.0
        } else {
            self.context_opacity.evaluate(zoom).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureStyle {
    pub selected: bool,
    pub hub: bool,
    pub opacity: f64,
    pub radius: f64,
}

impl FeatureStyle {
    pub fn is_visible(&self) -> bool {
        self.opacity > 0.0
    }
}

pub fn evaluate(
    policy: &StylePolicy,
    selection: &Selection,
    zoom: f64,
    facility: &Facility,
) -> FeatureStyle {
    let selected = selection.matches(facility, policy.empty_selection);
    let hub = facility.is_hub();

    let opacity = if selected {
        policy.selected_opacity.evaluate(zoom).clamp(0.0, 1.0)
    } else {
        policy.context_opacity_at(zoom)
    };

    let mut radius = policy.radius.evaluate(zoom);
    if hub {
        radius += policy.hub_bonus.evaluate(zoom);
    }

    FeatureStyle {
        selected,
        hub,
        opacity,
        radius: radius.max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Mode;
    use crate::selection::SelectionAction;

    fn facility(modes: &[&str]) -> Facility {
        Facility {
            name: "Test".to_string(),
            modes: modes.iter().map(ToString::to_string).collect(),
            mode_count: u32::try_from(modes.len()).unwrap_or(0),
            connectivity_score: None,
            region: None,
            state: None,
            urban_rural: None,
            coordinates: Some([-100.0, 40.0]),
        }
    }

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(diff < 1e-9, "expected {expected}, got {actual}");
    }

    #[test]
    fn curve_interpolates_and_clamps() {
        let curve = ZoomCurve::new(vec![(10.0, 4.0), (0.0, 0.0)]);
        assert_close(curve.evaluate(-3.0), 0.0);
        assert_close(curve.evaluate(5.0), 2.0);
        assert_close(curve.evaluate(7.5), 3.0);
        assert_close(curve.evaluate(22.0), 4.0);
    }

    #[test]
    fn empty_curve_evaluates_to_zero() {
        assert_close(ZoomCurve::new(Vec::new()).evaluate(5.0), 0.0);
    }

    #[test]
    fn curve_expression_matches_map_syntax() {
        let curve = ZoomCurve::new(vec![(3.0, 2.0), (12.0, 8.0)]);
        assert_eq!(
            curve.expression(),
            json!(["interpolate", ["linear"], ["zoom"], 3.0, 2.0, 12.0, 8.0])
        );
        assert_eq!(ZoomCurve::constant(0.5).expression(), json!(0.5));
    }

    #[test]
    fn case_expression_keeps_zoom_at_the_top() {
        let hub = ZoomCurve::new(vec![(3.0, 3.0), (12.0, 11.0)]);
        let plain = ZoomCurve::new(vec![(3.0, 2.0), (7.0, 4.0), (12.0, 8.0)]);
        let is_hub = json!([">=", ["get", "mode_count"], 2]);

        let expression = hub.case_expression(&is_hub, &plain);
        assert_eq!(expression[0], json!("interpolate"));
        assert_eq!(expression[2], json!(["zoom"]));
        assert_eq!(expression[3], json!(3.0));
        assert_eq!(expression[4], json!(["case", is_hub, 3.0, 2.0]));
        assert_eq!(expression[5], json!(7.0));
        assert_eq!(expression[6][3], json!(4.0));
        assert_eq!(expression.as_array().map(Vec::len), Some(3 + 2 * 3));

        let flat = ZoomCurve::constant(5.0).case_expression(&is_hub, &ZoomCurve::constant(4.0));
        assert_eq!(flat, json!(["case", is_hub, 5.0, 4.0]));
    }

    #[test]
    fn plus_uses_union_of_stops() {
        let a = ZoomCurve::new(vec![(0.0, 1.0), (10.0, 2.0)]);
        let b = ZoomCurve::new(vec![(5.0, 1.0)]);
        let sum = a.plus(&b);
        assert_eq!(sum.stops().len(), 3);
        assert_close(sum.evaluate(5.0), 2.5);
        assert_close(sum.evaluate(20.0), 3.0);
    }

    #[test]
    fn selected_band_stays_above_context_band() {
        let policy = StylePolicy::default();
        let selection = Selection::from_modes([Mode::Rail]);
        let rail = facility(&["Rail"]);
        let ferry = facility(&["Ferry"]);

        for step in 0..=40 {
            let zoom = f64::from(step) * 0.5;
            let selected = evaluate(&policy, &selection, zoom, &rail);
            let context = evaluate(&policy, &selection, zoom, &ferry);
            assert!(selected.selected && !context.selected);
            assert!(selected.opacity > context.opacity, "zoom {zoom}");
            assert!((0.0..=1.0).contains(&selected.opacity));
        }
    }

    #[test]
    fn context_is_hidden_below_dim_start_zoom() {
        let policy = StylePolicy::default();
        let selection = Selection::empty();
        let ferry = facility(&["Ferry"]);

        assert!(!evaluate(&policy, &selection, 5.0, &ferry).is_visible());
        assert!(evaluate(&policy, &selection, 7.0, &ferry).is_visible());
    }

    #[test]
    fn radius_grows_with_zoom_and_hubs_get_a_bonus() {
        let policy = StylePolicy::default();
        let selection = Selection::all();
        let single = facility(&["Air"]);
        let hub = facility(&["Air", "Rail"]);

        let mut previous = 0.0;
        for step in 0..=40 {
            let zoom = f64::from(step) * 0.5;
            let plain = evaluate(&policy, &selection, zoom, &single);
            let bonus = evaluate(&policy, &selection, zoom, &hub);
            assert!(plain.radius >= previous);
            assert!(bonus.radius > plain.radius);
            assert!(bonus.hub && !plain.hub);
            previous = plain.radius;
        }
    }

    #[test]
    fn malformed_modes_are_context() {
        let policy = StylePolicy::default();
        let style = evaluate(&policy, &Selection::all(), 10.0, &facility(&[]));
        assert!(!style.selected);
    }

    #[test]
    fn malformed_facilities_stay_context_when_showing_everything() {
        let policy = StylePolicy {
            empty_selection: EmptySelection::ShowEverything,
            ..StylePolicy::default()
        };
        let bare = facility(&[]);
        let uncounted = Facility {
            mode_count: 0,
            ..facility(&["Air"])
        };

        assert!(!evaluate(&policy, &Selection::empty(), 10.0, &bare).selected);
        assert!(!evaluate(&policy, &Selection::empty(), 10.0, &uncounted).selected);
        assert!(!evaluate(&StylePolicy::default(), &Selection::all(), 10.0, &uncounted).selected);
    }

    #[test]
    fn empty_selection_can_show_everything() {
        let policy = StylePolicy {
            empty_selection: EmptySelection::ShowEverything,
            ..StylePolicy::default()
        };
        let selection = Selection::all().apply(SelectionAction::Clear);
        assert!(evaluate(&policy, &selection, 4.0, &facility(&["Bike"])).selected);
    }

    #[test]
    fn policy_deserializes_partial_overrides() {
        let policy: StylePolicy =
            serde_json::from_value(json!({ "dim_start_zoom": 9.0, "radius": [[0, 3], [10, 6]] }))
                .unwrap_or_else(|e| panic!("{e}"));
        assert_close(policy.dim_start_zoom, 9.0);
        assert_close(policy.radius.evaluate(5.0), 4.5);
        assert_eq!(policy.hub_bonus, StylePolicy::default().hub_bonus);
    }
}
