use serde::Serialize;
use serde_json::{json, Value};

use crate::domain::Mode;
use crate::selection::{EmptySelection, Selection};
use crate::style::StylePolicy;

pub const SOURCE_ID: &str = "facilities";

const CONTEXT_COLOR: &str = "#6b7280";
const SINGLE_MODE_COLOR: &str = "#3b82f6";
const HUB_COLOR: &str = "#f59e0b";
const STROKE_COLOR: &str = "#ffffff";

/// The three circle layers drawn over the facility source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerKind {
    Context,
    SingleMode,
    Hub,
}

impl LayerKind {
    /// Bottom to top.
    pub const ALL: [Self; 3] = [Self::Context, Self::SingleMode, Self::Hub];

    pub const fn id(self) -> &'static str {
        match self {
            Self::Context => "facilities-context",
            Self::SingleMode => "facilities-single",
            Self::Hub => "facilities-hubs",
        }
    }

    pub const fn color(self) -> &'static str {
        match self {
            Self::Context => CONTEXT_COLOR,
            Self::SingleMode => SINGLE_MODE_COLOR,
            Self::Hub => HUB_COLOR,
        }
    }

    /// The layer a feature with this selection state is drawn on.
    pub const fn for_feature(selected: bool, hub: bool) -> Self {
        match (selected, hub) {
            (false, _) => Self::Context,
            (true, false) => Self::SingleMode,
            (true, true) => Self::Hub,
        }
    }

    /// Layers the tooltip reacts to.
    pub const fn is_hoverable(self) -> bool {
        !matches!(self, Self::Context)
    }
}

/// A full layer definition in the map library's style format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerSpec {
    pub id: &'static str,
    #[serde(rename = "type")]
    pub layer_type: &'static str,
    pub source: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minzoom: Option<f64>,
    pub filter: Value,
    pub paint: Value,
}

/// Filter and paint values to push onto an existing layer.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerUpdate {
    pub id: &'static str,
    pub filter: Value,
    pub paint: Vec<(&'static str, Value)>,
}

fn mode_count() -> Value {
    json!(["coalesce", ["get", "mode_count"], 0])
}

/// `["all", ["any", ["in", tag, ["get", "modes"]], ...], [">", mode_count, 0]]`.
///
/// An empty selection is `false`, or every known mode under `ShowEverything`.
pub fn selected_filter(selection: &Selection, empty: EmptySelection) -> Value {
    let modes = if selection.is_empty() {
        if empty == EmptySelection::ShowNothing {
            return json!(false);
        }
        Mode::ALL.to_vec()
    } else {
        selection.modes().collect()
    };

    let mut any = vec![json!("any")];
    any.extend(
        modes
            .into_iter()
            .map(|mode| json!(["in", mode.as_str(), ["get", "modes"]])),
    );
    json!(["all", Value::Array(any), [">", mode_count(), 0]])
}

pub fn layer_filter(kind: LayerKind, selection: &Selection, empty: EmptySelection) -> Value {
    let selected = selected_filter(selection, empty);
    match kind {
        LayerKind::Context => json!(["!", selected]),
        LayerKind::SingleMode => json!(["all", selected, ["<", mode_count(), 2]]),
        LayerKind::Hub => json!(["all", selected, [">=", mode_count(), 2]]),
    }
}

fn layer_paint(kind: LayerKind, policy: &StylePolicy) -> Vec<(&'static str, Value)> {
    let (opacity, radius) = match kind {
        // Context hubs keep the hub radius.
        LayerKind::Context => (
            policy.context_opacity.expression(),
            policy
                .hub_radius()
                .case_expression(&json!([">=", mode_count(), 2]), &policy.radius),
        ),
        LayerKind::SingleMode => (policy.selected_opacity.expression(), policy.radius.expression()),
        LayerKind::Hub => (policy.selected_opacity.expression(), policy.hub_radius().expression()),
    };

    vec![
        ("circle-color", json!(kind.color())),
        ("circle-opacity", opacity),
        ("circle-radius", radius),
        ("circle-stroke-color", json!(STROKE_COLOR)),
        (
            "circle-stroke-width",
            json!(if kind == LayerKind::Hub { 1.0 } else { 0.5 }),
        ),
    ]
}

pub fn build_layer(kind: LayerKind, policy: &StylePolicy, selection: &Selection) -> LayerSpec {
    let paint = layer_paint(kind, policy)
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect::<serde_json::Map<_, _>>();

    LayerSpec {
        id: kind.id(),
        layer_type: "circle",
        source: SOURCE_ID,
        minzoom: (kind == LayerKind::Context).then_some(policy.dim_start_zoom),
        filter: layer_filter(kind, selection, policy.empty_selection),
        paint: Value::Object(paint),
    }
}

pub fn build_layers(policy: &StylePolicy, selection: &Selection) -> Vec<LayerSpec> {
    LayerKind::ALL
        .into_iter()
        .map(|kind| build_layer(kind, policy, selection))
        .collect()
}

pub fn build_updates(policy: &StylePolicy, selection: &Selection) -> Vec<LayerUpdate> {
    LayerKind::ALL
        .into_iter()
        .map(|kind| LayerUpdate {
            id: kind.id(),
            filter: layer_filter(kind, selection, policy.empty_selection),
            paint: layer_paint(kind, policy)
                .into_iter()
                .filter(|(name, _)| matches!(*name, "circle-opacity" | "circle-radius"))
                .collect(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facility::Facility;
    use crate::style::evaluate;

    #[test]
    fn selected_filter_ors_every_selected_mode() {
        let selection = Selection::from_modes([Mode::Rail, Mode::Air]);
        assert_eq!(
            selected_filter(&selection, EmptySelection::ShowNothing),
            json!([
                "all",
                [
                    "any",
                    ["in", "Air", ["get", "modes"]],
                    ["in", "Rail", ["get", "modes"]]
                ],
                [">", ["coalesce", ["get", "mode_count"], 0], 0]
            ])
        );
    }

    #[test]
    fn empty_selection_filter_follows_policy() {
        let empty = Selection::empty();
        assert_eq!(selected_filter(&empty, EmptySelection::ShowNothing), json!(false));
        // Showing everything still requires a recognised mode.
        assert_eq!(
            selected_filter(&empty, EmptySelection::ShowEverything),
            selected_filter(&Selection::all(), EmptySelection::ShowNothing)
        );
    }

    #[test]
    fn layers_split_context_single_and_hubs() {
        let policy = StylePolicy::default();
        let layers = build_layers(&policy, &Selection::from_modes([Mode::Bus]));
        let ids = layers.iter().map(|layer| layer.id).collect::<Vec<_>>();
        assert_eq!(ids, vec!["facilities-context", "facilities-single", "facilities-hubs"]);

        assert_eq!(layers[0].minzoom, Some(7.0));
        assert_eq!(layers[1].minzoom, None);
        assert_eq!(layers[0].filter[0], json!("!"));
        assert_eq!(layers[2].filter[2], json!([">=", ["coalesce", ["get", "mode_count"], 0], 2]));
        assert_eq!(layers[2].paint["circle-radius"], policy.hub_radius().expression());
        assert_eq!(layers[1].paint["circle-color"], json!(SINGLE_MODE_COLOR));
    }

    #[test]
    fn layer_spec_serializes_in_style_format() {
        let layer = build_layer(LayerKind::Hub, &StylePolicy::default(), &Selection::all());
        let value = serde_json::to_value(&layer).unwrap_or_default();
        assert_eq!(value["type"], json!("circle"));
        assert_eq!(value["source"], json!(SOURCE_ID));
        assert!(value.get("minzoom").is_none());
    }

    #[test]
    fn updates_carry_filter_opacity_and_radius() {
        let updates = build_updates(&StylePolicy::default(), &Selection::empty());
        assert_eq!(updates.len(), 3);
        for update in &updates {
            let names = update.paint.iter().map(|(name, _)| *name).collect::<Vec<_>>();
            assert_eq!(names, vec!["circle-opacity", "circle-radius"]);
        }
        assert_eq!(updates[0].filter, json!(["!", false]));
    }

    #[test]
    fn features_land_on_one_layer() {
        assert_eq!(LayerKind::for_feature(false, true), LayerKind::Context);
        assert_eq!(LayerKind::for_feature(true, false), LayerKind::SingleMode);
        assert_eq!(LayerKind::for_feature(true, true), LayerKind::Hub);
        assert!(!LayerKind::Context.is_hoverable());
    }

    fn facility(modes: &[&str], mode_count: u32) -> Facility {
        Facility {
            name: "Test".to_string(),
            modes: modes.iter().map(ToString::to_string).collect(),
            mode_count,
            connectivity_score: None,
            region: None,
            state: None,
            urban_rural: None,
            coordinates: Some([-100.0, 40.0]),
        }
    }

    fn number(value: &Value) -> f64 {
        value.as_f64().unwrap_or_else(|| panic!("not a number: {value}"))
    }

    fn get(facility: &Facility, key: &str) -> Value {
        match key {
            "modes" => json!(facility.modes),
            "mode_count" => json!(facility.mode_count),
            other => panic!("unexpected property {other}"),
        }
    }

    /// Evaluates the subset of the style expression language the layers emit.
    fn eval(expression: &Value, facility: &Facility, zoom: f64) -> Value {
        let Some(items) = expression.as_array() else {
            return expression.clone();
        };
        let arg = |index: usize| eval(&items[index], facility, zoom);
        match items[0].as_str().unwrap_or_default() {
            "get" => get(facility, items[1].as_str().unwrap_or_default()),
            "coalesce" => {
                let first = arg(1);
                if first.is_null() { arg(2) } else { first }
            }
            "in" => json!(arg(2)
                .as_array()
                .is_some_and(|list| list.contains(&arg(1)))),
            "!" => json!(!arg(1).as_bool().unwrap_or(false)),
            "any" => json!((1..items.len()).any(|i| arg(i).as_bool().unwrap_or(false))),
            "all" => json!((1..items.len()).all(|i| arg(i).as_bool().unwrap_or(false))),
            ">" => json!(number(&arg(1)) > number(&arg(2))),
            ">=" => json!(number(&arg(1)) >= number(&arg(2))),
            "<" => json!(number(&arg(1)) < number(&arg(2))),
            "case" => {
                if arg(1).as_bool().unwrap_or(false) { arg(2) } else { arg(3) }
            }
            "interpolate" => {
                let stops = items[3..]
                    .chunks(2)
                    .map(|pair| (number(&pair[0]), number(&eval(&pair[1], facility, zoom))))
                    .collect::<Vec<_>>();
                json!(crate::style::ZoomCurve::new(stops).evaluate(zoom))
            }
            other => panic!("unexpected operator {other}"),
        }
    }

    #[test]
    fn layers_draw_what_evaluate_computes() {
        let facilities = [
            facility(&["Air"], 1),
            facility(&["Rail", "Bus"], 2),
            facility(&["Ferry"], 1),
            facility(&["Ferry", "Bike"], 2),
            facility(&["Hovercraft"], 1),
            facility(&["Air"], 0),
            facility(&[], 0),
        ];
        let selections = [
            Selection::from_modes([Mode::Air, Mode::Rail]),
            Selection::all(),
            Selection::empty(),
        ];

        for empty in [EmptySelection::ShowNothing, EmptySelection::ShowEverything] {
            let policy = StylePolicy {
                empty_selection: empty,
                ..StylePolicy::default()
            };
            for selection in &selections {
                let layers = build_layers(&policy, selection);
                for facility in &facilities {
                    let drawn_on = layers
                        .iter()
                        .filter(|layer| eval(&layer.filter, facility, 0.0) == json!(true))
                        .collect::<Vec<_>>();
                    assert_eq!(drawn_on.len(), 1, "{facility:?} must be on exactly one layer");
                    let layer = drawn_on[0];

                    for step in 0..=36 {
                        let zoom = f64::from(step) * 0.5;
                        let style = evaluate(&policy, selection, zoom, facility);
                        assert_eq!(
                            layer.id,
                            LayerKind::for_feature(style.selected, style.hub).id(),
                            "{facility:?}"
                        );

                        let radius = number(&eval(&layer.paint["circle-radius"], facility, zoom));
                        assert!((radius - style.radius).abs() < 1e-9, "{} at z{zoom}", layer.id);

                        let below_minzoom = layer.minzoom.is_some_and(|min| zoom < min);
                        let opacity = if below_minzoom {
                            0.0
                        } else {
                            number(&eval(&layer.paint["circle-opacity"], facility, zoom))
                        };
                        assert!((opacity - style.opacity).abs() < 1e-9, "{} at z{zoom}", layer.id);
                    }
                }
            }
        }
    }
}
