use serde_json::{Map, Value};

use crate::domain::Mode;
use crate::error::MapError;
use crate::modes::{known_modes, normalize_modes};

pub const UNNAMED_FACILITY: &str = "Unnamed facility";

/// A single point feature from the facility collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Facility {
    pub name: String,
    pub modes: Vec<String>,
    pub mode_count: u32,
    pub connectivity_score: Option<f64>,
    pub region: Option<String>,
    pub state: Option<String>,
    pub urban_rural: Option<String>,
    /// `[longitude, latitude]` as delivered; validity is checked by the bounds code.
    pub coordinates: Option<[f64; 2]>,
}

impl Facility {
    /// Builds a facility from a GeoJSON properties bag.
    ///
    /// Also used for features handed back by the map's hit test, where array
    /// properties arrive JSON-encoded.
    pub fn from_properties(properties: &Map<String, Value>, coordinates: Option<[f64; 2]>) -> Self {
        let modes = properties
            .get("modes")
            .map(normalize_modes)
            .unwrap_or_default();

        let mode_count = properties
            .get("mode_count")
            .and_then(as_count)
            .unwrap_or_else(|| u32::try_from(modes.len()).unwrap_or(u32::MAX));

        let name = text_property(properties, "name")
            .or_else(|| text_property(properties, "facility_name"))
            .unwrap_or_else(|| UNNAMED_FACILITY.to_string());

        Self {
            name,
            modes,
            mode_count,
            connectivity_score: properties.get("connectivity_score").and_then(as_number),
            region: text_property(properties, "region"),
            state: text_property(properties, "state"),
            urban_rural: text_property(properties, "urban_rural"),
            coordinates,
        }
    }

    pub fn from_feature(feature: &Value) -> Self {
        let empty = Map::new();
        let properties = feature
            .get("properties")
            .and_then(Value::as_object)
            .unwrap_or(&empty);
        Self::from_properties(properties, point_coordinates(feature))
    }

    pub const fn is_hub(&self) -> bool {
        self.mode_count >= 2
    }

    pub fn known_modes(&self) -> Vec<Mode> {
        known_modes(&self.modes)
    }
}

/// The loaded feature collection, held read-only after load.
#[derive(Debug, Clone)]
pub struct FacilityCollection {
    facilities: Vec<Facility>,
    source: Value,
}

impl FacilityCollection {
    pub fn parse(text: &str) -> Result<Self, MapError> {
        let document =
            serde_json::from_str::<Value>(text).map_err(|e| MapError::Parse(e.to_string()))?;
        Self::from_geojson(document)
    }

    /// Accepts a GeoJSON document with a `features` array.
    ///
    /// The stored source document is rewritten so every feature carries a
    /// normalized `modes` array and an integer `mode_count`.
    pub fn from_geojson(mut document: Value) -> Result<Self, MapError> {
        let features = document
            .get_mut("features")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| MapError::Parse("missing 'features' array".to_string()))?;

        let mut facilities = Vec::with_capacity(features.len());
        for feature in features.iter_mut() {
            let facility = Facility::from_feature(feature);
            write_normalized_properties(feature, &facility);
            facilities.push(facility);
        }

        log::debug!("parsed {} facilities", facilities.len());

        Ok(Self {
            facilities,
            source: document,
        })
    }

    pub fn facilities(&self) -> &[Facility] {
        &self.facilities
    }

    pub fn len(&self) -> usize {
        self.facilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facilities.is_empty()
    }

    pub fn hub_count(&self) -> usize {
        self.facilities.iter().filter(|f| f.is_hub()).count()
    }

    /// Normalized GeoJSON handed to the rendering source.
    pub const fn source_document(&self) -> &Value {
        &self.source
    }
}

fn write_normalized_properties(feature: &mut Value, facility: &Facility) {
    let Some(object) = feature.as_object_mut() else {
        return;
    };
    let properties = object
        .entry("properties")
        .or_insert_with(|| Value::Object(Map::new()));
    if !properties.is_object() {
        *properties = Value::Object(Map::new());
    }
    if let Some(properties) = properties.as_object_mut() {
        properties.insert(
            "modes".to_string(),
            Value::Array(facility.modes.iter().cloned().map(Value::String).collect()),
        );
        properties.insert("mode_count".to_string(), Value::from(facility.mode_count));
    }
}

fn point_coordinates(feature: &Value) -> Option<[f64; 2]> {
    let coordinates = feature.get("geometry")?.get("coordinates")?.as_array()?;
    let lon = coordinates.first()?.as_f64()?;
    let lat = coordinates.get(1)?.as_f64()?;
    Some([lon, lat])
}

fn text_property(properties: &Map<String, Value>, key: &str) -> Option<String> {
    let text = properties.get(key)?.as_str()?.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64()?,
        Value::String(text) => text.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    number.is_finite().then_some(number)
}

fn as_count(value: &Value) -> Option<u32> {
    if let Some(count) = value.as_u64() {
        return u32::try_from(count).ok();
    }
    let number = as_number(value)?;
    if number < 0.0 || number.fract() != 0.0 || number > f64::from(u32::MAX) {
        return None;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let count = number as u32;
    Some(count)
}
