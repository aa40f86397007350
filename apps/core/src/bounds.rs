use serde::Serialize;

use crate::error::MapError;

/// Geographic bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl Bounds {
    pub const fn point(lon: f64, lat: f64) -> Self {
        Self {
            min_lon: lon,
            min_lat: lat,
            max_lon: lon,
            max_lat: lat,
        }
    }

    pub fn extend(&mut self, lon: f64, lat: f64) {
        self.min_lon = self.min_lon.min(lon);
        self.min_lat = self.min_lat.min(lat);
        self.max_lon = self.max_lon.max(lon);
        self.max_lat = self.max_lat.max(lat);
    }

    pub fn contains(&self, lon: f64, lat: f64) -> bool {
        (self.min_lon..=self.max_lon).contains(&lon) && (self.min_lat..=self.max_lat).contains(&lat)
    }

    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn height(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// `[[west, south], [east, north]]`, the map library's bounds literal.
    pub const fn as_corners(&self) -> [[f64; 2]; 2] {
        [[self.min_lon, self.min_lat], [self.max_lon, self.max_lat]]
    }
}

pub fn is_valid_coordinate(lon: f64, lat: f64) -> bool {
    lon.is_finite() && lat.is_finite() && (-180.0..=180.0).contains(&lon) && (-90.0..=90.0).contains(&lat)
}

/// Bounds of every valid coordinate; missing or out-of-range points are skipped.
pub fn compute_bounds<I>(coordinates: I) -> Result<Bounds, MapError>
where
    I: IntoIterator<Item = Option<[f64; 2]>>,
{
    let mut bounds: Option<Bounds> = None;
    let mut skipped = 0_usize;

    for coordinate in coordinates {
        match coordinate {
            Some([lon, lat]) if is_valid_coordinate(lon, lat) => match bounds.as_mut() {
                Some(bounds) => bounds.extend(lon, lat),
                None => bounds = Some(Bounds::point(lon, lat)),
            },
            _ => skipped += 1,
        }
    }

    if skipped > 0 {
        log::debug!("skipped {skipped} facilities without usable coordinates");
    }

    bounds.ok_or(MapError::NoUsableData)
}
