use serde::{Deserialize, Serialize};

use crate::bounds::Bounds;

const TILE_SIZE: f64 = 256.0;
const MAX_FRAME_DELTA: f64 = 0.25;
pub const MAX_FIT_ZOOM: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub lon: f64,
    pub lat: f64,
    pub zoom: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            lon: -98.0,
            lat: 39.0,
            zoom: 3.0,
        }
    }
}

impl Camera {
    /// Degrees of longitude covered by one pixel at this zoom.
    pub fn degrees_per_pixel(&self) -> f64 {
        360.0 / (TILE_SIZE * self.zoom.exp2())
    }

    /// Frames `bounds` inside a `width` x `height` pixel viewport with `padding` on each side.
    pub fn fit(bounds: &Bounds, width: f64, height: f64, padding: f64) -> Self {
        let (lon, lat) = bounds.center();
        let usable_width = (width - 2.0 * padding).max(1.0);
        let usable_height = (height - 2.0 * padding).max(1.0);

        let zoom_for = |span: f64, pixels: f64| {
            if span <= f64::EPSILON {
                MAX_FIT_ZOOM
            } else {
                (pixels * 360.0 / (TILE_SIZE * span)).log2()
            }
        };

        let zoom = zoom_for(bounds.width(), usable_width)
            .min(zoom_for(bounds.height(), usable_height))
            .clamp(0.0, MAX_FIT_ZOOM);

        Self { lon, lat, zoom }
    }

    /// Geographic area shown in a `width` x `height` pixel viewport.
    pub fn visible_bounds(&self, width: f64, height: f64) -> Bounds {
        let dpp = self.degrees_per_pixel();
        let half_width = width * dpp / 2.0;
        let half_height = height * dpp / 2.0;
        Bounds {
            min_lon: self.lon - half_width,
            min_lat: self.lat - half_height,
            max_lon: self.lon + half_width,
            max_lat: self.lat + half_height,
        }
    }

    #[must_use]
    pub fn zoomed_by(self, delta: f64) -> Self {
        Self {
            zoom: (self.zoom + delta).clamp(0.0, 20.0),
            ..self
        }
    }

    /// Moves by a fraction of the visible span.
    #[must_use]
    pub fn panned_by(self, dx: f64, dy: f64, width: f64, height: f64) -> Self {
        let dpp = self.degrees_per_pixel();
        Self {
            lon: (self.lon + dx * width * dpp).clamp(-180.0, 180.0),
            lat: (self.lat + dy * height * dpp).clamp(-85.0, 85.0),
            ..self
        }
    }
}

/// Animated move between two cameras, driven by wall-clock ticks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransition {
    from: Camera,
    to: Camera,
    duration: f64,
    elapsed: f64,
    last_tick: Option<f64>,
}

impl CameraTransition {
    pub fn new(from: Camera, to: Camera, duration_seconds: f64) -> Self {
        Self {
            from,
            to,
            duration: duration_seconds.max(0.0),
            elapsed: 0.0,
            last_tick: None,
        }
    }

    pub const fn target(&self) -> Camera {
        self.to
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advances to `now_seconds` and returns the camera to draw.
    ///
    /// The first tick only records the clock. Gaps longer than a quarter
    /// second count as a quarter second and time never runs backwards.
    pub fn advance(&mut self, now_seconds: f64) -> Camera {
        let delta = self
            .last_tick
            .map_or(0.0, |last| (now_seconds - last).clamp(0.0, MAX_FRAME_DELTA));
        self.last_tick = Some(now_seconds);
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.current()
    }

    pub fn current(&self) -> Camera {
        if self.is_finished() {
            return self.to;
        }
        let t = ease_out_cubic(self.elapsed / self.duration);
        Camera {
            lon: t.mul_add(self.to.lon - self.from.lon, self.from.lon),
            lat: t.mul_add(self.to.lat - self.from.lat, self.from.lat),
            zoom: t.mul_add(self.to.zoom - self.from.zoom, self.from.zoom),
        }
    }
}

fn ease_out_cubic(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(actual: f64, expected: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < 1e-9,
            "expected {expected}, got {actual}, diff {diff}"
        );
    }

    fn target() -> Camera {
        Camera {
            lon: -90.0,
            lat: 35.0,
            zoom: 6.0,
        }
    }

    #[test]
    fn fit_centers_and_contains_bounds() {
        let bounds = Bounds {
            min_lon: -100.0,
            min_lat: 35.0,
            max_lon: -90.0,
            max_lat: 40.0,
        };
        let camera = Camera::fit(&bounds, 800.0, 600.0, 40.0);
        assert_close(camera.lon, -95.0);
        assert_close(camera.lat, 37.5);

        let visible = camera.visible_bounds(800.0, 600.0);
        assert!(visible.contains(-100.0, 40.0));
        assert!(visible.contains(-90.0, 35.0));
    }

    #[test]
    fn fit_single_point_uses_max_zoom() {
        let camera = Camera::fit(&Bounds::point(-90.0, 35.0), 800.0, 600.0, 40.0);
        assert_close(camera.zoom, MAX_FIT_ZOOM);
    }

    #[test]
    fn first_tick_initializes_time_without_advancing() {
        let mut transition = CameraTransition::new(Camera::default(), target(), 1.0);
        let camera = transition.advance(10.0);
        assert_eq!(camera, Camera::default());
        assert!(!transition.is_finished());
    }

    #[test]
    fn large_frame_gap_is_clamped() {
        let mut transition = CameraTransition::new(Camera::default(), target(), 1.0);
        transition.advance(3.0);
        transition.advance(30.0);
        assert!(!transition.is_finished());
        transition.advance(30.25);
        transition.advance(30.5);
        transition.advance(30.75);
        assert!(transition.is_finished());
        assert_eq!(transition.current(), target());
    }

    #[test]
    fn backwards_time_does_not_reverse_transition() {
        let mut transition = CameraTransition::new(Camera::default(), target(), 1.0);
        transition.advance(10.0);
        let forward = transition.advance(10.2);
        let after = transition.advance(9.0);
        assert_eq!(forward, after);
    }

    #[test]
    fn zero_duration_jumps_to_target() {
        let transition = CameraTransition::new(Camera::default(), target(), 0.0);
        assert!(transition.is_finished());
        assert_eq!(transition.current(), target());
    }
}
