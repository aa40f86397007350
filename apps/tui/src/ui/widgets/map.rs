use crate::app::state::CELL_PIXELS;
use crate::app::App;
use facility_map_core::layers::LayerKind;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::symbols::Marker;
use ratatui::text::Span;
use ratatui::widgets::canvas::{Canvas, Circle, Points};
use ratatui::widgets::Block;
use ratatui::Frame;

const BACKGROUND: (u8, u8, u8) = (17, 24, 39);

/// `#rrggbb` to its components.
pub fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let digits = hex.strip_prefix('#')?;
    if digits.len() != 6 {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(digits.get(range)?, 16).ok();
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Mixes `rgb` over the map background at `opacity`.
pub fn blend(rgb: (u8, u8, u8), opacity: f64) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    let mix = |fg: u8, bg: u8| {
        let value = opacity.mul_add(f64::from(fg) - f64::from(bg), f64::from(bg));
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let channel = value.round().clamp(0.0, 255.0) as u8;
        channel
    };
    Color::Rgb(
        mix(rgb.0, BACKGROUND.0),
        mix(rgb.1, BACKGROUND.1),
        mix(rgb.2, BACKGROUND.2),
    )
}

pub fn layer_color(kind: LayerKind, opacity: f64) -> Color {
    blend(hex_rgb(kind.color()).unwrap_or((128, 128, 128)), opacity)
}

struct Dot {
    lon: f64,
    lat: f64,
    radius: f64,
    color: Color,
}

/// Draws facilities as their map layers would: context, then single-mode, then hubs.
pub fn render_map(app: &App, f: &mut Frame<'_>, area: Rect, block: Block<'_>) {
    let view = app.visible_bounds();
    let dpp = app.camera.degrees_per_pixel();
    let zoom = app.camera.zoom;

    let mut layers: [Vec<Dot>; 3] = [Vec::new(), Vec::new(), Vec::new()];
    if let Some(controller) = &app.controller {
        for index in app.visible_facilities() {
            let facility = &controller.facilities()[index];
            let Some([lon, lat]) = facility.coordinates else {
                continue;
            };
            let style = controller.style_for(facility, zoom);
            let kind = LayerKind::for_feature(style.selected, style.hub);
            let slot = LayerKind::ALL.iter().position(|k| *k == kind).unwrap_or(0);
            layers[slot].push(Dot {
                lon,
                lat,
                radius: style.radius * dpp,
                color: layer_color(kind, style.opacity),
            });
        }
    }

    let hovered = app.hovered_facility().and_then(|facility| facility.coordinates);
    let crosshair = (app.camera.lon, app.camera.lat);
    let cell_width = CELL_PIXELS.0 * dpp;

    let canvas = Canvas::default()
        .block(block)
        .background_color(Color::Rgb(BACKGROUND.0, BACKGROUND.1, BACKGROUND.2))
        .marker(Marker::Braille)
        .x_bounds([view.min_lon, view.max_lon])
        .y_bounds([view.min_lat, view.max_lat])
        .paint(move |ctx| {
            for dots in &layers {
                for dot in dots {
                    ctx.draw(&Points {
                        coords: &[(dot.lon, dot.lat)],
                        color: dot.color,
                    });
                    if dot.radius >= cell_width {
                        ctx.draw(&Circle {
                            x: dot.lon,
                            y: dot.lat,
                            radius: dot.radius,
                            color: dot.color,
                        });
                    }
                }
                ctx.layer();
            }

            if let Some([lon, lat]) = hovered {
                ctx.draw(&Circle {
                    x: lon,
                    y: lat,
                    radius: cell_width,
                    color: Color::White,
                });
            }

            ctx.print(
                crosshair.0,
                crosshair.1,
                Span::styled("+", Style::default().fg(Color::DarkGray)),
            );
        });

    f.render_widget(canvas, area);
}
