//! SVG rendering of maps, animation frames and charts.
//!
//! Everything is drawn by hand into SVG strings; writing them to disk is
//! left to `output::svg`.

pub mod chart;
pub mod frames;
pub mod map;

// Re-export main types
pub use chart::{render_dual_axis, render_room_type_mix, render_series};
pub use frames::{render_animation, render_frame, FrameData};
pub use map::render_choropleth;

/// Canvas configuration shared by every renderer
#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 640,
        }
    }
}

impl RenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }
}

/// Categorical palette for series and bars
pub(crate) const PALETTE: [&str; 8] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
];

/// Fill for map cells with no value
pub(crate) const NO_DATA_FILL: &str = "rgb(211, 211, 211)";

// Sequential blue scale, light to dark
const BLUES: [(u8, u8, u8); 9] = [
    (247, 251, 255),
    (222, 235, 247),
    (198, 219, 239),
    (158, 202, 225),
    (107, 174, 214),
    (66, 146, 198),
    (33, 113, 181),
    (8, 81, 156),
    (8, 48, 107),
];

/// Colour for a position in [0, 1] on the blue scale
pub(crate) fn blues(t: f64) -> String {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (BLUES.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(BLUES.len() - 2);
    let frac = scaled - i as f64;
    let (r0, g0, b0) = BLUES[i];
    let (r1, g1, b1) = BLUES[i + 1];
    let mix = |a: u8, b: u8| (f64::from(a) + (f64::from(b) - f64::from(a)) * frac).round() as u8;
    format!("rgb({}, {}, {})", mix(r0, r1), mix(g0, g1), mix(b0, b1))
}

/// Escape text for SVG content and attributes
pub(crate) fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Format an axis or legend value compactly
pub(crate) fn format_value(value: f64) -> String {
    if value.abs() >= 10_000.0 {
        format!("{:.0}", value)
    } else if value.fract().abs() < 1e-9 {
        format!("{:.0}", value)
    } else {
        format!("{:.1}", value)
    }
}

/// Evenly spaced ticks covering [lo, hi] with a "nice" step
pub(crate) fn nice_ticks(lo: f64, hi: f64, target: usize) -> Vec<f64> {
    if !(hi > lo) || target == 0 {
        return vec![lo];
    }
    let raw_step = (hi - lo) / target as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step)
        .unwrap_or(10.0 * magnitude);

    let mut ticks = Vec::new();
    let mut tick = (lo / step).ceil() * step;
    while tick <= hi + step * 1e-9 {
        ticks.push(tick);
        tick += step;
    }
    ticks
}

/// SVG document header with a white background
pub(crate) fn svg_header(width: usize, height: usize) -> String {
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><rect width="{w}" height="{h}" fill="white"/>"#,
        w = width,
        h = height
    )
}

/// Centered bold title
pub(crate) fn svg_title(width: usize, title: &str) -> String {
    format!(
        r#"<text x="{}" y="34" font-family="sans-serif" font-size="22" font-weight="bold" text-anchor="middle">{}</text>"#,
        width / 2,
        escape(title)
    )
}
