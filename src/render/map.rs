//! Choropleth maps of district metrics.

use super::{blues, escape, format_value, svg_header, svg_title, RenderConfig, NO_DATA_FILL};
use crate::geo::{JoinedBoundary, Point, Polygon};
use crate::utils::config::{MAP_X_RANGE, MAP_Y_RANGE};
use crate::utils::error::RenderError;
use log::info;

const TITLE_HEIGHT: f64 = 60.0;
const COLORBAR_WIDTH: f64 = 90.0;
const MARGIN: f64 = 20.0;

/// Maps projected metres into the drawing area
#[derive(Debug, Clone, Copy)]
pub(crate) struct Viewport {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    /// Largest area with the map's aspect ratio inside the canvas
    pub(crate) fn fit(config: &RenderConfig, reserved_right: f64) -> Self {
        let span_x = MAP_X_RANGE.1 - MAP_X_RANGE.0;
        let span_y = MAP_Y_RANGE.1 - MAP_Y_RANGE.0;
        let avail_w = (config.width as f64 - reserved_right - 2.0 * MARGIN).max(1.0);
        let avail_h = (config.height as f64 - TITLE_HEIGHT - MARGIN).max(1.0);
        let scale = (avail_w / span_x).min(avail_h / span_y);
        Self {
            left: MARGIN,
            top: TITLE_HEIGHT,
            width: span_x * scale,
            height: span_y * scale,
        }
    }

    pub(crate) fn to_screen(&self, p: Point) -> (f64, f64) {
        let x = self.left + (p.x - MAP_X_RANGE.0) / (MAP_X_RANGE.1 - MAP_X_RANGE.0) * self.width;
        let y = self.top + (MAP_Y_RANGE.1 - p.y) / (MAP_Y_RANGE.1 - MAP_Y_RANGE.0) * self.height;
        (x, y)
    }

    pub(crate) fn contains(&self, (x, y): (f64, f64)) -> bool {
        x >= self.left && x <= self.left + self.width && y >= self.top && y <= self.top + self.height
    }

    /// SVG path data for a polygon with holes (use `fill-rule="evenodd"`)
    pub(crate) fn path(&self, polygon: &Polygon) -> String {
        let mut d = String::new();
        for ring in polygon {
            for (i, point) in ring.iter().enumerate() {
                let (x, y) = self.to_screen(*point);
                let cmd = if i == 0 { 'M' } else { 'L' };
                d.push_str(&format!("{}{:.1},{:.1} ", cmd, x, y));
            }
            d.push_str("Z ");
        }
        d.trim_end().to_string()
    }

    pub(crate) fn clip_rect(&self, id: &str) -> String {
        format!(
            r#"<clipPath id="{}"><rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}"/></clipPath>"#,
            id, self.left, self.top, self.width, self.height
        )
    }
}

/// Render a choropleth of joined boundaries
///
/// **Public** - main entry point for district maps
///
/// Cells are shaded on a blue scale between the smallest and largest
/// defined values; cells without a value are grey.
///
/// # Errors
/// * `RenderError::EmptyData` - no boundaries to draw
pub fn render_choropleth(
    joined: &[JoinedBoundary<'_>],
    title: &str,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    if joined.is_empty() {
        return Err(RenderError::EmptyData(format!("no boundaries for map '{}'", title)));
    }

    info!("Rendering map '{}' with {} boundaries", title, joined.len());

    let range = joined
        .iter()
        .filter_map(|j| j.value)
        .fold(None, |acc: Option<(f64, f64)>, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        });

    let viewport = Viewport::fit(config, COLORBAR_WIDTH);
    let mut svg = svg_header(config.width, config.height);
    svg.push_str(&svg_title(config.width, title));
    svg.push_str("<defs>");
    svg.push_str(&viewport.clip_rect("map-clip"));
    svg.push_str("</defs>");
    svg.push_str(r#"<g clip-path="url(#map-clip)" stroke="lightgrey" stroke-width="1" fill-rule="evenodd">"#);

    for cell in joined {
        let fill = match (cell.value, range) {
            (Some(v), Some((lo, hi))) => blues(if hi > lo { (v - lo) / (hi - lo) } else { 1.0 }),
            _ => NO_DATA_FILL.to_string(),
        };
        let label = match (cell.boundary.district, cell.value) {
            (Some(d), Some(v)) => format!("{} ({}): {}", cell.boundary.neighbourhood, d, format_value(v)),
            _ => format!("{}: no data", cell.boundary.neighbourhood),
        };
        for polygon in &cell.boundary.polygons {
            svg.push_str(&format!(
                r#"<path d="{}" fill="{}"><title>{}</title></path>"#,
                viewport.path(polygon),
                fill,
                escape(&label)
            ));
        }
    }
    svg.push_str("</g>");

    if let Some((lo, hi)) = range {
        render_colorbar(&mut svg, &viewport, lo, hi);
    }

    svg.push_str("</svg>");
    info!("Map rendered ({} bytes)", svg.len());
    Ok(svg)
}

/// Vertical colour bar to the right of the map
fn render_colorbar(out: &mut String, viewport: &Viewport, lo: f64, hi: f64) {
    let x = viewport.left + viewport.width + 20.0;
    let top = viewport.top;
    let height = viewport.height;
    let steps = 50;
    let step_h = height / steps as f64;

    for i in 0..steps {
        let t = 1.0 - (i as f64 + 0.5) / steps as f64;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="18" height="{:.2}" fill="{}"/>"#,
            x,
            top + i as f64 * step_h,
            step_h + 0.5,
            blues(t)
        ));
    }
    out.push_str(&format!(
        r#"<rect x="{:.1}" y="{:.1}" width="18" height="{:.1}" fill="none" stroke="grey"/>"#,
        x, top, height
    ));

    for (value, y) in [(hi, top), (lo, top + height)] {
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" dx="24" dy="4" font-family="sans-serif" font-size="12">{}</text>"#,
            x,
            y,
            format_value(value)
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{project, Boundary};
    use crate::reference::District;

    fn square(district: u8) -> Boundary {
        let ring = vec![
            project(2.30, 48.84),
            project(2.36, 48.84),
            project(2.36, 48.88),
            project(2.30, 48.88),
            project(2.30, 48.84),
        ];
        let district = District::new(district);
        Boundary {
            neighbourhood: district.map(|d| d.name().to_string()).unwrap_or_default(),
            district,
            polygons: vec![vec![ring]],
        }
    }

    #[test]
    fn test_empty_map() {
        let result = render_choropleth(&[], "Empty", &RenderConfig::default());
        assert!(matches!(result, Err(RenderError::EmptyData(_))));
    }

    #[test]
    fn test_missing_value_is_grey() {
        let a = square(1);
        let b = square(2);
        let joined = vec![
            JoinedBoundary { boundary: &a, value: Some(4.0) },
            JoinedBoundary { boundary: &b, value: None },
        ];
        let svg = render_choropleth(&joined, "Density", &RenderConfig::default()).unwrap();

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains(NO_DATA_FILL));
        assert!(svg.contains("Bourse: no data"));
        assert!(svg.contains("Louvre (1): 4"));
    }

    #[test]
    fn test_viewport_keeps_city_inside() {
        let viewport = Viewport::fit(&RenderConfig::default(), COLORBAR_WIDTH);
        assert!(viewport.contains(viewport.to_screen(project(2.3499, 48.8530))));
        assert!(!viewport.contains(viewport.to_screen(project(3.5, 48.85))));
    }
}
