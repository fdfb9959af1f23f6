//! Listing-count animation: one dot map per collection period.

use super::map::Viewport;
use super::{escape, svg_header, RenderConfig};
use crate::geo::{project, Boundary, Point};
use crate::ingest::{Listing, Period};
use crate::utils::config::{MAP_X_RANGE, MAP_Y_RANGE};
use crate::utils::error::RenderError;
use log::{debug, info};

/// Everything needed to draw one period
#[derive(Debug, Clone, PartialEq)]
pub struct FrameData {
    pub period: Period,
    pub points: Vec<Point>,

    /// Listings in the period, located or not
    pub listings: usize,
}

impl FrameData {
    /// Project the listings of one period
    ///
    /// Listings without coordinates are counted but not drawn.
    pub fn from_listings(period: Period, listings: &[Listing]) -> Self {
        let in_period: Vec<&Listing> = listings.iter().filter(|l| l.period == period).collect();
        let points = in_period
            .iter()
            .filter_map(|l| Some(project(l.longitude?, l.latitude?)))
            .collect();
        Self {
            period,
            points,
            listings: in_period.len(),
        }
    }

    pub fn listing_count(&self) -> usize {
        self.listings
    }
}

/// Render a single period as a standalone SVG
///
/// # Errors
/// * `RenderError::EmptyData` - no boundaries to draw the city outline
pub fn render_frame(
    boundaries: &[Boundary],
    frame: &FrameData,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    if boundaries.is_empty() {
        return Err(RenderError::EmptyData("no boundaries for frame".to_string()));
    }
    debug!(
        "Rendering frame {} ({} listings)",
        frame.period,
        frame.listing_count()
    );

    let viewport = Viewport::fit(config, 0.0);
    let mut svg = svg_header(config.width, config.height);
    svg.push_str(&render_outline(boundaries, &viewport));
    svg.push_str(&render_frame_body(frame, &viewport));
    svg.push_str("</svg>");
    Ok(svg)
}

/// Render every period into one looping animated SVG
///
/// Frames are shown in period order at `frame_rate` frames per second.
///
/// # Errors
/// * `RenderError::EmptyData` - no frames or no boundaries
pub fn render_animation(
    boundaries: &[Boundary],
    frames: &[FrameData],
    frame_rate: u32,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    if frames.is_empty() {
        return Err(RenderError::EmptyData("no frames for animation".to_string()));
    }
    if boundaries.is_empty() {
        return Err(RenderError::EmptyData("no boundaries for animation".to_string()));
    }

    let mut ordered: Vec<&FrameData> = frames.iter().collect();
    ordered.sort_by(|a, b| a.period.cmp(&b.period));

    let n = ordered.len();
    let duration = n as f64 / f64::from(frame_rate.max(1));
    info!("Rendering animation: {} frames, {:.2}s loop", n, duration);

    let viewport = Viewport::fit(config, 0.0);
    let mut svg = svg_header(config.width, config.height);
    svg.push_str(&render_outline(boundaries, &viewport));

    for (i, frame) in ordered.iter().enumerate() {
        let start = i as f64 / n as f64;
        let end = (i + 1) as f64 / n as f64;
        svg.push_str(&format!(
            r#"<g visibility="hidden"><animate attributeName="visibility" values="hidden;visible;hidden" keyTimes="0;{:.4};{:.4}" dur="{:.3}s" calcMode="discrete" repeatCount="indefinite"/>"#,
            start, end, duration
        ));
        svg.push_str(&render_frame_body(frame, &viewport));
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    info!("Animation rendered ({} bytes)", svg.len());
    Ok(svg)
}

/// Grey district outlines under the dots
fn render_outline(boundaries: &[Boundary], viewport: &Viewport) -> String {
    let mut out = String::from(r#"<g fill="lightgray" stroke="white" stroke-width="1" fill-rule="evenodd">"#);
    for boundary in boundaries {
        for polygon in &boundary.polygons {
            out.push_str(&format!(r#"<path d="{}"/>"#, viewport.path(polygon)));
        }
    }
    out.push_str("</g>");
    out
}

/// Dots plus the year / month / count captions
fn render_frame_body(frame: &FrameData, viewport: &Viewport) -> String {
    let mut out = String::from(r#"<g fill="blue" fill-opacity="0.05">"#);
    for point in &frame.points {
        let screen = viewport.to_screen(*point);
        if viewport.contains(screen) {
            out.push_str(&format!(
                r#"<circle cx="{:.1}" cy="{:.1}" r="2"/>"#,
                screen.0, screen.1
            ));
        }
    }
    out.push_str("</g>");

    let (left, top) = viewport.to_screen(Point {
        x: MAP_X_RANGE.0,
        y: MAP_Y_RANGE.1,
    });
    let (right, bottom) = viewport.to_screen(Point {
        x: MAP_X_RANGE.1,
        y: MAP_Y_RANGE.0,
    });
    let at = |fx: f64, fy: f64| (left + fx * (right - left), bottom - fy * (bottom - top));

    let captions = [
        (at(0.10, 0.90), "YEAR:".to_string(), false),
        (at(0.10, 0.86), frame.period.year().to_string(), true),
        (at(0.17, 0.90), "MONTH:".to_string(), false),
        (at(0.17, 0.86), frame.period.month_name(), true),
        (at(0.10, 0.81), "LISTING COUNT:".to_string(), false),
        (at(0.10, 0.77), group_thousands(frame.listing_count()), true),
    ];
    for ((x, y), text, strong) in captions {
        let style = if strong {
            r#"font-size="16" font-weight="bold""#
        } else {
            r#"font-size="11""#
        };
        out.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" {}>{}</text>"#,
            x,
            y,
            style,
            escape(&text)
        ));
    }
    out
}

/// 12345 -> "12,345"
fn group_thousands(n: usize) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::RoomType;

    fn listing(id: u64, latitude: Option<f64>, period: &str) -> Listing {
        Listing {
            id,
            name: "Flat".to_string(),
            host_id: None,
            host_name: "Unknown".to_string(),
            district: None,
            latitude,
            longitude: Some(2.35),
            room_type: RoomType::PrivateRoom,
            price: None,
            minimum_nights: None,
            number_of_reviews: Some(0),
            last_review: None,
            reviews_per_month: None,
            calculated_host_listings_count: None,
            availability_365: None,
            period: Period::parse(period).unwrap(),
        }
    }

    #[test]
    fn test_frame_skips_unlocated_listings() {
        let listings = vec![
            listing(1, Some(48.86), "2019-06"),
            listing(2, None, "2019-06"),
            listing(3, Some(48.85), "2019-07"),
        ];
        let frame = FrameData::from_listings(Period::parse("2019-06").unwrap(), &listings);

        assert_eq!(frame.points.len(), 1);
        assert_eq!(frame.listing_count(), 2);
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(65_432), "65,432");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn test_animation_requires_frames() {
        let result = render_animation(&[], &[], 4, &RenderConfig::default());
        assert!(matches!(result, Err(RenderError::EmptyData(_))));
    }
}
