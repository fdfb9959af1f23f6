//! Time-series scatter charts and the room-type bar chart.

use super::{escape, format_value, nice_ticks, svg_header, svg_title, RenderConfig, PALETTE};
use crate::aggregator::{PeriodSeriesTable, RoomTypeMix};
use crate::ingest::{Period, RoomType};
use crate::utils::error::RenderError;
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet};

const MARGIN_LEFT: f64 = 90.0;
const MARGIN_RIGHT: f64 = 200.0;
const MARGIN_TOP: f64 = 60.0;
const MARGIN_BOTTOM: f64 = 60.0;

/// Drawing area inside the axes
#[derive(Debug, Clone, Copy)]
struct PlotArea {
    left: f64,
    top: f64,
    width: f64,
    height: f64,
}

impl PlotArea {
    fn new(config: &RenderConfig) -> Self {
        Self {
            left: MARGIN_LEFT,
            top: MARGIN_TOP,
            width: (config.width as f64 - MARGIN_LEFT - MARGIN_RIGHT).max(1.0),
            height: (config.height as f64 - MARGIN_TOP - MARGIN_BOTTOM).max(1.0),
        }
    }

    fn right(&self) -> f64 {
        self.left + self.width
    }

    fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

/// Linear mapping from a data range onto a pixel range
#[derive(Debug, Clone, Copy)]
struct Scale {
    lo: f64,
    hi: f64,
    from: f64,
    to: f64,
}

impl Scale {
    fn map(&self, value: f64) -> f64 {
        self.from + (value - self.lo) / (self.hi - self.lo) * (self.to - self.from)
    }
}

/// Months since year 0, so that periods space evenly on the x axis
fn month_index(period: &Period) -> f64 {
    f64::from(period.year() * 12 + period.month() as i32 - 1)
}

fn x_scale(periods: &[&Period], area: &PlotArea) -> Scale {
    let lo = periods.iter().map(|p| month_index(p)).fold(f64::INFINITY, f64::min);
    let hi = periods.iter().map(|p| month_index(p)).fold(f64::NEG_INFINITY, f64::max);
    Scale {
        lo: lo - 1.0,
        hi: hi + 1.0,
        from: area.left,
        to: area.right(),
    }
}

/// Value axis from zero (or the smallest negative value) with headroom
fn y_scale(values: impl Iterator<Item = f64>, from: f64, to: f64) -> (Scale, Vec<f64>) {
    let (lo, hi) = values.fold((0.0_f64, 0.0_f64), |(lo, hi), v| (lo.min(v), hi.max(v)));
    let hi = if hi > lo { hi * 1.05 } else { lo + 1.0 };
    let ticks = nice_ticks(lo, hi, 5);
    (Scale { lo, hi, from, to }, ticks)
}

/// Year labels on the January of each year, or every period on short spans
fn render_x_axis(out: &mut String, periods: &[&Period], scale: &Scale, area: &PlotArea) {
    out.push_str(&format!(
        r#"<line x1="{:.1}" y1="{b:.1}" x2="{:.1}" y2="{b:.1}" stroke="black"/>"#,
        area.left,
        area.right(),
        b = area.bottom()
    ));

    let unique: BTreeSet<&Period> = periods.iter().copied().collect();
    let first = unique.first().map(|p| p.year()).unwrap_or_default();
    let last = unique.last().map(|p| p.year()).unwrap_or_default();

    let ticks: Vec<(f64, String)> = if unique.len() <= 6 {
        unique
            .iter()
            .map(|p| (month_index(p), p.as_str().to_string()))
            .collect()
    } else {
        (first..=last)
            .map(|year| (f64::from(year * 12), year.to_string()))
            .filter(|(x, _)| *x >= scale.lo && *x <= scale.hi)
            .collect()
    };

    for (value, label) in ticks {
        let x = scale.map(value);
        out.push_str(&format!(
            r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="black"/><text x="{x:.1}" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="middle">{}</text>"#,
            area.bottom(),
            area.bottom() + 5.0,
            area.bottom() + 20.0,
            escape(&label),
            x = x
        ));
    }
}

/// Vertical value axis on the left or right edge of the plot
fn render_y_axis(
    out: &mut String,
    scale: &Scale,
    ticks: &[f64],
    area: &PlotArea,
    label: &str,
    color: &str,
    right_side: bool,
) {
    let x = if right_side { area.right() } else { area.left };
    let (tick_end, anchor, label_x) = if right_side {
        (x + 5.0, "start", x + 70.0)
    } else {
        (x - 5.0, "end", x - 70.0)
    };

    out.push_str(&format!(
        r#"<line x1="{x:.1}" y1="{:.1}" x2="{x:.1}" y2="{:.1}" stroke="black"/>"#,
        area.top,
        area.bottom(),
        x = x
    ));
    for &tick in ticks {
        let y = scale.map(tick);
        let text_x = if right_side { tick_end + 3.0 } else { tick_end - 3.0 };
        out.push_str(&format!(
            r#"<line x1="{:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="black"/><text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="{}" fill="{}">{}</text>"#,
            x,
            tick_end,
            text_x,
            y + 4.0,
            anchor,
            color,
            format_value(tick),
            y = y
        ));
    }

    let mid = area.top + area.height / 2.0;
    out.push_str(&format!(
        r#"<text x="{lx:.1}" y="{my:.1}" font-family="sans-serif" font-size="14" text-anchor="middle" fill="{}" transform="rotate(-90 {lx:.1} {my:.1})">{}</text>"#,
        color,
        escape(label),
        lx = label_x,
        my = mid
    ));
}

/// Legend entries stacked to the right of the plot
fn render_legend(out: &mut String, area: &PlotArea, offset: f64, entries: &[(String, &str)]) {
    let x = area.right() + offset;
    for (i, (label, color)) in entries.iter().enumerate() {
        let y = area.top + 10.0 + i as f64 * 22.0;
        out.push_str(&format!(
            r#"<rect x="{:.1}" y="{:.1}" width="12" height="12" fill="{}"/><text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12">{}</text>"#,
            x,
            y - 10.0,
            color,
            x + 18.0,
            y,
            escape(label)
        ));
    }
}

fn scatter(out: &mut String, points: &[(f64, f64)], color: &str, title: &str) {
    out.push_str(&format!(r#"<g fill="{}"><title>{}</title>"#, color, escape(title)));
    for (x, y) in points {
        out.push_str(&format!(r#"<circle cx="{:.1}" cy="{:.1}" r="4"/>"#, x, y));
    }
    out.push_str("</g>");
}

/// Scatter plot of a period series, one colour per room type
///
/// **Public** - used for the listing count, review count and price charts
///
/// # Errors
/// * `RenderError::EmptyData` - the table has no defined value
pub fn render_series(
    table: &PeriodSeriesTable,
    y_label: &str,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let defined: Vec<(&Period, f64)> = table
        .rows
        .iter()
        .filter_map(|row| row.value.map(|v| (&row.period, v)))
        .collect();
    if defined.is_empty() {
        return Err(RenderError::EmptyData(format!("no values for chart '{}'", table.title)));
    }

    info!("Rendering chart '{}'", table.title);

    let area = PlotArea::new(config);
    let periods: Vec<&Period> = defined.iter().map(|(p, _)| *p).collect();
    let xs = x_scale(&periods, &area);
    let (ys, y_ticks) = y_scale(defined.iter().map(|(_, v)| *v), area.bottom(), area.top);

    let mut svg = svg_header(config.width, config.height);
    svg.push_str(&svg_title(config.width, &table.title));
    render_x_axis(&mut svg, &periods, &xs, &area);
    render_y_axis(&mut svg, &ys, &y_ticks, &area, y_label, "black", false);

    let series = table.series();
    let mut legend = Vec::with_capacity(series.len());
    for (i, (room_type, values)) in series.iter().enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        let label = room_type
            .as_ref()
            .map(|r| r.label().to_string())
            .unwrap_or_else(|| y_label.to_string());
        let points: Vec<(f64, f64)> = values
            .iter()
            .filter_map(|(period, value)| value.map(|v| (xs.map(month_index(period)), ys.map(v))))
            .collect();
        debug!("Series '{}': {} points", label, points.len());
        scatter(&mut svg, &points, color, &label);
        legend.push((label, color));
    }
    if room_types_present(&series) {
        render_legend(&mut svg, &area, 20.0, &legend);
    }

    svg.push_str("</svg>");
    Ok(svg)
}

fn room_types_present<V>(series: &BTreeMap<Option<RoomType>, V>) -> bool {
    series.keys().any(Option::is_some)
}

/// Listings (left axis) against reviews (right axis) over time
///
/// **Public** - chart "Evolution of the Number of Listings vs Reviews"
///
/// # Arguments
/// * `listings` - unsplit listing counts per period
/// * `reviews` - unsplit review totals per period
///
/// # Errors
/// * `RenderError::EmptyData` - either table has no defined value
pub fn render_dual_axis(
    listings: &PeriodSeriesTable,
    reviews: &PeriodSeriesTable,
    config: &RenderConfig,
) -> Result<String, RenderError> {
    let title = "Evolution of the Number of Listings vs Reviews";
    let left: Vec<(&Period, f64)> = defined_total(listings);
    let right: Vec<(&Period, f64)> = defined_total(reviews);
    if left.is_empty() || right.is_empty() {
        return Err(RenderError::EmptyData(format!("no values for chart '{}'", title)));
    }

    info!("Rendering chart '{}'", title);

    let area = PlotArea::new(config);
    let periods: Vec<&Period> = left.iter().chain(right.iter()).map(|(p, _)| *p).collect();
    let xs = x_scale(&periods, &area);
    let (left_scale, left_ticks) = y_scale(left.iter().map(|(_, v)| *v), area.bottom(), area.top);
    let (right_scale, right_ticks) =
        y_scale(right.iter().map(|(_, v)| *v), area.bottom(), area.top);

    let listings_color = PALETTE[0];
    let reviews_color = PALETTE[1];

    let mut svg = svg_header(config.width, config.height);
    svg.push_str(&svg_title(config.width, title));
    render_x_axis(&mut svg, &periods, &xs, &area);
    render_y_axis(&mut svg, &left_scale, &left_ticks, &area, "Number of Listings", listings_color, false);
    render_y_axis(&mut svg, &right_scale, &right_ticks, &area, "Number of Reviews", reviews_color, true);

    scatter(&mut svg, &to_points(&left, &xs, &left_scale), listings_color, "Listings");
    scatter(&mut svg, &to_points(&right, &xs, &right_scale), reviews_color, "Reviews");

    svg.push_str("</svg>");
    Ok(svg)
}

fn to_points(values: &[(&Period, f64)], xs: &Scale, ys: &Scale) -> Vec<(f64, f64)> {
    values
        .iter()
        .map(|(p, v)| (xs.map(month_index(p)), ys.map(*v)))
        .collect()
}

fn defined_total(table: &PeriodSeriesTable) -> Vec<(&Period, f64)> {
    table
        .rows
        .iter()
        .filter(|row| row.room_type.is_none())
        .filter_map(|row| row.value.map(|v| (&row.period, v)))
        .collect()
}

/// Grouped bars of room-type shares per district
///
/// **Public** - chart "Listing Types per District"
///
/// # Errors
/// * `RenderError::EmptyData` - no district has listings
pub fn render_room_type_mix(mix: &RoomTypeMix, config: &RenderConfig) -> Result<String, RenderError> {
    if mix.rows.is_empty() || mix.room_types.is_empty() {
        return Err(RenderError::EmptyData(format!("no values for chart '{}'", mix.title)));
    }

    info!("Rendering chart '{}' ({} districts)", mix.title, mix.rows.len());

    let area = PlotArea::new(config);
    let ys = Scale {
        lo: 0.0,
        hi: 110.0,
        from: area.bottom(),
        to: area.top,
    };
    let y_ticks: Vec<f64> = (0..=5).map(|i| f64::from(i) * 20.0).collect();

    let mut svg = svg_header(config.width, config.height);
    svg.push_str(&svg_title(config.width, &mix.title));
    render_y_axis(
        &mut svg,
        &ys,
        &y_ticks,
        &area,
        "Percentage of Total District Listings",
        "black",
        false,
    );
    svg.push_str(&format!(
        r#"<line x1="{:.1}" y1="{b:.1}" x2="{:.1}" y2="{b:.1}" stroke="black"/>"#,
        area.left,
        area.right(),
        b = area.bottom()
    ));

    let group_width = area.width / mix.rows.len() as f64;
    let bar_width = group_width * 0.8 / mix.room_types.len() as f64;

    for (g, row) in mix.rows.iter().enumerate() {
        let group_left = area.left + g as f64 * group_width + group_width * 0.1;
        for (i, share) in row.shares.iter().enumerate() {
            let Some(share) = share else { continue };
            let top = ys.map(*share);
            svg.push_str(&format!(
                r#"<rect x="{:.1}" y="{:.1}" width="{:.1}" height="{:.1}" fill="{}"><title>{} {}: {}%</title></rect>"#,
                group_left + i as f64 * bar_width,
                top,
                bar_width,
                area.bottom() - top,
                PALETTE[i % PALETTE.len()],
                row.district.name(),
                escape(mix.room_types[i].label()),
                format_value(*share)
            ));
        }
        svg.push_str(&format!(
            r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="12" text-anchor="middle">{}</text>"#,
            area.left + (g as f64 + 0.5) * group_width,
            area.bottom() + 20.0,
            row.district
        ));
    }
    svg.push_str(&format!(
        r#"<text x="{:.1}" y="{:.1}" font-family="sans-serif" font-size="14" text-anchor="middle">District</text>"#,
        area.left + area.width / 2.0,
        area.bottom() + 45.0
    ));

    let legend: Vec<(String, &str)> = mix
        .room_types
        .iter()
        .enumerate()
        .map(|(i, r)| (r.label().to_string(), PALETTE[i % PALETTE.len()]))
        .collect();
    render_legend(&mut svg, &area, 20.0, &legend);

    svg.push_str("</svg>");
    Ok(svg)
}
