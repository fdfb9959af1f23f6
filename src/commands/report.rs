//! Report command implementation.
//!
//! The report command:
//! 1. Reads the history table
//! 2. Aggregates district metrics and period series
//! 3. Writes the metrics report
//! 4. Renders the district maps
//! 5. Renders the animation frames and the animation
//! 6. Renders the charts

use super::models::{ReportArgs, ReportSummary};
use crate::aggregator::{
    average_price, listing_density, listings_per_period, mean_price_per_period,
    review_intensity, reviews_per_period, room_type_mix, DistrictMetricTable, PeriodSeriesTable,
    Split,
};
use crate::geo::{join_metric, load_boundaries, Boundary};
use crate::history::Consolidated;
use crate::ingest::NormalizeReport;
use crate::output::{read_history, slug, write_metrics, write_svg, MetricsReport};
use crate::reference::DistrictReference;
use crate::render::{
    render_animation, render_choropleth, render_dual_axis, render_frame, render_room_type_mix,
    render_series, FrameData,
};
use anyhow::{Context, Result};
use log::{debug, info};
use std::path::PathBuf;
use std::time::Instant;

/// Execute the report command from a persisted history
///
/// **Public** - main entry point called from main.rs
///
/// # Errors
/// * History file missing or malformed
/// * Boundary file missing or malformed
/// * Render or write failures
pub fn execute_report(args: &ReportArgs) -> Result<ReportSummary> {
    info!("Reading history from {}", args.history_path.display());
    let history = read_history(&args.history_path)
        .with_context(|| format!("Failed to read history {}", args.history_path.display()))?;
    let consolidated =
        Consolidated::from_history(history).context("History table has no rows")?;

    generate_report(&consolidated, None, args)
}

/// Aggregate, render and write every artifact for a consolidated history
///
/// **Public** - shared by the report and run commands
///
/// # Arguments
/// * `consolidated` - history and latest-period view
/// * `normalization` - findings of the consolidation, when it ran in this process
/// * `args` - output locations and render settings
pub fn generate_report(
    consolidated: &Consolidated,
    normalization: Option<NormalizeReport>,
    args: &ReportArgs,
) -> Result<ReportSummary> {
    let start_time = Instant::now();
    let mut artifacts = Vec::new();

    info!(
        "Reporting on {} rows, latest period {}",
        consolidated.history.len(),
        consolidated.latest_period
    );

    // Step 1: Aggregate
    info!("Step 1/5: Aggregating metrics...");
    let latest = &consolidated.latest;
    let districts = vec![
        listing_density(latest, DistrictReference::builtin()),
        review_intensity(latest),
        average_price(latest),
    ];
    let mix = room_type_mix(latest);

    let history = &consolidated.history;
    let reviews = reviews_per_period(history, Split::Total);
    let listings = listings_per_period(history, Split::Total);
    let listings_by_type = listings_per_period(history, Split::ByRoomType);
    let price = mean_price_per_period(history, Split::Total);
    let price_by_type = mean_price_per_period(history, Split::ByRoomType);

    // Step 2: Metrics report
    info!("Step 2/5: Writing metrics report...");
    let report = MetricsReport::new(
        consolidated,
        normalization,
        districts.clone(),
        mix.clone(),
        vec![
            reviews.clone(),
            listings.clone(),
            listings_by_type.clone(),
            price.clone(),
            price_by_type.clone(),
        ],
    );
    let metrics_path = args.metrics_path();
    write_metrics(&report, &metrics_path).context("Failed to write metrics report")?;
    artifacts.push(metrics_path);

    // Step 3: Maps
    info!("Step 3/5: Rendering district maps...");
    let boundaries = load_boundaries(&args.boundaries)
        .with_context(|| format!("Failed to load boundaries {}", args.boundaries.display()))?;
    for table in &districts {
        artifacts.push(write_map(&boundaries, table, args)?);
    }

    // Step 4: Animation
    info!("Step 4/5: Rendering {} animation frames...", report.periods.len());
    let frames: Vec<FrameData> = report
        .periods
        .iter()
        .map(|period| FrameData::from_listings(period.clone(), history))
        .collect();
    for frame in &frames {
        let svg = render_frame(&boundaries, frame, &args.render_config)
            .with_context(|| format!("Failed to render frame {}", frame.period))?;
        let path = args
            .frames_dir()
            .join(format!("gif-frame-{}.svg", frame.period));
        write_svg(&svg, &path).context("Failed to write animation frame")?;
        artifacts.push(path);
    }
    let animation = render_animation(&boundaries, &frames, args.frame_rate, &args.render_config)
        .context("Failed to render animation")?;
    let animation_path = args.animation_path();
    write_svg(&animation, &animation_path).context("Failed to write animation")?;
    artifacts.push(animation_path);

    // Step 5: Charts
    info!("Step 5/5: Rendering charts...");
    let svg = render_room_type_mix(&mix, &args.render_config)
        .context("Failed to render room type chart")?;
    artifacts.push(write_chart(&svg, &mix.title, args)?);

    let series: [(&PeriodSeriesTable, &str); 5] = [
        (&reviews, "Number of Reviews"),
        (&listings, "Number of Listings"),
        (&listings_by_type, "Number of Listings"),
        (&price, "Price"),
        (&price_by_type, "Price"),
    ];
    for (table, y_label) in series {
        let svg = render_series(table, y_label, &args.render_config)
            .with_context(|| format!("Failed to render chart '{}'", table.title))?;
        artifacts.push(write_chart(&svg, &table.title, args)?);
    }

    let svg = render_dual_axis(&listings, &reviews, &args.render_config)
        .context("Failed to render listings vs reviews chart")?;
    artifacts.push(write_chart(
        &svg,
        "Evolution of the Number of Listings vs Reviews",
        args,
    )?);

    info!(
        "✓ Report completed: {} artifacts in {:.2}s",
        artifacts.len(),
        start_time.elapsed().as_secs_f64()
    );

    Ok(ReportSummary {
        periods: report.periods.len(),
        latest_period: report.latest_period.to_string(),
        history_rows: report.history_rows,
        latest_rows: report.latest_rows,
        unmapped_rows: report.unmapped_rows,
        artifacts,
    })
}

/// Render and write one district map
///
/// **Private** - internal helper for generate_report
fn write_map(
    boundaries: &[Boundary],
    table: &DistrictMetricTable,
    args: &ReportArgs,
) -> Result<PathBuf> {
    let joined = join_metric(boundaries, table);
    debug!(
        "Map '{}': {} of {} boundaries have a value",
        table.title,
        joined.iter().filter(|j| j.value.is_some()).count(),
        joined.len()
    );

    let svg = render_choropleth(&joined, &table.title, &args.render_config)
        .with_context(|| format!("Failed to render map '{}'", table.title))?;
    let path = args
        .graphs_dir
        .join(format!("map-lastm-{}.svg", slug(&table.title)));
    write_svg(&svg, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Write one chart under its title slug
///
/// **Private** - internal helper for generate_report
fn write_chart(svg: &str, title: &str, args: &ReportArgs) -> Result<PathBuf> {
    let path = args
        .graphs_dir
        .join(format!("hist-graph-{}.svg", slug(title)));
    write_svg(svg, &path).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

/// Validate report arguments
///
/// **Public** - can be called before execute_report for early validation
pub fn validate_report_args(args: &ReportArgs) -> Result<()> {
    if args.frame_rate == 0 {
        anyhow::bail!("frame_rate must be greater than 0");
    }

    if args.frame_rate > 60 {
        anyhow::bail!("frame_rate is too large (max 60)");
    }

    if args.render_config.width < 200 || args.render_config.height < 200 {
        anyhow::bail!("Image size must be at least 200x200");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RenderConfig;

    #[test]
    fn test_validate_report_args_valid() {
        assert!(validate_report_args(&ReportArgs::default()).is_ok());
    }

    #[test]
    fn test_validate_report_args_frame_rate() {
        let args = ReportArgs {
            frame_rate: 0,
            ..Default::default()
        };
        assert!(validate_report_args(&args).is_err());
    }

    #[test]
    fn test_validate_report_args_small_canvas() {
        let args = ReportArgs {
            render_config: RenderConfig::new().with_size(100, 640),
            ..Default::default()
        };
        assert!(validate_report_args(&args).is_err());
    }
}
