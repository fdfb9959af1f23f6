mod common;

use common::{JULY, JUNE};
use rental_atlas::aggregator::{
    listings_per_period, review_intensity, reviews_per_period, room_type_mix, Split,
};
use rental_atlas::geo::{join_metric, parse_boundaries};
use rental_atlas::history::{consolidate_snapshots, Consolidated};
use rental_atlas::ingest::{read_rows, NormalizeOptions, Period, Snapshot};
use rental_atlas::render::{
    render_animation, render_choropleth, render_dual_axis, render_frame, render_room_type_mix,
    render_series, FrameData, RenderConfig,
};

fn consolidated() -> Consolidated {
    let snapshots = [("2019-06", JUNE), ("2019-07", JULY)]
        .iter()
        .map(|(period, rows)| Snapshot {
            period: Period::parse(period).unwrap(),
            rows: read_rows(common::snapshot_csv(rows).as_bytes(), period).unwrap(),
        })
        .collect();
    consolidate_snapshots(snapshots, NormalizeOptions::default())
        .unwrap()
        .0
}

#[test]
fn test_boundaries_join_left() {
    let boundaries = parse_boundaries(common::BOUNDARIES).unwrap();
    assert_eq!(boundaries.len(), 2);

    let history = consolidated();
    let table = review_intensity(&history.latest);
    let joined = join_metric(&boundaries, &table);

    assert_eq!(joined.len(), 2);
    assert_eq!(joined[0].value, Some(16.0));
    // Temple has no listing in the latest period
    assert_eq!(joined[1].value, None);
}

#[test]
fn test_choropleth() {
    let boundaries = parse_boundaries(common::BOUNDARIES).unwrap();
    let history = consolidated();
    let table = review_intensity(&history.latest);
    let joined = join_metric(&boundaries, &table);

    let svg = render_choropleth(&joined, &table.title, &RenderConfig::default()).unwrap();

    assert!(svg.contains("Average Number of Reviews per Listing"));
    assert!(svg.contains("Temple: no data"));
    assert_eq!(svg.matches("<path").count(), 2);
}

#[test]
fn test_frame_caption() {
    let boundaries = parse_boundaries(common::BOUNDARIES).unwrap();
    let history = consolidated();
    let frame = FrameData::from_listings(Period::parse("2019-06").unwrap(), &history.history);

    assert_eq!(frame.listing_count(), 3);
    let svg = render_frame(&boundaries, &frame, &RenderConfig::default()).unwrap();
    assert!(svg.contains("YEAR:"));
    assert!(svg.contains(">2019<"));
    assert!(svg.contains(">June<"));
    assert_eq!(svg.matches("<circle").count(), 3);
}

#[test]
fn test_animation_has_one_group_per_period() {
    let boundaries = parse_boundaries(common::BOUNDARIES).unwrap();
    let history = consolidated();
    let frames: Vec<FrameData> = history
        .periods()
        .into_iter()
        .rev()
        .map(|p| FrameData::from_listings(p, &history.history))
        .collect();

    let svg = render_animation(&boundaries, &frames, 4, &RenderConfig::default()).unwrap();

    assert_eq!(svg.matches("<animate ").count(), 2);
    assert!(svg.contains(r#"dur="0.500s""#));
    // frames are shown in period order whatever the input order
    assert!(svg.find(">June<").unwrap() < svg.find(">July<").unwrap());
}

#[test]
fn test_charts() {
    let history = consolidated();
    let config = RenderConfig::default();

    let by_type = listings_per_period(&history.history, Split::ByRoomType);
    let svg = render_series(&by_type, "Number of Listings", &config).unwrap();
    assert!(svg.contains("Entire home/apt"));
    assert!(svg.contains("Hotel room"));

    let listings = listings_per_period(&history.history, Split::Total);
    let reviews = reviews_per_period(&history.history, Split::Total);
    let svg = render_dual_axis(&listings, &reviews, &config).unwrap();
    assert!(svg.contains("Number of Reviews"));

    let mix = room_type_mix(&history.latest);
    let svg = render_room_type_mix(&mix, &config).unwrap();
    assert!(svg.contains("Percentage of Total District Listings"));
    assert_eq!(svg.matches("%</title>").count(), 2);
}
