//! Shared fixtures for integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::Path;

pub const HEADER: &str = "id,name,host_id,host_name,neighbourhood_group,neighbourhood,latitude,longitude,room_type,price,minimum_nights,number_of_reviews,last_review,reviews_per_month,calculated_host_listings_count,availability_365";

/// June 2019: three rows, the second one never reviewed
pub const JUNE: &str = r#"1,Loft near Louvre,10,Ann,,Louvre,48.8610,2.3350,Entire home/apt,120,2,14,2019-05-28,1.2,1,300
2,,11,,,Temple,48.8630,2.3610,Private room,55,1,0,,,2,120
3,Canal view,12,Bob,,Entrepôt,48.8720,2.3620,Entire home/apt,"$1,050.00",3,40,2019-06-01,2.5,1,10"#;

/// July 2019: two rows
pub const JULY: &str = "\
1,Loft near Louvre,10,Ann,,Louvre,48.8610,2.3350,Entire home/apt,125,2,16,2019-07-02,1.3,1,290
4,Hotel suite,13,Cyd,,Opéra,48.8720,2.3320,Hotel room,210,1,5,2019-06-30,0.8,4,365";

pub fn snapshot_csv(rows: &str) -> String {
    format!("{}\n{}\n", HEADER, rows)
}

/// Write `{period}.csv` files into `dir`
pub fn write_snapshots(dir: &Path, snapshots: &[(&str, &str)]) {
    fs::create_dir_all(dir).unwrap();
    for (period, rows) in snapshots {
        fs::write(dir.join(format!("{}.csv", period)), snapshot_csv(rows)).unwrap();
    }
}

/// Two square neighbourhoods around the centre of the city
pub const BOUNDARIES: &str = r#"{"type":"FeatureCollection","features":[
  {"type":"Feature","properties":{"neighbourhood":"Louvre","neighbourhood_group":null},
   "geometry":{"type":"Polygon","coordinates":[[[2.32,48.855],[2.35,48.855],[2.35,48.87],[2.32,48.87],[2.32,48.855]]]}},
  {"type":"Feature","properties":{"neighbourhood":"Temple","neighbourhood_group":null},
   "geometry":{"type":"MultiPolygon","coordinates":[[[[2.35,48.855],[2.37,48.855],[2.37,48.87],[2.35,48.87],[2.35,48.855]]]]}}
]}"#;
