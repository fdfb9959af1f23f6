//! Geographic boundaries for map rendering.

pub mod boundary;

pub use boundary::{
    join_metric, load_boundaries, parse_boundaries, project, Boundary, JoinedBoundary, Point,
    Polygon, Ring,
};
