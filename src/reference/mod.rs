//! Static reference data: neighbourhood -> district, district -> housing stock.

pub mod districts;

pub use districts::{district_for_neighbourhood, District, DistrictReference, DISTRICT_COUNT};
