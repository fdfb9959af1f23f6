//! The twenty Paris districts (arrondissements).
//!
//! Catalog files name neighbourhoods after the official district names
//! ("Louvre", "Bourse", ...). Housing stock per district comes from the APUR
//! survey: https://www.apur.org/dataviz/portraits-metropole-grand-paris-donnees/

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Number of districts in the city
pub const DISTRICT_COUNT: u8 = 20;

/// Neighbourhood name as published in the catalog, with its district code
const NEIGHBOURHOOD_DISTRICTS: [(&str, u8); 20] = [
    ("Louvre", 1),
    ("Bourse", 2),
    ("Temple", 3),
    ("Hôtel-de-Ville", 4),
    ("Panthéon", 5),
    ("Luxembourg", 6),
    ("Palais-Bourbon", 7),
    ("Élysée", 8),
    ("Opéra", 9),
    ("Entrepôt", 10),
    ("Popincourt", 11),
    ("Reuilly", 12),
    ("Gobelins", 13),
    ("Observatoire", 14),
    ("Vaugirard", 15),
    ("Passy", 16),
    ("Batignolles-Monceau", 17),
    ("Buttes-Montmartre", 18),
    ("Buttes-Chaumont", 19),
    ("Ménilmontant", 20),
];

/// Total accommodations per district
const DISTRICT_ACCOMMODATIONS: [(u8, u32); 20] = [
    (1, 13_679),
    (2, 17_200),
    (3, 26_058),
    (4, 22_648),
    (5, 39_669),
    (6, 31_443),
    (7, 39_320),
    (8, 26_950),
    (9, 40_520),
    (10, 58_737),
    (11, 99_582),
    (12, 85_155),
    (13, 102_416),
    (14, 83_247),
    (15, 149_992),
    (16, 102_656),
    (17, 105_080),
    (18, 121_481),
    (19, 94_756),
    (20, 105_850),
];

lazy_static! {
    static ref DISTRICT_BY_NAME: HashMap<&'static str, District> = NEIGHBOURHOOD_DISTRICTS
        .iter()
        .map(|&(name, code)| (name, District(code)))
        .collect();
    static ref BUILTIN_REFERENCE: DistrictReference = DistrictReference::new(
        DISTRICT_ACCOMMODATIONS
            .iter()
            .map(|&(code, count)| (District(code), count)),
    );
}

/// A district code, always within 1..=20
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct District(u8);

impl District {
    /// Build a district from its code, `None` outside 1..=20
    pub fn new(code: u8) -> Option<Self> {
        (1..=DISTRICT_COUNT).contains(&code).then_some(Self(code))
    }

    pub fn code(self) -> u8 {
        self.0
    }

    /// Every district in code order
    pub fn all() -> impl Iterator<Item = District> {
        (1..=DISTRICT_COUNT).map(District)
    }

    /// Official neighbourhood name of this district
    pub fn name(self) -> &'static str {
        NEIGHBOURHOOD_DISTRICTS
            .iter()
            .find(|(_, code)| *code == self.0)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }
}

impl TryFrom<u8> for District {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        District::new(code).ok_or_else(|| format!("district code out of range: {}", code))
    }
}

impl From<District> for u8 {
    fn from(district: District) -> Self {
        district.0
    }
}

impl fmt::Display for District {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Map a catalog neighbourhood name to its district
///
/// Surrounding whitespace is ignored; anything else must match exactly.
pub fn district_for_neighbourhood(name: &str) -> Option<District> {
    DISTRICT_BY_NAME.get(name.trim()).copied()
}

/// Accommodation counts keyed by district
///
/// Immutable once built. Production code uses [`DistrictReference::builtin`].
#[derive(Debug, Clone, PartialEq)]
pub struct DistrictReference {
    accommodations: BTreeMap<District, u32>,
}

impl DistrictReference {
    pub fn new(entries: impl IntoIterator<Item = (District, u32)>) -> Self {
        Self {
            accommodations: entries.into_iter().collect(),
        }
    }

    /// The bundled survey table
    pub fn builtin() -> &'static DistrictReference {
        &BUILTIN_REFERENCE
    }

    /// Accommodation count, `None` when the district is absent from the table
    pub fn accommodations(&self, district: District) -> Option<u32> {
        self.accommodations.get(&district).copied()
    }

    pub fn len(&self) -> usize {
        self.accommodations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accommodations.is_empty()
    }
}
