use serde::Serialize;

/// A named place flows start from or end at.
///
/// `id` is expected to be unique within one dataset; nothing enforces it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Location {
    pub id: String,
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

/// Aggregated movement between two locations.
///
/// `origin` and `dest` reference [`Location::id`]; unresolved references are
/// kept as-is.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Flow {
    pub origin: String,
    pub dest: String,
    pub count: f64,
}

/// Both tables of one dataset snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Dataset {
    pub locations: Vec<Location>,
    pub flows: Vec<Flow>,
}

impl Dataset {
    pub fn new(locations: Vec<Location>, flows: Vec<Flow>) -> Self {
        Self { locations, flows }
    }

    /// Number of locations with a NaN coordinate and flows with a NaN count.
    pub fn nan_counts(&self) -> (usize, usize) {
        let locations = self
            .locations
            .iter()
            .filter(|l| l.lat.is_nan() || l.lon.is_nan())
            .count();
        let flows = self.flows.iter().filter(|f| f.count.is_nan()).count();
        (locations, flows)
    }
}
