use std::collections::HashMap;

use formats::{Dataset, Flow, Location};

use crate::accessors::{FlowRecord, LocationRecord};
use crate::totals::{LocationTotals, location_totals};

/// Immutable session dataset as the flow layer sees it.
///
/// Built once after loading; layers share it behind an `Rc` so a rebuild
/// never copies records.
#[derive(Debug, Clone)]
pub struct FlowmapData<L, F> {
    locations: Vec<L>,
    flows: Vec<F>,
    index: HashMap<String, usize>,
    totals: HashMap<String, LocationTotals>,
}

impl<L: LocationRecord, F: FlowRecord> FlowmapData<L, F> {
    pub fn new(locations: Vec<L>, flows: Vec<F>) -> Self {
        let mut index = HashMap::with_capacity(locations.len());
        for (i, loc) in locations.iter().enumerate() {
            // First occurrence wins on duplicate ids.
            index.entry(loc.location_id().to_string()).or_insert(i);
        }
        let totals = location_totals(&flows);
        Self {
            locations,
            flows,
            index,
            totals,
        }
    }

    pub fn locations(&self) -> &[L] {
        &self.locations
    }

    pub fn flows(&self) -> &[F] {
        &self.flows
    }

    pub fn location(&self, id: &str) -> Option<&L> {
        self.index.get(id).map(|&i| &self.locations[i])
    }

    /// Totals for `id`; zero when no flow references it.
    pub fn totals(&self, id: &str) -> LocationTotals {
        self.totals.get(id).copied().unwrap_or_default()
    }

    pub fn location_coords(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.locations.iter().map(|l| l.location_lon_lat())
    }
}

impl From<Dataset> for FlowmapData<Location, Flow> {
    fn from(ds: Dataset) -> Self {
        FlowmapData::new(ds.locations, ds.flows)
    }
}
