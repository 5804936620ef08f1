use std::collections::HashMap;

use crate::accessors::FlowRecord;

/// Per-location trip counters shown on hover.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct LocationTotals {
    pub incoming_count: f64,
    pub outgoing_count: f64,
    /// Flows whose origin and destination are the same location.
    pub internal_count: f64,
}

/// Sums flow magnitudes per location id.
///
/// A flow from a location to itself counts as internal only. NaN magnitudes
/// are summed like any other value.
pub fn location_totals<F: FlowRecord>(flows: &[F]) -> HashMap<String, LocationTotals> {
    let mut out: HashMap<String, LocationTotals> = HashMap::new();
    for flow in flows {
        let origin = flow.flow_origin_id();
        let dest = flow.flow_dest_id();
        let count = flow.flow_magnitude();
        if origin == dest {
            out.entry(origin.to_string()).or_default().internal_count += count;
        } else {
            out.entry(origin.to_string()).or_default().outgoing_count += count;
            out.entry(dest.to_string()).or_default().incoming_count += count;
        }
    }
    out
}
