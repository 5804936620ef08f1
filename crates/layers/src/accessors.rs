//! Field accessors the flow layer reads records through.

use formats::{Flow, Location};

pub trait LocationRecord {
    fn location_id(&self) -> &str;
    fn location_name(&self) -> &str;
    fn location_lat(&self) -> f64;
    fn location_lon(&self) -> f64;

    fn location_lon_lat(&self) -> [f64; 2] {
        [self.location_lon(), self.location_lat()]
    }
}

pub trait FlowRecord {
    fn flow_origin_id(&self) -> &str;
    fn flow_dest_id(&self) -> &str;
    fn flow_magnitude(&self) -> f64;
}

impl LocationRecord for Location {
    fn location_id(&self) -> &str {
        &self.id
    }

    fn location_name(&self) -> &str {
        &self.name
    }

    fn location_lat(&self) -> f64 {
        self.lat
    }

    fn location_lon(&self) -> f64 {
        self.lon
    }
}

impl FlowRecord for Flow {
    fn flow_origin_id(&self) -> &str {
        &self.origin
    }

    fn flow_dest_id(&self) -> &str {
        &self.dest
    }

    fn flow_magnitude(&self) -> f64 {
        self.count
    }
}
