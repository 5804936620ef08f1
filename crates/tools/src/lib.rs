//! Offline helpers behind the `flowmap` CLI.

use std::rc::Rc;

use flowmap_web::{IdTrim, TooltipState, tooltip_state};
use formats::{Dataset, Flow, Location};
use foundation::{CameraState, FitOptions, ViewportSize, fit_points};
use layers::{ControlSettings, FlowmapData, FlowmapLayer};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CameraReport {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl From<CameraState> for CameraReport {
    fn from(c: CameraState) -> Self {
        Self {
            longitude: c.longitude,
            latitude: c.latitude,
            zoom: c.zoom,
            bearing: c.bearing,
            pitch: c.pitch,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InspectReport {
    pub locations: usize,
    pub flows: usize,
    /// Locations with a NaN coordinate.
    pub locations_with_nan: usize,
    /// Flows with a NaN count.
    pub flows_with_nan: usize,
    /// `None` when no location has finite coordinates.
    pub initial_camera: Option<CameraReport>,
}

pub fn inspect(dataset: &Dataset, viewport: ViewportSize, pad: f64) -> InspectReport {
    let (locations_with_nan, flows_with_nan) = dataset.nan_counts();
    let opts = FitOptions {
        pad,
        ..FitOptions::default()
    };
    let coords = dataset.locations.iter().map(|l| [l.lon, l.lat]);
    InspectReport {
        locations: dataset.locations.len(),
        flows: dataset.flows.len(),
        locations_with_nan,
        flows_with_nan,
        initial_camera: fit_points(coords, viewport, opts).map(CameraReport::from),
    }
}

/// What to hover over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HoverTarget {
    Location(String),
    Flow { origin: String, dest: String },
}

/// Tooltip HTML the viewer shows for `target`; `None` if it would hide.
pub fn tooltip_html(dataset: Dataset, target: &HoverTarget, trim: IdTrim) -> Option<String> {
    let data: Rc<FlowmapData<Location, Flow>> = Rc::new(dataset.into());
    let layer = FlowmapLayer::new(data, ControlSettings::default());
    let pick = match target {
        HoverTarget::Location(id) => layer.pick_location(0.0, 0.0, id),
        HoverTarget::Flow { origin, dest } => layer.pick_flow(0.0, 0.0, origin, dest),
    };
    match tooltip_state(Some(&pick), trim) {
        TooltipState::Visible { content, .. } => Some(content.to_html()),
        TooltipState::Hidden => None,
    }
}
