use std::rc::Rc;

use crate::accessors::{FlowRecord, LocationRecord};
use crate::data::FlowmapData;
use crate::layer::{Layer, LayerId};
use crate::picking::{FlowPick, LocationPick, PickInfo, PickedObject};
use crate::symbology::{DEFAULT_COLOR_SCHEME, Theme};

pub const FLOWMAP_LAYER_ID: LayerId = LayerId("my-flowmap-layer");

/// Snapshot of every user control the flow layer is configured from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlSettings {
    pub color_scheme: String,
    pub dark_mode: bool,
    pub clustering_enabled: bool,
}

impl Default for ControlSettings {
    fn default() -> Self {
        Self {
            color_scheme: DEFAULT_COLOR_SCHEME.to_string(),
            dark_mode: true,
            clustering_enabled: true,
        }
    }
}

impl ControlSettings {
    pub fn theme(&self) -> Theme {
        Theme::from_dark_mode(self.dark_mode)
    }
}

/// One complete configuration of the flow layer.
///
/// Layers are never patched: a control change builds a new `FlowmapLayer`
/// from the shared data and a fresh [`ControlSettings`], and the surface
/// swaps it in whole.
#[derive(Debug)]
pub struct FlowmapLayer<L, F> {
    data: Rc<FlowmapData<L, F>>,
    settings: ControlSettings,
    pickable: bool,
}

impl<L, F> Clone for FlowmapLayer<L, F> {
    fn clone(&self) -> Self {
        Self {
            data: Rc::clone(&self.data),
            settings: self.settings.clone(),
            pickable: self.pickable,
        }
    }
}

impl<L, F> Layer for FlowmapLayer<L, F> {
    fn id(&self) -> LayerId {
        FLOWMAP_LAYER_ID
    }
}

impl<L: LocationRecord, F: FlowRecord> FlowmapLayer<L, F> {
    pub fn new(data: Rc<FlowmapData<L, F>>, settings: ControlSettings) -> Self {
        Self {
            data,
            settings,
            pickable: true,
        }
    }

    pub fn data(&self) -> &Rc<FlowmapData<L, F>> {
        &self.data
    }

    pub fn settings(&self) -> &ControlSettings {
        &self.settings
    }

    pub fn is_pickable(&self) -> bool {
        self.pickable
    }

    /// Resolves a hover over the location `id` at screen `(x, y)`.
    ///
    /// An unknown id resolves to an empty pick.
    pub fn pick_location(&self, x: f64, y: f64, id: &str) -> PickInfo {
        let object = self.data.location(id).map(|loc| {
            PickedObject::Location(LocationPick {
                id: loc.location_id().to_string(),
                name: loc.location_name().to_string(),
                totals: self.data.totals(id),
            })
        });
        PickInfo { x, y, object }
    }

    /// Resolves a hover over the `origin -> dest` arc at screen `(x, y)`.
    ///
    /// Duplicate rows for one pair are summed, matching what the arc shows.
    /// A pair with no flow resolves to an empty pick.
    pub fn pick_flow(&self, x: f64, y: f64, origin: &str, dest: &str) -> PickInfo {
        let mut count: Option<f64> = None;
        for flow in self.data.flows() {
            if flow.flow_origin_id() == origin && flow.flow_dest_id() == dest {
                *count.get_or_insert(0.0) += flow.flow_magnitude();
            }
        }
        let object = count.map(|count| {
            PickedObject::Flow(FlowPick {
                origin: origin.to_string(),
                dest: dest.to_string(),
                count,
            })
        });
        PickInfo { x, y, object }
    }
}
