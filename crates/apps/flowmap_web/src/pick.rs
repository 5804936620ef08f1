use layers::{FlowPick, LocationPick, LocationTotals, PickInfo, PickedObject};

/// Field access into a hover-info object as the flow layer reports it.
///
/// `path` walks nested objects: `["object", "origin", "id"]`. Missing
/// numbers read as NaN and missing text as empty.
pub trait PickFields {
    fn is_absent(&self) -> bool;
    fn number(&self, path: &[&str]) -> f64;
    fn text(&self, path: &[&str]) -> String;
}

/// Maps a layer hover-info object onto [`PickInfo`].
///
/// `None` when there is no info at all. An object whose `type` tag is neither
/// `location` nor `flow` gives a pick with no object.
pub fn pick_from_fields<P: PickFields + ?Sized>(info: &P) -> Option<PickInfo> {
    if info.is_absent() {
        return None;
    }
    let object = match info.text(&["object", "type"]).as_str() {
        "location" => Some(PickedObject::Location(LocationPick {
            id: info.text(&["object", "id"]),
            name: info.text(&["object", "name"]),
            totals: LocationTotals {
                incoming_count: info.number(&["object", "totals", "incomingCount"]),
                outgoing_count: info.number(&["object", "totals", "outgoingCount"]),
                internal_count: info.number(&["object", "totals", "internalCount"]),
            },
        })),
        "flow" => Some(PickedObject::Flow(FlowPick {
            origin: info.text(&["object", "origin", "id"]),
            dest: info.text(&["object", "dest", "id"]),
            count: info.number(&["object", "count"]),
        })),
        _ => None,
    };
    Some(PickInfo {
        x: info.number(&["x"]),
        y: info.number(&["y"]),
        object,
    })
}
