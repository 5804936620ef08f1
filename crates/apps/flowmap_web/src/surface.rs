use formats::{Flow, Location};
use layers::{BlendMode, FlowmapData, FlowmapLayer};

pub type DemoData = FlowmapData<Location, Flow>;
pub type DemoLayer = FlowmapLayer<Location, Flow>;

/// Interactive canvas the flow layer is drawn on.
pub trait RenderSurface {
    /// Replaces the displayed layer; there is only ever one.
    fn set_layer(&mut self, layer: DemoLayer);

    fn set_blend_mode(&mut self, mode: BlendMode);

    /// Background of the page behind both the map and the canvas.
    fn set_page_background(&mut self, color: &str);
}
