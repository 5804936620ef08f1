//! Flow map viewer: a flow layer over a base map, kept in step.
//!
//! The rendering layer, the base map and the DOM are collaborators behind
//! traits ([`RenderSurface`], [`BaseMap`], [`ControlPanel`], [`TooltipView`]).
//! On `wasm32` the `web` module binds them to deck.gl, flowmap.gl, Azure Maps
//! and web-sys.

pub mod app;
pub mod config;
pub mod controls;
pub mod pick;
pub mod surface;
pub mod sync;
pub mod tooltip;

#[cfg(target_arch = "wasm32")]
mod web;

pub use app::*;
pub use config::*;
pub use controls::*;
pub use pick::*;
pub use surface::*;
pub use sync::*;
pub use tooltip::*;
