pub mod accessors;
pub mod data;
pub mod flowmap;
pub mod layer;
pub mod picking;
pub mod symbology;
pub mod totals;

pub use accessors::*;
pub use data::*;
pub use flowmap::*;
pub use layer::*;
pub use picking::*;
pub use symbology::*;
pub use totals::*;
