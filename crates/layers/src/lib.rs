pub mod labels;
pub mod layer;
pub mod render;
pub mod symbology;

pub use layer::*;
pub use render::*;
pub use symbology::*;
