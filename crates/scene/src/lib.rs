pub mod grid;
pub mod visibility;

pub use grid::*;
pub use visibility::*;
