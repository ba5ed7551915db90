pub mod camera;
pub mod config;
pub mod controls;
pub mod driver;
pub mod renderer;
pub mod viewer;

pub use camera::*;
pub use controls::*;
pub use driver::*;
pub use renderer::*;
pub use viewer::*;
