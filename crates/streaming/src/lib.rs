pub mod error;
pub mod loader;
pub mod protocol;
pub mod source;
pub mod store;

pub use error::*;
pub use loader::*;
pub use protocol::*;
pub use source::*;
pub use store::*;
