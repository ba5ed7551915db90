pub mod ids;
pub mod time;
pub mod viewport;

// Foundation crate: small, well-tested primitives only.
pub use ids::*;
pub use time::*;
pub use viewport::*;
