pub mod enums;
pub mod project;
pub mod evolution;
pub mod analysis;

pub use enums::*;
pub use project::*;
pub use evolution::*;
pub use analysis::*;
