//! Domain models for the chartnote system.

mod encounter;
mod episode;
mod fragments;
mod session;

pub use encounter::*;
pub use episode::*;
pub use fragments::*;
pub use session::*;
