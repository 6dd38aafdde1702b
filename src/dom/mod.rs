pub mod control;
pub mod document;
pub mod fixture;

pub use control::*;
pub use document::*;
pub use fixture::*;
