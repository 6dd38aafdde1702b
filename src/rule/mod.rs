pub mod model;
pub mod operator;
pub mod ruleset;

pub use model::*;
pub use operator::*;
pub use ruleset::*;
