pub mod builder;
pub mod constraints;
pub mod export;
pub mod model;
pub mod objective;
pub mod solver;

pub use builder::*;
pub use constraints::DynamicsRule;
pub use export::*;
pub use model::*;
pub use solver::*;
