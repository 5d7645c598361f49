pub mod error;
mod graph;
pub mod types;

pub use error::*;
pub use graph::DependentsGraph;
pub use types::*;
