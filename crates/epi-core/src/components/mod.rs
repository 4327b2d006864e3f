//! ECS Components
//!
//! Node state, the two networks, and the double-buffered store that holds them.

pub mod graph;
pub mod node;
pub mod store;

pub use graph::*;
pub use node::*;
pub use store::*;
