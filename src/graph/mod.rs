pub mod generators;
pub mod store;

pub use generators::GeneratorKind;
pub use store::{Graph, Link, LinkIndex, Node, NodeIndex};
