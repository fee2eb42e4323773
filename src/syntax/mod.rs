//! Concrete syntax tree: node kinds, the immutable tree, and the builder the
//! parser drives.

pub mod builder;
pub mod kind;
pub mod precedence;
pub mod tree;

pub use builder::{Checkpoint, TreeBuilder};
pub use kind::{Field, SyntaxKind};
pub use precedence::{Associativity, Precedence};
pub use tree::{Child, Descendants, Element, SyntaxNode};
