//! DOT persistence adapters: the flattened-input contract, property ↔
//! attribute conversion, and the [`Deserializer`]/[`Serializer`] pair.

pub mod attrs;
pub mod deserialize;
pub mod input;
pub mod serialize;

pub use attrs::{AttrBlock, AttrMap, AttrStrategy, DotAttributes, DotName};
pub use deserialize::Deserializer;
pub use input::{EdgeStatement, FlatDot, NodeStatement, Statement};
pub use serialize::Serializer;
