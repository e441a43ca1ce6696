//! Property ↔ attribute-map conversion
//!
//! Both DOT adapters resolve, once per call, how a property type crosses
//! the attribute boundary: a user-registered converter/formatter always
//! wins; otherwise the type's own [`AttrStrategy`] decides between direct
//! map conversion, a `Display`-rendered `label`, silent elision for the
//! absent property type `()`, and a configuration error.

use crate::error::{GraphError, GraphResult};
use std::collections::BTreeMap;

/// Flat string-keyed attribute map. Key-ordered, so emission order is
/// deterministic.
pub type AttrMap = BTreeMap<String, String>;

pub(crate) fn attr_map(pairs: &[(String, String)]) -> AttrMap {
    pairs.iter().cloned().collect()
}

/// How a property type crosses the attribute boundary when no converter
/// or formatter is registered for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrStrategy {
    /// The absent property type: attributes are silently discarded on
    /// deserialization and no attribute block is emitted on serialization.
    Void,
    /// The type converts to and from an [`AttrMap`] directly.
    Direct,
    /// The type renders as a single `label="..."` attribute (serialize
    /// only); deserialization still needs a registered converter.
    Labeled,
    /// Neither direction works without a registered converter/formatter.
    Unsupported,
}

/// A property type usable by the DOT adapters.
///
/// The two provided conversions default to failing; an implementation
/// overrides whichever ones its [`AttrStrategy`] promises. `absent` must
/// yield `Some` exactly when the strategy is [`AttrStrategy::Void`].
pub trait DotAttributes: Sized {
    const STRATEGY: AttrStrategy;

    /// The stand-in value attached when attributes are elided.
    fn absent() -> Option<Self> {
        None
    }

    fn from_attrs(attrs: &AttrMap) -> GraphResult<Self> {
        let _ = attrs;
        Err(GraphError::AttrConversion(
            "type does not convert from an attribute map".to_string(),
        ))
    }

    fn to_attrs(&self) -> GraphResult<AttrMap> {
        Err(GraphError::AttrConversion(
            "type does not render as an attribute map".to_string(),
        ))
    }
}

impl DotAttributes for () {
    const STRATEGY: AttrStrategy = AttrStrategy::Void;

    fn absent() -> Option<Self> {
        Some(())
    }
}

impl DotAttributes for AttrMap {
    const STRATEGY: AttrStrategy = AttrStrategy::Direct;

    fn from_attrs(attrs: &AttrMap) -> GraphResult<Self> {
        Ok(attrs.clone())
    }

    fn to_attrs(&self) -> GraphResult<AttrMap> {
        Ok(self.clone())
    }
}

/// Implements [`DotAttributes`] for a `Display` type so it serializes as
/// a single `label="..."` attribute.
#[macro_export]
macro_rules! display_label_attrs {
    ($ty:ty) => {
        impl $crate::dot::DotAttributes for $ty {
            const STRATEGY: $crate::dot::AttrStrategy = $crate::dot::AttrStrategy::Labeled;

            fn to_attrs(&self) -> $crate::error::GraphResult<$crate::dot::AttrMap> {
                let mut attrs = $crate::dot::AttrMap::new();
                attrs.insert("label".to_string(), self.to_string());
                Ok(attrs)
            }
        }
    };
}

macro_rules! label_attrs_for_primitives {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DotAttributes for $ty {
                const STRATEGY: AttrStrategy = AttrStrategy::Labeled;

                fn to_attrs(&self) -> GraphResult<AttrMap> {
                    let mut attrs = AttrMap::new();
                    attrs.insert("label".to_string(), self.to_string());
                    Ok(attrs)
                }
            }
        )*
    };
}

label_attrs_for_primitives!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, String,
);

/// A rendered attribute block, as produced by a formatter or by the
/// direct map strategy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrBlock {
    Empty,
    /// Verbatim bracket contents, e.g. `person=Duke@York`.
    Flat(String),
    /// Emitted in key order as `k1="v1", k2="v2"`.
    Pairs(AttrMap),
}

impl AttrBlock {
    /// The bracket contents, or `None` when no `[...]` block is emitted.
    pub fn render(&self) -> Option<String> {
        match self {
            AttrBlock::Empty => None,
            AttrBlock::Flat(s) => {
                if s.is_empty() {
                    None
                } else {
                    Some(s.clone())
                }
            }
            AttrBlock::Pairs(attrs) => {
                if attrs.is_empty() {
                    return None;
                }
                let rendered: Vec<String> = attrs
                    .iter()
                    .map(|(k, v)| format!("{k}=\"{v}\""))
                    .collect();
                Some(rendered.join(", "))
            }
        }
    }
}

impl From<String> for AttrBlock {
    fn from(s: String) -> Self {
        AttrBlock::Flat(s)
    }
}

impl From<&str> for AttrBlock {
    fn from(s: &str) -> Self {
        AttrBlock::Flat(s.to_string())
    }
}

impl From<AttrMap> for AttrBlock {
    fn from(attrs: AttrMap) -> Self {
        AttrBlock::Pairs(attrs)
    }
}

/// A node key constructible from a parsed DOT identifier.
///
/// `String` takes the identifier as-is; integer keys parse it. Other key
/// types either implement this or register a name converter on the
/// deserializer.
pub trait DotName: Sized {
    fn from_name(name: &str) -> GraphResult<Self>;
}

impl DotName for String {
    fn from_name(name: &str) -> GraphResult<Self> {
        Ok(name.to_string())
    }
}

macro_rules! integer_dot_name {
    ($($ty:ty),* $(,)?) => {
        $(
            impl DotName for $ty {
                fn from_name(name: &str) -> GraphResult<Self> {
                    name.parse().map_err(|e: std::num::ParseIntError| {
                        GraphError::InvalidNodeName {
                            name: name.to_string(),
                            reason: e.to_string(),
                        }
                    })
                }
            }
        )*
    };
}

integer_dot_name!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// The strategy a conversion direction resolved to, per the priority
/// user-registered > type-level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Resolved {
    UserDefined,
    DirectMap,
    Void,
}
