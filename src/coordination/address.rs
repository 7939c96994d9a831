//! # Resource addresses.
//!
//! A management operation targets a resource identified by a path of
//! `key=value` elements, e.g. `host=alpha / server=web-01 / subsystem=io`.
//! A value of `*` or a comma-separated list makes an element multi-target.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Address key of the host element.
pub const HOST: &str = "host";
/// Address key of the server element.
pub const SERVER: &str = "server";

/// One `key=value` element of a resource address.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathElement {
    pub key: String,
    pub value: String,
}

impl PathElement {
    /// Creates an element.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Returns `true` when the value addresses more than one resource
    /// (wildcard or comma-separated list).
    pub fn is_multi_target(&self) -> bool {
        self.value == "*" || self.value.contains(',')
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Ordered element path addressing one resource (or a multi-target set).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathAddress {
    elements: Vec<PathElement>,
}

impl PathAddress {
    /// The empty (root) address.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates an address from its elements.
    pub fn new(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    /// First element, if any.
    pub fn first(&self) -> Option<&PathElement> {
        self.elements.first()
    }

    /// Element at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&PathElement> {
        self.elements.get(index)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    /// Address made of the elements from `from` onward; the relative
    /// address of a nested resource.
    pub fn sub_address(&self, from: usize) -> PathAddress {
        PathAddress {
            elements: self.elements.get(from..).unwrap_or_default().to_vec(),
        }
    }
}

impl fmt::Display for PathAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.elements.is_empty() {
            return write!(f, "/");
        }
        for element in &self.elements {
            write!(f, "/{element}")?;
        }
        Ok(())
    }
}
