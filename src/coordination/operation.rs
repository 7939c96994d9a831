//! # Management operations.
//!
//! An [`Operation`] is the unit of management work: a name, a target
//! address, routing headers, an opaque JSON body, and (for composites) a
//! list of child steps. The body is never interpreted here; routing only
//! looks at the name, address, and headers.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::coordination::address::PathAddress;

/// Name of the composite operation that wraps child steps.
pub const COMPOSITE: &str = "composite";

/// Routing-relevant operation headers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationHeaders {
    /// Whether the operation originated from an end user (as opposed to
    /// internal controller traffic). Propagated into composite steps.
    #[serde(default)]
    pub caller_is_user: bool,
}

/// One management operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    /// Operation name (e.g. `write-attribute`, [`COMPOSITE`]).
    pub name: String,
    /// Target resource address.
    #[serde(default)]
    pub address: PathAddress,
    /// Routing headers.
    #[serde(default)]
    pub headers: OperationHeaders,
    /// Child steps; only meaningful for composites.
    #[serde(default)]
    pub steps: Vec<Operation>,
    /// Opaque operation payload.
    #[serde(default)]
    pub body: Value,
}

impl Operation {
    /// Creates an operation with an empty body and no steps.
    pub fn new(name: impl Into<String>, address: PathAddress) -> Self {
        Self {
            name: name.into(),
            address,
            headers: OperationHeaders::default(),
            steps: Vec::new(),
            body: Value::Null,
        }
    }

    /// Creates a composite wrapping the given steps.
    pub fn composite(steps: Vec<Operation>) -> Self {
        Self {
            name: COMPOSITE.to_string(),
            address: PathAddress::empty(),
            headers: OperationHeaders::default(),
            steps,
            body: Value::Null,
        }
    }

    /// Returns `true` for composite operations.
    pub fn is_composite(&self) -> bool {
        self.name == COMPOSITE
    }

    /// Sets the opaque body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// Marks the operation as user-originated.
    pub fn from_user(mut self) -> Self {
        self.headers.caller_is_user = true;
        self
    }
}

/// Identity of one managed server in the domain.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ServerIdentity {
    /// Host the server runs on.
    pub host_name: String,
    /// Server group the server belongs to.
    pub server_group: String,
    /// Server name, unique per host.
    pub server_name: String,
}

impl ServerIdentity {
    /// Creates a server identity.
    pub fn new(
        host_name: impl Into<String>,
        server_group: impl Into<String>,
        server_name: impl Into<String>,
    ) -> Self {
        Self {
            host_name: host_name.into(),
            server_group: server_group.into(),
            server_name: server_name.into(),
        }
    }
}
