//! # Execution-support resolver.
//!
//! Given one management operation arriving at this host, [`classify`]
//! decides how it executes here:
//!
//! ```text
//! classify(op)
//!   ├─ composite ────────────────► MultiStep(classify each step)
//!   ├─ host=other ───────────────► Ignored
//!   ├─ host=* ───────────────────► DomainOp (multi-host, domain executes)
//!   ├─ host=local/server=name ───► DirectServerOp (relative address)
//!   ├─ host=local/server=a,b ────► DomainOp with an empty support address
//!   ├─ excluded domain resource ─► Ignored
//!   └─ anything else ────────────► DomainOp
//! ```
//!
//! ## Rules
//! - A user-originated composite stamps `caller_is_user` into every step
//!   before classification.
//! - `server_ops` labels multi-step entries `step-1…step-N` by the step's
//!   position in the **original** step list.
//! - `formatted_domain_result` always yields one entry per original step:
//!   steps that produced no domain operation come back as
//!   `{"outcome": "ignored"}`, the rest are matched to the sequentially
//!   numbered entries of the domain result.

use std::collections::HashMap;

use serde_json::{json, Map, Value};

use crate::coordination::address::{PathAddress, HOST, SERVER};
use crate::coordination::operation::{Operation, ServerIdentity};

/// Read-only view of the domain model needed for routing decisions.
pub trait DomainModelView {
    /// Server group of a locally configured server, if the server exists.
    fn server_group(&self, server_name: &str) -> Option<String>;
}

/// Host-side exclusion policy for domain resources this host ignores.
pub trait ResourceExclusions {
    /// Whether operations addressed to this domain resource are excluded
    /// on this host.
    fn is_excluded(&self, address: &PathAddress) -> bool;

    /// Bookkeeping hook for profile-clone operations whose source profile
    /// this host may be ignoring.
    fn observe_profile_clone(&self, _operation: &Operation) {}

    /// Invoked when the overall operation completes; `rollback` is `true`
    /// when the domain rolled the operation back.
    fn complete(&self, _rollback: bool) {}
}

/// Policy that excludes nothing.
pub struct NoExclusions;

impl ResourceExclusions for NoExclusions {
    fn is_excluded(&self, _address: &PathAddress) -> bool {
        false
    }
}

/// Maps one domain operation to the server-level operations it implies.
pub trait ServerOperationProvider {
    /// Server operations derived from `operation`, grouped by the sets of
    /// servers each applies to. `address` is the support address computed
    /// during classification, not necessarily the operation's own.
    fn server_operations(
        &self,
        operation: &Operation,
        address: &PathAddress,
    ) -> Vec<(Vec<ServerIdentity>, Operation)>;
}

/// How one operation executes on this host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HostExecutionSupport {
    /// Not for this host; contributes nothing anywhere.
    Ignored,
    /// Runs directly on one local server, bypassing the domain phase.
    DirectServerOp {
        server: ServerIdentity,
        operation: Operation,
    },
    /// Runs in the domain phase; `address` is the support address used to
    /// derive server operations.
    DomainOp {
        operation: Operation,
        address: PathAddress,
    },
    /// Composite: one support per original step, in order.
    MultiStep { steps: Vec<HostExecutionSupport> },
}

/// Classifies one operation for execution on `local_host`.
pub fn classify(
    operation: &Operation,
    local_host: &str,
    model: &dyn DomainModelView,
    exclusions: &dyn ResourceExclusions,
) -> HostExecutionSupport {
    if operation.is_composite() {
        let caller_is_user = operation.headers.caller_is_user;
        let steps = operation
            .steps
            .iter()
            .map(|step| {
                let mut step = step.clone();
                if caller_is_user {
                    step.headers.caller_is_user = true;
                }
                classify(&step, local_host, model, exclusions)
            })
            .collect();
        return HostExecutionSupport::MultiStep { steps };
    }

    exclusions.observe_profile_clone(operation);

    let address = &operation.address;
    match address.first() {
        Some(host) if host.key == HOST => {
            if host.is_multi_target() {
                // Multi-host operations execute in the domain phase.
                return HostExecutionSupport::DomainOp {
                    operation: operation.clone(),
                    address: address.clone(),
                };
            }
            if host.value != local_host {
                return HostExecutionSupport::Ignored;
            }
            match address.get(1) {
                Some(server) if server.key == SERVER => {
                    if server.is_multi_target() {
                        // Multi-server operations keep the operation intact
                        // but carry no support address.
                        return HostExecutionSupport::DomainOp {
                            operation: operation.clone(),
                            address: PathAddress::empty(),
                        };
                    }
                    match model.server_group(&server.value) {
                        Some(group) => {
                            let mut direct = operation.clone();
                            direct.address = address.sub_address(2);
                            HostExecutionSupport::DirectServerOp {
                                server: ServerIdentity::new(
                                    local_host,
                                    group,
                                    server.value.clone(),
                                ),
                                operation: direct,
                            }
                        }
                        None => {
                            tracing::warn!(server = %server.value, "operation targets an unknown server");
                            HostExecutionSupport::Ignored
                        }
                    }
                }
                _ => HostExecutionSupport::DomainOp {
                    operation: operation.clone(),
                    address: address.clone(),
                },
            }
        }
        _ => {
            if exclusions.is_excluded(address) {
                HostExecutionSupport::Ignored
            } else {
                HostExecutionSupport::DomainOp {
                    operation: operation.clone(),
                    address: address.clone(),
                }
            }
        }
    }
}

impl HostExecutionSupport {
    /// The operation this host contributes to the domain phase, if any.
    ///
    /// Direct server operations bypass the domain phase entirely, so they
    /// contribute nothing here; for composites the contribution is a
    /// composite of the contributing steps.
    pub fn domain_operation(&self) -> Option<Operation> {
        match self {
            HostExecutionSupport::Ignored | HostExecutionSupport::DirectServerOp { .. } => None,
            HostExecutionSupport::DomainOp { operation, .. } => Some(operation.clone()),
            HostExecutionSupport::MultiStep { steps } => {
                let inner: Vec<Operation> =
                    steps.iter().filter_map(|s| s.domain_operation()).collect();
                if inner.is_empty() {
                    None
                } else {
                    Some(Operation::composite(inner))
                }
            }
        }
    }

    /// Server-level operations implied by this support, keyed by server.
    ///
    /// For a multi-step support, each server's value is an object whose keys
    /// are `step-N` with `N` the position in the original step list.
    pub fn server_ops(
        &self,
        provider: &dyn ServerOperationProvider,
    ) -> HashMap<ServerIdentity, Value> {
        match self {
            HostExecutionSupport::Ignored => HashMap::new(),
            HostExecutionSupport::DirectServerOp { server, operation } => {
                let mut out = HashMap::new();
                out.insert(server.clone(), to_json(operation));
                out
            }
            HostExecutionSupport::DomainOp { operation, address } => {
                let mut out = HashMap::new();
                for (identities, op) in provider.server_operations(operation, address) {
                    let value = to_json(&op);
                    for identity in identities {
                        out.insert(identity, value.clone());
                    }
                }
                out
            }
            HostExecutionSupport::MultiStep { steps } => {
                let mut grouped: HashMap<ServerIdentity, Map<String, Value>> = HashMap::new();
                for (index, step) in steps.iter().enumerate() {
                    let label = format!("step-{}", index + 1);
                    for (identity, value) in step.server_ops(provider) {
                        grouped
                            .entry(identity)
                            .or_default()
                            .insert(label.clone(), value);
                    }
                }
                grouped
                    .into_iter()
                    .map(|(identity, map)| (identity, Value::Object(map)))
                    .collect()
            }
        }
    }

    /// Reshapes the coordinator's domain result to match the original step
    /// list: domain results are numbered over the contributing steps only,
    /// while the caller expects one entry per original step.
    pub fn formatted_domain_result(&self, domain_result: &Value) -> Value {
        let HostExecutionSupport::MultiStep { steps } = self else {
            return domain_result.clone();
        };
        let mut out = Map::new();
        let mut result_step = 0;
        for (index, step) in steps.iter().enumerate() {
            let label = format!("step-{}", index + 1);
            if step.domain_operation().is_some() {
                result_step += 1;
                let from = domain_result
                    .get(format!("step-{result_step}"))
                    .cloned()
                    .unwrap_or(Value::Null);
                out.insert(label, step.reformat_step(from));
            } else {
                out.insert(label, json!({"outcome": "ignored"}));
            }
        }
        Value::Object(out)
    }

    /// Formats one step's slice of the domain result. Nested composites
    /// keep their envelope and reformat the inner `result` field.
    fn reformat_step(&self, from: Value) -> Value {
        if !matches!(self, HostExecutionSupport::MultiStep { .. }) {
            return from;
        }
        match from {
            Value::Object(mut envelope) => {
                if let Some(inner) = envelope.get("result").cloned() {
                    envelope.insert("result".to_string(), self.formatted_domain_result(&inner));
                }
                Value::Object(envelope)
            }
            other => self.formatted_domain_result(&other),
        }
    }
}

fn to_json(operation: &Operation) -> Value {
    serde_json::to_value(operation).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordination::address::PathElement;

    struct FixedModel;

    impl DomainModelView for FixedModel {
        fn server_group(&self, server_name: &str) -> Option<String> {
            match server_name {
                "web-01" | "web-02" => Some("web".to_string()),
                _ => None,
            }
        }
    }

    struct ExcludeProfiles;

    impl ResourceExclusions for ExcludeProfiles {
        fn is_excluded(&self, address: &PathAddress) -> bool {
            address
                .first()
                .is_some_and(|e| e.key == "profile" && e.value == "unused")
        }
    }

    /// Provider that maps every domain op to the same pair of servers.
    struct PairProvider;

    impl ServerOperationProvider for PairProvider {
        fn server_operations(
            &self,
            operation: &Operation,
            _address: &PathAddress,
        ) -> Vec<(Vec<ServerIdentity>, Operation)> {
            vec![(
                vec![
                    ServerIdentity::new("alpha", "web", "web-01"),
                    ServerIdentity::new("alpha", "web", "web-02"),
                ],
                operation.clone(),
            )]
        }
    }

    fn at(elements: Vec<PathElement>) -> PathAddress {
        PathAddress::new(elements)
    }

    fn host(value: &str) -> PathElement {
        PathElement::new(HOST, value)
    }

    fn server(value: &str) -> PathElement {
        PathElement::new(SERVER, value)
    }

    fn classify_local(op: &Operation) -> HostExecutionSupport {
        classify(op, "alpha", &FixedModel, &NoExclusions)
    }

    #[test]
    fn other_host_is_ignored() {
        let op = Operation::new("write-attribute", at(vec![host("beta")]));
        assert_eq!(classify_local(&op), HostExecutionSupport::Ignored);
    }

    #[test]
    fn multi_host_runs_in_the_domain_phase() {
        let op = Operation::new("read-resource", at(vec![host("*")]));
        let support = classify_local(&op);
        assert!(matches!(support, HostExecutionSupport::DomainOp { .. }));
    }

    #[test]
    fn local_server_op_becomes_direct_with_relative_address() {
        let op = Operation::new(
            "write-attribute",
            at(vec![host("alpha"), server("web-01"), PathElement::new("subsystem", "io")]),
        );
        let HostExecutionSupport::DirectServerOp { server, operation } = classify_local(&op) else {
            panic!("expected a direct server op");
        };
        assert_eq!(server, ServerIdentity::new("alpha", "web", "web-01"));
        assert_eq!(operation.address.to_string(), "/subsystem=io");
    }

    #[test]
    fn unknown_local_server_is_ignored() {
        let op = Operation::new("write-attribute", at(vec![host("alpha"), server("ghost")]));
        assert_eq!(classify_local(&op), HostExecutionSupport::Ignored);
    }

    #[test]
    fn multi_server_target_keeps_the_operation_but_drops_the_support_address() {
        let op = Operation::new("restart", at(vec![host("alpha"), server("web-01,web-02")]));
        let HostExecutionSupport::DomainOp { operation, address } = classify_local(&op) else {
            panic!("expected a domain op");
        };
        assert_eq!(operation, op);
        assert!(address.is_empty());
    }

    #[test]
    fn excluded_domain_resource_is_ignored() {
        let excluded = Operation::new(
            "write-attribute",
            at(vec![PathElement::new("profile", "unused")]),
        );
        let kept = Operation::new(
            "write-attribute",
            at(vec![PathElement::new("profile", "web")]),
        );
        assert_eq!(
            classify(&excluded, "alpha", &FixedModel, &ExcludeProfiles),
            HostExecutionSupport::Ignored
        );
        assert!(matches!(
            classify(&kept, "alpha", &FixedModel, &ExcludeProfiles),
            HostExecutionSupport::DomainOp { .. }
        ));
    }

    #[test]
    fn user_composites_stamp_the_caller_header_into_steps() {
        let composite = Operation::composite(vec![Operation::new(
            "write-attribute",
            at(vec![host("alpha"), server("web-01")]),
        )])
        .from_user();

        let HostExecutionSupport::MultiStep { steps } = classify_local(&composite) else {
            panic!("expected a multi-step support");
        };
        let HostExecutionSupport::DirectServerOp { operation, .. } = &steps[0] else {
            panic!("expected a direct server op step");
        };
        assert!(operation.headers.caller_is_user);
    }

    #[test]
    fn multi_step_server_ops_are_labeled_by_original_position() {
        // Step 1 and 3 contribute; step 2 targets another host.
        let composite = Operation::composite(vec![
            Operation::new("op-a", at(vec![PathElement::new("profile", "web")])),
            Operation::new("op-b", at(vec![host("beta")])),
            Operation::new("op-c", at(vec![PathElement::new("profile", "web")])),
        ]);
        let support = classify_local(&composite);
        let ops = support.server_ops(&PairProvider);

        let one = &ops[&ServerIdentity::new("alpha", "web", "web-01")];
        let keys: Vec<&str> = one.as_object().unwrap().keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["step-1", "step-3"]);
        assert_eq!(one["step-1"]["name"], "op-a");
        assert_eq!(one["step-3"]["name"], "op-c");
    }

    #[test]
    fn composite_domain_operation_collects_contributing_steps() {
        let composite = Operation::composite(vec![
            Operation::new("op-a", at(vec![PathElement::new("profile", "web")])),
            Operation::new("op-b", at(vec![host("beta")])),
            Operation::new("op-c", at(vec![host("alpha"), server("web-01")])),
        ]);
        let support = classify_local(&composite);
        let domain = support.domain_operation().expect("no domain operation");
        assert!(domain.is_composite());
        // The ignored step and the direct server op contribute nothing.
        assert_eq!(domain.steps.len(), 1);
        assert_eq!(domain.steps[0].name, "op-a");
    }

    #[test]
    fn fully_ignored_composite_has_no_domain_operation() {
        let composite = Operation::composite(vec![
            Operation::new("op-a", at(vec![host("beta")])),
            Operation::new("op-b", at(vec![host("gamma")])),
        ]);
        assert!(classify_local(&composite).domain_operation().is_none());
    }

    #[test]
    fn formatted_result_has_one_entry_per_original_step() {
        // Three steps; step 2 targets another host, so the domain result
        // only contains two numbered entries.
        let composite = Operation::composite(vec![
            Operation::new("op-a", at(vec![PathElement::new("profile", "web")])),
            Operation::new("op-b", at(vec![host("beta")])),
            Operation::new("op-c", at(vec![PathElement::new("profile", "web")])),
        ]);
        let support = classify_local(&composite);

        let domain_result = json!({
            "step-1": {"outcome": "success", "result": "a"},
            "step-2": {"outcome": "success", "result": "c"},
        });
        let formatted = support.formatted_domain_result(&domain_result);

        assert_eq!(formatted["step-1"]["result"], "a");
        assert_eq!(formatted["step-2"], json!({"outcome": "ignored"}));
        assert_eq!(formatted["step-3"]["result"], "c");
        assert_eq!(formatted.as_object().unwrap().len(), 3);
    }

    #[test]
    fn nested_composite_results_are_reformatted_in_place() {
        let inner = Operation::composite(vec![
            Operation::new("op-a", at(vec![host("beta")])),
            Operation::new("op-b", at(vec![PathElement::new("profile", "web")])),
        ]);
        let outer = Operation::composite(vec![inner]);
        let support = classify_local(&outer);

        let domain_result = json!({
            "step-1": {
                "outcome": "success",
                "result": {"step-1": {"outcome": "success", "result": "b"}}
            }
        });
        let formatted = support.formatted_domain_result(&domain_result);

        let nested = &formatted["step-1"]["result"];
        assert_eq!(nested["step-1"], json!({"outcome": "ignored"}));
        assert_eq!(nested["step-2"]["result"], "b");
    }

    #[test]
    fn direct_server_ops_count_as_ignored_in_domain_results() {
        let composite = Operation::composite(vec![
            Operation::new("op-a", at(vec![host("alpha"), server("web-01")])),
            Operation::new("op-b", at(vec![PathElement::new("profile", "web")])),
        ]);
        let support = classify_local(&composite);

        let domain_result = json!({"step-1": {"outcome": "success", "result": "b"}});
        let formatted = support.formatted_domain_result(&domain_result);

        assert_eq!(formatted["step-1"], json!({"outcome": "ignored"}));
        assert_eq!(formatted["step-2"]["result"], "b");
    }
}
