//! Schema-based argument validator.
//!
//! `SchemaArgumentValidator` implements the `ArgumentValidator` trait from
//! `inbox-core`. Validation runs in two phases:
//!
//! 1. **Structural**: the edited arguments are validated against the
//!    interrupt's `args_schema`, when it carries one.
//! 2. **Semantic**: every rule registered for the action runs in
//!    registration order. All failures are collected before returning so the
//!    reviewer sees the full set in one pass.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use inbox_contracts::error::InboxResult;
use inbox_core::traits::{ArgumentReport, ArgumentValidator};

/// A caller-supplied argument check.
///
/// Returns `Some(message)` when the check fails, `None` on success.
pub type ArgumentRuleFn = Box<dyn Fn(&Map<String, Value>) -> Option<String> + Send + Sync>;

/// Matches every action when used as the action name in `register_rule`.
pub const ANY_ACTION: &str = "*";

#[derive(Default)]
pub struct SchemaArgumentValidator {
    rules: HashMap<String, Vec<ArgumentRuleFn>>,
}

impl SchemaArgumentValidator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `rule` for `action`, or for every action with `ANY_ACTION`.
    ///
    /// Several rules may be registered for the same action; all of them run.
    pub fn register_rule(&mut self, action: impl Into<String>, rule: ArgumentRuleFn) {
        self.rules.entry(action.into()).or_default().push(rule);
    }

    fn rules_for<'a>(&'a self, action: &str) -> impl Iterator<Item = &'a ArgumentRuleFn> + 'a {
        let specific = self.rules.get(action).into_iter().flatten();
        let wildcard = self.rules.get(ANY_ACTION).into_iter().flatten();
        wildcard.chain(specific)
    }
}

impl ArgumentValidator for SchemaArgumentValidator {
    fn validate(
        &self,
        action: &str,
        args: &Map<String, Value>,
        schema: Option<&Value>,
    ) -> InboxResult<ArgumentReport> {
        let mut report = ArgumentReport::default();

        // ── Phase 1: JSON Schema structural validation ────────────────────────
        if let Some(schema) = schema.filter(|s| !s.is_null()) {
            let instance = Value::Object(args.clone());
            match jsonschema::validator_for(schema) {
                Ok(validator) => {
                    for error in validator.iter_errors(&instance) {
                        let path = error.instance_path.to_string();
                        let message = if path.is_empty() {
                            format!("{error}")
                        } else {
                            format!("{path}: {error}")
                        };
                        warn!(action = %action, %message, "argument schema violation");
                        report.failures.push(message);
                    }
                }
                Err(e) => {
                    // Fail closed on a schema that does not compile.
                    let message = format!("invalid argument schema: {e}");
                    warn!(action = %action, %message, "argument schema compilation failure");
                    report.failures.push(message);
                }
            }
        }

        // ── Phase 2: Registered rules ────────────────────────────────────────
        for rule in self.rules_for(action) {
            if let Some(message) = rule(args) {
                warn!(action = %action, %message, "argument rule failed");
                report.failures.push(message);
            }
        }

        debug!(
            action = %action,
            passed = report.passed(),
            failure_count = report.failures.len(),
            "argument validation complete"
        );
        Ok(report)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::{json, Map, Value};

    use inbox_core::traits::ArgumentValidator;

    use super::{SchemaArgumentValidator, ANY_ACTION};

    fn args(value: Value) -> Map<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    fn email_schema() -> Value {
        json!({
            "type": "object",
            "required": ["to"],
            "properties": {
                "to": { "type": "string" },
                "cc": { "type": "array", "items": { "type": "string" } }
            }
        })
    }

    #[test]
    fn passes_without_schema_or_rules() {
        let validator = SchemaArgumentValidator::new();
        let report = validator
            .validate("send_email", &args(json!({ "to": 5 })), None)
            .unwrap();
        assert!(report.passed());
    }

    #[test]
    fn schema_type_violation_is_reported_with_path() {
        let validator = SchemaArgumentValidator::new();
        let schema = email_schema();
        let report = validator
            .validate("send_email", &args(json!({ "to": 42 })), Some(&schema))
            .unwrap();

        assert!(!report.passed());
        assert!(
            report.failures.iter().any(|f| f.contains("/to")),
            "failure should name the offending field: {:?}",
            report.failures
        );
    }

    #[test]
    fn schema_passes_for_valid_arguments() {
        let validator = SchemaArgumentValidator::new();
        let schema = email_schema();
        let report = validator
            .validate(
                "send_email",
                &args(json!({ "to": "b@x.com", "cc": ["c@x.com"] })),
                Some(&schema),
            )
            .unwrap();
        assert!(report.passed(), "unexpected failures: {:?}", report.failures);
    }

    #[test]
    fn null_schema_is_skipped() {
        let validator = SchemaArgumentValidator::new();
        let report = validator
            .validate("send_email", &args(json!({ "to": 42 })), Some(&Value::Null))
            .unwrap();
        assert!(report.passed());
    }

    #[test]
    fn malformed_schema_fails_closed() {
        let validator = SchemaArgumentValidator::new();
        let schema = json!({ "type": 17 });
        let report = validator
            .validate("send_email", &args(json!({ "to": "b@x.com" })), Some(&schema))
            .unwrap();
        assert!(!report.passed());
        assert!(report.failures[0].contains("invalid argument schema"));
    }

    #[test]
    fn rules_only_run_for_their_action() {
        let mut validator = SchemaArgumentValidator::new();
        validator.register_rule(
            "send_email",
            Box::new(|a| match a.get("to").and_then(Value::as_str) {
                Some(to) if to.contains('@') => None,
                _ => Some("recipient must be an email address".to_string()),
            }),
        );

        let bad = args(json!({ "to": "bob" }));
        assert!(!validator.validate("send_email", &bad, None).unwrap().passed());
        assert!(validator.validate("create_issue", &bad, None).unwrap().passed());
    }

    #[test]
    fn wildcard_and_specific_failures_are_all_collected() {
        let mut validator = SchemaArgumentValidator::new();
        validator.register_rule(ANY_ACTION, Box::new(|_| Some("always".to_string())));
        validator.register_rule("send_email", Box::new(|_| Some("specific".to_string())));
        let schema = email_schema();

        let report = validator
            .validate("send_email", &args(json!({ "to": 1 })), Some(&schema))
            .unwrap();

        assert_eq!(report.failures.len(), 3);
        assert_eq!(report.failures[1], "always");
        assert_eq!(report.failures[2], "specific");
    }
}
