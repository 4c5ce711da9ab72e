#![forbid(unsafe_code)]

use std::collections::HashMap;

/// Binary operators whose result is always `Bool`.
pub const BOOLEAN_OPERATORS: [&str; 8] = ["==", "!=", "<", ">", "<=", ">=", "&&", "||"];

pub fn is_boolean_operator(op: &str) -> bool {
    BOOLEAN_OPERATORS.contains(&op)
}

/// Operator token → "result is boolean" table used while building constraints.
pub fn boolean_operator_table() -> HashMap<String, bool> {
    BOOLEAN_OPERATORS
        .iter()
        .map(|op| (op.to_string(), true))
        .collect()
}
