//! Conversion of `validator` errors into per-field messages.

use std::collections::BTreeMap;

use validator::ValidationErrors;

/// Group validation failures by field, using each rule's message when it has
/// one and a generic sentence otherwise.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| {
                    error
                        .message
                        .as_ref()
                        .map(|msg| msg.to_string())
                        .unwrap_or_else(|| format!("Isian {} tidak valid.", field))
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}
