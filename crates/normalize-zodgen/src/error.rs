//! Errors raised while turning a declaration into a schema.

use thiserror::Error;

/// Everything that can abort generation of a declaration.
///
/// Failures are deterministic: the same input always fails the same way, so
/// callers decide per declaration whether to skip or abort.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A `Record` or index signature keyed by something other than `string`.
    #[error("{context} with `{key}` keys is not supported, record keys must be `string`")]
    UnsupportedRecordKeyType { context: String, key: String },

    /// `Pick`/`Omit` with a key argument that is not made of string literals.
    #[error(
        "{generic}<T, K> unknown syntax: ({part} as K{} not supported)",
        union_suffix(.union_part)
    )]
    UnsupportedGenericKeySyntax {
        generic: String,
        part: String,
        union_part: bool,
    },

    /// A template literal interpolation with no pattern equivalent.
    #[error("unsupported type in template literal: {kind}")]
    UnsupportedTemplateLiteralSpan { kind: String },

    /// The source unit holds no `type` or `interface` declaration.
    #[error("no `type` or `interface` declaration found")]
    MissingDeclaration,

    /// Any other construct without a schema counterpart.
    #[error("unsupported construct: {construct}")]
    UnsupportedType { construct: String },

    /// The front end could not read the source.
    #[error("parse error: {0}")]
    Parse(String),
}

fn union_suffix(union_part: &bool) -> &'static str {
    if *union_part { " union part" } else { "" }
}

impl GenerateError {
    pub(crate) fn unsupported(construct: impl Into<String>) -> Self {
        GenerateError::UnsupportedType {
            construct: construct.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_key_messages_distinguish_union_parts() {
        let direct = GenerateError::UnsupportedGenericKeySyntax {
            generic: "Omit".into(),
            part: "type reference".into(),
            union_part: false,
        };
        let nested = GenerateError::UnsupportedGenericKeySyntax {
            generic: "Pick".into(),
            part: "type reference".into(),
            union_part: true,
        };
        assert_eq!(
            direct.to_string(),
            "Omit<T, K> unknown syntax: (type reference as K not supported)"
        );
        assert_eq!(
            nested.to_string(),
            "Pick<T, K> unknown syntax: (type reference as K union part not supported)"
        );
    }
}
