//! Template literal types as regular expressions.
//!
//! `` `${string}_${number}` `` becomes `^\w+_\d+$`: literal text is escaped,
//! each interpolation maps to a fixed fragment.

use crate::error::GenerateError;
use crate::ir::{Primitive, TemplateLiteral, TypeNode};

/// Regular expression source, without delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(String);

impl Pattern {
    /// Wrap an already-formed pattern body.
    pub fn raw(source: impl Into<String>) -> Self {
        Self(source.into())
    }

    pub fn source(&self) -> &str {
        &self.0
    }

    /// Compile the pattern for matching.
    pub fn to_regex(&self) -> Result<regex::Regex, regex::Error> {
        regex::Regex::new(&self.0)
    }
}

/// Compile a template literal type into an anchored pattern.
pub fn compile_pattern(template: &TemplateLiteral) -> Result<Pattern, GenerateError> {
    let mut source = String::from("^");
    push_escaped(&mut source, &template.head);

    for span in &template.spans {
        source.push_str(fragment(&span.ty)?);
        push_escaped(&mut source, &span.literal);
    }

    source.push('$');
    Ok(Pattern(source))
}

fn fragment(node: &TypeNode) -> Result<&'static str, GenerateError> {
    match node.unwrap_parens() {
        TypeNode::Primitive(Primitive::String) => Ok(r"\w+"),
        TypeNode::Primitive(Primitive::Number) => Ok(r"\d+"),
        TypeNode::Primitive(Primitive::Boolean) => Ok("(?:true|false)"),
        TypeNode::Primitive(Primitive::Any | Primitive::Unknown) => Ok(r"[\s\S]*"),
        TypeNode::Primitive(other) => Err(GenerateError::UnsupportedTemplateLiteralSpan {
            kind: other.keyword().to_string(),
        }),
        other => Err(GenerateError::UnsupportedTemplateLiteralSpan {
            kind: other.kind_name().to_string(),
        }),
    }
}

fn push_escaped(out: &mut String, text: &str) {
    for c in text.chars() {
        if matches!(
            c,
            '.' | '*' | '+' | '?' | '^' | '$' | '{' | '}' | '(' | ')' | '|' | '[' | ']' | '\\'
        ) {
            out.push('\\');
        }
        out.push(c);
    }
}
