//! Schema expression tree.
//!
//! A schema is a base (a constructor call on the schema library, or a
//! reference to another generated schema) followed by chained method calls.
//! Chained calls are kept in the order they were appended; nothing here
//! reorders or deduplicates them.

use crate::ir::Literal;
use crate::template::Pattern;

/// A compiled schema expression, e.g. `z.string().email().optional()`.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaExpr {
    pub base: Base,
    pub chain: Vec<Call>,
}

/// Start of a schema expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Base {
    /// `z.<name>(args)`
    Call(Call),
    /// Identifier of another generated schema, used as-is.
    Reference(String),
}

/// A constructor or method call.
#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub name: &'static str,
    pub args: Vec<Arg>,
}

/// Call argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Arg {
    Schema(SchemaExpr),
    /// Array literal of schemas: `[a, b]`.
    Schemas(Vec<SchemaExpr>),
    /// Object literal of schemas: `{ key: schema, … }`.
    Shape(Vec<ShapeEntry>),
    /// Key mask for `pick`/`omit`: `{ "a": true, … }`.
    Mask(Vec<String>),
    Literal(Literal),
    /// Numeric argument, already validated, kept as written.
    Number(String),
    Pattern(Pattern),
}

/// One member of an object shape.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeEntry {
    pub key: String,
    pub comment: Option<String>,
    pub schema: SchemaExpr,
}

/// A declaration's schema bound to its target identifier.
///
/// Built once per declaration and handed to [`crate::output`] for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedDeclaration {
    /// Name of the source declaration.
    pub source_name: String,
    /// Identifier the schema is bound to.
    pub identifier: String,
    /// Namespace prefix of every base constructor call.
    pub alias: String,
    pub expr: SchemaExpr,
}

impl Call {
    pub fn new(name: &'static str, args: Vec<Arg>) -> Self {
        Self { name, args }
    }

    pub fn bare(name: &'static str) -> Self {
        Self::new(name, Vec::new())
    }
}

impl SchemaExpr {
    /// `z.<name>(args)`
    pub fn call(name: &'static str, args: Vec<Arg>) -> Self {
        Self {
            base: Base::Call(Call::new(name, args)),
            chain: Vec::new(),
        }
    }

    /// `z.<name>()`
    pub fn bare(name: &'static str) -> Self {
        Self::call(name, Vec::new())
    }

    pub fn reference(identifier: impl Into<String>) -> Self {
        Self {
            base: Base::Reference(identifier.into()),
            chain: Vec::new(),
        }
    }

    /// Append a chained call.
    pub fn then(mut self, call: Call) -> Self {
        self.chain.push(call);
        self
    }

    /// Append several chained calls, preserving their order.
    pub fn then_all(mut self, calls: impl IntoIterator<Item = Call>) -> Self {
        self.chain.extend(calls);
        self
    }

    /// `.and(other)`
    pub fn and(self, other: SchemaExpr) -> Self {
        self.then(Call::new("and", vec![Arg::Schema(other)]))
    }

    pub fn optional(self) -> Self {
        self.then(Call::bare("optional"))
    }

    /// Names of the chained calls, in order.
    pub fn methods(&self) -> Vec<&'static str> {
        self.chain.iter().map(|call| call.name).collect()
    }
}
