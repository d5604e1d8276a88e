//! Intermediate representation for type declarations.
//!
//! Every front end (the tree-sitter TypeScript reader, JSON produced by an
//! external parser) normalizes to this IR before compilation.

use crate::directive::{Directive, extract_directives};
use serde::{Deserialize, Serialize};

/// A named `type` or `interface` declaration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Declaration {
    /// Declared name (e.g., "User", "OrderStatus").
    pub name: String,
    /// The declared type.
    pub node: TypeNode,
}

/// Keyword types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Primitive {
    String,
    Number,
    Boolean,
    BigInt,
    Any,
    Unknown,
    Never,
    Undefined,
    Null,
    Void,
}

/// A literal type, kept exactly as written in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Literal {
    /// Unescaped string contents.
    String(String),
    /// Source text of the number (`2`, `-1`, `0x1f`, `1.5`).
    Number(String),
    Boolean(bool),
}

/// A type expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TypeNode {
    Primitive(Primitive),
    Literal(Literal),
    /// Reference to another declaration by name.
    Reference(String),
    /// `T[]` and `Array<T>`.
    Array(Box<TypeNode>),
    Tuple(Vec<TypeNode>),
    Object(ObjectType),
    Union(Vec<TypeNode>),
    Intersection(Vec<TypeNode>),
    /// Generic application such as `Partial<T>` or `Record<K, V>`.
    Generic { name: String, args: Vec<TypeNode> },
    TemplateLiteral(TemplateLiteral),
    /// `(T)`; transparent for compilation.
    Parenthesized(Box<TypeNode>),
}

/// An object literal type or interface body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ObjectType {
    /// Named members in declaration order.
    #[serde(default)]
    pub members: Vec<ObjectMember>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index_signature: Option<IndexSignature>,
}

/// A named member of an object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectMember {
    /// Key text with any quotes removed.
    pub key: String,
    #[serde(default)]
    pub optional: bool,
    #[serde(rename = "type")]
    pub ty: TypeNode,
    /// Raw documentation comment, re-emitted verbatim above the member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directives: Vec<Directive>,
}

/// `[key: K]: V`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexSignature {
    pub key: Box<TypeNode>,
    pub value: Box<TypeNode>,
}

/// `` `head${T}literal${U}literal` ``
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateLiteral {
    pub head: String,
    #[serde(default)]
    pub spans: Vec<TemplateSpan>,
}

/// One interpolation and the literal text that follows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateSpan {
    #[serde(rename = "type")]
    pub ty: TypeNode,
    #[serde(default)]
    pub literal: String,
}

impl Primitive {
    /// Keyword as written in TypeScript, which is also the Zod constructor name.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::String => "string",
            Primitive::Number => "number",
            Primitive::Boolean => "boolean",
            Primitive::BigInt => "bigint",
            Primitive::Any => "any",
            Primitive::Unknown => "unknown",
            Primitive::Never => "never",
            Primitive::Undefined => "undefined",
            Primitive::Null => "null",
            Primitive::Void => "void",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let primitive = match keyword {
            "string" => Primitive::String,
            "number" => Primitive::Number,
            "boolean" => Primitive::Boolean,
            "bigint" => Primitive::BigInt,
            "any" => Primitive::Any,
            "unknown" => Primitive::Unknown,
            "never" => Primitive::Never,
            "undefined" => Primitive::Undefined,
            "null" => Primitive::Null,
            "void" => Primitive::Void,
            _ => return None,
        };
        Some(primitive)
    }
}

impl TypeNode {
    pub fn string() -> Self {
        TypeNode::Primitive(Primitive::String)
    }

    pub fn number() -> Self {
        TypeNode::Primitive(Primitive::Number)
    }

    pub fn boolean() -> Self {
        TypeNode::Primitive(Primitive::Boolean)
    }

    pub fn reference(name: impl Into<String>) -> Self {
        TypeNode::Reference(name.into())
    }

    pub fn string_literal(value: impl Into<String>) -> Self {
        TypeNode::Literal(Literal::String(value.into()))
    }

    pub fn number_literal(text: impl Into<String>) -> Self {
        TypeNode::Literal(Literal::Number(text.into()))
    }

    pub fn array(element: TypeNode) -> Self {
        TypeNode::Array(Box::new(element))
    }

    pub fn object(members: Vec<ObjectMember>) -> Self {
        TypeNode::Object(ObjectType {
            members,
            index_signature: None,
        })
    }

    pub fn generic(name: impl Into<String>, args: Vec<TypeNode>) -> Self {
        TypeNode::Generic {
            name: name.into(),
            args,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unwrap_parens(&self) -> &TypeNode {
        let mut node = self;
        while let TypeNode::Parenthesized(inner) = node {
            node = inner;
        }
        node
    }

    /// Human-readable name of the node's shape, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            TypeNode::Primitive(_) => "keyword type",
            TypeNode::Literal(Literal::String(_)) => "string literal",
            TypeNode::Literal(Literal::Number(_)) => "number literal",
            TypeNode::Literal(Literal::Boolean(_)) => "boolean literal",
            TypeNode::Reference(_) => "type reference",
            TypeNode::Array(_) => "array type",
            TypeNode::Tuple(_) => "tuple type",
            TypeNode::Object(_) => "object type",
            TypeNode::Union(_) => "union type",
            TypeNode::Intersection(_) => "intersection type",
            TypeNode::Generic { .. } => "generic type",
            TypeNode::TemplateLiteral(_) => "template literal type",
            TypeNode::Parenthesized(_) => "parenthesized type",
        }
    }
}

impl ObjectMember {
    pub fn required(key: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            key: key.into(),
            optional: false,
            ty,
            comment: None,
            directives: Vec::new(),
        }
    }

    pub fn optional(key: impl Into<String>, ty: TypeNode) -> Self {
        Self {
            optional: true,
            ..Self::required(key, ty)
        }
    }

    /// Attach a documentation comment and the directives it carries.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        self.directives = extract_directives(&comment);
        self.comment = Some(comment);
        self
    }
}

impl Declaration {
    pub fn new(name: impl Into<String>, node: TypeNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }
}
