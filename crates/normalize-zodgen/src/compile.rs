//! Type node → schema expression compiler.
//!
//! One exhaustive match over [`TypeNode`]; each shape maps to a fixed schema
//! construction. Any unsupported sub-node fails the whole declaration.

use crate::directive::refinements;
use crate::error::GenerateError;
use crate::expr::{Arg, Call, GeneratedDeclaration, SchemaExpr, ShapeEntry};
use crate::ir::{Declaration, Literal, ObjectMember, ObjectType, Primitive, TypeNode};
use crate::names::{schema_library_alias, schema_name};
use crate::template::compile_pattern;
use serde::Deserialize;

/// Per-declaration compilation settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Binding of the schema library (defaults to `z`).
    pub schema_library_alias: Option<String>,
    /// Identifier to bind the schema to (defaults to the resolved name).
    pub target_identifier: Option<String>,
}

/// Generic names with dedicated handling.
const KNOWN_GENERICS: &[&str] = &[
    "Array", "Record", "Partial", "Required", "Readonly", "Pick", "Omit",
];

/// Compile a declaration and bind it to its target identifier.
pub fn compile_declaration(
    declaration: &Declaration,
    options: &CompileOptions,
) -> Result<GeneratedDeclaration, GenerateError> {
    let expr = compile(&declaration.node)?;
    let identifier = options
        .target_identifier
        .clone()
        .unwrap_or_else(|| schema_name(&declaration.name));
    tracing::debug!(declaration = %declaration.name, %identifier, "compiled declaration");

    Ok(GeneratedDeclaration {
        source_name: declaration.name.clone(),
        identifier,
        alias: schema_library_alias(options.schema_library_alias.as_deref()).to_string(),
        expr,
    })
}

/// Compile a type node into a schema expression.
pub fn compile(node: &TypeNode) -> Result<SchemaExpr, GenerateError> {
    match node {
        TypeNode::Primitive(primitive) => Ok(SchemaExpr::bare(primitive.keyword())),
        TypeNode::Literal(literal) => Ok(SchemaExpr::call(
            "literal",
            vec![Arg::Literal(literal.clone())],
        )),
        TypeNode::Reference(name) => Ok(SchemaExpr::reference(schema_name(name))),
        TypeNode::Array(element) => Ok(array(compile(element)?)),
        TypeNode::Tuple(elements) => Ok(SchemaExpr::call(
            "tuple",
            vec![Arg::Schemas(compile_all(elements)?)],
        )),
        TypeNode::Object(object) => compile_object(object),
        TypeNode::Union(members) => compile_union(members),
        TypeNode::Intersection(members) => compile_intersection(members),
        TypeNode::Generic { name, args } => compile_generic(name, args),
        TypeNode::TemplateLiteral(template) => {
            let pattern = compile_pattern(template)?;
            Ok(SchemaExpr::bare("string").then(Call::new("regex", vec![Arg::Pattern(pattern)])))
        }
        TypeNode::Parenthesized(inner) => compile(inner),
    }
}

fn compile_all(nodes: &[TypeNode]) -> Result<Vec<SchemaExpr>, GenerateError> {
    nodes.iter().map(compile).collect()
}

fn array(element: SchemaExpr) -> SchemaExpr {
    SchemaExpr::call("array", vec![Arg::Schema(element)])
}

fn compile_object(object: &ObjectType) -> Result<SchemaExpr, GenerateError> {
    let Some(signature) = &object.index_signature else {
        return compile_shape(&object.members);
    };

    let record = compile_record("index signature", &signature.key, &signature.value)?;
    if object.members.is_empty() {
        return Ok(record);
    }
    // The signature is not repeated inside the object of named members.
    Ok(record.and(compile_shape(&object.members)?))
}

fn compile_shape(members: &[ObjectMember]) -> Result<SchemaExpr, GenerateError> {
    let entries = members
        .iter()
        .map(compile_member)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(SchemaExpr::call("object", vec![Arg::Shape(entries)]))
}

fn compile_member(member: &ObjectMember) -> Result<ShapeEntry, GenerateError> {
    let mut schema = compile(&member.ty)?.then_all(refinements(&member.directives));
    if member.optional {
        schema = schema.optional();
    }
    Ok(ShapeEntry {
        key: member.key.clone(),
        comment: member.comment.clone(),
        schema,
    })
}

fn compile_record(
    context: &str,
    key: &TypeNode,
    value: &TypeNode,
) -> Result<SchemaExpr, GenerateError> {
    match key.unwrap_parens() {
        TypeNode::Primitive(Primitive::String) => Ok(SchemaExpr::call(
            "record",
            vec![Arg::Schema(compile(value)?)],
        )),
        other => Err(GenerateError::UnsupportedRecordKeyType {
            context: context.to_string(),
            key: describe(other),
        }),
    }
}

fn compile_union(members: &[TypeNode]) -> Result<SchemaExpr, GenerateError> {
    match members {
        [] => Err(GenerateError::unsupported("empty union")),
        [single] => compile(single),
        _ => Ok(SchemaExpr::call(
            "union",
            vec![Arg::Schemas(compile_all(members)?)],
        )),
    }
}

/// `A & B & C` → `A.and(B).and(C)`
fn compile_intersection(members: &[TypeNode]) -> Result<SchemaExpr, GenerateError> {
    let (first, rest) = members
        .split_first()
        .ok_or_else(|| GenerateError::unsupported("empty intersection"))?;
    rest.iter().try_fold(
        compile(first)?,
        |acc, member| -> Result<SchemaExpr, GenerateError> { Ok(acc.and(compile(member)?)) },
    )
}

fn compile_generic(name: &str, args: &[TypeNode]) -> Result<SchemaExpr, GenerateError> {
    match (name, args) {
        ("Array", [element]) => Ok(array(compile(element)?)),
        ("Record", [key, value]) => compile_record("Record<K, V>", key, value),
        ("Partial", [inner]) => Ok(compile(inner)?.then(Call::bare("partial"))),
        ("Required", [inner]) => Ok(compile(inner)?.then(Call::bare("required"))),
        // Readonly has no runtime meaning.
        ("Readonly", [inner]) => compile(inner),
        ("Pick", [inner, keys]) => {
            let mask = key_mask("Pick", keys)?;
            Ok(compile(inner)?.then(Call::new("pick", vec![Arg::Mask(mask)])))
        }
        ("Omit", [inner, keys]) => {
            let mask = key_mask("Omit", keys)?;
            Ok(compile(inner)?.then(Call::new("omit", vec![Arg::Mask(mask)])))
        }
        _ if KNOWN_GENERICS.contains(&name) => Err(GenerateError::unsupported(format!(
            "{name} with {} type argument(s)",
            args.len()
        ))),
        _ => Err(GenerateError::unsupported(format!("generic type {name}<…>"))),
    }
}

/// Keys selected by the `K` of `Pick<T, K>` / `Omit<T, K>`, in declaration order.
fn key_mask(generic: &str, keys: &TypeNode) -> Result<Vec<String>, GenerateError> {
    match keys.unwrap_parens() {
        TypeNode::Literal(Literal::String(key)) => Ok(vec![key.clone()]),
        TypeNode::Union(parts) => {
            let mut mask = Vec::with_capacity(parts.len());
            collect_union_keys(generic, parts, &mut mask)?;
            Ok(mask)
        }
        other => Err(GenerateError::UnsupportedGenericKeySyntax {
            generic: generic.to_string(),
            part: other.kind_name().to_string(),
            union_part: false,
        }),
    }
}

fn collect_union_keys(
    generic: &str,
    parts: &[TypeNode],
    mask: &mut Vec<String>,
) -> Result<(), GenerateError> {
    for part in parts {
        match part.unwrap_parens() {
            TypeNode::Literal(Literal::String(key)) => mask.push(key.clone()),
            TypeNode::Union(nested) => collect_union_keys(generic, nested, mask)?,
            other => {
                return Err(GenerateError::UnsupportedGenericKeySyntax {
                    generic: generic.to_string(),
                    part: other.kind_name().to_string(),
                    union_part: true,
                });
            }
        }
    }
    Ok(())
}

fn describe(node: &TypeNode) -> String {
    match node {
        TypeNode::Primitive(primitive) => primitive.keyword().to_string(),
        TypeNode::Reference(name) => name.clone(),
        TypeNode::Literal(Literal::String(value)) => format!("{value:?}"),
        TypeNode::Literal(Literal::Number(text)) => text.clone(),
        other => other.kind_name().to_string(),
    }
}
