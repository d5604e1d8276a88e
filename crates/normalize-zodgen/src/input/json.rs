//! JSON form of the IR.
//!
//! Lets a parser running elsewhere (a TypeScript compiler plugin, another
//! process) hand declarations over without going through source text.

use crate::directive::extract_directives;
use crate::error::GenerateError;
use crate::ir::{Declaration, TypeNode};
use serde::Deserialize;

#[derive(Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    One(Declaration),
    Many(Vec<Declaration>),
}

/// Parse one declaration object or an array of them.
///
/// Members that carry a comment but no directives get their directives
/// extracted from the comment.
pub fn parse_declarations(input: &str) -> Result<Vec<Declaration>, GenerateError> {
    let parsed: OneOrMany =
        serde_json::from_str(input).map_err(|e| GenerateError::Parse(e.to_string()))?;
    let mut declarations = match parsed {
        OneOrMany::One(declaration) => vec![declaration],
        OneOrMany::Many(declarations) => declarations,
    };
    for declaration in &mut declarations {
        hydrate_directives(&mut declaration.node);
    }
    Ok(declarations)
}

fn hydrate_directives(node: &mut TypeNode) {
    match node {
        TypeNode::Object(object) => {
            for member in &mut object.members {
                if member.directives.is_empty() {
                    if let Some(comment) = &member.comment {
                        member.directives = extract_directives(comment);
                    }
                }
                hydrate_directives(&mut member.ty);
            }
            if let Some(signature) = &mut object.index_signature {
                hydrate_directives(&mut signature.value);
            }
        }
        TypeNode::Array(inner) | TypeNode::Parenthesized(inner) => hydrate_directives(inner),
        TypeNode::Tuple(nodes) | TypeNode::Union(nodes) | TypeNode::Intersection(nodes) => {
            nodes.iter_mut().for_each(hydrate_directives)
        }
        TypeNode::Generic { args, .. } => args.iter_mut().for_each(hydrate_directives),
        TypeNode::Primitive(_)
        | TypeNode::Literal(_)
        | TypeNode::Reference(_)
        | TypeNode::TemplateLiteral(_) => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ObjectMember;

    #[test]
    fn single_declaration() {
        let declarations = parse_declarations(
            r#"{ "name": "HeroName", "node": { "kind": "primitive", "value": "string" } }"#,
        )
        .unwrap();
        assert_eq!(declarations, vec![Declaration::new("HeroName", TypeNode::string())]);
    }

    #[test]
    fn comments_yield_directives() {
        let declarations = parse_declarations(
            r#"[{
                "name": "Contact",
                "node": { "kind": "object", "value": { "members": [{
                    "key": "email",
                    "type": { "kind": "primitive", "value": "string" },
                    "comment": "/** @format email */"
                }] } }
            }]"#,
        )
        .unwrap();
        assert_eq!(
            declarations[0].node,
            TypeNode::object(vec![
                ObjectMember::required("email", TypeNode::string()).with_comment("/** @format email */")
            ])
        );
    }

    #[test]
    fn invalid_json() {
        assert!(matches!(
            parse_declarations("{ \"name\": 1 }"),
            Err(GenerateError::Parse(_))
        ));
    }
}
