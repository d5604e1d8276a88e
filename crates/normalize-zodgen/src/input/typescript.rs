//! TypeScript declaration reader.
//!
//! Extracts `interface` and `type` declarations from TypeScript source
//! (exported or not) into the IR, keeping `/** … */` member comments.

use crate::error::GenerateError;
use crate::ir::{
    Declaration, IndexSignature, Literal, ObjectMember, ObjectType, Primitive, TemplateLiteral,
    TemplateSpan, TypeNode,
};
use tree_sitter::{Node, Parser, Tree};

/// Parse TypeScript source and lower every top-level declaration into IR.
pub fn parse_declarations(source: &str) -> Result<Vec<Declaration>, GenerateError> {
    let mut parser = Parser::new();
    parser
        .set_language(&arborium_typescript::language().into())
        .map_err(|e| GenerateError::Parse(format!("tree-sitter init: {}", e)))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| GenerateError::Parse("failed to parse TypeScript".into()))?;

    if let Some(error) = syntax_error(tree.root_node()) {
        let position = error.start_position();
        return Err(GenerateError::Parse(format!(
            "syntax error at line {}, column {}",
            position.row + 1,
            position.column + 1
        )));
    }

    let ctx = ExtractContext::new(source);
    ctx.extract_declarations(&tree)
}

/// The first declaration in `source`.
pub fn first_declaration(source: &str) -> Result<Declaration, GenerateError> {
    parse_declarations(source)?
        .into_iter()
        .next()
        .ok_or(GenerateError::MissingDeclaration)
}

/// First error or missing node, not looking inside template literal types.
///
/// The grammar has no escape sequences in template literal types and leaves
/// them as error nodes; the template reader validates those itself.
fn syntax_error<'t>(node: Node<'t>) -> Option<Node<'t>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() || node.kind() == "template_literal_type" {
        return None;
    }
    let mut cursor = node.walk();
    node.children(&mut cursor).find_map(syntax_error)
}

struct ExtractContext<'a> {
    source: &'a str,
}

impl<'a> ExtractContext<'a> {
    fn new(source: &'a str) -> Self {
        Self { source }
    }

    fn node_text(&self, node: Node) -> &'a str {
        node.utf8_text(self.source.as_bytes()).unwrap_or("")
    }

    fn extract_declarations(&self, tree: &Tree) -> Result<Vec<Declaration>, GenerateError> {
        let root = tree.root_node();
        let mut declarations = Vec::new();

        let mut cursor = root.walk();
        for child in root.children(&mut cursor) {
            let decl = match child.kind() {
                "export_statement" => match child.child_by_field_name("declaration") {
                    Some(decl) => decl,
                    None => continue,
                },
                _ => child,
            };
            match decl.kind() {
                "interface_declaration" => declarations.push(self.extract_interface(decl)?),
                "type_alias_declaration" => declarations.push(self.extract_type_alias(decl)?),
                _ => {}
            }
        }

        Ok(declarations)
    }

    fn declaration_name(&self, node: Node, what: &str) -> Result<String, GenerateError> {
        node.child_by_field_name("name")
            .map(|name| self.node_text(name).to_string())
            .ok_or_else(|| GenerateError::Parse(format!("{what} missing name")))
    }

    fn extract_interface(&self, node: Node) -> Result<Declaration, GenerateError> {
        let name = self.declaration_name(node, "interface")?;
        let body = node
            .child_by_field_name("body")
            .ok_or_else(|| GenerateError::Parse("interface missing body".into()))?;
        let object = TypeNode::Object(self.extract_object_body(body)?);

        // `interface A extends B, C { … }` is `B & C & { … }`.
        let mut bases = Vec::new();
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.kind() == "extends_type_clause" {
                let mut inner = child.walk();
                for base in child.named_children(&mut inner) {
                    bases.push(self.extract_type(base)?);
                }
            }
        }

        let node = if bases.is_empty() {
            object
        } else {
            bases.push(object);
            TypeNode::Intersection(bases)
        };
        Ok(Declaration::new(name, node))
    }

    fn extract_type_alias(&self, node: Node) -> Result<Declaration, GenerateError> {
        let name = self.declaration_name(node, "type alias")?;
        let value = node
            .child_by_field_name("value")
            .ok_or_else(|| GenerateError::Parse("type alias missing value".into()))?;
        Ok(Declaration::new(name, self.extract_type(value)?))
    }

    /// Members of an interface body or object type.
    fn extract_object_body(&self, body: Node) -> Result<ObjectType, GenerateError> {
        let mut object = ObjectType::default();
        let mut pending_comment: Option<String> = None;
        let mut cursor = body.walk();

        for child in body.named_children(&mut cursor) {
            match child.kind() {
                "comment" => {
                    let text = self.node_text(child);
                    pending_comment = text.starts_with("/**").then(|| text.to_string());
                }
                "property_signature" => {
                    let mut member = self.extract_property_signature(child)?;
                    if let Some(comment) = pending_comment.take() {
                        member = member.with_comment(comment);
                    }
                    object.members.push(member);
                }
                "index_signature" => {
                    object.index_signature = Some(self.extract_index_signature(child)?);
                    pending_comment = None;
                }
                other => {
                    return Err(GenerateError::unsupported(format!(
                        "{} in object type",
                        other.replace('_', " ")
                    )));
                }
            }
        }

        Ok(object)
    }

    fn extract_property_signature(&self, node: Node) -> Result<ObjectMember, GenerateError> {
        let name = node
            .child_by_field_name("name")
            .ok_or_else(|| GenerateError::Parse("property missing name".into()))?;
        let key = match name.kind() {
            "string" => self.string_value(name),
            "computed_property_name" => {
                return Err(GenerateError::unsupported(format!(
                    "computed property {}",
                    self.node_text(name)
                )));
            }
            _ => self.node_text(name).to_string(),
        };

        let ty = match node.child_by_field_name("type") {
            Some(annotation) => self.extract_type_from_annotation(annotation)?,
            None => TypeNode::Primitive(Primitive::Any),
        };

        let member = if self.has_question_mark(node) {
            ObjectMember::optional(key, ty)
        } else {
            ObjectMember::required(key, ty)
        };
        Ok(member)
    }

    fn extract_index_signature(&self, node: Node) -> Result<IndexSignature, GenerateError> {
        let key = match node.child_by_field_name("index_type") {
            Some(key) => key,
            None => {
                return Err(GenerateError::unsupported(format!(
                    "index signature {}",
                    self.node_text(node)
                )));
            }
        };
        let value = node
            .child_by_field_name("type")
            .ok_or_else(|| GenerateError::Parse("index signature missing type".into()))?;

        Ok(IndexSignature {
            key: Box::new(self.extract_type(key)?),
            value: Box::new(self.extract_type_from_annotation(value)?),
        })
    }

    fn has_question_mark(&self, node: Node) -> bool {
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if !child.is_named() && self.node_text(child) == "?" {
                return true;
            }
        }
        false
    }

    fn extract_type_from_annotation(&self, node: Node) -> Result<TypeNode, GenerateError> {
        // type_annotation has a `:` child then the actual type node
        match self.first_named_child(node) {
            Some(child) => self.extract_type(child),
            None => Ok(TypeNode::Primitive(Primitive::Any)),
        }
    }

    fn first_named_child<'t>(&self, node: Node<'t>) -> Option<Node<'t>> {
        let mut cursor = node.walk();
        let child = node
            .named_children(&mut cursor)
            .find(|child| child.kind() != "comment");
        child
    }

    fn extract_type(&self, node: Node) -> Result<TypeNode, GenerateError> {
        match node.kind() {
            "predefined_type" => self.extract_keyword(node),

            "type_identifier" => {
                let name = self.node_text(node);
                // Grammar versions differ on which keywords are predefined.
                match Primitive::from_keyword(name) {
                    Some(primitive) => Ok(TypeNode::Primitive(primitive)),
                    None => Ok(TypeNode::Reference(name.to_string())),
                }
            }

            "nested_type_identifier" => Ok(TypeNode::Reference(self.node_text(node).to_string())),

            "literal_type" => self.extract_literal_type(node),

            "union_type" => {
                let mut members = Vec::new();
                self.flatten(node, "union_type", &mut members)?;
                Ok(TypeNode::Union(members))
            }

            "intersection_type" => {
                let mut members = Vec::new();
                self.flatten(node, "intersection_type", &mut members)?;
                Ok(TypeNode::Intersection(members))
            }

            "array_type" => {
                // T[]
                let inner = self
                    .first_named_child(node)
                    .ok_or_else(|| GenerateError::Parse("array type missing element".into()))?;
                Ok(TypeNode::array(self.extract_type(inner)?))
            }

            "readonly_type" => {
                // readonly T[]
                let inner = self
                    .first_named_child(node)
                    .ok_or_else(|| GenerateError::Parse("readonly type missing inner".into()))?;
                self.extract_type(inner)
            }

            "tuple_type" => {
                let mut elements = Vec::new();
                let mut cursor = node.walk();
                for child in node.named_children(&mut cursor) {
                    if child.kind() != "comment" {
                        elements.push(self.extract_type(child)?);
                    }
                }
                Ok(TypeNode::Tuple(elements))
            }

            "generic_type" => self.extract_generic_type(node),

            "parenthesized_type" => {
                let inner = self.first_named_child(node).ok_or_else(|| {
                    GenerateError::Parse("parenthesized type missing inner".into())
                })?;
                Ok(TypeNode::Parenthesized(Box::new(self.extract_type(inner)?)))
            }

            "object_type" => Ok(TypeNode::Object(self.extract_object_body(node)?)),

            "template_literal_type" => self.extract_template_literal(node),

            other => Err(GenerateError::unsupported(format!(
                "{} `{}`",
                other.replace('_', " "),
                self.node_text(node)
            ))),
        }
    }

    fn extract_keyword(&self, node: Node) -> Result<TypeNode, GenerateError> {
        let keyword = self.node_text(node).trim();
        Primitive::from_keyword(keyword)
            .map(TypeNode::Primitive)
            .ok_or_else(|| GenerateError::unsupported(format!("`{keyword}` type")))
    }

    fn flatten(&self, node: Node, kind: &str, out: &mut Vec<TypeNode>) -> Result<(), GenerateError> {
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == kind {
                self.flatten(child, kind, out)?;
            } else if child.kind() != "comment" {
                out.push(self.extract_type(child)?);
            }
        }
        Ok(())
    }

    fn extract_generic_type(&self, node: Node) -> Result<TypeNode, GenerateError> {
        let name = node
            .child_by_field_name("name")
            .map(|n| self.node_text(n))
            .unwrap_or("");

        let mut args = Vec::new();
        if let Some(type_args) = node.child_by_field_name("type_arguments") {
            let mut cursor = type_args.walk();
            for child in type_args.named_children(&mut cursor) {
                if child.kind() != "comment" {
                    args.push(self.extract_type(child)?);
                }
            }
        }

        // `Array<T>` and `T[]` are the same shape.
        if name == "Array" && args.len() == 1 {
            return Ok(TypeNode::array(args.remove(0)));
        }
        Ok(TypeNode::generic(name, args))
    }

    fn extract_literal_type(&self, node: Node) -> Result<TypeNode, GenerateError> {
        let literal = self
            .first_named_child(node)
            .ok_or_else(|| GenerateError::Parse("empty literal type".into()))?;
        match literal.kind() {
            "string" => Ok(TypeNode::string_literal(self.string_value(literal))),
            "number" | "unary_expression" => {
                Ok(TypeNode::number_literal(self.node_text(literal)))
            }
            "true" => Ok(TypeNode::Literal(Literal::Boolean(true))),
            "false" => Ok(TypeNode::Literal(Literal::Boolean(false))),
            "null" => Ok(TypeNode::Primitive(Primitive::Null)),
            "undefined" => Ok(TypeNode::Primitive(Primitive::Undefined)),
            other => Err(GenerateError::unsupported(format!(
                "{} literal `{}`",
                other.replace('_', " "),
                self.node_text(literal)
            ))),
        }
    }

    fn extract_template_literal(&self, node: Node) -> Result<TypeNode, GenerateError> {
        let text = self.node_text(node);
        if !is_closed_template(text) {
            return Err(GenerateError::Parse(format!(
                "unterminated template literal type `{text}`"
            )));
        }

        // Literal text comes from the source between interpolations so that
        // escapes, which the tree only holds as error nodes, are kept.
        let mut template = TemplateLiteral::default();
        let mut literal_start = node.start_byte() + 1;
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "template_type" => {
                    self.push_template_text(&mut template, literal_start, child.start_byte());
                    let inner = self.first_named_child(child).ok_or_else(|| {
                        GenerateError::Parse("empty template literal interpolation".into())
                    })?;
                    template.spans.push(TemplateSpan {
                        ty: self.extract_type(inner)?,
                        literal: String::new(),
                    });
                    literal_start = child.end_byte();
                }
                "string_fragment" | "`" => {}
                _ if child.is_error() && is_escape_run(self.node_text(child)) => {}
                _ => {
                    return Err(GenerateError::Parse(format!(
                        "unexpected `{}` in template literal type",
                        self.node_text(child)
                    )));
                }
            }
        }
        self.push_template_text(&mut template, literal_start, node.end_byte() - 1);
        Ok(TypeNode::TemplateLiteral(template))
    }

    fn push_template_text(&self, template: &mut TemplateLiteral, start: usize, end: usize) {
        let text = unescape(self.source.get(start..end).unwrap_or(""));
        match template.spans.last_mut() {
            Some(span) => span.literal.push_str(&text),
            None => template.head.push_str(&text),
        }
    }

    /// Contents of a quoted string node, escapes resolved.
    fn string_value(&self, node: Node) -> String {
        let text = self.node_text(node);
        let inner = text
            .strip_prefix(['"', '\''])
            .and_then(|s| s.strip_suffix(['"', '\'']))
            .unwrap_or(text);
        unescape(inner)
    }
}

/// Backtick-delimited, with the closing backtick not escaped.
fn is_closed_template(text: &str) -> bool {
    let Some(body) = text
        .strip_prefix('`')
        .and_then(|rest| rest.strip_suffix('`'))
    else {
        return false;
    };
    body.chars().rev().take_while(|&c| c == '\\').count() % 2 == 0
}

/// Text starting with an escape and holding no unescaped `${`.
fn is_escape_run(text: &str) -> bool {
    if !text.starts_with('\\') {
        return false;
    }
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '$' if chars.peek() == Some(&'{') => return false,
            '`' => return false,
            _ => {}
        }
    }
    true
}

/// Resolve JavaScript string escapes.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('t') => out.push('\t'),
            Some('b') => out.push('\u{8}'),
            Some('f') => out.push('\u{c}'),
            Some('v') => out.push('\u{b}'),
            Some('0') => out.push('\0'),
            Some('u') => {
                let hex: String = if chars.peek() == Some(&'{') {
                    chars.next();
                    chars.by_ref().take_while(|&c| c != '}').collect()
                } else {
                    chars.by_ref().take(4).collect()
                };
                match u32::from_str_radix(&hex, 16).ok().and_then(char::from_u32) {
                    Some(decoded) => out.push(decoded),
                    None => {
                        out.push_str("\\u");
                        out.push_str(&hex);
                    }
                }
            }
            // Line continuation.
            Some('\n') => {}
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(source: &str) -> TypeNode {
        first_declaration(source).unwrap().node
    }

    #[test]
    fn test_interface() {
        let declaration = first_declaration(
            r#"
            interface User {
                id: string;
                name: string;
                age?: number;
            }
            "#,
        )
        .unwrap();
        assert_eq!(declaration.name, "User");
        assert_eq!(
            declaration.node,
            TypeNode::object(vec![
                ObjectMember::required("id", TypeNode::string()),
                ObjectMember::required("name", TypeNode::string()),
                ObjectMember::optional("age", TypeNode::number()),
            ])
        );
    }

    #[test]
    fn test_export_and_order() {
        let declarations = parse_declarations(
            r#"
            export type UserId = string;
            const notAType = 1;
            export interface Product {
                id: UserId;
            }
            type Flag = boolean;
            "#,
        )
        .unwrap();
        let names: Vec<_> = declarations.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["UserId", "Product", "Flag"]);
    }

    #[test]
    fn test_missing_declaration() {
        assert_eq!(
            first_declaration("const x = 1;"),
            Err(GenerateError::MissingDeclaration)
        );
    }

    #[test]
    fn test_array_types() {
        assert_eq!(parse_one("type A = string[];"), TypeNode::array(TypeNode::string()));
        assert_eq!(parse_one("type A = Array<string>;"), TypeNode::array(TypeNode::string()));
    }

    #[test]
    fn test_literals() {
        assert_eq!(parse_one(r#"type A = "kryptonite";"#), TypeNode::string_literal("kryptonite"));
        assert_eq!(parse_one("type A = 2;"), TypeNode::number_literal("2"));
        assert_eq!(parse_one("type A = true;"), TypeNode::Literal(Literal::Boolean(true)));
        assert_eq!(parse_one("type A = null;"), TypeNode::Primitive(Primitive::Null));
        assert_eq!(
            parse_one("type A = undefined;"),
            TypeNode::Primitive(Primitive::Undefined)
        );
    }

    #[test]
    fn test_keywords() {
        for keyword in ["string", "number", "boolean", "any", "void", "unknown", "never"] {
            let source = format!("type A = {keyword};");
            assert_eq!(
                parse_one(&source),
                TypeNode::Primitive(Primitive::from_keyword(keyword).unwrap())
            );
        }
        assert!(matches!(
            parse_declarations("type A = symbol;"),
            Err(GenerateError::UnsupportedType { .. })
        ));
    }

    #[test]
    fn test_union_flattening() {
        assert_eq!(
            parse_one(r#"type Identity = "superman" | "clark kent" | "kal-l";"#),
            TypeNode::Union(vec![
                TypeNode::string_literal("superman"),
                TypeNode::string_literal("clark kent"),
                TypeNode::string_literal("kal-l"),
            ])
        );
    }

    #[test]
    fn test_parenthesized() {
        assert_eq!(
            parse_one("type A = (NormalGuy | Vilain);"),
            TypeNode::Parenthesized(Box::new(TypeNode::Union(vec![
                TypeNode::reference("NormalGuy"),
                TypeNode::reference("Vilain"),
            ])))
        );
    }

    #[test]
    fn test_generic() {
        assert_eq!(
            parse_one(r#"type A = Pick<Hero, "name" | "age">;"#),
            TypeNode::generic(
                "Pick",
                vec![
                    TypeNode::reference("Hero"),
                    TypeNode::Union(vec![
                        TypeNode::string_literal("name"),
                        TypeNode::string_literal("age"),
                    ]),
                ]
            )
        );
    }

    #[test]
    fn test_quoted_keys() {
        assert_eq!(
            parse_one(r#"interface Vilain { "i.will.kill.everybody": true; 'it\'s': string }"#),
            TypeNode::object(vec![
                ObjectMember::required(
                    "i.will.kill.everybody",
                    TypeNode::Literal(Literal::Boolean(true))
                ),
                ObjectMember::required("it's", TypeNode::string()),
            ])
        );
    }

    #[test]
    fn test_index_signature() {
        let TypeNode::Object(object) = parse_one(
            r#"type Movies = {
                "Man of Steel": Movie;
                [title: string]: Movie
            };"#,
        ) else {
            panic!("expected object");
        };
        assert_eq!(object.members.len(), 1);
        assert_eq!(object.members[0].key, "Man of Steel");
        assert_eq!(
            object.index_signature,
            Some(IndexSignature {
                key: Box::new(TypeNode::string()),
                value: Box::new(TypeNode::reference("Movie")),
            })
        );
    }

    #[test]
    fn test_doc_comments() {
        let TypeNode::Object(object) = parse_one(
            r#"
            interface HeroContact {
                /**
                 * The email of the hero.
                 *
                 * @format email
                 */
                email: string;
                // not documentation
                name: string;
            }
            "#,
        ) else {
            panic!("expected object");
        };
        let email = &object.members[0];
        assert!(email.comment.as_deref().unwrap().contains("The email of the hero."));
        assert_eq!(email.directives.len(), 1);
        assert_eq!(email.directives[0].tag, "format");
        assert_eq!(object.members[1].comment, None);
        assert!(object.members[1].directives.is_empty());
    }

    #[test]
    fn test_extends() {
        assert_eq!(
            parse_one("interface Hero extends Person { power: string }"),
            TypeNode::Intersection(vec![
                TypeNode::reference("Person"),
                TypeNode::object(vec![ObjectMember::required("power", TypeNode::string())]),
            ])
        );
    }

    #[test]
    fn test_template_literal() {
        assert_eq!(
            parse_one("type Id = `user_${number}-${string}`;"),
            TypeNode::TemplateLiteral(TemplateLiteral {
                head: "user_".into(),
                spans: vec![
                    TemplateSpan {
                        ty: TypeNode::number(),
                        literal: "-".into(),
                    },
                    TemplateSpan {
                        ty: TypeNode::string(),
                        literal: String::new(),
                    },
                ],
            })
        );
    }

    #[test]
    fn test_template_literal_escapes() {
        assert_eq!(
            parse_one(r"type A = `a\n${string}`;"),
            TypeNode::TemplateLiteral(TemplateLiteral {
                head: "a\n".into(),
                spans: vec![TemplateSpan {
                    ty: TypeNode::string(),
                    literal: String::new(),
                }],
            })
        );
    }

    #[test]
    fn test_multiline_template_literal() {
        assert_eq!(
            parse_one("type A = `line1\n${string}`;"),
            TypeNode::TemplateLiteral(TemplateLiteral {
                head: "line1\n".into(),
                spans: vec![TemplateSpan {
                    ty: TypeNode::string(),
                    literal: String::new(),
                }],
            })
        );
    }

    #[test]
    fn test_syntax_errors() {
        for source in [
            "type Hero = string |;",
            "type A = `a\\`b${number}`;",
            "interface Hero { name: string",
        ] {
            assert!(
                matches!(parse_declarations(source), Err(GenerateError::Parse(_))),
                "{source}"
            );
        }
    }

    #[test]
    fn test_template_helpers() {
        assert!(is_closed_template("`a`"));
        assert!(is_closed_template("`a\\\\`"));
        assert!(!is_closed_template("`a\\`"));
        assert!(!is_closed_template("`"));
        assert!(is_escape_run("\\n"));
        assert!(!is_escape_run("\\n${string}"));
        assert!(!is_escape_run("n"));
    }

    #[test]
    fn test_unescape() {
        assert_eq!(unescape(r"a\nb"), "a\nb");
        assert_eq!(unescape(r#"say \"hi\""#), "say \"hi\"");
        assert_eq!(unescape(r"A\u{1F600}"), "A\u{1F600}");
    }
}
