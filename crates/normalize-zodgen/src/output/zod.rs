//! Zod source writer.
//!
//! Renders [`GeneratedDeclaration`]s as TypeScript: object shapes one member
//! per line, chained calls left to right on the same line.

use crate::expr::{Arg, Base, Call, GeneratedDeclaration, SchemaExpr, ShapeEntry};
use crate::generate::GenerateOptions;
use crate::ir::Literal;
use crate::names::DEFAULT_SCHEMA_ALIAS;

const INDENT: &str = "    ";

/// Render a single `const` binding.
pub fn render_declaration(declaration: &GeneratedDeclaration, export: bool) -> String {
    let mut writer = ZodWriter::new(&declaration.alias);
    if export {
        writer.output.push_str("export ");
    }
    writer.output.push_str("const ");
    writer.output.push_str(&declaration.identifier);
    writer.output.push_str(" = ");
    writer.write_expr(&declaration.expr);
    writer.output.push(';');
    writer.output
}

/// Render a schema expression on its own.
pub fn render_expr(expr: &SchemaExpr, alias: &str) -> String {
    let mut writer = ZodWriter::new(alias);
    writer.write_expr(expr);
    writer.output
}

/// Render a complete module: header, import, then one binding per declaration.
pub fn render_module(declarations: &[GeneratedDeclaration], options: &GenerateOptions) -> String {
    let mut out = String::new();
    if options.import_header {
        out.push_str("// Generated by normalize-zodgen\n");
        match options.schema_library_alias.as_deref() {
            Some(alias) if alias != DEFAULT_SCHEMA_ALIAS => {
                out.push_str(&format!("import {{ z as {alias} }} from \"zod\";\n"));
            }
            _ => out.push_str("import { z } from \"zod\";\n"),
        }
    }
    for declaration in declarations {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&render_declaration(declaration, options.export));
        out.push('\n');
    }
    out
}

struct ZodWriter<'a> {
    alias: &'a str,
    output: String,
    indent: usize,
}

impl<'a> ZodWriter<'a> {
    fn new(alias: &'a str) -> Self {
        Self {
            alias,
            output: String::new(),
            indent: 0,
        }
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
    }

    fn write_expr(&mut self, expr: &SchemaExpr) {
        match &expr.base {
            Base::Call(call) => {
                self.output.push_str(self.alias);
                self.output.push('.');
                self.write_call(call);
            }
            Base::Reference(identifier) => self.output.push_str(identifier),
        }
        for call in &expr.chain {
            self.output.push('.');
            self.write_call(call);
        }
    }

    fn write_call(&mut self, call: &Call) {
        self.output.push_str(call.name);
        self.output.push('(');
        for (i, arg) in call.args.iter().enumerate() {
            if i > 0 {
                self.output.push_str(", ");
            }
            self.write_arg(arg);
        }
        self.output.push(')');
    }

    fn write_arg(&mut self, arg: &Arg) {
        match arg {
            Arg::Schema(expr) => self.write_expr(expr),
            Arg::Schemas(exprs) => {
                self.output.push('[');
                for (i, expr) in exprs.iter().enumerate() {
                    if i > 0 {
                        self.output.push_str(", ");
                    }
                    self.write_expr(expr);
                }
                self.output.push(']');
            }
            Arg::Shape(entries) => self.write_shape(entries),
            Arg::Mask(keys) => {
                if keys.is_empty() {
                    self.output.push_str("{}");
                    return;
                }
                let entries: Vec<String> = keys
                    .iter()
                    .map(|key| format!("{}: true", quote(key)))
                    .collect();
                self.output.push_str("{ ");
                self.output.push_str(&entries.join(", "));
                self.output.push_str(" }");
            }
            Arg::Literal(Literal::String(value)) => self.output.push_str(&quote(value)),
            Arg::Literal(Literal::Number(text)) | Arg::Number(text) => {
                self.output.push_str(text)
            }
            Arg::Literal(Literal::Boolean(value)) => {
                self.output.push_str(if *value { "true" } else { "false" })
            }
            Arg::Pattern(pattern) => {
                self.output.push('/');
                self.output.push_str(&escape_delimiters(pattern.source()));
                self.output.push('/');
            }
        }
    }

    fn write_shape(&mut self, entries: &[ShapeEntry]) {
        if entries.is_empty() {
            self.output.push_str("{}");
            return;
        }
        self.output.push_str("{\n");
        self.indent += 1;
        for (i, entry) in entries.iter().enumerate() {
            if let Some(comment) = &entry.comment {
                self.write_comment(comment);
            }
            self.write_indent();
            self.write_key(&entry.key);
            self.output.push_str(": ");
            self.write_expr(&entry.schema);
            if i + 1 < entries.len() {
                self.output.push(',');
            }
            self.output.push('\n');
        }
        self.indent -= 1;
        self.write_indent();
        self.output.push('}');
    }

    /// Re-indent a `/** … */` block to the current level.
    fn write_comment(&mut self, comment: &str) {
        for (i, line) in comment.trim().lines().enumerate() {
            let line = line.trim();
            self.write_indent();
            if i > 0 && line.starts_with('*') {
                self.output.push(' ');
            }
            self.output.push_str(line);
            self.output.push('\n');
        }
    }

    fn write_key(&mut self, key: &str) {
        if is_identifier(key) {
            self.output.push_str(key);
        } else {
            self.output.push_str(&quote(key));
        }
    }
}

/// Whether `key` can be written as a bare property name.
pub fn is_identifier(key: &str) -> bool {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Double-quoted string literal.
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{8}' => out.push_str("\\b"),
            '\u{c}' => out.push_str("\\f"),
            '\u{2028}' | '\u{2029}' => out.push_str(&format!("\\u{:04x}", c as u32)),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Escape unescaped `/` and line terminators so the pattern fits between
/// regex literal delimiters.
fn escape_delimiters(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut escaped = false;
    for c in source.chars() {
        let terminator = match c {
            '\n' => Some("n"),
            '\r' => Some("r"),
            '\u{2028}' => Some("u2028"),
            '\u{2029}' => Some("u2029"),
            _ => None,
        };
        if let Some(sequence) = terminator {
            // After a backslash the sequence completes the pending escape.
            if !escaped {
                out.push('\\');
            }
            out.push_str(sequence);
            escaped = false;
            continue;
        }
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '/' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::Pattern;

    #[test]
    fn identifiers() {
        assert!(is_identifier("name"));
        assert!(is_identifier("_private"));
        assert!(is_identifier("$ref"));
        assert!(is_identifier("héros"));
        assert!(!is_identifier("i.will.kill.everybody"));
        assert!(!is_identifier("Man of Steel"));
        assert!(!is_identifier("0"));
        assert!(!is_identifier("kal-l"));
        assert!(!is_identifier(""));
    }

    #[test]
    fn quoting() {
        assert_eq!(quote("clark kent"), "\"clark kent\"");
        assert_eq!(quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(quote("a\\b\nc"), "\"a\\\\b\\nc\"");
        assert_eq!(quote("\u{1}"), "\"\\u0001\"");
    }

    #[test]
    fn regex_delimiters() {
        assert_eq!(escape_delimiters("a/b"), "a\\/b");
        assert_eq!(escape_delimiters("a\\/b"), "a\\/b");
        assert_eq!(escape_delimiters("a\\\\/b"), "a\\\\\\/b");
    }

    #[test]
    fn regex_line_terminators() {
        assert_eq!(escape_delimiters("line1\nline2"), "line1\\nline2");
        assert_eq!(escape_delimiters("a\r\nb"), "a\\r\\nb");
        assert_eq!(escape_delimiters("a\u{2028}b\u{2029}"), "a\\u2028b\\u2029");
        assert_eq!(escape_delimiters("a\\\nb"), "a\\nb");
    }

    #[test]
    fn chained_calls_render_inline() {
        let expr = SchemaExpr::bare("string")
            .then(Call::new("min", vec![Arg::Number("2".into())]))
            .then(Call::new("regex", vec![Arg::Pattern(Pattern::raw("^a/b$"))]))
            .optional();
        assert_eq!(
            render_expr(&expr, "z"),
            "z.string().min(2).regex(/^a\\/b$/).optional()"
        );
    }

    #[test]
    fn nested_shapes_indent() {
        let inner = SchemaExpr::call(
            "object",
            vec![Arg::Shape(vec![ShapeEntry {
                key: "title".into(),
                comment: None,
                schema: SchemaExpr::bare("string"),
            }])],
        );
        let outer = SchemaExpr::call(
            "object",
            vec![Arg::Shape(vec![
                ShapeEntry {
                    key: "movie".into(),
                    comment: Some("/**\n   * The movie.\n   */".into()),
                    schema: inner,
                },
                ShapeEntry {
                    key: "year".into(),
                    comment: None,
                    schema: SchemaExpr::bare("number"),
                },
            ])],
        );
        assert_eq!(
            render_expr(&outer, "z"),
            "z.object({\n    /**\n     * The movie.\n     */\n    movie: z.object({\n        title: z.string()\n    }),\n    year: z.number()\n})"
        );
    }

    #[test]
    fn empty_shape_and_mask() {
        assert_eq!(
            render_expr(&SchemaExpr::call("object", vec![Arg::Shape(vec![])]), "z"),
            "z.object({})"
        );
        let picked = SchemaExpr::reference("heroSchema").then(Call::new(
            "pick",
            vec![Arg::Mask(vec!["name".into(), "location".into()])],
        ));
        assert_eq!(
            render_expr(&picked, "z"),
            "heroSchema.pick({ \"name\": true, \"location\": true })"
        );
    }

    #[test]
    fn module_header_uses_alias() {
        let declaration = GeneratedDeclaration {
            source_name: "Flag".into(),
            identifier: "flagSchema".into(),
            alias: "zod".into(),
            expr: SchemaExpr::bare("boolean"),
        };
        let options = GenerateOptions {
            schema_library_alias: Some("zod".into()),
            ..Default::default()
        };
        assert_eq!(
            render_module(&[declaration], &options),
            "// Generated by normalize-zodgen\nimport { z as zod } from \"zod\";\n\nexport const flagSchema = zod.boolean();\n"
        );
    }
}
