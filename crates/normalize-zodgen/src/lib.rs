//! Zod validator generation from TypeScript type declarations.
//!
//! `normalize-zodgen` turns `type` and `interface` declarations into Zod
//! schema expressions, so runtime validators stay in lockstep with the types
//! they mirror. Documentation tags on members (`@format`, `@pattern`,
//! `@minimum`, …) become refinement calls.
//!
//! # Architecture
//!
//! ```text
//! Input                IR                 Compile              Output
//! ──────────────    ──────────────    ────────────────    ──────────────
//! TypeScript   ─┐                     names, directive,
//! (tree-sitter) ├─> Declaration ────> template ────────> SchemaExpr ──> Zod source
//! JSON IR      ─┘   (ir.rs)           (compile.rs)        (expr.rs)     (output/)
//! ```
//!
//! # Example
//!
//! ```
//! use normalize_zodgen::{CompileOptions, Declaration, ObjectMember, TypeNode};
//! use normalize_zodgen::{compile_declaration, output::render_declaration};
//!
//! let declaration = Declaration::new(
//!     "Superman",
//!     TypeNode::object(vec![
//!         ObjectMember::required("name", TypeNode::string()),
//!         ObjectMember::optional("weakness", TypeNode::reference("Kryptonite")),
//!     ]),
//! );
//!
//! let generated = compile_declaration(&declaration, &CompileOptions::default()).unwrap();
//! assert_eq!(
//!     render_declaration(&generated, true),
//!     "export const supermanSchema = z.object({\n    name: z.string(),\n    weakness: kryptoniteSchema.optional()\n});"
//! );
//! ```
//!
//! # Feature Flags
//!
//! - `input-typescript` - read TypeScript source with tree-sitter
//! - `cli` - the `normalize-zodgen` binary

pub mod compile;
pub mod config;
pub mod directive;
pub mod error;
pub mod expr;
pub mod generate;
pub mod input;
pub mod ir;
pub mod names;
pub mod output;
pub mod template;

// Re-export commonly used items
pub use compile::{CompileOptions, compile, compile_declaration};
pub use config::{ConfigError, ZodgenConfig};
pub use directive::{Directive, extract_directives};
pub use error::GenerateError;
pub use expr::{GeneratedDeclaration, SchemaExpr};
pub use generate::{GenerateOptions, GenerateOutput, SkippedDeclaration, generate_declarations};
pub use ir::{Declaration, Literal, ObjectMember, Primitive, TypeNode};
pub use names::{schema_library_alias, schema_name};
pub use template::{Pattern, compile_pattern};

#[cfg(feature = "input-typescript")]
pub use generate::{generate, generate_declaration};
