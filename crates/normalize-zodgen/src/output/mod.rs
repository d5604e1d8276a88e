//! Output writers for generated schemas.
//!
//! Each writer takes [`GeneratedDeclaration`](crate::expr::GeneratedDeclaration)s
//! and produces source text.

// Zod (TypeScript validator)
pub mod zod;

pub use zod::{render_declaration, render_expr, render_module};
