//! Input readers.
//!
//! Each reader produces IR [`Declaration`](crate::ir::Declaration)s.

pub mod json;
#[cfg(feature = "input-typescript")]
pub mod typescript;

#[cfg(feature = "input-typescript")]
pub use typescript::{first_declaration, parse_declarations as parse_typescript};
