//! Module-level generation: every declaration of a source unit into one
//! rendered file.

use crate::compile::{CompileOptions, compile_declaration};
use crate::error::GenerateError;
use crate::expr::GeneratedDeclaration;
use crate::ir::Declaration;
use crate::output::render_module;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Options for generating a whole module.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Binding of the schema library (defaults to `z`).
    pub schema_library_alias: Option<String>,
    /// Prefix bindings with `export`.
    pub export: bool,
    /// Emit the generated-file banner and the `zod` import.
    pub import_header: bool,
    /// Skip declarations that fail to compile instead of aborting.
    pub skip_unsupported: bool,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            schema_library_alias: None,
            export: true,
            import_header: true,
            skip_unsupported: true,
        }
    }
}

impl GenerateOptions {
    pub fn compile_options(&self) -> CompileOptions {
        CompileOptions {
            schema_library_alias: self.schema_library_alias.clone(),
            target_identifier: None,
        }
    }
}

/// A declaration left out of the output.
#[derive(Debug, Clone, PartialEq)]
pub struct SkippedDeclaration {
    pub name: String,
    pub error: GenerateError,
}

/// Result of generating a module.
#[derive(Debug, Clone)]
pub struct GenerateOutput {
    /// Rendered module source.
    pub code: String,
    /// Identifiers of the generated schemas, in declaration order.
    pub generated: Vec<String>,
    pub skipped: Vec<SkippedDeclaration>,
}

/// Compile and render already-parsed declarations.
///
/// Declarations compile independently (and in parallel); output order is
/// declaration order.
pub fn generate_declarations(
    declarations: &[Declaration],
    options: &GenerateOptions,
) -> Result<GenerateOutput, GenerateError> {
    if declarations.is_empty() {
        return Err(GenerateError::MissingDeclaration);
    }

    let compile_options = options.compile_options();
    let results: Vec<_> = declarations
        .par_iter()
        .map(|declaration| compile_declaration(declaration, &compile_options))
        .collect();

    let mut generated: Vec<GeneratedDeclaration> = Vec::with_capacity(results.len());
    let mut skipped = Vec::new();
    for (declaration, result) in declarations.iter().zip(results) {
        match result {
            Ok(schema) => generated.push(schema),
            Err(error) if options.skip_unsupported => {
                tracing::warn!(declaration = %declaration.name, %error, "skipping declaration");
                skipped.push(SkippedDeclaration {
                    name: declaration.name.clone(),
                    error,
                });
            }
            Err(error) => return Err(error),
        }
    }

    Ok(GenerateOutput {
        code: render_module(&generated, options),
        generated: generated.iter().map(|g| g.identifier.clone()).collect(),
        skipped,
    })
}

/// Generate schemas for every declaration in TypeScript `source`.
#[cfg(feature = "input-typescript")]
pub fn generate(source: &str, options: &GenerateOptions) -> Result<GenerateOutput, GenerateError> {
    let declarations = crate::input::parse_typescript(source)?;
    generate_declarations(&declarations, options)
}

/// Compile the first declaration in TypeScript `source`.
#[cfg(feature = "input-typescript")]
pub fn generate_declaration(
    source: &str,
    options: &CompileOptions,
) -> Result<GeneratedDeclaration, GenerateError> {
    let declaration = crate::input::first_declaration(source)?;
    compile_declaration(&declaration, options)
}
