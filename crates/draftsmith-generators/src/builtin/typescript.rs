//! Shared type definitions: `types/models.ts`

use super::{columns, header};
use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{FieldDef, Specification};
use std::fmt::Write;

/// One TypeScript interface per entity
#[derive(Debug, Clone, Copy, Default)]
pub struct TypesGenerator;

impl Generator for TypesGenerator {
    fn name(&self) -> &str {
        "types"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.entities().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let mut src = header(ctx, "//");
        for entity in ctx.spec.entities().values() {
            let _ = write!(src, "\nexport interface {} {{\n", entity.name);
            for (name, field) in columns(entity) {
                let _ = writeln!(src, "  {name}: {};", ts_type(&field));
            }
            src.push_str("}\n");
        }

        let mut out = GeneratorOutput::new();
        FileEmitter::from_context(ctx).emit(&mut out, "types/models.ts", &src, Ownership::Regenerate)?;
        Ok(out)
    }
}

fn ts_type(field: &FieldDef) -> String {
    let scalar = match field.column_type.as_str() {
        "id" | "integer" | "bigInteger" | "unsignedInteger" | "unsignedBigInteger"
        | "tinyInteger" | "smallInteger" | "decimal" | "float" | "double" => "number",
        "boolean" | "bool" => "boolean",
        "json" | "jsonb" => "unknown",
        _ => "string",
    };
    if field.has_modifier("nullable") {
        format!("{scalar} | null")
    } else {
        scalar.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::Harness;

    #[test]
    fn interfaces_for_every_entity() {
        let h = Harness::new("models:\n  Post: [id, title, is_public, published_at]\n  Tag: [name]\n");
        TypesGenerator.generate(&h.ctx()).unwrap();

        let ts = h.read("types/models.ts");
        assert!(ts.starts_with("// Generated by draftsmith"));
        assert!(ts.contains("export interface Post {\n  id: number;\n  title: string;\n  is_public: boolean;\n  published_at: string | null;\n}"));
        assert!(ts.contains("export interface Tag {"));
    }
}
