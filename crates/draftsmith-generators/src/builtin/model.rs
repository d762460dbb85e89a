//! Entity structs: `src/models/<snake>.rs`

use super::{columns, rust_type};
use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{inflect, EntityDef, RelationKind, Specification};
use std::fmt::Write;

/// One scaffolded struct per entity
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelGenerator;

impl Generator for ModelGenerator {
    fn name(&self) -> &str {
        "model"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.entities().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let emitter = FileEmitter::from_context(ctx);
        let mut out = GeneratorOutput::new();

        for fk in ctx.spec.unresolved_foreign_keys() {
            tracing::warn!(entity = %fk.entity, field = %fk.field, target = %fk.target, "unresolved foreign key");
            out.warn(format!(
                "{}.{} references entity '{}' which is not declared in the draft",
                fk.entity, fk.field, fk.target
            ));
        }

        for entity in ctx.spec.entities().values() {
            let path = format!("src/models/{}.rs", inflect::snake(&entity.name));
            emitter.emit(&mut out, path, &render(entity), Ownership::ScaffoldOnly)?;
        }
        Ok(out)
    }
}

fn render(entity: &EntityDef) -> String {
    let mut src = String::new();
    let _ = writeln!(src, "//! {} model", entity.name);
    src.push('\n');
    src.push_str("use serde::{Deserialize, Serialize};\n\n");
    src.push_str("#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]\n");
    let _ = writeln!(src, "pub struct {} {{", entity.name);
    for (name, field) in columns(entity) {
        let _ = writeln!(src, "    pub {name}: {},", rust_type(&field));
    }
    src.push_str("}\n\n");

    let _ = writeln!(src, "impl {} {{", entity.name);
    let _ = writeln!(src, "    pub const TABLE: &'static str = \"{}\";", entity.table());
    let enabled: Vec<String> = entity
        .traits
        .keys()
        .filter(|name| entity.has_trait(name))
        .map(|name| format!("\"{name}\""))
        .collect();
    if !enabled.is_empty() {
        let _ = writeln!(
            src,
            "    pub const TRAITS: &'static [&'static str] = &[{}];",
            enabled.join(", ")
        );
    }
    for kind in RelationKind::ALL {
        for target in entity.related(kind) {
            src.push('\n');
            let _ = writeln!(src, "    /// {kind} {}", target.entity);
            let _ = writeln!(
                src,
                "    pub fn {}() -> &'static str {{\n        \"{}\"\n    }}",
                target.accessor(),
                target.entity
            );
        }
    }
    src.push_str("}\n");
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::Harness;
    use pretty_assertions::assert_eq;

    const DRAFT: &str = "models:\n  Post:\n    title: string:255\n    published_at:\n    relationships:\n      belongsTo: User\n    timestamps: true\n";

    #[test]
    fn renders_struct_and_warns_on_unknown_target() {
        let h = Harness::new(DRAFT);
        let out = ModelGenerator.generate(&h.ctx()).unwrap();

        assert_eq!(out.generated.len(), 1);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("'User'"));

        let src = h.read("src/models/post.rs");
        assert!(src.contains("pub struct Post {"));
        assert!(src.contains("pub title: String,"));
        assert!(src.contains("pub published_at: Option<String>,"));
        assert!(src.contains("pub user_id: i64,"));
        assert!(src.contains("pub created_at: Option<String>,"));
        assert!(src.contains("TABLE: &'static str = \"posts\""));
        assert!(src.contains("pub fn user()"));
        assert!(!src.contains("TRAITS"));
    }

    #[test]
    fn enabled_traits_are_listed() {
        let h = Harness::new(
            "models:\n  Post:\n    title: string\n    traits:\n      searchable: true\n      archived: false\n      audited: true\n",
        );
        ModelGenerator.generate(&h.ctx()).unwrap();

        let src = h.read("src/models/post.rs");
        assert!(src.contains("pub const TRAITS: &'static [&'static str] = &[\"searchable\", \"audited\"];"));
    }

    #[test]
    fn second_run_is_identical() {
        let h = Harness::new(DRAFT);
        let first = ModelGenerator.generate(&h.ctx()).unwrap();
        let second = ModelGenerator.generate(&h.ctx()).unwrap();
        assert_eq!(first.generated, second.generated);
        assert!(second.backup.is_empty());
    }
}
