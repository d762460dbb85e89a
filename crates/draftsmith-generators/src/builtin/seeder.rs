//! Seed manifests: `database/seeders/<snake>_seeder.json`

use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{inflect, Specification};
use serde_json::json;

/// Seed manifest for every entity declaring a `seeder`
#[derive(Debug, Clone, Copy, Default)]
pub struct SeederGenerator;

impl Generator for SeederGenerator {
    fn name(&self) -> &str {
        "seeder"
    }

    fn supports(&self, spec: &Specification) -> bool {
        spec.entities().values().any(|e| e.seeder.is_some())
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let emitter = FileEmitter::from_context(ctx);
        let mut out = GeneratorOutput::new();

        for entity in ctx.spec.entities().values() {
            let Some(seeder) = &entity.seeder else { continue };
            let manifest = json!({
                "entity": entity.name,
                "table": entity.table(),
                "category": seeder.category,
                "count": seeder.count,
                "optional": seeder.optional,
            });
            let mut body = serde_json::to_string_pretty(&manifest)
                .map_err(|e| GeneratorError::Render(e.to_string()))?;
            body.push('\n');

            let path = format!("database/seeders/{}_seeder.json", inflect::snake(&entity.name));
            emitter.emit(&mut out, path, &body, Ownership::Regenerate)?;
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::Harness;

    #[test]
    fn only_seeded_entities_get_manifests() {
        let h = Harness::new(
            "models:\n  Post:\n    title: string\n    seeder:\n      category: demo\n      count: 5\n  Tag: [name]\n",
        );
        assert!(SeederGenerator.supports(&h.spec));

        let out = SeederGenerator.generate(&h.ctx()).unwrap();
        assert_eq!(out.generated.len(), 1);

        let manifest: serde_json::Value =
            serde_json::from_str(&h.read("database/seeders/post_seeder.json")).unwrap();
        assert_eq!(manifest["category"], "demo");
        assert_eq!(manifest["count"], 5);
        assert_eq!(manifest["table"], "posts");
    }

    #[test]
    fn unsupported_without_seeders() {
        let h = Harness::new("models:\n  Tag: [name]\n");
        assert!(!SeederGenerator.supports(&h.spec));
    }
}
