//! Page descriptors: `pages/<snake>.json`

use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{inflect, Specification};
use serde_json::json;

/// Page configuration passed through as JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct PageGenerator;

impl Generator for PageGenerator {
    fn name(&self) -> &str {
        "page"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.pages().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let emitter = FileEmitter::from_context(ctx);
        let mut out = GeneratorOutput::new();

        for (name, config) in ctx.spec.pages() {
            let config = serde_json::to_value(config)
                .map_err(|e| GeneratorError::Render(format!("page {name}: {e}")))?;
            let page = json!({ "name": name, "config": config });
            let mut body = serde_json::to_string_pretty(&page)
                .map_err(|e| GeneratorError::Render(e.to_string()))?;
            body.push('\n');

            emitter.emit(&mut out, format!("pages/{}.json", inflect::snake(name)), &body, Ownership::Regenerate)?;
        }
        Ok(out)
    }
}
