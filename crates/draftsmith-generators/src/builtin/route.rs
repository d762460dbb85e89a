//! Route table: `src/routes.rs`

use super::header;
use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{inflect, Specification};
use std::fmt::Write;

/// Single route table covering actions and pages
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGenerator;

impl Generator for RouteGenerator {
    fn name(&self) -> &str {
        "route"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.actions().is_empty() || !spec.pages().is_empty() || !spec.routes().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let mut out = GeneratorOutput::new();
        let src = render(ctx)?;
        FileEmitter::from_context(ctx).emit(&mut out, "src/routes.rs", &src, Ownership::Regenerate)?;
        Ok(out)
    }
}

fn render(ctx: &GeneratorContext<'_>) -> Result<String, GeneratorError> {
    let spec = ctx.spec;
    let prefix = spec
        .routes()
        .get("prefix")
        .and_then(serde_yaml::Value::as_str)
        .map_or_else(String::new, |p| format!("/{}", p.trim_matches('/')));

    let mut src = header(ctx, "//");
    src.push('\n');
    src.push_str("/// `(method, path, handler)`\n");
    src.push_str("pub const ROUTES: &[(&str, &str, &str)] = &[\n");
    for name in spec.actions().keys() {
        let _ = writeln!(src, "    (\"POST\", \"{prefix}/actions/{}\", \"{name}\"),", kebab(name));
    }
    for name in spec.pages().keys() {
        let _ = writeln!(src, "    (\"GET\", \"{prefix}/{}\", \"{name}\"),", kebab(name));
    }
    src.push_str("];\n");

    if !spec.routes().is_empty() {
        src.push_str("\n/// Route hints from the draft, as JSON\n");
        src.push_str("pub const HINTS: &[(&str, &str)] = &[\n");
        for (key, value) in spec.routes() {
            let json = serde_json::to_string(value).map_err(|e| GeneratorError::Render(e.to_string()))?;
            let _ = writeln!(src, "    ({key:?}, {json:?}),");
        }
        src.push_str("];\n");
    }
    Ok(src)
}

fn kebab(name: &str) -> String {
    inflect::snake(name).replace('_', "-")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::Harness;

    #[test]
    fn routes_for_actions_and_pages() {
        let h = Harness::new(
            "actions:\n  PublishPost:\npages:\n  user_dashboard:\n    layout: wide\nroutes:\n  prefix: /api/\n",
        );
        assert!(RouteGenerator.supports(&h.spec));
        RouteGenerator.generate(&h.ctx()).unwrap();

        let src = h.read("src/routes.rs");
        assert!(src.contains("(\"POST\", \"/api/actions/publish-post\", \"PublishPost\"),"));
        assert!(src.contains("(\"GET\", \"/api/user-dashboard\", \"user_dashboard\"),"));
        assert!(src.contains("(\"prefix\", \"\\\"/api/\\\"\"),"));
    }

    #[test]
    fn unsupported_for_entities_only() {
        let h = Harness::new("models:\n  Post: [title]\n");
        assert!(!RouteGenerator.supports(&h.spec));
    }
}
