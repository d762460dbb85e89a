//! Action handlers: `src/actions/<snake>.rs`

use super::param_type;
use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{inflect, ActionDef, Specification};
use std::collections::BTreeSet;
use std::fmt::Write;

/// One scaffolded handler per action
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionGenerator;

impl Generator for ActionGenerator {
    fn name(&self) -> &str {
        "action"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.actions().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let emitter = FileEmitter::from_context(ctx);
        let mut out = GeneratorOutput::new();

        for action in ctx.spec.actions().values() {
            if let Some(model) = &action.model {
                if ctx.spec.entity(model).is_none() {
                    out.warn(format!(
                        "action {} refers to model '{model}' which is not declared in the draft",
                        action.name
                    ));
                }
            }
            let path = format!("src/actions/{}.rs", inflect::snake(&action.name));
            emitter.emit(&mut out, path, &render(ctx.spec, action), Ownership::ScaffoldOnly)?;
        }
        Ok(out)
    }
}

fn render(spec: &Specification, action: &ActionDef) -> String {
    let model = action.model.as_deref();
    let params: Vec<(String, String)> = action
        .params
        .iter()
        .map(|p| (p.name.clone(), param_type(&p.name, p.ty.as_deref(), model)))
        .collect();
    let returns = action.return_entity();

    // Declared entities this handler mentions
    let imports: BTreeSet<&str> = params
        .iter()
        .map(|(_, ty)| ty.as_str())
        .chain(returns)
        .filter(|ty| spec.entity(ty).is_some())
        .collect();

    let mut src = String::new();
    let _ = writeln!(src, "//! {} action", action.name);
    src.push('\n');
    for entity in &imports {
        let _ = writeln!(src, "use crate::models::{}::{entity};", inflect::snake(entity));
    }
    if !imports.is_empty() {
        src.push('\n');
    }

    let _ = writeln!(src, "pub struct {};\n", action.name);
    let _ = writeln!(src, "impl {} {{", action.name);
    let args: Vec<_> = params
        .iter()
        .map(|(name, ty)| format!(", {name}: {ty}"))
        .collect();
    let ret = returns.map(|r| format!(" -> {r}")).unwrap_or_default();
    let _ = writeln!(src, "    pub fn handle(&self{}){ret} {{", args.concat());
    let _ = writeln!(src, "        todo!(\"implement {}\")", action.name);
    src.push_str("    }\n}\n");
    src
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::Harness;

    #[test]
    fn renders_handler_signature() {
        let h = Harness::new(
            "models:\n  Post: [id, title]\nactions:\n  PublishPost:\n    model: Post\n    params: [post, {name: notify, type: bool}]\n    return: model\n",
        );
        let out = ActionGenerator.generate(&h.ctx()).unwrap();
        assert!(out.warnings.is_empty());

        let src = h.read("src/actions/publish_post.rs");
        assert!(src.contains("use crate::models::post::Post;"));
        assert!(src.contains("pub fn handle(&self, post: Post, notify: bool) -> Post {"));
    }

    #[test]
    fn warns_on_undeclared_model() {
        let h = Harness::new("actions:\n  Archive:\n    model: Invoice\n");
        let out = ActionGenerator.generate(&h.ctx()).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(h.read("src/actions/archive.rs").contains("pub fn handle(&self) {"));
    }
}
