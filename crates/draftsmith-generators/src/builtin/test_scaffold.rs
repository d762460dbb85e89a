//! Test stubs: `tests/<snake>_test.rs`

use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use draftsmith_artifact::Ownership;
use draftsmith_draft::{inflect, Specification};
use std::fmt::Write;

/// One scaffolded test file per action
#[derive(Debug, Clone, Copy, Default)]
pub struct TestGenerator;

impl Generator for TestGenerator {
    fn name(&self) -> &str {
        "test"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.actions().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let emitter = FileEmitter::from_context(ctx);
        let mut out = GeneratorOutput::new();

        for action in ctx.spec.actions().values() {
            let snake = inflect::snake(&action.name);
            let mut src = String::new();
            let _ = writeln!(src, "//! Tests for the {} action\n", action.name);
            src.push_str("#[test]\n");
            let _ = writeln!(src, "#[ignore = \"scaffold: fill in {}\"]", action.name);
            let _ = writeln!(src, "fn {snake}_handles_valid_input() {{");
            src.push_str("    // arrange, act, assert\n}\n");

            emitter.emit(&mut out, format!("tests/{snake}_test.rs"), &src, Ownership::ScaffoldOnly)?;
        }
        Ok(out)
    }
}
