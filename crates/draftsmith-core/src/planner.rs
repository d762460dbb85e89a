//! Build planner
//!
//! Side-effect free dry run: the steps a build of a specification would take,
//! in the same order the default generators are registered.

use draftsmith_draft::{inflect, Specification};
use serde::Serialize;
use std::fmt::{self, Display, Formatter};

/// What a step does
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "entity", rename_all = "snake_case")]
pub enum StepKind {
    /// Create the entity's scaffold files
    Scaffold(String),
    /// Regenerate the entity's schema artifacts from the draft
    Patch(String),
    Actions,
    Routes,
    Pages,
    Types,
    Tests,
}

/// One planned step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanStep {
    /// Category of work
    pub kind: StepKind,
    /// Generators that carry out this step
    pub generators: Vec<&'static str>,
    /// Human-readable summary
    pub description: String,
}

impl PlanStep {
    fn new(kind: StepKind, generators: Vec<&'static str>, description: String) -> Self {
        Self {
            kind,
            generators,
            description,
        }
    }
}

impl Display for PlanStep {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}]", self.description, self.generators.join(", "))
    }
}

/// Plan a build of `spec`
#[must_use]
pub fn plan(spec: &Specification) -> Vec<PlanStep> {
    let mut steps = Vec::with_capacity(spec.entities().len() * 2 + 5);

    for entity in spec.entities().values() {
        steps.push(PlanStep::new(
            StepKind::Scaffold(entity.name.clone()),
            vec!["model"],
            format!(
                "Scaffold {} model at src/models/{}.rs",
                entity.name,
                inflect::snake(&entity.name)
            ),
        ));

        let mut patch = vec!["migration"];
        if entity.seeder.is_some() {
            patch.push("seeder");
        }
        steps.push(PlanStep::new(
            StepKind::Patch(entity.name.clone()),
            patch,
            format!(
                "Patch {} from the draft: {} fields, table {}",
                entity.name,
                entity.fields.len(),
                entity.table()
            ),
        ));
    }

    let actions = spec.actions().len();
    let pages = spec.pages().len();
    steps.push(PlanStep::new(
        StepKind::Actions,
        vec!["action"],
        format!("Generate {actions} action handler(s)"),
    ));
    steps.push(PlanStep::new(
        StepKind::Routes,
        vec!["route"],
        format!("Generate routes for {actions} action(s) and {pages} page(s)"),
    ));
    steps.push(PlanStep::new(
        StepKind::Pages,
        vec!["page"],
        format!("Generate {pages} page descriptor(s)"),
    ));
    steps.push(PlanStep::new(
        StepKind::Types,
        vec!["types"],
        format!("Generate type definitions for {} entities", spec.entities().len()),
    ));
    steps.push(PlanStep::new(
        StepKind::Tests,
        vec!["test"],
        format!("Scaffold tests for {actions} action(s)"),
    ));
    steps
}
