//! Registry of generators
//!
//! Provides [`GeneratorRegistry`], the ordered, name-keyed generator list the
//! orchestrator runs. Registration order is run order.

use crate::builtin::{
    ActionGenerator, MigrationGenerator, ModelGenerator, PageGenerator, RouteGenerator,
    SeederGenerator, TestGenerator, TypesGenerator,
};
use crate::generator::Generator;

/// Ordered collection of generators
#[derive(Debug, Default)]
pub struct GeneratorRegistry {
    generators: Vec<Box<dyn Generator>>,
}

impl GeneratorRegistry {
    /// Create new empty registry
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self {
            generators: Vec::new(),
        }
    }

    /// Create registry with the built-in generators
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry
            .register(ModelGenerator)
            .register(MigrationGenerator)
            .register(SeederGenerator)
            .register(ActionGenerator)
            .register(RouteGenerator)
            .register(PageGenerator)
            .register(TypesGenerator)
            .register(TestGenerator);
        registry
    }

    /// Register a generator. A generator with the same name is replaced in
    /// place, keeping its position.
    pub fn register(&mut self, generator: impl Generator + 'static) -> &mut Self {
        self.register_boxed(Box::new(generator))
    }

    /// Register an already boxed generator
    pub fn register_boxed(&mut self, generator: Box<dyn Generator>) -> &mut Self {
        match self.position(generator.name()) {
            Some(idx) => self.generators[idx] = generator,
            None => self.generators.push(generator),
        }
        self
    }

    /// Check if generator exists
    #[inline]
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    /// Get generator by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&dyn Generator> {
        self.position(name).map(|idx| &*self.generators[idx])
    }

    /// Remove generator
    pub fn remove(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(idx) => {
                self.generators.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Registered names in run order
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.generators.iter().map(|g| g.name()).collect()
    }

    /// Get number of registered generators
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.generators.len()
    }

    /// Check if registry is empty
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.generators.is_empty()
    }

    /// Iterate in run order
    pub fn iter(&self) -> impl Iterator<Item = &dyn Generator> {
        self.generators.iter().map(|g| &**g)
    }

    /// Generators selected by an optional allow-list, in run order.
    /// Unknown names select nothing.
    pub fn select<'a>(
        &'a self,
        only: Option<&'a [String]>,
    ) -> impl Iterator<Item = &'a dyn Generator> + 'a {
        self.iter()
            .filter(move |g| only.map_or(true, |names| names.iter().any(|n| n == g.name())))
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.generators.iter().position(|g| g.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::{GeneratorContext, GeneratorError, GeneratorOutput};
    use draftsmith_draft::Specification;

    #[derive(Debug)]
    struct Named(&'static str, bool);

    impl Generator for Named {
        fn name(&self) -> &str {
            self.0
        }

        fn supports(&self, _spec: &Specification) -> bool {
            self.1
        }

        fn generate(&self, _ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
            Ok(GeneratorOutput::new())
        }
    }

    #[test]
    fn registry_new_empty() {
        let registry = GeneratorRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.len(), 0);
    }

    #[test]
    fn registry_with_defaults_in_order() {
        let registry = GeneratorRegistry::with_defaults();
        assert_eq!(
            registry.names(),
            vec!["model", "migration", "seeder", "action", "route", "page", "types", "test"]
        );
    }

    #[test]
    fn register_same_name_replaces_in_place() {
        let mut registry = GeneratorRegistry::with_defaults();
        registry.register(Named("migration", false));
        assert_eq!(registry.len(), 8);
        assert_eq!(registry.names()[1], "migration");
        assert!(registry.get("migration").is_some());
    }

    #[test]
    fn registry_remove() {
        let mut registry = GeneratorRegistry::with_defaults();
        assert!(registry.remove("page"));
        assert!(!registry.contains("page"));
        assert!(!registry.remove("page"));
    }

    #[test]
    fn select_filters_and_ignores_unknown() {
        let mut registry = GeneratorRegistry::new();
        registry.register(Named("a", true)).register(Named("b", true));

        let all: Vec<_> = registry.select(None).map(|g| g.name().to_string()).collect();
        assert_eq!(all, vec!["a", "b"]);

        let only = vec!["b".to_string(), "nope".to_string()];
        let picked: Vec<_> = registry.select(Some(only.as_slice())).map(|g| g.name().to_string()).collect();
        assert_eq!(picked, vec!["b"]);
    }
}
