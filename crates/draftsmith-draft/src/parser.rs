//! Draft parser
//!
//! Single entry point from draft text to a [`Specification`]:
//! YAML → top-level mapping check → normalize `models` → validate → build.

use crate::error::ParseError;
use crate::model::{
    is_reserved_key, ActionDef, ActionParam, ActionReturn, EntityDef, FieldDef, RelationKind,
    SeederCategory, SeederDef, Specification,
};
use crate::normalize::{normalize_entities, split_references};
use crate::validate::validate;
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::path::Path;

/// Draft parser
#[derive(Debug, Clone, Copy, Default)]
pub struct DraftParser;

impl DraftParser {
    /// Create new draft parser
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse draft text
    ///
    /// # Errors
    ///
    /// [`ParseError::Syntax`] for unparsable YAML, [`ParseError::NotAMapping`]
    /// when the document is not a mapping, [`ParseError::Invalid`] carrying
    /// every validation problem otherwise.
    pub fn parse(&self, text: &str) -> Result<Specification, ParseError> {
        let value: Value = serde_yaml::from_str(text)?;
        let mut root = match value {
            Value::Mapping(root) => root,
            other => {
                return Err(ParseError::NotAMapping {
                    found: kind_of(&other),
                })
            }
        };

        if let Some(Value::Mapping(models)) = root.get("models") {
            let normalized = normalize_entities(models);
            root.insert(Value::String("models".into()), Value::Mapping(normalized));
        }

        let root = Value::Mapping(root);
        let errors = validate(&root);
        if !errors.is_empty() {
            tracing::debug!(count = errors.len(), "draft failed validation");
            return Err(ParseError::Invalid { errors });
        }

        Ok(build_specification(&root))
    }

    /// Read and parse a draft file
    ///
    /// # Errors
    ///
    /// [`ParseError::Io`] when the file cannot be read, otherwise as
    /// [`DraftParser::parse`].
    pub fn parse_file(&self, path: &Path) -> Result<Specification, ParseError> {
        let text = std::fs::read_to_string(path).map_err(|e| ParseError::io_error(path, e))?;
        self.parse(&text)
    }
}

/// Parse draft text with the default parser
///
/// # Errors
///
/// See [`DraftParser::parse`].
pub fn parse(text: &str) -> Result<Specification, ParseError> {
    DraftParser::new().parse(text)
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "nothing",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

// Input has already passed validation; anything unexpected is skipped.
fn build_specification(root: &Value) -> Specification {
    let section = |key: &str| root.get(key).and_then(Value::as_mapping);

    let schema_version = root.get("schema_version").and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    });

    let entities = section("models")
        .into_iter()
        .flatten()
        .filter_map(|(name, body)| {
            let name = name.as_str()?;
            Some((name.to_string(), build_entity(name, body.as_mapping()?)))
        })
        .collect();

    let actions = section("actions")
        .into_iter()
        .flatten()
        .filter_map(|(name, body)| {
            let name = name.as_str()?;
            Some((name.to_string(), build_action(name, body)))
        })
        .collect();

    Specification {
        schema_version,
        entities,
        actions,
        pages: string_keyed(section("pages")),
        routes: string_keyed(section("routes")),
    }
}

fn string_keyed(map: Option<&Mapping>) -> IndexMap<String, Value> {
    map.into_iter()
        .flatten()
        .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.clone())))
        .collect()
}

fn build_entity(name: &str, body: &Mapping) -> EntityDef {
    let mut entity = EntityDef {
        name: name.to_string(),
        fields: IndexMap::new(),
        relationships: IndexMap::new(),
        seeder: None,
        soft_deletes: false,
        timestamps: false,
        traits: IndexMap::new(),
    };

    for (key, value) in body {
        let Some(key) = key.as_str() else { continue };
        match key {
            "relationships" => {
                for (kind, targets) in value.as_mapping().into_iter().flatten() {
                    let Some(kind) = kind.as_str().and_then(RelationKind::from_key) else {
                        continue;
                    };
                    let targets = match targets {
                        Value::String(list) => split_references(list),
                        Value::Sequence(items) => items
                            .iter()
                            .filter_map(Value::as_str)
                            .flat_map(split_references)
                            .collect(),
                        _ => Vec::new(),
                    };
                    entity.relationships.entry(kind).or_default().extend(targets);
                }
            }
            "seeder" => {
                entity.seeder = build_seeder(value);
            }
            "softDeletes" => entity.soft_deletes = value.as_bool().unwrap_or(false),
            "timestamps" => entity.timestamps = value.as_bool().unwrap_or(false),
            "traits" => {
                entity.traits = value
                    .as_mapping()
                    .into_iter()
                    .flatten()
                    .filter_map(|(k, v)| Some((k.as_str()?.to_string(), v.as_bool()?)))
                    .collect();
            }
            field => {
                debug_assert!(!is_reserved_key(field));
                if let Some(descriptor) = value.as_str() {
                    entity
                        .fields
                        .insert(field.to_string(), FieldDef::parse(descriptor));
                }
            }
        }
    }
    entity
}

fn build_seeder(value: &Value) -> Option<SeederDef> {
    Some(SeederDef {
        category: SeederCategory::from_name(value.get("category")?.as_str()?)?,
        count: u32::try_from(value.get("count")?.as_u64()?).ok()?,
        optional: value
            .get("optional")
            .and_then(Value::as_bool)
            .unwrap_or(false),
    })
}

fn build_action(name: &str, body: &Value) -> ActionDef {
    let model = body.get("model").and_then(Value::as_str).map(str::to_string);
    let params = body
        .get("params")
        .and_then(Value::as_sequence)
        .into_iter()
        .flatten()
        .filter_map(|param| match param {
            Value::String(name) => Some(ActionParam {
                name: name.clone(),
                ty: None,
            }),
            Value::Mapping(map) => Some(ActionParam {
                name: map.get("name")?.as_str()?.to_string(),
                ty: map.get("type").and_then(Value::as_str).map(str::to_string),
            }),
            _ => None,
        })
        .collect();
    let returns = body
        .get("return")
        .and_then(Value::as_str)
        .map_or(ActionReturn::Void, ActionReturn::parse);

    ActionDef {
        name: name.to_string(),
        model,
        params,
        returns,
    }
}
