//! Specification Model
//!
//! The parsed, validated and normalized draft. A [`Specification`] is built
//! fresh by every parse call and never mutated afterwards.

use crate::inflect;
use indexmap::IndexMap;
use serde::Serialize;
use serde_yaml::Value;
use std::fmt::{self, Display, Formatter};

/// Entity keys that are not fields
pub const RESERVED_KEYS: &[&str] = &["relationships", "seeder", "softDeletes", "timestamps", "traits"];

/// Is `key` one of the reserved, non-field entity keys?
#[inline]
#[must_use]
pub fn is_reserved_key(key: &str) -> bool {
    RESERVED_KEYS.contains(&key)
}

/// The parsed draft
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Specification {
    pub(crate) schema_version: Option<String>,
    pub(crate) entities: IndexMap<String, EntityDef>,
    pub(crate) actions: IndexMap<String, ActionDef>,
    pub(crate) pages: IndexMap<String, Value>,
    pub(crate) routes: IndexMap<String, Value>,
}

impl Specification {
    /// Informational schema version string
    #[inline]
    #[must_use]
    pub fn schema_version(&self) -> Option<&str> {
        self.schema_version.as_deref()
    }

    /// Entities in draft order
    #[inline]
    #[must_use]
    pub fn entities(&self) -> &IndexMap<String, EntityDef> {
        &self.entities
    }

    /// Actions in draft order
    #[inline]
    #[must_use]
    pub fn actions(&self) -> &IndexMap<String, ActionDef> {
        &self.actions
    }

    /// Opaque page configuration in draft order
    #[inline]
    #[must_use]
    pub fn pages(&self) -> &IndexMap<String, Value> {
        &self.pages
    }

    /// Route hints in draft order
    #[inline]
    #[must_use]
    pub fn routes(&self) -> &IndexMap<String, Value> {
        &self.routes
    }

    /// Look up an entity by name
    #[inline]
    #[must_use]
    pub fn entity(&self, name: &str) -> Option<&EntityDef> {
        self.entities.get(name)
    }

    /// Foreign keys whose target entity is not declared in this draft
    #[must_use]
    pub fn unresolved_foreign_keys(&self) -> Vec<ForeignKeyRef> {
        self.entities
            .values()
            .flat_map(|entity| {
                entity
                    .foreign_keys()
                    .filter(|fk| !self.entities.contains_key(&fk.target))
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

/// A foreign-key field and the entity it points at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyRef {
    /// Entity declaring the field
    pub entity: String,
    /// Field name, e.g. `user_id`
    pub field: String,
    /// Referenced entity
    pub target: String,
}

/// One entity: typed fields plus the reserved keys
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityDef {
    /// Singular, capitalized name
    pub name: String,
    /// Columns in output order, including implied `id` and timestamps
    pub fields: IndexMap<String, FieldDef>,
    /// Declared relations by kind
    pub relationships: IndexMap<RelationKind, Vec<RelationTarget>>,
    /// Seeding directive, if any
    pub seeder: Option<SeederDef>,
    /// `softDeletes: true`
    pub soft_deletes: bool,
    /// `timestamps: true`
    pub timestamps: bool,
    /// Free-form flags from `traits:`
    pub traits: IndexMap<String, bool>,
}

impl EntityDef {
    /// Conventional table name
    #[inline]
    #[must_use]
    pub fn table(&self) -> String {
        inflect::table_name(&self.name)
    }

    /// Foreign-key fields in declaration order
    pub fn foreign_keys(&self) -> impl Iterator<Item = ForeignKeyRef> + '_ {
        self.fields.iter().filter_map(|(field, def)| {
            def.foreign_key_target(field).map(|target| ForeignKeyRef {
                entity: self.name.clone(),
                field: field.clone(),
                target,
            })
        })
    }

    /// Targets of a relation kind, empty when none are declared
    #[must_use]
    pub fn related(&self, kind: RelationKind) -> &[RelationTarget] {
        self.relationships.get(&kind).map_or(&[][..], Vec::as_slice)
    }

    /// Free-form trait flag
    #[inline]
    #[must_use]
    pub fn has_trait(&self, name: &str) -> bool {
        self.traits.get(name).copied().unwrap_or(false)
    }
}

/// Parsed `type[:argument] [modifier...]` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDef {
    /// `string`, `id`, `timestamp`, ...
    pub column_type: String,
    /// Text after the colon, e.g. `255`
    pub argument: Option<String>,
    /// `nullable`, `unique`, `default:0`, ...
    pub modifiers: Vec<String>,
}

impl FieldDef {
    /// Parse a descriptor such as `string:255 unique`
    #[must_use]
    pub fn parse(descriptor: &str) -> Self {
        let mut tokens = descriptor.split_whitespace();
        let head = tokens.next().unwrap_or_default();
        let (column_type, argument) = match head.split_once(':') {
            Some((ty, arg)) => (ty.to_string(), Some(arg.to_string())),
            None => (head.to_string(), None),
        };
        Self {
            column_type,
            argument,
            modifiers: tokens.map(str::to_string).collect(),
        }
    }

    /// Does the descriptor carry a modifier (`nullable`, `unique`, ...)?
    #[inline]
    #[must_use]
    pub fn has_modifier(&self, modifier: &str) -> bool {
        self.modifiers
            .iter()
            .any(|m| m == modifier || m.split_once(':').is_some_and(|(head, _)| head == modifier))
    }

    /// Auto-incrementing primary key?
    #[inline]
    #[must_use]
    pub fn is_primary_key(&self, field: &str) -> bool {
        self.column_type == "id" && field == "id" && self.argument.is_none()
    }

    /// Target entity when this is a foreign key.
    ///
    /// `id:User` names the target explicitly; a bare `id` type on any field
    /// other than `id` infers it from the name (`author_id` → `Author`).
    #[must_use]
    pub fn foreign_key_target(&self, field: &str) -> Option<String> {
        if self.column_type != "id" || self.is_primary_key(field) {
            return None;
        }
        match &self.argument {
            Some(target) => Some(target.clone()),
            None => Some(inflect::studly(field.strip_suffix("_id").unwrap_or(field))),
        }
    }
}

impl Display for FieldDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_type)?;
        if let Some(arg) = &self.argument {
            write!(f, ":{arg}")?;
        }
        for modifier in &self.modifiers {
            write!(f, " {modifier}")?;
        }
        Ok(())
    }
}

/// Relationship kinds accepted under `relationships`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum RelationKind {
    BelongsTo,
    HasOne,
    HasMany,
    BelongsToMany,
    MorphTo,
    MorphOne,
    MorphMany,
}

impl RelationKind {
    /// All kinds, in canonical order
    pub const ALL: [Self; 7] = [
        Self::BelongsTo,
        Self::HasOne,
        Self::HasMany,
        Self::BelongsToMany,
        Self::MorphTo,
        Self::MorphOne,
        Self::MorphMany,
    ];

    /// Draft key for this kind
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::BelongsTo => "belongsTo",
            Self::HasOne => "hasOne",
            Self::HasMany => "hasMany",
            Self::BelongsToMany => "belongsToMany",
            Self::MorphTo => "morphTo",
            Self::MorphOne => "morphOne",
            Self::MorphMany => "morphMany",
        }
    }

    /// Parse a draft key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl Display for RelationKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// `EntityName[:alias]`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationTarget {
    /// Related entity
    pub entity: String,
    /// Accessor name override
    pub alias: Option<String>,
}

impl RelationTarget {
    /// Parse `User` or `User:author`
    #[must_use]
    pub fn parse(reference: &str) -> Self {
        match reference.trim().split_once(':') {
            Some((entity, alias)) => Self {
                entity: entity.trim().to_string(),
                alias: Some(alias.trim().to_string()),
            },
            None => Self {
                entity: reference.trim().to_string(),
                alias: None,
            },
        }
    }

    /// Relation method name: the alias, else the snake-cased entity
    #[must_use]
    pub fn accessor(&self) -> String {
        self.alias
            .clone()
            .unwrap_or_else(|| inflect::snake(&self.entity))
    }
}

/// Seeder categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeederCategory {
    /// Reference data every environment needs
    Essential,
    /// Local development fixtures
    Development,
    /// Sample content
    Demo,
}

impl SeederCategory {
    /// Accepted draft spellings
    pub const NAMES: [&'static str; 3] = ["essential", "development", "demo"];

    /// Parse a draft value
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "essential" => Some(Self::Essential),
            "development" => Some(Self::Development),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

/// `seeder:` block
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeederDef {
    /// When the seeder runs
    pub category: SeederCategory,
    /// Rows to create
    pub count: u32,
    /// Skipped unless asked for
    pub optional: bool,
}

/// One action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionDef {
    /// Action name as written in the draft
    pub name: String,
    /// Entity the action operates on
    pub model: Option<String>,
    /// Parameters in declaration order
    pub params: Vec<ActionParam>,
    /// Declared return
    pub returns: ActionReturn,
}

impl ActionDef {
    /// Entity the action returns, resolving the `model` shorthand
    #[must_use]
    pub fn return_entity(&self) -> Option<&str> {
        match &self.returns {
            ActionReturn::Void => None,
            ActionReturn::Model => self.model.as_deref(),
            ActionReturn::Entity(name) => Some(name),
        }
    }
}

/// Action parameter; the type is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionParam {
    /// Parameter name
    pub name: String,
    /// Declared type, if any
    pub ty: Option<String>,
}

/// What an action returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ActionReturn {
    /// Nothing
    Void,
    /// The action's related entity
    Model,
    /// A named entity
    Entity(String),
}

impl ActionReturn {
    /// Parse a draft value
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value {
            "void" => Self::Void,
            "model" => Self::Model,
            other => Self::Entity(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_descriptor_parse_and_display() {
        let field = FieldDef::parse("string:255 unique nullable");
        assert_eq!(field.column_type, "string");
        assert_eq!(field.argument.as_deref(), Some("255"));
        assert_eq!(field.modifiers, vec!["unique", "nullable"]);
        assert!(field.has_modifier("unique"));
        assert_eq!(field.to_string(), "string:255 unique nullable");
    }

    #[test]
    fn modifier_with_argument_matches_head() {
        let field = FieldDef::parse("boolean default:false");
        assert!(field.has_modifier("default"));
        assert!(!field.has_modifier("unique"));
    }

    #[test]
    fn foreign_key_targets() {
        assert_eq!(FieldDef::parse("id").foreign_key_target("id"), None);
        assert_eq!(
            FieldDef::parse("id").foreign_key_target("user_id").as_deref(),
            Some("User")
        );
        assert_eq!(
            FieldDef::parse("id:User").foreign_key_target("author_id").as_deref(),
            Some("User")
        );
        assert_eq!(FieldDef::parse("string").foreign_key_target("user_id"), None);
    }

    #[test]
    fn relation_target_parse() {
        let plain = RelationTarget::parse("User");
        assert_eq!(plain.entity, "User");
        assert_eq!(plain.accessor(), "user");

        let aliased = RelationTarget::parse(" User:author ");
        assert_eq!(aliased.alias.as_deref(), Some("author"));
        assert_eq!(aliased.accessor(), "author");
    }

    #[test]
    fn relation_kind_keys_round_trip() {
        for kind in RelationKind::ALL {
            assert_eq!(RelationKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(RelationKind::from_key("hasFew"), None);
    }

    #[test]
    fn action_return_entity() {
        let action = ActionDef {
            name: "PublishPost".into(),
            model: Some("Post".into()),
            params: vec![],
            returns: ActionReturn::parse("model"),
        };
        assert_eq!(action.return_entity(), Some("Post"));
        assert_eq!(ActionReturn::parse("void"), ActionReturn::Void);
    }
}
