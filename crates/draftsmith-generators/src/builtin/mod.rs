//! Built-in generators, in registration order
//!
//! Rendering is deliberately small: each generator emits a readable skeleton
//! of its output kind through the shared [`FileEmitter`](crate::FileEmitter).

mod action;
mod migration;
mod model;
mod page;
mod route;
mod seeder;
mod test_scaffold;
mod typescript;

pub use action::ActionGenerator;
pub use migration::{MigrationGenerator, MIGRATIONS_DIR};
pub use model::ModelGenerator;
pub use page::PageGenerator;
pub use route::RouteGenerator;
pub use seeder::SeederGenerator;
pub use test_scaffold::TestGenerator;
pub use typescript::TypesGenerator;

use crate::generator::GeneratorContext;
use draftsmith_draft::{inflect, EntityDef, FieldDef};

/// First line of every regenerated source file
fn header(ctx: &GeneratorContext<'_>, comment: &str) -> String {
    format!(
        "{comment} Generated by draftsmith from {}. Do not edit.\n",
        ctx.draft_name()
    )
}

/// Declared fields plus the implicit `timestamps` / `softDeletes` columns
fn columns(entity: &EntityDef) -> Vec<(String, FieldDef)> {
    let mut columns: Vec<_> = entity
        .fields
        .iter()
        .map(|(name, def)| (name.clone(), def.clone()))
        .collect();
    let mut implicit = |name: &str| {
        if !entity.fields.contains_key(name) {
            columns.push((name.to_string(), FieldDef::parse("timestamp nullable")));
        }
    };
    if entity.timestamps {
        implicit("created_at");
        implicit("updated_at");
    }
    if entity.soft_deletes {
        implicit("deleted_at");
    }
    columns
}

fn scalar_rust_type(column_type: &str) -> &'static str {
    match column_type {
        "id" | "bigInteger" | "integer" | "unsignedInteger" | "unsignedBigInteger" => "i64",
        "tinyInteger" | "smallInteger" => "i32",
        "boolean" | "bool" => "bool",
        "decimal" | "float" | "double" => "f64",
        "json" | "jsonb" => "serde_json::Value",
        _ => "String",
    }
}

/// Rust type of a column
fn rust_type(field: &FieldDef) -> String {
    let scalar = scalar_rust_type(&field.column_type);
    if field.has_modifier("nullable") {
        format!("Option<{scalar}>")
    } else {
        scalar.to_string()
    }
}

/// Rust type of an action parameter: an explicit type, else the related
/// entity when the name matches it, else `String`
fn param_type(name: &str, ty: Option<&str>, model: Option<&str>) -> String {
    match ty {
        Some("int" | "integer") => "i64".to_string(),
        Some("bool" | "boolean") => "bool".to_string(),
        Some("float" | "decimal") => "f64".to_string(),
        Some(ty) if ty.starts_with(|c: char| c.is_ascii_uppercase()) => ty.to_string(),
        Some(_) => "String".to_string(),
        None => match model {
            Some(model) if inflect::snake(model) == name => model.to_string(),
            _ => "String".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rust_types() {
        assert_eq!(rust_type(&FieldDef::parse("string:255")), "String");
        assert_eq!(rust_type(&FieldDef::parse("id:User nullable")), "Option<i64>");
        assert_eq!(rust_type(&FieldDef::parse("boolean default:false")), "bool");
    }

    #[test]
    fn param_types() {
        assert_eq!(param_type("post", None, Some("Post")), "Post");
        assert_eq!(param_type("title", None, Some("Post")), "String");
        assert_eq!(param_type("count", Some("int"), None), "i64");
        assert_eq!(param_type("author", Some("User"), None), "User");
    }
}
