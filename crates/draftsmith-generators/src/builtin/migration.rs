//! Table migrations: `database/migrations/<stamp>_create_<table>_table.sql`
//!
//! Table-owning: a table keeps the migration path it was first given. The path
//! comes from, in order, the recorded state, an existing file on disk, or a
//! newly minted timestamped name.

use super::{columns, header};
use crate::emitter::FileEmitter;
use crate::generator::{Generator, GeneratorContext, GeneratorError, GeneratorOutput};
use chrono::Duration;
use draftsmith_artifact::Ownership;
use draftsmith_draft::{EntityDef, FieldDef, Specification};
use std::fmt::Write;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;

/// Directory migrations live in, relative to the project root
pub const MIGRATIONS_DIR: &str = "database/migrations";

/// One `CREATE TABLE` per entity
#[derive(Debug, Clone, Copy, Default)]
pub struct MigrationGenerator;

impl Generator for MigrationGenerator {
    fn name(&self) -> &str {
        "migration"
    }

    fn supports(&self, spec: &Specification) -> bool {
        !spec.entities().is_empty()
    }

    fn generate(&self, ctx: &GeneratorContext<'_>) -> Result<GeneratorOutput, GeneratorError> {
        let emitter = FileEmitter::from_context(ctx);
        let mut out = GeneratorOutput::new();

        for (offset, entity) in (0_i64..).zip(ctx.spec.entities().values()) {
            let table = entity.table();
            let path = migration_path(ctx, &table, offset)?;
            let sql = render(ctx, entity);
            let emitted = emitter.emit(&mut out, path, &sql, Ownership::Regenerate)?;
            out.tag_table(&emitted.path, &table);
        }
        Ok(out)
    }
}

fn migration_path(
    ctx: &GeneratorContext<'_>,
    table: &str,
    offset: i64,
) -> Result<PathBuf, GeneratorError> {
    if let Some(record) = ctx.state.record_for_table(table) {
        tracing::debug!(table, path = %record.path.display(), "reusing recorded migration");
        return Ok(ctx.root.resolve(&record.path)?);
    }

    let suffix = format!("_create_{table}_table.sql");
    let dir = ctx.root.join(MIGRATIONS_DIR);
    match fs::read_dir(&dir) {
        Ok(entries) => {
            let mut existing: Vec<_> = entries
                .filter_map(Result::ok)
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .filter(|name| name.ends_with(&suffix))
                .collect();
            existing.sort();
            if let Some(name) = existing.into_iter().next() {
                tracing::debug!(table, file = %name, "reusing migration found on disk");
                return Ok(dir.join(name));
            }
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(GeneratorError::io_error(dir, e)),
    }

    // Offsets keep draft order when several tables are minted in one build
    let stamp = (ctx.started_at + Duration::seconds(offset)).format("%Y_%m_%d_%H%M%S");
    Ok(dir.join(format!("{stamp}{suffix}")))
}

fn render(ctx: &GeneratorContext<'_>, entity: &EntityDef) -> String {
    let mut sql = header(ctx, "--");
    let _ = writeln!(sql, "CREATE TABLE {} (", entity.table());
    let lines: Vec<_> = columns(entity)
        .iter()
        .map(|(name, field)| format!("    {}", column(name, field)))
        .collect();
    sql.push_str(&lines.join(",\n"));
    sql.push_str("\n);\n");
    sql
}

fn column(name: &str, field: &FieldDef) -> String {
    if field.is_primary_key(name) {
        return format!("{name} BIGSERIAL PRIMARY KEY");
    }

    let arg = field.argument.as_deref();
    let mut col = match field.column_type.as_str() {
        "id" | "bigInteger" | "unsignedBigInteger" => format!("{name} BIGINT"),
        "integer" | "unsignedInteger" | "tinyInteger" | "smallInteger" => format!("{name} INTEGER"),
        "string" => format!("{name} VARCHAR({})", arg.unwrap_or("255")),
        "decimal" => format!("{name} DECIMAL({})", arg.unwrap_or("8,2")),
        "boolean" => format!("{name} BOOLEAN"),
        "datetime" | "timestamp" => format!("{name} TIMESTAMP"),
        other => format!("{name} {}", other.to_ascii_uppercase()),
    };

    if !field.has_modifier("nullable") {
        col.push_str(" NOT NULL");
    }
    if field.has_modifier("unique") {
        col.push_str(" UNIQUE");
    }
    if let Some(default) = field
        .modifiers
        .iter()
        .find_map(|m| m.strip_prefix("default:"))
    {
        let _ = write!(col, " DEFAULT {default}");
    }
    if let Some(target) = field.foreign_key_target(name) {
        let _ = write!(col, " REFERENCES {}(id)", draftsmith_draft::inflect::table_name(&target));
    }
    col
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin::testing::Harness;
    use draftsmith_artifact::GeneratedFileRecord;
    use pretty_assertions::assert_eq;

    const DRAFT: &str = "models:\n  Post:\n    id: id\n    title: string:120 unique\n    is_draft:\n    relationships:\n      belongsTo: User:author\n";

    #[test]
    fn renders_columns() {
        let h = Harness::new(DRAFT);
        let out = MigrationGenerator.generate(&h.ctx()).unwrap();
        let record = out.generated.values().next().unwrap();

        assert_eq!(
            record.path.file_name().unwrap().to_string_lossy(),
            "2026_03_01_120000_create_posts_table.sql"
        );
        assert!(record.owns_table("posts"));

        let sql = std::fs::read_to_string(&record.path).unwrap();
        assert!(sql.starts_with("-- Generated by draftsmith from draft.yaml"));
        assert!(sql.contains("id BIGSERIAL PRIMARY KEY"));
        assert!(sql.contains("title VARCHAR(120) NOT NULL UNIQUE"));
        assert!(sql.contains("is_draft BOOLEAN NOT NULL DEFAULT false"));
        assert!(sql.contains("author_id BIGINT NOT NULL REFERENCES users(id)"));
    }

    #[test]
    fn recorded_path_is_reused() {
        let mut h = Harness::new(DRAFT);
        let kept = h.root.join("database/migrations/2020_01_01_000000_create_posts_table.sql");
        h.state.generated.insert(
            kept.clone(),
            GeneratedFileRecord::new(&kept, draftsmith_artifact::ContentHash::empty(), Ownership::Regenerate)
                .with_table("posts"),
        );

        let out = MigrationGenerator.generate(&h.ctx()).unwrap();
        assert_eq!(out.generated.keys().collect::<Vec<_>>(), vec![&kept]);
    }

    #[test]
    fn file_on_disk_is_reused_without_state() {
        let h = Harness::new(DRAFT);
        let first = MigrationGenerator.generate(&h.ctx()).unwrap();

        let later = h.ctx().with_started_at(h.ctx().started_at + Duration::days(3));
        let second = MigrationGenerator.generate(&later).unwrap();
        assert_eq!(first.generated, second.generated);
    }

    #[test]
    fn several_tables_keep_draft_order() {
        let h = Harness::new("models:\n  Post: [id, title]\n  Comment: [id, body]\n");
        let out = MigrationGenerator.generate(&h.ctx()).unwrap();
        let mut names: Vec<_> = out
            .generated
            .keys()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(
            names,
            vec![
                "2026_03_01_120000_create_posts_table.sql",
                "2026_03_01_120001_create_comments_table.sql",
            ]
        );
    }
}
