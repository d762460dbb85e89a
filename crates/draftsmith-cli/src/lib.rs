//! draftsmith command line
//!
//! ```text
//! draftsmith [--root DIR] [--json] [--verbose] <plan|build|revert|status>
//! ```
//!
//! Exit codes: `0` success or nothing to do, `1` the build or revert
//! reported errors, `2` configuration or state failures.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

use anyhow::{bail, Context};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use draftsmith_core::{
    BuildConfig, BuildError, BuildOrchestrator, BuildOutcome, BuildRequest, PlanStep, RevertResult,
};
use draftsmith_state::BuildState;
use serde_json::json;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Command definition
#[must_use]
pub fn command() -> Command {
    let draft = Arg::new("draft")
        .long("draft")
        .value_parser(value_parser!(PathBuf))
        .help("Draft file, relative to the root (default from draftsmith.toml)");

    Command::new("draftsmith")
        .version(draftsmith_core::VERSION)
        .about("Build application sources from a declarative draft")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("root")
                .long("root")
                .global(true)
                .default_value(".")
                .value_parser(value_parser!(PathBuf))
                .help("Project root"),
        )
        .arg(
            Arg::new("json")
                .long("json")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Print results and logs as JSON"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::SetTrue)
                .help("Debug logging (RUST_LOG overrides)"),
        )
        .subcommand(
            Command::new("plan")
                .about("Show the steps a build would take")
                .arg(draft.clone()),
        )
        .subcommand(
            Command::new("build")
                .about("Generate files from the draft")
                .arg(draft)
                .arg(
                    Arg::new("only")
                        .long("only")
                        .value_delimiter(',')
                        .action(ArgAction::Append)
                        .help("Run only these generators (comma separated)"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Build even if the draft is unchanged and overwrite scaffold files"),
                ),
        )
        .subcommand(Command::new("revert").about("Restore files overwritten by the last build"))
        .subcommand(Command::new("status").about("Show the recorded build state"))
}

/// Install the global subscriber; logs go to stderr
pub fn init_tracing(verbose: bool, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "info" }));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    // A second install (tests) is not an error
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
}

/// Is a global flag set at any level
#[must_use]
pub fn flag(matches: &ArgMatches, name: &str) -> bool {
    matches.get_flag(name) || matches.subcommand().is_some_and(|(_, sub)| sub.get_flag(name))
}

/// Run the parsed command, writing its report to `out`
///
/// # Errors
/// Configuration, state and output failures
pub fn run<W: Write>(matches: &ArgMatches, out: &mut W) -> anyhow::Result<i32> {
    let Some((name, args)) = matches.subcommand() else {
        bail!("no command given");
    };
    let root = args
        .get_one::<PathBuf>("root")
        .cloned()
        .unwrap_or_else(|| PathBuf::from("."));
    let json = flag(matches, "json");

    let config = BuildConfig::load(root.clone())
        .with_context(|| format!("loading configuration from {}", root.display()))?;
    let orchestrator = BuildOrchestrator::with_defaults(config)?;
    let draft = args.try_get_one::<PathBuf>("draft").ok().flatten();

    match name {
        "plan" => plan(&orchestrator, draft.map(PathBuf::as_path), json, out),
        "build" => {
            let mut request = BuildRequest::new().with_force(args.get_flag("force"));
            if let Some(path) = draft {
                request = request.with_draft(path);
            }
            if let Some(only) = args.get_many::<String>("only") {
                request = request.with_only(only.cloned());
            }
            build(&orchestrator, &request, json, out)
        }
        "revert" => {
            let result = orchestrator.revert()?;
            print_revert(&orchestrator, &result, json, out)?;
            Ok(i32::from(!result.success))
        }
        "status" => {
            let state = orchestrator.status()?;
            print_status(&orchestrator, &state, json, out)?;
            Ok(0)
        }
        other => bail!("unknown command '{other}'"),
    }
}

fn plan<W: Write>(
    orchestrator: &BuildOrchestrator,
    draft: Option<&Path>,
    json: bool,
    out: &mut W,
) -> anyhow::Result<i32> {
    let steps: Vec<PlanStep> = match orchestrator.plan_draft(draft) {
        Ok(steps) => steps,
        Err(err) => return report_build_error(&err, json, out),
    };
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&steps)?)?;
    } else {
        for (i, step) in steps.iter().enumerate() {
            writeln!(out, "{:>3}. {step}", i + 1)?;
        }
    }
    Ok(0)
}

fn build<W: Write>(
    orchestrator: &BuildOrchestrator,
    request: &BuildRequest,
    json: bool,
    out: &mut W,
) -> anyhow::Result<i32> {
    let outcome = match orchestrator.build(request) {
        Ok(outcome) => outcome,
        Err(err) => return report_build_error(&err, json, out),
    };

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&outcome)?)?;
        return Ok(i32::from(!outcome.success()));
    }

    match &outcome {
        BuildOutcome::NoChanges { draft } => {
            writeln!(out, "No changes in {}; nothing to build.", display(orchestrator, draft))?;
        }
        BuildOutcome::Built(result) => {
            writeln!(out, "Generated {} file(s)", result.generated.len())?;
            for record in result.generated.values() {
                writeln!(
                    out,
                    "  {} ({})",
                    display(orchestrator, &record.path),
                    record.ownership
                )?;
            }
            if !result.skipped.is_empty() {
                writeln!(out, "Skipped: {}", result.skipped.join(", "))?;
            }
            for warning in &result.warnings {
                writeln!(out, "warning: {warning}")?;
            }
            for error in &result.errors {
                writeln!(out, "error: {error}")?;
            }
            if !result.success {
                writeln!(out, "Build failed; state was not updated.")?;
            }
        }
    }
    Ok(i32::from(!outcome.success()))
}

fn report_build_error<W: Write>(err: &BuildError, json: bool, out: &mut W) -> anyhow::Result<i32> {
    tracing::debug!(error = %err, "build refused");
    let errors = err.errors();
    if json {
        let body = json!({ "status": "error", "errors": errors });
        writeln!(out, "{}", serde_json::to_string_pretty(&body)?)?;
    } else {
        if let BuildError::InvalidDraft { path, .. } = err {
            writeln!(out, "Invalid draft {}:", path.display())?;
        }
        for error in errors {
            writeln!(out, "error: {error}")?;
        }
    }
    Ok(1)
}

fn print_revert<W: Write>(
    orchestrator: &BuildOrchestrator,
    result: &RevertResult,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
        return Ok(());
    }
    if result.restored.is_empty() && result.errors.is_empty() {
        writeln!(out, "Nothing to revert.")?;
        return Ok(());
    }
    writeln!(out, "Restored {} file(s)", result.restored.len())?;
    for path in &result.restored {
        writeln!(out, "  {}", display(orchestrator, path))?;
    }
    for error in &result.errors {
        writeln!(out, "error: {error}")?;
    }
    Ok(())
}

fn print_status<W: Write>(
    orchestrator: &BuildOrchestrator,
    state: &BuildState,
    json: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(state)?)?;
        return Ok(());
    }
    match state.last_run {
        Some(at) => writeln!(out, "Last run: {}", at.to_rfc3339())?,
        None => writeln!(out, "Never built")?,
    }
    for (path, record) in &state.drafts {
        writeln!(
            out,
            "Draft {} ({})",
            display(orchestrator, path),
            record.hash.short()
        )?;
    }
    writeln!(out, "{} generated file(s)", state.generated.len())?;
    for record in state.generated.values() {
        let table = record
            .table
            .as_deref()
            .map(|t| format!(", table {t}"))
            .unwrap_or_default();
        writeln!(
            out,
            "  {} [{}{table}] {}",
            display(orchestrator, &record.path),
            record.ownership,
            record.content_hash.short()
        )?;
    }
    if state.has_backup() {
        writeln!(
            out,
            "{} file(s) can be restored with `draftsmith revert`",
            state.last_build_backup.len()
        )?;
    }
    Ok(())
}

fn display(orchestrator: &BuildOrchestrator, path: &Path) -> String {
    orchestrator
        .root()
        .relative(path)
        .unwrap_or(path)
        .display()
        .to_string()
}
