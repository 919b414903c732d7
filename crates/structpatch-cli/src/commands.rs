use std::path::Path;

use anyhow::Context;
use colored::Colorize;
use structpatch::{
    patch_from_json, Change, ChangeSet, Differ, Mapping, NullPolicy, Patch, PatchResult, Value,
    ROOT_KEY,
};
use tracing::debug;

use crate::cli::*;
use crate::config::CliConfig;

pub fn run_command(cli: Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => CliConfig::load(path)?,
        None => CliConfig::default(),
    };
    if !config.output.color {
        colored::control::set_override(false);
    }

    match cli.command {
        Command::Diff(args) => {
            let out = cmd_diff(&args, &cli.format, &config)?;
            println!("{out}");
            Ok(())
        }
        Command::Apply(args) => cmd_apply(&args, &config),
    }
}

fn read_json(path: &Path) -> anyhow::Result<serde_json::Value> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {} as JSON", path.display()))
}

fn to_json_string(value: &Value, pretty: bool) -> anyhow::Result<String> {
    let json = serde_json::Value::from(value);
    let text = if pretty {
        serde_json::to_string_pretty(&json)?
    } else {
        serde_json::to_string(&json)?
    };
    Ok(text)
}

fn cmd_diff(args: &DiffArgs, format: &OutputFormat, config: &CliConfig) -> anyhow::Result<String> {
    let old = Value::from(read_json(&args.old)?);
    let new = Value::from(read_json(&args.new)?);

    let patch = Differ::new(config.diff.clone())
        .diff(&old, &new)
        .context("computing diff")?;
    debug!(entries = patch.len(), "diff computed");

    match format {
        OutputFormat::Json => to_json_string(&Value::Map(patch), config.output.pretty),
        OutputFormat::Text => {
            let changes = ChangeSet::from_patch(&base_mapping(old), &patch);
            Ok(render_changes(&changes))
        }
    }
}

/// The mapping a patch is read against: leaf documents sit under the root key.
fn base_mapping(document: Value) -> Mapping {
    match document {
        Value::Map(map) => map,
        Value::Null => Mapping::new(),
        other => Mapping::from([(ROOT_KEY.to_string(), other)]),
    }
}

fn render_changes(changes: &ChangeSet) -> String {
    if changes.is_empty() {
        return "No changes.".to_string();
    }

    let mut lines = Vec::with_capacity(changes.len() + 1);
    for change in &changes.changes {
        let path = display_path(change.path());
        let line = match change {
            Change::Added { value, .. } => {
                format!("{} {}: {}", "+".green(), path.bold(), render_value(value))
            }
            Change::Removed { old, .. } => {
                format!("{} {}: {}", "-".red(), path.bold(), render_value(old).dimmed())
            }
            Change::Modified { old, new, .. } => format!(
                "{} {}: {} -> {}",
                "~".yellow(),
                path.bold(),
                render_value(old).dimmed(),
                render_value(new)
            ),
        };
        lines.push(line);
    }
    lines.push(format!(
        "{} added, {} removed, {} modified",
        changes.additions(),
        changes.removals(),
        changes.modifications()
    ));
    lines.join("\n")
}

fn display_path(path: &str) -> String {
    if path.is_empty() {
        "(root)".to_string()
    } else {
        path.to_string()
    }
}

fn render_value(value: &Value) -> String {
    serde_json::Value::from(value).to_string()
}

fn cmd_apply(args: &ApplyArgs, config: &CliConfig) -> anyhow::Result<()> {
    let target = Value::from(read_json(&args.target)?);
    let policy = if args.keep_nulls {
        NullPolicy::Keep
    } else {
        config.patch.null_policy
    };
    let patch = patch_from_json(read_json(&args.patch)?, policy);

    let result = apply_document(target, &patch)
        .with_context(|| format!("applying {}", args.patch.display()))?;
    let text = to_json_string(&result, config.output.pretty)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, text + "\n")
                .with_context(|| format!("writing {}", path.display()))?;
            println!("{} Wrote {}", "✓".green().bold(), path.display());
        }
        None => println!("{text}"),
    }
    Ok(())
}

/// Apply a patch to a whole document. A null document starts out as an
/// empty mapping.
fn apply_document(target: Value, patch: &Patch) -> PatchResult<Value> {
    let mut target = match target {
        Value::Null => Value::Map(Mapping::new()),
        other => other,
    };
    structpatch::apply(&mut target, patch)?;
    Ok(target)
}
