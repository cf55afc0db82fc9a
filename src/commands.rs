//! Implementations of the `hrv` subcommands.
//!
//! Each command writes its report to the given writer so it can be exercised without a terminal.

use crate::config::RunConfig;
use anyhow::Context;
use hrv_model::{AnyItem, ItemRegistry};
use std::fs;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

/// Print every registered item type as `<type id>  <root element>  <name>`.
pub fn list_types(registry: &ItemRegistry, out: &mut impl Write) -> anyhow::Result<()> {
    for item_type in registry.types() {
        writeln!(
            out,
            "{}  {:<24}  {}",
            item_type.type_id, item_type.root_element, item_type.name
        )?;
    }
    Ok(())
}

/// Read `path` and parse it, by type id when one is given, otherwise by its root element.
pub fn load(registry: &ItemRegistry, path: &Path, type_id: Option<Uuid>) -> anyhow::Result<AnyItem> {
    let xml = read_file(path)?;
    parse(registry, &xml, type_id).with_context(|| format!("Failed to parse {}", path.display()))
}

fn read_file(path: &Path) -> anyhow::Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn parse(registry: &ItemRegistry, xml: &str, type_id: Option<Uuid>) -> anyhow::Result<AnyItem> {
    let item = match type_id {
        Some(type_id) => registry.parse(type_id, xml)?,
        None => registry.parse_detect(xml)?,
    };
    Ok(item)
}

/// Describe the item in `path`: a one-line summary, or the full item as JSON.
pub fn inspect(
    registry: &ItemRegistry,
    path: &Path,
    type_id: Option<Uuid>,
    json: bool,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let item = load(registry, path, type_id)?;
    tracing::info!(type_name = item.type_name(), file = %path.display(), "parsed record item");

    if json {
        serde_json::to_writer_pretty(&mut *out, &item).context("Failed to serialise item as JSON")?;
        writeln!(out)?;
    } else {
        writeln!(out, "{} ({})", item.type_name(), item.type_id())?;
        writeln!(out, "{item}")?;
    }
    Ok(())
}

/// Parse `path` and write it back out, to `output` when given or to `out` otherwise.
pub fn roundtrip(
    registry: &ItemRegistry,
    config: &RunConfig,
    path: &Path,
    type_id: Option<Uuid>,
    output: Option<&Path>,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let item = load(registry, path, type_id)?;
    let xml = render(config, &item)?;

    match output {
        Some(target) => {
            fs::write(target, &xml)
                .with_context(|| format!("Failed to write {}", target.display()))?;
            tracing::info!(file = %target.display(), bytes = xml.len(), "wrote record item");
        }
        None => {
            out.write_all(xml.as_bytes())?;
            writeln!(out)?;
        }
    }
    Ok(())
}

/// Serialise `item` honouring the configured indentation and declaration.
pub fn render(config: &RunConfig, item: &AnyItem) -> anyhow::Result<String> {
    item.validate()
        .with_context(|| format!("{} is incomplete", item.type_name()))?;
    let mut writer = config.xml_writer(Vec::new());
    if config.declaration() {
        writer.declaration()?;
    }
    item.write_document(&mut writer)
        .with_context(|| format!("Failed to serialise {}", item.type_name()))?;
    String::from_utf8(writer.into_inner()).context("Serialised XML is not UTF-8")
}

/// Outcome of [`check`].
#[derive(Debug, PartialEq, Eq)]
pub struct CheckReport {
    pub type_name: &'static str,
    /// The re-serialised document parses back to an equal item.
    pub stable: bool,
    /// The compact re-serialisation matches the input text exactly (ignoring outer whitespace).
    pub identical: bool,
}

/// Parse `path`, re-serialise it, parse the result again and compare.
pub fn check(
    registry: &ItemRegistry,
    path: &Path,
    type_id: Option<Uuid>,
    out: &mut impl Write,
) -> anyhow::Result<CheckReport> {
    let input = read_file(path)?;
    let item = parse(registry, &input, type_id)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    item.validate()
        .with_context(|| format!("{} is incomplete", item.type_name()))?;

    let written = item.to_xml_string()?;
    let reparsed = parse(registry, &written, Some(item.type_id()))
        .context("Re-serialised item does not parse")?;

    let report = CheckReport {
        type_name: item.type_name(),
        stable: reparsed == item,
        identical: written == input.trim(),
    };
    tracing::debug!(?report, "check finished");

    writeln!(
        out,
        "{}: {}{}",
        report.type_name,
        if report.stable { "ok" } else { "UNSTABLE" },
        if report.identical { ", byte-identical" } else { "" }
    )?;
    Ok(report)
}
