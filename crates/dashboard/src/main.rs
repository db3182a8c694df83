//! Print the dashboard of an inventory snapshot as JSON.
//!
//! Usage: `partuniverse-dashboard <snapshot.json> [item-id]`

use anyhow::{Context, Result};

use partuniverse_dashboard::{default_registry, ledger_from_json};
use partuniverse_inventory::LedgerConfig;

fn main() -> Result<()> {
    partuniverse_observability::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .context("usage: partuniverse-dashboard <snapshot.json> [item-id]")?;
    let item = args.next();

    let raw = std::fs::read_to_string(&path).with_context(|| format!("failed to read {path}"))?;
    let ledger = ledger_from_json(&raw, LedgerConfig::from_env())
        .with_context(|| format!("failed to load snapshot {path}"))?;

    let registry = default_registry(&ledger);
    let rendered = match item {
        Some(id) => vec![registry.render(&id)?],
        None => registry.render_all()?,
    };

    tracing::info!(snapshot = %path, items = rendered.len(), "rendered dashboard");
    println!("{}", serde_json::to_string_pretty(&rendered)?);
    Ok(())
}
