use anyhow::{Context as _, Result};

use super::Context;
use crate::output::format::format_audit_entries;
use crate::output::OutputFormat;

pub fn run(ctx: &Context, format: OutputFormat) -> Result<()> {
    let trail = ctx.audit_trail();
    let entries = trail
        .read_entries()
        .with_context(|| format!("Failed to read {}", trail.path().display()))?;

    println!("{}", format_audit_entries(&entries, format));
    Ok(())
}
