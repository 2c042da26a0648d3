use anyhow::{Context as _, Result};
use chrono::Utc;
use clap::Args;
use pinboard_core::model::event::hook_payload;
use pinboard_core::model::EventType;

use super::Context;
use crate::output::format::format_record;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct AttachArgs {
    /// ID of the pinned record
    pub pinned_id: String,

    /// Root record ID of the molecule to attach
    pub molecule_id: String,

    /// Arguments handed to whoever picks up the molecule
    #[arg(long)]
    pub args: Option<String>,

    /// Who is attaching (recorded in the events log)
    #[arg(long, env = "PINBOARD_ACTOR", default_value = "unknown")]
    pub actor: String,
}

pub fn run(args: &AttachArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let store = ctx.store();
    let record = pinboard_core::attach_molecule_at(
        &store,
        &args.pinned_id,
        &args.molecule_id,
        args.args.as_deref(),
        Utc::now(),
    )
    .with_context(|| format!("Failed to attach {} to {}", args.molecule_id, args.pinned_id))?;

    ctx.log_activity(EventType::Hook, &args.actor, hook_payload(&args.molecule_id));

    println!("{}", format_record(&record, format));
    Ok(())
}
