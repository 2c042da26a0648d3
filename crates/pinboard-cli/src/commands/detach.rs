use anyhow::{Context as _, Result};
use clap::Args;
use pinboard_core::model::event::hook_payload;
use pinboard_core::model::{AuditOperation, EventType};
use pinboard_core::DetachOptions;

use super::Context;
use crate::output::format::format_detach;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct DetachArgs {
    /// ID of the pinned record
    pub pinned_id: String,

    /// Kind of detach recorded in the audit log (detach, burn, squash)
    #[arg(long, default_value = "detach")]
    pub operation: AuditOperation,

    /// Who is detaching
    #[arg(long, env = "PINBOARD_ACTOR")]
    pub agent: Option<String>,

    /// Why the molecule is being detached
    #[arg(long)]
    pub reason: Option<String>,
}

pub fn run(args: &DetachArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let store = ctx.store();
    let audit = ctx.audit_trail();
    let opts = DetachOptions {
        operation: args.operation,
        agent: args.agent.clone(),
        reason: args.reason.clone(),
    };

    let outcome =
        pinboard_core::detach_molecule_with_audit(&store, &audit, &args.pinned_id, &opts)
            .with_context(|| format!("Failed to detach from {}", args.pinned_id))?;

    if let Some(err) = &outcome.audit_failure {
        eprintln!("Warning: failed to write audit log: {err}");
    }
    if let Some(molecule) = outcome
        .detached
        .as_ref()
        .and_then(|d| d.attached_molecule.as_deref())
    {
        let actor = args.agent.as_deref().unwrap_or("unknown");
        ctx.log_activity(EventType::Unhook, actor, hook_payload(molecule));
    }

    println!("{}", format_detach(&outcome, format));
    Ok(())
}
