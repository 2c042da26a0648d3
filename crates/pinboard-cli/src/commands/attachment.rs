use anyhow::{Context as _, Result};
use clap::Args;

use super::Context;
use crate::output::format::format_attachment;
use crate::output::OutputFormat;

#[derive(Args)]
pub struct AttachmentArgs {
    /// ID of the pinned record
    pub pinned_id: String,
}

pub fn run(args: &AttachmentArgs, ctx: &Context, format: OutputFormat) -> Result<()> {
    let store = ctx.store();
    let attachment = pinboard_core::get_attachment(&store, &args.pinned_id)
        .with_context(|| format!("Failed to read {}", args.pinned_id))?;

    println!("{}", format_attachment(attachment.as_ref(), format));
    Ok(())
}
