use anyhow::{Context as _, Result};
use clap::Args;
use pinboard_core::model::{EventType, Payload, Visibility};
use serde_json::Value;

use super::Context;

#[derive(Args)]
pub struct EventArgs {
    /// Event type (sling, hook, unhook, handoff, done, mail, spawn, kill, nudge, boot, halt)
    pub event_type: EventType,

    /// Who performed the activity
    #[arg(long, env = "PINBOARD_ACTOR")]
    pub actor: String,

    /// Where the event is surfaced (audit, feed, both)
    #[arg(long, default_value = "feed")]
    pub visibility: Visibility,

    /// Payload entry as key=value; JSON values are kept typed
    #[arg(long = "payload", value_parser = parse_payload_entry)]
    pub payload: Vec<(String, Value)>,
}

fn parse_payload_entry(raw: &str) -> Result<(String, Value), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{raw}'"))?;
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

pub fn run(args: &EventArgs, ctx: &Context) -> Result<()> {
    let payload: Payload = args.payload.iter().cloned().collect();

    let written = ctx
        .event_log()
        .log(args.event_type, &args.actor, payload, args.visibility)
        .context("Failed to log event")?;

    if written {
        println!("Logged {} event.", args.event_type);
    } else {
        println!("No town root found; event not logged.");
    }
    Ok(())
}
