use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use super::{emit, CommandContext};

#[derive(Args, Debug, Clone)]
pub struct AddNoteArgs {
    /// Clinical report id
    pub cr_id: u64,
    /// Report variant id
    pub report_variant_id: u64,
    /// Note text
    pub note: String,
}

#[derive(Serialize)]
struct NoteRequest<'a> {
    note: &'a str,
}

pub async fn execute(args: AddNoteArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let path = format!(
        "/reports/{}/variants/{}/internal_notes",
        args.cr_id, args.report_variant_id
    );

    let response = ctx
        .client
        .post_json(&path, &NoteRequest { note: &args.note })
        .await
        .with_context(|| format!("Failed to add note to variant {}", args.report_variant_id))?;

    emit(ctx, &response)
}
