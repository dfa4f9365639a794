use anyhow::{Context, Result};
use clap::Args;
use omicia_cli_api::PatchOperation;

use super::{emit, CommandContext};

#[derive(Args, Debug, Clone)]
pub struct SetStatusArgs {
    /// Clinical report id
    pub cr_id: u64,
    /// New report status
    pub status: String,
}

pub fn update_status_path(cr_id: u64) -> String {
    format!("/reports/{cr_id}/update_status/")
}

pub fn status_patch(status: &str) -> Vec<PatchOperation> {
    vec![PatchOperation::replace("/status", status)]
}

pub async fn execute(args: SetStatusArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let response = ctx
        .client
        .patch(&update_status_path(args.cr_id), &status_patch(&args.status))
        .await
        .with_context(|| format!("Failed to update status of report {}", args.cr_id))?;

    emit(ctx, &response)
}
