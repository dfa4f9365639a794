use anyhow::{anyhow, Result};
use omicia_cli_api::{ApiClient, ApiResponse, Payload};
use omicia_cli_output::OutputRenderer;

pub mod assay_types;
pub mod fields;
pub mod notes;
pub mod reports;
pub mod status;
pub mod variants;

pub struct CommandContext<'a> {
    pub client: ApiClient,
    pub renderer: &'a OutputRenderer,
}

/// Prints a JSON body, successful or not. Any other body is a failure.
pub fn emit(ctx: &CommandContext<'_>, response: &ApiResponse) -> Result<()> {
    match &response.payload {
        Payload::Json(value) => {
            if !response.is_success() {
                tracing::warn!(
                    status = response.status.as_u16(),
                    description = response.description().unwrap_or_default(),
                    "Service rejected the request"
                );
            }
            ctx.renderer.json(value)
        }
        Payload::Empty if response.is_success() => {
            tracing::info!(status = response.status.as_u16(), "Request accepted");
            Ok(())
        }
        _ => Err(unstructured(ctx, response)),
    }
}

/// Writes a non-JSON body to stderr and returns the error to exit with.
pub fn unstructured(ctx: &CommandContext<'_>, response: &ApiResponse) -> anyhow::Error {
    if let Some(text) = response.raw() {
        if let Err(err) = ctx.renderer.raw_error(text) {
            return err;
        }
    }
    anyhow!(
        "Service returned an unreadable response (HTTP {})",
        response.status
    )
}
