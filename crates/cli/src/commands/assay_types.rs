use anyhow::{Context, Result};
use clap::Args;
use omicia_cli_api::{Payload, QueryParams};
use omicia_cli_output::Field;
use serde_json::Value;

use super::{unstructured, CommandContext};

const ASSAY_TYPE_FIELDS: &[Field] = &[
    Field::renamed("id", "wso_id"),
    Field::new("workspace_id"),
    Field::new("description"),
    Field::new("quality_control_fields"),
];

#[derive(Args, Debug, Clone)]
pub struct AssayTypesArgs {
    /// Show a single assay type instead of all of them
    pub id: Option<u64>,
}

pub async fn execute(args: AssayTypesArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let path = match &args.id {
        Some(id) => format!("/assay_types/{id}"),
        None => "/assay_types".to_string(),
    };

    let response = ctx
        .client
        .get(&path, &QueryParams::new())
        .await
        .context("Failed to fetch assay types")?;

    let Payload::Json(value) = &response.payload else {
        return Err(unstructured(ctx, &response));
    };

    if args.id.is_some() {
        return ctx.renderer.summary(None, value, ASSAY_TYPE_FIELDS);
    }

    match value.get("objects").and_then(Value::as_array) {
        Some(objects) => {
            for assay_type in objects {
                ctx.renderer.summary(None, assay_type, ASSAY_TYPE_FIELDS)?;
                ctx.renderer.line("")?;
            }
            Ok(())
        }
        None => match response.description() {
            Some(description) => ctx.renderer.line(&format!("Error: {description}")),
            None => ctx.renderer.line("Something went wrong ..."),
        },
    }
}
