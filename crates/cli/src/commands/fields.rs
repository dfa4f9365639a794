use std::fmt::Display;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use omicia_cli_api::{ApiClient, ApiResponse};
use tracing::{debug, info};

use super::{emit, CommandContext};
use crate::patient::{read_patient_info, PatientInfo};

#[derive(Args, Debug, Clone)]
pub struct SetFieldsArgs {
    /// Clinical report id
    pub cr_id: u64,

    /// Field values as a JSON object, sent as given
    /// (e.g. '{"Patient Name": "Eric", "Accession Number": "1234"}')
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    pub fields: Option<String>,

    /// Two column patient information CSV to read the fields from instead
    #[arg(long)]
    pub file: Option<PathBuf>,
}

pub fn patient_fields_path(cr_id: impl Display) -> String {
    format!("/reports/{cr_id}/patient_fields")
}

/// Attaches parsed patient information to a report.
pub async fn add_fields_to_report(
    client: &ApiClient,
    cr_id: impl Display,
    info: &PatientInfo,
) -> Result<ApiResponse> {
    info!(report = %cr_id, "Adding custom patient fields to report");
    for (field, value) in info.iter() {
        debug!(field, value, "Patient field");
    }
    client
        .post_json(&patient_fields_path(&cr_id), info)
        .await
        .with_context(|| format!("Failed to add patient fields to report {cr_id}"))
}

pub async fn execute(args: SetFieldsArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let response = if let Some(path) = &args.file {
        let info = read_patient_info(path)?;
        add_fields_to_report(&ctx.client, args.cr_id, &info).await?
    } else {
        let fields = args.fields.context("Either fields or --file is required")?;
        info!(report = args.cr_id, "Adding custom patient fields to report");
        ctx.client
            .post_raw(&patient_fields_path(args.cr_id), fields)
            .await
            .with_context(|| format!("Failed to add patient fields to report {}", args.cr_id))?
    };

    emit(ctx, &response)
}
