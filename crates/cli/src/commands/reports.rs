use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Args;
use omicia_cli_api::{ApiResponse, Payload};
use omicia_cli_output::Field;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use super::fields::add_fields_to_report;
use super::{emit, CommandContext};
use crate::manifest::read_manifest;
use crate::patient::read_patient_info;

const REPORT_HEADING: &str = "Launched Panel Trio Report:";

const REPORT_FIELDS: &[Field] = &[
    Field::new("id"),
    Field::new("test_type"),
    Field::new("accession_id"),
    Field::new("created_on"),
    Field::new("created_by"),
    Field::new("status"),
    Field::new("filter_id"),
    Field::new("panel_id"),
    Field::new("workspace_id"),
    Field::new("sample_collected_date"),
    Field::new("sample_received_date"),
    Field::new("include_cosmic"),
    Field::new("vaast_report_id"),
    Field::new("mother_genome_id"),
    Field::new("father_genome_id"),
    Field::new("genome_id"),
    Field::new("version"),
];

#[derive(Args, Debug, Clone)]
pub struct CreateReportArgs {
    /// Gene panel id
    pub panel_id: i64,
    /// Accession id of the new report
    pub accession_id: String,
    /// Project the report is created in
    pub project_id: String,

    /// Reporting cutoff
    #[arg(long, alias = "reporting_cutoff")]
    pub reporting_cutoff: Option<i64>,

    /// Variant filter id
    #[arg(long, alias = "filter_id")]
    pub filter_id: Option<i64>,

    /// Two column patient information CSV attached to the new report
    #[arg(long, alias = "patient_info_file")]
    pub patient_info_file: Option<PathBuf>,

    /// family_manifest.csv describing the trio members
    #[arg(long)]
    pub manifest: Option<PathBuf>,
}

/// Body of `POST /reports/`. Genome ids stay empty for reports launched
/// without genomes.
#[derive(Debug, Serialize, PartialEq)]
pub struct PanelTrioRequest<'a> {
    report_type: &'static str,
    panel_id: i64,
    filter_id: Option<i64>,
    mother_genome_id: Option<i64>,
    father_genome_id: Option<i64>,
    proband_genome_id: Option<i64>,
    proband_sex: Option<&'a str>,
    reporting_cutoff: Option<i64>,
    accession_id: &'a str,
    project_id: &'a str,
}

impl<'a> PanelTrioRequest<'a> {
    pub fn from_args(args: &'a CreateReportArgs) -> Self {
        Self {
            report_type: "panel_trio",
            panel_id: args.panel_id,
            filter_id: args.filter_id,
            mother_genome_id: None,
            father_genome_id: None,
            proband_genome_id: None,
            proband_sex: None,
            reporting_cutoff: args.reporting_cutoff,
            accession_id: &args.accession_id,
            project_id: &args.project_id,
        }
    }
}

/// The created report, when the response has the expected shape.
pub fn clinical_report(response: &ApiResponse) -> Option<&Value> {
    response
        .json()?
        .get("clinical_report")
        .filter(|report| report.is_object())
}

fn report_id(report: &Value) -> Option<String> {
    match report.get("id")? {
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

pub async fn execute(args: CreateReportArgs, ctx: &CommandContext<'_>) -> Result<()> {
    // Input files are validated before the report is created.
    if let Some(path) = &args.manifest {
        let members = read_manifest(path)?;
        for member in &members {
            info!(
                filename = %member.filename,
                label = %member.label,
                external_id = %member.external_id,
                sex = %member.sex,
                format = %member.format,
                "Family member"
            );
        }
    }
    let patient_info = args
        .patient_info_file
        .as_deref()
        .map(read_patient_info)
        .transpose()?;

    info!(panel_id = args.panel_id, accession_id = %args.accession_id, "Launching panel trio report");
    let response = ctx
        .client
        .post_json("/reports/", &PanelTrioRequest::from_args(&args))
        .await
        .context("Failed to launch panel trio report")?;

    let Some(report) = clinical_report(&response) else {
        match &response.payload {
            Payload::Json(value) => ctx.renderer.json(value)?,
            Payload::Raw(text) => ctx.renderer.raw_error(text)?,
            Payload::Empty => {}
        }
        bail!("Failed to launch. Check report parameters for correctness.");
    };

    let fields_response = match &patient_info {
        Some(info) => match report_id(report) {
            Some(id) => Some(add_fields_to_report(&ctx.client, &id, info).await?),
            None => {
                warn!("Created report has no id, patient fields not added");
                None
            }
        },
        None => None,
    };

    // Printed even when the patient fields were refused.
    ctx.renderer.summary(Some(REPORT_HEADING), report, REPORT_FIELDS)?;

    match fields_response {
        Some(response) => match &response.payload {
            Payload::Json(_) | Payload::Empty if response.is_success() => Ok(()),
            _ => emit(ctx, &response),
        },
        None => Ok(()),
    }
}
