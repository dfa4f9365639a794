use std::fmt;
use std::io::Write;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, ValueEnum};
use futures::StreamExt;
use omicia_cli_api::{
    ApiResponse, ByteStream, Payload, QueryParams, ResponseFormat, STREAM_CHUNK_SIZE,
};
use omicia_cli_output::PassThrough;
use tracing::debug;

use super::{emit, CommandContext};

pub const CHROMOSOMES: [&str; 25] = [
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "M",
];

/// Chromosome name accepted by the variant filter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Chromosome(&'static str);

impl Chromosome {
    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl FromStr for Chromosome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CHROMOSOMES
            .iter()
            .copied()
            .find(|name| *name == s)
            .map(Chromosome)
            .ok_or_else(|| format!("'{s}' is not one of 1-22, X, Y, M"))
    }
}

impl fmt::Display for Chromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum Allele {
    #[value(name = "A")]
    A,
    #[value(name = "T")]
    T,
    #[value(name = "C")]
    C,
    #[value(name = "G")]
    G,
}

impl fmt::Display for Allele {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let base = match self {
            Allele::A => "A",
            Allele::T => "T",
            Allele::C => "C",
            Allele::G => "G",
        };
        f.write_str(base)
    }
}

#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ExportFormat {
    #[default]
    #[value(name = "JSON")]
    Json,
    #[value(name = "VCF")]
    Vcf,
    #[value(name = "CSV")]
    Csv,
}

impl From<ExportFormat> for ResponseFormat {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Json => ResponseFormat::Json,
            ExportFormat::Vcf => ResponseFormat::Vcf,
            ExportFormat::Csv => ResponseFormat::Csv,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct VariantsArgs {
    /// Clinical report id
    pub cr_id: u64,

    /// Comma separated review statuses (e.g. "FAILED_CONFIRMATION,REVIEWED")
    #[arg(long)]
    pub status: Option<String>,

    /// Comma separated to_report values
    #[arg(long, alias = "to_report")]
    pub to_report: Option<String>,

    /// Include extended variant annotations (`--extended` or `--extended true`)
    #[arg(
        long,
        action = ArgAction::Set,
        num_args = 0..=1,
        default_value_t = false,
        default_missing_value = "true",
        value_parser = clap::value_parser!(bool)
    )]
    pub extended: bool,

    /// Chromosome (1-22, X, Y, M)
    #[arg(long, alias = "chr")]
    pub chrom: Option<Chromosome>,

    /// First position on the chromosome
    #[arg(long, alias = "start_on_chrom")]
    pub start_on_chrom: Option<u64>,

    /// Last position on the chromosome
    #[arg(long, alias = "end_on_chrom")]
    pub end_on_chrom: Option<u64>,

    /// Alternate allele
    #[arg(long, value_enum)]
    pub alt: Option<Allele>,

    /// Response format; VCF and CSV are written through unchanged
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,
}

impl VariantsArgs {
    pub fn path(&self) -> String {
        format!("/reports/{}/variants", self.cr_id)
    }

    pub fn query(&self) -> QueryParams {
        let mut query = QueryParams::new();

        if let Some(status) = &self.status {
            query.push_list("status", status);
        }
        if let Some(to_report) = &self.to_report {
            query.push_list("to_report", to_report);
        }
        if self.extended {
            query.push("extended", "True");
        }

        query
            .push_opt("chrom", self.chrom.as_ref())
            .push_opt("start_on_chrom", self.start_on_chrom)
            .push_opt("end_on_chrom", self.end_on_chrom)
            .push_opt("alt", self.alt)
            .push_opt("format", ResponseFormat::from(self.format).query_value());
        query
    }
}

pub async fn execute(args: VariantsArgs, ctx: &CommandContext<'_>) -> Result<()> {
    let path = args.path();
    let query = args.query();
    let format = ResponseFormat::from(args.format);

    if !format.is_streamed() {
        let response = ctx
            .client
            .get(&path, &query)
            .await
            .with_context(|| format!("Failed to fetch variants of report {}", args.cr_id))?;
        return emit(ctx, &response);
    }

    let response = ctx
        .client
        .get_stream(&path, &query)
        .await
        .with_context(|| format!("Failed to export variants of report {}", args.cr_id))?;

    if !response.is_success() {
        let status = response.status;
        let body = response.text().await?;
        return emit(ctx, &ApiResponse::new(status, Payload::from_text(body)));
    }

    let out = ctx.renderer.pass_through(STREAM_CHUNK_SIZE);
    let (_, written) = forward(response.into_chunks(), out).await?;
    debug!(bytes = written, format = ?format, "Export written");
    Ok(())
}

/// Copies every chunk of `chunks` to `out` without looking at it.
pub async fn forward<W: Write>(mut chunks: ByteStream, mut out: PassThrough<W>) -> Result<(W, u64)> {
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk.context("Export interrupted")?;
        out.write_chunk(&chunk)?;
    }
    Ok(out.finish()?)
}
