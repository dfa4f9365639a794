use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// One row of a `family_manifest.csv`:
///
/// ```text
/// filename,label,external_id,sex,format
/// NA19238.vcf.gz,CG Yoruban Mother,1,female,vcf.gz
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FamilyMember {
    pub filename: String,
    pub label: String,
    pub external_id: String,
    pub sex: String,
    pub format: String,
}

pub fn parse_manifest<R: Read>(reader: R) -> Result<Vec<FamilyMember>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let members = reader
        .deserialize::<FamilyMember>()
        .enumerate()
        .map(|(index, row)| row.with_context(|| format!("Invalid manifest row {}", index + 1)))
        .collect::<Result<Vec<FamilyMember>>>()?;

    if members.is_empty() {
        bail!("Family manifest lists no members");
    }
    Ok(members)
}

pub fn read_manifest(path: &Path) -> Result<Vec<FamilyMember>> {
    let file = File::open(path)
        .with_context(|| format!("Unable to open family manifest {}", path.display()))?;
    parse_manifest(file).with_context(|| format!("Malformed family manifest {}", path.display()))
}
