use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Report fields filled from the patient information file, in row order.
pub const PATIENT_INFO_FIELDS: [&str; 11] = [
    "Last Name",
    "First Name",
    "Patient DOB",
    "Accession ID",
    "Patient Sex",
    "Patient Ethnicity",
    "Indication for Testing",
    "Specimen Type",
    "Date Specimen Collected",
    "Date Specimen Received",
    "Ordering Physician",
];

/// Patient information keyed by report field name. Serializes as a JSON
/// object whose keys keep [`PATIENT_INFO_FIELDS`] order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientInfo {
    values: Vec<(&'static str, String)>,
}

impl PatientInfo {
    /// Parses a two column CSV. The header row is skipped, data row `i` fills
    /// field `i` from its second column and rows past the eleventh are ignored.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_reader(reader);

        let mut values = Vec::with_capacity(PATIENT_INFO_FIELDS.len());
        for (field, record) in PATIENT_INFO_FIELDS.iter().zip(reader.records()) {
            let record = record.with_context(|| format!("Unable to read row for '{field}'"))?;
            let value = record.get(1).ok_or_else(|| {
                anyhow!(
                    "Row for '{field}' has no value column: {:?}",
                    record.iter().collect::<Vec<_>>()
                )
            })?;
            values.push((*field, value.to_string()));
        }

        if values.len() < PATIENT_INFO_FIELDS.len() {
            bail!(
                "Expected {} patient information rows after the header, found {}",
                PATIENT_INFO_FIELDS.len(),
                values.len()
            );
        }

        Ok(Self { values })
    }

    #[cfg(test)]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, value)| value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.values.iter().map(|(name, value)| (*name, value.as_str()))
    }
}

impl Serialize for PatientInfo {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len()))?;
        for (name, value) in &self.values {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

pub fn read_patient_info(path: &Path) -> Result<PatientInfo> {
    let file = File::open(path)
        .with_context(|| format!("Unable to open patient information file {}", path.display()))?;
    PatientInfo::from_reader(file)
        .with_context(|| format!("Malformed patient information file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SAMPLE: &str = "\
Opal Patient Information,value
Patient Last Name,John
Patient First Name,Doe
Patient DOB,1/1/00
Accession ID,JD1
Patient Sex,Male
Patient Ethnicity,Caucasian
Indication for Testing,Disease
Specimen Type,Blood
Date Specimen Collected,9/9/14
Date Specimen Received,9/13/14
Ordering Physician,Paul Billings
";

    #[test]
    fn test_rows_map_to_fields_by_position() {
        let info = PatientInfo::from_reader(SAMPLE.as_bytes()).unwrap();

        assert_eq!(info.get("Last Name"), Some("John"));
        assert_eq!(info.get("First Name"), Some("Doe"));
        assert_eq!(info.get("Accession ID"), Some("JD1"));
        assert_eq!(info.get("Ordering Physician"), Some("Paul Billings"));

        let names: Vec<&str> = info.iter().map(|(name, _)| name).collect();
        assert_eq!(names, PATIENT_INFO_FIELDS);
    }

    #[test]
    fn test_row_labels_are_ignored() {
        let csv = SAMPLE.replace("Patient Last Name", "Surname");
        let info = PatientInfo::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(info.get("Last Name"), Some("John"));
    }

    #[test]
    fn test_extra_rows_are_ignored() {
        let csv = format!("{SAMPLE}Referring Lab,Somewhere\n");
        let info = PatientInfo::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(info.iter().count(), 11);
    }

    #[test]
    fn test_carriage_return_line_endings() {
        let csv = SAMPLE.replace('\n', "\r\n");
        let info = PatientInfo::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(info.get("Patient DOB"), Some("1/1/00"));
    }

    #[test]
    fn test_short_file_is_rejected() {
        let csv: String = SAMPLE.lines().take(6).map(|line| format!("{line}\n")).collect();
        let err = PatientInfo::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("found 5"));
    }

    #[test]
    fn test_missing_value_column_is_rejected() {
        let csv = SAMPLE.replace("Specimen Type,Blood", "Specimen Type");
        let err = PatientInfo::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Specimen Type"));
    }

    #[test]
    fn test_serializes_in_field_order() {
        let info = PatientInfo::from_reader(SAMPLE.as_bytes()).unwrap();
        let json = serde_json::to_string(&info).unwrap();
        assert!(json.starts_with(r#"{"Last Name":"John","First Name":"Doe","Patient DOB":"1/1/00""#));
        assert!(json.ends_with(r#""Ordering Physician":"Paul Billings"}"#));
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let info = read_patient_info(file.path()).unwrap();
        assert_eq!(info.get("Specimen Type"), Some("Blood"));
    }

    #[test]
    fn test_read_missing_file() {
        let err = read_patient_info(Path::new("/nonexistent/patient.csv")).unwrap_err();
        assert!(err.to_string().contains("Unable to open"));
    }
}
