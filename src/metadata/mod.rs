use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::error::Result;
use crate::{MetadataAnalysisResult, ValidationIssue, ValidationSeverity};

const EDITING_SOFTWARE_MARKERS: [&str; 3] = ["photoshop", "gimp", "paint"];

pub struct MetadataAnalyzer;

impl MetadataAnalyzer {
    pub fn analyze<P: AsRef<Path>>(path: P) -> Result<MetadataAnalysisResult> {
        let file = File::open(&path)?;
        let mut reader = BufReader::new(file);

        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => Ok(Self::analyze_exif(&exif)),
            Err(_) => Ok(Self::no_exif_result()),
        }
    }

    fn no_exif_result() -> MetadataAnalysisResult {
        MetadataAnalysisResult {
            has_exif: false,
            has_editing_software_signs: false,
            has_timestamp_inconsistencies: false,
            has_camera_info: false,
            exif_data: None,
            issues: vec![ValidationIssue::new(
                "metadata",
                ValidationSeverity::Low,
                "No EXIF data found",
            )],
        }
    }

    fn analyze_exif(exif: &exif::Exif) -> MetadataAnalysisResult {
        let mut tags = BTreeMap::new();
        for field in exif.fields() {
            tags.insert(format!("{}", field.tag), field.display_value().to_string());
        }

        let has_exif = !tags.is_empty();

        let make = exif.get_field(exif::Tag::Make, exif::In::PRIMARY);
        let model = exif.get_field(exif::Tag::Model, exif::In::PRIMARY);
        let has_camera_info = make.is_some() || model.is_some();

        let software = exif
            .get_field(exif::Tag::Software, exif::In::PRIMARY)
            .map(|f| f.display_value().to_string());
        let has_editing_software_signs = software.as_ref().is_some_and(|sw| {
            let lower = sw.to_lowercase();
            EDITING_SOFTWARE_MARKERS
                .iter()
                .any(|marker| lower.contains(marker))
        });

        let date_time = exif.get_field(exif::Tag::DateTime, exif::In::PRIMARY);
        let date_time_original = exif.get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY);
        let date_time_digitized = exif.get_field(exif::Tag::DateTimeDigitized, exif::In::PRIMARY);

        let differing_digitized = match (date_time_original, date_time_digitized) {
            (Some(orig), Some(digi)) => {
                orig.display_value().to_string() != digi.display_value().to_string()
            }
            _ => false,
        };
        let stripped_original = date_time.is_some() && date_time_original.is_none();
        let has_timestamp_inconsistencies = differing_digitized || stripped_original;

        let mut issues = Vec::new();
        if !has_exif {
            issues.push(ValidationIssue::new(
                "metadata",
                ValidationSeverity::Low,
                "No EXIF data found",
            ));
        }
        if has_editing_software_signs {
            issues.push(ValidationIssue::new(
                "metadata",
                ValidationSeverity::Medium,
                format!(
                    "Edited with: {}",
                    software.as_deref().unwrap_or("unknown software")
                ),
            ));
        }
        if has_timestamp_inconsistencies {
            issues.push(ValidationIssue::new(
                "metadata",
                ValidationSeverity::Medium,
                "Inconsistent or stripped timestamp metadata",
            ));
        }

        MetadataAnalysisResult {
            has_exif,
            has_editing_software_signs,
            has_timestamp_inconsistencies,
            has_camera_info,
            exif_data: if has_exif { Some(tags) } else { None },
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_produces_io_error() {
        let result = MetadataAnalyzer::analyze("/nonexistent/path/does-not-exist.jpg");
        assert!(result.is_err());
    }

    #[test]
    fn no_exif_result_flags_low_severity_issue() {
        let result = MetadataAnalyzer::no_exif_result();
        assert!(!result.has_exif);
        assert_eq!(result.issues.len(), 1);
        assert_eq!(result.issues[0].severity, ValidationSeverity::Low);
    }
}
