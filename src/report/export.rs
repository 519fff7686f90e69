//! Download links for the PDF and Excel reports.

use crate::api::models::DateRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Pdf,
    Excel,
}

impl ExportFormat {
    fn path(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "laporan-pdf",
            ExportFormat::Excel => "laporan-pdf/download-excel",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            other => Err(format!("Unknown export format: {}", other)),
        }
    }
}

/// Link to the report for `range` under `export_base`
pub fn export_url(export_base: &str, format: ExportFormat, range: &DateRange) -> String {
    let query = range
        .query()
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");
    format!(
        "{}/{}?{}",
        export_base.trim_end_matches('/'),
        format.path(),
        query
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn range() -> DateRange {
        DateRange::new(
            NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 31).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_export_urls() {
        assert_eq!(
            export_url("https://kas.example/api/", ExportFormat::Pdf, &range()),
            "https://kas.example/api/laporan-pdf?start_date=2025-01-01&end_date=2025-01-31"
        );
        assert_eq!(
            export_url("https://kas.example/api", ExportFormat::Excel, &range()),
            "https://kas.example/api/laporan-pdf/download-excel?start_date=2025-01-01&end_date=2025-01-31"
        );
    }

    #[test]
    fn test_parse_format() {
        assert_eq!("PDF".parse::<ExportFormat>(), Ok(ExportFormat::Pdf));
        assert_eq!("xlsx".parse::<ExportFormat>(), Ok(ExportFormat::Excel));
        assert!("csv".parse::<ExportFormat>().is_err());
    }
}
