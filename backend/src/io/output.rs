//! Output document
//!
//! Writes the final `MarketReport` as JSON with the document's camelCase keys.

use crate::io::DocumentError;
use crate::orchestrator::MarketReport;
use std::path::Path;

/// Render a report as pretty-printed JSON
pub fn render_report(report: &MarketReport) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Write a report to disk, replacing any existing file
pub fn write_report<P: AsRef<Path>>(path: P, report: &MarketReport) -> Result<(), DocumentError> {
    let json = render_report(report)?;
    std::fs::write(path, json)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::ConsumerRecord;

    #[test]
    fn test_render_uses_document_keys() {
        let report = MarketReport {
            consumers: vec![ConsumerRecord {
                id: 1,
                is_bankrupt: true,
                budget: -3,
            }],
            distributors: vec![],
            energy_producers: vec![],
        };

        let json = render_report(&report).unwrap();
        assert!(json.contains("\"isBankrupt\": true"));
        assert!(json.contains("\"energyProducers\": []"));

        let parsed: MarketReport = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, report);
    }
}
