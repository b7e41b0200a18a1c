//! Document adapters
//!
//! Converts the JSON input document into engine configuration and writes the
//! final report back out as JSON.
//!
//! - `input`: input document types and their conversion to `OrchestratorConfig`
//! - `output`: report rendering and writing

pub mod input;
pub mod output;

use crate::orchestrator::{MarketReport, Orchestrator, SimulationError};
use std::path::Path;
use thiserror::Error;

pub use input::{load_document, parse_document, DistributorEntry, InitialData, InputDocument, ProducerEntry};
pub use output::{render_report, write_report};

/// Errors raised while reading, running or writing a document
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to access document: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Simulation(#[from] SimulationError),
}

/// Run a parsed input document to completion
///
/// # Example
///
/// ```rust
/// use energy_market_core_rs::io::{parse_document, simulate};
///
/// let document = parse_document(r#"{
///     "numberOfTurns": 1,
///     "initialData": {
///         "consumers": [{ "id": 0, "initialBudget": 100, "monthlyIncome": 50 }],
///         "distributors": [{
///             "id": 0, "contractLength": 3, "initialBudget": 200,
///             "initialInfrastructureCost": 20, "energyNeededKW": 0,
///             "producerStrategy": "GREEN"
///         }]
///     }
/// }"#).unwrap();
///
/// let report = simulate(&document).unwrap();
/// assert_eq!(report.consumers[0].budget, 100 + 50 - 20 + 50 - 20);
/// ```
pub fn simulate(document: &InputDocument) -> Result<MarketReport, DocumentError> {
    let (config, monthly_updates) = document.to_config()?;
    let mut orchestrator = Orchestrator::new(config)?;
    Ok(orchestrator.run(&monthly_updates)?)
}

/// Load an input document, run it and write the report
///
/// Nothing is written when loading or running fails.
pub fn run_file<P, Q>(input: P, output: Q) -> Result<MarketReport, DocumentError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let document = load_document(input)?;
    let report = simulate(&document)?;
    write_report(output, &report)?;
    Ok(report)
}
