use thiserror::Error;

/// Configuration-level failures of the query engine.
///
/// The pipeline itself never fails; these come from building histograms,
/// pages or screens with invalid settings, or from opt-in strict checks.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    #[error("histogram needs at least two strictly increasing edges, got {0:?}")]
    InvalidEdges(Vec<f64>),
    #[error("page size must be at least 1")]
    ZeroPageSize,
    #[error("unknown field(s) for {record}: {fields:?}")]
    UnknownFields {
        record: &'static str,
        fields: Vec<String>,
    },
    #[error("screen '{0}' requires an admin session")]
    AdminRequired(&'static str),
    #[error("screen '{screen}' expects {expected} records")]
    WrongDomain {
        screen: &'static str,
        expected: &'static str,
    },
}
