//! Raw CSV ingestion boundary (spec §6, §7 item 4).
//!
//! Parses the wire form `feature,procedure,observableproperty,epochMillis,
//! value_or_NotAValue[,...]` into [`SemanticObservation`]s. Malformed rows
//! are rejected here, before the core ever sees them — the core's checks
//! never handle a parse failure.

use thiserror::Error;

use crate::model::{ObservationType, Puid, SemanticObservation, NOT_A_VALUE};

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("row has too few fields: {0:?}")]
    TooFewFields(Vec<String>),

    #[error("malformed epoch millis {0:?}")]
    MalformedInstant(String),

    #[error("malformed numeric value {0:?}")]
    MalformedValue(String),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

/// Parse a single CSV record into a [`SemanticObservation`].
///
/// The wire form carries only a point-in-time reading (no separate end
/// time), so `phenomenonTimeEnd` is set equal to `phenomenonTimeStart`.
pub fn parse_record(record: &csv::StringRecord) -> Result<SemanticObservation, IngestError> {
    if record.len() < 5 {
        return Err(IngestError::TooFewFields(
            record.iter().map(str::to_string).collect(),
        ));
    }

    let feature = record.get(0).unwrap();
    let procedure = record.get(1).unwrap();
    let observableproperty = record.get(2).unwrap();
    let instant_str = record.get(3).unwrap();
    let value_str = record.get(4).unwrap();

    let instant: i64 = instant_str
        .parse()
        .map_err(|_| IngestError::MalformedInstant(instant_str.to_string()))?;

    let (observation_type, numeric_value, categoric_value) = if value_str == NOT_A_VALUE {
        (ObservationType::Numerical, None, None)
    } else {
        match value_str.parse::<f64>() {
            Ok(v) => (ObservationType::Numerical, Some(v), None),
            Err(_) => (ObservationType::Categorical, None, Some(value_str.to_string())),
        }
    };

    Ok(SemanticObservation {
        puid: Puid::new(feature, procedure, observableproperty),
        phenomenon_time_start: instant,
        phenomenon_time_end: instant,
        observation_type,
        numeric_value,
        categoric_value,
        quality: 0,
        accuracy: 0,
        status: String::new(),
        processing: String::new(),
        uncertml: String::new(),
        comment: String::new(),
        location: String::new(),
        parameters: String::new(),
    })
}

/// Read every well-formed record from `reader`, logging and skipping rows
/// that fail to parse rather than aborting the whole stream.
pub fn read_all<R: std::io::Read>(reader: R) -> Vec<SemanticObservation> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(reader);

    let mut observations = Vec::new();
    for result in csv_reader.records() {
        match result {
            Ok(record) => match parse_record(&record) {
                Ok(obs) => observations.push(obs),
                Err(e) => tracing::warn!(error = %e, "rejected malformed observation row"),
            },
            Err(e) => tracing::warn!(error = %e, "rejected malformed CSV row"),
        }
    }
    observations
}
