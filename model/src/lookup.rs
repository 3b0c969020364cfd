use feed::FlowRecord;

use crate::timestamp::{normalize, CanonicalTimestamp, InvalidTimestamp};
use crate::AuxDocuments;

/// Load state of the flow time-series
#[derive(Clone, Debug, PartialEq)]
pub enum FlowSeries {
    /// The fetch hasn't resolved yet
    Pending,
    Loaded(Vec<FlowRecord>),
    Failed(String),
}

/// Everything that can come of asking for the flow at some time
#[derive(Clone, Debug, PartialEq)]
pub enum FlowQuery {
    MissingInput,
    InvalidFormat(InvalidTimestamp),
    NotLoaded,
    LoadFailed(String),
    NotFound(CanonicalTimestamp),
    Found {
        timestamp: CanonicalTimestamp,
        flow: String,
        /// The auxiliary document for this calendar day
        document: Option<String>,
    },
}

impl FlowQuery {
    /// These block the action entirely, rather than showing up as a result
    pub fn is_blocking(&self) -> bool {
        matches!(self, FlowQuery::MissingInput | FlowQuery::InvalidFormat(_))
    }

    pub fn document(&self) -> Option<&str> {
        match self {
            FlowQuery::Found { document, .. } => document.as_deref(),
            _ => None,
        }
    }

    pub fn describe(&self) -> String {
        match self {
            FlowQuery::MissingInput => "Please enter a date and time".to_string(),
            FlowQuery::InvalidFormat(_) => {
                "Invalid time format, please enter a valid date and time".to_string()
            }
            FlowQuery::NotLoaded => "Flow data hasn't loaded yet".to_string(),
            FlowQuery::LoadFailed(err) => format!("Flow data couldn't be loaded: {err}"),
            FlowQuery::NotFound(_) => "No flow data for this time".to_string(),
            FlowQuery::Found { flow, .. } => format!("Flow at this time: {flow}"),
        }
    }
}

/// Linear scan for the first record whose normalized time equals the query
pub fn find_flow<'a>(records: &'a [FlowRecord], normalized_query: &str) -> Option<&'a FlowRecord> {
    records
        .iter()
        .find(|rec| normalize(&rec.time) == normalized_query)
}

pub fn query(series: &FlowSeries, aux_docs: &AuxDocuments, input: &str) -> FlowQuery {
    if input.trim().is_empty() {
        return FlowQuery::MissingInput;
    }
    let timestamp = match CanonicalTimestamp::parse(input) {
        Ok(x) => x,
        Err(err) => {
            return FlowQuery::InvalidFormat(err);
        }
    };
    let records = match series {
        FlowSeries::Pending => {
            return FlowQuery::NotLoaded;
        }
        FlowSeries::Failed(err) => {
            return FlowQuery::LoadFailed(err.clone());
        }
        FlowSeries::Loaded(records) => records,
    };

    let normalized = timestamp.normalized();
    debug!("Looking up flow at {normalized}");
    match find_flow(records, &normalized) {
        Some(rec) => FlowQuery::Found {
            document: aux_docs.resolve(timestamp.date()),
            flow: rec.flow.clone(),
            timestamp,
        },
        None => FlowQuery::NotFound(timestamp),
    }
}
