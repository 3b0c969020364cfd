use anyhow::Result;

use model::{AuxDocuments, FlowQuery, Model};

use crate::source::Source;

/// Answers one flow lookup on stdout. Only bad input is an error; a failed fetch or a miss is a
/// normal answer.
pub fn lookup(flows: Source, aux_docs: AuxDocuments, input: &str) -> Result<()> {
    let mut model = Model::empty(aux_docs);
    info!("Reading flow data from {flows}");
    model.set_flows(flows.read_blocking());

    let query = model.query_flow(input);
    println!("{}", query.describe());
    if let Some(doc) = query.document() {
        println!("Details for this day: {doc}");
    }
    if let FlowQuery::InvalidFormat(ref err) = query {
        return Err(err.clone().into());
    }
    if query == FlowQuery::MissingInput {
        bail!("No date-time given");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_csv(name: &str, contents: &str) -> Source {
        let path = std::env::temp_dir().join(name);
        fs_err::write(&path, contents).unwrap();
        Source::Path(path.to_string_lossy().to_string())
    }

    #[test]
    fn answers_from_a_local_file() {
        let flows = write_csv("flight_spotting_found.csv", "time,flow\n2018/7/7 0:20,42\n");
        assert!(lookup(flows, AuxDocuments::default(), "2018-07-07T00:20").is_ok());
    }

    #[test]
    fn only_bad_input_fails() {
        let flows = write_csv("flight_spotting_bad.csv", "time,flow\n2018/7/7 0:20,42\n");
        assert!(lookup(flows.clone(), AuxDocuments::default(), "2018-07-07T00:35").is_ok());
        assert!(lookup(flows, AuxDocuments::default(), "yesterday").is_err());
        assert!(lookup(
            Source::Path("/no/such/flows.csv".to_string()),
            AuxDocuments::default(),
            "2018-07-07T00:20"
        )
        .is_ok());
    }
}
