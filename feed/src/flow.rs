use serde::{Deserialize, Serialize};

/// One (timestamp, flow) row. Both fields are kept as the source wrote them, minus surrounding
/// whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowRecord {
    pub time: String,
    pub flow: String,
}

/// Each physical line is split literally on commas. Quotes have no special meaning, so one bad
/// line can't swallow the lines after it.
pub fn load<R: std::io::Read>(reader: R) -> Vec<FlowRecord> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut records = Vec::new();
    let mut skipped = 0;
    for rec in reader.records() {
        let rec = match rec {
            Ok(rec) => rec,
            Err(err) => {
                debug!("Skipping malformed flow line: {err}");
                skipped += 1;
                continue;
            }
        };
        match (rec.get(0), rec.get(1)) {
            (Some(time), Some(flow)) if !time.is_empty() && !flow.is_empty() => {
                records.push(FlowRecord {
                    time: time.to_string(),
                    flow: flow.to_string(),
                });
            }
            _ => {
                skipped += 1;
            }
        }
    }
    if skipped > 0 {
        debug!("Skipped {skipped} flow lines without both a time and a flow");
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(time: &str, flow: &str) -> FlowRecord {
        FlowRecord {
            time: time.to_string(),
            flow: flow.to_string(),
        }
    }

    #[test]
    fn header_is_skipped() {
        let records = load("time,flow\n2018/7/7 0:20,42\n".as_bytes());
        assert_eq!(records, vec![rec("2018/7/7 0:20", "42")]);
    }

    #[test]
    fn incomplete_lines_are_skipped() {
        let input = "time,flow\n\
                     2018/7/7 0:20 , 42 \r\n\
                     2018/7/7 0:35\n\
                     ,17\n\
                     2018/7/7 0:50,\n\
                     \n\
                     2018/7/7 1:05,58,extra\n";
        assert_eq!(
            load(input.as_bytes()),
            vec![rec("2018/7/7 0:20", "42"), rec("2018/7/7 1:05", "58")]
        );
    }

    #[test]
    fn quotes_are_plain_text() {
        let input = "time,flow\n\
                     2018/7/7 0:05,\"17\n\
                     2018/7/7 0:20,42\n\
                     \"2018/7/7 0:35\",\"4,0\"\n\
                     2018/7/7 0:50,40\n";
        assert_eq!(
            load(input.as_bytes()),
            vec![
                rec("2018/7/7 0:05", "\"17"),
                rec("2018/7/7 0:20", "42"),
                rec("\"2018/7/7 0:35\"", "\"4"),
                rec("2018/7/7 0:50", "40"),
            ]
        );
    }

    #[test]
    fn only_header() {
        assert!(load("time,flow\n".as_bytes()).is_empty());
        assert!(load("".as_bytes()).is_empty());
    }

    #[test]
    fn parsing_is_repeatable() {
        let input = "time,flow\n2018/7/7 0:20,42\n2018/7/7 0:35,40\n";
        assert_eq!(load(input.as_bytes()), load(input.as_bytes()));
    }
}
