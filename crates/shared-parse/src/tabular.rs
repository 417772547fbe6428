//! CSV ingestion as structured text.

use crate::parser::ParserConfig;
use crate::ParseError;
use shared_types::{DocumentType, ParsedDocument, TableShape};
use tracing::debug;

/// How many data rows are echoed into the text rendition.
const SAMPLE_ROWS: usize = 10;

pub struct CsvParser;

impl CsvParser {
    pub fn parse(bytes: &[u8], config: &ParserConfig) -> Result<ParsedDocument, ParseError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes);

        let headers = reader
            .headers()
            .map_err(|e| ParseError::InvalidCsv(e.to_string()))?
            .clone();
        let columns = headers.len();

        let mut rows: u32 = 0;
        let mut consistent_rows: u32 = 0;
        let mut sample = Vec::new();

        for result in reader.records() {
            let record = result.map_err(|e| ParseError::InvalidCsv(e.to_string()))?;
            rows += 1;
            if record.len() == columns {
                consistent_rows += 1;
            }
            if sample.len() < SAMPLE_ROWS {
                sample.push(record.iter().collect::<Vec<_>>().join(", "));
            }
            if rows as usize >= config.max_csv_rows {
                debug!(
                    max_csv_rows = config.max_csv_rows,
                    "CSV row cap reached, ignoring remainder"
                );
                break;
            }
        }

        let mut text = format!(
            "CSV with {} rows and {} columns\nColumns: {}\n",
            rows,
            columns,
            headers.iter().collect::<Vec<_>>().join(", ")
        );
        for line in &sample {
            text.push_str(line);
            text.push('\n');
        }

        Ok(ParsedDocument {
            text,
            source_format: DocumentType::Csv,
            ocr_used: false,
            page_count: 1,
            table_shape: Some(TableShape {
                rows,
                columns: columns as u32,
                consistent_rows,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_well_formed_csv() {
        let bytes = b"batch_id,exporter,quantity\nBATCH-20260115-A1B2C3,Acme Foods,1200 kg\nBATCH-20260115-A1B2C3,Acme Foods,800 kg\n";
        let parsed = CsvParser::parse(bytes, &ParserConfig::default()).unwrap();

        let shape = parsed.table_shape.unwrap();
        assert_eq!(shape.rows, 2);
        assert_eq!(shape.columns, 3);
        assert_eq!(shape.consistent_rows, 2);
        assert!(parsed.text.contains("CSV with 2 rows and 3 columns"));
        assert!(parsed.text.contains("Columns: batch_id, exporter, quantity"));
        assert!(parsed.text.contains("Acme Foods"));
    }

    #[test]
    fn counts_ragged_rows_as_inconsistent() {
        let bytes = b"a,b,c\n1,2,3\n4,5\n6,7,8,9\n";
        let parsed = CsvParser::parse(bytes, &ParserConfig::default()).unwrap();

        let shape = parsed.table_shape.unwrap();
        assert_eq!(shape.rows, 3);
        assert_eq!(shape.consistent_rows, 1);
    }

    #[test]
    fn honors_row_cap() {
        let mut data = String::from("a,b\n");
        for i in 0..50 {
            data.push_str(&format!("{},{}\n", i, i));
        }
        let config = ParserConfig {
            max_csv_rows: 20,
            ..Default::default()
        };
        let parsed = CsvParser::parse(data.as_bytes(), &config).unwrap();
        assert_eq!(parsed.table_shape.unwrap().rows, 20);
    }
}
