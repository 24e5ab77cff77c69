use crate::adapters::extension_of;
use crate::domain::model::Record;
use crate::domain::ports::RecordReader;
use crate::utils::error::{EtlError, Result};
use serde_json::{Map, Value};
use std::path::Path;

/// Reads a JSON array of objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonReader;

impl RecordReader for JsonReader {
    fn format(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn parse(&self, bytes: &[u8], source: &Path) -> Result<Vec<Record>> {
        let items: Vec<Map<String, Value>> =
            serde_json::from_slice(bytes).map_err(|e| EtlError::Parse {
                path: source.to_path_buf(),
                message: e.to_string(),
            })?;

        Ok(items
            .into_iter()
            .map(|obj| Record {
                data: obj.into_iter().collect(),
            })
            .collect())
    }
}

/// Reads a CSV file with a header row.
///
/// Cells are typed loosely: empty -> null, integer text -> number, anything else -> string.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvReader;

impl CsvReader {
    fn cell_value(cell: &str) -> Value {
        if cell.is_empty() {
            Value::Null
        } else if let Ok(n) = cell.parse::<i64>() {
            Value::Number(n.into())
        } else {
            Value::String(cell.to_string())
        }
    }
}

impl RecordReader for CsvReader {
    fn format(&self) -> &'static str {
        "csv"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["csv"]
    }

    fn parse(&self, bytes: &[u8], source: &Path) -> Result<Vec<Record>> {
        let parse_error = |e: csv::Error| EtlError::Parse {
            path: source.to_path_buf(),
            message: e.to_string(),
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(bytes);
        let headers = reader.headers().map_err(parse_error)?.clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(parse_error)?;
            let data = headers
                .iter()
                .zip(row.iter())
                .map(|(key, cell)| (key.to_string(), Self::cell_value(cell)))
                .collect();
            records.push(Record { data });
        }

        Ok(records)
    }
}

/// Input format dispatch table keyed by file extension.
pub struct ReaderRegistry {
    readers: Vec<Box<dyn RecordReader>>,
}

impl ReaderRegistry {
    /// Registry holding only the JSON reader, which doubles as the fallback.
    pub fn new() -> Self {
        Self {
            readers: vec![Box::new(JsonReader)],
        }
    }

    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(CsvReader));
        registry
    }

    pub fn register(&mut self, reader: Box<dyn RecordReader>) {
        self.readers.push(reader);
    }

    /// 依副檔名挑選 reader，找不到時以 JSON 解析
    pub fn for_path(&self, path: &Path) -> &dyn RecordReader {
        let extension = extension_of(path);
        let reader = self
            .readers
            .iter()
            .find(|r| r.extensions().contains(&extension.as_str()))
            .unwrap_or(&self.readers[0]);
        &**reader
    }

    pub fn read(&self, path: &Path) -> Result<Vec<Record>> {
        let reader = self.for_path(path);
        tracing::debug!("Reading {} as {}", path.display(), reader.format());
        reader.read(path)
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::path::PathBuf;

    #[test]
    fn test_json_reader_parses_array_of_objects() {
        let input = br#"[{"id": 1, "name": "A"}, {"id": 2, "name": "B", "extra": true}]"#;
        let records = JsonReader.parse(input, Path::new("rooms.json")).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].data["id"], json!(1));
        assert_eq!(records[1].data["extra"], json!(true));
    }

    #[test]
    fn test_json_reader_rejects_malformed_input() {
        let err = JsonReader
            .parse(b"[{\"id\": 1,", Path::new("students.json"))
            .unwrap_err();
        assert!(matches!(err, EtlError::Parse { ref path, .. } if path == &PathBuf::from("students.json")));

        // 頂層必須是陣列
        let err = JsonReader
            .parse(br#"{"id": 1}"#, Path::new("students.json"))
            .unwrap_err();
        assert!(matches!(err, EtlError::Parse { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = JsonReader
            .read(Path::new("/definitely/not/here/rooms.json"))
            .unwrap_err();
        assert!(matches!(err, EtlError::NotFound { .. }));
    }

    #[test]
    fn test_csv_reader_types_cells() {
        let input = b"id,name,room\n10,Ann,1\n11,Bob,\n12,Cy,B-2\n";
        let records = CsvReader.parse(input, Path::new("students.csv")).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records[0].data["id"], json!(10));
        assert_eq!(records[0].data["room"], json!(1));
        assert_eq!(records[1].data["room"], Value::Null);
        assert_eq!(records[2].data["room"], json!("B-2"));
    }

    #[test]
    fn test_registry_dispatch_by_extension() {
        let registry = ReaderRegistry::with_defaults();

        assert_eq!(registry.for_path(Path::new("rooms.json")).format(), "json");
        assert_eq!(registry.for_path(Path::new("ROOMS.CSV")).format(), "csv");
        assert_eq!(registry.for_path(Path::new("rooms.txt")).format(), "json");
        assert_eq!(registry.for_path(Path::new("rooms")).format(), "json");
    }
}
