use crate::domain::model::{EnrichedRoom, Record};
use crate::utils::error::{EtlError, Result};
use std::path::Path;

/// Turns an input file into raw records.
pub trait RecordReader: Send + Sync {
    /// Short format tag, e.g. `"json"`.
    fn format(&self) -> &'static str;

    /// File extensions (lowercase, without dot) this reader understands.
    fn extensions(&self) -> &'static [&'static str];

    /// Parse already-loaded bytes. `source` is only used for error messages.
    fn parse(&self, bytes: &[u8], source: &Path) -> Result<Vec<Record>>;

    fn read(&self, path: &Path) -> Result<Vec<Record>> {
        let bytes = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => EtlError::NotFound {
                path: path.to_path_buf(),
            },
            _ => EtlError::Io(e),
        })?;
        self.parse(&bytes, path)
    }
}

/// Serializes enriched rooms in one output format.
pub trait RoomWriter: Send + Sync {
    fn format(&self) -> &'static str;

    fn extensions(&self) -> &'static [&'static str];

    fn render(&self, rooms: &[EnrichedRoom]) -> Result<Vec<u8>>;

    /// 先完整序列化到記憶體，成功後才建立輸出檔
    fn write(&self, rooms: &[EnrichedRoom], destination: &Path) -> Result<()> {
        let bytes = self.render(rooms).map_err(|e| match e {
            EtlError::Serialization { message, .. } => EtlError::Serialization {
                path: destination.to_path_buf(),
                message,
            },
            other => other,
        })?;

        std::fs::write(destination, bytes).map_err(|e| EtlError::Serialization {
            path: destination.to_path_buf(),
            message: e.to_string(),
        })
    }
}
