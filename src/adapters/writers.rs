use crate::adapters::extension_of;
use crate::domain::model::{EnrichedRoom, Id};
use crate::domain::ports::RoomWriter;
use crate::utils::error::{EtlError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Output knobs shared by every writer so JSON and XML stay consistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    pub pretty: bool,
    pub indent: usize,
    /// Keep the `room` field on each serialized student (omitted by default).
    pub include_student_room: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: 4,
            include_student_room: false,
        }
    }
}

fn serialization_error(e: impl std::fmt::Display) -> EtlError {
    // path 由 RoomWriter::write 補上
    EtlError::Serialization {
        path: PathBuf::new(),
        message: e.to_string(),
    }
}

#[derive(Serialize)]
struct RoomView<'a> {
    id: &'a Id,
    name: &'a str,
    students: Vec<StudentView<'a>>,
}

#[derive(Serialize)]
struct StudentView<'a> {
    id: &'a Id,
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    room: Option<&'a Id>,
}

/// Writes `[{"id", "name", "students": [{"id", "name"}]}]`.
#[derive(Debug, Clone, Default)]
pub struct JsonWriter {
    options: WriteOptions,
}

impl JsonWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    fn views<'a>(&self, rooms: &'a [EnrichedRoom]) -> Vec<RoomView<'a>> {
        rooms
            .iter()
            .map(|enriched| RoomView {
                id: &enriched.room.id,
                name: &enriched.room.name,
                students: enriched
                    .students
                    .iter()
                    .map(|s| StudentView {
                        id: &s.id,
                        name: &s.name,
                        room: if self.options.include_student_room {
                            Some(enriched.id())
                        } else {
                            None
                        },
                    })
                    .collect(),
            })
            .collect()
    }
}

impl RoomWriter for JsonWriter {
    fn format(&self) -> &'static str {
        "json"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["json"]
    }

    fn render(&self, rooms: &[EnrichedRoom]) -> Result<Vec<u8>> {
        let views = self.views(rooms);

        let mut buf = if self.options.pretty {
            let indent = vec![b' '; self.options.indent];
            let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent);
            let mut buf = Vec::new();
            let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
            views
                .serialize(&mut serializer)
                .map_err(serialization_error)?;
            buf
        } else {
            serde_json::to_vec(&views).map_err(serialization_error)?
        };

        buf.push(b'\n');
        Ok(buf)
    }
}

/// Writes
/// `<rooms><room id=".." name=".."><students><student id=".." name=".."/></students></room></rooms>`.
///
/// Rooms without students get an empty `<students/>` element. With
/// `include_student_room` each `<student>` also carries a `room` attribute.
#[derive(Debug, Clone, Default)]
pub struct XmlWriter {
    options: WriteOptions,
}

impl XmlWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    fn write_room(&self, writer: &mut Writer<Vec<u8>>, enriched: &EnrichedRoom) -> Result<()> {
        let room_id = enriched.id().to_string();

        let mut start = BytesStart::new("room");
        start.push_attribute(("id", room_id.as_str()));
        start.push_attribute(("name", enriched.room.name.as_str()));
        writer
            .write_event(Event::Start(start))
            .map_err(serialization_error)?;

        if enriched.students.is_empty() {
            writer
                .write_event(Event::Empty(BytesStart::new("students")))
                .map_err(serialization_error)?;
        } else {
            writer
                .write_event(Event::Start(BytesStart::new("students")))
                .map_err(serialization_error)?;

            for student in &enriched.students {
                let student_id = student.id.to_string();
                let mut element = BytesStart::new("student");
                element.push_attribute(("id", student_id.as_str()));
                element.push_attribute(("name", student.name.as_str()));
                if self.options.include_student_room {
                    element.push_attribute(("room", room_id.as_str()));
                }
                writer
                    .write_event(Event::Empty(element))
                    .map_err(serialization_error)?;
            }

            writer
                .write_event(Event::End(BytesEnd::new("students")))
                .map_err(serialization_error)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("room")))
            .map_err(serialization_error)?;
        Ok(())
    }
}

impl RoomWriter for XmlWriter {
    fn format(&self) -> &'static str {
        "xml"
    }

    fn extensions(&self) -> &'static [&'static str] {
        &["xml"]
    }

    fn render(&self, rooms: &[EnrichedRoom]) -> Result<Vec<u8>> {
        let mut writer = if self.options.pretty {
            Writer::new_with_indent(Vec::new(), b' ', self.options.indent)
        } else {
            Writer::new(Vec::new())
        };

        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialization_error)?;
        writer
            .write_event(Event::Start(BytesStart::new("rooms")))
            .map_err(serialization_error)?;

        for enriched in rooms {
            self.write_room(&mut writer, enriched)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new("rooms")))
            .map_err(serialization_error)?;

        let mut buf = writer.into_inner();
        buf.push(b'\n');
        Ok(buf)
    }
}

/// Output format dispatch table keyed by file extension.
pub struct WriterRegistry {
    writers: Vec<Box<dyn RoomWriter>>,
}

impl WriterRegistry {
    pub fn new() -> Self {
        Self {
            writers: Vec::new(),
        }
    }

    pub fn with_options(options: WriteOptions) -> Self {
        let mut registry = Self::new();
        registry.register(Box::new(JsonWriter::new(options.clone())));
        registry.register(Box::new(XmlWriter::new(options)));
        registry
    }

    pub fn register(&mut self, writer: Box<dyn RoomWriter>) {
        self.writers.push(writer);
    }

    /// 副檔名比對不分大小寫
    pub fn for_path(&self, path: &Path) -> Result<&dyn RoomWriter> {
        let extension = extension_of(path);
        self.writers
            .iter()
            .find(|w| w.extensions().contains(&extension.as_str()))
            .map(|w| &**w)
            .ok_or(EtlError::UnsupportedFormat { extension })
    }

    pub fn formats(&self) -> Vec<&'static str> {
        self.writers.iter().map(|w| w.format()).collect()
    }
}

impl Default for WriterRegistry {
    fn default() -> Self {
        Self::with_options(WriteOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::{Room, Student};
    use serde_json::json;

    fn sample() -> Vec<EnrichedRoom> {
        vec![
            EnrichedRoom {
                room: Room::new(1, "A"),
                students: vec![
                    Student::new(10, "X", Some(Id::Int(1))),
                    Student::new(12, "Z", Some(Id::Int(1))),
                ],
            },
            EnrichedRoom {
                room: Room::new(2, "B & Co"),
                students: vec![],
            },
        ]
    }

    #[test]
    fn test_json_writer_omits_student_room_by_default() {
        let bytes = JsonWriter::default().render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(
            value,
            json!([
                {"id": 1, "name": "A", "students": [{"id": 10, "name": "X"}, {"id": 12, "name": "Z"}]},
                {"id": 2, "name": "B & Co", "students": []}
            ])
        );
    }

    #[test]
    fn test_json_writer_keeps_student_room_when_asked() {
        let writer = JsonWriter::new(WriteOptions {
            include_student_room: true,
            ..WriteOptions::default()
        });
        let bytes = writer.render(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value[0]["students"][1]["room"], json!(1));
    }

    #[test]
    fn test_json_writer_indent() {
        let bytes = JsonWriter::default().render(&sample()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.starts_with("[\n    {\n        \"id\": 1"));

        let compact = JsonWriter::new(WriteOptions {
            pretty: false,
            ..WriteOptions::default()
        });
        let text = String::from_utf8(compact.render(&sample()).unwrap()).unwrap();
        assert!(text.starts_with(r#"[{"id":1,"name":"A","students":[{"id":10"#));
    }

    #[test]
    fn test_xml_writer_layout() {
        let writer = XmlWriter::new(WriteOptions {
            pretty: false,
            ..WriteOptions::default()
        });
        let text = String::from_utf8(writer.render(&sample()).unwrap()).unwrap();

        assert_eq!(
            text,
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                "<rooms>",
                r#"<room id="1" name="A"><students>"#,
                r#"<student id="10" name="X"/><student id="12" name="Z"/>"#,
                "</students></room>",
                r#"<room id="2" name="B &amp; Co"><students/></room>"#,
                "</rooms>\n"
            )
        );
    }

    #[test]
    fn test_xml_writer_student_room_attribute() {
        let writer = XmlWriter::new(WriteOptions {
            pretty: false,
            include_student_room: true,
            ..WriteOptions::default()
        });
        let text = String::from_utf8(writer.render(&sample()).unwrap()).unwrap();
        assert!(text.contains(r#"<student id="10" name="X" room="1"/>"#));
    }

    #[test]
    fn test_registry_selects_writer() {
        let registry = WriterRegistry::default();

        assert_eq!(registry.for_path(Path::new("out.json")).unwrap().format(), "json");
        assert_eq!(registry.for_path(Path::new("out.XML")).unwrap().format(), "xml");
        assert_eq!(registry.formats(), vec!["json", "xml"]);

        let err = registry.for_path(Path::new("out.csv")).err().unwrap();
        assert!(matches!(err, EtlError::UnsupportedFormat { ref extension } if extension == "csv"));

        let err = registry.for_path(Path::new("out")).err().unwrap();
        assert!(matches!(err, EtlError::UnsupportedFormat { ref extension } if extension.is_empty()));
    }

    #[test]
    fn test_write_reports_destination_on_failure() {
        let dir = tempfile::TempDir::new().unwrap();
        let destination = dir.path().join("missing").join("out.json");

        let err = JsonWriter::default()
            .write(&sample(), &destination)
            .unwrap_err();
        assert!(matches!(err, EtlError::Serialization { ref path, .. } if path == &destination));
        assert!(!destination.exists());
    }
}
