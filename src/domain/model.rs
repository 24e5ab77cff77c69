use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Raw record as produced by a reader: field name -> value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub data: HashMap<String, serde_json::Value>,
}

impl Record {
    pub fn into_value(self) -> serde_json::Value {
        serde_json::Value::Object(self.data.into_iter().collect())
    }
}

/// Room / student identifier. Inputs use integers, strings are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Id {
    Int(i64),
    Str(String),
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Id::Int(n) => write!(f, "{n}"),
            Id::Str(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Id {
    fn from(value: i64) -> Self {
        Id::Int(value)
    }
}

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Id::Str(value.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Id,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Id,
    pub name: String,
    /// `None` 表示尚未分配房間
    #[serde(default)]
    pub room: Option<Id>,
}

impl Room {
    pub fn new(id: impl Into<Id>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl Student {
    pub fn new(id: impl Into<Id>, name: impl Into<String>, room: Option<Id>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            room,
        }
    }
}

/// A room together with the students assigned to it, in join order.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedRoom {
    pub room: Room,
    pub students: Vec<Student>,
}

impl EnrichedRoom {
    pub fn id(&self) -> &Id {
        &self.room.id
    }
}

/// Result of a join: the enriched rooms plus what was left out.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AssignmentOutcome {
    pub rooms: Vec<EnrichedRoom>,
    pub unassigned: usize,
    pub orphans: usize,
}

impl AssignmentOutcome {
    pub fn assigned(&self) -> usize {
        self.rooms.iter().map(|r| r.students.len()).sum()
    }
}
