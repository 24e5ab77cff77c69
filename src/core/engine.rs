use crate::adapters::readers::ReaderRegistry;
use crate::adapters::writers::WriterRegistry;
use crate::core::assigner::RoomAssigner;
use crate::domain::model::{Record, Room, Student};
use crate::utils::error::{EtlError, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Pipeline stages, in order. `Failed` can follow any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Init,
    ReadRooms,
    ReadStudents,
    Assign,
    SelectWriter,
    Write,
    Done,
    Failed,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Init => "init",
            Stage::ReadRooms => "read-rooms",
            Stage::ReadStudents => "read-students",
            Stage::Assign => "assign",
            Stage::SelectWriter => "select-writer",
            Stage::Write => "write",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Summary of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub rooms: usize,
    pub students_read: usize,
    pub assigned: usize,
    pub unassigned: usize,
    pub orphans: usize,
    pub format: &'static str,
    pub output_path: PathBuf,
}

/// Orchestrates read -> assign -> write for one pair of input files.
pub struct AssignmentEngine {
    readers: ReaderRegistry,
    writers: WriterRegistry,
    assigner: RoomAssigner,
}

impl AssignmentEngine {
    pub fn new(readers: ReaderRegistry, writers: WriterRegistry, assigner: RoomAssigner) -> Self {
        Self {
            readers,
            writers,
            assigner,
        }
    }

    pub fn run(&self, students_path: &Path, rooms_path: &Path, output_path: &Path) -> Result<RunReport> {
        let mut stage = Stage::Init;
        let result = self.execute(students_path, rooms_path, output_path, &mut stage);

        if let Err(e) = &result {
            tracing::debug!("Stage {} -> {}: {}", stage, Stage::Failed, e);
        }
        result
    }

    fn advance(stage: &mut Stage, next: Stage) {
        tracing::debug!("Stage {} -> {}", stage, next);
        *stage = next;
    }

    fn execute(
        &self,
        students_path: &Path,
        rooms_path: &Path,
        output_path: &Path,
        stage: &mut Stage,
    ) -> Result<RunReport> {
        let started = Instant::now();
        tracing::info!("Starting room assignment");

        // Extract
        Self::advance(stage, Stage::ReadRooms);
        let rooms: Vec<Room> = decode(rooms_path, self.readers.read(rooms_path)?)?;
        tracing::info!("📥 Read {} rooms from {}", rooms.len(), rooms_path.display());

        Self::advance(stage, Stage::ReadStudents);
        let students: Vec<Student> = decode(students_path, self.readers.read(students_path)?)?;
        tracing::info!(
            "📥 Read {} students from {}",
            students.len(),
            students_path.display()
        );

        // Transform
        Self::advance(stage, Stage::Assign);
        let outcome = self.assigner.assign(&rooms, &students)?;
        tracing::info!(
            "🔗 Assigned {} students ({} unassigned, {} with unknown room)",
            outcome.assigned(),
            outcome.unassigned,
            outcome.orphans
        );

        // Load
        Self::advance(stage, Stage::SelectWriter);
        let writer = self.writers.for_path(output_path)?;

        Self::advance(stage, Stage::Write);
        writer.write(&outcome.rooms, output_path)?;
        tracing::info!(
            "💾 Wrote {} to {} in {:?}",
            writer.format(),
            output_path.display(),
            started.elapsed()
        );

        Self::advance(stage, Stage::Done);
        Ok(RunReport {
            rooms: outcome.rooms.len(),
            students_read: students.len(),
            assigned: outcome.assigned(),
            unassigned: outcome.unassigned,
            orphans: outcome.orphans,
            format: writer.format(),
            output_path: output_path.to_path_buf(),
        })
    }
}

impl Default for AssignmentEngine {
    fn default() -> Self {
        Self::new(
            ReaderRegistry::default(),
            WriterRegistry::default(),
            RoomAssigner::default(),
        )
    }
}

/// 將原始記錄轉成型別化資料，欄位不符時回報 ParseError
fn decode<T: DeserializeOwned>(path: &Path, records: Vec<Record>) -> Result<Vec<T>> {
    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value(record.into_value()).map_err(|e| EtlError::Parse {
                path: path.to_path_buf(),
                message: format!("record {}: {}", index, e),
            })
        })
        .collect()
}
