use crate::domain::model::{AssignmentOutcome, EnrichedRoom, Id, Room, Student};
use crate::utils::error::{EtlError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// What to do with a student whose `room` names a room that does not exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OrphanPolicy {
    /// Skip silently.
    #[default]
    Drop,
    /// Skip and log a warning.
    Warn,
    /// Abort the run.
    Strict,
}

/// Joins students onto rooms by room id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RoomAssigner {
    policy: OrphanPolicy,
}

impl RoomAssigner {
    pub fn new(policy: OrphanPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> OrphanPolicy {
        self.policy
    }

    /// Build one [`EnrichedRoom`] per room, in room order, each holding its
    /// students in the order they appear in `students`.
    ///
    /// Students with no room are counted as unassigned. Students pointing at an
    /// unknown room are handled according to the [`OrphanPolicy`].
    pub fn assign(&self, rooms: &[Room], students: &[Student]) -> Result<AssignmentOutcome> {
        let mut slots: HashMap<&Id, Vec<Student>> = HashMap::with_capacity(rooms.len());
        for room in rooms {
            if slots.insert(&room.id, Vec::new()).is_some() {
                return Err(EtlError::DuplicateRoom {
                    id: room.id.to_string(),
                });
            }
        }

        let mut unassigned = 0;
        let mut orphans = 0;

        for student in students {
            let Some(room_id) = student.room.as_ref() else {
                unassigned += 1;
                continue;
            };

            match slots.get_mut(room_id) {
                Some(slot) => slot.push(student.clone()),
                None => {
                    orphans += 1;
                    match self.policy {
                        OrphanPolicy::Drop => {
                            tracing::debug!("Dropping student {} (unknown room {})", student.id, room_id)
                        }
                        OrphanPolicy::Warn => {
                            tracing::warn!("⚠️ Student {} references unknown room {}", student.id, room_id)
                        }
                        OrphanPolicy::Strict => {
                            return Err(EtlError::OrphanStudent {
                                student: student.id.to_string(),
                                room: room_id.to_string(),
                            })
                        }
                    }
                }
            }
        }

        let rooms = rooms
            .iter()
            .map(|room| EnrichedRoom {
                students: slots.remove(&room.id).unwrap_or_default(),
                room: room.clone(),
            })
            .collect();

        Ok(AssignmentOutcome {
            rooms,
            unassigned,
            orphans,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(room: &EnrichedRoom) -> Vec<Id> {
        room.students.iter().map(|s| s.id.clone()).collect()
    }

    fn rooms() -> Vec<Room> {
        vec![Room::new(1, "A"), Room::new(2, "B")]
    }

    #[test]
    fn test_assign_keeps_room_and_student_order() {
        let students = vec![
            Student::new(10, "X", Some(Id::Int(1))),
            Student::new(11, "Y", Some(Id::Int(2))),
            Student::new(12, "Z", Some(Id::Int(1))),
        ];

        let outcome = RoomAssigner::default().assign(&rooms(), &students).unwrap();

        assert_eq!(outcome.rooms.len(), 2);
        assert_eq!(outcome.rooms[0].room, Room::new(1, "A"));
        assert_eq!(ids(&outcome.rooms[0]), vec![Id::Int(10), Id::Int(12)]);
        assert_eq!(ids(&outcome.rooms[1]), vec![Id::Int(11)]);
        assert_eq!(outcome.assigned(), 3);
        assert_eq!(outcome.unassigned, 0);
        assert_eq!(outcome.orphans, 0);
    }

    #[test]
    fn test_rooms_without_students_are_kept() {
        let outcome = RoomAssigner::default().assign(&rooms(), &[]).unwrap();

        assert_eq!(outcome.rooms.len(), 2);
        assert!(outcome.rooms.iter().all(|r| r.students.is_empty()));
    }

    #[test]
    fn test_orphans_and_unassigned_are_dropped() {
        let students = vec![
            Student::new(10, "X", Some(Id::Int(99))),
            Student::new(11, "Y", None),
            Student::new(12, "Z", Some(Id::Int(2))),
        ];

        for policy in [OrphanPolicy::Drop, OrphanPolicy::Warn] {
            let outcome = RoomAssigner::new(policy).assign(&rooms(), &students).unwrap();
            assert_eq!(outcome.assigned(), 1);
            assert_eq!(outcome.orphans, 1);
            assert_eq!(outcome.unassigned, 1);
            assert!(ids(&outcome.rooms[0]).is_empty());
            assert_eq!(ids(&outcome.rooms[1]), vec![Id::Int(12)]);
        }
    }

    #[test]
    fn test_strict_policy_rejects_orphans_only() {
        let assigner = RoomAssigner::new(OrphanPolicy::Strict);

        let unassigned = vec![Student::new(11, "Y", None)];
        assert!(assigner.assign(&rooms(), &unassigned).is_ok());

        let orphan = vec![Student::new(10, "X", Some(Id::Int(3)))];
        let err = assigner.assign(&rooms(), &orphan).unwrap_err();
        assert!(matches!(
            err,
            EtlError::OrphanStudent { ref student, ref room } if student == "10" && room == "3"
        ));
    }

    #[test]
    fn test_duplicate_room_ids_rejected() {
        let rooms = vec![Room::new(1, "A"), Room::new(1, "A again")];
        let err = RoomAssigner::default().assign(&rooms, &[]).unwrap_err();
        assert!(matches!(err, EtlError::DuplicateRoom { ref id } if id == "1"));
    }

    #[test]
    fn test_ids_of_different_kinds_do_not_match() {
        let rooms = vec![Room::new("1", "Text id")];
        let students = vec![Student::new(10, "X", Some(Id::Int(1)))];

        let outcome = RoomAssigner::default().assign(&rooms, &students).unwrap();
        assert_eq!(outcome.assigned(), 0);
        assert_eq!(outcome.orphans, 1);
    }
}
