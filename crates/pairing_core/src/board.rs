use thiserror::Error;

use crate::model::{Assignation, Room, RoomId, RoomsInfo};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("room {0} does not exist")]
    RoomNotFound(RoomId),
}

/// Participant registry, room registry and assignment table over one
/// `RoomsInfo` snapshot.
///
/// Room ids come from an explicit monotonic counter so allocation stays
/// decoupled from the length of the room list.
#[derive(Debug, Clone)]
pub struct RoomsBoard {
    info: RoomsInfo,
    next_room_id: RoomId,
}

impl Default for RoomsBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl RoomsBoard {
    pub fn new() -> Self {
        Self::from_snapshot(RoomsInfo::seed())
    }

    pub fn from_snapshot(info: RoomsInfo) -> Self {
        let mut board = Self {
            info,
            next_room_id: 1,
        };
        board.reindex();
        board
    }

    /// Replaces the whole snapshot, e.g. with a remotely fetched one.
    pub fn adopt(&mut self, info: RoomsInfo) {
        self.info = info;
        self.reindex();
    }

    pub fn snapshot(&self) -> &RoomsInfo {
        &self.info
    }

    /// Appends `name` to the registry. Name equality is identity, so an
    /// already-known name is ignored. Returns whether the registry changed.
    pub fn add_participant(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.info.names.iter().any(|existing| *existing == name) {
            return false;
        }
        self.info.names.push(name);
        true
    }

    pub fn create_room(&mut self, name: impl Into<String>) -> RoomId {
        let id = self.next_room_id;
        self.next_room_id += 1;
        self.info.rooms.push(Room {
            id,
            name: name.into(),
            link: None,
        });
        id
    }

    /// Creates a room with the default `Room {id}` display name.
    pub fn create_default_room(&mut self) -> RoomId {
        let name = format!("Room {}", self.next_room_id);
        self.create_room(name)
    }

    pub fn rename_room(&mut self, room_id: RoomId, name: impl Into<String>) -> Result<(), BoardError> {
        let room = self.room_mut(room_id)?;
        room.name = name.into();
        self.info.rooms.sort_by_key(|room| room.id);
        Ok(())
    }

    pub fn set_room_link(&mut self, room_id: RoomId, link: impl Into<String>) -> Result<(), BoardError> {
        let room = self.room_mut(room_id)?;
        room.link = Some(link.into());
        self.info.rooms.sort_by_key(|room| room.id);
        Ok(())
    }

    /// Binds `name` to `room_id`, replacing any previous assignation for the
    /// same name. Both "move into a room" and "move between rooms" land here.
    pub fn assign(&mut self, name: impl Into<String>, room_id: RoomId) {
        let name = name.into();
        self.info
            .assignations
            .retain(|assignation| assignation.name != name);
        self.info.assignations.push(Assignation { name, room_id });
    }

    /// Removes the assignation for `name`. Returns whether one existed.
    pub fn unassign(&mut self, name: &str) -> bool {
        let before = self.info.assignations.len();
        self.info
            .assignations
            .retain(|assignation| assignation.name != name);
        self.info.assignations.len() != before
    }

    fn room_mut(&mut self, room_id: RoomId) -> Result<&mut Room, BoardError> {
        self.info
            .rooms
            .iter_mut()
            .find(|room| room.id == room_id)
            .ok_or(BoardError::RoomNotFound(room_id))
    }

    // Callers depend on ascending id order for rendering and diffing, and a
    // remote snapshot may arrive unsorted.
    fn reindex(&mut self) {
        self.info.rooms.sort_by_key(|room| room.id);
        self.next_room_id = self
            .info
            .rooms
            .last()
            .map(|room| room.id + 1)
            .unwrap_or(1);
    }
}
