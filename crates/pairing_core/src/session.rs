use crate::board::{BoardError, RoomsBoard};
use crate::model::{RoomId, RoomsInfo};

/// Single-slot drag tracker. Starting a new drag while one is in flight
/// overwrites the tracked participant; the last start wins.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging(String),
}

/// A board plus the ephemeral drag state, exposing the operations the
/// presentation layer calls into.
#[derive(Debug, Clone, Default)]
pub struct RoomsSession {
    board: RoomsBoard,
    drag: DragState,
}

impl RoomsSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(info: RoomsInfo) -> Self {
        Self {
            board: RoomsBoard::from_snapshot(info),
            drag: DragState::Idle,
        }
    }

    /// Replaces the snapshot wholesale and resets the drag slot.
    pub fn adopt(&mut self, info: RoomsInfo) {
        self.board.adopt(info);
        self.drag = DragState::Idle;
    }

    pub fn snapshot(&self) -> &RoomsInfo {
        self.board.snapshot()
    }

    pub fn drag_state(&self) -> &DragState {
        &self.drag
    }

    pub fn start_drag(&mut self, name: impl Into<String>) {
        self.drag = DragState::Dragging(name.into());
    }

    /// Drop outside any recognized target: back to idle, no mutation.
    pub fn cancel_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    /// Returns whether the snapshot changed.
    pub fn drop_on_room(&mut self, room_id: RoomId) -> bool {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => false,
            DragState::Dragging(name) => {
                self.board.assign(name, room_id);
                true
            }
        }
    }

    /// Returns whether the snapshot changed.
    pub fn drop_on_unassigned(&mut self) -> bool {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => false,
            DragState::Dragging(name) => self.board.unassign(&name),
        }
    }

    /// Creates a room and assigns the dragged participant to it as one unit,
    /// so the new assignation can never reference a room that was not
    /// created. Returns the new room id when a drag was in flight.
    pub fn drop_on_new_room(&mut self) -> Option<RoomId> {
        match std::mem::take(&mut self.drag) {
            DragState::Idle => None,
            DragState::Dragging(name) => {
                let room_id = self.board.create_default_room();
                self.board.assign(name, room_id);
                Some(room_id)
            }
        }
    }

    pub fn add_participant(&mut self, name: impl Into<String>) -> bool {
        self.board.add_participant(name)
    }

    pub fn create_room(&mut self, name: impl Into<String>) -> RoomId {
        self.board.create_room(name)
    }

    pub fn rename_room(&mut self, room_id: RoomId, name: impl Into<String>) -> Result<(), BoardError> {
        self.board.rename_room(room_id, name)
    }

    pub fn set_room_link(&mut self, room_id: RoomId, link: impl Into<String>) -> Result<(), BoardError> {
        self.board.set_room_link(room_id, link)
    }

    pub fn assign(&mut self, name: impl Into<String>, room_id: RoomId) {
        self.board.assign(name, room_id)
    }

    pub fn unassign(&mut self, name: &str) -> bool {
        self.board.unassign(name)
    }
}
