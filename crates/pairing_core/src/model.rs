use serde::{Deserialize, Serialize};

/// Room identifiers are small sequential integers allocated by the board.
pub type RoomId = u32;

/// Placeholder participants shown before any remote data has arrived.
pub const SEED_PARTICIPANTS: [&str; 4] = ["Paco", "Alejandro", "Elna", "Laura"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

/// A single participant-to-room binding. A participant has at most one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignation {
    pub name: String,
    pub room_id: RoomId,
}

/// The full synchronized snapshot. This is the unit of persistence: it is
/// fetched, adopted and stored as a whole, never field by field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomsInfo {
    #[serde(default)]
    pub names: Vec<String>,
    #[serde(default)]
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub assignations: Vec<Assignation>,
    // The web client keeps its calendar form fields in the same record.
    // Carried opaquely so a shared record round-trips unchanged.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub until_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation_frequency: Option<String>,
}

impl Default for RoomsInfo {
    fn default() -> Self {
        Self::seed()
    }
}

impl RoomsInfo {
    pub fn seed() -> Self {
        Self {
            names: SEED_PARTICIPANTS.iter().map(|name| name.to_string()).collect(),
            rooms: Vec::new(),
            assignations: Vec::new(),
            description: None,
            until_date: None,
            rotation_frequency: None,
        }
    }

    pub fn room(&self, room_id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|room| room.id == room_id)
    }

    pub fn is_assigned(&self, name: &str) -> bool {
        self.assignations
            .iter()
            .any(|assignation| assignation.name == name)
    }

    /// Participants with no assignation, recomputed from the current state.
    pub fn unassigned_participants(&self) -> impl Iterator<Item = &str> {
        self.names
            .iter()
            .filter(|name| !self.is_assigned(name.as_str()))
            .map(String::as_str)
    }

    /// Participants whose assignation references `room_id`. The room itself
    /// is not required to exist; dangling references are tolerated here.
    pub fn participants_of_room(&self, room_id: RoomId) -> impl Iterator<Item = &str> {
        self.assignations
            .iter()
            .filter(move |assignation| assignation.room_id == room_id)
            .map(|assignation| assignation.name.as_str())
    }
}
