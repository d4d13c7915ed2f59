pub mod board;
pub mod model;
pub mod session;

pub use board::{BoardError, RoomsBoard};
pub use model::{Assignation, Room, RoomId, RoomsInfo, SEED_PARTICIPANTS};
pub use session::{DragState, RoomsSession};
