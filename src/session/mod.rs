pub mod controller;
pub mod model;

pub use controller::SessionController;
pub use model::{GazeRecord, Session, UNRESOLVED_ROW_COLUMN};
