//! Web layer for the arrival board.
//!
//! JSON endpoints over [`BoardService`](crate::board::BoardService).

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
