//! Domain types for the bus board.
//!
//! Stop configuration is validated at construction time, and per-stop
//! results are closed sum types, so code that receives these types can
//! match on them exhaustively.

mod arrival;
mod board;
mod stop;

pub use arrival::{Arrival, ArrivalSource};
pub use board::{Board, BoardItem, ErrorCode, ErrorDetail, ItemState, Status};
pub use stop::{DirectionId, InvalidDirection, StopConfig};
