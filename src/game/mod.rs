//! Toolkit-free game core: the deal, the click rule, pair resolution and the
//! deferred-resolution plumbing.

pub mod board;
pub mod events;
pub mod schedule;
pub mod session;
pub mod table;

pub use board::{BOARD_COLS, BOARD_ROWS, BoardState, PAIR_COUNT, TILE_COUNT, TileFace, TileValue};
pub use events::GameEvent;
pub use schedule::{ManualScheduler, Scheduler};
pub use session::{ClickOutcome, GamePhase, GameSession, Resolution, ResolveTicket};
pub use table::{Presenter, Table, click_tile, request_reset, resolve_pending};
