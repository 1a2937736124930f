use super::board::TileValue;

/// Notifications the game core hands to the presentation layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    TileRevealed { position: usize, value: TileValue },
    /// Back to face-down, after a mismatch or a reset.
    TileHidden { position: usize },
    PairResolved {
        first: usize,
        second: usize,
        matched: bool,
    },
    PairsCountChanged(u8),
    MovesCountChanged(u32),
    GameWon { pairs_found: u8, moves: u32 },
}
