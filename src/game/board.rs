use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::BoardError;

pub const BOARD_ROWS: usize = 4;
pub const BOARD_COLS: usize = 6;
pub const PAIR_COUNT: usize = 12;
pub const TILE_COUNT: usize = BOARD_ROWS * BOARD_COLS;

/// Opaque face identifier. Each value in `0..PAIR_COUNT` sits on exactly two tiles.
pub type TileValue = u8;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileFace {
    FaceDown,
    Revealed,
    Matched,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BoardState {
    sequence: [TileValue; TILE_COUNT],
    // Click order, never more than two entries.
    revealed: Vec<usize>,
    matched: [bool; TILE_COUNT],
    moves: u32,
    pairs_found: u8,
    generation: u64,
}

impl BoardState {
    /// Deals a fresh board: every pair value twice, Fisher-Yates shuffled.
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R, generation: u64) -> Self {
        let mut values: Vec<TileValue> = (0..PAIR_COUNT as TileValue)
            .flat_map(|value| [value, value])
            .collect();
        values.shuffle(rng);

        let mut sequence = [0; TILE_COUNT];
        sequence.copy_from_slice(&values);
        Self::with_sequence(sequence, generation)
    }

    pub fn from_sequence(values: &[TileValue], generation: u64) -> Result<Self, BoardError> {
        if values.len() != TILE_COUNT {
            return Err(BoardError::WrongLength {
                found: values.len(),
            });
        }

        let mut counts = [0usize; PAIR_COUNT];
        for &value in values {
            let slot = counts
                .get_mut(value as usize)
                .ok_or(BoardError::ValueOutOfRange { value })?;
            *slot += 1;
        }
        if let Some((value, &count)) = counts.iter().enumerate().find(|(_, count)| **count != 2) {
            return Err(BoardError::UnpairedValue {
                value: value as TileValue,
                count,
            });
        }

        let mut sequence = [0; TILE_COUNT];
        sequence.copy_from_slice(values);
        Ok(Self::with_sequence(sequence, generation))
    }

    fn with_sequence(sequence: [TileValue; TILE_COUNT], generation: u64) -> Self {
        BoardState {
            sequence,
            revealed: Vec::with_capacity(2),
            matched: [false; TILE_COUNT],
            moves: 0,
            pairs_found: 0,
            generation,
        }
    }

    /// Replaces this board wholesale with a new deal one generation later.
    pub fn redeal<R: Rng + ?Sized>(&self, rng: &mut R) -> Self {
        Self::shuffled(rng, self.generation.wrapping_add(1))
    }

    pub fn sequence(&self) -> &[TileValue; TILE_COUNT] {
        &self.sequence
    }

    pub fn value_at(&self, position: usize) -> Option<TileValue> {
        self.sequence.get(position).copied()
    }

    pub fn is_revealed(&self, position: usize) -> bool {
        self.revealed.contains(&position)
    }

    pub fn is_matched(&self, position: usize) -> bool {
        self.matched.get(position).copied().unwrap_or(false)
    }

    pub fn face(&self, position: usize) -> TileFace {
        if self.is_matched(position) {
            TileFace::Matched
        } else if self.is_revealed(position) {
            TileFace::Revealed
        } else {
            TileFace::FaceDown
        }
    }

    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    pub fn matched_count(&self) -> usize {
        self.matched.iter().filter(|matched| **matched).count()
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn pairs_found(&self) -> u8 {
        self.pairs_found
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_complete(&self) -> bool {
        self.pairs_found as usize == PAIR_COUNT
    }

    pub(crate) fn reveal(&mut self, position: usize) {
        debug_assert!(self.revealed.len() < 2);
        self.revealed.push(position);
    }

    pub(crate) fn record_move(&mut self) {
        self.moves = self.moves.saturating_add(1);
    }

    pub(crate) fn mark_matched(&mut self, first: usize, second: usize) {
        self.matched[first] = true;
        self.matched[second] = true;
        self.pairs_found += 1;
    }

    pub(crate) fn clear_revealed(&mut self) {
        self.revealed.clear();
    }
}

pub fn row_col(position: usize) -> (usize, usize) {
    (position / BOARD_COLS, position % BOARD_COLS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn value_counts(board: &BoardState) -> [usize; PAIR_COUNT] {
        let mut counts = [0; PAIR_COUNT];
        for &value in board.sequence() {
            counts[value as usize] += 1;
        }
        counts
    }

    #[test]
    fn shuffled_board_holds_every_value_twice() {
        let mut rng = StdRng::seed_from_u64(7);
        for generation in 0..200 {
            let board = BoardState::shuffled(&mut rng, generation);
            assert_eq!(board.sequence().len(), TILE_COUNT);
            assert_eq!(value_counts(&board), [2; PAIR_COUNT]);
            assert!(board.revealed().is_empty());
            assert_eq!(board.matched_count(), 0);
            assert_eq!(board.moves(), 0);
            assert_eq!(board.pairs_found(), 0);
        }
    }

    #[test]
    fn shuffle_reaches_every_position_for_a_value() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = [false; TILE_COUNT];
        for _ in 0..500 {
            let board = BoardState::shuffled(&mut rng, 0);
            for (position, &value) in board.sequence().iter().enumerate() {
                if value == 0 {
                    seen[position] = true;
                }
            }
        }
        assert!(seen.iter().all(|hit| *hit));
    }

    #[test]
    fn redeal_bumps_generation_and_clears_progress() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut board = BoardState::shuffled(&mut rng, 4);
        board.reveal(0);
        board.record_move();
        let next = board.redeal(&mut rng);
        assert_eq!(next.generation(), 5);
        assert!(next.revealed().is_empty());
        assert_eq!(next.moves(), 0);
    }

    #[test]
    fn from_sequence_rejects_bad_decks() {
        assert_eq!(
            BoardState::from_sequence(&[0, 0], 0).unwrap_err(),
            BoardError::WrongLength { found: 2 }
        );

        let mut values: Vec<TileValue> = (0..12).chain(0..12).collect();
        values[23] = 12;
        assert_eq!(
            BoardState::from_sequence(&values, 0).unwrap_err(),
            BoardError::ValueOutOfRange { value: 12 }
        );

        values[23] = 0;
        assert_eq!(
            BoardState::from_sequence(&values, 0).unwrap_err(),
            BoardError::UnpairedValue { value: 0, count: 3 }
        );
    }

    #[test]
    fn faces_follow_reveal_and_match() {
        let values: Vec<TileValue> = (0..12).chain(0..12).collect();
        let mut board = BoardState::from_sequence(&values, 0).unwrap();
        assert_eq!(board.face(0), TileFace::FaceDown);
        board.reveal(0);
        assert_eq!(board.face(0), TileFace::Revealed);
        board.reveal(12);
        board.mark_matched(0, 12);
        board.clear_revealed();
        assert_eq!(board.face(0), TileFace::Matched);
        assert_eq!(board.face(12), TileFace::Matched);
        assert_eq!(board.pairs_found() as usize, board.matched_count() / 2);
        assert!(!board.is_matched(TILE_COUNT));
    }

    #[test]
    fn row_col_walks_rows_of_six() {
        assert_eq!(row_col(0), (0, 0));
        assert_eq!(row_col(5), (0, 5));
        assert_eq!(row_col(6), (1, 0));
        assert_eq!(row_col(23), (3, 5));
    }
}
