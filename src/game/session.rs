use rand::Rng;
use tracing::{debug, trace};

use super::board::{BoardState, TILE_COUNT, TileFace};
use super::events::GameEvent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Idle,
    InProgress,
    Won,
}

/// Cancellation token for a deferred resolution. It only resolves the board
/// generation that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ResolveTicket {
    generation: u64,
}

impl ResolveTicket {
    pub fn generation(self) -> u64 {
        self.generation
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClickOutcome {
    pub events: Vec<GameEvent>,
    pub ticket: Option<ResolveTicket>,
}

impl ClickOutcome {
    pub fn is_ignored(&self) -> bool {
        self.events.is_empty()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Matched { first: usize, second: usize },
    Mismatched { first: usize, second: usize },
    Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub resolution: Resolution,
    pub events: Vec<GameEvent>,
}

impl ResolveOutcome {
    fn stale() -> Self {
        ResolveOutcome {
            resolution: Resolution::Stale,
            events: Vec::new(),
        }
    }
}

/// One player's game: the board plus the turn bookkeeping around it.
#[derive(Clone, Debug)]
pub struct GameSession {
    board: BoardState,
    phase: GamePhase,
    pending: Option<ResolveTicket>,
}

impl GameSession {
    pub fn new() -> Self {
        Self::with_board(BoardState::shuffled(&mut rand::rng(), 1))
    }

    pub fn with_board(board: BoardState) -> Self {
        GameSession {
            board,
            phase: GamePhase::Idle,
            pending: None,
        }
    }

    pub fn board(&self) -> &BoardState {
        &self.board
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn pending(&self) -> Option<ResolveTicket> {
        self.pending
    }

    pub fn on_tile_clicked(&mut self, position: usize) -> ClickOutcome {
        if self.phase == GamePhase::Won || position >= TILE_COUNT {
            return ClickOutcome::default();
        }
        if self.board.face(position) != TileFace::FaceDown {
            trace!(position, "click on face-up tile ignored");
            return ClickOutcome::default();
        }
        if self.board.revealed().len() >= 2 {
            trace!(position, "click while a pair is pending ignored");
            return ClickOutcome::default();
        }

        let Some(value) = self.board.value_at(position) else {
            return ClickOutcome::default();
        };
        self.board.reveal(position);
        if self.phase == GamePhase::Idle {
            self.phase = GamePhase::InProgress;
        }

        let mut outcome = ClickOutcome {
            events: vec![GameEvent::TileRevealed { position, value }],
            ticket: None,
        };

        if self.board.revealed().len() == 2 {
            self.board.record_move();
            outcome
                .events
                .push(GameEvent::MovesCountChanged(self.board.moves()));
            let ticket = ResolveTicket {
                generation: self.board.generation(),
            };
            self.pending = Some(ticket);
            outcome.ticket = Some(ticket);
        }

        outcome
    }

    /// Judges the two revealed tiles. Each ticket resolves at most once, and
    /// tickets from an earlier deal do nothing.
    pub fn resolve(&mut self, ticket: ResolveTicket) -> ResolveOutcome {
        if self.pending != Some(ticket) || ticket.generation != self.board.generation() {
            debug!(
                ticket_generation = ticket.generation,
                board_generation = self.board.generation(),
                "stale resolution ignored"
            );
            return ResolveOutcome::stale();
        }
        self.pending = None;

        let &[first, second] = self.board.revealed() else {
            self.board.clear_revealed();
            return ResolveOutcome::stale();
        };
        let matched = self.board.value_at(first) == self.board.value_at(second);

        let mut events = vec![GameEvent::PairResolved {
            first,
            second,
            matched,
        }];

        let resolution = if matched {
            self.board.mark_matched(first, second);
            events.push(GameEvent::PairsCountChanged(self.board.pairs_found()));
            debug!(first, second, pairs = self.board.pairs_found(), "pair matched");

            if self.board.is_complete() && self.phase != GamePhase::Won {
                self.phase = GamePhase::Won;
                debug!(moves = self.board.moves(), "board cleared");
                events.push(GameEvent::GameWon {
                    pairs_found: self.board.pairs_found(),
                    moves: self.board.moves(),
                });
            }
            Resolution::Matched { first, second }
        } else {
            debug!(first, second, "pair mismatched");
            events.push(GameEvent::TileHidden { position: first });
            events.push(GameEvent::TileHidden { position: second });
            Resolution::Mismatched { first, second }
        };

        self.board.clear_revealed();
        ResolveOutcome { resolution, events }
    }

    pub fn new_game(&mut self) -> Vec<GameEvent> {
        self.new_game_with(&mut rand::rng())
    }

    pub fn new_game_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Vec<GameEvent> {
        let mut events: Vec<GameEvent> = (0..TILE_COUNT)
            .filter(|&position| self.board.face(position) != TileFace::FaceDown)
            .map(|position| GameEvent::TileHidden { position })
            .collect();

        self.board = self.board.redeal(rng);
        self.phase = GamePhase::Idle;
        self.pending = None;
        debug!(generation = self.board.generation(), "new game dealt");

        events.push(GameEvent::PairsCountChanged(0));
        events.push(GameEvent::MovesCountChanged(0));
        events
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::board::{PAIR_COUNT, TileValue};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn ordered_session() -> GameSession {
        let values: Vec<TileValue> = (0..12).chain(0..12).collect();
        GameSession::with_board(BoardState::from_sequence(&values, 1).unwrap())
    }

    fn play_pair(session: &mut GameSession, first: usize, second: usize) -> ResolveOutcome {
        session.on_tile_clicked(first);
        let ticket = session
            .on_tile_clicked(second)
            .ticket
            .expect("second reveal issues a ticket");
        session.resolve(ticket)
    }

    #[test]
    fn first_click_reveals_without_a_move() {
        let mut session = ordered_session();
        let outcome = session.on_tile_clicked(3);
        assert_eq!(
            outcome.events,
            vec![GameEvent::TileRevealed {
                position: 3,
                value: 3
            }]
        );
        assert!(outcome.ticket.is_none());
        assert_eq!(session.board().moves(), 0);
        assert_eq!(session.phase(), GamePhase::InProgress);
    }

    #[test]
    fn repeat_and_out_of_range_clicks_are_ignored() {
        let mut session = ordered_session();
        session.on_tile_clicked(0);
        assert!(session.on_tile_clicked(0).is_ignored());
        assert!(session.on_tile_clicked(TILE_COUNT).is_ignored());
        assert_eq!(session.board().revealed(), &[0]);

        play_pair(&mut session, 0, 12);
        let before = session.board().clone();
        assert!(session.on_tile_clicked(12).is_ignored());
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn third_click_waits_for_resolution() {
        let mut session = ordered_session();
        session.on_tile_clicked(1);
        let ticket = session.on_tile_clicked(2).ticket.unwrap();
        assert!(session.on_tile_clicked(3).is_ignored());
        assert_eq!(session.board().revealed(), &[1, 2]);

        session.resolve(ticket);
        assert!(!session.on_tile_clicked(3).is_ignored());
    }

    #[test]
    fn scenario_match_then_mismatch() {
        let mut session = ordered_session();

        let outcome = play_pair(&mut session, 0, 12);
        assert_eq!(
            outcome.resolution,
            Resolution::Matched {
                first: 0,
                second: 12
            }
        );
        assert_eq!(session.board().pairs_found(), 1);
        assert_eq!(session.board().moves(), 1);
        assert!(session.board().is_matched(0) && session.board().is_matched(12));

        let outcome = play_pair(&mut session, 1, 2);
        assert_eq!(
            outcome.events,
            vec![
                GameEvent::PairResolved {
                    first: 1,
                    second: 2,
                    matched: false
                },
                GameEvent::TileHidden { position: 1 },
                GameEvent::TileHidden { position: 2 },
            ]
        );
        assert_eq!(session.board().pairs_found(), 1);
        assert_eq!(session.board().moves(), 2);
        assert_eq!(session.board().face(1), TileFace::FaceDown);
        assert_eq!(session.board().face(2), TileFace::FaceDown);
        assert!(session.board().revealed().is_empty());
    }

    #[test]
    fn ticket_resolves_only_once() {
        let mut session = ordered_session();
        session.on_tile_clicked(0);
        let ticket = session.on_tile_clicked(12).ticket.unwrap();
        assert_ne!(session.resolve(ticket).resolution, Resolution::Stale);
        assert_eq!(session.resolve(ticket).resolution, Resolution::Stale);
        assert_eq!(session.board().pairs_found(), 1);
    }

    #[test]
    fn win_is_signalled_exactly_once() {
        let mut session = ordered_session();
        let mut wins = 0;
        for value in 0..PAIR_COUNT {
            let outcome = play_pair(&mut session, value, value + PAIR_COUNT);
            wins += outcome
                .events
                .iter()
                .filter(|event| matches!(event, GameEvent::GameWon { .. }))
                .count();
        }
        assert_eq!(wins, 1);
        assert_eq!(session.phase(), GamePhase::Won);
        assert!(
            session
                .on_tile_clicked(0)
                .events
                .iter()
                .all(|event| !matches!(event, GameEvent::GameWon { .. }))
        );
    }

    #[test]
    fn won_event_carries_final_counts() {
        let mut session = ordered_session();
        play_pair(&mut session, 0, 1);
        let mut last = None;
        for value in 0..PAIR_COUNT {
            last = Some(play_pair(&mut session, value, value + PAIR_COUNT));
        }
        assert_eq!(
            last.unwrap().events.last(),
            Some(&GameEvent::GameWon {
                pairs_found: 12,
                moves: 13
            })
        );
    }

    #[test]
    fn reset_invalidates_pending_ticket() {
        let mut session = ordered_session();
        session.on_tile_clicked(0);
        let ticket = session.on_tile_clicked(12).ticket.unwrap();

        let events = session.new_game_with(&mut StdRng::seed_from_u64(9));
        assert_eq!(
            &events[..2],
            &[
                GameEvent::TileHidden { position: 0 },
                GameEvent::TileHidden { position: 12 },
            ]
        );
        let fresh = session.board().clone();

        assert_eq!(session.resolve(ticket).resolution, Resolution::Stale);
        assert_eq!(session.board(), &fresh);
        assert_eq!(session.phase(), GamePhase::Idle);
        assert_eq!(fresh.generation(), 2);
    }
}
