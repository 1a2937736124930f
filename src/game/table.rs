use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tracing::trace;

use super::events::GameEvent;
use super::schedule::Scheduler;
use super::session::{GameSession, Resolution, ResolveTicket};

/// Whatever draws the game. It only ever hears about state through events.
pub trait Presenter {
    fn present(&mut self, event: &GameEvent);
}

/// The application context: one session, the surface it is shown on, and
/// the timer source that paces resolutions.
pub struct Table<P, S: Scheduler> {
    session: GameSession,
    presenter: P,
    scheduler: S,
    reveal_delay: Duration,
    pending: Option<S::Handle>,
}

impl<P: Presenter, S: Scheduler> Table<P, S> {
    pub fn new(session: GameSession, presenter: P, scheduler: S, reveal_delay: Duration) -> Self {
        Table {
            session,
            presenter,
            scheduler,
            reveal_delay,
            pending: None,
        }
    }

    pub fn into_shared(self) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(self))
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    pub fn reveal_delay(&self) -> Duration {
        self.reveal_delay
    }

    pub fn has_pending_resolution(&self) -> bool {
        self.pending.is_some()
    }

    fn forward(&mut self, events: &[GameEvent]) {
        for event in events {
            self.presenter.present(event);
        }
    }
}

pub fn click_tile<P, S>(table: &Rc<RefCell<Table<P, S>>>, position: usize)
where
    P: Presenter + 'static,
    S: Scheduler + 'static,
{
    let mut tb = table.borrow_mut();
    let outcome = tb.session.on_tile_clicked(position);
    if outcome.is_ignored() {
        return;
    }
    tb.forward(&outcome.events);

    let Some(ticket) = outcome.ticket else {
        return;
    };
    let weak_table = Rc::downgrade(table);
    let delay = tb.reveal_delay;
    let handle = tb.scheduler.schedule_once(
        delay,
        Box::new(move || {
            if let Some(table) = weak_table.upgrade() {
                resolve_pending(&table, ticket);
            }
        }),
    );
    tb.pending = Some(handle);
}

pub fn resolve_pending<P, S>(table: &Rc<RefCell<Table<P, S>>>, ticket: ResolveTicket)
where
    P: Presenter,
    S: Scheduler,
{
    let mut tb = table.borrow_mut();
    let outcome = tb.session.resolve(ticket);
    if outcome.resolution == Resolution::Stale {
        trace!(generation = ticket.generation(), "resolution dropped");
        return;
    }
    // The handle belongs to the task that is running now, so it is dropped
    // rather than cancelled.
    tb.pending = None;
    tb.forward(&outcome.events);
}

pub fn request_reset<P, S>(table: &Rc<RefCell<Table<P, S>>>)
where
    P: Presenter,
    S: Scheduler,
{
    let mut tb = table.borrow_mut();
    if let Some(handle) = tb.pending.take() {
        tb.scheduler.cancel(handle);
    }
    let events = tb.session.new_game();
    tb.forward(&events);
}
