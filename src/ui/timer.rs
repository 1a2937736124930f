use std::time::Duration;

use gtk4::glib;

use crate::game::schedule::{Scheduler, Task};

/// Deferred tasks on the GTK main loop.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlibScheduler;

impl Scheduler for GlibScheduler {
    type Handle = glib::SourceId;

    fn schedule_once(&self, delay: Duration, task: Task) -> glib::SourceId {
        glib::timeout_add_local_once(delay, task)
    }

    fn cancel(&self, handle: glib::SourceId) {
        handle.remove();
    }
}
