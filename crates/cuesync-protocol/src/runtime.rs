//! Session runtime: the tick driver plus message ingress/egress.
//!
//! One runtime exists per director or guest tab. The director applies its
//! own commands locally and mints the equivalent wire messages for
//! broadcast; guests feed received messages into the same runtime type, so
//! both ends run the identical engine pair.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use cuesync_core::clock::WallClock;
use cuesync_core::element::PlaybackState;
use cuesync_engine::ticker::{TICK_PERIOD, Ticker};

use crate::message::{CommandKind, CommandMessage, StatusMessage};
use crate::session::ShowSession;

/// Owns a [`ShowSession`] and drives its 100 ms tick while playing.
pub struct ShowRuntime {
    session: Rc<RefCell<ShowSession>>,
    ticker: Ticker,
    wall: Arc<dyn WallClock>,
}

impl ShowRuntime {
    /// Creates a runtime with a fresh stopped session.
    #[must_use]
    pub fn new(wall: Arc<dyn WallClock>) -> Self {
        Self {
            session: Rc::new(RefCell::new(ShowSession::new(Arc::clone(&wall)))),
            ticker: Ticker::new(),
            wall,
        }
    }

    /// The shared session handle, for subscriptions and queries.
    #[must_use]
    pub fn session(&self) -> Rc<RefCell<ShowSession>> {
        Rc::clone(&self.session)
    }

    /// Starts or resumes playback and the tick task. A duplicate play while
    /// already playing changes nothing and creates no second timer.
    pub fn play(&mut self) -> bool {
        let transitioned = self.session.borrow_mut().play();
        if transitioned {
            let session = Rc::clone(&self.session);
            self.ticker.start(TICK_PERIOD, move || {
                let mut session = session.borrow_mut();
                session.tick();
                // A tick that auto-completes the show retires the timer.
                session.playback_state() == PlaybackState::Playing
            });
        }
        transitioned
    }

    /// Pauses playback and stops the tick task.
    pub fn pause(&mut self) -> bool {
        let transitioned = self.session.borrow_mut().pause();
        if transitioned {
            self.ticker.stop();
        }
        transitioned
    }

    /// Enters a safety hold and stops the tick task.
    pub fn safety(&mut self) -> bool {
        let transitioned = self.session.borrow_mut().safety();
        if transitioned {
            self.ticker.stop();
        }
        transitioned
    }

    /// Completes the show and stops the tick task.
    pub fn complete(&mut self) -> bool {
        let transitioned = self.session.borrow_mut().complete();
        if transitioned {
            self.ticker.stop();
        }
        transitioned
    }

    /// Fully resets the session and stops the tick task.
    pub fn stop(&mut self) {
        self.session.borrow_mut().stop();
        self.ticker.stop();
    }

    /// Applies a received director command (guest ingress).
    pub fn apply_command(&mut self, message: &CommandMessage) {
        tracing::debug!(kind = ?message.kind, server_timestamp_ms = message.server_timestamp_ms, "applying sync command");
        match message.kind {
            CommandKind::Play => {
                self.play();
            }
            CommandKind::Pause => {
                self.pause();
            }
            CommandKind::Safety => {
                self.safety();
            }
            CommandKind::Complete => {
                self.complete();
            }
            CommandKind::Stop => self.stop(),
        }
    }

    /// Applies a received status heartbeat (drift correction).
    pub fn apply_status(&mut self, message: &StatusMessage) {
        self.session
            .borrow_mut()
            .set_total_pause_time(message.cumulative_delay_ms);
    }

    /// Mints the wire message for a command, stamped with this side's wall
    /// clock (director egress).
    #[must_use]
    pub fn command_message(&self, kind: CommandKind) -> CommandMessage {
        CommandMessage {
            kind,
            server_timestamp_ms: self.wall.now().timestamp_millis(),
        }
    }

    /// Mints a status heartbeat carrying the authoritative pause total
    /// (director egress).
    ///
    /// # Panics
    ///
    /// Panics if the pause total exceeds `i64::MAX` milliseconds, which no
    /// real show reaches.
    #[must_use]
    pub fn heartbeat(&self) -> StatusMessage {
        StatusMessage {
            cumulative_delay_ms: i64::try_from(self.session.borrow().total_pause_ms())
                .expect("pause total fits in i64"),
        }
    }

    /// True while the tick task is live.
    #[must_use]
    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    /// Stops the tick task and clears every listener registry. Idempotent.
    pub fn destroy(&mut self) {
        self.ticker.stop();
        self.session.borrow_mut().destroy();
    }
}

impl Drop for ShowRuntime {
    fn drop(&mut self) {
        self.ticker.stop();
    }
}

impl std::fmt::Debug for ShowRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShowRuntime")
            .field("session", &self.session.borrow())
            .field("ticking", &self.ticker.is_running())
            .finish_non_exhaustive()
    }
}
