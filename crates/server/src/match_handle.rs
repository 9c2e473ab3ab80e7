use crate::errors::SubmitError;
use crate::events::EventBuffer;
use crate::types::{EventCursor, MatchStatus, ServerEvent, SessionToken};
use bastion_core::{ActionEnvelope, ActionId, Game, PlayerId, Tick};
use bastion_host::MatchHost;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// What a session is allowed to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Seat {
    Player(PlayerId),
    Spectator,
}

/// Internal state of a match. All mutation happens under the handle's lock,
/// so the simulation sees a single logical thread of execution.
pub struct MatchInner<G: Game> {
    pub host: MatchHost<G>,
    pub events: EventBuffer<G::Event>,
    pub sessions: HashMap<SessionToken, Seat>,
    pub next_session_id: u64,
    pub next_action_id: ActionId,
    pub status: MatchStatus,
}

impl<G: Game> MatchInner<G> {
    pub fn new(host: MatchHost<G>, event_buffer_capacity: usize) -> Self {
        Self {
            host,
            events: EventBuffer::new(event_buffer_capacity),
            sessions: HashMap::new(),
            next_session_id: 1,
            next_action_id: 1,
            status: MatchStatus::WaitingForPlayer,
        }
    }

    fn new_session(&mut self, seat: Seat) -> SessionToken {
        let token = SessionToken(self.next_session_id);
        self.next_session_id += 1;
        self.sessions.insert(token, seat);
        token
    }
}

/// Thread-safe handle to a match.
pub struct MatchHandle<G: Game> {
    pub inner: Arc<Mutex<MatchInner<G>>>,
    shutdown: Arc<AtomicBool>,
    tick_hz: u32,
}

impl<G: Game> Clone for MatchHandle<G> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            shutdown: Arc::clone(&self.shutdown),
            tick_hz: self.tick_hz,
        }
    }
}

impl<G: Game> MatchHandle<G> {
    pub fn new(host: MatchHost<G>, event_buffer_capacity: usize) -> Self {
        let tick_hz = host.tick_hz();
        Self {
            inner: Arc::new(Mutex::new(MatchInner::new(host, event_buffer_capacity))),
            shutdown: Arc::new(AtomicBool::new(false)),
            tick_hz,
        }
    }

    pub fn tick_hz(&self) -> u32 {
        self.tick_hz
    }

    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Relaxed)
    }

    pub fn request_shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Take the player seat. `None` if it is already taken or the match is
    /// past the waiting state. Taking the seat starts the simulation.
    pub async fn join_player(&self) -> Option<(SessionToken, PlayerId)> {
        let mut inner = self.inner.lock().await;

        if inner.status != MatchStatus::WaitingForPlayer {
            return None;
        }

        let player_id = inner.host.join_player();
        let token = inner.new_session(Seat::Player(player_id));
        inner.status = MatchStatus::Running;

        Some((token, player_id))
    }

    /// Open a read-only session. Allowed in any state.
    pub async fn spectate(&self) -> SessionToken {
        let mut inner = self.inner.lock().await;
        inner.new_session(Seat::Spectator)
    }

    /// Drop a session. Returns whether it existed.
    pub async fn leave(&self, session: SessionToken) -> bool {
        let mut inner = self.inner.lock().await;
        inner.sessions.remove(&session).is_some()
    }

    /// Submit an action for the player seat.
    /// Returns the action id and the tick the action will execute on.
    pub async fn submit_action(
        &self,
        session: SessionToken,
        action: G::Action,
        intended_tick: Tick,
    ) -> Result<(ActionId, Tick), SubmitError> {
        let mut inner = self.inner.lock().await;

        let player_id = match inner.sessions.get(&session) {
            Some(Seat::Player(id)) => *id,
            Some(Seat::Spectator) => return Err(SubmitError::Spectator),
            None => return Err(SubmitError::InvalidSession),
        };

        if matches!(
            inner.status,
            MatchStatus::Finished(_) | MatchStatus::Terminated
        ) {
            return Err(SubmitError::Terminated);
        }

        let action_id = inner.next_action_id;
        inner.next_action_id += 1;

        let envelope = ActionEnvelope {
            player_id,
            action_id,
            intended_tick,
            payload: action,
        };

        let scheduled_tick = inner.host.submit(envelope);

        Ok((action_id, scheduled_tick))
    }

    /// Current observation for a session. Spectators observe as player 0.
    pub async fn observe(&self, session: SessionToken) -> Option<G::Observation> {
        let inner = self.inner.lock().await;

        let player_id = match inner.sessions.get(&session)? {
            Seat::Player(id) => *id,
            Seat::Spectator => 0,
        };
        let tick = inner.host.current_tick();
        Some(inner.host.game().observe(tick, player_id))
    }

    /// Poll events from the given cursor.
    pub async fn poll_events(
        &self,
        session: SessionToken,
        cursor: EventCursor,
    ) -> Option<(Vec<ServerEvent<G::Event>>, EventCursor)> {
        let inner = self.inner.lock().await;

        if !inner.sessions.contains_key(&session) {
            return None;
        }

        Some(inner.events.get_from_cursor(cursor))
    }

    pub async fn current_tick(&self) -> Tick {
        let inner = self.inner.lock().await;
        inner.host.current_tick()
    }

    pub async fn status(&self) -> MatchStatus {
        let inner = self.inner.lock().await;
        inner.status
    }

    /// Step one tick and update status.
    /// Returns true once the match is finished or terminated.
    pub async fn step_one_tick(&self) -> bool {
        let mut inner = self.inner.lock().await;

        if inner.status != MatchStatus::Running {
            return matches!(
                inner.status,
                MatchStatus::Finished(_) | MatchStatus::Terminated
            );
        }

        if let Some(events) = inner.host.step_one_tick() {
            let tick = inner.host.current_tick();
            for event in events {
                inner.events.push(tick, event);
            }
        }

        if let Some(outcome) = inner.host.is_terminal() {
            inner.status = MatchStatus::Finished(outcome);
            return true;
        }

        false
    }

    /// Terminate the match and stop its tick loop.
    pub async fn terminate(&self) {
        let mut inner = self.inner.lock().await;
        inner.status = MatchStatus::Terminated;
        drop(inner);
        self.request_shutdown();
    }
}
