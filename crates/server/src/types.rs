use bastion_core::{TerminalOutcome, Tick};

/// Identifies a session (the player seat or a spectator) within a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionToken(pub u64);

/// Tracks position in an event stream for cursor-based retrieval.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct EventCursor(pub u64);

/// Status of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStatus {
    /// Created; the simulation does not advance until the player seat is taken.
    WaitingForPlayer,
    Running,
    Finished(TerminalOutcome),
    Terminated,
}

/// Summary of a match.
#[derive(Clone, Debug)]
pub struct MatchInfo {
    pub match_id: bastion_core::MatchId,
    pub status: MatchStatus,
    pub current_tick: Tick,
}

/// An event with its sequence number for cursor tracking.
#[derive(Clone, Debug)]
pub struct ServerEvent<E> {
    pub sequence: u64,
    pub tick: Tick,
    pub event: E,
}

/// Configuration for the game server.
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Tick rate for matches (ticks per second).
    pub tick_hz: u32,
    /// Maximum number of concurrent matches.
    pub max_matches: usize,
    /// Capacity of the event buffer per match.
    pub event_buffer_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            max_matches: 16,
            event_buffer_capacity: 1024,
        }
    }
}
