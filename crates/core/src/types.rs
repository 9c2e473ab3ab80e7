/// Monotonic simulation tick counter. Tick 0 is the state before the first step.
pub type Tick = u64;

/// Player seat within a match.
pub type PlayerId = u8;

/// Id assigned to a submitted action, unique within a match.
pub type ActionId = u64;

/// Id assigned to a match, unique within a server.
pub type MatchId = u64;
