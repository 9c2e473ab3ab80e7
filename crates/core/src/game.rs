use crate::envelope::ActionEnvelope;
use crate::types::{PlayerId, Tick};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TerminalOutcome {
    Win,
    Lose,
}

/// A deterministic tick-stepped game.
///
/// The host owns the clock: `step` is called once per tick with the actions
/// scheduled for that tick, already in a deterministic order. Implementations
/// mutate only their own state and report side effects through `out_events`.
pub trait Game: Sized {
    type Config: Clone + Send + Sync + 'static;
    type Action: Clone + Send + Sync + 'static;
    type Observation: Clone + Send + Sync + 'static;
    type Event: Clone + Send + Sync + 'static;

    fn new(config: Self::Config, seed: u64) -> Self;

    fn step(
        &mut self,
        tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    );

    fn observe(&self, tick: Tick, player: PlayerId) -> Self::Observation;

    /// `Some` once the match has reached a terminal state; the host stops
    /// stepping after the first `Some`.
    fn is_terminal(&self) -> Option<TerminalOutcome>;
}
