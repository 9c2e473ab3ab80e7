use crate::match_handle::MatchHandle;
use bastion_core::Game;
use std::time::Duration;
use tokio::time::{interval, MissedTickBehavior};

/// Run the tick loop for a match until it finishes or shutdown is requested.
///
/// The loop is the only mutator of match state while it runs; it exits after
/// the first tick that reports the match finished, so the finish transition
/// cancels scheduling exactly once.
pub async fn run_tick_loop<G: Game + Send + 'static>(handle: MatchHandle<G>)
where
    G::Action: Send,
    G::Observation: Send,
    G::Event: Send,
    G::Config: Send,
{
    let tick_hz = handle.tick_hz();
    let tick_duration = Duration::from_secs_f64(1.0 / tick_hz as f64);

    let mut interval = interval(tick_duration);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if handle.should_shutdown() {
            break;
        }

        if handle.step_one_tick().await {
            break;
        }
    }
}

/// Spawn a tick loop as a tokio task.
pub fn spawn_tick_loop<G: Game + Send + 'static>(
    handle: MatchHandle<G>,
) -> tokio::task::JoinHandle<()>
where
    G::Action: Send,
    G::Observation: Send,
    G::Event: Send,
    G::Config: Send,
{
    tokio::spawn(run_tick_loop(handle))
}
