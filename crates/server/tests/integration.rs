use bastion_core::{ActionEnvelope, Game, PlayerId, TerminalOutcome, Tick};
use bastion_server::{EventCursor, GameServer, MatchStatus, ServerConfig, SubmitError};
use std::time::Duration;
use tokio::time::sleep;

/// A reservoir that fills by one unit per tick; the player drains it with
/// actions. The match is lost when the reservoir overflows.
struct ReservoirGame {
    level: i64,
    capacity: i64,
}

#[derive(Clone)]
struct ReservoirConfig {
    capacity: i64,
}

#[derive(Clone, Debug)]
enum ReservoirAction {
    Drain(i64),
}

#[derive(Clone, Debug)]
struct ReservoirObservation {
    level: i64,
    capacity: i64,
}

#[derive(Clone, Debug)]
enum ReservoirEvent {
    Drained { amount: i64, level: i64 },
}

impl Game for ReservoirGame {
    type Config = ReservoirConfig;
    type Action = ReservoirAction;
    type Observation = ReservoirObservation;
    type Event = ReservoirEvent;

    fn new(config: Self::Config, _seed: u64) -> Self {
        Self {
            level: 0,
            capacity: config.capacity,
        }
    }

    fn step(
        &mut self,
        _tick: Tick,
        actions: &[ActionEnvelope<Self::Action>],
        out_events: &mut Vec<Self::Event>,
    ) {
        self.level += 1;
        for action in actions {
            let ReservoirAction::Drain(amount) = action.payload;
            self.level -= amount;
            out_events.push(ReservoirEvent::Drained {
                amount,
                level: self.level,
            });
        }
    }

    fn observe(&self, _tick: Tick, _player: PlayerId) -> Self::Observation {
        ReservoirObservation {
            level: self.level,
            capacity: self.capacity,
        }
    }

    fn is_terminal(&self) -> Option<TerminalOutcome> {
        (self.level >= self.capacity).then_some(TerminalOutcome::Lose)
    }
}

fn test_config() -> ServerConfig {
    ServerConfig {
        tick_hz: 100, // fast for testing
        max_matches: 10,
        event_buffer_capacity: 100,
    }
}

#[tokio::test]
async fn create_and_list_matches() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    let match_id = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 42)
        .await
        .unwrap();

    let matches = server.list_matches().await;
    assert_eq!(matches.len(), 1);
    assert_eq!(matches[0].match_id, match_id);
    assert_eq!(matches[0].status, MatchStatus::WaitingForPlayer);

    server.shutdown().await;
}

#[tokio::test]
async fn simulation_waits_for_the_player_seat() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    let match_id = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 42)
        .await
        .unwrap();

    // No player yet: the tick loop idles.
    sleep(Duration::from_millis(50)).await;
    assert_eq!(server.current_tick(match_id).await.unwrap(), 0);

    let (session, player_id) = server.join_match(match_id).await.unwrap();
    assert_eq!(player_id, 0);

    sleep(Duration::from_millis(50)).await;
    assert!(server.current_tick(match_id).await.unwrap() > 0);

    let obs = server.observe(match_id, session).await.unwrap();
    assert_eq!(obs.capacity, 100_000);
    assert!(obs.level > 0);

    server.shutdown().await;
}

#[tokio::test]
async fn second_join_is_rejected() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    let match_id = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 42)
        .await
        .unwrap();

    server.join_match(match_id).await.unwrap();
    assert!(server.join_match(match_id).await.is_err());

    server.shutdown().await;
}

#[tokio::test]
async fn spectator_observes_but_cannot_submit() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    let match_id = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 42)
        .await
        .unwrap();
    server.join_match(match_id).await.unwrap();

    let spectator = server.spectate_match(match_id).await.unwrap();
    sleep(Duration::from_millis(30)).await;

    assert!(server.observe(match_id, spectator).await.is_ok());

    let result = server
        .submit_action(match_id, spectator, ReservoirAction::Drain(1), 0)
        .await;
    assert_eq!(result.unwrap_err(), SubmitError::Spectator);

    server.shutdown().await;
}

#[tokio::test]
async fn submit_action_and_poll_events() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    let match_id = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 42)
        .await
        .unwrap();
    let (session, _) = server.join_match(match_id).await.unwrap();

    let current_tick = server.current_tick(match_id).await.unwrap();
    let intended_tick = current_tick + 5;

    let (action_id, scheduled_tick) = server
        .submit_action(match_id, session, ReservoirAction::Drain(10), intended_tick)
        .await
        .unwrap();
    assert_eq!(action_id, 1);
    assert_eq!(scheduled_tick, intended_tick);

    sleep(Duration::from_millis(150)).await;

    let (events, cursor) = server
        .poll_events(match_id, session, EventCursor(0))
        .await
        .unwrap();

    assert!(cursor.0 > 0);
    let drained = events
        .iter()
        .find(|e| matches!(e.event, ReservoirEvent::Drained { amount: 10, .. }))
        .expect("drain event should be buffered");
    assert_eq!(drained.tick, scheduled_tick);

    server.shutdown().await;
}

#[tokio::test]
async fn finished_match_stops_ticking() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    // Overflows after 20 ticks (~200ms at 100 Hz).
    let match_id = server
        .create_match(ReservoirConfig { capacity: 20 }, 42)
        .await
        .unwrap();
    let (session, _) = server.join_match(match_id).await.unwrap();

    sleep(Duration::from_millis(400)).await;

    let status = server.match_status(match_id).await.unwrap();
    assert_eq!(status, MatchStatus::Finished(TerminalOutcome::Lose));

    let tick_after_finish = server.current_tick(match_id).await.unwrap();
    sleep(Duration::from_millis(100)).await;
    assert_eq!(
        server.current_tick(match_id).await.unwrap(),
        tick_after_finish
    );

    let result = server
        .submit_action(match_id, session, ReservoirAction::Drain(1), 0)
        .await;
    assert_eq!(result.unwrap_err(), SubmitError::Terminated);

    server.shutdown().await;
}

#[tokio::test]
async fn terminate_match_removes_it() {
    let server: GameServer<ReservoirGame> = GameServer::new(test_config());

    let match_id = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 42)
        .await
        .unwrap();

    server.terminate_match(match_id).await.unwrap();
    assert!(server.list_matches().await.is_empty());

    server.shutdown().await;
}

#[tokio::test]
async fn max_matches_is_enforced() {
    let config = ServerConfig {
        max_matches: 2,
        ..test_config()
    };
    let server: GameServer<ReservoirGame> = GameServer::new(config);

    server
        .create_match(ReservoirConfig { capacity: 100_000 }, 1)
        .await
        .unwrap();
    server
        .create_match(ReservoirConfig { capacity: 100_000 }, 2)
        .await
        .unwrap();

    let result = server
        .create_match(ReservoirConfig { capacity: 100_000 }, 3)
        .await;
    assert!(result.is_err());

    server.shutdown().await;
}
