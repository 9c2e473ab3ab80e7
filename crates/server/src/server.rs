use crate::errors::{CreateMatchError, JoinError, MatchError, SubmitError};
use crate::match_handle::MatchHandle;
use crate::tick_loop::spawn_tick_loop;
use crate::types::{EventCursor, MatchInfo, MatchStatus, ServerConfig, ServerEvent, SessionToken};
use bastion_core::{ActionId, Game, MatchId, PlayerId, Tick};
use bastion_host::MatchHost;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

struct MatchEntry<G: Game> {
    handle: MatchHandle<G>,
    task: JoinHandle<()>,
}

/// Manages concurrent matches, one tick-loop task per match.
pub struct GameServer<G: Game> {
    pub config: ServerConfig,
    matches: Arc<RwLock<HashMap<MatchId, MatchEntry<G>>>>,
    next_match_id: AtomicU64,
}

impl<G: Game + Send + 'static> GameServer<G>
where
    G::Action: Send,
    G::Observation: Send,
    G::Event: Send,
    G::Config: Send,
{
    pub fn new(config: ServerConfig) -> Self {
        Self {
            config,
            matches: Arc::new(RwLock::new(HashMap::new())),
            next_match_id: AtomicU64::new(1),
        }
    }

    /// Shut down the server, terminating all matches.
    pub async fn shutdown(&self) {
        let mut matches = self.matches.write().await;

        for (_, entry) in matches.drain() {
            entry.handle.request_shutdown();
            let _ = entry.task.await;
        }
    }

    /// Create a new match and start its tick loop.
    pub async fn create_match(
        &self,
        game_config: G::Config,
        seed: u64,
    ) -> Result<MatchId, CreateMatchError> {
        {
            let matches = self.matches.read().await;
            if matches.len() >= self.config.max_matches {
                return Err(CreateMatchError::TooManyMatches);
            }
        }

        let match_id = self.next_match_id.fetch_add(1, Ordering::Relaxed);
        let host = MatchHost::new(game_config, seed, self.config.tick_hz);
        let handle = MatchHandle::new(host, self.config.event_buffer_capacity);

        let task = spawn_tick_loop(handle.clone());

        let mut matches = self.matches.write().await;
        matches.insert(match_id, MatchEntry { handle, task });

        Ok(match_id)
    }

    pub async fn list_matches(&self) -> Vec<MatchInfo> {
        let matches = self.matches.read().await;
        let mut infos = Vec::with_capacity(matches.len());

        for (&match_id, entry) in matches.iter() {
            infos.push(MatchInfo {
                match_id,
                status: entry.handle.status().await,
                current_tick: entry.handle.current_tick().await,
            });
        }

        infos
    }

    /// Terminate a match and remove it.
    pub async fn terminate_match(&self, match_id: MatchId) -> Result<(), MatchError> {
        let mut matches = self.matches.write().await;

        if let Some(entry) = matches.remove(&match_id) {
            entry.handle.terminate().await;
            let _ = entry.task.await;
            Ok(())
        } else {
            Err(MatchError::NotFound)
        }
    }

    /// Take the player seat of a match; this starts the simulation.
    pub async fn join_match(
        &self,
        match_id: MatchId,
    ) -> Result<(SessionToken, PlayerId), JoinError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(JoinError::NotFound)?;

        entry.handle.join_player().await.ok_or(JoinError::SeatTaken)
    }

    /// Open a read-only session on a match.
    pub async fn spectate_match(&self, match_id: MatchId) -> Result<SessionToken, MatchError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(MatchError::NotFound)?;

        Ok(entry.handle.spectate().await)
    }

    pub async fn leave_match(
        &self,
        match_id: MatchId,
        session: SessionToken,
    ) -> Result<(), MatchError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(MatchError::NotFound)?;

        if entry.handle.leave(session).await {
            Ok(())
        } else {
            Err(MatchError::InvalidSession)
        }
    }

    /// Submit an action for the player seat.
    /// Returns the action id and the tick the action will execute on.
    pub async fn submit_action(
        &self,
        match_id: MatchId,
        session: SessionToken,
        action: G::Action,
        intended_tick: Tick,
    ) -> Result<(ActionId, Tick), SubmitError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(SubmitError::NotFound)?;

        entry
            .handle
            .submit_action(session, action, intended_tick)
            .await
    }

    pub async fn observe(
        &self,
        match_id: MatchId,
        session: SessionToken,
    ) -> Result<G::Observation, MatchError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(MatchError::NotFound)?;

        entry
            .handle
            .observe(session)
            .await
            .ok_or(MatchError::InvalidSession)
    }

    pub async fn poll_events(
        &self,
        match_id: MatchId,
        session: SessionToken,
        cursor: EventCursor,
    ) -> Result<(Vec<ServerEvent<G::Event>>, EventCursor), MatchError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(MatchError::NotFound)?;

        entry
            .handle
            .poll_events(session, cursor)
            .await
            .ok_or(MatchError::InvalidSession)
    }

    pub async fn current_tick(&self, match_id: MatchId) -> Result<Tick, MatchError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(MatchError::NotFound)?;

        Ok(entry.handle.current_tick().await)
    }

    pub async fn match_status(&self, match_id: MatchId) -> Result<MatchStatus, MatchError> {
        let matches = self.matches.read().await;

        let entry = matches.get(&match_id).ok_or(MatchError::NotFound)?;

        Ok(entry.handle.status().await)
    }
}
