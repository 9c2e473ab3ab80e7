pub mod errors;
pub mod events;
pub mod match_handle;
pub mod server;
pub mod tick_loop;
pub mod types;

pub use errors::{CreateMatchError, JoinError, MatchError, SubmitError};
pub use events::EventBuffer;
pub use match_handle::{MatchHandle, Seat};
pub use server::GameServer;
pub use types::{EventCursor, MatchInfo, MatchStatus, ServerConfig, ServerEvent, SessionToken};
