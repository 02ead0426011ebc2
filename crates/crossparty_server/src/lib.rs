//! Crossparty server library.
//!
//! Server-authoritative lobby for a two-player grid game. Clients connect
//! over WebSocket, receive a numeric player id, pair up by mutual consent
//! and play moves the server validates with [`crossparty_board`].
//!
//! # Architecture
//!
//! - **Registry**: connected players and their outboxes
//! - **Matchmaking**: pending pairings, always reciprocal
//! - **Session**: active games, owned by one table
//! - **Lobby**: the three tables behind one lock ([`Hub`])
//! - **Router / Server**: JSON frames in, lobby operations, JSON frames out
//!
//! # Example
//!
//! ```no_run
//! use crossparty_server::{Hub, ServerConfig, server};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:5050").await?;
//! server::serve(listener, Hub::new(*ServerConfig::default().board_size())).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod error;
mod lobby;
mod matchmaking;
mod protocol;
mod registry;
mod router;
mod session;

pub mod server;

// Crate-level exports - Configuration
pub use config::{DEFAULT_CONFIG_FILE, HOST_ENV, MAX_BOARD_SIZE, PORT_ENV, ServerConfig};

// Crate-level exports - Errors
pub use error::{ConfigError, ErrorCode, LobbyError, ServerError};

// Crate-level exports - Lobby
pub use lobby::{Hub, Lobby};
pub use matchmaking::{MatchKey, MatchTable, PendingMatch};
pub use registry::{Outbox, Player, PlayerId, PlayerRegistry, PlayerState};
pub use session::{GameSession, SessionId, SessionTable};

// Crate-level exports - Protocol
pub use protocol::{ClientMessage, DecodeError, ServerMessage, decode, decode_bytes, encode};
pub use router::SessionRouter;
