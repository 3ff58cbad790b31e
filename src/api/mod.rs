//! HTTP gateway for wordwar.
//!
//! Chat bridges talk to the service through these endpoints.
//!
//! ## Endpoints
//!
//! ### Health & Info
//! - `GET /health` - Health check (never authenticated)
//! - `GET /api/v1/` - API information
//!
//! ### Chat
//! - `POST /api/v1/messages` - Dispatch a chat line, returns replies
//! - `WS /api/v1/rooms/{room}/ws` - Room announcements, plus chat lines in
//!
//! ### Wars
//! - `GET /api/v1/wars` - List active wars
//! - `POST /api/v1/wars` - Start a war
//! - `DELETE /api/v1/wars` - Cancel every war (silent)
//! - `DELETE /api/v1/wars/{room}` - Cancel one room's war
//!
//! ## Example
//!
//! ```no_run
//! use wordwar::api::{serve, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> wordwar::Result<()> {
//!     let config = ServerConfig::new("127.0.0.1", 3000);
//!     serve(config).await
//! }
//! ```

pub mod handlers;
pub mod router;
pub mod types;
pub mod websocket;

pub use handlers::AppState;
pub use router::{create_router, create_router_with_state, serve, serve_with_state, ServerConfig};
pub use types::{
    ChatMessageRequest, ChatMessageResponse, ErrorResponse, ListWarsResponse, StartWarRequest,
    StartWarResponse, WarSummaryResponse, WsMessage,
};
