//! REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::types::{
    ActorQuery, CancelWarResponse, ChatMessageRequest, ChatMessageResponse, ErrorResponse,
    ListWarsResponse, StartWarRequest, StartWarResponse, WarSummaryResponse, DEFAULT_ACTOR,
};
use crate::clock::{Clock, SystemClock};
use crate::commands::{ChatMessage, CommandDispatcher};
use crate::error::WarError;
use crate::request::parse_time_spec;
use crate::security::ApiKeyStore;
use crate::service::{CancelTarget, WarService, WarSettings};
use crate::ticker::Ticker;
use crate::transport::BroadcastTransport;
use crate::war::{RoomId, WarStore};

type ApiResult<T> = Result<T, (StatusCode, Json<ErrorResponse>)>;

fn api_error(err: WarError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, body) = ErrorResponse::from_war_error(&err);
    (status, Json(body))
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WarService>,
    pub dispatcher: Arc<CommandDispatcher>,
    pub transport: Arc<BroadcastTransport>,
    pub auth: Arc<ApiKeyStore>,
}

impl AppState {
    pub fn new(settings: &WarSettings) -> Self {
        Self::with_clock(settings, Arc::new(SystemClock))
    }

    pub fn with_clock(settings: &WarSettings, clock: Arc<dyn Clock>) -> Self {
        let transport = Arc::new(BroadcastTransport::new());
        let service = Arc::new(WarService::new(
            Arc::new(WarStore::new()),
            transport.clone(),
            clock,
            settings.limits,
        ));
        let dispatcher = Arc::new(CommandDispatcher::new(
            Arc::clone(&service),
            settings.command_prefix.clone(),
            settings.admins.iter().cloned(),
        ));

        Self {
            service,
            dispatcher,
            transport,
            auth: Arc::new(ApiKeyStore::disabled()),
        }
    }

    /// Replace the API key store.
    pub fn with_auth(mut self, auth: ApiKeyStore) -> Self {
        self.auth = Arc::new(auth);
        self
    }

    /// A ticker driving this state's wars, aligned to the service clock.
    pub fn ticker(&self) -> Ticker {
        Ticker::new(
            Arc::clone(self.service.store()),
            self.service.announcer().clone(),
        )
        .with_clock(Arc::clone(self.service.clock()))
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(&WarSettings::default())
    }
}

/// Health check endpoint.
pub async fn health() -> &'static str {
    "OK"
}

/// API information endpoint.
pub async fn api_info(State(state): State<AppState>) -> ApiResult<Json<serde_json::Value>> {
    let active_wars = state.service.store().count().map_err(api_error)?;

    Ok(Json(serde_json::json!({
        "name": "wordwar",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "running",
        "active_wars": active_wars,
    })))
}

/// Dispatch a chat line forwarded by a gateway.
pub async fn post_message(
    State(state): State<AppState>,
    Json(req): Json<ChatMessageRequest>,
) -> ApiResult<Json<ChatMessageResponse>> {
    let room = req
        .room
        .map(|r| r.parse::<RoomId>())
        .transpose()
        .map_err(api_error)?;

    let message = ChatMessage {
        room,
        sender: req.sender,
        text: req.text,
    };

    let response = match state.dispatcher.handle(&message) {
        Some(replies) => ChatMessageResponse {
            handled: true,
            replies,
        },
        None => ChatMessageResponse {
            handled: false,
            replies: Vec::new(),
        },
    };

    Ok(Json(response))
}

/// List active wars.
pub async fn list_wars(State(state): State<AppState>) -> ApiResult<Json<ListWarsResponse>> {
    let wars = state.service.list_wars().map_err(api_error)?;
    let wars: Vec<WarSummaryResponse> = wars.iter().map(WarSummaryResponse::from).collect();

    Ok(Json(ListWarsResponse {
        count: wars.len(),
        wars,
    }))
}

/// Start a war.
pub async fn start_war(
    State(state): State<AppState>,
    Json(req): Json<StartWarRequest>,
) -> ApiResult<(StatusCode, Json<StartWarResponse>)> {
    let room: RoomId = req.room.parse().map_err(api_error)?;
    let time = parse_time_spec(req.start.as_deref().unwrap_or("")).map_err(api_error)?;
    let actor = req.actor.as_deref().unwrap_or(DEFAULT_ACTOR);

    let started = state
        .service
        .start_war(Some(&room), req.duration, time, actor)
        .map_err(api_error)?;

    Ok((StatusCode::CREATED, Json(started.into())))
}

/// Cancel one room's war.
pub async fn cancel_war(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(query): Query<ActorQuery>,
) -> ApiResult<Json<CancelWarResponse>> {
    let room: RoomId = room.parse().map_err(api_error)?;
    let message = state
        .service
        .cancel_war(&CancelTarget::Room(room), query.actor())
        .map_err(api_error)?;

    Ok(Json(CancelWarResponse { message }))
}

/// Cancel every war without announcing.
pub async fn cancel_all_wars(
    State(state): State<AppState>,
    Query(query): Query<ActorQuery>,
) -> ApiResult<Json<CancelWarResponse>> {
    let message = state
        .service
        .cancel_war(&CancelTarget::All, query.actor())
        .map_err(api_error)?;

    Ok(Json(CancelWarResponse { message }))
}
