//! Round lifecycle API handlers.
//!
//! Handlers are stateless per request: each one loads the session's persisted
//! round, mutates it through the engine, and persists it back. Standing runs
//! the dealer's whole turn within the same request, so a response is always a
//! settled point in the round - waiting for input or resolved.
//!
//! Start a round:
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/rounds
//! ```
//!
//! Hit:
//! ```bash
//! curl -X POST http://localhost:3000/api/v1/rounds/<session_id>/action \
//!   -H "Content-Type: application/json" \
//!   -d '{"action": "hit"}'
//! ```

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use blackjack::{GameError, Outcome, Phase, PlayerAction, Round};
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::AppState;
use super::sessions::SessionError;

/// Client-facing snapshot of a session's round.
///
/// The dealer's hole card is masked and only the up card's value reported
/// while the round is still in the player's turn.
#[derive(Debug, Deserialize, Serialize)]
pub struct RoundView {
    pub session_id: Uuid,
    pub phase: Phase,
    pub player_hand: String,
    pub player_value: u16,
    pub dealer_hand: String,
    pub dealer_value: u16,
    pub outcome: Option<Outcome>,
    pub message: Option<String>,
}

impl RoundView {
    fn new(session_id: Uuid, round: &Round) -> Self {
        let reveal_hole = round.phase() != Phase::PlayerTurn;
        let outcome = round.outcome().ok();
        let message = outcome.map(|outcome| match outcome {
            Outcome::PlayerWins => "You win!".to_string(),
            Outcome::DealerWins if round.player().is_busted() => {
                "You busted! Dealer wins.".to_string()
            }
            Outcome::DealerWins => "Dealer wins! (Dealer wins ties)".to_string(),
        });
        Self {
            session_id,
            phase: round.phase(),
            player_hand: round.render_player_hand(),
            player_value: round.player().value(),
            dealer_hand: round.render_dealer_hand(reveal_hole),
            dealer_value: if reveal_hole {
                round.dealer().value()
            } else {
                round.visible_dealer_value()
            },
            outcome,
            message,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct TakeActionRequest {
    pub action: PlayerAction,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Errors surfaced by the round handlers, mapped onto HTTP statuses.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::Game(GameError::InvalidAction) => StatusCode::CONFLICT,
            Self::Game(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Session(SessionError::NotFound) => StatusCode::NOT_FOUND,
            Self::Session(SessionError::CapacityReached) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Session(SessionError::Corrupt(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Start a round under a fresh session.
///
/// Returns `201 Created` with the session id and the initial view (two
/// player cards face up, dealer up card plus a hidden hole card), or
/// `503 Service Unavailable` once the session limit is reached.
pub async fn start_round(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<RoundView>), ApiError> {
    let round = Round::start(&mut rand::rng())?;
    let session_id = state.sessions.create(&round)?;
    info!("session {session_id}: round started");
    Ok((StatusCode::CREATED, Json(RoundView::new(session_id, &round))))
}

/// Current view of the session's round.
pub async fn get_round(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<RoundView>, ApiError> {
    let round = state.sessions.load(session_id)?;
    Ok(Json(RoundView::new(session_id, &round)))
}

/// Apply a player action to the session's round.
///
/// A `hit` that busts resolves the round immediately. A `stand` plays the
/// dealer's turn to completion before responding, so the returned view is
/// already resolved. Actions against a resolved round return `409 Conflict`.
pub async fn take_action(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(request): Json<TakeActionRequest>,
) -> Result<Json<RoundView>, ApiError> {
    let mut round = state.sessions.load(session_id)?;
    round.apply_player_action(request.action)?;
    if round.phase() == Phase::DealerTurn {
        round.advance_dealer()?;
    }
    state.sessions.store(session_id, &round)?;
    info!(
        "session {session_id}: {} applied, phase now {:?}",
        request.action,
        round.phase()
    );
    Ok(Json(RoundView::new(session_id, &round)))
}

/// Destroy the session so the client can start over.
///
/// Returns `204 No Content`, or `404 Not Found` for unknown sessions.
pub async fn reset_round(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(session_id) {
        info!("session {session_id}: reset");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::Session(SessionError::NotFound))
    }
}
