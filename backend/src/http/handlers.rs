//! HTTP handlers for the REST API.
//!
//! Each handler parses its inputs and delegates to the service layer.

use axum::{
    extract::{Path, Query, State},
    http::Uri,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use futures::stream::Stream;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;

use super::dto::{
    CheckResponse, CountdownQuery, DecodeCertificateRequest, EligibilityRequest, HealthResponse,
    UserQuery,
};
use super::error::AppError;
use super::state::AppState;
use crate::models::{EligibilityResult, UnixTimestamp, WalletAddress};
use crate::services::{
    self, decode_token_uri, parse_course_id, CertificateMetadata, CountdownTicker, CourseSection,
    DashboardSnapshot, TrackerSnapshot,
};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_user(query: &UserQuery) -> Result<WalletAddress, AppError> {
    WalletAddress::parse(&query.user).map_err(AppError::BadRequest)
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let chain = match state.reader.health_check().await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        chain,
    }))
}

/// Fallback for unknown routes.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for {}", uri.path()))
}

// =============================================================================
// Eligibility
// =============================================================================

/// POST /v1/eligibility
///
/// Evaluate raw inputs without touching the chain.
pub async fn evaluate_eligibility(
    Json(request): Json<EligibilityRequest>,
) -> HandlerResult<EligibilityResult> {
    let now = request.now.unwrap_or_else(UnixTimestamp::now);
    Ok(Json(services::evaluate_at(
        request.schedule.as_ref(),
        &request.milestone_times,
        request.status,
        now,
    )))
}

/// GET /v1/courses?user=0x…
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<Vec<CourseSection>> {
    let user = parse_user(&query)?;
    let sections = services::load_catalog(state.reader.as_ref(), &user).await?;
    Ok(Json(sections))
}

/// GET /v1/courses/{course_id}/tracker?user=0x…
pub async fn get_tracker(
    State(state): State<AppState>,
    Path(course_id): Path<String>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<TrackerSnapshot> {
    let course_id = parse_course_id(&course_id)?;
    let user = parse_user(&query)?;
    let snapshot =
        services::load_tracker(state.reader.as_ref(), &user, course_id, UnixTimestamp::now())
            .await?;
    Ok(Json(snapshot))
}

/// POST /v1/courses/{course_id}/milestones/{index}/check?user=0x…
///
/// Answers whether a completion transaction for `index` would pass the
/// client-side checks right now.
pub async fn check_milestone(
    State(state): State<AppState>,
    Path((course_id, index)): Path<(String, String)>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<CheckResponse> {
    let course_id = parse_course_id(&course_id)?;
    let user = parse_user(&query)?;
    let index: i64 = index
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("Invalid milestone index '{}'", index)))?;

    let index = services::precheck_milestone(
        state.reader.as_ref(),
        &user,
        course_id,
        index,
        UnixTimestamp::now(),
    )
    .await??;
    Ok(Json(CheckResponse { index }))
}

// =============================================================================
// Dashboard & certificates
// =============================================================================

/// GET /v1/dashboard?user=0x…
pub async fn get_dashboard(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> HandlerResult<DashboardSnapshot> {
    let user = parse_user(&query)?;
    let snapshot = services::load_dashboard(state.reader.as_ref(), &user).await?;
    Ok(Json(snapshot))
}

/// GET /v1/dashboard/events?user=0x…
///
/// Streams a `dashboard` event with a fresh snapshot each time a certificate
/// is minted for `user`.
pub async fn stream_dashboard_events(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let user = parse_user(&query)?;
    // Subscribe before returning so no mint after the response starts is missed.
    let mut events = state.reader.subscribe_certificates();
    let reader = state.reader.clone();

    let stream = async_stream::stream! {
        loop {
            match events.recv().await {
                Ok(minted) if minted.user != user => continue,
                Ok(minted) => {
                    tracing::debug!(
                        "Certificate {} minted for {} on course {}",
                        minted.token_id,
                        minted.user,
                        minted.course_id
                    );
                }
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Dashboard stream for {} lagged by {} events", user, skipped);
                }
                Err(RecvError::Closed) => break,
            }

            match services::load_dashboard(reader.as_ref(), &user).await {
                Ok(snapshot) => match Event::default().event("dashboard").json_data(&snapshot) {
                    Ok(event) => yield Ok(event),
                    Err(e) => tracing::warn!("Dashboard event not serializable: {}", e),
                },
                Err(e) => tracing::warn!("Dashboard refresh for {} failed: {}", user, e),
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

/// POST /v1/certificates/decode
///
/// Returns `null` for URIs that are not inline JSON data URLs.
pub async fn decode_certificate(
    Json(request): Json<DecodeCertificateRequest>,
) -> HandlerResult<Option<CertificateMetadata>> {
    Ok(Json(decode_token_uri(&request.token_uri)?))
}

// =============================================================================
// Countdown
// =============================================================================

/// GET /v1/countdown?until=<unix seconds>
///
/// Streams `tick` events carrying `HH:MM:SS` until `until` passes, then one
/// `done` event.
pub async fn stream_countdown(
    State(state): State<AppState>,
    Query(query): Query<CountdownQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let ticker = CountdownTicker::spawn(UnixTimestamp::new(query.until), state.countdown_interval);
    let mut rx = ticker.subscribe();

    let stream = async_stream::stream! {
        // Dropping the stream drops the ticker, which stops its task.
        let _ticker = ticker;
        loop {
            let label = rx.borrow_and_update().clone();
            match label {
                Some(label) => {
                    yield Ok(Event::default().event("tick").data(label));
                }
                None => break,
            }
            if rx.changed().await.is_err() {
                break;
            }
        }
        yield Ok(Event::default().event("done").data("done"));
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
