//! Notification polling endpoints.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config;
use crate::db;
use crate::domain::Notification;
use crate::error::ApiError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct NotificationsQuery {
    pub learner_id: String,
    #[serde(default)]
    pub unread: bool,
}

#[derive(Deserialize)]
pub struct MarkReadRequest {
    pub learner_id: String,
}

#[derive(Serialize)]
pub struct NotificationsResponse {
    pub notifications: Vec<Notification>,
    pub unread_count: i64,
}

pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<NotificationsQuery>,
) -> Result<Json<NotificationsResponse>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    let notifications = db::list_notifications(
        &conn,
        &query.learner_id,
        query.unread,
        config::NOTIFICATIONS_LIMIT,
    )?;
    let unread_count = db::unread_count(&conn, &query.learner_id)?;
    Ok(Json(NotificationsResponse {
        notifications,
        unread_count,
    }))
}

pub async fn mark_read(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<MarkReadRequest>,
) -> Result<Json<Value>, ApiError> {
    let conn = db::try_lock(&state.pool)?;
    if !db::mark_notification_read(&conn, id, &req.learner_id)? {
        return Err(ApiError::NotFound("notification"));
    }
    Ok(Json(json!({ "read": true })))
}
