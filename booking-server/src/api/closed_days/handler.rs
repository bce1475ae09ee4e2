//! Closed Day API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::core::ServerState;
use crate::db::models::ClosedDay;
use crate::db::repository::ClosedDayRepository;
use crate::utils::AppError;
use crate::utils::{time, validation};

use shared::booking::{ClosedDayCreate, ClosedDayQuery, ClosedDayView};

fn view(day: &ClosedDay) -> ClosedDayView {
    ClosedDayView {
        date: day.date.clone(),
        note: day.note.clone(),
    }
}

/// GET /api/closed-days - 公开列表，可选 from/to 边界
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ClosedDayQuery>,
) -> Result<Json<Vec<ClosedDayView>>, AppError> {
    // 边界参数格式不对就直接报错，而不是静默忽略
    if let Some(from) = &query.from {
        time::parse_date(from)?;
    }
    if let Some(to) = &query.to {
        time::parse_date(to)?;
    }

    let repo = ClosedDayRepository::new(state.get_db());
    let days = repo
        .find_all(query.from.as_deref(), query.to.as_deref())
        .await?;

    Ok(Json(days.iter().map(view).collect()))
}

/// POST /api/closed-days - 标记闭店日 (admin)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ClosedDayCreate>,
) -> Result<(StatusCode, Json<ClosedDayView>), AppError> {
    let date = time::normalize_date(&payload.date)?;
    validation::validate_optional_text(&payload.note, "note", validation::MAX_NOTE_LEN)?;

    let repo = ClosedDayRepository::new(state.get_db());
    let day = repo.create(&date, payload.note).await?;

    tracing::info!(date = %day.date, "Day marked closed");

    Ok((StatusCode::CREATED, Json(view(&day))))
}

/// DELETE /api/closed-days/:date - 取消闭店标记 (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(date): Path<String>,
) -> Result<Json<bool>, AppError> {
    let date = time::normalize_date(&date)?;

    let repo = ClosedDayRepository::new(state.get_db());
    let deleted = repo.delete_by_date(&date).await?;
    if !deleted {
        return Err(AppError::not_found(format!("Closed day {}", date)));
    }

    tracing::info!(date = %date, "Closed day removed");

    Ok(Json(true))
}
