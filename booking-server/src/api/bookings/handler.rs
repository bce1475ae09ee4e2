//! Booking API Handlers
//!
//! 预订创建/编辑在落库前经过同一条检查链：
//! 负载校验 → 日期/时段格式 → 时段在网格上 → 闭店日 → 容量准入。
//! 容量拒绝以 409 返回，错误详情携带 {slot, load, capacity}。

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use crate::auth::CurrentUser;
use crate::capacity::AdmissionDecision;
use crate::core::ServerState;
use crate::db::models::Booking;
use crate::db::repository::{BookingRepository, ClosedDayRepository};
use crate::utils::AppError;
use crate::utils::{time, validation};

use shared::booking::{ArrivedUpdate, BookingCreate, BookingUpdate};

/// Optional date filter for the admin listing
#[derive(Debug, Default, Deserialize)]
pub struct BookingListQuery {
    pub date: Option<String>,
}

/// POST /api/bookings - 顾客提交预订请求 (公共路由)
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BookingCreate>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    payload
        .validate()
        .map_err(|e| AppError::validation(e.to_string()))?;
    validation::validate_required_text(&payload.name, "name", validation::MAX_NAME_LEN)?;

    let date = time::normalize_date(&payload.date)?;

    // 时段必须在网格上; 检查器对未知标签不报错，这里必须先拦截
    if !state.checker().grid().contains(&payload.time) {
        return Err(AppError::outside_service_hours(&payload.time));
    }

    // 闭店日不接受预订
    let closed_days = ClosedDayRepository::new(state.get_db());
    if closed_days.find_by_date(&date).await?.is_some() {
        return Err(AppError::day_closed(&date));
    }

    // 容量准入
    let bookings = BookingRepository::new(state.get_db());
    let decision = state
        .checker()
        .check_date(&bookings, &date, &payload.time, payload.party_size, None)
        .await?;

    if let AdmissionDecision::Rejected {
        slot,
        load,
        capacity,
    } = decision
    {
        tracing::info!(
            date = %date,
            slot = %slot,
            load,
            capacity,
            "Booking request rejected: slot over capacity"
        );
        return Err(AppError::capacity_exceeded(slot, load, capacity));
    }

    let booking = bookings
        .create(BookingCreate {
            date,
            ..payload
        })
        .await?;

    tracing::info!(
        reference = %booking.reference,
        date = %booking.date,
        time = %booking.time,
        party_size = booking.party_size,
        "Booking created"
    );

    // 确认邮件在后台投递；失败只记录，不影响已落库的预订
    let mailer = state.mailer().clone();
    let for_mail = booking.clone();
    tokio::spawn(async move {
        if let Err(e) = mailer.send_booking_confirmation(&for_mail).await {
            tracing::warn!(
                reference = %for_mail.reference,
                error = %e,
                "Confirmation email failed"
            );
        }
    });

    Ok((StatusCode::CREATED, Json(booking)))
}

/// GET /api/bookings - 当前登录用户邮箱下的预订
pub async fn list_mine(
    State(state): State<ServerState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = repo.find_by_email(&user.email).await?;
    Ok(Json(bookings))
}

/// GET /api/bookings/all - 全部预订 (admin)，可按日期过滤
pub async fn list_all(
    State(state): State<ServerState>,
    Query(query): Query<BookingListQuery>,
) -> Result<Json<Vec<Booking>>, AppError> {
    let repo = BookingRepository::new(state.get_db());
    let bookings = match query.date.as_deref() {
        Some(date) => repo.find_by_date(&time::normalize_date(date)?).await?,
        None => repo.find_all().await?,
    };
    Ok(Json(bookings))
}

/// PUT /api/bookings/:id - 编辑预订 (admin)
///
/// 日期/时段/人数有变化时重新准入，排除自身原有足迹。
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<BookingUpdate>,
) -> Result<Json<Booking>, AppError> {
    let repo = BookingRepository::new(state.get_db());
    let existing = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::booking_not_found(&id))?;

    if let Some(name) = &payload.name {
        validation::validate_required_text(name, "name", validation::MAX_NAME_LEN)?;
    }
    validation::validate_optional_text(
        &payload.special_requests,
        "specialRequests",
        validation::MAX_NOTE_LEN,
    )?;

    let date = match &payload.date {
        Some(d) => time::normalize_date(d)?,
        None => existing.date.clone(),
    };
    let slot = payload.time.clone().unwrap_or_else(|| existing.time.clone());
    let party_size = payload.party_size.unwrap_or(existing.party_size);

    let footprint_changed =
        date != existing.date || slot != existing.time || party_size != existing.party_size;

    if footprint_changed {
        if !state.checker().grid().contains(&slot) {
            return Err(AppError::outside_service_hours(&slot));
        }

        let decision = state
            .checker()
            .check_date(&repo, &date, &slot, party_size, Some(&id))
            .await?;

        if let AdmissionDecision::Rejected {
            slot,
            load,
            capacity,
        } = decision
        {
            tracing::info!(
                booking_id = %id,
                slot = %slot,
                load,
                capacity,
                "Booking edit rejected: slot over capacity"
            );
            return Err(AppError::capacity_exceeded(slot, load, capacity));
        }
    }

    let booking = repo
        .update(
            &id,
            BookingUpdate {
                date: Some(date),
                time: Some(slot),
                party_size: Some(party_size),
                ..payload
            },
        )
        .await?;

    tracing::info!(booking_id = %id, "Booking updated");

    Ok(Json(booking))
}

/// PUT /api/bookings/:id/arrived - 设置/切换到店状态 (admin)
///
/// body 给出 `arrived` 布尔值时设置；body 缺失或无效时切换。
pub async fn set_arrived(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    payload: Option<Json<ArrivedUpdate>>,
) -> Result<Json<Booking>, AppError> {
    let arrived = payload.and_then(|Json(p)| p.arrived);

    let repo = BookingRepository::new(state.get_db());
    let booking = repo.set_arrived(&id, arrived).await?;

    tracing::info!(booking_id = %id, arrived = booking.arrived, "Arrival status updated");

    Ok(Json(booking))
}

/// DELETE /api/bookings/:id - 删除预订 (admin)
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<Json<bool>, AppError> {
    let repo = BookingRepository::new(state.get_db());
    let deleted = repo.delete(&id).await?;
    if !deleted {
        return Err(AppError::booking_not_found(&id));
    }

    tracing::info!(booking_id = %id, "Booking deleted");

    Ok(Json(true))
}
