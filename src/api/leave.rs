use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::guard::{Action, authorize};
use crate::config::Config;
use crate::errors::ApiError;
use crate::model::leave::{LeaveResponse, LeaveRow, LeaveStatus};
use crate::model::user::UserSummary;

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2026-07-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "Travel")]
    pub reason: String,
}

#[derive(Deserialize, IntoParams)]
pub struct LeaveFilter {
    /// Filter by record owner. Honored only for admins; everyone else
    /// always gets their own records.
    pub user_id: Option<u64>,
    /// Filter by leave status
    #[param(example = "PENDING")]
    pub status: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    #[schema(example = "APPROVED")]
    pub status: LeaveStatus,
}

/// Inclusive range: equal dates denote a single-day leave.
fn validate_leave_dates(start: NaiveDate, end: NaiveDate) -> Result<(), ApiError> {
    if end < start {
        return Err(ApiError::Validation(
            "end_date cannot be before start_date".into(),
        ));
    }
    Ok(())
}

/// Day count inclusive of both ends.
fn leave_duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Status transition policy. With reopen allowed any overwrite goes through
/// and admins can change their mind (no history is kept); without it, only
/// PENDING requests may be decided.
fn next_status(
    current: LeaveStatus,
    requested: LeaveStatus,
    allow_reopen: bool,
) -> Result<LeaveStatus, ApiError> {
    if current == requested {
        return Ok(requested);
    }
    if !allow_reopen && current != LeaveStatus::Pending {
        return Err(ApiError::Validation(
            "leave request has already been decided".into(),
        ));
    }
    Ok(requested)
}

/// Submit a leave request. Created in PENDING for the calling user.
#[utoipa::path(
    post,
    path = "/api/leaves",
    request_body = CreateLeave,
    responses(
        (status = 201, description = "Leave request submitted", body = LeaveResponse),
        (status = 400, description = "Missing reason or inverted date range"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    authorize(Some(&auth), Action::RequestLeave).require()?;

    let reason = payload.reason.trim();
    if reason.is_empty() {
        return Err(ApiError::Validation("reason is required".into()));
    }
    validate_leave_dates(payload.start_date, payload.end_date)?;

    let result = sqlx::query(
        r#"
        INSERT INTO leaves (user_id, start_date, end_date, reason, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(reason)
    .bind(LeaveStatus::Pending.to_string())
    .execute(pool.get_ref())
    .await?;

    let leave_id = result.last_insert_id();

    let (created_at,): (DateTime<Utc>,) =
        sqlx::query_as("SELECT created_at FROM leaves WHERE id = ?")
            .bind(leave_id)
            .fetch_one(pool.get_ref())
            .await?;

    tracing::info!(
        user_id = auth.user_id,
        leave_id,
        days = leave_duration_days(payload.start_date, payload.end_date),
        "Leave request submitted"
    );

    let leave = LeaveResponse {
        id: leave_id,
        user_id: auth.user_id,
        start_date: payload.start_date,
        end_date: payload.end_date,
        reason: reason.to_string(),
        status: LeaveStatus::Pending.to_string(),
        created_at,
        user: UserSummary {
            id: auth.user_id,
            name: auth.name,
            email: auth.email,
        },
    };

    Ok(HttpResponse::Created().json(serde_json::json!({ "leave": leave })))
}

/// List leave requests, newest creation first.
#[utoipa::path(
    get,
    path = "/api/leaves",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Leave requests"),
        (status = 400, description = "Unknown status filter"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    let scope = authorize(Some(&auth), Action::ReadLeaves).require()?;
    let target_user = scope.visible_user(auth.user_id, query.user_id);

    let status = query
        .status
        .as_deref()
        .map(|s| {
            s.parse::<LeaveStatus>()
                .map_err(|_| ApiError::Validation("Unknown leave status".into()))
        })
        .transpose()?;

    let mut sql = String::from(
        r#"
        SELECT l.id, l.user_id, l.start_date, l.end_date, l.reason, l.status, l.created_at,
               u.name AS user_name, u.email AS user_email
        FROM leaves l
        JOIN users u ON u.id = l.user_id
        WHERE l.user_id = ?
        "#,
    );
    if status.is_some() {
        sql.push_str(" AND l.status = ?");
    }
    sql.push_str(" ORDER BY l.created_at DESC");

    let mut data_q = sqlx::query_as::<_, LeaveRow>(&sql).bind(target_user);
    if let Some(status) = status {
        data_q = data_q.bind(status.to_string());
    }

    let leaves: Vec<LeaveResponse> = data_q
        .fetch_all(pool.get_ref())
        .await?
        .into_iter()
        .map(LeaveResponse::from)
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "leaves": leaves })))
}

/// Approve or reject a leave request (or reopen it, where policy allows).
#[utoipa::path(
    patch,
    path = "/api/leaves/{leave_id}",
    params(("leave_id" = u64, Path, description = "Leave request to decide")),
    request_body = DecideLeave,
    responses(
        (status = 200, description = "Updated leave request", body = LeaveResponse),
        (status = 400, description = "Invalid status or closed request"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Leave request not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> Result<HttpResponse, ApiError> {
    authorize(Some(&auth), Action::DecideLeave).require()?;

    let leave_id = path.into_inner();

    let row = sqlx::query_as::<_, LeaveRow>(
        r#"
        SELECT l.id, l.user_id, l.start_date, l.end_date, l.reason, l.status, l.created_at,
               u.name AS user_name, u.email AS user_email
        FROM leaves l
        JOIN users u ON u.id = l.user_id
        WHERE l.id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or(ApiError::NotFound("leave request"))?;

    let current = row
        .status
        .parse::<LeaveStatus>()
        .map_err(|_| ApiError::Internal("unknown leave status in store"))?;

    let new_status = next_status(current, payload.status, config.leave_allow_reopen)?;

    sqlx::query("UPDATE leaves SET status = ? WHERE id = ?")
        .bind(new_status.to_string())
        .bind(leave_id)
        .execute(pool.get_ref())
        .await?;

    tracing::info!(
        admin_id = auth.user_id,
        leave_id,
        from = %current,
        to = %new_status,
        "Leave status changed"
    );

    let mut leave = LeaveResponse::from(row);
    leave.status = new_status.to_string();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "leave": leave })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn inverted_range_is_rejected() {
        assert!(validate_leave_dates(date("2024-06-10"), date("2024-06-08")).is_err());
        assert!(validate_leave_dates(date("2024-06-08"), date("2024-06-10")).is_ok());
    }

    #[test]
    fn single_day_leave_spans_one_day() {
        assert!(validate_leave_dates(date("2024-06-10"), date("2024-06-10")).is_ok());
        assert_eq!(leave_duration_days(date("2024-06-10"), date("2024-06-10")), 1);
        assert_eq!(leave_duration_days(date("2024-07-01"), date("2024-07-03")), 3);
    }

    #[test]
    fn pending_can_always_be_decided() {
        for allow_reopen in [true, false] {
            assert_eq!(
                next_status(LeaveStatus::Pending, LeaveStatus::Approved, allow_reopen).unwrap(),
                LeaveStatus::Approved
            );
            assert_eq!(
                next_status(LeaveStatus::Pending, LeaveStatus::Rejected, allow_reopen).unwrap(),
                LeaveStatus::Rejected
            );
        }
    }

    #[test]
    fn reopen_policy_gates_decided_requests() {
        // Reopen on: decided requests can move anywhere.
        assert_eq!(
            next_status(LeaveStatus::Approved, LeaveStatus::Pending, true).unwrap(),
            LeaveStatus::Pending
        );
        assert_eq!(
            next_status(LeaveStatus::Rejected, LeaveStatus::Approved, true).unwrap(),
            LeaveStatus::Approved
        );

        // Reopen off: decided requests are frozen.
        assert!(next_status(LeaveStatus::Approved, LeaveStatus::Pending, false).is_err());
        assert!(next_status(LeaveStatus::Rejected, LeaveStatus::Approved, false).is_err());
    }

    #[test]
    fn same_status_is_a_no_op() {
        assert_eq!(
            next_status(LeaveStatus::Approved, LeaveStatus::Approved, false).unwrap(),
            LeaveStatus::Approved
        );
    }
}
