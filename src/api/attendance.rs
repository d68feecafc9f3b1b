use std::collections::HashMap;

use actix_web::{HttpResponse, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::auth::auth::AuthUser;
use crate::auth::guard::{Action, authorize};
use crate::errors::{ApiError, is_unique_violation};
use crate::model::attendance::{AttendanceResponse, AttendanceRow, Task};
use crate::model::user::UserSummary;

#[derive(Deserialize, ToSchema)]
pub struct LogAttendance {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 8.0)]
    pub hours_worked: f64,
    /// Free-text descriptions of the day's work. Blank entries are discarded.
    #[serde(default)]
    #[schema(example = json!(["Fixed login bug", "Sprint planning"]))]
    pub tasks: Vec<String>,
}

#[derive(Deserialize, IntoParams)]
pub struct AttendanceFilter {
    /// Filter by record owner. Honored only for admins; everyone else
    /// always gets their own records.
    pub user_id: Option<u64>,
    /// Inclusive range start
    #[param(example = "2026-01-01", value_type = String)]
    pub start_date: Option<NaiveDate>,
    /// Inclusive range end
    #[param(example = "2026-01-31", value_type = String)]
    pub end_date: Option<NaiveDate>,
}

fn validate_hours(hours: f64) -> Result<(), ApiError> {
    if !hours.is_finite() || !(0.0..=24.0).contains(&hours) {
        return Err(ApiError::Validation(
            "hours_worked must be between 0 and 24".into(),
        ));
    }
    Ok(())
}

/// Trim task descriptions and drop blank/whitespace-only entries.
fn normalize_tasks(tasks: &[String]) -> Vec<String> {
    tasks
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Log today's (or any day's) attendance with the tasks performed.
#[utoipa::path(
    post,
    path = "/api/attendance",
    request_body = LogAttendance,
    responses(
        (status = 201, description = "Attendance logged", body = AttendanceResponse),
        (status = 400, description = "Already logged for this date, or invalid date/hours"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn log_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<LogAttendance>,
) -> Result<HttpResponse, ApiError> {
    authorize(Some(&auth), Action::LogAttendance).require()?;

    validate_hours(payload.hours_worked)?;
    let tasks = normalize_tasks(&payload.tasks);

    let mut tx = pool.begin().await?;

    // Fast-path duplicate check; the unique key on (user_id, date) is the
    // authoritative enforcement if two requests race past this.
    let existing: Option<(u64,)> =
        sqlx::query_as("SELECT id FROM attendance WHERE user_id = ? AND date = ?")
            .bind(auth.user_id)
            .bind(payload.date)
            .fetch_optional(&mut *tx)
            .await?;

    if existing.is_some() {
        return Err(ApiError::DuplicateAttendance);
    }

    let result = sqlx::query(
        r#"
        INSERT INTO attendance (user_id, date, hours_worked)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(auth.user_id)
    .bind(payload.date)
    .bind(payload.hours_worked)
    .execute(&mut *tx)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateAttendance
        } else {
            e.into()
        }
    })?;

    let attendance_id = result.last_insert_id();

    let mut created_tasks = Vec::with_capacity(tasks.len());
    for description in tasks {
        let inserted = sqlx::query(
            r#"
            INSERT INTO tasks (attendance_id, user_id, description)
            VALUES (?, ?, ?)
            "#,
        )
        .bind(attendance_id)
        .bind(auth.user_id)
        .bind(&description)
        .execute(&mut *tx)
        .await?;

        created_tasks.push(Task {
            id: inserted.last_insert_id(),
            attendance_id,
            user_id: auth.user_id,
            description,
        });
    }

    let (created_at,): (DateTime<Utc>,) =
        sqlx::query_as("SELECT created_at FROM attendance WHERE id = ?")
            .bind(attendance_id)
            .fetch_one(&mut *tx)
            .await?;

    tx.commit().await?;

    let attendance = AttendanceResponse {
        id: attendance_id,
        user_id: auth.user_id,
        date: payload.date,
        hours_worked: payload.hours_worked,
        created_at,
        user: UserSummary {
            id: auth.user_id,
            name: auth.name,
            email: auth.email,
        },
        tasks: created_tasks,
    };

    Ok(HttpResponse::Created().json(serde_json::json!({ "attendance": attendance })))
}

/// List attendance records, newest date first, with their tasks.
#[utoipa::path(
    get,
    path = "/api/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Attendance records with tasks"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn list_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, ApiError> {
    let scope = authorize(Some(&auth), Action::ReadAttendance).require()?;
    let target_user = scope.visible_user(auth.user_id, query.user_id);

    let mut sql = String::from(
        r#"
        SELECT a.id, a.user_id, a.date, a.hours_worked, a.created_at,
               u.name AS user_name, u.email AS user_email
        FROM attendance a
        JOIN users u ON u.id = a.user_id
        WHERE a.user_id = ?
        "#,
    );
    if query.start_date.is_some() {
        sql.push_str(" AND a.date >= ?");
    }
    if query.end_date.is_some() {
        sql.push_str(" AND a.date <= ?");
    }
    sql.push_str(" ORDER BY a.date DESC");

    let mut data_q = sqlx::query_as::<_, AttendanceRow>(&sql).bind(target_user);
    if let Some(start) = query.start_date {
        data_q = data_q.bind(start);
    }
    if let Some(end) = query.end_date {
        data_q = data_q.bind(end);
    }

    let rows = data_q.fetch_all(pool.get_ref()).await?;

    if rows.is_empty() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "attendance": [] })));
    }

    let placeholders = vec!["?"; rows.len()].join(", ");
    let tasks_sql = format!(
        "SELECT id, attendance_id, user_id, description FROM tasks \
         WHERE attendance_id IN ({}) ORDER BY id",
        placeholders
    );

    let mut tasks_q = sqlx::query_as::<_, Task>(&tasks_sql);
    for row in &rows {
        tasks_q = tasks_q.bind(row.id);
    }
    let tasks = tasks_q.fetch_all(pool.get_ref()).await?;

    let mut tasks_by_attendance: HashMap<u64, Vec<Task>> = HashMap::new();
    for task in tasks {
        tasks_by_attendance
            .entry(task.attendance_id)
            .or_default()
            .push(task);
    }

    let attendance: Vec<AttendanceResponse> = rows
        .into_iter()
        .map(|row| {
            let tasks = tasks_by_attendance.remove(&row.id).unwrap_or_default();
            AttendanceResponse::from_row(row, tasks)
        })
        .collect();

    Ok(HttpResponse::Ok().json(serde_json::json!({ "attendance": attendance })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_tasks_are_discarded() {
        let tasks = normalize_tasks(&[
            "".to_string(),
            "  ".to_string(),
            "Fixed bug".to_string(),
        ]);
        assert_eq!(tasks, vec!["Fixed bug".to_string()]);
    }

    #[test]
    fn task_descriptions_are_trimmed() {
        let tasks = normalize_tasks(&["  Sprint planning \n".to_string()]);
        assert_eq!(tasks, vec!["Sprint planning".to_string()]);
    }

    #[test]
    fn no_tasks_is_fine() {
        assert!(normalize_tasks(&[]).is_empty());
    }

    #[test]
    fn hours_bounds() {
        assert!(validate_hours(0.0).is_ok());
        assert!(validate_hours(8.5).is_ok());
        assert!(validate_hours(24.0).is_ok());
        assert!(validate_hours(-0.5).is_err());
        assert!(validate_hours(24.1).is_err());
        assert!(validate_hours(f64::NAN).is_err());
    }
}
