use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::model::user::UserSummary;

/// Task performed during a logged day. Tasks only exist inside their parent
/// attendance record and are written in the same transaction.
#[derive(Debug, Serialize, FromRow, ToSchema)]
pub struct Task {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub attendance_id: u64,
    #[schema(example = 1)]
    pub user_id: u64,
    #[schema(example = "Fixed login bug")]
    pub description: String,
}

/// Attendance listing row joined with the owning user.
#[derive(Debug, FromRow)]
pub struct AttendanceRow {
    pub id: u64,
    pub user_id: u64,
    pub date: NaiveDate,
    pub hours_worked: f64,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AttendanceResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1)]
    pub user_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = 8.0)]
    pub hours_worked: f64,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
    pub tasks: Vec<Task>,
}

impl AttendanceResponse {
    pub fn from_row(row: AttendanceRow, tasks: Vec<Task>) -> Self {
        AttendanceResponse {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            hours_worked: row.hours_worked,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
            tasks,
        }
    }
}
