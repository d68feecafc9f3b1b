use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

use crate::model::user::UserSummary;

/// Leave lifecycle: created PENDING, decided by an admin. Decided requests
/// may be reopened only when the configurable reopen policy allows it.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

/// Leave listing row joined with the owning user.
#[derive(Debug, FromRow)]
pub struct LeaveRow {
    pub id: u64,
    pub user_id: u64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub user_name: String,
    pub user_email: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 3,
    "user_id": 7,
    "start_date": "2026-07-01",
    "end_date": "2026-07-03",
    "reason": "Travel",
    "status": "PENDING",
    "created_at": "2026-06-20T09:30:00Z",
    "user": { "id": 7, "name": "John Doe", "email": "john.doe@company.com" }
}))]
pub struct LeaveResponse {
    pub id: u64,
    pub user_id: u64,
    #[schema(example = "2026-07-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-07-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    #[schema(example = "PENDING", value_type = String)]
    pub status: String,
    #[schema(example = "2026-06-20T09:30:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
}

impl From<LeaveRow> for LeaveResponse {
    fn from(row: LeaveRow) -> Self {
        LeaveResponse {
            id: row.id,
            user_id: row.user_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            status: row.status,
            created_at: row.created_at,
            user: UserSummary {
                id: row.user_id,
                name: row.user_name,
                email: row.user_email,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_string_forms() {
        assert_eq!(LeaveStatus::Pending.to_string(), "PENDING");
        assert_eq!("APPROVED".parse::<LeaveStatus>().unwrap(), LeaveStatus::Approved);
        assert!("CANCELLED".parse::<LeaveStatus>().is_err());
    }
}
