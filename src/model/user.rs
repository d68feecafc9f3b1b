use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::errors::ApiError;
use crate::model::role::Role;

/// Owner details embedded in attendance and leave responses.
#[derive(Debug, Serialize, ToSchema)]
pub struct UserSummary {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@company.com")]
    pub email: String,
}

/// Raw employee listing row. `role_id` is resolved to a [`Role`] before the
/// record leaves the API; the password hash is never selected.
#[derive(Debug, FromRow)]
pub struct EmployeeRow {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role_id: u8,
    pub created_at: DateTime<Utc>,
    pub attendance_count: i64,
    pub leave_count: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "id": 7,
    "name": "John Doe",
    "email": "john.doe@company.com",
    "role": "EMPLOYEE",
    "created_at": "2026-01-01T00:00:00Z",
    "attendance_count": 12,
    "leave_count": 2
}))]
pub struct EmployeeResponse {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: DateTime<Utc>,
    pub attendance_count: i64,
    pub leave_count: i64,
}

impl TryFrom<EmployeeRow> for EmployeeResponse {
    type Error = ApiError;

    fn try_from(row: EmployeeRow) -> Result<Self, Self::Error> {
        let role = Role::from_id(row.role_id).ok_or(ApiError::Internal("unknown role id"))?;
        Ok(EmployeeResponse {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
            attendance_count: row.attendance_count,
            leave_count: row.leave_count,
        })
    }
}
