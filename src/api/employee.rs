use actix_web::{HttpResponse, web};
use serde::Deserialize;
use sqlx::MySqlPool;
use tracing::error;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::guard::{Action, Scope, authorize};
use crate::auth::password::hash_password;
use crate::errors::{ApiError, is_unique_violation};
use crate::model::role::Role;
use crate::model::user::{EmployeeResponse, EmployeeRow};
use crate::utils::db_utils::{SqlValue, build_update, execute_update};
use crate::utils::email_cache;
use crate::utils::email_filter;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "John Doe")]
    pub name: String,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: String,
    #[schema(example = "hunter2secret")]
    pub password: String,
    /// Defaults to EMPLOYEE.
    pub role: Option<Role>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    pub name: Option<String>,
    #[schema(example = "john.doe@company.com", format = "email")]
    pub email: Option<String>,
    pub role: Option<Role>,
    /// Re-hashed before storage.
    pub password: Option<String>,
}

const EMPLOYEE_COLUMNS: &str = r#"
    id, name, email, role_id, created_at,
    (SELECT COUNT(*) FROM attendance a WHERE a.user_id = users.id) AS attendance_count,
    (SELECT COUNT(*) FROM leaves l WHERE l.user_id = users.id) AS leave_count
"#;

async fn fetch_employee(pool: &MySqlPool, id: u64) -> Result<Option<EmployeeRow>, sqlx::Error> {
    let sql = format!("SELECT {} FROM users WHERE id = ?", EMPLOYEE_COLUMNS);
    sqlx::query_as::<_, EmployeeRow>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// true  => email AVAILABLE
/// false => email TAKEN
async fn is_email_available(email: &str, pool: &MySqlPool) -> bool {
    let email = email.to_lowercase();

    // 1. Cuckoo filter: a miss is a definitive "available".
    if !email_filter::might_exist(&email) {
        return true;
    }

    // 2. Moka cache: a hit is a definitive "taken".
    if email_cache::is_taken(&email).await {
        return false;
    }

    // 3. Database fallback
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE email = ? LIMIT 1)",
    )
    .bind(&email)
    .fetch_one(pool)
    .await
    .unwrap_or(true); // fail-safe

    !exists
}

/// Create an employee account (ADMIN).
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Account created", body = EmployeeResponse),
        (status = 400, description = "Missing fields or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> Result<HttpResponse, ApiError> {
    authorize(Some(&auth), Action::ManageEmployees).require()?;

    let name = payload.name.trim();
    let email = payload.email.trim().to_lowercase();
    if name.is_empty() || email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Validation(
            "Name, email, and password are required".into(),
        ));
    }

    if !is_email_available(&email, pool.get_ref()).await {
        return Err(ApiError::DuplicateEmail);
    }

    let hashed = hash_password(&payload.password)
        .map_err(|_| ApiError::Internal("password hashing failed"))?;
    let role = payload.role.unwrap_or(Role::Employee);

    let result = sqlx::query(
        r#"
        INSERT INTO users (name, email, password, role_id)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(name)
    .bind(&email)
    .bind(&hashed)
    .bind(role.id())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateEmail
        } else {
            error!(error = %e, "Failed to create employee");
            e.into()
        }
    })?;

    // Keep the availability fast path in step with the store.
    email_filter::insert(&email);
    email_cache::mark_taken(&email).await;

    let row = fetch_employee(pool.get_ref(), result.last_insert_id())
        .await?
        .ok_or(ApiError::Internal("created account vanished"))?;
    let employee = EmployeeResponse::try_from(row)?;

    Ok(HttpResponse::Created().json(serde_json::json!({ "employee": employee })))
}

/// List accounts: admins see every non-admin account, everyone else sees
/// only their own.
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Accounts visible to the caller"),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<HttpResponse, ApiError> {
    let scope = authorize(Some(&auth), Action::ListEmployees).require()?;

    let sql = match scope {
        Scope::All => format!(
            "SELECT {} FROM users WHERE role_id <> ? ORDER BY created_at DESC",
            EMPLOYEE_COLUMNS
        ),
        Scope::Own => format!("SELECT {} FROM users WHERE id = ?", EMPLOYEE_COLUMNS),
    };

    let query = match scope {
        Scope::All => sqlx::query_as::<_, EmployeeRow>(&sql).bind(Role::Admin.id()),
        Scope::Own => sqlx::query_as::<_, EmployeeRow>(&sql).bind(auth.user_id),
    };

    let employees: Vec<EmployeeResponse> = query
        .fetch_all(pool.get_ref())
        .await?
        .into_iter()
        .map(EmployeeResponse::try_from)
        .collect::<Result<_, _>>()?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "employees": employees })))
}

/// Fetch a single account (ADMIN, or the account owner).
#[utoipa::path(
    get,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account found", body = EmployeeResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not the caller's account"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let scope = authorize(Some(&auth), Action::ListEmployees).require()?;
    let employee_id = path.into_inner();

    if scope != Scope::All && employee_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    let row = fetch_employee(pool.get_ref(), employee_id)
        .await?
        .ok_or(ApiError::NotFound("employee"))?;
    let employee = EmployeeResponse::try_from(row)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "employee": employee })))
}

/// Partially update an account (ADMIN).
#[utoipa::path(
    put,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Account id")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Updated account", body = EmployeeResponse),
        (status = 400, description = "No fields, or duplicate email"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateEmployee>,
) -> Result<HttpResponse, ApiError> {
    authorize(Some(&auth), Action::ManageEmployees).require()?;
    let employee_id = path.into_inner();

    let current = fetch_employee(pool.get_ref(), employee_id)
        .await?
        .ok_or(ApiError::NotFound("employee"))?;

    let mut fields: Vec<(&str, SqlValue)> = Vec::new();

    if let Some(name) = payload.name.as_deref() {
        let name = name.trim();
        if name.is_empty() {
            return Err(ApiError::Validation("name cannot be blank".into()));
        }
        fields.push(("name", SqlValue::String(name.to_string())));
    }

    let new_email = payload
        .email
        .as_deref()
        .map(|e| e.trim().to_lowercase())
        .filter(|e| *e != current.email);
    if let Some(email) = &new_email {
        if email.is_empty() {
            return Err(ApiError::Validation("email cannot be blank".into()));
        }
        if !is_email_available(email, pool.get_ref()).await {
            return Err(ApiError::DuplicateEmail);
        }
        fields.push(("email", SqlValue::String(email.clone())));
    }

    if let Some(role) = payload.role {
        fields.push(("role_id", SqlValue::U8(role.id())));
    }

    if let Some(password) = payload.password.as_deref() {
        if password.is_empty() {
            return Err(ApiError::Validation("password cannot be blank".into()));
        }
        let hashed =
            hash_password(password).map_err(|_| ApiError::Internal("password hashing failed"))?;
        fields.push(("password", SqlValue::String(hashed)));
    }

    let update = build_update("users", fields, "id", employee_id)?;
    execute_update(pool.get_ref(), update).await.map_err(|e| {
        if is_unique_violation(&e) {
            ApiError::DuplicateEmail
        } else {
            error!(error = %e, employee_id, "Failed to update employee");
            e.into()
        }
    })?;

    if let Some(email) = &new_email {
        email_filter::remove(&current.email);
        email_cache::clear(&current.email).await;
        email_filter::insert(email);
        email_cache::mark_taken(email).await;
    }

    let row = fetch_employee(pool.get_ref(), employee_id)
        .await?
        .ok_or(ApiError::NotFound("employee"))?;
    let employee = EmployeeResponse::try_from(row)?;

    Ok(HttpResponse::Ok().json(serde_json::json!({ "employee": employee })))
}

/// Delete an account and, through the store's cascade, its attendance,
/// tasks, leaves, and refresh tokens (ADMIN).
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_id}",
    params(("employee_id" = u64, Path, description = "Account id")),
    responses(
        (status = 200, description = "Account deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    authorize(Some(&auth), Action::ManageEmployees).require()?;
    let employee_id = path.into_inner();

    let current = fetch_employee(pool.get_ref(), employee_id)
        .await?
        .ok_or(ApiError::NotFound("employee"))?;

    let result = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(employee_id)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to delete employee");
            ApiError::from(e)
        })?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("employee"));
    }

    email_filter::remove(&current.email);
    email_cache::clear(&current.email).await;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Employee deleted successfully"
    })))
}
