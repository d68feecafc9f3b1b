use crate::api::attendance::LogAttendance;
use crate::api::chatbot::ChatRequest;
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::leave::{CreateLeave, DecideLeave};
use crate::chat::client::ChatMessage;
use crate::model::attendance::{AttendanceResponse, Task};
use crate::model::leave::{LeaveResponse, LeaveStatus};
use crate::model::role::Role;
use crate::model::user::{EmployeeResponse, UserSummary};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Employee Attendance System API",
        version = "1.0.0",
        description = r#"
## Employee Attendance System

Backend for multi-role employee attendance and leave management.

### Key Features
- **Attendance Logging**
  - One record per employee per calendar day, with the tasks performed
- **Leave Management**
  - Request leave, approve/reject as admin, view leave history
- **Employee Accounts**
  - Admin-managed accounts with EMPLOYEE / MANAGER / ADMIN roles
- **Assistant**
  - Role-aware AI chat assistant for contextual questions

### Security
Endpoints are protected with **JWT Bearer authentication**. Account
management and leave decisions require the **ADMIN** role.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::log_attendance,
        crate::api::attendance::list_attendance,

        crate::api::leave::create_leave,
        crate::api::leave::list_leaves,
        crate::api::leave::decide_leave,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::chatbot::chat
    ),
    components(
        schemas(
            LogAttendance,
            AttendanceResponse,
            Task,
            CreateLeave,
            DecideLeave,
            LeaveResponse,
            LeaveStatus,
            CreateEmployee,
            UpdateEmployee,
            EmployeeResponse,
            Role,
            UserSummary,
            ChatRequest,
            ChatMessage
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Daily attendance logging APIs"),
        (name = "Leave", description = "Leave request and approval APIs"),
        (name = "Employee", description = "Employee account management APIs"),
        (name = "Chatbot", description = "Role-aware assistant API"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
