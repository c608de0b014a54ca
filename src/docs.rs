use crate::api::attendance::{CalendarDay, CalendarQuery, ClockInReq};
use crate::api::employee::{CreateEmployee, EmployeeListResponse, EmployeeQuery};
use crate::api::holiday::{DispensationReq, HolidayDetail, HolidayReq};
use crate::api::report::{ReportFormat, ReportQuery};
use crate::classify::DayKind;
use crate::clockin::PunchField;
use crate::model::dispensation::Dispensation;
use crate::model::employee::Employee;
use crate::model::holiday::{Holiday, HolidayScope, HolidayType};
use crate::model::shift::Shift;
use crate::model::time_entry::TimeEntry;
use crate::models::CreateUserReq;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Pontua API",
        version = "1.0.0",
        description = r#"
## Pontua - Registro de Ponto e Frequência

This API powers **Pontua**, an attendance tracking system for public-sector agencies:
employees punch their daily clock, managers maintain the holiday calendar, and the
system renders the official monthly frequency sheet.

### 🔹 Key Features
- **Employee Management**
  - Create, update, list, and view employee records with optional login accounts
- **Holiday Calendar**
  - Holidays, optional points, and partial dispensations with per-employee reasons
- **Attendance**
  - Shift-aware clock-in that fills morning/afternoon entry and exit slots in order
- **Frequency Reports**
  - Monthly sheets as `.xlsx` workbooks or print-ready HTML, per employee or for everyone

### 🔐 Security
Most endpoints are protected using **JWT Bearer authentication**.
Only **Admin** or **Manager** roles can manage employees, holidays, and reports;
clock-in endpoints require a linked employee profile.

### 📦 Response Format
- JSON-based RESTful responses
- Report downloads carry a `Content-Disposition` attachment header

### 🚀 Usage
Use this API to build:
- Clock-in kiosks and self-service portals
- HR calendars
- Monthly frequency sheet archives

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::create_user,

        crate::api::attendance::clock_in,
        crate::api::attendance::today,
        crate::api::attendance::calendar,

        crate::api::employee::create_employee,
        crate::api::employee::get_employee,
        crate::api::employee::list_employees,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::holiday::create_holiday,
        crate::api::holiday::get_holiday,
        crate::api::holiday::list_holidays,
        crate::api::holiday::update_holiday,
        crate::api::holiday::delete_holiday,

        crate::api::report::frequency
    ),
    components(
        schemas(
            CreateUserReq,
            ClockInReq,
            CalendarQuery,
            CalendarDay,
            DayKind,
            PunchField,
            Shift,
            TimeEntry,
            CreateEmployee,
            EmployeeQuery,
            EmployeeListResponse,
            Employee,
            HolidayReq,
            DispensationReq,
            HolidayDetail,
            Holiday,
            HolidayType,
            HolidayScope,
            Dispensation,
            ReportFormat,
            ReportQuery
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "User", description = "Login account APIs"),
        (name = "Attendance", description = "Clock-in and calendar APIs"),
        (name = "Employee", description = "Employee management APIs"),
        (name = "Holiday", description = "Holiday calendar APIs"),
        (name = "Report", description = "Frequency sheet APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
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
}
