use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, Local, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::classify::{self, DayKind, classify_day};
use crate::clockin::{self, PunchField};
use crate::error::ApiError;
use crate::labels;
use crate::model::employee::Employee;
use crate::model::shift::Shift;
use crate::store;
use crate::utils::holiday_cache;

#[derive(Debug, Deserialize, ToSchema)]
pub struct ClockInReq {
    /// Shift to punch on; defaults to the stored override, then the
    /// employee default.
    pub shift: Option<Shift>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CalendarQuery {
    pub month: Option<u32>,
    pub year: Option<i32>,
}

#[derive(Serialize, ToSchema)]
pub struct CalendarDay {
    #[schema(example = "05/01")]
    pub date: String,
    #[schema(example = "Segunda")]
    pub weekday: String,
    pub kind: DayKind,
    #[schema(example = "08:02", value_type = Option<String>, format = "time")]
    pub morning_entry: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub morning_exit: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub afternoon_entry: Option<NaiveTime>,
    #[schema(value_type = Option<String>, format = "time")]
    pub afternoon_exit: Option<NaiveTime>,
    #[schema(example = "Fim de semana")]
    pub observation: Option<String>,
}

async fn employee_profile(
    pool: &MySqlPool,
    auth: &AuthUser,
) -> Result<Employee, actix_web::Error> {
    let employee_id: u64 = auth
        .employee_id
        .ok_or_else(|| actix_web::error::ErrorForbidden("No employee profile"))?;

    let employee = store::employee_by_id(pool, employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Colaborador não encontrado"))?;

    Ok(employee)
}

fn punched(field: PunchField, stamp: NaiveTime) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": labels::CLOCKED_IN_TITLE,
        "detail": format!(
            "{} registrado às {}.",
            labels::punch_field_label(field),
            stamp.format("%H:%M")
        ),
    }))
}

fn shift_complete() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": labels::SHIFT_COMPLETE }))
}

/// Punch the next open slot of the selected shift
#[utoipa::path(
    post,
    path = "/api/v1/attendance/clock-in",
    request_body = ClockInReq,
    responses(
        (status = 200, description = "Punch recorded, or nothing left to punch", body = Object, example = json!({
            "message": "Ponto marcado!",
            "detail": "Entrada Manhã registrado às 08:02."
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn clock_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    body: Option<web::Json<ClockInReq>>,
) -> actix_web::Result<impl Responder> {
    let employee = employee_profile(pool.get_ref(), &auth).await?;
    let requested = body.and_then(|b| b.shift);

    let now = Local::now().naive_local();
    let today = now.date();
    let stamp = clockin::minute_stamp(now.time());

    let entry = match store::find_clock_entry(pool.get_ref(), employee.id, today).await? {
        None => {
            let shift = clockin::resolve_shift(requested, None, employee.default_shift);
            if let Some(field) = clockin::next_field(None, shift) {
                let inserted = store::try_insert_clock_entry(
                    pool.get_ref(),
                    employee.id,
                    today,
                    clockin::shift_override(shift, employee.default_shift),
                    field,
                    stamp,
                )
                .await?;

                if inserted {
                    return Ok(punched(field, stamp));
                }
            }

            // A concurrent punch created today's row first; stamp that one.
            match store::find_clock_entry(pool.get_ref(), employee.id, today).await? {
                Some(entry) => entry,
                None => {
                    tracing::error!(
                        employee_id = employee.id,
                        "Clock entry missing after duplicate-key conflict"
                    );
                    return Err(ApiError::Internal.into());
                }
            }
        }
        Some(entry) => entry,
    };

    let shift = clockin::resolve_shift(requested, Some(&entry), employee.default_shift);
    let Some(field) = clockin::next_field(Some(&entry), shift) else {
        return Ok(shift_complete());
    };

    let override_update = match clockin::shift_override(shift, employee.default_shift) {
        Some(selected) if entry.shift_override != Some(selected) => Some(selected),
        _ => None,
    };

    let stamped =
        store::stamp_clock_entry(pool.get_ref(), entry.id, field, stamp, override_update).await?;

    if stamped {
        Ok(punched(field, stamp))
    } else {
        Ok(shift_complete())
    }
}

/// Today's ledger row and the next open slot
#[utoipa::path(
    get,
    path = "/api/v1/attendance/today",
    responses(
        (status = 200, description = "Today's punches and what comes next", body = Object, example = json!({
            "date": "2026-01-05",
            "shift": "morning",
            "next_field": "morning_exit",
            "entry": {
                "id": 1,
                "employee_id": 1,
                "date": "2026-01-05",
                "morning_entry": "08:02:00",
                "morning_exit": null,
                "afternoon_entry": null,
                "afternoon_exit": null,
                "shift_override": null
            }
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let employee = employee_profile(pool.get_ref(), &auth).await?;

    let today = Local::now().date_naive();
    let entry = store::find_clock_entry(pool.get_ref(), employee.id, today).await?;
    let shift = clockin::resolve_shift(None, entry.as_ref(), employee.default_shift);
    let next_field = clockin::next_field(entry.as_ref(), shift);

    Ok(HttpResponse::Ok().json(json!({
        "date": today,
        "shift": shift,
        "next_field": next_field,
        "entry": entry,
    })))
}

/// Classified calendar of the authenticated employee's month
#[utoipa::path(
    get,
    path = "/api/v1/attendance/calendar",
    params(
        ("month", Query, description = "Month 1-12, defaults to the current month"),
        ("year", Query, description = "Year, defaults to the current year")
    ),
    responses(
        (status = 200, description = "One classified row per calendar day", body = Object, example = json!({
            "month": 1,
            "year": 2026,
            "days": [{
                "date": "01/01",
                "weekday": "Quinta",
                "kind": "holiday",
                "morning_entry": null,
                "morning_exit": null,
                "afternoon_entry": null,
                "afternoon_exit": null,
                "observation": "Confraternização Universal"
            }]
        })),
        (status = 400, description = "Invalid month or year"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "No employee profile"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn calendar(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    let employee = employee_profile(pool.get_ref(), &auth).await?;

    let today = Local::now().date_naive();
    let month = query.month.unwrap_or(today.month());
    let year = query.year.unwrap_or(today.year());
    let start = super::month_param(month, year)?;
    let end = classify::month_end(start);

    let holidays = holiday_cache::holidays_for_month(pool.get_ref(), month, year).await?;
    let entries = store::clock_entries_between(pool.get_ref(), employee.id, start, end).await?;
    let reasons = store::dispensation_reasons(pool.get_ref(), employee.id).await?;

    let mut days = Vec::with_capacity(end.day() as usize);
    for number in 1..=end.day() {
        let Some(date) = start.with_day(number) else {
            continue;
        };

        let entry = entries.get(&date);
        let class = classify_day(date, entry, &holidays, &reasons, today);

        days.push(CalendarDay {
            date: date.format("%d/%m").to_string(),
            weekday: labels::weekday_name(date.weekday()).to_string(),
            kind: class.kind,
            morning_entry: entry.and_then(|e| e.morning_entry),
            morning_exit: entry.and_then(|e| e.morning_exit),
            afternoon_entry: entry.and_then(|e| e.afternoon_entry),
            afternoon_exit: entry.and_then(|e| e.afternoon_exit),
            observation: class.observation,
        });
    }

    Ok(HttpResponse::Ok().json(json!({
        "month": month,
        "year": year,
        "days": days,
    })))
}
