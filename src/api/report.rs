use actix_web::{HttpResponse, Responder, http::header, web};
use chrono::Local;
use futures_util::TryStreamExt;
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::labels;
use crate::model::employee::Employee;
use crate::report::{self, FrequencySheet, print, xlsx};
use crate::store;

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Xlsx,
    Print,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct ReportQuery {
    pub month: u32,
    pub year: i32,
    /// Defaults to xlsx.
    pub format: Option<ReportFormat>,
    /// One employee's sheet; omit for the whole staff.
    pub employee_id: Option<u64>,
}

/// Monthly frequency sheets as a download
#[utoipa::path(
    get,
    path = "/api/v1/reports/frequency",
    params(
        ("month", Query, description = "Month 1-12"),
        ("year", Query, description = "Year"),
        ("format", Query, description = "xlsx or print"),
        ("employee_id", Query, description = "Single employee; omit for all")
    ),
    responses(
        (status = 200, description = "Spreadsheet or print document attachment"),
        (status = 400, description = "Invalid month, year or format"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Report",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn frequency(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ReportQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let query = query.into_inner();
    super::month_param(query.month, query.year)?;

    let format = query.format.unwrap_or(ReportFormat::Xlsx);
    let today = Local::now().date_naive();

    match query.employee_id {
        Some(employee_id) => {
            let employee = store::employee_by_id(pool.get_ref(), employee_id)
                .await?
                .ok_or_else(|| ApiError::not_found("Colaborador não encontrado"))?;

            let sheet =
                report::load_sheet(pool.get_ref(), employee, query.month, query.year, today)
                    .await?;

            let stem = format!(
                "frequencia-{}-{}-{}",
                sheet.employee.inscription, query.month, query.year
            );

            artifact(format, std::slice::from_ref(&sheet), &stem)
        }
        None => {
            let mut rows = sqlx::query_as::<_, Employee>("SELECT * FROM employees ORDER BY name")
                .fetch(pool.get_ref());

            let mut sheets = Vec::new();
            while let Some(employee) = rows
                .try_next()
                .await
                .map_err(|e| ApiError::db("stream employees", e))?
            {
                let sheet =
                    report::load_sheet(pool.get_ref(), employee, query.month, query.year, today)
                        .await?;
                sheets.push(sheet);
            }

            if sheets.is_empty() {
                return Err(ApiError::validation("Nenhum colaborador cadastrado").into());
            }

            let month_name = labels::month_file_name(query.month).unwrap_or_default();
            let stem = format!("frequencias-{}-{}", month_name, query.year);

            artifact(format, &sheets, &stem)
        }
    }
}

fn artifact(
    format: ReportFormat,
    sheets: &[FrequencySheet],
    stem: &str,
) -> Result<HttpResponse, actix_web::Error> {
    match format {
        ReportFormat::Xlsx => {
            let buffer = xlsx::render_batch(sheets).map_err(|e| {
                tracing::error!(error = %e, "Failed to render spreadsheet");
                ApiError::Internal
            })?;

            Ok(download(buffer, format!("{stem}.xlsx"), XLSX_CONTENT_TYPE))
        }
        ReportFormat::Print => {
            let html = print::render_batch(sheets);

            Ok(download(html.into_bytes(), format!("{stem}.html"), HTML_CONTENT_TYPE))
        }
    }
}

fn download(bytes: Vec<u8>, filename: String, content_type: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(content_type)
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .body(bytes)
}
