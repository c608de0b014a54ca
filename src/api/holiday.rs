use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sqlx::MySqlPool;
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::dispensation::Dispensation;
use crate::model::holiday::{Holiday, HolidayScope, HolidayType};
use crate::store;
use crate::utils::holiday_cache;

#[derive(Debug, Deserialize, ToSchema)]
pub struct DispensationReq {
    #[schema(example = 1)]
    pub employee_id: u64,
    #[schema(example = "Plantão da campanha de vacinação")]
    pub reason: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct HolidayReq {
    #[schema(example = "2026-02-09", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Carnaval")]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: HolidayType,
    /// Matches every year by month and day when set.
    pub recurrent: Option<bool>,
    pub scope: HolidayScope,
    /// Required when scope is partial; ignored otherwise.
    pub dispensations: Option<Vec<DispensationReq>>,
}

#[derive(Serialize, ToSchema)]
pub struct HolidayDetail {
    pub holiday: Holiday,
    pub dispensations: Vec<Dispensation>,
}

/// Validates the payload and flattens the dispensation list for storage.
fn dispensation_rows(payload: &HolidayReq) -> Result<Vec<(u64, String)>, ApiError> {
    if payload.scope != HolidayScope::Partial {
        return Ok(Vec::new());
    }

    let rows: Vec<(u64, String)> = payload
        .dispensations
        .iter()
        .flatten()
        .filter(|d| !d.reason.trim().is_empty())
        .map(|d| (d.employee_id, d.reason.trim().to_string()))
        .collect();

    if rows.is_empty() {
        return Err(ApiError::validation(
            "Informe ao menos uma dispensa com motivo",
        ));
    }

    Ok(rows)
}

async fn check_employees(pool: &MySqlPool, rows: &[(u64, String)]) -> Result<(), ApiError> {
    let ids: Vec<u64> = rows.iter().map(|(id, _)| *id).collect();

    if !store::employees_exist(pool, &ids).await? {
        return Err(ApiError::not_found("Colaborador não encontrado"));
    }

    Ok(())
}

/// Create Holiday
#[utoipa::path(
    post,
    path = "/api/v1/holidays",
    request_body = HolidayReq,
    responses(
        (status = 200, description = "Holiday created", body = Object, example = json!({
            "message": "Feriado criado com sucesso",
            "id": 1
        })),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Dispensation references an unknown employee"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Holiday",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<HolidayReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let payload = payload.into_inner();
    let name = payload.name.trim().to_string();

    if name.is_empty() {
        return Err(ApiError::validation("Nome é obrigatório").into());
    }

    let rows = dispensation_rows(&payload)?;
    check_employees(pool.get_ref(), &rows).await?;

    let id = store::create_holiday(
        pool.get_ref(),
        payload.date,
        &name,
        payload.kind,
        payload.recurrent.unwrap_or(false),
        payload.scope,
        &rows,
    )
    .await?;

    holiday_cache::invalidate();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Feriado criado com sucesso",
        "id": id
    })))
}

/// List Holidays
#[utoipa::path(
    get,
    path = "/api/v1/holidays",
    responses(
        (status = 200, description = "Holidays, most recent first", body = [Holiday]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Holiday",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_holidays(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let holidays = store::list_holidays(pool.get_ref()).await?;

    Ok(HttpResponse::Ok().json(holidays))
}

/// Get Holiday by ID
#[utoipa::path(
    get,
    path = "/api/v1/holidays/{holiday_id}",
    params(
        ("holiday_id", Path, description = "Holiday ID")
    ),
    responses(
        (status = 200, description = "Holiday with its dispensations", body = HolidayDetail),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found", body = Object, example = json!({
            "message": "Feriado não encontrado"
        }))
    ),
    tag = "Holiday",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let holiday_id = path.into_inner();

    let holiday = store::find_holiday(pool.get_ref(), holiday_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Feriado não encontrado"))?;

    let dispensations = store::dispensations_for_holiday(pool.get_ref(), holiday_id).await?;

    Ok(HttpResponse::Ok().json(HolidayDetail {
        holiday,
        dispensations,
    }))
}

/// Update Holiday
#[utoipa::path(
    put,
    path = "/api/v1/holidays/{holiday_id}",
    params(
        ("holiday_id", Path, description = "Holiday ID")
    ),
    request_body = HolidayReq,
    responses(
        (status = 200, description = "Holiday updated", body = Object, example = json!({
            "message": "Feriado atualizado com sucesso"
        })),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Holiday",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<HolidayReq>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let holiday_id = path.into_inner();
    let payload = payload.into_inner();
    let name = payload.name.trim().to_string();

    if name.is_empty() {
        return Err(ApiError::validation("Nome é obrigatório").into());
    }

    if store::find_holiday(pool.get_ref(), holiday_id).await?.is_none() {
        return Err(ApiError::not_found("Feriado não encontrado").into());
    }

    let rows = dispensation_rows(&payload)?;
    check_employees(pool.get_ref(), &rows).await?;

    store::update_holiday(
        pool.get_ref(),
        holiday_id,
        payload.date,
        &name,
        payload.kind,
        payload.recurrent.unwrap_or(false),
        payload.scope,
        &rows,
    )
    .await?;

    holiday_cache::invalidate();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Feriado atualizado com sucesso"
    })))
}

/// Delete Holiday
#[utoipa::path(
    delete,
    path = "/api/v1/holidays/{holiday_id}",
    params(
        ("holiday_id", Path, description = "Holiday ID")
    ),
    responses(
        (status = 200, description = "Holiday deleted", body = Object, example = json!({
            "message": "Feriado excluído com sucesso"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Holiday not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Holiday",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let holiday_id = path.into_inner();

    if !store::delete_holiday(pool.get_ref(), holiday_id).await? {
        return Err(ApiError::not_found("Feriado não encontrado").into());
    }

    holiday_cache::invalidate();

    Ok(HttpResponse::Ok().json(json!({
        "message": "Feriado excluído com sucesso"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(scope: HolidayScope, dispensations: Option<Vec<DispensationReq>>) -> HolidayReq {
        HolidayReq {
            date: NaiveDate::from_ymd_opt(2026, 2, 9).unwrap(),
            name: "Carnaval".to_string(),
            kind: HolidayType::Holiday,
            recurrent: None,
            scope,
            dispensations,
        }
    }

    #[test]
    fn full_scope_drops_the_dispensation_list() {
        let req = payload(
            HolidayScope::All,
            Some(vec![DispensationReq {
                employee_id: 1,
                reason: "Plantão".to_string(),
            }]),
        );

        assert_eq!(dispensation_rows(&req).unwrap(), Vec::new());
    }

    #[test]
    fn partial_scope_requires_a_reasoned_dispensation() {
        assert!(dispensation_rows(&payload(HolidayScope::Partial, None)).is_err());

        let blank = payload(
            HolidayScope::Partial,
            Some(vec![DispensationReq {
                employee_id: 1,
                reason: "   ".to_string(),
            }]),
        );
        assert!(dispensation_rows(&blank).is_err());
    }

    #[test]
    fn partial_scope_keeps_trimmed_reasons() {
        let req = payload(
            HolidayScope::Partial,
            Some(vec![
                DispensationReq {
                    employee_id: 1,
                    reason: " Plantão ".to_string(),
                },
                DispensationReq {
                    employee_id: 2,
                    reason: String::new(),
                },
            ]),
        );

        assert_eq!(
            dispensation_rows(&req).unwrap(),
            vec![(1, "Plantão".to_string())]
        );
    }
}
