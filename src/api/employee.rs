use std::str::FromStr;

use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use sqlx::MySqlPool;
use tracing::{debug, error};
use utoipa::ToSchema;

use crate::auth::auth::AuthUser;
use crate::auth::password::hash_password;
use crate::error::ApiError;
use crate::model::employee::Employee;
use crate::model::shift::Shift;
use crate::store::{self, NewEmployee, NewLogin};
use crate::utils::db_utils::{build_update_sql, execute_update};

/// Columns the PUT payload may touch.
const UPDATABLE_COLUMNS: &[&str] = &[
    "name",
    "inscription",
    "department",
    "position",
    "organization",
    "default_shift",
];

#[derive(Deserialize, Serialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "Maria Silva")]
    pub name: String,
    #[schema(example = "100001")]
    pub inscription: String,
    #[schema(example = "TI")]
    pub department: String,
    #[schema(example = "Analista de Sistemas")]
    pub position: String,
    #[schema(example = "AGED-MA")]
    pub organization: String,
    /// Defaults to morning.
    pub default_shift: Option<Shift>,
    /// Provisions a login for the employee; must come with `password`.
    #[schema(example = "maria.silva@aged.ma.gov.br", format = "email")]
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EmployeeQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
    pub department: Option<String>,
    pub search: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    #[schema(
    example = json!([{
        "id": 1,
        "name": "Maria Silva",
        "inscription": "100001",
        "department": "TI",
        "position": "Analista de Sistemas",
        "organization": "AGED-MA",
        "default_shift": "morning",
        "user_id": 7
    }])
)]
    pub data: Vec<Employee>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 20)]
    pub per_page: u32,
    #[schema(example = 42)]
    pub total: i64,
}

/// Create Employee
#[utoipa::path(
    post,
    path = "/api/v1/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = Object, example = json!({
            "message": "Colaborador criado com sucesso",
            "id": 1
        })),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 409, description = "Duplicate inscription or email"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateEmployee>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let payload = payload.into_inner();
    let name = payload.name.trim();
    let inscription = payload.inscription.trim();

    if name.is_empty() || inscription.is_empty() {
        return Err(ApiError::validation("Nome e inscrição são obrigatórios").into());
    }

    let login = match (&payload.email, &payload.password) {
        (Some(email), Some(password)) => Some(NewLogin {
            email: email.trim(),
            password_hash: hash_password(password),
        }),
        (None, None) => None,
        _ => {
            return Err(
                ApiError::validation("Email e senha devem ser informados juntos").into(),
            );
        }
    };

    let employee = NewEmployee {
        name,
        inscription,
        department: payload.department.trim(),
        position: payload.position.trim(),
        organization: payload.organization.trim(),
        default_shift: payload.default_shift.unwrap_or(Shift::Morning),
    };

    let id = store::create_employee(pool.get_ref(), employee, login).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": "Colaborador criado com sucesso",
        "id": id
    })))
}

#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(
        ("page", Query, description = "Page number"),
        ("per_page", Query, description = "Items per page"),
        ("department", Query, description = "Filter by department"),
        ("search", Query, description = "Search by name, inscription or department")
    ),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<EmployeeQuery>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let page = query.page.unwrap_or(1).max(1);
    let per_page = query.per_page.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * per_page;

    // ---------- build WHERE clause dynamically ----------
    let mut conditions = Vec::new();
    let mut bindings: Vec<sqlx::types::JsonValue> = Vec::new();

    if let Some(department) = &query.department {
        conditions.push("department = ?");
        bindings.push(department.clone().into());
    }

    if let Some(search) = &query.search {
        conditions.push("(name LIKE ? OR inscription LIKE ? OR department LIKE ?)");
        let like = format!("%{}%", search);
        bindings.push(like.clone().into());
        bindings.push(like.clone().into());
        bindings.push(like.into());
    }

    let where_clause = if conditions.is_empty() {
        "".to_string()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    // ---------- total count ----------
    let count_sql = format!("SELECT COUNT(*) as total FROM employees {}", where_clause);
    debug!(sql = %count_sql, bindings = ?bindings, "Counting employees");

    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &bindings {
        count_query = count_query.bind(b);
    }

    let total = count_query.fetch_one(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %count_sql, "Failed to count employees");
        ApiError::Internal
    })?;

    // ---------- data query ----------
    let data_sql = format!(
        "SELECT * FROM employees {} ORDER BY name LIMIT ? OFFSET ?",
        where_clause
    );
    debug!(sql = %data_sql, bindings = ?bindings, page, per_page, offset, "Fetching employees");

    let mut data_query = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &bindings {
        data_query = data_query.bind(b);
    }
    data_query = data_query.bind(per_page as i64).bind(offset as i64);

    let employees = data_query.fetch_all(pool.get_ref()).await.map_err(|e| {
        error!(error = %e, sql = %data_sql, "Failed to fetch employees");
        ApiError::Internal
    })?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data: employees,
        page,
        per_page,
        total,
    }))
}

/// Update Employee
#[utoipa::path(
    put,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    request_body = Object,
    responses(
        (status = 200, description = "Employee updated", body = Object, example = json!({
            "message": "Colaborador atualizado com sucesso"
        })),
        (status = 400, description = "Unknown or invalid field"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let employee_id = path.into_inner();

    if let Some(value) = body.get("default_shift") {
        let valid = value
            .as_str()
            .is_some_and(|s| Shift::from_str(s).is_ok());
        if !valid {
            return Err(ApiError::validation("Turno inválido").into());
        }
    }

    let update = build_update_sql("employees", &body, UPDATABLE_COLUMNS, "id", employee_id)?;

    let affected = execute_update(pool.get_ref(), update)
        .await
        .map_err(|e| ApiError::db("update employee", e))?;

    if affected == 0 && store::employee_by_id(pool.get_ref(), employee_id).await?.is_none() {
        return Err(ApiError::not_found("Colaborador não encontrado").into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Colaborador atualizado com sucesso"
    })))
}

/// Delete Employee
#[utoipa::path(
    delete,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee deleted", body = Object, example = json!({
            "message": "Colaborador excluído com sucesso"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let employee_id = path.into_inner();

    if !store::delete_employee(pool.get_ref(), employee_id).await? {
        return Err(ApiError::not_found("Colaborador não encontrado").into());
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Colaborador excluído com sucesso"
    })))
}

/// Get Employee by ID
#[utoipa::path(
    get,
    path = "/api/v1/employees/{employee_id}",
    params(
        ("employee_id", Path, description = "Employee ID")
    ),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found", body = Object, example = json!({
            "message": "Colaborador não encontrado"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Employee",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    auth.require_manager_or_admin()?;

    let employee_id = path.into_inner();

    let employee = store::employee_by_id(pool.get_ref(), employee_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Colaborador não encontrado"))?;

    Ok(HttpResponse::Ok().json(employee))
}
