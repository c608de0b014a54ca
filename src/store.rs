//! Storage operations over MySQL. All queries are runtime-bound; the only
//! identifiers spliced into SQL come from fixed enum allow-lists.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime};
use sqlx::MySqlPool;

use crate::clockin::PunchField;
use crate::error::ApiError;
use crate::model::dispensation::Dispensation;
use crate::model::employee::Employee;
use crate::model::holiday::{Holiday, HolidayScope, HolidayType};
use crate::model::shift::Shift;
use crate::model::time_entry::TimeEntry;

// -------------------- clock ledger --------------------

pub async fn find_clock_entry(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<TimeEntry>, ApiError> {
    sqlx::query_as::<_, TimeEntry>(
        r#"
        SELECT id, employee_id, date, morning_entry, morning_exit,
               afternoon_entry, afternoon_exit, shift_override
        FROM time_entries
        WHERE employee_id = ? AND date = ?
        "#,
    )
    .bind(employee_id)
    .bind(date)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::db("fetch clock entry", e))
}

/// First punch of the day: one INSERT carrying the stamped field, so two
/// racing requests cannot both create the row. `Ok(false)` means the unique
/// key on (employee_id, date) fired and the caller should re-read.
pub async fn try_insert_clock_entry(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
    shift_override: Option<Shift>,
    field: PunchField,
    stamp: NaiveTime,
) -> Result<bool, ApiError> {
    let sql = format!(
        "INSERT INTO time_entries (employee_id, date, shift_override, {}) VALUES (?, ?, ?, ?)",
        field.column()
    );

    let result = sqlx::query(&sql)
        .bind(employee_id)
        .bind(date)
        .bind(shift_override)
        .bind(stamp)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(true),
        Err(e) => {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(false);
                }
            }

            Err(ApiError::db("insert clock entry", e))
        }
    }
}

/// Stamps one field of an existing row, optionally recording a shift
/// override in the same statement. The `IS NULL` guard keeps a lost race
/// from overwriting a stamp; `Ok(false)` reports exactly that.
pub async fn stamp_clock_entry(
    pool: &MySqlPool,
    entry_id: u64,
    field: PunchField,
    stamp: NaiveTime,
    shift_override: Option<Shift>,
) -> Result<bool, ApiError> {
    let column = field.column();

    let result = match shift_override {
        Some(shift) => {
            let sql = format!(
                "UPDATE time_entries SET {column} = ?, shift_override = ? WHERE id = ? AND {column} IS NULL"
            );
            sqlx::query(&sql)
                .bind(stamp)
                .bind(shift)
                .bind(entry_id)
                .execute(pool)
                .await
        }
        None => {
            let sql = format!(
                "UPDATE time_entries SET {column} = ? WHERE id = ? AND {column} IS NULL"
            );
            sqlx::query(&sql)
                .bind(stamp)
                .bind(entry_id)
                .execute(pool)
                .await
        }
    };

    result
        .map(|r| r.rows_affected() > 0)
        .map_err(|e| ApiError::db("stamp clock entry", e))
}

pub async fn clock_entries_between(
    pool: &MySqlPool,
    employee_id: u64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<HashMap<NaiveDate, TimeEntry>, ApiError> {
    let entries = sqlx::query_as::<_, TimeEntry>(
        r#"
        SELECT id, employee_id, date, morning_entry, morning_exit,
               afternoon_entry, afternoon_exit, shift_override
        FROM time_entries
        WHERE employee_id = ? AND date BETWEEN ? AND ?
        "#,
    )
    .bind(employee_id)
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::db("fetch clock entries", e))?;

    Ok(entries.into_iter().map(|e| (e.date, e)).collect())
}

// -------------------- holidays --------------------

/// Holidays that can land in the month: non-recurrent ones dated inside it,
/// recurrent ones sharing its month number regardless of the year. Exact day
/// matching stays with the classifier.
pub async fn holidays_for_month(
    pool: &MySqlPool,
    month: u32,
    year: i32,
) -> Result<Vec<Holiday>, ApiError> {
    sqlx::query_as::<_, Holiday>(
        r#"
        SELECT id, date, name, `type`, recurrent, scope
        FROM holidays
        WHERE (recurrent = FALSE AND MONTH(date) = ? AND YEAR(date) = ?)
           OR (recurrent = TRUE AND MONTH(date) = ?)
        ORDER BY date, id
        "#,
    )
    .bind(month)
    .bind(year)
    .bind(month)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::db("fetch holidays for month", e))
}

/// All dispensation reasons held by an employee, keyed by holiday id.
pub async fn dispensation_reasons(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<HashMap<u64, String>, ApiError> {
    let rows = sqlx::query_as::<_, (u64, String)>(
        "SELECT holiday_id, reason FROM employee_holiday WHERE employee_id = ?",
    )
    .bind(employee_id)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::db("fetch dispensation reasons", e))?;

    Ok(rows.into_iter().collect())
}

pub async fn list_holidays(pool: &MySqlPool) -> Result<Vec<Holiday>, ApiError> {
    sqlx::query_as::<_, Holiday>(
        "SELECT id, date, name, `type`, recurrent, scope FROM holidays ORDER BY date DESC",
    )
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::db("list holidays", e))
}

pub async fn find_holiday(pool: &MySqlPool, id: u64) -> Result<Option<Holiday>, ApiError> {
    sqlx::query_as::<_, Holiday>(
        "SELECT id, date, name, `type`, recurrent, scope FROM holidays WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(|e| ApiError::db("fetch holiday", e))
}

pub async fn dispensations_for_holiday(
    pool: &MySqlPool,
    holiday_id: u64,
) -> Result<Vec<Dispensation>, ApiError> {
    sqlx::query_as::<_, Dispensation>(
        "SELECT id, holiday_id, employee_id, reason FROM employee_holiday WHERE holiday_id = ?",
    )
    .bind(holiday_id)
    .fetch_all(pool)
    .await
    .map_err(|e| ApiError::db("fetch dispensations", e))
}

pub async fn create_holiday(
    pool: &MySqlPool,
    date: NaiveDate,
    name: &str,
    kind: HolidayType,
    recurrent: bool,
    scope: HolidayScope,
    dispensations: &[(u64, String)],
) -> Result<u64, ApiError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::db("begin holiday insert", e))?;

    let result = sqlx::query(
        "INSERT INTO holidays (date, name, `type`, recurrent, scope) VALUES (?, ?, ?, ?, ?)",
    )
    .bind(date)
    .bind(name)
    .bind(kind)
    .bind(recurrent)
    .bind(scope)
    .execute(&mut *tx)
    .await
    .map_err(|e| ApiError::db("insert holiday", e))?;

    let holiday_id = result.last_insert_id();

    if scope == HolidayScope::Partial {
        for (employee_id, reason) in dispensations {
            sqlx::query(
                "INSERT INTO employee_holiday (holiday_id, employee_id, reason) VALUES (?, ?, ?)",
            )
            .bind(holiday_id)
            .bind(employee_id)
            .bind(reason)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::db("insert dispensation", e))?;
        }
    }

    tx.commit()
        .await
        .map_err(|e| ApiError::db("commit holiday insert", e))?;

    Ok(holiday_id)
}

/// Rewrites the holiday and replaces its dispensation set. Saving with any
/// scope other than partial drops every dispensation in the same
/// transaction, so no reason outlives the scope that justified it.
pub async fn update_holiday(
    pool: &MySqlPool,
    id: u64,
    date: NaiveDate,
    name: &str,
    kind: HolidayType,
    recurrent: bool,
    scope: HolidayScope,
    dispensations: &[(u64, String)],
) -> Result<(), ApiError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::db("begin holiday update", e))?;

    sqlx::query(
        "UPDATE holidays SET date = ?, name = ?, `type` = ?, recurrent = ?, scope = ? WHERE id = ?",
    )
    .bind(date)
    .bind(name)
    .bind(kind)
    .bind(recurrent)
    .bind(scope)
    .bind(id)
    .execute(&mut *tx)
    .await
    .map_err(|e| ApiError::db("update holiday", e))?;

    sqlx::query("DELETE FROM employee_holiday WHERE holiday_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await
        .map_err(|e| ApiError::db("clear dispensations", e))?;

    if scope == HolidayScope::Partial {
        for (employee_id, reason) in dispensations {
            sqlx::query(
                "INSERT INTO employee_holiday (holiday_id, employee_id, reason) VALUES (?, ?, ?)",
            )
            .bind(id)
            .bind(employee_id)
            .bind(reason)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::db("insert dispensation", e))?;
        }
    }

    tx.commit()
        .await
        .map_err(|e| ApiError::db("commit holiday update", e))
}

pub async fn delete_holiday(pool: &MySqlPool, id: u64) -> Result<bool, ApiError> {
    // Dispensations go with it via ON DELETE CASCADE.
    sqlx::query("DELETE FROM holidays WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map(|r| r.rows_affected() > 0)
        .map_err(|e| ApiError::db("delete holiday", e))
}

// -------------------- employees --------------------

pub async fn employee_by_id(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, ApiError> {
    sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::db("fetch employee", e))
}

pub async fn employee_id_by_user(
    pool: &MySqlPool,
    user_id: u64,
) -> Result<Option<u64>, ApiError> {
    sqlx::query_scalar::<_, u64>("SELECT id FROM employees WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(pool)
        .await
        .map_err(|e| ApiError::db("fetch employee by user", e))
}

/// True when every id in the slice is an existing employee.
pub async fn employees_exist(pool: &MySqlPool, ids: &[u64]) -> Result<bool, ApiError> {
    if ids.is_empty() {
        return Ok(true);
    }

    let placeholders = vec!["?"; ids.len()].join(", ");
    let sql = format!(
        "SELECT COUNT(DISTINCT id) FROM employees WHERE id IN ({placeholders})"
    );

    let mut query = sqlx::query_scalar::<_, i64>(&sql);
    for id in ids {
        query = query.bind(id);
    }

    let found = query
        .fetch_one(pool)
        .await
        .map_err(|e| ApiError::db("count employees", e))?;

    let distinct: std::collections::HashSet<u64> = ids.iter().copied().collect();
    Ok(found as usize == distinct.len())
}

pub struct NewEmployee<'a> {
    pub name: &'a str,
    pub inscription: &'a str,
    pub department: &'a str,
    pub position: &'a str,
    pub organization: &'a str,
    pub default_shift: Shift,
}

pub struct NewLogin<'a> {
    pub email: &'a str,
    pub password_hash: String,
}

/// Creates the employee and, when credentials come along, the linked login
/// user (role Employee) in one transaction.
pub async fn create_employee(
    pool: &MySqlPool,
    employee: NewEmployee<'_>,
    login: Option<NewLogin<'_>>,
) -> Result<u64, ApiError> {
    let mut tx = pool
        .begin()
        .await
        .map_err(|e| ApiError::db("begin employee insert", e))?;

    let user_id = match login {
        Some(login) => {
            let result = sqlx::query(
                "INSERT INTO users (name, email, password, role_id) VALUES (?, ?, ?, ?)",
            )
            .bind(employee.name)
            .bind(login.email)
            .bind(&login.password_hash)
            .bind(crate::model::role::Role::Employee as u8)
            .execute(&mut *tx)
            .await
            .map_err(|e| ApiError::db("insert login user", e))?;

            Some(result.last_insert_id())
        }
        None => None,
    };

    let result = sqlx::query(
        r#"
        INSERT INTO employees (name, inscription, department, position, organization, default_shift, user_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee.name)
    .bind(employee.inscription)
    .bind(employee.department)
    .bind(employee.position)
    .bind(employee.organization)
    .bind(employee.default_shift)
    .bind(user_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| ApiError::db("insert employee", e))?;

    let employee_id = result.last_insert_id();

    tx.commit()
        .await
        .map_err(|e| ApiError::db("commit employee insert", e))?;

    Ok(employee_id)
}

pub async fn delete_employee(pool: &MySqlPool, id: u64) -> Result<bool, ApiError> {
    // Ledger rows and dispensations cascade.
    sqlx::query("DELETE FROM employees WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await
        .map(|r| r.rows_affected() > 0)
        .map_err(|e| ApiError::db("delete employee", e))
}
