use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

/// Nature of a calendar entry. Stored as a lowercase string in MySQL.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HolidayType {
    Holiday,
    Optional,
    Partial,
}

/// Who a calendar entry applies to: everyone, or only dispensed employees.
#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, sqlx::Type, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HolidayScope {
    All,
    Partial,
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "date": "2026-04-21",
        "name": "Tiradentes",
        "type": "holiday",
        "recurrent": true,
        "scope": "all"
    })
)]
pub struct Holiday {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "2026-04-21", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "Tiradentes")]
    pub name: String,

    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    #[schema(example = "holiday")]
    pub kind: HolidayType,

    #[schema(example = true)]
    pub recurrent: bool,

    #[schema(example = "all")]
    pub scope: HolidayScope,
}

impl Holiday {
    /// Recurrent entries match by month and day regardless of the stored year.
    pub fn matches(&self, date: NaiveDate) -> bool {
        if self.recurrent {
            self.date.month() == date.month() && self.date.day() == date.day()
        } else {
            self.date == date
        }
    }
}
