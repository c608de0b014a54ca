use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::shift::Shift;

/// One clock ledger row. At most one per (employee, date), enforced by a
/// unique key in the database.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct TimeEntry {
    pub id: u64,
    pub employee_id: u64,

    #[schema(example = "2026-03-02", value_type = String, format = "date")]
    pub date: NaiveDate,

    #[schema(example = "08:00:00", value_type = Option<String>, format = "time")]
    pub morning_entry: Option<NaiveTime>,

    #[schema(example = "12:00:00", value_type = Option<String>, format = "time")]
    pub morning_exit: Option<NaiveTime>,

    #[schema(example = "14:00:00", value_type = Option<String>, format = "time")]
    pub afternoon_entry: Option<NaiveTime>,

    #[schema(example = "18:00:00", value_type = Option<String>, format = "time")]
    pub afternoon_exit: Option<NaiveTime>,

    pub shift_override: Option<Shift>,
}

impl TimeEntry {
    pub fn has_any_time(&self) -> bool {
        self.morning_entry.is_some()
            || self.morning_exit.is_some()
            || self.afternoon_entry.is_some()
            || self.afternoon_exit.is_some()
    }

    /// Morning entry/exit then afternoon entry/exit, the sheet column order.
    pub fn times(&self) -> [Option<NaiveTime>; 4] {
        [
            self.morning_entry,
            self.morning_exit,
            self.afternoon_entry,
            self.afternoon_exit,
        ]
    }
}
