//! Monthly frequency sheet assembly. One builder feeds both renderings, so
//! the grid can never disagree between the spreadsheet and the print
//! document.

pub mod print;
pub mod xlsx;

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime};
use sqlx::MySqlPool;

use crate::classify::{self, DayClass, DayKind, classify_day};
use crate::error::ApiError;
use crate::labels;
use crate::model::employee::Employee;
use crate::model::holiday::Holiday;
use crate::model::time_entry::TimeEntry;
use crate::store;
use crate::utils::holiday_cache;

/// Sheets always carry 31 day rows; rows past the month's end stay blank.
pub const MAX_DAYS: u32 = 31;

#[derive(Debug, Clone)]
pub struct DayRow {
    /// Zero-padded day number, "01" through "31".
    pub number: String,
    /// `None` for rows beyond the month's last day.
    pub kind: Option<DayKind>,
    pub morning_entry: Option<NaiveTime>,
    pub morning_exit: Option<NaiveTime>,
    pub afternoon_entry: Option<NaiveTime>,
    pub afternoon_exit: Option<NaiveTime>,
    /// Signature name printed beside each stamped time on present days.
    pub witness: Option<String>,
}

impl DayRow {
    fn blank(number: u32) -> Self {
        Self {
            number: format!("{number:02}"),
            kind: None,
            morning_entry: None,
            morning_exit: None,
            afternoon_entry: None,
            afternoon_exit: None,
            witness: None,
        }
    }

    /// Times in sheet column order.
    pub fn times(&self) -> [Option<NaiveTime>; 4] {
        [
            self.morning_entry,
            self.morning_exit,
            self.afternoon_entry,
            self.afternoon_exit,
        ]
    }
}

#[derive(Debug, Clone)]
pub struct FrequencySheet {
    pub employee: Employee,
    pub month: u32,
    pub year: i32,
    pub month_name: String,
    /// "dd/mm/yyyy A dd/mm/yyyy", first to last day of the month.
    pub period: String,
    pub days: Vec<DayRow>,
    pub observations: Vec<String>,
}

impl FrequencySheet {
    pub fn joined_observations(&self) -> String {
        self.observations.join("; ")
    }
}

/// Builds the 31-row sheet for the month starting at `start`.
pub fn build_sheet(
    employee: &Employee,
    start: NaiveDate,
    entries: &HashMap<NaiveDate, TimeEntry>,
    holidays: &[Holiday],
    reasons: &HashMap<u64, String>,
    today: NaiveDate,
) -> FrequencySheet {
    let end = classify::month_end(start);
    let mut days = Vec::with_capacity(MAX_DAYS as usize);
    let mut observations = Vec::new();

    for number in 1..=MAX_DAYS {
        let mut row = DayRow::blank(number);

        if let Some(date) = start.with_day(number) {
            let entry = entries.get(&date);
            let class = classify_day(date, entry, holidays, reasons, today);

            push_observation(&mut observations, date.day(), &class);
            row.kind = Some(class.kind);

            if class.kind == DayKind::Present {
                if let Some(entry) = entry {
                    row.morning_entry = entry.morning_entry;
                    row.morning_exit = entry.morning_exit;
                    row.afternoon_entry = entry.afternoon_entry;
                    row.afternoon_exit = entry.afternoon_exit;
                    row.witness = Some(employee.name.clone());
                }
            }
        }

        days.push(row);
    }

    FrequencySheet {
        employee: employee.clone(),
        month: start.month(),
        year: start.year(),
        month_name: labels::month_name(start.month()).unwrap_or_default().to_string(),
        period: format!(
            "{} A {}",
            start.format("%d/%m/%Y"),
            end.format("%d/%m/%Y")
        ),
        days,
        observations,
    }
}

/// Lists the day on the sheet footer when its classification carries an
/// observation worth naming. Day numbers are not zero-padded here.
fn push_observation(observations: &mut Vec<String>, day: u32, class: &DayClass) {
    let Some(observation) = &class.observation else {
        return;
    };

    if let Some(label) = labels::observation_kind_label(class.kind) {
        observations.push(format!("Dia {day} - {label}: {observation}"));
    }
}

/// Fetches a month of ledger and calendar state and builds the sheet.
pub async fn load_sheet(
    pool: &MySqlPool,
    employee: Employee,
    month: u32,
    year: i32,
    today: NaiveDate,
) -> Result<FrequencySheet, ApiError> {
    let start = classify::month_start(year, month)
        .ok_or_else(|| ApiError::validation("Mês inválido"))?;
    let end = classify::month_end(start);

    let holidays = holiday_cache::holidays_for_month(pool, month, year).await?;
    let entries = store::clock_entries_between(pool, employee.id, start, end).await?;
    let reasons = store::dispensation_reasons(pool, employee.id).await?;

    Ok(build_sheet(&employee, start, &entries, &holidays, &reasons, today))
}

/// Worksheet titles are capped at 31 characters by the xlsx format.
pub fn sheet_title(name: &str) -> String {
    name.chars().take(31).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::holiday::{HolidayScope, HolidayType};
    use crate::model::shift::Shift;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn employee() -> Employee {
        Employee {
            id: 1,
            name: "Maria Silva".to_string(),
            inscription: "100001".to_string(),
            department: "TI".to_string(),
            position: "Analista de Sistemas".to_string(),
            organization: "AGED-MA".to_string(),
            default_shift: Shift::Morning,
            user_id: None,
        }
    }

    fn entry(on: NaiveDate, times: [Option<NaiveTime>; 4]) -> TimeEntry {
        TimeEntry {
            id: 1,
            employee_id: 1,
            date: on,
            morning_entry: times[0],
            morning_exit: times[1],
            afternoon_entry: times[2],
            afternoon_exit: times[3],
            shift_override: None,
        }
    }

    fn holiday(
        id: u64,
        on: NaiveDate,
        name: &str,
        kind: HolidayType,
        recurrent: bool,
        scope: HolidayScope,
    ) -> Holiday {
        Holiday {
            id,
            date: on,
            name: name.to_string(),
            kind,
            recurrent,
            scope,
        }
    }

    fn today() -> NaiveDate {
        date(2026, 6, 15)
    }

    #[test]
    fn sheet_always_has_31_rows() {
        let sheet = build_sheet(
            &employee(),
            date(2026, 2, 1),
            &HashMap::new(),
            &[],
            &HashMap::new(),
            today(),
        );

        assert_eq!(sheet.days.len(), 31);
        assert_eq!(sheet.days[0].number, "01");
        assert_eq!(sheet.days[30].number, "31");
    }

    #[test]
    fn rows_beyond_february_stay_blank() {
        let sheet = build_sheet(
            &employee(),
            date(2026, 2, 1),
            &HashMap::new(),
            &[],
            &HashMap::new(),
            today(),
        );

        for row in &sheet.days[28..] {
            assert_eq!(row.kind, None, "row {}", row.number);
            assert_eq!(row.times(), [None; 4]);
            assert_eq!(row.witness, None);
        }

        // Day 28 itself is still a real day.
        assert!(sheet.days[27].kind.is_some());
    }

    #[test]
    fn period_covers_the_whole_month() {
        let sheet = build_sheet(
            &employee(),
            date(2026, 2, 1),
            &HashMap::new(),
            &[],
            &HashMap::new(),
            today(),
        );

        assert_eq!(sheet.period, "01/02/2026 A 28/02/2026");
        assert_eq!(sheet.month_name, "Fevereiro");
        assert_eq!(sheet.month, 2);
        assert_eq!(sheet.year, 2026);
    }

    #[test]
    fn present_rows_carry_times_and_witness() {
        // 2026-02-02 is a Monday.
        let day = date(2026, 2, 2);
        let entries = HashMap::from([(
            day,
            entry(day, [Some(time(8, 5)), Some(time(12, 0)), None, None]),
        )]);

        let sheet = build_sheet(
            &employee(),
            date(2026, 2, 1),
            &entries,
            &[],
            &HashMap::new(),
            today(),
        );

        let row = &sheet.days[1];
        assert_eq!(row.kind, Some(DayKind::Present));
        assert_eq!(row.morning_entry, Some(time(8, 5)));
        assert_eq!(row.morning_exit, Some(time(12, 0)));
        assert_eq!(row.afternoon_entry, None);
        assert_eq!(row.witness.as_deref(), Some("Maria Silva"));
    }

    #[test]
    fn holiday_rows_stay_blank_even_with_stamps() {
        let day = date(2026, 2, 9);
        let entries = HashMap::from([(day, entry(day, [Some(time(8, 0)), None, None, None]))]);
        let holidays = vec![holiday(
            1,
            day,
            "Carnaval",
            HolidayType::Holiday,
            false,
            HolidayScope::All,
        )];

        let sheet = build_sheet(
            &employee(),
            date(2026, 2, 1),
            &entries,
            &holidays,
            &HashMap::new(),
            today(),
        );

        let row = &sheet.days[8];
        assert_eq!(row.kind, Some(DayKind::Holiday));
        assert_eq!(row.times(), [None; 4]);
        assert_eq!(row.witness, None);
        assert_eq!(sheet.observations, vec!["Dia 9 - Feriado: Carnaval"]);
    }

    #[test]
    fn dispensation_observation_repeats_the_label() {
        let day = date(2026, 1, 5);
        let holidays = vec![holiday(
            7,
            day,
            "Dispensa Administrativa",
            HolidayType::Partial,
            false,
            HolidayScope::Partial,
        )];
        let reasons = HashMap::from([(7u64, "Motivo especial".to_string())]);

        let sheet = build_sheet(
            &employee(),
            date(2026, 1, 1),
            &HashMap::new(),
            &holidays,
            &reasons,
            today(),
        );

        assert_eq!(sheet.days[4].kind, Some(DayKind::Dispensation));
        assert_eq!(
            sheet.observations,
            vec!["Dia 5 - Dispensa: Dispensa: Dispensa Administrativa (Motivo especial)"]
        );
    }

    #[test]
    fn weekends_and_absences_never_reach_the_observation_list() {
        // June 2026: day 1 is a Monday, days 6/7 a weekend, all past.
        let sheet = build_sheet(
            &employee(),
            date(2026, 6, 1),
            &HashMap::new(),
            &[],
            &HashMap::new(),
            today(),
        );

        assert!(sheet.observations.is_empty());
        assert_eq!(sheet.days[5].kind, Some(DayKind::Weekend));
        assert_eq!(sheet.days[0].kind, Some(DayKind::Absent));
    }

    #[test]
    fn future_rows_are_typed_but_blank() {
        let sheet = build_sheet(
            &employee(),
            date(2026, 6, 1),
            &HashMap::new(),
            &[],
            &HashMap::new(),
            today(),
        );

        // 2026-06-16 is the day after `today`, a Tuesday.
        let row = &sheet.days[15];
        assert_eq!(row.kind, Some(DayKind::Future));
        assert_eq!(row.times(), [None; 4]);
    }

    #[test]
    fn observations_join_with_semicolons() {
        let holidays = vec![
            holiday(1, date(2026, 2, 9), "Carnaval", HolidayType::Holiday, false, HolidayScope::All),
            holiday(2, date(2026, 2, 10), "Carnaval", HolidayType::Holiday, false, HolidayScope::All),
        ];

        let sheet = build_sheet(
            &employee(),
            date(2026, 2, 1),
            &HashMap::new(),
            &holidays,
            &HashMap::new(),
            today(),
        );

        assert_eq!(
            sheet.joined_observations(),
            "Dia 9 - Feriado: Carnaval; Dia 10 - Feriado: Carnaval"
        );
    }

    #[test]
    fn sheet_titles_respect_the_31_char_cap() {
        assert_eq!(sheet_title("Maria Silva"), "Maria Silva");

        let long = "Maria Auxiliadora da Conceição Santos";
        let title = sheet_title(long);
        assert_eq!(title.chars().count(), 31);
        assert!(long.starts_with(&title));
    }
}
