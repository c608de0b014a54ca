//! Day classification for the attendance ledger.
//!
//! Pure and total: callers pass the reference day explicitly, nothing here
//! touches the clock or the database. Rule order is a contract relied on by
//! the calendar view and both frequency sheet renderings.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use utoipa::ToSchema;

use crate::labels;
use crate::model::holiday::{Holiday, HolidayScope, HolidayType};
use crate::model::time_entry::TimeEntry;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DayKind {
    Weekend,
    Holiday,
    Optional,
    Dispensation,
    Future,
    Present,
    Absent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayClass {
    pub kind: DayKind,
    pub observation: Option<String>,
}

impl DayClass {
    fn new(kind: DayKind, observation: Option<String>) -> Self {
        Self { kind, observation }
    }
}

/// Classifies a single day, in order:
///
/// 1. Saturday/Sunday is a weekend, whatever else falls on it.
/// 2. The first holiday matching the exact day is considered (recurrent ones
///    ignore the stored year).
/// 3. Full-scope holidays and optional days apply to everyone; partial-scope
///    entries only apply to employees holding a dispensation and are
///    otherwise ignored, as if no holiday existed.
/// 4. Days after `today` are still open.
/// 5. An entry with at least one stamped time means presence.
/// 6. Anything left is an absence.
///
/// `reasons` maps holiday id to the employee's dispensation reason.
pub fn classify_day(
    date: NaiveDate,
    entry: Option<&TimeEntry>,
    holidays: &[Holiday],
    reasons: &HashMap<u64, String>,
    today: NaiveDate,
) -> DayClass {
    if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
        return DayClass::new(
            DayKind::Weekend,
            Some(labels::WEEKEND_OBSERVATION.to_string()),
        );
    }

    if let Some(holiday) = holidays.iter().find(|h| h.matches(date)) {
        match (holiday.kind, holiday.scope) {
            (HolidayType::Holiday, HolidayScope::All) => {
                return DayClass::new(DayKind::Holiday, Some(holiday.name.clone()));
            }
            (HolidayType::Optional, HolidayScope::All) => {
                return DayClass::new(DayKind::Optional, Some(holiday.name.clone()));
            }
            (kind, HolidayScope::Partial) if reasons.contains_key(&holiday.id) => {
                let mut observation =
                    format!("{}: {}", labels::holiday_type_label(kind), holiday.name);
                if let Some(reason) = reasons.get(&holiday.id) {
                    if !reason.is_empty() {
                        observation.push_str(&format!(" ({reason})"));
                    }
                }

                let day_kind = if kind == HolidayType::Partial {
                    DayKind::Dispensation
                } else {
                    DayKind::Holiday
                };

                return DayClass::new(day_kind, Some(observation));
            }
            (HolidayType::Partial, HolidayScope::All) => {
                return DayClass::new(
                    DayKind::Dispensation,
                    Some(format!(
                        "{}: {}",
                        labels::holiday_type_label(HolidayType::Partial),
                        holiday.name
                    )),
                );
            }
            // Partial scope without a dispensation: the day is ordinary.
            _ => {}
        }
    }

    if date > today {
        return DayClass::new(DayKind::Future, None);
    }

    if entry.is_some_and(TimeEntry::has_any_time) {
        return DayClass::new(DayKind::Present, None);
    }

    DayClass::new(DayKind::Absent, Some(labels::ABSENT_MARK.to_string()))
}

/// First day of the month, or `None` for an out-of-range month.
pub fn month_start(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

/// Last day of the month `start` belongs to.
pub fn month_end(start: NaiveDate) -> NaiveDate {
    let (year, month) = if start.month() == 12 {
        (start.year() + 1, 1)
    } else {
        (start.year(), start.month() + 1)
    };

    NaiveDate::from_ymd_opt(year, month, 1)
        .and_then(|d| d.pred_opt())
        .unwrap_or(start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::shift::Shift;
    use chrono::NaiveTime;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
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

    fn entry_with(times: [Option<NaiveTime>; 4]) -> TimeEntry {
        TimeEntry {
            id: 1,
            employee_id: 1,
            date: date(2026, 1, 5),
            morning_entry: times[0],
            morning_exit: times[1],
            afternoon_entry: times[2],
            afternoon_exit: times[3],
            shift_override: None,
        }
    }

    fn no_reasons() -> HashMap<u64, String> {
        HashMap::new()
    }

    const TODAY: (i32, u32, u32) = (2026, 6, 15);

    fn today() -> NaiveDate {
        date(TODAY.0, TODAY.1, TODAY.2)
    }

    #[test]
    fn saturday_and_sunday_are_weekends() {
        let class = classify_day(date(2026, 6, 13), None, &[], &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Weekend);
        assert_eq!(class.observation.as_deref(), Some("Fim de semana"));

        let class = classify_day(date(2026, 6, 14), None, &[], &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Weekend);
    }

    #[test]
    fn weekend_wins_over_holiday() {
        // 2026-06-13 is a Saturday.
        let holidays = vec![holiday(
            1,
            date(2026, 6, 13),
            "Santo Antônio",
            HolidayType::Holiday,
            false,
            HolidayScope::All,
        )];

        let class = classify_day(date(2026, 6, 13), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Weekend);
        assert_eq!(class.observation.as_deref(), Some("Fim de semana"));
    }

    #[test]
    fn full_scope_holiday_names_the_day() {
        // 2026-02-09 is a Monday.
        let holidays = vec![holiday(
            1,
            date(2026, 2, 9),
            "Carnaval",
            HolidayType::Holiday,
            false,
            HolidayScope::All,
        )];

        let class = classify_day(date(2026, 2, 9), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Holiday);
        assert_eq!(class.observation.as_deref(), Some("Carnaval"));
    }

    #[test]
    fn optional_day_keeps_its_own_kind() {
        let holidays = vec![holiday(
            1,
            date(2026, 2, 11),
            "Quarta-feira de Cinzas",
            HolidayType::Optional,
            false,
            HolidayScope::All,
        )];

        let class = classify_day(date(2026, 2, 11), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Optional);
        assert_eq!(class.observation.as_deref(), Some("Quarta-feira de Cinzas"));
    }

    #[test]
    fn recurrent_holiday_matches_any_year() {
        let holidays = vec![holiday(
            1,
            date(2020, 1, 5),
            "Aniversário da Cidade",
            HolidayType::Holiday,
            true,
            HolidayScope::All,
        )];

        let class = classify_day(date(2026, 1, 5), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Holiday);
        assert_eq!(class.observation.as_deref(), Some("Aniversário da Cidade"));
    }

    #[test]
    fn non_recurrent_holiday_needs_the_exact_date() {
        let holidays = vec![holiday(
            1,
            date(2025, 4, 21),
            "Tiradentes",
            HolidayType::Holiday,
            false,
            HolidayScope::All,
        )];

        // Same month and day, different year: not a match, and a past
        // weekday without entry is an absence.
        let class = classify_day(date(2026, 4, 21), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Absent);
        assert_eq!(class.observation.as_deref(), Some("FALTA"));
    }

    #[test]
    fn partial_scope_with_dispensation_carries_label_and_reason() {
        let holidays = vec![holiday(
            7,
            date(2026, 1, 5),
            "Dispensa Administrativa",
            HolidayType::Partial,
            false,
            HolidayScope::Partial,
        )];
        let reasons = HashMap::from([(7u64, "Motivo especial".to_string())]);

        let class = classify_day(date(2026, 1, 5), None, &holidays, &reasons, today());
        assert_eq!(class.kind, DayKind::Dispensation);
        assert_eq!(
            class.observation.as_deref(),
            Some("Dispensa: Dispensa Administrativa (Motivo especial)")
        );
    }

    #[test]
    fn partial_scope_holiday_type_keeps_holiday_kind() {
        let holidays = vec![holiday(
            3,
            date(2026, 1, 5),
            "Feriado Setorial",
            HolidayType::Holiday,
            false,
            HolidayScope::Partial,
        )];
        let reasons = HashMap::from([(3u64, "Plantão cancelado".to_string())]);

        let class = classify_day(date(2026, 1, 5), None, &holidays, &reasons, today());
        assert_eq!(class.kind, DayKind::Holiday);
        assert_eq!(
            class.observation.as_deref(),
            Some("Feriado: Feriado Setorial (Plantão cancelado)")
        );
    }

    #[test]
    fn partial_scope_optional_type_keeps_holiday_kind() {
        let holidays = vec![holiday(
            4,
            date(2026, 1, 5),
            "Recesso Facultativo",
            HolidayType::Optional,
            false,
            HolidayScope::Partial,
        )];
        let reasons = HashMap::from([(4u64, "Escala reduzida".to_string())]);

        let class = classify_day(date(2026, 1, 5), None, &holidays, &reasons, today());
        assert_eq!(class.kind, DayKind::Holiday);
        assert_eq!(
            class.observation.as_deref(),
            Some("Ponto Facultativo: Recesso Facultativo (Escala reduzida)")
        );
    }

    #[test]
    fn empty_reason_omits_the_parentheses() {
        let holidays = vec![holiday(
            5,
            date(2026, 1, 5),
            "Dispensa Administrativa",
            HolidayType::Partial,
            false,
            HolidayScope::Partial,
        )];
        let reasons = HashMap::from([(5u64, String::new())]);

        let class = classify_day(date(2026, 1, 5), None, &holidays, &reasons, today());
        assert_eq!(
            class.observation.as_deref(),
            Some("Dispensa: Dispensa Administrativa")
        );
    }

    #[test]
    fn partial_type_full_scope_dispenses_everyone() {
        let holidays = vec![holiday(
            6,
            date(2026, 1, 5),
            "Dispensa Geral",
            HolidayType::Partial,
            false,
            HolidayScope::All,
        )];

        let class = classify_day(date(2026, 1, 5), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Dispensation);
        assert_eq!(class.observation.as_deref(), Some("Dispensa: Dispensa Geral"));
    }

    #[test]
    fn partial_scope_without_dispensation_falls_through_to_absence() {
        let holidays = vec![holiday(
            8,
            date(2026, 1, 5),
            "Evento Institucional",
            HolidayType::Partial,
            false,
            HolidayScope::Partial,
        )];

        // Past weekday, no entry, no dispensation: plain absence.
        let class = classify_day(date(2026, 1, 5), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Absent);
        assert_eq!(class.observation.as_deref(), Some("FALTA"));
    }

    #[test]
    fn partial_scope_without_dispensation_falls_through_to_future() {
        let holidays = vec![holiday(
            8,
            date(2026, 7, 1),
            "Evento Institucional",
            HolidayType::Partial,
            false,
            HolidayScope::Partial,
        )];

        let class = classify_day(date(2026, 7, 1), None, &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Future);
        assert_eq!(class.observation, None);
    }

    #[test]
    fn partial_scope_without_dispensation_falls_through_to_presence() {
        let holidays = vec![holiday(
            8,
            date(2026, 1, 5),
            "Evento Institucional",
            HolidayType::Partial,
            false,
            HolidayScope::Partial,
        )];
        let entry = entry_with([Some(time(8, 0)), None, None, None]);

        let class = classify_day(date(2026, 1, 5), Some(&entry), &holidays, &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Present);
    }

    #[test]
    fn days_after_today_are_future() {
        let class = classify_day(date(2026, 6, 16), None, &[], &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Future);
        assert_eq!(class.observation, None);
    }

    #[test]
    fn today_itself_is_not_future() {
        let class = classify_day(today(), None, &[], &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Absent);
    }

    #[test]
    fn any_single_stamp_counts_as_presence() {
        let stamps = [
            [Some(time(8, 5)), None, None, None],
            [None, Some(time(12, 0)), None, None],
            [None, None, Some(time(14, 0)), None],
            [None, None, None, Some(time(18, 0))],
        ];

        for times in stamps {
            let entry = entry_with(times);
            let class = classify_day(date(2026, 1, 5), Some(&entry), &[], &no_reasons(), today());
            assert_eq!(class.kind, DayKind::Present, "times: {times:?}");
            assert_eq!(class.observation, None);
        }
    }

    #[test]
    fn entry_without_stamps_is_an_absence() {
        let mut entry = entry_with([None, None, None, None]);
        entry.shift_override = Some(Shift::Afternoon);

        let class = classify_day(date(2026, 1, 5), Some(&entry), &[], &no_reasons(), today());
        assert_eq!(class.kind, DayKind::Absent);
        assert_eq!(class.observation.as_deref(), Some("FALTA"));
    }

    #[test]
    fn month_bounds() {
        assert_eq!(month_start(2026, 2), Some(date(2026, 2, 1)));
        assert_eq!(month_start(2026, 13), None);
        assert_eq!(month_end(date(2026, 2, 1)), date(2026, 2, 28));
        assert_eq!(month_end(date(2024, 2, 1)), date(2024, 2, 29));
        assert_eq!(month_end(date(2026, 12, 1)), date(2026, 12, 31));
    }
}
