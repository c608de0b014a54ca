//! Clock-in sequencing. Pure rules only; the HTTP handler owns the clock
//! and the ledger writes.

use chrono::{NaiveTime, Timelike};
use serde::Serialize;
use utoipa::ToSchema;

use crate::model::shift::Shift;
use crate::model::time_entry::TimeEntry;

/// The four stampable slots of a ledger row.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PunchField {
    MorningEntry,
    MorningExit,
    AfternoonEntry,
    AfternoonExit,
}

impl PunchField {
    /// Ledger column written by this punch. The fixed set doubles as the
    /// allow-list for SQL built at runtime.
    pub fn column(self) -> &'static str {
        match self {
            PunchField::MorningEntry => "morning_entry",
            PunchField::MorningExit => "morning_exit",
            PunchField::AfternoonEntry => "afternoon_entry",
            PunchField::AfternoonExit => "afternoon_exit",
        }
    }
}

/// Next open slot within `shift`. Entry before exit, and a finished shift
/// never routes the punch into the other one.
pub fn next_field(entry: Option<&TimeEntry>, shift: Shift) -> Option<PunchField> {
    match shift {
        Shift::Morning => match entry {
            None => Some(PunchField::MorningEntry),
            Some(e) if e.morning_entry.is_none() => Some(PunchField::MorningEntry),
            Some(e) if e.morning_exit.is_none() => Some(PunchField::MorningExit),
            Some(_) => None,
        },
        Shift::Afternoon => match entry {
            None => Some(PunchField::AfternoonEntry),
            Some(e) if e.afternoon_entry.is_none() => Some(PunchField::AfternoonEntry),
            Some(e) if e.afternoon_exit.is_none() => Some(PunchField::AfternoonExit),
            Some(_) => None,
        },
    }
}

/// Shift a punch operates on: the explicit choice, else the override already
/// stored on today's row, else the employee default.
pub fn resolve_shift(
    requested: Option<Shift>,
    entry: Option<&TimeEntry>,
    default_shift: Shift,
) -> Shift {
    requested
        .or_else(|| entry.and_then(|e| e.shift_override))
        .unwrap_or(default_shift)
}

/// Override recorded on the row: only a selection away from the default.
pub fn shift_override(selected: Shift, default_shift: Shift) -> Option<Shift> {
    (selected != default_shift).then_some(selected)
}

/// Stamps are stored to the minute.
pub fn minute_stamp(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    fn entry(times: [Option<NaiveTime>; 4], shift_override: Option<Shift>) -> TimeEntry {
        TimeEntry {
            id: 1,
            employee_id: 1,
            date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
            morning_entry: times[0],
            morning_exit: times[1],
            afternoon_entry: times[2],
            afternoon_exit: times[3],
            shift_override,
        }
    }

    #[test]
    fn morning_sequence_entry_then_exit_then_done() {
        assert_eq!(next_field(None, Shift::Morning), Some(PunchField::MorningEntry));

        let after_entry = entry([Some(time(8, 5)), None, None, None], None);
        assert_eq!(
            next_field(Some(&after_entry), Shift::Morning),
            Some(PunchField::MorningExit)
        );

        let after_exit = entry([Some(time(8, 5)), Some(time(12, 0)), None, None], None);
        assert_eq!(next_field(Some(&after_exit), Shift::Morning), None);
    }

    #[test]
    fn afternoon_sequence_mirrors_morning() {
        assert_eq!(
            next_field(None, Shift::Afternoon),
            Some(PunchField::AfternoonEntry)
        );

        let after_entry = entry([None, None, Some(time(14, 0)), None], None);
        assert_eq!(
            next_field(Some(&after_entry), Shift::Afternoon),
            Some(PunchField::AfternoonExit)
        );

        let full = entry([None, None, Some(time(14, 0)), Some(time(18, 0))], None);
        assert_eq!(next_field(Some(&full), Shift::Afternoon), None);
    }

    #[test]
    fn finished_morning_does_not_route_to_afternoon() {
        let done = entry([Some(time(8, 0)), Some(time(12, 0)), None, None], None);
        assert_eq!(next_field(Some(&done), Shift::Morning), None);
    }

    #[test]
    fn afternoon_ignores_morning_stamps() {
        let morning_only = entry([Some(time(8, 0)), Some(time(12, 0)), None, None], None);
        assert_eq!(
            next_field(Some(&morning_only), Shift::Afternoon),
            Some(PunchField::AfternoonEntry)
        );
    }

    #[test]
    fn requested_shift_takes_priority() {
        let row = entry([None, None, None, None], Some(Shift::Afternoon));
        assert_eq!(
            resolve_shift(Some(Shift::Morning), Some(&row), Shift::Afternoon),
            Shift::Morning
        );
    }

    #[test]
    fn stored_override_beats_the_default() {
        let row = entry([None, None, None, None], Some(Shift::Morning));
        assert_eq!(
            resolve_shift(None, Some(&row), Shift::Afternoon),
            Shift::Morning
        );
    }

    #[test]
    fn default_shift_is_the_last_resort() {
        assert_eq!(resolve_shift(None, None, Shift::Afternoon), Shift::Afternoon);

        let row = entry([None, None, None, None], None);
        assert_eq!(resolve_shift(None, Some(&row), Shift::Morning), Shift::Morning);
    }

    #[test]
    fn override_is_only_recorded_away_from_the_default() {
        assert_eq!(shift_override(Shift::Morning, Shift::Morning), None);
        assert_eq!(
            shift_override(Shift::Morning, Shift::Afternoon),
            Some(Shift::Morning)
        );
    }

    #[test]
    fn stamps_drop_the_seconds() {
        let precise = NaiveTime::from_hms_milli_opt(8, 5, 42, 300).unwrap();
        assert_eq!(minute_stamp(precise), time(8, 5));
    }

    #[test]
    fn afternoon_default_punching_morning_records_the_override() {
        let selected = resolve_shift(Some(Shift::Morning), None, Shift::Afternoon);

        assert_eq!(selected, Shift::Morning);
        assert_eq!(shift_override(selected, Shift::Afternoon), Some(Shift::Morning));
        assert_eq!(next_field(None, selected), Some(PunchField::MorningEntry));
    }
}
