//! Presentation strings, pt-BR. Enums stay language-neutral; everything a
//! user reads comes from here.

use chrono::Weekday;

use crate::classify::DayKind;
use crate::clockin::PunchField;
use crate::model::holiday::HolidayType;
use crate::model::shift::Shift;

pub const WEEKEND_OBSERVATION: &str = "Fim de semana";
pub const ABSENT_MARK: &str = "FALTA";

pub const CLOCKED_IN_TITLE: &str = "Ponto marcado!";
pub const SHIFT_COMPLETE: &str = "Todos os pontos do turno já foram marcados hoje.";

pub fn shift_label(shift: Shift) -> &'static str {
    match shift {
        Shift::Morning => "Manhã",
        Shift::Afternoon => "Tarde",
    }
}

pub fn holiday_type_label(kind: HolidayType) -> &'static str {
    match kind {
        HolidayType::Holiday => "Feriado",
        HolidayType::Optional => "Ponto Facultativo",
        HolidayType::Partial => "Dispensa",
    }
}

/// Label used when a day's observation is listed on the frequency sheet.
/// Only holiday-like kinds are listed; the rest never reach the list.
pub fn observation_kind_label(kind: DayKind) -> Option<&'static str> {
    match kind {
        DayKind::Holiday => Some("Feriado"),
        DayKind::Optional => Some("Ponto Facultativo"),
        DayKind::Dispensation => Some("Dispensa"),
        _ => None,
    }
}

pub fn punch_field_label(field: PunchField) -> &'static str {
    match field {
        PunchField::MorningEntry => "Entrada Manhã",
        PunchField::MorningExit => "Saída Manhã",
        PunchField::AfternoonEntry => "Entrada Tarde",
        PunchField::AfternoonExit => "Saída Tarde",
    }
}

pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Domingo",
        Weekday::Mon => "Segunda",
        Weekday::Tue => "Terça",
        Weekday::Wed => "Quarta",
        Weekday::Thu => "Quinta",
        Weekday::Fri => "Sexta",
        Weekday::Sat => "Sábado",
    }
}

pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "Janeiro",
        "Fevereiro",
        "Março",
        "Abril",
        "Maio",
        "Junho",
        "Julho",
        "Agosto",
        "Setembro",
        "Outubro",
        "Novembro",
        "Dezembro",
    ];

    NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// ASCII month names for download file names (Março becomes Marco).
pub fn month_file_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "Janeiro",
        "Fevereiro",
        "Marco",
        "Abril",
        "Maio",
        "Junho",
        "Julho",
        "Agosto",
        "Setembro",
        "Outubro",
        "Novembro",
        "Dezembro",
    ];

    NAMES.get(month.checked_sub(1)? as usize).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names_cover_the_year() {
        assert_eq!(month_name(1), Some("Janeiro"));
        assert_eq!(month_name(3), Some("Março"));
        assert_eq!(month_name(12), Some("Dezembro"));
        assert_eq!(month_name(0), None);
        assert_eq!(month_name(13), None);
    }

    #[test]
    fn file_month_names_are_ascii() {
        assert_eq!(month_file_name(3), Some("Marco"));

        for month in 1..=12 {
            let name = month_file_name(month).unwrap();
            assert!(name.is_ascii(), "{name} is not ascii");
        }
    }

    #[test]
    fn punch_field_labels() {
        assert_eq!(punch_field_label(PunchField::MorningEntry), "Entrada Manhã");
        assert_eq!(punch_field_label(PunchField::AfternoonExit), "Saída Tarde");
    }
}
