pub mod attendance;
pub mod employee;
pub mod holiday;
pub mod report;

use chrono::NaiveDate;

use crate::classify;
use crate::error::ApiError;

/// Shared month/year query validation for calendar and report endpoints.
pub(crate) fn month_param(month: u32, year: i32) -> Result<NaiveDate, ApiError> {
    if !(1900..=2100).contains(&year) {
        return Err(ApiError::validation("Ano inválido"));
    }

    classify::month_start(year, month).ok_or_else(|| ApiError::validation("Mês inválido"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_param_bounds() {
        assert!(month_param(1, 2026).is_ok());
        assert!(month_param(12, 1900).is_ok());
        assert!(month_param(0, 2026).is_err());
        assert!(month_param(13, 2026).is_err());
        assert!(month_param(6, 1899).is_err());
        assert!(month_param(6, 2101).is_err());
    }
}
