pub mod dispensation;
pub mod employee;
pub mod holiday;
pub mod role;
pub mod shift;
pub mod time_entry;
