use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Link between a partial-scope holiday and a dispensed employee.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct Dispensation {
    pub id: u64,
    pub holiday_id: u64,
    pub employee_id: u64,

    #[schema(example = "Convocação para evento externo")]
    pub reason: String,
}
