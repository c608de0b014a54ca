use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::model::shift::Shift;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "name": "Maria Silva",
        "inscription": "100001",
        "department": "TI",
        "position": "Analista de Sistemas",
        "organization": "AGED-MA",
        "default_shift": "morning",
        "user_id": 2
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    #[schema(example = "Maria Silva")]
    pub name: String,

    #[schema(example = "100001")]
    pub inscription: String,

    #[schema(example = "TI")]
    pub department: String,

    #[schema(example = "Analista de Sistemas")]
    pub position: String,

    #[schema(example = "AGED-MA")]
    pub organization: String,

    #[schema(example = "morning")]
    pub default_shift: Shift,

    #[schema(example = 2, nullable = true)]
    pub user_id: Option<u64>,
}
