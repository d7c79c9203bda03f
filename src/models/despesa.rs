// src/models/despesa.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::datas;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Despesa {
    pub id: Uuid,

    #[schema(example = "Mensalidade do sistema de etiquetas")]
    pub descricao: String,

    #[schema(example = "Software")]
    pub categoria: String,

    #[schema(example = "89.90")]
    pub valor: Decimal,

    #[schema(value_type = String, format = Date, example = "2024-03-05")]
    pub data: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TotalDespesas {
    #[schema(example = "1534.70")]
    pub total: Decimal,
}

fn validar_valor_positivo(valor: &Decimal) -> Result<(), ValidationError> {
    if *valor <= Decimal::ZERO {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor deve ser maior que zero.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DespesaPayload {
    #[validate(length(min = 1, message = "A descrição é obrigatória."))]
    pub descricao: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub categoria: String,

    #[validate(custom(function = validar_valor_positivo))]
    #[schema(example = "89.90")]
    pub valor: Decimal,

    #[serde(deserialize_with = "datas::desserializar_data_flexivel")]
    #[schema(value_type = String, format = Date, example = "2024-03-05")]
    pub data: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PeriodoQuery {
    #[schema(value_type = String, format = Date, example = "2024-03-01")]
    pub inicio: NaiveDate,

    #[schema(value_type = String, format = Date, example = "2024-03-31")]
    pub fim: NaiveDate,
}
