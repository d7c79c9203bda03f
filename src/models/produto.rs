// src/models/produto.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Catálogo de produtos. O estoque aqui é o total físico; o detalhamento por
// lote vive em itens_compra / entradas_legadas.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Produto {
    pub id: Uuid,

    #[schema(example = "SKU-TECL-01")]
    pub sku: String,

    #[schema(example = "B0C1234XYZ")]
    pub asin: Option<String>,

    #[schema(example = "Teclado mecânico 60%")]
    pub nome: String,

    #[schema(example = "42.0")]
    pub estoque: Decimal,

    #[schema(example = "5.0")]
    pub estoque_minimo: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Resposta da checagem consultiva de estoque: informa, não bloqueia.
// A reserva definitiva acontece na transação da venda.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Disponibilidade {
    pub produto_id: Uuid,
    pub estoque_atual: Decimal,
    pub quantidade_solicitada: Decimal,
    pub quantidade_no_carrinho: Decimal,
    pub suficiente: bool,
}

pub fn validar_nao_negativo(valor: &Decimal) -> Result<(), ValidationError> {
    if valor.is_sign_negative() {
        let mut err = ValidationError::new("range");
        err.message = Some("O valor não pode ser negativo.".into());
        return Err(err);
    }
    Ok(())
}

// O cadastro reenvia o objeto inteiro, então criação e edição usam o mesmo
// payload.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProdutoPayload {
    #[validate(length(min = 1, message = "O SKU é obrigatório."))]
    #[schema(example = "SKU-TECL-01")]
    pub sku: String,

    pub asin: Option<String>,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    #[schema(example = "Teclado mecânico 60%")]
    pub nome: String,

    #[validate(custom(function = validar_nao_negativo))]
    #[serde(default)]
    pub estoque: Decimal,

    #[validate(custom(function = validar_nao_negativo))]
    #[serde(default)]
    pub estoque_minimo: Decimal,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DisponibilidadeQuery {
    #[schema(example = "3.0")]
    pub quantidade: Decimal,

    // Quanto do mesmo produto já está no carrinho do cliente.
    #[serde(default)]
    pub no_carrinho: Decimal,
}
