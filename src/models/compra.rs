// src/models/compra.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{calculo, datas};

// --- Compra (entrada de estoque) ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Compra {
    pub id: Uuid,

    #[schema(example = "ML-2024-00045")]
    pub id_pedido_compra: String,

    #[schema(example = "Distribuidora Alfa")]
    pub fornecedor: Option<String>,

    #[schema(example = "Periféricos")]
    pub categoria: Option<String>,

    pub observacoes: Option<String>,

    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub data_entrada: NaiveDate,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    // Compras do sistema antigo não têm itens no banco; são normalizadas
    // para esta forma na listagem.
    #[sqlx(skip)]
    #[serde(default)]
    pub sistema_antigo: bool,

    #[sqlx(skip)]
    #[serde(default)]
    pub itens: Vec<ItemCompra>,
}

// Cada item de compra é um LOTE. O saldo diz quanto ainda não foi consumido
// por vendas; o estado do lote deriva dele.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemCompra {
    pub id: Uuid,
    pub compra_id: Uuid,
    pub produto_id: Uuid,

    #[schema(example = "10.0")]
    pub quantidade: Decimal,

    #[schema(example = "55.90")]
    pub custo_unitario: Decimal,

    #[schema(example = "559.00")]
    pub custo_total: Decimal,

    #[schema(example = "7.0")]
    pub saldo: Decimal,

    pub created_at: DateTime<Utc>,
}

impl ItemCompra {
    pub fn status(&self) -> StatusLote {
        if self.saldo == self.quantidade {
            StatusLote::NaoConsumido
        } else if self.saldo > Decimal::ZERO {
            StatusLote::ParcialmenteConsumido
        } else {
            StatusLote::TotalmenteConsumido
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusLote {
    NaoConsumido,
    ParcialmenteConsumido,
    TotalmenteConsumido,
}

// De onde um lote (e, por tabela, uma alocação de venda) veio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "origem_lote", rename_all = "SCREAMING_SNAKE_CASE")] // Banco
#[serde(rename_all = "SCREAMING_SNAKE_CASE")] // JSON
pub enum OrigemLote {
    Compra,
    SistemaAntigo,
}

// Um lote com saldo, pronto para o planejador PEPS. Os campos de data
// definem a ordem de consumo.
#[derive(Debug, Clone)]
pub struct LoteDisponivel {
    pub id: Uuid,
    pub origem: OrigemLote,
    pub saldo: Decimal,
    pub custo_unitario: Decimal,
    pub data_entrada: NaiveDate,
    pub created_at: DateTime<Utc>,
}

// --- Sistema antigo ---
// Uma linha de "entradas": compra de um único produto, sem itens.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EntradaLegada {
    pub id: Uuid,
    pub produto_id: Uuid,
    pub quantidade: Decimal,
    pub custo_total: Decimal,
    pub fornecedor: Option<String>,
    pub id_pedido_compra: String,
    pub categoria: Option<String>,
    pub observacoes: Option<String>,

    #[schema(value_type = String, format = Date)]
    pub data_entrada: NaiveDate,

    pub saldo: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Normaliza linhas do sistema antigo para a forma nova: linhas com o mesmo
/// ID de pedido viram uma única compra, cada linha um item/lote. A ordem de
/// chegada é preservada.
pub fn compras_de_entradas(entradas: Vec<EntradaLegada>) -> Vec<Compra> {
    let mut compras: Vec<Compra> = Vec::new();

    for entrada in entradas {
        let item = ItemCompra {
            id: entrada.id,
            compra_id: entrada.id,
            produto_id: entrada.produto_id,
            quantidade: entrada.quantidade,
            custo_unitario: calculo::preco_unitario(entrada.custo_total, entrada.quantidade),
            custo_total: entrada.custo_total,
            saldo: entrada.saldo,
            created_at: entrada.created_at,
        };

        match compras
            .iter_mut()
            .find(|c| c.id_pedido_compra == entrada.id_pedido_compra)
        {
            Some(compra) => compra.itens.push(item),
            None => compras.push(Compra {
                id: entrada.id,
                id_pedido_compra: entrada.id_pedido_compra,
                fornecedor: entrada.fornecedor,
                categoria: entrada.categoria,
                observacoes: entrada.observacoes,
                data_entrada: entrada.data_entrada,
                created_at: entrada.created_at,
                updated_at: entrada.created_at,
                sistema_antigo: true,
                itens: vec![item],
            }),
        }
    }

    compras
}

// --- Payloads ---

fn validar_itens_compra(itens: &Vec<ItemCompraPayload>) -> Result<(), ValidationError> {
    for item in itens {
        if item.quantidade <= Decimal::ZERO || item.custo_unitario <= Decimal::ZERO {
            let mut err = ValidationError::new("range");
            err.message = Some("Quantidade e custo unitário devem ser maiores que zero.".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompraPayload {
    #[validate(length(min = 1, message = "O ID do pedido de compra é obrigatório."))]
    #[schema(example = "ML-2024-00045")]
    pub id_pedido_compra: String,

    pub fornecedor: Option<String>,
    pub categoria: Option<String>,
    pub observacoes: Option<String>,

    #[serde(deserialize_with = "datas::desserializar_data_flexivel")]
    #[schema(value_type = String, format = Date, example = "2024-03-15")]
    pub data_entrada: NaiveDate,

    #[validate(
        length(min = 1, message = "A compra precisa de pelo menos um item."),
        custom(function = validar_itens_compra)
    )]
    pub itens: Vec<ItemCompraPayload>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemCompraPayload {
    pub produto_id: Uuid,

    #[schema(example = "10.0")]
    pub quantidade: Decimal,

    #[schema(example = "55.90")]
    pub custo_unitario: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn entrada(id_pedido: &str, quantidade: &str, custo_total: &str, saldo: &str) -> EntradaLegada {
        EntradaLegada {
            id: Uuid::new_v4(),
            produto_id: Uuid::new_v4(),
            quantidade: dec(quantidade),
            custo_total: dec(custo_total),
            fornecedor: Some("Fornecedor X".into()),
            id_pedido_compra: id_pedido.to_string(),
            categoria: None,
            observacoes: None,
            data_entrada: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            saldo: dec(saldo),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn entradas_com_mesmo_pedido_viram_uma_compra() {
        let compras = compras_de_entradas(vec![
            entrada("PED-1", "10", "100", "10"),
            entrada("PED-1", "5", "60", "5"),
            entrada("PED-2", "2", "30", "2"),
        ]);

        assert_eq!(compras.len(), 2);
        assert_eq!(compras[0].id_pedido_compra, "PED-1");
        assert_eq!(compras[0].itens.len(), 2);
        assert!(compras[0].sistema_antigo);
        assert_eq!(compras[1].id_pedido_compra, "PED-2");
        assert_eq!(compras[1].itens.len(), 1);
    }

    #[test]
    fn custo_unitario_derivado_do_total() {
        let compras = compras_de_entradas(vec![entrada("PED-1", "3", "100", "3")]);
        // 100 / 3 arredondado nos centésimos
        assert_eq!(compras[0].itens[0].custo_unitario, dec("33.33"));
    }

    #[test]
    fn status_do_lote_deriva_do_saldo() {
        let item = |saldo: &str| ItemCompra {
            id: Uuid::new_v4(),
            compra_id: Uuid::new_v4(),
            produto_id: Uuid::new_v4(),
            quantidade: dec("10"),
            custo_unitario: dec("5"),
            custo_total: dec("50"),
            saldo: dec(saldo),
            created_at: Utc::now(),
        };

        assert_eq!(item("10").status(), StatusLote::NaoConsumido);
        assert_eq!(item("7").status(), StatusLote::ParcialmenteConsumido);
        assert_eq!(item("0").status(), StatusLote::TotalmenteConsumido);
    }
}
