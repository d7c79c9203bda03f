// src/models/venda.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::common::{calculo, datas};
use crate::models::compra::OrigemLote;

// --- Venda ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Venda {
    pub id: Uuid,

    #[schema(example = "MLB-3300123456")]
    pub id_pedido: String,

    #[schema(example = "Mercado Livre")]
    pub plataforma: String,

    #[schema(value_type = String, format = Date, example = "2024-03-20")]
    pub data: NaiveDate,

    #[schema(example = "199.90")]
    pub preco_venda: Decimal,

    #[schema(example = "25.00")]
    pub frete_pago_pelo_cliente: Decimal,

    #[schema(example = "18.50")]
    pub custo_envio: Decimal,

    #[schema(example = "31.98")]
    pub tarifa_plataforma: Decimal,

    // Calculados no momento da alocação PEPS
    pub custo_produto_vendido: Decimal,
    pub lucro_bruto: Decimal,
    pub roi: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    #[sqlx(skip)]
    #[serde(default)]
    pub itens: Vec<ItemVenda>,

    // Visão agrupada por produto, para exibição (os registros por lote
    // continuam em `itens`).
    #[sqlx(skip)]
    #[serde(default)]
    pub itens_agrupados: Vec<ItemVendaAgrupado>,
}

// Uma linha persistida de venda. Um item lógico do carrinho pode virar
// várias destas, uma por lote consumido, cada uma carregando o custo
// unitário e a identidade do seu lote.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemVenda {
    pub id: Uuid,
    pub venda_id: Uuid,
    pub produto_id: Uuid,

    pub lote_id: Option<Uuid>,
    pub origem_lote: OrigemLote,

    #[schema(example = "3.0")]
    pub quantidade: Decimal,

    #[schema(example = "66.63")]
    pub preco_unitario_venda: Decimal,

    #[schema(example = "199.90")]
    pub preco_total: Decimal,

    #[schema(example = "42.10")]
    pub custo_unitario: Decimal,

    pub created_at: DateTime<Utc>,
}

// Uma linha lógica do carrinho reconstruída: itens do mesmo produto
// somados, com preço e custo unitários médios ponderados.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemVendaAgrupado {
    pub produto_id: Uuid,
    pub quantidade: Decimal,
    pub preco_unitario_venda: Decimal,
    pub custo_unitario: Decimal,
    pub preco_total: Decimal,
    pub itens_originais: Vec<ItemVenda>,
}

/// Agrupa itens persistidos por produto. O preço unitário exibido é a média
/// ponderada `Σ preco_total / Σ quantidade` (centésimos, meio longe do
/// zero); o custo unitário idem. A ordem de primeira aparição dos produtos é
/// preservada, e os registros por lote ficam em `itens_originais` para que
/// as regras por lote continuem avaliáveis.
pub fn agrupar_itens(itens: &[ItemVenda]) -> Vec<ItemVendaAgrupado> {
    let mut grupos: Vec<ItemVendaAgrupado> = Vec::new();

    for item in itens {
        match grupos.iter_mut().find(|g| g.produto_id == item.produto_id) {
            Some(grupo) => {
                grupo.quantidade += item.quantidade;
                grupo.preco_total += item.preco_total;
                grupo.itens_originais.push(item.clone());
            }
            None => grupos.push(ItemVendaAgrupado {
                produto_id: item.produto_id,
                quantidade: item.quantidade,
                preco_unitario_venda: Decimal::ZERO,
                custo_unitario: Decimal::ZERO,
                preco_total: item.preco_total,
                itens_originais: vec![item.clone()],
            }),
        }
    }

    for grupo in &mut grupos {
        grupo.preco_unitario_venda = calculo::preco_unitario(grupo.preco_total, grupo.quantidade);

        let custo_total: Decimal = grupo
            .itens_originais
            .iter()
            .map(|i| i.custo_unitario * i.quantidade)
            .sum();
        grupo.custo_unitario = calculo::preco_unitario(custo_total, grupo.quantidade);
    }

    grupos
}

// --- Payloads ---

fn validar_itens_venda(itens: &Vec<ItemVendaPayload>) -> Result<(), ValidationError> {
    for item in itens {
        if item.quantidade <= Decimal::ZERO {
            let mut err = ValidationError::new("range");
            err.message = Some("A quantidade deve ser maior que zero.".into());
            return Err(err);
        }
        if item.preco_unitario_venda.is_sign_negative() {
            let mut err = ValidationError::new("range");
            err.message = Some("O preço unitário não pode ser negativo.".into());
            return Err(err);
        }
    }
    Ok(())
}

// Carrinho submetido pelo cliente: uma linha lógica por produto. A divisão
// em lotes acontece no servidor, na alocação PEPS.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VendaPayload {
    #[validate(length(min = 1, message = "O ID do pedido é obrigatório."))]
    #[schema(example = "MLB-3300123456")]
    pub id_pedido: String,

    #[validate(length(min = 1, message = "A plataforma é obrigatória."))]
    #[schema(example = "Mercado Livre")]
    pub plataforma: String,

    #[serde(deserialize_with = "datas::desserializar_data_flexivel")]
    #[schema(value_type = String, format = Date, example = "2024-03-20")]
    pub data: NaiveDate,

    #[schema(example = "199.90")]
    pub preco_venda: Decimal,

    #[serde(default)]
    pub frete_pago_pelo_cliente: Decimal,

    #[serde(default)]
    pub custo_envio: Decimal,

    #[serde(default)]
    pub tarifa_plataforma: Decimal,

    #[validate(
        length(min = 1, message = "A venda precisa de pelo menos um item."),
        custom(function = validar_itens_venda)
    )]
    pub itens: Vec<ItemVendaPayload>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ItemVendaPayload {
    pub produto_id: Uuid,

    #[schema(example = "3.0")]
    pub quantidade: Decimal,

    #[schema(example = "66.63")]
    pub preco_unitario_venda: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn item(
        produto_id: Uuid,
        quantidade: &str,
        preco_unitario: &str,
        custo_unitario: &str,
    ) -> ItemVenda {
        let quantidade = dec(quantidade);
        let preco_unitario_venda = dec(preco_unitario);
        ItemVenda {
            id: Uuid::new_v4(),
            venda_id: Uuid::new_v4(),
            produto_id,
            lote_id: Some(Uuid::new_v4()),
            origem_lote: OrigemLote::Compra,
            quantidade,
            preco_unitario_venda,
            preco_total: calculo::preco_total(quantidade, preco_unitario_venda),
            custo_unitario: dec(custo_unitario),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn agrupa_itens_do_mesmo_produto_com_media_ponderada() {
        let produto = Uuid::new_v4();
        // Venda de 10 unidades dividida pelo PEPS em dois lotes com custos
        // diferentes; preço de venda igual nas duas linhas.
        let itens = vec![
            item(produto, "4", "30.00", "25.00"),
            item(produto, "6", "30.00", "28.00"),
        ];

        let grupos = agrupar_itens(&itens);
        assert_eq!(grupos.len(), 1);

        let grupo = &grupos[0];
        assert_eq!(grupo.quantidade, dec("10"));
        assert_eq!(grupo.preco_total, dec("300.00"));
        assert_eq!(grupo.preco_unitario_venda, dec("30.00"));
        // (4*25 + 6*28) / 10 = 26.80
        assert_eq!(grupo.custo_unitario, dec("26.80"));
        assert_eq!(grupo.itens_originais.len(), 2);
    }

    #[test]
    fn soma_das_quantidades_agrupadas_bate_com_as_originais() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let itens = vec![
            item(a, "2", "10.00", "5.00"),
            item(b, "1", "99.90", "60.00"),
            item(a, "3", "10.00", "6.00"),
        ];

        let grupos = agrupar_itens(&itens);
        assert_eq!(grupos.len(), 2);

        let total_agrupado: Decimal = grupos.iter().map(|g| g.quantidade).sum();
        let total_original: Decimal = itens.iter().map(|i| i.quantidade).sum();
        assert_eq!(total_agrupado, total_original);

        // Ordem de primeira aparição preservada
        assert_eq!(grupos[0].produto_id, a);
        assert_eq!(grupos[1].produto_id, b);
    }

    #[test]
    fn media_ponderada_arredonda_nos_centesimos() {
        let produto = Uuid::new_v4();
        // Preços distintos por linha: 1@10.00 + 2@10.05 -> 30.10 / 3 = 10.0333...
        let itens = vec![
            item(produto, "1", "10.00", "7.00"),
            item(produto, "2", "10.05", "7.00"),
        ];

        let grupos = agrupar_itens(&itens);
        assert_eq!(grupos[0].preco_unitario_venda, dec("10.03"));
    }

    #[test]
    fn sem_itens_nao_ha_grupos() {
        assert!(agrupar_itens(&[]).is_empty());
    }

    fn payload_valido() -> VendaPayload {
        VendaPayload {
            id_pedido: "MLB-1".into(),
            plataforma: "Mercado Livre".into(),
            data: NaiveDate::from_ymd_opt(2024, 3, 20).unwrap(),
            preco_venda: dec("199.90"),
            frete_pago_pelo_cliente: dec("25.00"),
            custo_envio: dec("18.50"),
            tarifa_plataforma: dec("31.98"),
            itens: vec![ItemVendaPayload {
                produto_id: Uuid::new_v4(),
                quantidade: dec("3"),
                preco_unitario_venda: dec("66.63"),
            }],
        }
    }

    // A rejeição acontece na validação do payload, antes de qualquer acesso
    // ao banco.
    #[test]
    fn venda_sem_itens_e_rejeitada_localmente() {
        use validator::Validate;

        let mut payload = payload_valido();
        payload.itens.clear();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn venda_sem_id_do_pedido_e_rejeitada_localmente() {
        use validator::Validate;

        let mut payload = payload_valido();
        payload.id_pedido = String::new();
        assert!(payload.validate().is_err());
    }

    #[test]
    fn venda_com_quantidade_zero_e_rejeitada_localmente() {
        use validator::Validate;

        let mut payload = payload_valido();
        payload.itens[0].quantidade = Decimal::ZERO;
        assert!(payload.validate().is_err());

        assert!(payload_valido().validate().is_ok());
    }
}
