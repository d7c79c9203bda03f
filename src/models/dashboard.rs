// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::FromRow;
use utoipa::ToSchema;

// 1. Resumo do mês (os cards do topo), com o comparativo do mês anterior
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumoDashboard {
    pub atual: MetricasMes,
    pub anterior: MetricasMes,
    pub crescimento: CrescimentoMensal,
}

// A cadeia de lucro de um mês, toda derivada em common::calculo
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetricasMes {
    pub faturamento_total: Decimal,
    pub custo_produto_vendido: Decimal,
    pub custo_efetivo_total: Decimal,
    pub lucro_bruto: Decimal,
    pub despesas_operacionais: Decimal,
    pub lucro_liquido: Decimal,
    pub roi: Decimal,
}

// Variação percentual contra o mês anterior (1 casa decimal)
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CrescimentoMensal {
    #[schema(example = "8.9")]
    pub faturamento: Decimal,
    pub lucro_liquido: Decimal,
}

// 2. Gráfico de linha (faturamento diário, últimos 30 dias)
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PontoGraficoVendas {
    pub data: Option<String>, // O SQL retorna a data como string (YYYY-MM-DD)
    pub total: Option<Decimal>,
}

// 3. Top produtos por faturamento
#[derive(Debug, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopProduto {
    pub nome: String,
    pub quantidade_total: Option<Decimal>,
    pub faturamento_total: Option<Decimal>,
}

// Agregados crus de vendas de um período, antes da cadeia de lucro
#[derive(Debug, FromRow)]
pub struct TotaisVendas {
    pub faturamento: Option<Decimal>,
    pub custo_produto: Option<Decimal>,
    pub custo_envio: Option<Decimal>,
    pub tarifas: Option<Decimal>,
}
