// src/db/dashboard_repo.rs

use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::dashboard::{PontoGraficoVendas, TopProduto, TotaisVendas},
};

#[derive(Clone)]
pub struct DashboardRepository {
    pool: PgPool,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // 1. Agregados crus de vendas de um período (a cadeia de lucro em si é
    // derivada em common::calculo, nunca no SQL).
    pub async fn totais_vendas(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<TotaisVendas, AppError> {
        let totais = sqlx::query_as::<_, TotaisVendas>(
            r#"
            SELECT
                SUM(preco_venda + frete_pago_pelo_cliente) AS faturamento,
                SUM(custo_produto_vendido) AS custo_produto,
                SUM(custo_envio) AS custo_envio,
                SUM(tarifa_plataforma) AS tarifas
            FROM vendas
            WHERE data BETWEEN $1 AND $2
            "#,
        )
        .bind(inicio)
        .bind(fim)
        .fetch_one(&self.pool)
        .await?;
        Ok(totais)
    }

    // 2. Gráfico de linha (faturamento diário, últimos 30 dias)
    pub async fn grafico_vendas_30_dias(&self) -> Result<Vec<PontoGraficoVendas>, AppError> {
        let pontos = sqlx::query_as::<_, PontoGraficoVendas>(
            r#"
            SELECT
                to_char(data, 'YYYY-MM-DD') AS data,
                SUM(preco_venda + frete_pago_pelo_cliente) AS total
            FROM vendas
            WHERE data >= (CURRENT_DATE - INTERVAL '30 days')
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(pontos)
    }

    // 3. Top 5 produtos por faturamento
    pub async fn top_produtos(&self) -> Result<Vec<TopProduto>, AppError> {
        let produtos = sqlx::query_as::<_, TopProduto>(
            r#"
            SELECT
                p.nome,
                SUM(iv.quantidade) AS quantidade_total,
                SUM(iv.preco_total) AS faturamento_total
            FROM itens_venda iv
            JOIN produtos p ON p.id = iv.produto_id
            GROUP BY p.id, p.nome
            ORDER BY faturamento_total DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(produtos)
    }
}
