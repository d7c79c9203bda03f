// src/db/despesa_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::despesa::{Despesa, DespesaPayload},
};

#[derive(Clone)]
pub struct DespesaRepository {
    pool: PgPool,
}

impl DespesaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn listar(&self) -> Result<Vec<Despesa>, AppError> {
        let despesas =
            sqlx::query_as::<_, Despesa>("SELECT * FROM despesas ORDER BY data DESC, created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(despesas)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Option<Despesa>, AppError> {
        let despesa = sqlx::query_as::<_, Despesa>("SELECT * FROM despesas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(despesa)
    }

    pub async fn criar(&self, payload: &DespesaPayload) -> Result<Despesa, AppError> {
        let despesa = sqlx::query_as::<_, Despesa>(
            r#"
            INSERT INTO despesas (descricao, categoria, valor, data)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(&payload.descricao)
        .bind(&payload.categoria)
        .bind(payload.valor)
        .bind(payload.data)
        .fetch_one(&self.pool)
        .await?;
        Ok(despesa)
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: &DespesaPayload,
    ) -> Result<Option<Despesa>, AppError> {
        let despesa = sqlx::query_as::<_, Despesa>(
            r#"
            UPDATE despesas
            SET descricao = $2, categoria = $3, valor = $4, data = $5, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.descricao)
        .bind(&payload.categoria)
        .bind(payload.valor)
        .bind(payload.data)
        .fetch_optional(&self.pool)
        .await?;
        Ok(despesa)
    }

    pub async fn excluir(&self, id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM despesas WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    pub async fn categorias(&self) -> Result<Vec<String>, AppError> {
        let linhas = sqlx::query_as::<_, (String,)>(
            "SELECT DISTINCT categoria FROM despesas ORDER BY categoria ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(linhas.into_iter().map(|(categoria,)| categoria).collect())
    }

    pub async fn total(&self) -> Result<Decimal, AppError> {
        let (total,): (Option<Decimal>,) =
            sqlx::query_as("SELECT SUM(valor) FROM despesas")
                .fetch_one(&self.pool)
                .await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }

    pub async fn por_categoria(&self, categoria: &str) -> Result<Vec<Despesa>, AppError> {
        let despesas = sqlx::query_as::<_, Despesa>(
            "SELECT * FROM despesas WHERE categoria = $1 ORDER BY data DESC",
        )
        .bind(categoria)
        .fetch_all(&self.pool)
        .await?;
        Ok(despesas)
    }

    pub async fn por_periodo(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Vec<Despesa>, AppError> {
        let despesas = sqlx::query_as::<_, Despesa>(
            "SELECT * FROM despesas WHERE data BETWEEN $1 AND $2 ORDER BY data DESC",
        )
        .bind(inicio)
        .bind(fim)
        .fetch_all(&self.pool)
        .await?;
        Ok(despesas)
    }

    pub async fn total_periodo(&self, inicio: NaiveDate, fim: NaiveDate) -> Result<Decimal, AppError> {
        let (total,): (Option<Decimal>,) =
            sqlx::query_as("SELECT SUM(valor) FROM despesas WHERE data BETWEEN $1 AND $2")
                .bind(inicio)
                .bind(fim)
                .fetch_one(&self.pool)
                .await?;
        Ok(total.unwrap_or(Decimal::ZERO))
    }
}
