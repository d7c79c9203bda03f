// src/db/produto_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::produto::{Produto, ProdutoPayload},
};

#[derive(Clone)]
pub struct ProdutoRepository {
    pool: PgPool,
}

impl ProdutoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras simples (usam a pool principal)
    // ---

    pub async fn listar(&self) -> Result<Vec<Produto>, AppError> {
        let produtos =
            sqlx::query_as::<_, Produto>("SELECT * FROM produtos ORDER BY nome ASC")
                .fetch_all(&self.pool)
                .await?;
        Ok(produtos)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Option<Produto>, AppError> {
        let produto = sqlx::query_as::<_, Produto>("SELECT * FROM produtos WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(produto)
    }

    // ---
    // Escritas
    // ---

    pub async fn criar(&self, payload: &ProdutoPayload) -> Result<Produto, AppError> {
        sqlx::query_as::<_, Produto>(
            r#"
            INSERT INTO produtos (sku, asin, nome, estoque, estoque_minimo)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.sku)
        .bind(&payload.asin)
        .bind(&payload.nome)
        .bind(payload.estoque)
        .bind(payload.estoque_minimo)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SkuDuplicado(payload.sku.clone());
                }
            }
            e.into()
        })
    }

    pub async fn atualizar(
        &self,
        id: Uuid,
        payload: &ProdutoPayload,
    ) -> Result<Option<Produto>, AppError> {
        sqlx::query_as::<_, Produto>(
            r#"
            UPDATE produtos
            SET sku = $2, asin = $3, nome = $4, estoque = $5, estoque_minimo = $6,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.sku)
        .bind(&payload.asin)
        .bind(&payload.nome)
        .bind(payload.estoque)
        .bind(payload.estoque_minimo)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SkuDuplicado(payload.sku.clone());
                }
            }
            e.into()
        })
    }

    // A exclusão falha se o produto tiver vendas ou compras associadas
    // (violação de chave estrangeira).
    pub async fn excluir(&self, id: Uuid, nome: &str) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM produtos WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.is_foreign_key_violation() {
                        return AppError::ProdutoComVendas(nome.to_string());
                    }
                }
                AppError::from(e)
            })?;
        Ok(result.rows_affected())
    }

    // ---
    // Dentro de transações de venda/compra
    // ---

    // Trava a linha do produto para a alocação de estoque.
    pub async fn buscar_para_atualizacao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Produto>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let produto =
            sqlx::query_as::<_, Produto>("SELECT * FROM produtos WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(produto)
    }

    // Delta positivo = entrada de estoque, negativo = saída.
    pub async fn ajustar_estoque<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE produtos SET estoque = estoque + $2, updated_at = now() WHERE id = $1")
            .bind(id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }
}
