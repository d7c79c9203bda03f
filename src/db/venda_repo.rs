// src/db/venda_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        compra::OrigemLote,
        venda::{ItemVenda, Venda, VendaPayload},
    },
};

#[derive(Clone)]
pub struct VendaRepository {
    pool: PgPool,
}

impl VendaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn listar(&self) -> Result<Vec<Venda>, AppError> {
        let mut vendas =
            sqlx::query_as::<_, Venda>("SELECT * FROM vendas ORDER BY data DESC, created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        if vendas.is_empty() {
            return Ok(vendas);
        }

        let ids: Vec<Uuid> = vendas.iter().map(|v| v.id).collect();
        let itens = sqlx::query_as::<_, ItemVenda>(
            "SELECT * FROM itens_venda WHERE venda_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        for item in itens {
            if let Some(venda) = vendas.iter_mut().find(|v| v.id == item.venda_id) {
                venda.itens.push(item);
            }
        }

        Ok(vendas)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Option<Venda>, AppError> {
        let venda = sqlx::query_as::<_, Venda>("SELECT * FROM vendas WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match venda {
            Some(mut venda) => {
                venda.itens = self.itens(&self.pool, venda.id).await?;
                Ok(Some(venda))
            }
            None => Ok(None),
        }
    }

    pub async fn itens<'e, E>(&self, executor: E, venda_id: Uuid) -> Result<Vec<ItemVenda>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ItemVenda>(
            "SELECT * FROM itens_venda WHERE venda_id = $1 ORDER BY created_at ASC",
        )
        .bind(venda_id)
        .fetch_all(executor)
        .await?;
        Ok(itens)
    }

    // ---
    // Escritas (dentro da transação do service)
    // ---

    pub async fn inserir_cabecalho<'e, E>(
        &self,
        executor: E,
        payload: &VendaPayload,
    ) -> Result<Venda, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Venda>(
            r#"
            INSERT INTO vendas (id_pedido, plataforma, data, preco_venda,
                                frete_pago_pelo_cliente, custo_envio, tarifa_plataforma)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&payload.id_pedido)
        .bind(&payload.plataforma)
        .bind(payload.data)
        .bind(payload.preco_venda)
        .bind(payload.frete_pago_pelo_cliente)
        .bind(payload.custo_envio)
        .bind(payload.tarifa_plataforma)
        .fetch_one(executor)
        .await
        .map_err(|e| mapear_pedido_duplicado(e, &payload.id_pedido))
    }

    pub async fn atualizar_cabecalho<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &VendaPayload,
    ) -> Result<Option<Venda>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Venda>(
            r#"
            UPDATE vendas
            SET id_pedido = $2, plataforma = $3, data = $4, preco_venda = $5,
                frete_pago_pelo_cliente = $6, custo_envio = $7, tarifa_plataforma = $8,
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.id_pedido)
        .bind(&payload.plataforma)
        .bind(payload.data)
        .bind(payload.preco_venda)
        .bind(payload.frete_pago_pelo_cliente)
        .bind(payload.custo_envio)
        .bind(payload.tarifa_plataforma)
        .fetch_optional(executor)
        .await
        .map_err(|e| mapear_pedido_duplicado(e, &payload.id_pedido))
    }

    // Grava os totais derivados da alocação PEPS.
    pub async fn atualizar_totais<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        custo_produto_vendido: Decimal,
        lucro_bruto: Decimal,
        roi: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE vendas
            SET custo_produto_vendido = $2, lucro_bruto = $3, roi = $4, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(custo_produto_vendido)
        .bind(lucro_bruto)
        .bind(roi)
        .execute(executor)
        .await?;
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn inserir_item<'e, E>(
        &self,
        executor: E,
        venda_id: Uuid,
        produto_id: Uuid,
        lote_id: Option<Uuid>,
        origem_lote: OrigemLote,
        quantidade: Decimal,
        preco_unitario_venda: Decimal,
        preco_total: Decimal,
        custo_unitario: Decimal,
    ) -> Result<ItemVenda, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ItemVenda>(
            r#"
            INSERT INTO itens_venda (venda_id, produto_id, lote_id, origem_lote,
                                     quantidade, preco_unitario_venda, preco_total, custo_unitario)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(venda_id)
        .bind(produto_id)
        .bind(lote_id)
        .bind(origem_lote)
        .bind(quantidade)
        .bind(preco_unitario_venda)
        .bind(preco_total)
        .bind(custo_unitario)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn excluir_itens<'e, E>(&self, executor: E, venda_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM itens_venda WHERE venda_id = $1")
            .bind(venda_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn excluir<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM vendas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}

fn mapear_pedido_duplicado(erro: sqlx::Error, id_pedido: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &erro {
        if db_err.is_unique_violation() {
            return AppError::PedidoDuplicado {
                id_pedido: id_pedido.to_string(),
            };
        }
    }
    erro.into()
}
