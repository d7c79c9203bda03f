// src/db/compra_repo.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{
        calculo,
        error::AppError,
        legado::{self, OperacaoLote},
    },
    models::compra::{Compra, CompraPayload, EntradaLegada, ItemCompra, LoteDisponivel, OrigemLote},
};

#[derive(Clone)]
pub struct CompraRepository {
    pool: PgPool,
}

impl CompraRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---
    // Leituras
    // ---

    pub async fn listar(&self) -> Result<Vec<Compra>, AppError> {
        let mut compras =
            sqlx::query_as::<_, Compra>("SELECT * FROM compras ORDER BY data_entrada DESC, created_at DESC")
                .fetch_all(&self.pool)
                .await?;

        if compras.is_empty() {
            return Ok(compras);
        }

        let ids: Vec<Uuid> = compras.iter().map(|c| c.id).collect();
        let itens = sqlx::query_as::<_, ItemCompra>(
            "SELECT * FROM itens_compra WHERE compra_id = ANY($1) ORDER BY created_at ASC",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        for item in itens {
            if let Some(compra) = compras.iter_mut().find(|c| c.id == item.compra_id) {
                compra.itens.push(item);
            }
        }

        Ok(compras)
    }

    pub async fn listar_entradas(&self) -> Result<Vec<EntradaLegada>, AppError> {
        let entradas = sqlx::query_as::<_, EntradaLegada>(
            "SELECT * FROM entradas_legadas ORDER BY data_entrada DESC, created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(entradas)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Option<Compra>, AppError> {
        let compra = sqlx::query_as::<_, Compra>("SELECT * FROM compras WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match compra {
            Some(mut compra) => {
                compra.itens = self.itens(&self.pool, compra.id).await?;
                Ok(Some(compra))
            }
            None => Ok(None),
        }
    }

    pub async fn buscar_entrada(&self, id: Uuid) -> Result<Option<EntradaLegada>, AppError> {
        let entrada =
            sqlx::query_as::<_, EntradaLegada>("SELECT * FROM entradas_legadas WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(entrada)
    }

    pub async fn buscar_entrada_para_atualizacao<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<EntradaLegada>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entrada = sqlx::query_as::<_, EntradaLegada>(
            "SELECT * FROM entradas_legadas WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(entrada)
    }

    pub async fn itens<'e, E>(&self, executor: E, compra_id: Uuid) -> Result<Vec<ItemCompra>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let itens = sqlx::query_as::<_, ItemCompra>(
            "SELECT * FROM itens_compra WHERE compra_id = $1 ORDER BY created_at ASC",
        )
        .bind(compra_id)
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
        payload: &CompraPayload,
    ) -> Result<Compra, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Compra>(
            r#"
            INSERT INTO compras (id_pedido_compra, fornecedor, categoria, observacoes, data_entrada)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(&payload.id_pedido_compra)
        .bind(&payload.fornecedor)
        .bind(&payload.categoria)
        .bind(&payload.observacoes)
        .bind(payload.data_entrada)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::PedidoDuplicado {
                        id_pedido: payload.id_pedido_compra.clone(),
                    };
                }
            }
            e.into()
        })
    }

    pub async fn atualizar_cabecalho<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CompraPayload,
    ) -> Result<Option<Compra>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Compra>(
            r#"
            UPDATE compras
            SET id_pedido_compra = $2, fornecedor = $3, categoria = $4,
                observacoes = $5, data_entrada = $6, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&payload.id_pedido_compra)
        .bind(&payload.fornecedor)
        .bind(&payload.categoria)
        .bind(&payload.observacoes)
        .bind(payload.data_entrada)
        .fetch_optional(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::PedidoDuplicado {
                        id_pedido: payload.id_pedido_compra.clone(),
                    };
                }
            }
            e.into()
        })
    }

    // Um item novo nasce com saldo = quantidade (lote não consumido).
    pub async fn inserir_item<'e, E>(
        &self,
        executor: E,
        compra_id: Uuid,
        produto_id: Uuid,
        quantidade: Decimal,
        custo_unitario: Decimal,
    ) -> Result<ItemCompra, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, ItemCompra>(
            r#"
            INSERT INTO itens_compra (compra_id, produto_id, quantidade, custo_unitario, custo_total, saldo)
            VALUES ($1, $2, $3, $4, $5, $3)
            RETURNING *
            "#,
        )
        .bind(compra_id)
        .bind(produto_id)
        .bind(quantidade)
        .bind(custo_unitario)
        .bind(calculo::preco_total(quantidade, custo_unitario))
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn excluir_itens<'e, E>(&self, executor: E, compra_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("DELETE FROM itens_compra WHERE compra_id = $1")
            .bind(compra_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    pub async fn excluir<'e, E>(&self, executor: E, id: Uuid) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM compras WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }

    // ---
    // Lotes para a alocação PEPS
    // ---

    // Trava os lotes com saldo do produto, na ordem de consumo.
    pub async fn lotes_disponiveis<'e, E>(
        &self,
        executor: E,
        produto_id: Uuid,
    ) -> Result<Vec<LoteDisponivel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linhas = sqlx::query_as::<_, (Uuid, Decimal, Decimal, NaiveDate, DateTime<Utc>)>(
            r#"
            SELECT ic.id, ic.saldo, ic.custo_unitario, c.data_entrada, ic.created_at
            FROM itens_compra ic
            JOIN compras c ON c.id = ic.compra_id
            WHERE ic.produto_id = $1 AND ic.saldo > 0
            ORDER BY c.data_entrada ASC, ic.created_at ASC
            FOR UPDATE OF ic
            "#,
        )
        .bind(produto_id)
        .fetch_all(executor)
        .await?;

        Ok(linhas
            .into_iter()
            .map(|(id, saldo, custo_unitario, data_entrada, created_at)| LoteDisponivel {
                id,
                origem: OrigemLote::Compra,
                saldo,
                custo_unitario,
                data_entrada,
                created_at,
            })
            .collect())
    }

    pub async fn lotes_legados_disponiveis<'e, E>(
        &self,
        executor: E,
        produto_id: Uuid,
    ) -> Result<Vec<LoteDisponivel>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let linhas =
            sqlx::query_as::<_, (Uuid, Decimal, Decimal, Decimal, NaiveDate, DateTime<Utc>)>(
                r#"
                SELECT id, saldo, quantidade, custo_total, data_entrada, created_at
                FROM entradas_legadas
                WHERE produto_id = $1 AND saldo > 0
                ORDER BY data_entrada ASC, created_at ASC
                FOR UPDATE
                "#,
            )
            .bind(produto_id)
            .fetch_all(executor)
            .await?;

        Ok(linhas
            .into_iter()
            .map(
                |(id, saldo, quantidade, custo_total, data_entrada, created_at)| LoteDisponivel {
                    id,
                    origem: OrigemLote::SistemaAntigo,
                    saldo,
                    custo_unitario: calculo::preco_unitario(custo_total, quantidade),
                    data_entrada,
                    created_at,
                },
            )
            .collect())
    }

    // Delta negativo consome, positivo devolve (estorno de venda).
    pub async fn ajustar_saldo_lote<'e, E>(
        &self,
        executor: E,
        origem: OrigemLote,
        lote_id: Uuid,
        delta: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = match origem {
            OrigemLote::Compra => "UPDATE itens_compra SET saldo = saldo + $2 WHERE id = $1",
            OrigemLote::SistemaAntigo => {
                "UPDATE entradas_legadas SET saldo = saldo + $2 WHERE id = $1"
            }
        };

        sqlx::query(sql)
            .bind(lote_id)
            .bind(delta)
            .execute(executor)
            .await?;
        Ok(())
    }

    // ---
    // Sistema antigo: edição e exclusão passam pelos gatilhos legados, cujas
    // mensagens de texto livre são convertidas em erros estruturados.
    // ---

    pub async fn atualizar_entrada<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CompraPayload,
        quantidade: Decimal,
        custo_total: Decimal,
    ) -> Result<EntradaLegada, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EntradaLegada>(
            r#"
            UPDATE entradas_legadas
            SET quantidade = $2, custo_total = $3, saldo = $2,
                fornecedor = $4, id_pedido_compra = $5, categoria = $6,
                observacoes = $7, data_entrada = $8
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantidade)
        .bind(custo_total)
        .bind(&payload.fornecedor)
        .bind(&payload.id_pedido_compra)
        .bind(&payload.categoria)
        .bind(&payload.observacoes)
        .bind(payload.data_entrada)
        .fetch_one(executor)
        .await
        .map_err(|e| classificar_erro_de_banco(e, &payload.id_pedido_compra, OperacaoLote::Edicao))
    }

    pub async fn excluir_entrada<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        id_pedido: &str,
    ) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM entradas_legadas WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(|e| classificar_erro_de_banco(e, id_pedido, OperacaoLote::Exclusao))?;
        Ok(result.rows_affected())
    }
}

fn classificar_erro_de_banco(
    erro: sqlx::Error,
    id_pedido: &str,
    operacao: OperacaoLote,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &erro {
        return legado::classificar_erro_legado(db_err.message(), id_pedido, operacao);
    }
    erro.into()
}
