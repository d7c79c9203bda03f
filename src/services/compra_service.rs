// src/services/compra_service.rs

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::{calculo, error::AppError},
    db::{CompraRepository, ProdutoRepository},
    models::compra::{self, Compra, CompraPayload, StatusLote},
};

#[derive(Clone)]
pub struct CompraService {
    compra_repo: CompraRepository,
    produto_repo: ProdutoRepository,
}

impl CompraService {
    pub fn new(compra_repo: CompraRepository, produto_repo: ProdutoRepository) -> Self {
        Self {
            compra_repo,
            produto_repo,
        }
    }

    // Listagem unificada: compras novas e entradas do sistema antigo
    // normalizadas para a mesma forma, num único caminho de código.
    pub async fn listar(&self) -> Result<Vec<Compra>, AppError> {
        let mut compras = self.compra_repo.listar().await?;

        let entradas = self.compra_repo.listar_entradas().await?;
        compras.extend(compra::compras_de_entradas(entradas));

        compras.sort_by(|a, b| {
            b.data_entrada
                .cmp(&a.data_entrada)
                .then(b.created_at.cmp(&a.created_at))
        });

        Ok(compras)
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Compra, AppError> {
        if let Some(compra) = self.compra_repo.buscar(id).await? {
            return Ok(compra);
        }

        if let Some(entrada) = self.compra_repo.buscar_entrada(id).await? {
            let mut compras = compra::compras_de_entradas(vec![entrada]);
            return Ok(compras.remove(0));
        }

        Err(AppError::RecursoNaoEncontrado("Compra".into()))
    }

    // --- CRIAR ---
    // Cada item vira um lote com saldo cheio; o estoque do produto sobe junto.
    pub async fn criar<'e, E>(&self, executor: E, payload: &CompraPayload) -> Result<Compra, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let mut compra = self.compra_repo.inserir_cabecalho(&mut *tx, payload).await?;

        for item in &payload.itens {
            self.produto_repo
                .buscar_para_atualizacao(&mut *tx, item.produto_id)
                .await?
                .ok_or_else(|| AppError::RecursoNaoEncontrado("Produto".into()))?;

            let inserido = self
                .compra_repo
                .inserir_item(
                    &mut *tx,
                    compra.id,
                    item.produto_id,
                    item.quantidade,
                    item.custo_unitario,
                )
                .await?;

            self.produto_repo
                .ajustar_estoque(&mut *tx, item.produto_id, item.quantidade)
                .await?;

            compra.itens.push(inserido);
        }

        tx.commit().await?;

        tracing::info!(
            "🧾 Compra {} registrada com {} item(ns).",
            compra.id_pedido_compra,
            compra.itens.len()
        );
        Ok(compra)
    }

    // --- ATUALIZAR ---
    // Qualquer lote já consumido (parcial ou totalmente) bloqueia a edição:
    // mexer na quantidade ou no custo reescreveria o custo de vendas já
    // feitas. Lotes intactos têm o saldo realinhado à nova quantidade.
    pub async fn atualizar<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        payload: &CompraPayload,
    ) -> Result<Compra, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let itens_atuais = self.compra_repo.itens(&mut *tx, id).await?;

        if itens_atuais.is_empty() {
            // Sem itens na forma nova: ou é uma entrada do sistema antigo, ou
            // o id não existe.
            let compra = self.atualizar_entrada_legada(&mut tx, id, payload).await?;
            tx.commit().await?;
            return Ok(compra);
        }

        for item in &itens_atuais {
            if item.status() != StatusLote::NaoConsumido {
                return Err(AppError::LoteConsumidoEdicao {
                    saldo_atual: item.saldo,
                    quantidade_antiga: item.quantidade,
                });
            }
        }

        let mut compra = self
            .compra_repo
            .atualizar_cabecalho(&mut *tx, id, payload)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Compra".into()))?;

        // Desfaz o efeito dos itens antigos no estoque e substitui pelos novos.
        for item in &itens_atuais {
            self.produto_repo
                .ajustar_estoque(&mut *tx, item.produto_id, -item.quantidade)
                .await?;
        }
        self.compra_repo.excluir_itens(&mut *tx, id).await?;

        for item in &payload.itens {
            let inserido = self
                .compra_repo
                .inserir_item(
                    &mut *tx,
                    id,
                    item.produto_id,
                    item.quantidade,
                    item.custo_unitario,
                )
                .await?;

            self.produto_repo
                .ajustar_estoque(&mut *tx, item.produto_id, item.quantidade)
                .await?;

            compra.itens.push(inserido);
        }

        tx.commit().await?;
        Ok(compra)
    }

    // --- EXCLUIR ---
    pub async fn excluir<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let itens = self.compra_repo.itens(&mut *tx, id).await?;

        if itens.is_empty() {
            self.excluir_entrada_legada(&mut tx, id).await?;
            tx.commit().await?;
            return Ok(());
        }

        for item in &itens {
            if item.status() != StatusLote::NaoConsumido {
                return Err(AppError::LoteConsumidoExclusao {
                    saldo_atual: item.saldo,
                    quantidade_antiga: item.quantidade,
                });
            }
        }

        for item in &itens {
            self.produto_repo
                .ajustar_estoque(&mut *tx, item.produto_id, -item.quantidade)
                .await?;
        }

        let excluidas = self.compra_repo.excluir(&mut *tx, id).await?;
        if excluidas == 0 {
            return Err(AppError::RecursoNaoEncontrado("Compra".into()));
        }

        tx.commit().await?;
        Ok(())
    }

    // --- Sistema antigo ---
    // Os gatilhos legados é que bloqueiam edição/exclusão de lote consumido;
    // o repositório converte a mensagem deles em erro estruturado.

    async fn atualizar_entrada_legada(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: Uuid,
        payload: &CompraPayload,
    ) -> Result<Compra, AppError> {
        let entrada = self
            .compra_repo
            .buscar_entrada_para_atualizacao(&mut **tx, id)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Compra".into()))?;

        // Entradas do sistema antigo carregam um único produto.
        let item = payload
            .itens
            .first()
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Item da compra".into()))?;

        let nova_quantidade = item.quantidade;
        let novo_custo_total = calculo::preco_total(nova_quantidade, item.custo_unitario);

        let atualizada = self
            .compra_repo
            .atualizar_entrada(&mut **tx, id, payload, nova_quantidade, novo_custo_total)
            .await?;

        self.produto_repo
            .ajustar_estoque(&mut **tx, entrada.produto_id, nova_quantidade - entrada.quantidade)
            .await?;

        let mut compras = compra::compras_de_entradas(vec![atualizada]);
        Ok(compras.remove(0))
    }

    async fn excluir_entrada_legada(
        &self,
        tx: &mut sqlx::Transaction<'_, Postgres>,
        id: Uuid,
    ) -> Result<(), AppError> {
        let entrada = self
            .compra_repo
            .buscar_entrada_para_atualizacao(&mut **tx, id)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Compra".into()))?;

        self.compra_repo
            .excluir_entrada(&mut **tx, id, &entrada.id_pedido_compra)
            .await?;

        self.produto_repo
            .ajustar_estoque(&mut **tx, entrada.produto_id, -entrada.quantidade)
            .await?;

        Ok(())
    }
}
