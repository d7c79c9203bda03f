// src/services/produto_service.rs

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProdutoRepository,
    models::produto::{Disponibilidade, Produto, ProdutoPayload},
};

// A checagem de estoque da tela de venda é CONSULTIVA: soma o que o usuário
// quer adicionar com o que já está no carrinho e compara com o estoque. Quem
// decide de verdade é a transação da venda.
pub fn estoque_suficiente(
    estoque_atual: Decimal,
    quantidade_no_carrinho: Decimal,
    quantidade_solicitada: Decimal,
) -> bool {
    quantidade_no_carrinho + quantidade_solicitada <= estoque_atual
}

#[derive(Clone)]
pub struct ProdutoService {
    produto_repo: ProdutoRepository,
}

impl ProdutoService {
    pub fn new(produto_repo: ProdutoRepository) -> Self {
        Self { produto_repo }
    }

    pub async fn listar(&self) -> Result<Vec<Produto>, AppError> {
        self.produto_repo.listar().await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Produto, AppError> {
        self.produto_repo
            .buscar(id)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Produto".into()))
    }

    pub async fn criar(&self, payload: &ProdutoPayload) -> Result<Produto, AppError> {
        let produto = self.produto_repo.criar(payload).await?;
        tracing::info!("📦 Produto cadastrado: {} ({})", produto.nome, produto.sku);
        Ok(produto)
    }

    pub async fn atualizar(&self, id: Uuid, payload: &ProdutoPayload) -> Result<Produto, AppError> {
        self.produto_repo
            .atualizar(id, payload)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Produto".into()))
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        let produto = self.buscar(id).await?;
        let excluidos = self.produto_repo.excluir(id, &produto.nome).await?;
        if excluidos == 0 {
            return Err(AppError::RecursoNaoEncontrado("Produto".into()));
        }
        Ok(())
    }

    pub async fn disponibilidade(
        &self,
        id: Uuid,
        quantidade_solicitada: Decimal,
        quantidade_no_carrinho: Decimal,
    ) -> Result<Disponibilidade, AppError> {
        let produto = self.buscar(id).await?;

        Ok(Disponibilidade {
            produto_id: produto.id,
            estoque_atual: produto.estoque,
            quantidade_solicitada,
            quantidade_no_carrinho,
            suficiente: estoque_suficiente(
                produto.estoque,
                quantidade_no_carrinho,
                quantidade_solicitada,
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn soma_do_carrinho_conta_contra_o_estoque() {
        // 10 em estoque, 7 já no carrinho: cabem mais 3, não 4.
        assert!(estoque_suficiente(dec("10"), dec("7"), dec("3")));
        assert!(!estoque_suficiente(dec("10"), dec("7"), dec("4")));
    }

    #[test]
    fn sem_nada_no_carrinho_compara_direto() {
        assert!(estoque_suficiente(dec("5"), Decimal::ZERO, dec("5")));
        assert!(!estoque_suficiente(dec("5"), Decimal::ZERO, dec("5.5")));
    }
}
