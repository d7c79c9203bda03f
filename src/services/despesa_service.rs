// src/services/despesa_service.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::DespesaRepository,
    models::despesa::{Despesa, DespesaPayload},
};

#[derive(Clone)]
pub struct DespesaService {
    despesa_repo: DespesaRepository,
}

impl DespesaService {
    pub fn new(despesa_repo: DespesaRepository) -> Self {
        Self { despesa_repo }
    }

    pub async fn listar(&self) -> Result<Vec<Despesa>, AppError> {
        self.despesa_repo.listar().await
    }

    pub async fn buscar(&self, id: Uuid) -> Result<Despesa, AppError> {
        self.despesa_repo
            .buscar(id)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Despesa".into()))
    }

    pub async fn criar(&self, payload: &DespesaPayload) -> Result<Despesa, AppError> {
        let despesa = self.despesa_repo.criar(payload).await?;
        tracing::info!(
            "🧮 Despesa registrada: {} ({})",
            despesa.descricao,
            despesa.categoria
        );
        Ok(despesa)
    }

    pub async fn atualizar(&self, id: Uuid, payload: &DespesaPayload) -> Result<Despesa, AppError> {
        self.despesa_repo
            .atualizar(id, payload)
            .await?
            .ok_or_else(|| AppError::RecursoNaoEncontrado("Despesa".into()))
    }

    pub async fn excluir(&self, id: Uuid) -> Result<(), AppError> {
        let excluidas = self.despesa_repo.excluir(id).await?;
        if excluidas == 0 {
            return Err(AppError::RecursoNaoEncontrado("Despesa".into()));
        }
        Ok(())
    }

    pub async fn categorias(&self) -> Result<Vec<String>, AppError> {
        self.despesa_repo.categorias().await
    }

    pub async fn total(&self) -> Result<Decimal, AppError> {
        self.despesa_repo.total().await
    }

    pub async fn por_categoria(&self, categoria: &str) -> Result<Vec<Despesa>, AppError> {
        self.despesa_repo.por_categoria(categoria).await
    }

    pub async fn por_periodo(
        &self,
        inicio: NaiveDate,
        fim: NaiveDate,
    ) -> Result<Vec<Despesa>, AppError> {
        self.despesa_repo.por_periodo(inicio, fim).await
    }
}
