// src/handlers/dashboard.rs

use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    common::error::AppError,
    config::AppState,
    models::dashboard::{PontoGraficoVendas, ResumoDashboard, TopProduto},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct MesQuery {
    pub mes: Option<u32>,
    pub ano: Option<i32>,
}

// GET /api/dashboard/resumo
#[utoipa::path(
    get,
    path = "/api/dashboard/resumo",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Cadeia de lucro do mês e comparativo com o anterior", body = ResumoDashboard),
        (status = 401, description = "Não autorizado")
    ),
    params(
        ("mes" = Option<u32>, Query, description = "Mês (1-12); padrão: mês corrente"),
        ("ano" = Option<i32>, Query, description = "Ano; padrão: ano corrente")
    ),
    security(("api_jwt" = []))
)]
pub async fn resumo(
    State(app_state): State<AppState>,
    Query(query): Query<MesQuery>,
) -> Result<impl IntoResponse, AppError> {
    let resumo = app_state
        .dashboard_service
        .resumo(query.mes, query.ano)
        .await?;

    Ok((StatusCode::OK, Json(resumo)))
}

// GET /api/dashboard/grafico-vendas
#[utoipa::path(
    get,
    path = "/api/dashboard/grafico-vendas",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Faturamento diário dos últimos 30 dias", body = Vec<PontoGraficoVendas>)
    ),
    security(("api_jwt" = []))
)]
pub async fn grafico_vendas(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let pontos = app_state.dashboard_service.grafico_vendas().await?;
    Ok((StatusCode::OK, Json(pontos)))
}

// GET /api/dashboard/top-produtos
#[utoipa::path(
    get,
    path = "/api/dashboard/top-produtos",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Top 5 produtos por faturamento", body = Vec<TopProduto>)
    ),
    security(("api_jwt" = []))
)]
pub async fn top_produtos(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let produtos = app_state.dashboard_service.top_produtos().await?;
    Ok((StatusCode::OK, Json(produtos)))
}
