// src/handlers/despesas.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::despesa::{Despesa, DespesaPayload, PeriodoQuery, TotalDespesas},
};

// GET /api/despesas
#[utoipa::path(
    get,
    path = "/api/despesas",
    tag = "Despesas",
    responses(
        (status = 200, description = "Todas as despesas", body = Vec<Despesa>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let despesas = app_state.despesa_service.listar().await?;
    Ok((StatusCode::OK, Json(despesas)))
}

// GET /api/despesas/{id}
#[utoipa::path(
    get,
    path = "/api/despesas/{id}",
    tag = "Despesas",
    responses(
        (status = 200, description = "Despesa", body = Despesa),
        (status = 404, description = "Despesa não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da despesa")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let despesa = app_state.despesa_service.buscar(id).await?;
    Ok((StatusCode::OK, Json(despesa)))
}

// POST /api/despesas
#[utoipa::path(
    post,
    path = "/api/despesas",
    tag = "Despesas",
    request_body = DespesaPayload,
    responses(
        (status = 201, description = "Despesa registrada", body = Despesa)
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<DespesaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let despesa = app_state.despesa_service.criar(&payload).await?;
    Ok((StatusCode::CREATED, Json(despesa)))
}

// PUT /api/despesas/{id}
#[utoipa::path(
    put,
    path = "/api/despesas/{id}",
    tag = "Despesas",
    request_body = DespesaPayload,
    responses(
        (status = 200, description = "Despesa atualizada", body = Despesa),
        (status = 404, description = "Despesa não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da despesa")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<DespesaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let despesa = app_state.despesa_service.atualizar(id, &payload).await?;
    Ok((StatusCode::OK, Json(despesa)))
}

// DELETE /api/despesas/{id}
#[utoipa::path(
    delete,
    path = "/api/despesas/{id}",
    tag = "Despesas",
    responses(
        (status = 204, description = "Despesa excluída"),
        (status = 404, description = "Despesa não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da despesa")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.despesa_service.excluir(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/despesas/categorias
#[utoipa::path(
    get,
    path = "/api/despesas/categorias",
    tag = "Despesas",
    responses(
        (status = 200, description = "Categorias em uso", body = Vec<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn categorias(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let categorias = app_state.despesa_service.categorias().await?;
    Ok((StatusCode::OK, Json(categorias)))
}

// GET /api/despesas/total
#[utoipa::path(
    get,
    path = "/api/despesas/total",
    tag = "Despesas",
    responses(
        (status = 200, description = "Soma de todas as despesas", body = TotalDespesas)
    ),
    security(("api_jwt" = []))
)]
pub async fn total(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let total = app_state.despesa_service.total().await?;
    Ok((StatusCode::OK, Json(TotalDespesas { total })))
}

// GET /api/despesas/categoria/{categoria}
#[utoipa::path(
    get,
    path = "/api/despesas/categoria/{categoria}",
    tag = "Despesas",
    responses(
        (status = 200, description = "Despesas da categoria", body = Vec<Despesa>)
    ),
    params(("categoria" = String, Path, description = "Nome da categoria")),
    security(("api_jwt" = []))
)]
pub async fn por_categoria(
    State(app_state): State<AppState>,
    Path(categoria): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let despesas = app_state.despesa_service.por_categoria(&categoria).await?;
    Ok((StatusCode::OK, Json(despesas)))
}

// GET /api/despesas/periodo?inicio=...&fim=...
#[utoipa::path(
    get,
    path = "/api/despesas/periodo",
    tag = "Despesas",
    responses(
        (status = 200, description = "Despesas no intervalo de datas", body = Vec<Despesa>)
    ),
    params(
        ("inicio" = String, Query, description = "Data inicial (YYYY-MM-DD)"),
        ("fim" = String, Query, description = "Data final (YYYY-MM-DD)")
    ),
    security(("api_jwt" = []))
)]
pub async fn por_periodo(
    State(app_state): State<AppState>,
    Query(periodo): Query<PeriodoQuery>,
) -> Result<impl IntoResponse, AppError> {
    let despesas = app_state
        .despesa_service
        .por_periodo(periodo.inicio, periodo.fim)
        .await?;
    Ok((StatusCode::OK, Json(despesas)))
}
