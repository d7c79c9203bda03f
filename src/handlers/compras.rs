// src/handlers/compras.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    models::compra::{Compra, CompraPayload},
};

// GET /api/compras
// Listagem unificada: inclui as entradas do sistema antigo já normalizadas.
#[utoipa::path(
    get,
    path = "/api/compras",
    tag = "Compras",
    responses(
        (status = 200, description = "Compras (novas e do sistema antigo)", body = Vec<Compra>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let compras = app_state.compra_service.listar().await?;
    Ok((StatusCode::OK, Json(compras)))
}

// GET /api/compras/{id}
#[utoipa::path(
    get,
    path = "/api/compras/{id}",
    tag = "Compras",
    responses(
        (status = 200, description = "Compra com seus lotes", body = Compra),
        (status = 404, description = "Compra não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da compra")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let compra = app_state.compra_service.buscar(id).await?;
    Ok((StatusCode::OK, Json(compra)))
}

// POST /api/compras
#[utoipa::path(
    post,
    path = "/api/compras",
    tag = "Compras",
    request_body = CompraPayload,
    responses(
        (status = 201, description = "Compra registrada; cada item vira um lote", body = Compra),
        (status = 409, description = "ID do pedido de compra duplicado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<CompraPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let compra = app_state
        .compra_service
        .criar(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(compra)))
}

// PUT /api/compras/{id}
#[utoipa::path(
    put,
    path = "/api/compras/{id}",
    tag = "Compras",
    request_body = CompraPayload,
    responses(
        (status = 200, description = "Compra atualizada", body = Compra),
        (status = 404, description = "Compra não encontrada"),
        (status = 409, description = "Lote já consumido por vendas; edição bloqueada")
    ),
    params(("id" = Uuid, Path, description = "ID da compra")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<CompraPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let compra = app_state
        .compra_service
        .atualizar(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(compra)))
}

// DELETE /api/compras/{id}
#[utoipa::path(
    delete,
    path = "/api/compras/{id}",
    tag = "Compras",
    responses(
        (status = 204, description = "Compra excluída"),
        (status = 404, description = "Compra não encontrada"),
        (status = 409, description = "Lote já consumido por vendas; exclusão bloqueada")
    ),
    params(("id" = Uuid, Path, description = "ID da compra")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .compra_service
        .excluir(&app_state.db_pool, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
