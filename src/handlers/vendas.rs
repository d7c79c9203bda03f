// src/handlers/vendas.rs

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
    models::venda::{Venda, VendaPayload},
};

// GET /api/vendas
#[utoipa::path(
    get,
    path = "/api/vendas",
    tag = "Vendas",
    responses(
        (status = 200, description = "Vendas com itens por lote e itens agrupados", body = Vec<Venda>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let vendas = app_state.venda_service.listar().await?;
    Ok((StatusCode::OK, Json(vendas)))
}

// GET /api/vendas/{id}
#[utoipa::path(
    get,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    responses(
        (status = 200, description = "Venda", body = Venda),
        (status = 404, description = "Venda não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da venda")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let venda = app_state.venda_service.buscar(id).await?;
    Ok((StatusCode::OK, Json(venda)))
}

// POST /api/vendas
// A validação do payload rejeita carrinho vazio e ID de pedido em branco
// antes de qualquer acesso ao banco.
#[utoipa::path(
    post,
    path = "/api/vendas",
    tag = "Vendas",
    request_body = VendaPayload,
    responses(
        (status = 201, description = "Venda registrada com alocação PEPS por lote", body = Venda),
        (status = 409, description = "ID do pedido duplicado ou estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<VendaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let venda = app_state
        .venda_service
        .criar(&app_state.db_pool, &payload)
        .await?;

    Ok((StatusCode::CREATED, Json(venda)))
}

// PUT /api/vendas/{id}
#[utoipa::path(
    put,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    request_body = VendaPayload,
    responses(
        (status = 200, description = "Venda atualizada (alocação refeita)", body = Venda),
        (status = 404, description = "Venda não encontrada"),
        (status = 409, description = "Estoque insuficiente para o novo carrinho")
    ),
    params(("id" = Uuid, Path, description = "ID da venda")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<VendaPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let venda = app_state
        .venda_service
        .atualizar(&app_state.db_pool, id, &payload)
        .await?;

    Ok((StatusCode::OK, Json(venda)))
}

// DELETE /api/vendas/{id}
#[utoipa::path(
    delete,
    path = "/api/vendas/{id}",
    tag = "Vendas",
    responses(
        (status = 204, description = "Venda excluída; saldos dos lotes e estoque estornados"),
        (status = 404, description = "Venda não encontrada")
    ),
    params(("id" = Uuid, Path, description = "ID da venda")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .venda_service
        .excluir(&app_state.db_pool, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
