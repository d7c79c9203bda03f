// src/handlers/produtos.rs

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
    models::produto::{Disponibilidade, DisponibilidadeQuery, Produto, ProdutoPayload},
};

// GET /api/produtos
#[utoipa::path(
    get,
    path = "/api/produtos",
    tag = "Produtos",
    responses(
        (status = 200, description = "Catálogo completo", body = Vec<Produto>)
    ),
    security(("api_jwt" = []))
)]
pub async fn listar(State(app_state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let produtos = app_state.produto_service.listar().await?;
    Ok((StatusCode::OK, Json(produtos)))
}

// GET /api/produtos/{id}
#[utoipa::path(
    get,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    responses(
        (status = 200, description = "Produto", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = []))
)]
pub async fn buscar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let produto = app_state.produto_service.buscar(id).await?;
    Ok((StatusCode::OK, Json(produto)))
}

// POST /api/produtos
#[utoipa::path(
    post,
    path = "/api/produtos",
    tag = "Produtos",
    request_body = ProdutoPayload,
    responses(
        (status = 201, description = "Produto criado", body = Produto),
        (status = 409, description = "SKU já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn criar(
    State(app_state): State<AppState>,
    Json(payload): Json<ProdutoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let produto = app_state.produto_service.criar(&payload).await?;
    Ok((StatusCode::CREATED, Json(produto)))
}

// PUT /api/produtos/{id}
#[utoipa::path(
    put,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    request_body = ProdutoPayload,
    responses(
        (status = 200, description = "Produto atualizado", body = Produto),
        (status = 404, description = "Produto não encontrado")
    ),
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = []))
)]
pub async fn atualizar(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProdutoPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate()?;

    let produto = app_state.produto_service.atualizar(id, &payload).await?;
    Ok((StatusCode::OK, Json(produto)))
}

// DELETE /api/produtos/{id}
#[utoipa::path(
    delete,
    path = "/api/produtos/{id}",
    tag = "Produtos",
    responses(
        (status = 204, description = "Produto excluído"),
        (status = 404, description = "Produto não encontrado"),
        (status = 409, description = "Produto possui vendas associadas")
    ),
    params(("id" = Uuid, Path, description = "ID do produto")),
    security(("api_jwt" = []))
)]
pub async fn excluir(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.produto_service.excluir(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// GET /api/produtos/{id}/disponibilidade
// Checagem consultiva da tela de venda: nunca bloqueia, só avisa.
#[utoipa::path(
    get,
    path = "/api/produtos/{id}/disponibilidade",
    tag = "Produtos",
    responses(
        (status = 200, description = "Resultado da checagem de estoque", body = Disponibilidade),
        (status = 404, description = "Produto não encontrado")
    ),
    params(
        ("id" = Uuid, Path, description = "ID do produto"),
        ("quantidade" = f64, Query, description = "Quantidade que o usuário quer adicionar"),
        ("noCarrinho" = Option<f64>, Query, description = "Quantidade do mesmo produto já no carrinho")
    ),
    security(("api_jwt" = []))
)]
pub async fn disponibilidade(
    State(app_state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DisponibilidadeQuery>,
) -> Result<impl IntoResponse, AppError> {
    let disponibilidade = app_state
        .produto_service
        .disponibilidade(id, query.quantidade, query.no_carrinho)
        .await?;

    Ok((StatusCode::OK, Json(disponibilidade)))
}
