use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cada variante vira uma resposta JSON com um campo "code" estruturado:
// o cliente escolhe o diálogo pelo código, nunca casando substrings da
// mensagem (o casamento de texto fica restrito à fronteira com o sistema
// antigo, em `common::legado`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("{0} não encontrado(a)")]
    RecursoNaoEncontrado(String),

    #[error("Já existe uma compra com este ID do pedido: {id_pedido}")]
    PedidoDuplicado { id_pedido: String },

    #[error(
        "Não é possível alterar: lote parcialmente consumido. Saldo atual: {saldo_atual}. Quantidade original: {quantidade_antiga}"
    )]
    LoteConsumidoEdicao {
        saldo_atual: Decimal,
        quantidade_antiga: Decimal,
    },

    #[error(
        "Não é possível excluir: lote parcialmente consumido. Saldo atual: {saldo_atual}. Quantidade original: {quantidade_antiga}"
    )]
    LoteConsumidoExclusao {
        saldo_atual: Decimal,
        quantidade_antiga: Decimal,
    },

    #[error("Produto {0} possui vendas associadas")]
    ProdutoComVendas(String),

    #[error("Já existe um produto com este SKU: {0}")]
    SkuDuplicado(String),

    #[error("Estoque insuficiente para o produto {produto}")]
    EstoqueInsuficiente {
        produto: String,
        disponivel: Decimal,
        solicitado: Decimal,
    },

    // Mensagem já saneada vinda do sistema antigo, quando nenhum padrão
    // conhecido se aplica (ver common::legado).
    #[error("{0}")]
    ErroLegado(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl AppError {
    // O contrato estruturado com o cliente: um código por diálogo.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION",
            AppError::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            AppError::InvalidCredentials | AppError::InvalidToken => "UNAUTHORIZED",
            AppError::UserNotFound | AppError::RecursoNaoEncontrado(_) => "NOT_FOUND",
            AppError::PedidoDuplicado { .. } => "DUPLICATE_ORDER_ID",
            AppError::LoteConsumidoEdicao { .. } => "LOT_PARTIALLY_CONSUMED_EDIT",
            AppError::LoteConsumidoExclusao { .. } => "LOT_PARTIALLY_CONSUMED_DELETE",
            AppError::ProdutoComVendas(_) => "PRODUCT_HAS_SALES",
            AppError::SkuDuplicado(_) => "DUPLICATE_SKU",
            AppError::EstoqueInsuficiente { .. } => "INSUFFICIENT_STOCK",
            AppError::ErroLegado(_) => "LEGACY_UNCLASSIFIED",
            _ => "INTERNAL",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();

        let (status, body) = match &self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = json!({
                    "error": "Um ou mais campos são inválidos.",
                    "code": code,
                    "details": details,
                });
                (StatusCode::BAD_REQUEST, body)
            }

            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                json!({ "error": "Este e-mail já está em uso.", "code": code }),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "E-mail ou senha inválidos.", "code": code }),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Token de autenticação inválido ou ausente.", "code": code }),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                json!({ "error": "Usuário não encontrado.", "code": code }),
            ),
            AppError::RecursoNaoEncontrado(recurso) => (
                StatusCode::NOT_FOUND,
                json!({ "error": format!("{} não encontrado(a).", recurso), "code": code }),
            ),

            AppError::PedidoDuplicado { id_pedido } => (
                StatusCode::CONFLICT,
                json!({
                    "error": self.to_string(),
                    "code": code,
                    "idPedido": id_pedido,
                }),
            ),
            AppError::LoteConsumidoEdicao {
                saldo_atual,
                quantidade_antiga,
            }
            | AppError::LoteConsumidoExclusao {
                saldo_atual,
                quantidade_antiga,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": self.to_string(),
                    "code": code,
                    "saldoAtual": saldo_atual,
                    "quantidadeAntiga": quantidade_antiga,
                }),
            ),
            AppError::ProdutoComVendas(_) | AppError::SkuDuplicado(_) => (
                StatusCode::CONFLICT,
                json!({ "error": self.to_string(), "code": code }),
            ),
            AppError::EstoqueInsuficiente {
                produto,
                disponivel,
                solicitado,
            } => (
                StatusCode::CONFLICT,
                json!({
                    "error": format!(
                        "Estoque insuficiente para o produto {}. Disponível: {}. Solicitado: {}.",
                        produto, disponivel, solicitado
                    ),
                    "code": code,
                    "disponivel": disponivel,
                    "solicitado": solicitado,
                }),
            ),
            AppError::ErroLegado(mensagem) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": mensagem, "code": code }),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Ocorreu um erro inesperado.", "code": code }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
