// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Produtos ---
        handlers::produtos::listar,
        handlers::produtos::buscar,
        handlers::produtos::criar,
        handlers::produtos::atualizar,
        handlers::produtos::excluir,
        handlers::produtos::disponibilidade,

        // --- Compras ---
        handlers::compras::listar,
        handlers::compras::buscar,
        handlers::compras::criar,
        handlers::compras::atualizar,
        handlers::compras::excluir,

        // --- Vendas ---
        handlers::vendas::listar,
        handlers::vendas::buscar,
        handlers::vendas::criar,
        handlers::vendas::atualizar,
        handlers::vendas::excluir,

        // --- Despesas ---
        handlers::despesas::listar,
        handlers::despesas::buscar,
        handlers::despesas::criar,
        handlers::despesas::atualizar,
        handlers::despesas::excluir,
        handlers::despesas::categorias,
        handlers::despesas::total,
        handlers::despesas::por_categoria,
        handlers::despesas::por_periodo,

        // --- Dashboard ---
        handlers::dashboard::resumo,
        handlers::dashboard::grafico_vendas,
        handlers::dashboard::top_produtos,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,

            // --- Produtos ---
            models::produto::Produto,
            models::produto::ProdutoPayload,
            models::produto::Disponibilidade,

            // --- Compras ---
            models::compra::Compra,
            models::compra::ItemCompra,
            models::compra::StatusLote,
            models::compra::OrigemLote,
            models::compra::EntradaLegada,
            models::compra::CompraPayload,
            models::compra::ItemCompraPayload,

            // --- Vendas ---
            models::venda::Venda,
            models::venda::ItemVenda,
            models::venda::ItemVendaAgrupado,
            models::venda::VendaPayload,
            models::venda::ItemVendaPayload,

            // --- Despesas ---
            models::despesa::Despesa,
            models::despesa::DespesaPayload,
            models::despesa::TotalDespesas,

            // --- Dashboard ---
            models::dashboard::ResumoDashboard,
            models::dashboard::MetricasMes,
            models::dashboard::CrescimentoMensal,
            models::dashboard::PontoGraficoVendas,
            models::dashboard::TopProduto,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Produtos", description = "Catálogo e Estoque"),
        (name = "Compras", description = "Entradas de Estoque (Lotes)"),
        (name = "Vendas", description = "Vendas com Custeio PEPS"),
        (name = "Despesas", description = "Despesas Operacionais"),
        (name = "Dashboard", description = "Indicadores e Gráficos Gerenciais")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
