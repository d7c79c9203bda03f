// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Define as rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    // Rota do usuário autenticado
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let produto_routes = Router::new()
        .route(
            "/",
            get(handlers::produtos::listar).post(handlers::produtos::criar),
        )
        .route(
            "/{id}",
            get(handlers::produtos::buscar)
                .put(handlers::produtos::atualizar)
                .delete(handlers::produtos::excluir),
        )
        .route(
            "/{id}/disponibilidade",
            get(handlers::produtos::disponibilidade),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let compra_routes = Router::new()
        .route(
            "/",
            get(handlers::compras::listar).post(handlers::compras::criar),
        )
        .route(
            "/{id}",
            get(handlers::compras::buscar)
                .put(handlers::compras::atualizar)
                .delete(handlers::compras::excluir),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let venda_routes = Router::new()
        .route(
            "/",
            get(handlers::vendas::listar).post(handlers::vendas::criar),
        )
        .route(
            "/{id}",
            get(handlers::vendas::buscar)
                .put(handlers::vendas::atualizar)
                .delete(handlers::vendas::excluir),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // As rotas fixas vêm antes de "/{id}" no roteador do axum.
    let despesa_routes = Router::new()
        .route(
            "/",
            get(handlers::despesas::listar).post(handlers::despesas::criar),
        )
        .route("/categorias", get(handlers::despesas::categorias))
        .route("/total", get(handlers::despesas::total))
        .route("/periodo", get(handlers::despesas::por_periodo))
        .route(
            "/categoria/{categoria}",
            get(handlers::despesas::por_categoria),
        )
        .route(
            "/{id}",
            get(handlers::despesas::buscar)
                .put(handlers::despesas::atualizar)
                .delete(handlers::despesas::excluir),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let dashboard_routes = Router::new()
        .route("/resumo", get(handlers::dashboard::resumo))
        .route("/grafico-vendas", get(handlers::dashboard::grafico_vendas))
        .route("/top-produtos", get(handlers::dashboard::top_produtos))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/auth", user_routes)
        .nest("/api/produtos", produto_routes)
        .nest("/api/compras", compra_routes)
        .nest("/api/vendas", venda_routes)
        .nest("/api/despesas", despesa_routes)
        .nest("/api/dashboard", dashboard_routes)
        .merge(
            SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()),
        )
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
