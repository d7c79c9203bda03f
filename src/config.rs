// src/config.rs

use sqlx::{PgPool, postgres::PgPoolOptions};
use std::{env, time::Duration};

use crate::db::{
    CompraRepository, DashboardRepository, DespesaRepository, ProdutoRepository, UserRepository,
    VendaRepository,
};
use crate::services::{
    auth::AuthService, compra_service::CompraService, dashboard_service::DashboardService,
    despesa_service::DespesaService, produto_service::ProdutoService, venda_service::VendaService,
};

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub produto_service: ProdutoService,
    pub compra_service: CompraService,
    pub venda_service: VendaService,
    pub despesa_service: DespesaService,
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let produto_repo = ProdutoRepository::new(db_pool.clone());
        let compra_repo = CompraRepository::new(db_pool.clone());
        let venda_repo = VendaRepository::new(db_pool.clone());
        let despesa_repo = DespesaRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo, jwt_secret);
        let produto_service = ProdutoService::new(produto_repo.clone());
        let compra_service = CompraService::new(compra_repo.clone(), produto_repo.clone());
        let venda_service = VendaService::new(venda_repo, compra_repo, produto_repo);
        let despesa_service = DespesaService::new(despesa_repo.clone());
        let dashboard_service = DashboardService::new(dashboard_repo, despesa_repo);

        Ok(Self {
            db_pool,
            auth_service,
            produto_service,
            compra_service,
            venda_service,
            despesa_service,
            dashboard_service,
        })
    }
}
