pub mod user_repo;
pub use user_repo::UserRepository;
pub mod produto_repo;
pub use produto_repo::ProdutoRepository;
pub mod compra_repo;
pub use compra_repo::CompraRepository;
pub mod venda_repo;
pub use venda_repo::VendaRepository;
pub mod despesa_repo;
pub use despesa_repo::DespesaRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
