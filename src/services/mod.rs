pub mod auth;
pub mod compra_service;
pub mod dashboard_service;
pub mod despesa_service;
pub mod produto_service;
pub mod venda_service;
