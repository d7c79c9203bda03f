pub mod auth;
pub mod compra;
pub mod dashboard;
pub mod despesa;
pub mod produto;
pub mod venda;
