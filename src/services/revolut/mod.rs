pub mod accounts;
pub mod mapper;
pub mod transactions;

pub use accounts::RevolutAccountService;
pub use transactions::RevolutTransactionService;
