pub mod accounts;
pub mod mapper;
pub mod multi_factor;
pub mod transactions;

pub use accounts::DeutscheAccountService;
pub use multi_factor::{AuthorisationHeaders, MultiFactorService};
pub use transactions::DeutscheTransactionService;
