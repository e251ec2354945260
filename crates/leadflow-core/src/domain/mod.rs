//! 도메인 모델.

pub mod account;
pub mod communication;
pub mod lead;

pub use account::{normalize_email, Account, AccountFilter, AccountStatus, NewAccount, Role};
pub use communication::{CallStatus, Direction};
pub use lead::{LeadSource, LeadStatus};
