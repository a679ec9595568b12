//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod budget;
pub mod budget_period;
mod convert;
pub mod journal;
pub mod organization;

pub use account::{AccountError, AccountRepository};
pub use budget::{BudgetRepoError, BudgetRepository, BudgetWithAllocations};
pub use budget_period::BudgetPeriodRepository;
pub use journal::{JournalError, JournalRepository, PostingResult};
pub use organization::{OrganizationError, OrganizationRepository};
