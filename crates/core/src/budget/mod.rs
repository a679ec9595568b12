//! Budget tracking, spend reconciliation, and variance analysis.

pub mod error;
pub mod period;
pub mod service;
pub mod types;
pub mod variance;


pub use error::BudgetError;
pub use period::{BudgetPeriod, BudgetPeriodStatus, CreateBudgetPeriodInput};
pub use service::BudgetService;
pub use types::{
    AccountActivity, Allocation, AllocationReportLine, Budget, BudgetTotals, BudgetType, BudgetVsActualReport,
    CreateAllocationInput, CreateBudgetInput, MonitoringSnapshot, Reconciliation,
};
pub use variance::{VarianceResult, VarianceStatus};
