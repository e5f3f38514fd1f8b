//! Deployment: planning, execution and reporting

pub mod copy;
pub mod executor;
pub mod plan;
pub mod report;

pub use executor::DeploymentExecutor;
pub use plan::{plan, DeploymentPlan, Operation, PlanMode};
pub use report::{ExecutionReport, Outcome, ReportEntry};
