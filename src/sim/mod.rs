/// Hour-by-hour dispatch simulator.
pub mod dispatch;
/// Post-hoc dispatch KPIs.
pub mod kpi;
pub mod power_balance;
pub mod types;
