//! The API endpoint URIs.

/// The root route, which describes the API.
pub const ROOT: &str = "/";
/// The route to upload CSV files of transactions.
pub const UPLOAD: &str = "/api/upload";
/// The route to list and create transactions.
pub const TRANSACTIONS: &str = "/api/transactions";
/// The route for the spending analysis report.
pub const ANALYSIS: &str = "/api/analysis";
/// The route for the monthly breakdown report.
pub const MONTHLY: &str = "/api/monthly";
/// The route to list and upsert budget goals.
pub const BUDGET_GOALS: &str = "/api/budget-goals";
/// The route for comparing two time periods.
pub const COMPARISON: &str = "/api/comparison";
/// The route for overall statistics.
pub const STATS: &str = "/api/stats";
