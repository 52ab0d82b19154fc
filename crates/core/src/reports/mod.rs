//! Transaction reports: filtering, summaries, breakdowns and year export.

pub mod service;
pub mod types;


pub use service::ReportService;
pub use types::{
    CategoryTotal, ExportSummary, MonthlyTotals, ReportFilter, ReportGroup, ReportSummary,
    YearExport,
};
