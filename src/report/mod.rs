//! Plan, inspection, and conversion reports.

pub mod render;
pub mod types;

pub use render::{
    render_conversion, render_inspection, render_plan, write_batch_reports, write_json_report,
};
pub use types::{
    AllocationReport, BatchEntry, ConversionReport, FailureRecord, InspectionReport, ReportEntry, SubnetExport,
    SubnetRecord,
};
