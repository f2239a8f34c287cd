mod formatter;
mod report;

pub use formatter::format_output;
pub use formatter::OutputFormat;
pub use report::{ListingReport, SemanticSummary, ViolationStats};
