//! Report helpers: chart data, transaction tables, display formatting and
//! export links.

pub mod chart;
pub mod export;
pub mod format;
pub mod table;

pub use chart::{comparison_chart, cycle_colors, pie_chart, summary_chart, ChartData, Dataset};
pub use export::{export_url, ExportFormat};
pub use format::{format_date, format_rupiah, payment_label};
pub use table::{paginate, search, Page, TableRow, ITEMS_PER_PAGE};
