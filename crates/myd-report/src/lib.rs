//! Artifacts written by a myd run.
//!
//! - export and reject CSV files in a configurable encoding
//! - per-stage profiling reports in Markdown and HTML
//! - a reject reason frequency CSV
//! - the per-run text log

pub mod encoding;
pub mod error;
pub mod export;
pub mod html;
pub mod markdown;
pub mod profile;
pub mod reasons;
pub mod stage;
pub mod txt_log;

pub use encoding::{TextEncoding, write_text};
pub use error::{ReportError, Result};
pub use export::{export_frame, reject_frame, render_csv, write_csv};
pub use html::render_html;
pub use markdown::render_markdown;
pub use profile::{ColumnDelta, ColumnProfile, frame_delta, profile_frame};
pub use reasons::{count_reasons, render_reasons_csv, write_reject_reasons};
pub use stage::{ReportFormat, Stage, StageReport, report_path, write_stage_report};
pub use txt_log::{TextLogSummary, render_text_log};
