//! # Report Commands
//!
//! ```text
//! kasir report daily                      today in KASIR_UTC_OFFSET
//! kasir report daily --date 2024-05-01    that calendar day
//! kasir report range --start S --end E    [S, E), date-only E covers the whole day
//! ```

use chrono::NaiveDate;
use tracing::debug;

use crate::error::ApiError;
use kasir_core::{normalize_end_of_day, DateParser, Report};
use kasir_db::Database;

/// Report for today, or for `date` when given.
pub async fn daily(
    db: &Database,
    parser: DateParser,
    date: Option<NaiveDate>,
) -> Result<Report, ApiError> {
    let reports = db.reports(parser);
    let report = match date {
        Some(date) => reports.report_for_day(date).await?,
        None => reports.daily_report().await?,
    };

    Ok(report)
}

/// Report for a caller-supplied range.
///
/// A date-only `end` is pushed to 23:59:59 of that day before parsing.
pub async fn range(
    db: &Database,
    parser: DateParser,
    start: &str,
    end: &str,
) -> Result<Report, ApiError> {
    let end = normalize_end_of_day(end);
    debug!(start, end = %end, "Range report");

    Ok(db.reports(parser).range_report(start, &end).await?)
}
