//! # Report Repository (Report Engine)
//!
//! Sales aggregates over a half-open time window of the ledger.
//!
//! ## One Aggregate, Three Entry Points
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  daily_report()          → today's window in the parser's offset       │
//! │  report_for_day(date)    → that date's window                          │
//! │  range_report(s, e)      → DateParser::window(s, e)                    │
//! │            │                                                            │
//! │            ▼                                                            │
//! │  report_for_window(window)                                             │
//! │     window_tx = transactions WHERE start <= created_at < end           │
//! │     revenue   = SUM(total_amount)      count = COUNT(*)                │
//! │     top       = details of window_tx GROUP BY product_name             │
//! │                 ORDER BY SUM(quantity) DESC, product_name ASC LIMIT 1  │
//! │            │                                                            │
//! │            └── count = 0 → NoTransactions                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All three figures come from one statement, so they always describe the
//! same set of committed transactions.

use chrono::{NaiveDate, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use kasir_core::{DateParser, DateWindow, Report, TopProduct};

/// Revenue, count and top product for `[?1, ?2)`.
const WINDOW_REPORT_SQL: &str = r#"
    WITH window_tx AS (
        SELECT id, total_amount
        FROM transactions
        WHERE created_at >= ?1 AND created_at < ?2
    ),
    top_product AS (
        SELECT td.product_name AS product_name,
               SUM(td.quantity) AS quantity_sold
        FROM transaction_details td
        JOIN window_tx w ON w.id = td.transaction_id
        GROUP BY td.product_name
        ORDER BY quantity_sold DESC, td.product_name ASC
        LIMIT 1
    )
    SELECT
        (SELECT COALESCE(SUM(total_amount), 0) FROM window_tx) AS total_revenue,
        (SELECT COUNT(*) FROM window_tx) AS total_transactions,
        (SELECT product_name FROM top_product) AS product_name,
        (SELECT quantity_sold FROM top_product) AS quantity_sold
"#;

/// Repository for read-only sales reports.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
    parser: DateParser,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    ///
    /// `parser` decides the offset that calendar days and offset-less
    /// date strings are read in.
    pub fn new(pool: SqlitePool, parser: DateParser) -> Self {
        ReportRepository { pool, parser }
    }

    /// Report for the current calendar day.
    pub async fn daily_report(&self) -> DbResult<Report> {
        let window = self.parser.today_window(Utc::now())?;
        self.report_for_window(&window).await
    }

    /// Report for one calendar day, midnight to midnight.
    pub async fn report_for_day(&self, date: NaiveDate) -> DbResult<Report> {
        let window = self.parser.day_window(date)?;
        self.report_for_window(&window).await
    }

    /// Report for `[start, end)` given as date strings.
    ///
    /// Callers wanting the whole end day pass it through
    /// [`normalize_end_of_day`](kasir_core::normalize_end_of_day) first.
    ///
    /// ## Errors
    /// * `InvalidDateFormat` - either bound is not a recognised format
    /// * `InvalidDateRange` - `end <= start`
    /// * `NoTransactions` - nothing was sold in the window
    pub async fn range_report(&self, start: &str, end: &str) -> DbResult<Report> {
        let window = self.parser.window(start, end)?;
        self.report_for_window(&window).await
    }

    /// Aggregates every transaction inside `window`.
    pub async fn report_for_window(&self, window: &DateWindow) -> DbResult<Report> {
        debug!(start = %window.start(), end = %window.end(), "Aggregating report window");

        let (total_revenue, total_transactions, product_name, quantity_sold): (
            i64,
            i64,
            Option<String>,
            Option<i64>,
        ) = sqlx::query_as(WINDOW_REPORT_SQL)
            .bind(window.start())
            .bind(window.end())
            .fetch_one(&self.pool)
            .await?;

        if total_transactions == 0 {
            return Err(window.no_transactions().into());
        }

        Ok(Report {
            total_revenue,
            total_transactions,
            top_product: TopProduct {
                product_name: product_name.unwrap_or_default(),
                quantity_sold: quantity_sold.unwrap_or_default(),
            },
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
