//! The poll → extract → dedup → notify cycle.
//!
//! One task owns the loop and its [`SeenSet`]; cycles run back to back with a
//! fixed sleep in between and never overlap.  Fetch and delivery failures are
//! logged here and never end the loop.
pub mod seen;

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use anyhow::Result;
use futures_util::FutureExt;
use tracing::{debug, error, info, warn};

use crate::country::detect_country;
use crate::format::format_notification;
use crate::notifier::Notifier;
use crate::otp::extract_otp;
use crate::panel::{PanelClient, RowRecord};

pub use seen::SeenSet;

// ───────────────────────────── Seams ─────────────────────────────────────

/// Where rows come from.  Rows are expected oldest-first.
pub trait RowSource {
    fn fetch(&self) -> impl Future<Output = Result<Vec<RowRecord>>> + Send;
}

/// Where notifications go.
pub trait Sink {
    fn deliver(&self, text: &str) -> impl Future<Output = Result<()>> + Send;
}

impl RowSource for PanelClient {
    async fn fetch(&self) -> Result<Vec<RowRecord>> {
        self.fetch_rows().await
    }
}

impl Sink for Notifier {
    async fn deliver(&self, text: &str) -> Result<()> {
        self.send_message(text).await
    }
}

/// Prints notifications instead of sending them (`DRY_RUN=true`).
pub struct ConsoleSink;

impl Sink for ConsoleSink {
    async fn deliver(&self, text: &str) -> Result<()> {
        println!("\n[DRY RUN]\n{text}\n");
        Ok(())
    }
}

// ───────────────────────────── Cycle ─────────────────────────────────────

/// Render the notification for one row.  The result doubles as the dedup key.
pub fn build_notification(row: &RowRecord) -> String {
    let country = detect_country(&row.phone_number);
    let otp = extract_otp(&row.raw_message);
    format_notification(row, country, otp)
}

/// Outcome of one poll cycle.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CycleReport {
    pub fetched: usize,
    pub delivered: usize,
    pub failed: usize,
    pub duplicates: usize,
    pub fetch_failed: bool,
}

pub struct PollLoop<S, N> {
    source: S,
    sink: N,
    seen: SeenSet,
    interval: Duration,
}

impl<S: RowSource, N: Sink> PollLoop<S, N> {
    pub fn new(source: S, sink: N, seen_capacity: usize, interval: Duration) -> Self {
        Self {
            source,
            sink,
            seen: SeenSet::new(seen_capacity),
            interval,
        }
    }

    #[cfg(test)]
    pub fn seen(&self) -> &SeenSet {
        &self.seen
    }

    /// Run a single fetch-and-notify cycle.
    ///
    /// A fetch error counts as an empty cycle.  Every attempted delivery is
    /// recorded as seen, whether or not it succeeded, so a failed send is
    /// never retried.
    pub async fn poll_once(&mut self) -> CycleReport {
        let rows = match self.source.fetch().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Error fetching data: {e:#}");
                return CycleReport {
                    fetch_failed: true,
                    ..CycleReport::default()
                };
            }
        };

        let mut report = CycleReport {
            fetched: rows.len(),
            ..CycleReport::default()
        };

        for row in &rows {
            let text = build_notification(row);
            if self.seen.contains(&text) {
                report.duplicates += 1;
                continue;
            }

            match self.sink.deliver(&text).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!("Telegram send error: {e:#}");
                    report.failed += 1;
                }
            }
            self.seen.insert(text);
        }

        report
    }

    /// Poll forever.  Only process exit stops this.
    pub async fn run(mut self) {
        info!(
            "OTP poll loop started (interval={}s, seen capacity={})",
            self.interval.as_secs(),
            self.seen.capacity()
        );

        loop {
            match AssertUnwindSafe(self.poll_once()).catch_unwind().await {
                Ok(report) if report.delivered + report.failed > 0 => info!(
                    "Cycle: fetched={}, delivered={}, failed={}, duplicates={}, seen={}",
                    report.fetched,
                    report.delivered,
                    report.failed,
                    report.duplicates,
                    self.seen.len()
                ),
                Ok(report) => debug!("Cycle: {report:?}"),
                Err(_) => error!("Main loop error: poll cycle panicked"),
            }

            tokio::time::sleep(self.interval).await;
        }
    }
}
