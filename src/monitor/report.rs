//! Payloads handed to the presentation layer

use std::fmt;
use std::io::Write;
use std::sync::Mutex;

#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::version::types::{CheckResult, VersionStatus};

/// Which kind of cycle produced a set of results
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckMode {
    /// Interval-triggered; packages missing locally are not fetched
    Scheduled,
    /// Operator-initiated report over every watched package
    Full,
}

impl CheckMode {
    /// Whether a result counts toward the out-of-date total in this mode
    pub fn counts_as_out_of_date(&self, status: VersionStatus) -> bool {
        match status {
            VersionStatus::OutOfDate => true,
            VersionStatus::Ahead => *self == CheckMode::Full,
            _ => false,
        }
    }
}

/// The two operator actions offered alongside a detailed report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Suppress until the fingerprint next changes
    Hide,
    /// Suppress for the configured snooze duration
    Snooze,
}

/// One-line outcome shown after every completed cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    OutOfDate(usize),
    AllUpToDate,
}

impl Summary {
    pub fn from_count(out_of_date: usize) -> Self {
        if out_of_date > 0 {
            Summary::OutOfDate(out_of_date)
        } else {
            Summary::AllUpToDate
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Summary::OutOfDate(1) => f.write_str("You have 1 watched module out of date."),
            Summary::OutOfDate(n) => write!(f, "You have {} watched modules out of date.", n),
            Summary::AllUpToDate => f.write_str("All watched modules up to date."),
        }
    }
}

/// Results of one cycle grouped for display
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub up_to_date: Vec<CheckResult>,
    pub out_of_date: Vec<CheckResult>,
    pub not_installed: Vec<CheckResult>,
    pub unknown: Vec<CheckResult>,
}

impl Report {
    /// Group results into buckets, each sorted by id
    pub fn build(results: &[CheckResult], mode: CheckMode) -> Self {
        let mut report = Report::default();
        for result in results {
            let bucket = match result.status {
                status if mode.counts_as_out_of_date(status) => &mut report.out_of_date,
                VersionStatus::UpToDate | VersionStatus::Ahead => &mut report.up_to_date,
                VersionStatus::NotInstalled => &mut report.not_installed,
                VersionStatus::Unknown | VersionStatus::OutOfDate => &mut report.unknown,
            };
            bucket.push(result.clone());
        }
        for bucket in [
            &mut report.up_to_date,
            &mut report.out_of_date,
            &mut report.not_installed,
            &mut report.unknown,
        ] {
            bucket.sort_by(|a, b| a.id.cmp(&b.id));
        }
        report
    }

    pub fn is_empty(&self) -> bool {
        self.up_to_date.is_empty()
            && self.out_of_date.is_empty()
            && self.not_installed.is_empty()
            && self.unknown.is_empty()
    }
}

/// Presentation layer the monitor reports to
#[cfg_attr(test, automock)]
pub trait Presenter: Send + Sync {
    /// Called after every completed cycle
    fn summary(&self, summary: &Summary);

    /// Called when the detailed report should be shown
    fn on_cycle_complete(&self, report: &Report);
}

/// Presenter that writes plain text to a writer (stdout by default)
pub struct TerminalPresenter<W: Write + Send> {
    out: Mutex<W>,
}

impl TerminalPresenter<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send> TerminalPresenter<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    pub fn into_inner(self) -> W {
        self.out
            .into_inner()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_section(out: &mut W, title: &str, results: &[CheckResult]) -> std::io::Result<()> {
        if results.is_empty() {
            return Ok(());
        }
        writeln!(out, "{}:", title)?;
        for r in results {
            let disabled = if r.active || r.installed_version.is_none() {
                ""
            } else {
                " [disabled]"
            };
            writeln!(
                out,
                "  {} ({}){}  {} -> {}",
                r.display_name,
                r.id,
                disabled,
                r.installed_version.as_deref().unwrap_or("(unknown)"),
                r.latest_version.as_deref().unwrap_or("(unknown)"),
            )?;
            if !r.release_page_url.is_empty() {
                writeln!(out, "      {}", r.release_page_url)?;
            }
        }
        Ok(())
    }

    fn write_report(&self, report: &Report) -> std::io::Result<()> {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        Self::write_section(&mut out, "Updates available", &report.out_of_date)?;
        Self::write_section(&mut out, "Up to date", &report.up_to_date)?;
        Self::write_section(&mut out, "Unknown", &report.unknown)?;
        Self::write_section(&mut out, "Not installed", &report.not_installed)?;
        if !report.out_of_date.is_empty() {
            writeln!(
                out,
                "Run `version-monitor hide` to hide until the next update, or `version-monitor snooze` to be reminded later."
            )?;
        }
        out.flush()
    }
}

impl<W: Write + Send> Presenter for TerminalPresenter<W> {
    fn summary(&self, summary: &Summary) {
        let mut out = self.out.lock().unwrap_or_else(|p| p.into_inner());
        let _ = writeln!(out, "{}", summary);
    }

    fn on_cycle_complete(&self, report: &Report) {
        let _ = self.write_report(report);
    }
}
