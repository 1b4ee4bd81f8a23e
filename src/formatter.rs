// Build the reports shown by `list` and lay them out as text tables.

use std::fmt::{Display, Formatter};

use chrono::{DateTime, Duration, Local, Utc};

use crate::data::{Collection, Tracker};
use crate::error::Result;

/// Print the duration in a HH:MM:SS format
pub fn pretty_duration(d: &Duration) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        d.num_hours(),
        d.num_minutes() % 60,
        d.num_seconds() % 60
    )
}

fn local_time(t: &DateTime<Utc>) -> String {
    t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SummaryRow {
    pub label: String,
    pub duration: Duration,
    pub running: bool,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct IntervalRow {
    pub start: DateTime<Utc>,
    pub end: Option<DateTime<Utc>>,
    pub duration: Duration,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Detail {
    pub label: String,
    pub rows: Vec<IntervalRow>,
    pub total: Duration,
}

/// What `list` shows: every tracker with its total, or the intervals of one tracker.
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum Report {
    Summary(Vec<SummaryRow>),
    Detail(Detail),
}

/// Totals of every tracker in the collection, measured against a single `now`.
pub fn summary(collection: &Collection, now: DateTime<Utc>) -> Result<Report> {
    let rows = collection
        .trackers()
        .iter()
        .map(|t| {
            Ok(SummaryRow {
                label: t.label().to_string(),
                duration: t.duration(now)?,
                running: t.is_running(),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Report::Summary(rows))
}

/// Every interval of one tracker.
pub fn detail(tracker: &Tracker, now: DateTime<Utc>) -> Result<Report> {
    let rows = tracker
        .intervals()
        .iter()
        .map(|i| {
            Ok(IntervalRow {
                start: i.start(),
                end: i.end(),
                duration: i.duration(now)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    let total = rows.iter().fold(Duration::zero(), |a, r| a + r.duration);

    Ok(Report::Detail(Detail {
        label: tracker.label().to_string(),
        rows,
        total,
    }))
}

// Left aligned columns separated by two spaces. The last column is not padded.
fn write_table(f: &mut Formatter<'_>, header: &[&str], rows: &[Vec<String>]) -> std::fmt::Result {
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    for row in std::iter::once(&header).chain(rows) {
        let mut line = String::new();
        for (i, cell) in row.iter().enumerate() {
            if i + 1 == row.len() {
                line.push_str(cell);
            } else {
                line.push_str(&format!("{:<width$}  ", cell, width = widths[i]));
            }
        }
        writeln!(f, "{}", line.trim_end())?;
    }

    Ok(())
}

impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Report::Summary(rows) => {
                let rows: Vec<Vec<String>> = rows
                    .iter()
                    .map(|r| {
                        vec![
                            r.label.clone(),
                            pretty_duration(&r.duration),
                            if r.running { "Running" } else { "Stopped" }.to_string(),
                        ]
                    })
                    .collect();
                write_table(f, &["Label", "Duration", "Status"], &rows)
            }
            Report::Detail(detail) => {
                let rows: Vec<Vec<String>> = detail
                    .rows
                    .iter()
                    .map(|r| {
                        vec![
                            local_time(&r.start),
                            r.end
                                .as_ref()
                                .map(local_time)
                                .unwrap_or_else(|| "Running".to_string()),
                            pretty_duration(&r.duration),
                        ]
                    })
                    .collect();
                write_table(f, &["Start", "End", "Duration"], &rows)?;
                writeln!(
                    f,
                    "Total for \"{}\": {}",
                    detail.label,
                    pretty_duration(&detail.total)
                )
            }
        }
    }
}
