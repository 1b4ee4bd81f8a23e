use chrono::{DateTime, Duration, Utc};

use crate::error::{Result, TimerError};

/// One start/stop span of a tracker. Times are stored in UTC. An interval without an end is still
/// running.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Interval {
    start: DateTime<Utc>,
    end: Option<DateTime<Utc>>,
}

impl Interval {
    /// Create a new Interval with the specified `start` and `end`
    pub fn new(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Result<Interval> {
        match end {
            Some(end) if end < start => Err(TimerError::InvalidInterval { start, end }),
            _ => Ok(Interval { start, end }),
        }
    }

    /// Create an Interval that starts at `start` and is still running
    pub fn open(start: DateTime<Utc>) -> Interval {
        Interval { start, end: None }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Return true if the interval is open. An open interval is an Interval that has no end set.
    pub fn is_open(&self) -> bool {
        self.end.is_none()
    }

    pub(crate) fn close(&mut self, at: DateTime<Utc>) -> Result<()> {
        if at < self.start {
            return Err(TimerError::InvalidInterval {
                start: self.start,
                end: at,
            });
        }
        self.end = Some(at);
        Ok(())
    }

    /// Return the duration of the Interval. Open intervals are measured up to `now`.
    pub fn duration(&self, now: DateTime<Utc>) -> Result<Duration> {
        let end = self.end.unwrap_or(now);
        if end < self.start {
            return Err(TimerError::InvalidInterval {
                start: self.start,
                end,
            });
        }

        Ok(end - self.start)
    }
}

/// A named timer. Intervals are kept in the order they were recorded and only the last one may be
/// open.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Tracker {
    label: String,
    intervals: Vec<Interval>,
}

impl Tracker {
    /// Create a tracker that starts running at `now`
    pub fn new(label: impl Into<String>, now: DateTime<Utc>) -> Tracker {
        Tracker {
            label: label.into(),
            intervals: vec![Interval::open(now)],
        }
    }

    /// Build a tracker from already recorded intervals, checking that every interval starts after
    /// the previous one ended.
    pub(crate) fn from_parts(label: String, intervals: Vec<Interval>) -> Result<Tracker> {
        for pair in intervals.windows(2) {
            debug_assert!(!pair[0].is_open(), "only the last interval may be open");
            if let Some(end) = pair[0].end {
                if pair[1].start < end {
                    return Err(TimerError::InvalidInterval {
                        start: end,
                        end: pair[1].start,
                    });
                }
            }
        }

        Ok(Tracker { label, intervals })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Return a slice of the tracker's intervals, oldest first.
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    pub fn last_interval(&self) -> Option<&Interval> {
        self.intervals.last()
    }

    /// A tracker runs while its last interval is open.
    pub fn is_running(&self) -> bool {
        self.last_interval().is_some_and(Interval::is_open)
    }

    pub(crate) fn intervals_mut(&mut self) -> &mut Vec<Interval> {
        &mut self.intervals
    }

    /// Return the duration of all the intervals, measuring every open one against the same `now`.
    pub fn duration(&self, now: DateTime<Utc>) -> Result<Duration> {
        self.intervals
            .iter()
            .try_fold(Duration::zero(), |total, i| Ok(total + i.duration(now)?))
    }
}

/// All trackers of one store, in file order.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Collection {
    pub(crate) trackers: Vec<Tracker>,
}

impl Collection {
    pub fn new() -> Collection {
        Collection::default()
    }

    /// Return a slice of the trackers
    pub fn trackers(&self) -> &[Tracker] {
        &self.trackers
    }

    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }

    pub(crate) fn position(&self, label: &str) -> Option<usize> {
        self.trackers.iter().position(|t| t.label == label)
    }

    /// Return the first tracker with the given label.
    pub fn get(&self, label: &str) -> Result<&Tracker> {
        self.trackers
            .iter()
            .find(|t| t.label == label)
            .ok_or_else(|| TimerError::NotFound(label.to_string()))
    }
}
