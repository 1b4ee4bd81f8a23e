// Functions that edit the trackers of a collection (create, start, stop, delete).
// Every check runs before the collection is touched, so a failed edit leaves it unchanged.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use tracing::debug;

use crate::data::{Collection, Interval, Tracker};
use crate::error::{Result, TimerError};

static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+$").unwrap());

/// Return true if `label` can be written to the store as a single token.
pub fn is_valid_label(label: &str) -> bool {
    LABEL_RE.is_match(label)
}

fn tracker_mut<'a>(collection: &'a mut Collection, label: &str) -> Result<&'a mut Tracker> {
    let index = collection
        .position(label)
        .ok_or_else(|| TimerError::NotFound(label.to_string()))?;

    Ok(&mut collection.trackers[index])
}

/// Add a new tracker, running from `now`
pub fn create<'a>(
    collection: &'a mut Collection,
    label: &str,
    now: DateTime<Utc>,
) -> Result<&'a Tracker> {
    if !is_valid_label(label) {
        return Err(TimerError::InvalidLabel(label.to_string()));
    }
    if collection.position(label).is_some() {
        return Err(TimerError::AlreadyExists(label.to_string()));
    }

    debug!(label, %now, "creating tracker");
    collection.trackers.push(Tracker::new(label, now));

    Ok(&collection.trackers[collection.trackers.len() - 1])
}

/// Open a new interval on a stopped tracker
pub fn start<'a>(
    collection: &'a mut Collection,
    label: &str,
    now: DateTime<Utc>,
) -> Result<&'a Tracker> {
    let tracker = tracker_mut(collection, label)?;

    match tracker.last_interval() {
        Some(last) if last.is_open() => {
            return Err(TimerError::AlreadyRunning(label.to_string()));
        }
        Some(last) => {
            if let Some(end) = last.end().filter(|end| now < *end) {
                return Err(TimerError::InvalidInterval { start: end, end: now });
            }
        }
        None => {}
    }

    debug!(label, %now, "starting tracker");
    tracker.intervals_mut().push(Interval::open(now));

    Ok(tracker)
}

/// Close the running interval of a tracker
pub fn stop<'a>(
    collection: &'a mut Collection,
    label: &str,
    now: DateTime<Utc>,
) -> Result<&'a Tracker> {
    let tracker = tracker_mut(collection, label)?;

    match tracker.intervals_mut().last_mut() {
        Some(last) if last.is_open() => last.close(now)?,
        _ => return Err(TimerError::NotRunning(label.to_string())),
    }

    debug!(label, %now, "stopped tracker");
    Ok(tracker)
}

/// Remove a tracker and all of its intervals, returning it
pub fn delete(collection: &mut Collection, label: &str) -> Result<Tracker> {
    let index = collection
        .position(label)
        .ok_or_else(|| TimerError::NotFound(label.to_string()))?;

    debug!(label, "deleting tracker");
    Ok(collection.trackers.remove(index))
}
