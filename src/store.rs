use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use fs4::fs_std::FileExt;
use nom::bytes::complete::take_till1;
use nom::character::complete::{space0, space1};
use nom::combinator::{eof, map_res};
use nom::multi::many0;
use nom::sequence::{pair, preceded, terminated};
use nom::IResult as NomResult;
use tracing::{debug, warn};

use crate::data::{Collection, Interval, Tracker};
use crate::error::{Result, TimerError};

fn parse_token(input: &str) -> NomResult<&str, &str> {
    take_till1(|c: char| c.is_whitespace())(input)
}

fn parse_timestamp(input: &str) -> NomResult<&str, DateTime<Utc>> {
    map_res(parse_token, |v: &str| {
        DateTime::parse_from_rfc3339(v).map(|d| d.with_timezone(&Utc))
    })(input)
}

/*
Parse one tracker line:
 <label> <start> <end> <start> <end> ... [<start>]
where every timestamp is RFC 3339 (e.g.: 2012-11-01T22:08:41+00:00). The last start may be left
without an end when the tracker is running.
 */
fn parse_line(input: &str) -> NomResult<&str, (&str, Vec<DateTime<Utc>>)> {
    terminated(
        pair(parse_token, many0(preceded(space1, parse_timestamp))),
        pair(space0, eof),
    )(input)
}

/// Format a timestamp the way it is written to the store.
pub fn format_timestamp(t: &DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// What to do with a line that cannot be decoded.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum Strictness {
    /// Abort the whole load on the first bad line.
    #[default]
    Strict,
    /// Skip bad lines, report them, and keep going.
    Lenient,
}

/// Result of decoding a store. `skipped` is always empty in strict mode.
#[derive(Debug, Default)]
pub struct Decoded {
    pub collection: Collection,
    pub skipped: Vec<TimerError>,
}

fn decode_line(number: usize, line: &str) -> Result<Tracker> {
    let parse_error = |reason: String| TimerError::Parse {
        line: number,
        reason,
    };

    if line.starts_with(char::is_whitespace) {
        return Err(parse_error("line does not start with a label".to_string()));
    }

    let (label, stamps) = match parse_line(line) {
        Ok((_, parsed)) => parsed,
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => {
            let token = e.input.split_whitespace().next().unwrap_or(e.input);
            return Err(parse_error(format!("cannot parse timestamp \"{token}\"")));
        }
        Err(nom::Err::Incomplete(_)) => return Err(parse_error("incomplete line".to_string())),
    };

    let intervals = stamps
        .chunks(2)
        .map(|c| Interval::new(c[0], c.get(1).copied()))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| parse_error(e.to_string()))?;

    Tracker::from_parts(label.to_string(), intervals).map_err(|e| parse_error(e.to_string()))
}

/// Decode the text representation of a store, one tracker per line.
pub fn decode(text: &str, strictness: Strictness) -> Result<Decoded> {
    let mut decoded = Decoded::default();

    for (i, raw) in text.split('\n').enumerate() {
        let line = raw.strip_suffix('\r').unwrap_or(raw);
        if line.trim().is_empty() {
            continue;
        }

        let tracker = decode_line(i + 1, line).and_then(|t| {
            if decoded.collection.position(t.label()).is_some() {
                Err(TimerError::Parse {
                    line: i + 1,
                    reason: format!("duplicate label \"{}\"", t.label()),
                })
            } else {
                Ok(t)
            }
        });

        match (tracker, strictness) {
            (Ok(t), _) => decoded.collection.trackers.push(t),
            (Err(e), Strictness::Strict) => return Err(e),
            (Err(e), Strictness::Lenient) => {
                warn!("skipping tracker: {e}");
                decoded.skipped.push(e);
            }
        }
    }

    debug!(
        trackers = decoded.collection.len(),
        skipped = decoded.skipped.len(),
        "decoded store"
    );
    Ok(decoded)
}

fn encode_tracker(tracker: &Tracker) -> String {
    let mut tokens = vec![tracker.label().to_string()];
    for interval in tracker.intervals() {
        tokens.push(format_timestamp(&interval.start()));
        if let Some(end) = interval.end() {
            tokens.push(format_timestamp(&end));
        }
    }

    tokens.join(" ")
}

/// Encode a collection back to its text representation.
pub fn encode(collection: &Collection) -> String {
    collection
        .trackers()
        .iter()
        .map(|t| encode_tracker(t) + "\n")
        .collect()
}

/// The store file, held under an exclusive lock until dropped.
pub struct TimerFile {
    file: File,
    path: PathBuf,
}

impl TimerFile {
    /// Open the store for a read-mutate-write cycle, creating it when missing.
    pub fn open(path: &Path) -> Result<TimerFile> {
        let mut options = OpenOptions::new();
        options.read(true).write(true).create(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let file = options.open(path)?;
        FileExt::lock_exclusive(&file)?;
        debug!(path = %path.display(), "locked timer file");

        Ok(TimerFile {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_contents(&mut self) -> Result<String> {
        let mut contents = String::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_string(&mut contents)?;

        Ok(contents)
    }

    /// Overwrite the whole file with `text`.
    pub fn replace_contents(&mut self, text: &str) -> Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.write_all(text.as_bytes())?;
        self.file.sync_all()?;
        debug!(path = %self.path.display(), bytes = text.len(), "wrote timer file");

        Ok(())
    }
}

/// Read the store without modifying it. A missing file reads as an empty store.
pub fn read_contents(path: &Path) -> Result<String> {
    let mut file = match File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "timer file does not exist yet");
            return Ok(String::new());
        }
        Err(e) => return Err(e.into()),
    };
    FileExt::lock_shared(&file)?;

    let mut contents = String::new();
    file.read_to_string(&mut contents)?;

    Ok(contents)
}


#[cfg(test)]
mod file_tests {
    use crate::store::{read_contents, TimerFile};
    use tempfile::tempdir;

    #[test]
    fn test_read_missing_file() {
        let dir = tempdir().unwrap();

        assert_eq!(read_contents(&dir.path().join("missing")).unwrap(), "");
    }

    #[test]
    fn test_replace_contents() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("timers");

        {
            let mut file = TimerFile::open(&path).unwrap();
            assert_eq!(file.read_contents().unwrap(), "");
            file.replace_contents("a long first line\n").unwrap();
        }
        {
            let mut file = TimerFile::open(&path).unwrap();
            assert_eq!(file.read_contents().unwrap(), "a long first line\n");
            file.replace_contents("short\n").unwrap();
            assert_eq!(file.read_contents().unwrap(), "short\n");
        }

        assert_eq!(read_contents(&path).unwrap(), "short\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_created_file_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("timers");
        TimerFile::open(&path).unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
