// Where the store lives and how strictly it is read.

use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};
use home::home_dir;

use crate::store::Strictness;

pub const FILE_ENV: &str = "TIMERS_FILE";
pub const LENIENT_ENV: &str = "TIMERS_LENIENT";
pub const DEFAULT_FILE_NAME: &str = ".timers";

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Config {
    pub file: PathBuf,
    pub strictness: Strictness,
}

impl Config {
    /// Resolve the configuration from command line values, falling back to the environment and
    /// then to `${HOME}/.timers`.
    pub fn resolve(file: Option<PathBuf>, lenient: bool) -> Result<Config> {
        Self::resolve_with(file, lenient, |key| env::var(key).ok(), home_dir)
    }

    fn resolve_with(
        file: Option<PathBuf>,
        lenient: bool,
        var: impl Fn(&str) -> Option<String>,
        home: impl FnOnce() -> Option<PathBuf>,
    ) -> Result<Config> {
        let file = match file {
            Some(f) => f,
            None => match var(FILE_ENV).filter(|v| !v.is_empty()) {
                Some(f) => PathBuf::from(f),
                None => home()
                    .ok_or_else(|| anyhow!("Could not find home directory, use --file"))?
                    .join(DEFAULT_FILE_NAME),
            },
        };

        let lenient = lenient
            || var(LENIENT_ENV).is_some_and(|v| matches!(v.as_str(), "1" | "true"));
        let strictness = if lenient {
            Strictness::Lenient
        } else {
            Strictness::Strict
        };

        Ok(Config { file, strictness })
    }
}
