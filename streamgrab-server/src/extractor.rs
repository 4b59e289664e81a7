/* This file is part of the StreamGrab project - https://github.com/streamgrab/streamgrab
*
*  Copyright (C) 2026 StreamGrab contributors
*
*  This program is free software: you can redistribute it and/or modify
*  it under the terms of the GNU Affero General Public License as published by
*  the Free Software Foundation, either version 3 of the License, or
*  (at your option) any later version.
*
*  This program is distributed in the hope that it will be useful,
*  but WITHOUT ANY WARRANTY; without even the implied warranty of
*  MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
*  GNU Affero General Public License for more details.
*
*  You should have received a copy of the GNU Affero General Public License
*  along with this program.  If not, see <https://www.gnu.org/licenses/>.
*/
use std::{ffi::OsString, fmt::Display, io, path::PathBuf, process::Stdio, time::Duration};

use async_trait::async_trait;
use log::{debug, error};
use streamgrab_formats::{ExtractedVideo, InvalidInputError};
use tokio::process::Command;

use crate::state::ExtractorConfig;

/// Longest extractor message that is kept in an [`ExtractionError`]
const MAX_MESSAGE_LEN: usize = 300;

#[derive(Debug)]
pub enum ExtractionError {
    Spawn {
        program: PathBuf,
        err: io::Error,
    },
    Failed {
        exit_code: Option<i32>,
        message: String,
    },
    InvalidOutput(InvalidInputError),
    TimedOut(Duration),
}

// causes are already part of the message
impl std::error::Error for ExtractionError {}

impl Display for ExtractionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractionError::Spawn { program, err } => write!(f, "Failed to start the extractor ({}): {err}", program.display()),
            ExtractionError::Failed { exit_code: Some(code), message } => write!(f, "Extractor exited with code {code}: {message}"),
            ExtractionError::Failed { exit_code: None, message } => write!(f, "Extractor was terminated: {message}"),
            ExtractionError::InvalidOutput(err) => write!(f, "Extractor returned invalid data: {err}"),
            ExtractionError::TimedOut(timeout) => write!(f, "Extractor did not finish within {:.1}s", timeout.as_secs_f64()),
        }
    }
}

/// Resolves a page URL into video metadata and the list of available formats
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Name of the extractor (for logging)
    fn name(&self) -> &'static str;

    /// Extract metadata of a single video. Playlists are not expanded.
    async fn extract(&self, url: &str) -> Result<ExtractedVideo, ExtractionError>;
}

/// Runs the `yt-dlp` binary and parses its JSON dump
pub struct YtDlp {
    program: PathBuf,
    extra_args: Vec<String>,
}

impl YtDlp {
    pub fn new(config: &ExtractorConfig) -> YtDlp {
        YtDlp {
            program: config.program.clone(),
            extra_args: config.extra_args.clone(),
        }
    }

    fn build_args(&self, url: &str) -> Vec<OsString> {
        self.extra_args.iter().map(OsString::from)
            .chain([
                "--dump-single-json",
                "--no-playlist",
                "--no-warnings",
                "--quiet",
                "--",
                url,
            ].into_iter().map(OsString::from))
            .collect()
    }
}

/// Picks the most useful part of yt-dlp's stderr
fn error_message(stderr: &[u8]) -> String {
    let stderr = String::from_utf8_lossy(stderr);
    let line = stderr.lines()
        .rev()
        .map(str::trim)
        .find(|l| l.starts_with("ERROR:"))
        .or_else(|| stderr.lines().map(str::trim).rfind(|l| !l.is_empty()))
        .unwrap_or("no error output");
    line.chars().take(MAX_MESSAGE_LEN).collect()
}

#[async_trait]
impl Extractor for YtDlp {
    fn name(&self) -> &'static str {
        "yt-dlp"
    }

    async fn extract(&self, url: &str) -> Result<ExtractedVideo, ExtractionError> {
        debug!("Running {} for {url}", self.program.display());
        // kill_on_drop: a dropped request (timeout, client gone) takes the child down with it
        let output = Command::new(&self.program)
            .args(self.build_args(url))
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| ExtractionError::Spawn { program: self.program.clone(), err })?;

        if !output.status.success() {
            let message = error_message(&output.stderr);
            error!("{} failed for {url}: {message}", self.name());
            return Err(ExtractionError::Failed { exit_code: output.status.code(), message });
        }

        ExtractedVideo::from_json_slice(&output.stdout).map_err(|err| {
            error!("{} returned output that does not match the expected shape for {url}: {err}", self.name());
            ExtractionError::InvalidOutput(err)
        })
    }
}
