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
use std::{fs::File, io::{self, Read, Write}, path::{Path, PathBuf}, time::Duration};

use anyhow::{bail, Context};
use chrono::{DateTime, Utc};
use log::info;
use serde::{Deserialize, Serialize};
use streamgrab_formats::HostPrefixFilter;

pub const DEFAULT_EXTRACTOR_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub static_content_path: PathBuf,
    pub listen: ListenConfig,
    /// Resource URLs must start with one of these to be shown.
    /// An empty list shows every URL.
    pub accepted_url_prefixes: Vec<String>,
    /// Send the extractor's error message to clients instead of a generic one
    pub expose_extractor_errors: bool,
    pub extractor: ExtractorConfig,
    #[serde(skip)]
    pub startup_timestamp: DateTime<Utc>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            static_content_path: PathBuf::from("./static"),
            listen: ListenConfig::default(),
            accepted_url_prefixes: vec!["https://rr".to_owned()],
            expose_extractor_errors: false,
            extractor: ExtractorConfig::default(),
            startup_timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    pub program: PathBuf,
    /// Passed to the program before the regular yt-dlp arguments
    pub extra_args: Vec<String>,
    pub timeout_secs: f64,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from("yt-dlp"),
            extra_args: Vec::new(),
            timeout_secs: DEFAULT_EXTRACTOR_TIMEOUT.as_secs_f64(),
        }
    }
}

impl ExtractorConfig {
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_secs).unwrap_or(DEFAULT_EXTRACTOR_TIMEOUT)
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ListenConfig {
    pub tcp: Option<(String, u16)>,
    pub unix: Option<String>,
    pub unix_mode: Option<u32>,
}

impl Default for ListenConfig {
    fn default() -> Self {
        Self {
            tcp: Some(("0.0.0.0".to_owned(), 5000)),
            unix: None,
            unix_mode: None,
        }
    }
}

impl AppConfig {
    /// Reads the config file, or writes out the defaults if it doesn't exist yet
    pub fn load(path: &Path) -> anyhow::Result<AppConfig> {
        let path_str = path.display();
        let cfg = match File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                file.read_to_string(&mut contents).with_context(|| format!("Failed to read {path_str}"))?;
                toml::from_str(&contents).with_context(|| format!("Failed to deserialize contents of {path_str}"))?
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                let cfg = AppConfig::default();
                let serialized = toml::to_string(&cfg).context("Failed to serialize default AppConfig as TOML")?;
                let mut file = File::options().write(true).create_new(true).open(path).with_context(|| format!("Failed to create {path_str}"))?;
                write!(file, "{serialized}").with_context(|| format!("Failed to write serialized default AppConfig to {path_str}"))?;
                info!("Wrote default configuration to {path_str}");
                cfg
            },
            Err(e) => {
                return Err(e).context(format!("Failed to open {path_str}"));
            }
        };
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.listen.tcp.is_none() && self.listen.unix.is_none() {
            bail!("Invalid configuration - no tcp port or unix socket path specified");
        }
        if !self.extractor.timeout_secs.is_finite() || self.extractor.timeout_secs <= 0. {
            bail!("Invalid configuration - extractor.timeout_secs must be a positive number, got {}", self.extractor.timeout_secs);
        }
        if self.extractor.program.as_os_str().is_empty() {
            bail!("Invalid configuration - extractor.program is empty");
        }
        Ok(())
    }

    pub fn url_filter(&self) -> HostPrefixFilter {
        HostPrefixFilter::new(self.accepted_url_prefixes.iter().cloned())
    }
}
