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
use std::{fmt::Display, time::{Duration, Instant}};

use actix_web::{http::StatusCode, rt::time::timeout};
use anyhow::anyhow;
use log::{error, info, warn};
use streamgrab_formats::{FormatSelector, VideoSummary};
use url::{Host, Url};

use crate::{extractor::{ExtractionError, Extractor, YtDlp}, state::AppConfig, utils};

pub const GENERIC_EXTRACTION_ERROR: &str = "Failed to extract video information";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    EmptyUrl,
    MalformedUrl(String),
}

impl std::error::Error for ValidationError {}
impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::EmptyUrl => write!(f, "URL is required"),
            ValidationError::MalformedUrl(url) => write!(f, "Not a valid http(s) URL: {url}"),
        }
    }
}

#[derive(Debug)]
pub enum GrabError {
    Validation(ValidationError),
    Extraction(ExtractionError),
}

impl std::error::Error for GrabError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GrabError::Validation(err) => Some(err),
            GrabError::Extraction(err) => Some(err),
        }
    }
}
impl Display for GrabError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrabError::Validation(err) => Display::fmt(err, f),
            GrabError::Extraction(err) => Display::fmt(err, f),
        }
    }
}

impl GrabError {
    /// Converts into a response error. Extractor details are only sent to
    /// the client when `expose_details` is set, they are always logged.
    pub fn into_response_error(self, expose_details: bool) -> utils::Error {
        match self {
            GrabError::Validation(err) => utils::Error::from(anyhow::Error::new(err)).set_status(StatusCode::BAD_REQUEST),
            GrabError::Extraction(err) if expose_details => utils::Error::from(anyhow::Error::new(err)),
            GrabError::Extraction(_) => utils::Error::from(anyhow!(GENERIC_EXTRACTION_ERROR)),
        }
    }
}

/// Checks that the input looks like an absolute http(s) URL and trims it
pub fn validate_url(url: &str) -> Result<&str, ValidationError> {
    let url = url.trim();
    if url.is_empty() {
        return Err(ValidationError::EmptyUrl);
    }
    if url.contains(char::is_whitespace) || !is_web_url(url) {
        return Err(ValidationError::MalformedUrl(url.to_owned()));
    }
    Ok(url)
}

fn is_web_url(url: &str) -> bool {
    let Ok(parsed) = Url::parse(url) else { return false };
    if !matches!(parsed.scheme(), "http" | "https") || !parsed.username().is_empty() || parsed.password().is_some() {
        return false;
    }
    match parsed.host() {
        None => false,
        // every label must be non-empty, a single trailing dot is fine
        Some(Host::Domain(domain)) => {
            let domain = domain.strip_suffix('.').unwrap_or(domain);
            !domain.split('.').any(str::is_empty)
        },
        Some(Host::Ipv4(_) | Host::Ipv6(_)) => true,
    }
}

/// Turns a submitted URL into a [`VideoSummary`]
pub struct GrabService {
    extractor: Box<dyn Extractor>,
    selector: FormatSelector,
    timeout: Duration,
}

impl GrabService {
    pub fn new<E: Extractor + 'static>(extractor: E, selector: FormatSelector, timeout: Duration) -> GrabService {
        GrabService {
            extractor: Box::new(extractor),
            selector,
            timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> GrabService {
        GrabService::new(
            YtDlp::new(&config.extractor),
            FormatSelector::new(config.url_filter()),
            config.extractor.timeout(),
        )
    }

    pub fn extractor_name(&self) -> &'static str {
        self.extractor.name()
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub async fn handle(&self, url: &str) -> Result<VideoSummary, GrabError> {
        let url = validate_url(url).map_err(|err| {
            warn!("Rejected submission: {err}");
            GrabError::Validation(err)
        })?;

        info!("Extracting {url} using {}", self.extractor.name());
        let start = Instant::now();
        let video = match timeout(self.timeout, self.extractor.extract(url)).await {
            Ok(Ok(video)) => video,
            Ok(Err(err)) => {
                error!("Extraction of {url} failed: {err}");
                return Err(GrabError::Extraction(err));
            },
            Err(_) => {
                error!("Extraction of {url} timed out after {:?}", self.timeout);
                return Err(GrabError::Extraction(ExtractionError::TimedOut(self.timeout)));
            },
        };

        let selected = self.selector.select(&video.formats);
        info!(
            "Extracted {url} in {:?}: {} formats, offering {} audio and {} video",
            start.elapsed(), video.formats.len(), selected.audio.len(), selected.video.len(),
        );
        Ok(VideoSummary::new(video, selected))
    }
}
