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
use std::sync::{atomic::{AtomicUsize, Ordering::Relaxed}, Arc};

use async_trait::async_trait;
use streamgrab_formats::ExtractedVideo;

use crate::extractor::{ExtractionError, Extractor};

#[derive(Clone)]
pub enum FakeOutcome {
    /// Parse this as yt-dlp output
    Video(serde_json::Value),
    /// Fail with this message
    Fail(&'static str),
    /// Never finish
    Hang,
}

/// Extractor returning canned results, counting how often it was called
#[derive(Clone)]
pub struct FakeExtractor {
    outcome: FakeOutcome,
    pub calls: Arc<AtomicUsize>,
}

impl FakeExtractor {
    pub fn new(outcome: FakeOutcome) -> FakeExtractor {
        FakeExtractor { outcome, calls: Arc::default() }
    }
}

#[async_trait]
impl Extractor for FakeExtractor {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn extract(&self, _url: &str) -> Result<ExtractedVideo, ExtractionError> {
        self.calls.fetch_add(1, Relaxed);
        match &self.outcome {
            FakeOutcome::Video(json) => ExtractedVideo::from_json_value(json.clone()).map_err(ExtractionError::InvalidOutput),
            FakeOutcome::Fail(message) => Err(ExtractionError::Failed { exit_code: Some(1), message: (*message).to_owned() }),
            FakeOutcome::Hang => std::future::pending().await,
        }
    }
}
