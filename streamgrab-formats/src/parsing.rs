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
//! Conversion of yt-dlp's info JSON into [`ExtractedVideo`].
//!
//! All defaulting happens here, so the selector never has to guess what a
//! missing field means.
use serde::Deserialize;

use crate::{errors::InvalidInputError, types::*};

/// Marker used by yt-dlp for "this stream has no such track"
const NO_CODEC: &str = "none";

#[derive(Deserialize)]
struct RawVideo {
    title: Option<String>,
    thumbnail: Option<String>,
    uploader: Option<String>,
    duration: Option<f64>,
    formats: Option<Vec<RawFormat>>,
}

#[derive(Deserialize)]
struct RawFormat {
    format_id: String,
    vcodec: Option<String>,
    acodec: Option<String>,
    format_note: Option<String>,
    abr: Option<f64>,
    ext: Option<String>,
    url: Option<String>,
    filesize: Option<f64>,
    filesize_approx: Option<f64>,
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

fn codec(s: Option<String>) -> Option<String> {
    non_empty(s).filter(|c| !c.eq_ignore_ascii_case(NO_CODEC))
}

fn non_negative(format_id: &str, field: &'static str, value: Option<f64>) -> Result<Option<f64>, InvalidInputError> {
    match value {
        Some(v) if !v.is_finite() || v < 0. => Err(InvalidInputError::InvalidValue { format_id: format_id.to_owned(), field, value: v }),
        v => Ok(v),
    }
}

impl TryFrom<RawFormat> for FormatDescriptor {
    type Error = InvalidInputError;

    fn try_from(raw: RawFormat) -> Result<Self, Self::Error> {
        let filesize = non_negative(&raw.format_id, "filesize", raw.filesize)?;
        let filesize_approx = non_negative(&raw.format_id, "filesize_approx", raw.filesize_approx)?;
        let audio_bitrate = non_negative(&raw.format_id, "abr", raw.abr)?;
        Ok(FormatDescriptor {
            codec_info: CodecInfo {
                video_codec: codec(raw.vcodec),
                audio_codec: codec(raw.acodec),
            },
            note: non_empty(raw.format_note),
            audio_bitrate,
            container_extension: raw.ext.unwrap_or_default(),
            resource_url: non_empty(raw.url),
            size_bytes: filesize.or(filesize_approx),
            format_id: raw.format_id,
        })
    }
}

impl TryFrom<RawVideo> for ExtractedVideo {
    type Error = InvalidInputError;

    fn try_from(raw: RawVideo) -> Result<Self, Self::Error> {
        Ok(ExtractedVideo {
            title: raw.title,
            thumbnail_url: non_empty(raw.thumbnail),
            uploader: raw.uploader,
            duration_seconds: raw.duration,
            formats: raw.formats.unwrap_or_default()
                .into_iter()
                .map(FormatDescriptor::try_from)
                .collect::<Result<_, _>>()?,
        })
    }
}

impl ExtractedVideo {
    /// Parses the output of `yt-dlp --dump-single-json`
    pub fn from_json_slice(bytes: &[u8]) -> Result<ExtractedVideo, InvalidInputError> {
        let raw: RawVideo = serde_json::from_slice(bytes)?;
        raw.try_into()
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<ExtractedVideo, InvalidInputError> {
        let raw: RawVideo = serde_json::from_value(value)?;
        raw.try_into()
    }
}
