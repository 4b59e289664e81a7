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
use serde::Serialize;
use serde_with::skip_serializing_none;

pub const BYTES_PER_MB: f64 = 1024. * 1024.;

/// Codecs reported for a single format.
///
/// `None` means the stream does not carry that kind of media. The extractor's
/// `"none"` marker is normalized to `None` while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodecInfo {
    pub video_codec: Option<String>,
    pub audio_codec: Option<String>,
}

impl CodecInfo {
    pub fn has_video(&self) -> bool {
        self.video_codec.as_deref().is_some_and(|c| !c.is_empty())
    }

    pub fn has_audio(&self) -> bool {
        self.audio_codec.as_deref().is_some_and(|c| !c.is_empty())
    }
}

/// One downloadable stream variant, as reported by the extractor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormatDescriptor {
    pub format_id: String,
    pub codec_info: CodecInfo,
    /// Quality label, like `720p` or `medium`
    pub note: Option<String>,
    /// Average audio bitrate in kbps
    pub audio_bitrate: Option<f64>,
    pub container_extension: String,
    pub resource_url: Option<String>,
    pub size_bytes: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FormatKind {
    /// Audio-only stream
    Audio,
    /// Combined stream (audio + video)
    Video,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedFormat {
    pub format_id: String,
    pub kind: FormatKind,
    pub label: String,
    pub bitrate_kbps: Option<f64>,
    pub extension: String,
    pub url: String,
    pub size_mb: f64,
}

/// Metadata and formats of a single video, as returned by the extractor
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedVideo {
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub uploader: Option<String>,
    pub duration_seconds: Option<f64>,
    pub formats: Vec<FormatDescriptor>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedFormats {
    pub audio: Vec<ClassifiedFormat>,
    pub video: Vec<ClassifiedFormat>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoSummary {
    pub title: Option<String>,
    pub thumbnail_url: Option<String>,
    pub uploader: Option<String>,
    pub duration_seconds: Option<f64>,
    pub selected_audio_formats: Vec<ClassifiedFormat>,
    pub selected_video_formats: Vec<ClassifiedFormat>,
}

impl VideoSummary {
    pub fn new(video: ExtractedVideo, selected: SelectedFormats) -> VideoSummary {
        VideoSummary {
            title: video.title,
            thumbnail_url: video.thumbnail_url,
            uploader: video.uploader,
            duration_seconds: video.duration_seconds,
            selected_audio_formats: selected.audio,
            selected_video_formats: selected.video,
        }
    }
}

/// Converts a byte count to megabytes, rounded to 2 decimal places.
/// Unknown sizes count as zero.
pub fn size_in_mb(size_bytes: Option<f64>) -> f64 {
    let mb = size_bytes.unwrap_or(0.) / BYTES_PER_MB;
    (mb * 100.).round() / 100.
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn size_is_rounded_to_two_decimals() {
        assert!((size_in_mb(Some(3_000_000.)) - 2.86).abs() < f64::EPSILON);
        assert!((size_in_mb(Some(20_000_000.)) - 19.07).abs() < f64::EPSILON);
        assert!((size_in_mb(Some(BYTES_PER_MB)) - 1.).abs() < f64::EPSILON);
    }

    #[test]
    fn missing_size_is_zero() {
        assert!(size_in_mb(None).abs() < f64::EPSILON);
        assert!(size_in_mb(Some(0.)).abs() < f64::EPSILON);
    }

    #[test]
    fn size_roundtrips_within_rounding() {
        for bytes in [1., 512., 1_048_575., 3_000_000., 123_456_789., 4_294_967_296.] {
            let mb = size_in_mb(Some(bytes));
            // half of the last kept decimal, in bytes
            assert!((mb * BYTES_PER_MB - bytes).abs() <= 0.005 * BYTES_PER_MB + 1., "{bytes} -> {mb}");
        }
    }

    #[test]
    fn empty_codec_strings_are_not_codecs() {
        let codecs = CodecInfo { video_codec: Some(String::new()), audio_codec: Some("opus".into()) };
        assert!(!codecs.has_video());
        assert!(codecs.has_audio());
        assert!(!CodecInfo::default().has_audio());
    }
}
