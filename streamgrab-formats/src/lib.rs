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
use std::cmp::Ordering;

use log::debug;

mod errors;
mod filter;
mod parsing;
mod types;
pub use errors::*;
pub use filter::*;
pub use types::*;

/// How many audio-only formats are offered at most
pub const MAX_AUDIO_FORMATS: usize = 3;

/// Splits extractor formats into audio-only and combined streams.
///
/// Only formats with a resource URL accepted by the filter are considered.
/// Audio-only streams are ranked by ascending bitrate (unknown bitrates last)
/// and cut down to [`MAX_AUDIO_FORMATS`]. Combined streams keep the
/// extractor's order. Video-only streams and streams without any codec are
/// dropped.
#[derive(Debug, Clone, Default)]
pub struct FormatSelector<F = HostPrefixFilter> {
    filter: F,
}

impl<F: UrlFilter> FormatSelector<F> {
    pub fn new(filter: F) -> FormatSelector<F> {
        FormatSelector { filter }
    }

    pub fn select(&self, descriptors: &[FormatDescriptor]) -> SelectedFormats {
        select(descriptors, &self.filter)
    }
}

pub fn select<F: UrlFilter + ?Sized>(descriptors: &[FormatDescriptor], filter: &F) -> SelectedFormats {
    let mut selected = SelectedFormats::default();

    for desc in descriptors {
        let Some(url) = desc.resource_url.as_deref() else { continue };
        if !filter.accepts(url) {
            continue;
        }
        let codecs = &desc.codec_info;
        match (codecs.has_audio(), codecs.has_video()) {
            (true, true) => selected.video.push(classify(desc, url, FormatKind::Video)),
            (true, false) => selected.audio.push(classify(desc, url, FormatKind::Audio)),
            _ => {},
        }
    }

    // stable, so equal bitrates keep the extractor's order
    selected.audio.sort_by(|a, b| compare_bitrates(a.bitrate_kbps, b.bitrate_kbps));
    selected.audio.truncate(MAX_AUDIO_FORMATS);

    debug!("Selected {} audio and {} video formats out of {}", selected.audio.len(), selected.video.len(), descriptors.len());
    selected
}

fn compare_bitrates(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn classify(desc: &FormatDescriptor, url: &str, kind: FormatKind) -> ClassifiedFormat {
    let (label, bitrate_kbps) = match kind {
        FormatKind::Audio => (
            desc.audio_bitrate.map_or_else(|| "unknown bitrate".to_owned(), |abr| format!("{} Kbps", abr.round())),
            desc.audio_bitrate,
        ),
        FormatKind::Video => (desc.note.clone().unwrap_or_else(|| "Unknown".to_owned()), None),
    };
    ClassifiedFormat {
        format_id: desc.format_id.clone(),
        kind,
        label,
        bitrate_kbps,
        extension: desc.container_extension.clone(),
        url: url.to_owned(),
        size_mb: size_in_mb(desc.size_bytes),
    }
}
