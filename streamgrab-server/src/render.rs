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
//! HTML documents served to browsers.
//!
//! Every value that came from the user or the extractor goes through [`escape`].
use std::borrow::Cow;

use actix_web::http::StatusCode;
use streamgrab_formats::{ClassifiedFormat, FormatKind, VideoSummary};

use crate::{built_info, utils::format_duration};

const APP_NAME: &str = "Video Downloader";
const FONT_AWESOME: &str = "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";

pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

fn page(title: &str, body_class: &str, body: &str) -> String {
    format!(r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1, user-scalable=no">
    <link rel="stylesheet" href="{FONT_AWESOME}">
    <link rel="stylesheet" href="/static/style.css">
    <title>{title}</title>
</head>
<body class="{body_class}">
    <header>
        <h1>{APP_NAME}</h1>
    </header>
{body}
    <footer>
        <hr>
        <p>StreamGrab v{version}</p>
    </footer>
</body>
</html>
"#,
        title = escape(title),
        version = built_info::PKG_VERSION,
    )
}

const HOME_LINK: &str = r#"
        <div class="blink">
            <a href="/"><p><i class="fa fa-home btn" aria-hidden="true"></i> Home</p></a>
        </div>"#;

/// The idle view: just the URL form
pub fn home_page() -> String {
    page(APP_NAME, "home", r#"    <div class="container">
        <h3>Enter Video URL</h3>
        <form method="POST" action="/">
            <input type="text" name="user_input" placeholder="https://..." required>
            <button type="submit">Submit</button>
        </form>
    </div>"#)
}

fn format_row(format: &ClassifiedFormat) -> String {
    let icon = match format.kind {
        FormatKind::Audio => "fa-music",
        FormatKind::Video => "fa-video-camera",
    };
    format!(r#"
        <div class="link {kind}">
            <p><i class="fa {icon} btn" aria-hidden="true"></i> {ext} ({label}) {size} MB</p>
            <a href="{url}" target="_blank" rel="noopener noreferrer" title="Download format {id}"><i class="fa fa-download btn dbtn"></i></a>
        </div>"#,
        ext = escape(&format.extension.to_uppercase()),
        label = escape(&format.label),
        kind = format.kind,
        size = format.size_mb.round(),
        url = escape(&format.url),
        id = escape(&format.format_id),
    )
}

/// The result view for a successfully extracted video
pub fn video_page(summary: &VideoSummary) -> String {
    let title = summary.title.as_deref().unwrap_or("Unknown Title");
    let uploader = summary.uploader.as_deref().unwrap_or("Unknown Uploader");
    let duration = summary.duration_seconds.map_or_else(
        || "Unknown Duration".to_owned(),
        |d| format!("{} seconds ({})", d.round(), format_duration(d)),
    );
    let thumbnail = match summary.thumbnail_url.as_deref() {
        Some(url) => format!(r#"
    <div class="img">
        <img src="{}" alt="Thumbnail" class="thumbnail">
    </div>"#, escape(url)),
        None => String::new(),
    };

    let mut links = String::new();
    for format in summary.selected_audio_formats.iter().chain(&summary.selected_video_formats) {
        links.push_str(&format_row(format));
    }
    if links.is_empty() {
        links.push_str(r#"
        <p class="empty">No downloadable formats found.</p>"#);
    }

    let body = format!(r#"{thumbnail}
    <h3>Video Details</h3>
    <ul>
        <li>Title: {title}</li>
        <li>Uploader: {uploader}</li>
        <li>Duration: {duration}</li>
    </ul>
    <h3>Links</h3>
    <div class="linkbox">{links}{HOME_LINK}
    </div>"#,
        title = escape(title),
        uploader = escape(uploader),
    );
    page(title, "result", &body)
}

/// Shown instead of the JSON error body to clients that did not ask for JSON
pub fn error_page(status: StatusCode, message: &str) -> String {
    let heading = format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("Error"));
    let body = format!(r#"    <h3>{heading}</h3>
    <blockquote class="error">{message}</blockquote>
    <div class="linkbox">{HOME_LINK}
    </div>"#,
        heading = escape(&heading),
        message = escape(message),
    );
    page(&heading, "error", &body)
}
