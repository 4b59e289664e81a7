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
use std::fmt::{Debug, Display};

use actix_web::{http::{header::{HeaderMap, TryIntoHeaderPair}, StatusCode}, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};

/// Body of every error response produced by [`Error`]
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
}

/// This extension will be present on a response if the response contains
/// an [`ErrorBody`] encoded as json
pub struct ErrorResponseMarker;

pub struct Error {
    err: anyhow::Error,
    status: StatusCode,
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Error").field("status", &self.status).field("err", &self.err).finish()
    }
}
impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.err, f)
    }
}
impl From<anyhow::Error> for Error {
    fn from(value: anyhow::Error) -> Self {
        Error { err: value, status: StatusCode::INTERNAL_SERVER_ERROR }
    }
}
impl std::error::Error for Error {}
impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        self.status
    }

    fn error_response(&self) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status_code());
        builder.extensions_mut().insert(ErrorResponseMarker);
        builder.json(ErrorBody { error: format!("{:#}", self.err) })
    }
}

impl Error {
    pub fn set_status(self, status: StatusCode) -> Self {
        Error { status, ..self }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

pub trait HeaderMapExt {
    fn replace_header<H: TryIntoHeaderPair>(&mut self, header: H) -> std::result::Result<(), H::Error>;
}

impl HeaderMapExt for HeaderMap {
    fn replace_header<H: TryIntoHeaderPair>(&mut self, header: H) -> std::result::Result<(), H::Error> {
        let (name, value) = header.try_into_pair()?;
        self.insert(name, value);
        Ok(())
    }
}

/// Format seconds into H:MM:SS or M:SS
pub fn format_duration(seconds: f64) -> String {
    let total = seconds.max(0.).round() as u64;
    let h = total / 3600;
    let m = (total % 3600) / 60;
    let s = total % 60;
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}
