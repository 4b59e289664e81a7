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
use std::fmt::Display;

/// The extractor returned data that does not match the expected shape
#[derive(Debug)]
pub enum InvalidInputError {
    Malformed(serde_json::Error),
    InvalidValue {
        format_id: String,
        field: &'static str,
        value: f64,
    },
}

impl std::error::Error for InvalidInputError {}

impl Display for InvalidInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidInputError::Malformed(err) => write!(f, "Extractor output did not match the expected shape: {err}"),
            InvalidInputError::InvalidValue { format_id, field, value } => write!(f, "Field {field} of format {format_id} contained an invalid value: {value}"),
        }
    }
}

impl From<serde_json::Error> for InvalidInputError {
    fn from(value: serde_json::Error) -> Self {
        InvalidInputError::Malformed(value)
    }
}
