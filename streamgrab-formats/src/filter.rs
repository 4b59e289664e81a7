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

/// Decides which resource URLs may be shown to the user
pub trait UrlFilter {
    fn accepts(&self, url: &str) -> bool;
}

impl<F> UrlFilter for F
where F: Fn(&str) -> bool
{
    fn accepts(&self, url: &str) -> bool {
        self(url)
    }
}

/// Accepts URLs starting with any of the configured prefixes.
/// An empty prefix list accepts everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HostPrefixFilter {
    prefixes: Box<[String]>,
}

impl HostPrefixFilter {
    pub fn new<I, S>(prefixes: I) -> HostPrefixFilter
    where I: IntoIterator<Item = S>,
          S: Into<String>,
    {
        HostPrefixFilter {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }
}

impl UrlFilter for HostPrefixFilter {
    fn accepts(&self, url: &str) -> bool {
        self.prefixes.is_empty() || self.prefixes.iter().any(|p| url.starts_with(p.as_str()))
    }
}
