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

use std::{env, error::Error, path::Path};

fn main() -> Result<(), Box<dyn Error>> {
    let built_file = Path::new(&env::var("OUT_DIR").map_err(|e| format!("OUT_DIR not set: {e}"))?).join("built.rs");
    let manifest_location = env::var("CARGO_MANIFEST_DIR").map_err(|e| format!("CARGO_MANIFEST_DIR not set: {e}"))?;

    // version, git hash & dirty flag, build time
    built::write_built_file_with_opts(
        Some(Path::new(&manifest_location)),
        &built_file,
    ).map_err(|e| format!("Failed to compile build-time info: {e}"))?;
    Ok(())
}
