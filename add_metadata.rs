/* This file is part of the Video Reference Browser project - https://github.com/vidref/vidref-browser
*
*  Copyright (C) 2025 the Video Reference Browser contributors
*
*  Some code was copied and adapted from the built library: https://github.com/lukaslueg/built,
*  which is licensed under the MIT license.
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

use std::{env, fs::File, io::{BufWriter, Write}, path::Path};

use chrono::{FixedOffset, TimeZone};
use cloneable_errors::{bail, ErrContext, ErrorContext, ResContext};
use git2::Repository;

const API_URL_VAR: &str = "VIDREF_API_URL";
const FALLBACK_API_URL: &str = "http://localhost:8000/api/";

fn main() -> Result<(), ErrorContext> {
    let built_file = Path::new(&env::var("OUT_DIR").context("OUT_DIR not set")?).join("built.rs");
    let manifest_location = env::var("CARGO_MANIFEST_DIR").context("CARGO_MANIFEST_DIR not set")?;
    let manifest_location = manifest_location.as_ref();

    println!("cargo:rerun-if-env-changed={API_URL_VAR}");

    built::write_built_file_with_opts(
        Some(manifest_location),
        &built_file,
    ).context("Failed to compile build-time info")?;

    let mut file = BufWriter::new(File::options().append(true).open(&built_file).context("Failed to open the build-time info file")?);

    commit_timestamp(&mut file, manifest_location).context("Failed to compile extra build-time git info")?;
    default_api_url(&mut file).context("Failed to compile the default API URL")?;
    Ok(())
}

fn commit_timestamp(file: &mut BufWriter<File>, manifest_loc: &Path) -> Result<(), ErrorContext> {
    let timestamp = match Repository::discover(manifest_loc) {
        Err(e) if e.code() == git2::ErrorCode::NotFound => "None".to_owned(),
        Err(e) => return Err(e.context("Failed to read git repo")),
        Ok(repo) => {
            let head = repo
                .head().context("Failed to read repo head")?
                .peel_to_commit().context("Failed to peel reference to commit")?;
            let time = head.time();
            let tz = FixedOffset::east_opt(time.offset_minutes() * 60).context("Commit timestamp had an invalid timezone offset")?;
            let datetime = tz.timestamp_opt(time.seconds(), 0).single().context("Commit timestamp was ambiguous")?;

            format!("Some(\"{}\")", datetime.to_rfc3339().escape_default())
        },
    };
    writeln!(file, "\
        #[allow(clippy::needless_raw_string_hashes)]\n\
        #[doc=r#\"The commit time in RFC3339/ISO8601.\"#]\n\
        #[allow(dead_code)]\n\
        pub const GIT_COMMIT_TIMESTAMP: Option<&str> = {timestamp};"
    ).context("Failed to write data to file")?;
    Ok(())
}

/// The backend base URL baked into the build, overridable at runtime in the settings
fn default_api_url(file: &mut BufWriter<File>) -> Result<(), ErrorContext> {
    let mut url = match env::var(API_URL_VAR) {
        Ok(url) if !url.trim().is_empty() => url.trim().to_owned(),
        Ok(_) | Err(env::VarError::NotPresent) => FALLBACK_API_URL.to_owned(),
        Err(e @ env::VarError::NotUnicode(..)) => return Err(e.context(format!("{API_URL_VAR} is not valid unicode"))),
    };
    if !url.starts_with("http://") && !url.starts_with("https://") {
        bail!("{API_URL_VAR} must be an http(s) URL, got {url:?}",);
    }
    // relative joins need the trailing slash
    if !url.ends_with('/') {
        url.push('/');
    }
    writeln!(file, "\
        #[doc=r#\"Default backend API base URL, taken from {API_URL_VAR} at build time.\"#]\n\
        pub const DEFAULT_API_URL: &str = \"{}\";",
        url.escape_default()
    ).context("Failed to write data to file")?;
    Ok(())
}
