//! Path-derived identifiers.
//!
//! Each ingested file is keyed by an identifier derived from its location
//! relative to the ingestion root. Campaign trees are laid out as
//! `<root>/<site>/<scale>/<site-code><year>/...`, so the third path segment
//! beyond the root names the site (with a trailing 4-digit year that is
//! dropped, since the year also appears in the file name). The identifier is
//! the trimmed site code followed by the file stem, e.g.
//! `ES/field_scale/ES_F1_2017/plot_scale_data/LAI/20170714_LAI.PRN`
//! becomes `ES_F1_20170714_LAI`.

use std::path::{Component, Path, PathBuf};

use crate::error::{IngestionError, IngestionResult};

/// Number of trailing characters of the site directory name that hold the year.
const YEAR_SUFFIX_LEN: usize = 4;

/// Ordinal of the site directory among the path segments beyond the root.
const SITE_SEGMENT_INDEX: usize = 2;

/// Parsed site directory segment: `<site_code><year>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteDirectory {
    /// Site code with the year suffix removed (trailing separator retained,
    /// e.g. `ES_F1_`).
    pub site_code: String,
    /// The 4-character year suffix.
    pub year: String,
}

/// One file encountered during traversal, before parsing.
#[derive(Debug, Clone, Copy)]
pub struct RawFileRef<'a> {
    /// Root directory of the ingestion run.
    pub root: &'a Path,
    /// Directory containing the file.
    pub directory: &'a Path,
    /// Bare file name.
    pub file_name: &'a str,
}

impl RawFileRef<'_> {
    /// Absolute path of the file.
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(self.file_name)
    }

    /// Identifier without site awareness: the file stem alone.
    pub fn simple_identifier(&self) -> String {
        file_stem(self.file_name)
    }

    /// Site-aware identifier: trimmed site code + file stem.
    pub fn identifier(&self) -> IngestionResult<String> {
        let site = parse_site_directory(self.root, self.directory)?;
        Ok(format!("{}{}", site.site_code, file_stem(self.file_name)))
    }
}

/// Parse the site directory segment out of `directory`'s path beyond `root`.
///
/// The campaign layout guarantees at least three segments beyond the root;
/// anything shallower is a [`IngestionError::SiteLayout`] error, as is a site
/// segment too short to carry the year suffix.
pub fn parse_site_directory(root: &Path, directory: &Path) -> IngestionResult<SiteDirectory> {
    let layout_err = |message: String| IngestionError::SiteLayout {
        path: directory.to_path_buf(),
        message,
    };

    let remainder = directory
        .strip_prefix(root)
        .map_err(|_| layout_err(format!("not beneath ingestion root {}", root.display())))?;

    let segment = remainder
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => s.to_str(),
            _ => None,
        })
        .nth(SITE_SEGMENT_INDEX)
        .ok_or_else(|| {
            layout_err(format!(
                "expected at least {} path segments beyond the root (site/scale/site-year)",
                SITE_SEGMENT_INDEX + 1
            ))
        })?;

    let split = segment
        .len()
        .checked_sub(YEAR_SUFFIX_LEN)
        .and_then(|at| segment.split_at_checked(at))
        .ok_or_else(|| {
            layout_err(format!(
                "site directory '{segment}' is too short to carry a {YEAR_SUFFIX_LEN}-character year suffix"
            ))
        })?;

    Ok(SiteDirectory {
        site_code: split.0.to_string(),
        year: split.1.to_string(),
    })
}

fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
        .to_string()
}
