//! Sidecar discovery.
//!
//! The query side finds candidate indexes by walking the deployment root for
//! sidecar files. A candidate filename is a canonical hyphenated random (v4)
//! UUID with the `idx` extension; anything else in the directory (log files,
//! temp files, foreign data) is ignored.

use std::ffi::OsStr;
use std::fs;
use std::path::Path;

use uuid::{Uuid, Variant, Version};

use crate::error::Result;

/// Lists the file ids of all sidecars under `root`, sorted for determinism.
pub fn list_sidecars(root: &Path) -> Result<Vec<Uuid>> {
    let mut fids = Vec::new();

    for entry in fs::read_dir(root)? {
        let path = entry?.path();
        if path.extension().and_then(OsStr::to_str) != Some("idx") {
            continue;
        }
        let Some(stem) = path.file_stem().and_then(OsStr::to_str) else {
            continue;
        };
        if let Some(fid) = parse_sidecar_stem(stem) {
            fids.push(fid);
        }
    }

    fids.sort();
    Ok(fids)
}

/// Accepts only canonical hyphenated v4 UUIDs (RFC 4122 variant).
fn parse_sidecar_stem(stem: &str) -> Option<Uuid> {
    // 36 characters rules out the braced, simple, and URN forms that
    // `Uuid::try_parse` would otherwise accept.
    if stem.len() != 36 {
        return None;
    }
    let fid = Uuid::try_parse(stem).ok()?;
    (fid.get_version() == Some(Version::Random) && fid.get_variant() == Variant::RFC4122)
        .then_some(fid)
}
