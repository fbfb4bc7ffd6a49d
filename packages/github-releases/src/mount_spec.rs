//! Parsing of the mount specification text.
//!
//! One mount per line, `[path:]owner/repo`. A bare repository id mounts at
//! the root. Blank lines are skipped; any malformed line rejects the whole
//! block.

use releasefs_core::{Error, VirtualPath};

use crate::mount_point::MountPoint;

/// Parse a mount specification into mount points, in input order.
pub fn parse_mount_spec(text: &str) -> Result<Vec<MountPoint>, Error> {
    let mut points = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let parts: Vec<&str> = line.split(':').collect();
        let (path, repo) = match parts.as_slice() {
            [repo] => (VirtualPath::root(), repo.trim()),
            [path, repo] => (VirtualPath::parse(path.trim()), repo.trim()),
            _ => {
                return Err(Error::InvalidMountSpec {
                    line: line.to_string(),
                    message: "expected [path:]owner/repo".to_string(),
                })
            }
        };

        if repo.is_empty() {
            return Err(Error::InvalidMountSpec {
                line: line.to_string(),
                message: "missing repository".to_string(),
            });
        }

        log::debug!("mounting {} at {}", repo, path);
        points.push(MountPoint::new(path, repo));
    }

    Ok(points)
}
