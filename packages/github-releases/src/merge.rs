//! Folding per-mount listings into one tree level.
//!
//! Directories with the same name collapse into one entry whose size is the
//! sum of the contributions; the first-seen entry keeps its timestamps.
//! Files are never deduplicated, since two repositories can ship assets
//! with the same name at the same level.

use std::panic;
use std::sync::{Mutex, PoisonError};
use std::thread;

use releasefs_core::{Error, File, FileKind, VirtualPath};
use releasefs_http::ReleaseClient;

use crate::config::ListingOptions;
use crate::mount_point::MountPoint;

/// Merge `incoming` into `files`.
pub fn merge_files(files: &mut Vec<File>, incoming: Vec<File>) {
    for file in incoming {
        if file.kind == FileKind::Dir {
            if let Some(existing) = files
                .iter_mut()
                .find(|f| f.kind == FileKind::Dir && f.name == file.name)
            {
                existing.size += file.size;
                continue;
            }
        }
        files.push(file);
    }
}

/// Evaluate mount points one after another, in mount order.
///
/// The first failing mount point aborts the listing with its error.
pub fn list_sequential(
    points: &mut [MountPoint],
    client: &ReleaseClient,
    query: &VirtualPath,
    options: &ListingOptions,
    refresh: bool,
) -> Result<Vec<File>, Error> {
    let mut files = Vec::new();
    for point in points.iter_mut() {
        let point_files = point.list(client, query, options, refresh)?;
        merge_files(&mut files, point_files);
    }
    Ok(files)
}

/// Evaluate every mount point on its own thread and merge as they finish.
///
/// All workers run to completion. If any of them failed, every failure is
/// logged and the error of the earliest failing mount point (in mount order)
/// is returned; no partial listing escapes.
pub fn list_concurrent(
    points: &mut [MountPoint],
    client: &ReleaseClient,
    query: &VirtualPath,
    options: &ListingOptions,
    refresh: bool,
) -> Result<Vec<File>, Error> {
    let merged = Mutex::new(Vec::new());

    let failures: Vec<(String, Error)> = thread::scope(|scope| {
        let workers: Vec<_> = points
            .iter_mut()
            .map(|point| {
                let merged = &merged;
                scope.spawn(move || {
                    let result = point
                        .list(client, query, options, refresh)
                        .map(|point_files| {
                            let mut files = merged.lock().unwrap_or_else(PoisonError::into_inner);
                            merge_files(&mut files, point_files);
                        });
                    (point.repo().to_string(), result)
                })
            })
            .collect();

        workers
            .into_iter()
            .filter_map(|worker| match worker.join() {
                Ok((_, Ok(()))) => None,
                Ok((repo, Err(e))) => Some((repo, e)),
                Err(payload) => panic::resume_unwind(payload),
            })
            .collect()
    });

    for (repo, error) in &failures {
        log::warn!("listing {} for {} failed: {}", query, repo, error);
    }

    match failures.into_iter().next() {
        Some((_, error)) => Err(error),
        None => Ok(merged.into_inner().unwrap_or_else(PoisonError::into_inner)),
    }
}
