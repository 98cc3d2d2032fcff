#![allow(unsafe_code)]

use std::fs;
use std::os::unix::fs::MetadataExt;

use rustix::fs::{Gid, Uid};
use rustix::process::{RawGid, RawUid};

use crate::options::MetadataOptions;

/// Owner and group to copy from `metadata`, each `None` when its option is
/// disabled.
pub(crate) fn copied_ids(
    metadata: &fs::Metadata,
    options: &MetadataOptions,
) -> (Option<Uid>, Option<Gid>) {
    let owner = options
        .owner()
        .then(|| uid_from_raw(metadata.uid() as RawUid));
    let group = options
        .group()
        .then(|| gid_from_raw(metadata.gid() as RawGid));
    (owner, group)
}

fn uid_from_raw(raw: RawUid) -> Uid {
    // SAFETY: the id was read from an existing inode on this system.
    unsafe { Uid::from_raw(raw) }
}

fn gid_from_raw(raw: RawGid) -> Gid {
    // SAFETY: the id was read from an existing inode on this system.
    unsafe { Gid::from_raw(raw) }
}
