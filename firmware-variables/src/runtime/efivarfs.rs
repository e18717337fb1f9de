// SPDX-License-Identifier: MIT OR Apache-2.0

//! Linux `efivarfs` variable store.
//!
//! Each variable is a file named `{name}-{vendor guid}` in the mount point.
//! Its contents are the 4-byte little-endian attribute word followed by the
//! variable data, both when reading and when writing.

use super::{VariableKey, VariableStore};
use firmware_variables_raw::variable::{VariableAttributes, VariableVendor};
use firmware_variables_raw::{Guid, Status};
use fs_err as fs;
use log::warn;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Size of the attribute prefix of every efivarfs file.
const ATTRIBUTES_SIZE: usize = 4;

/// Length of a hyphenated GUID string.
const GUID_STR_LEN: usize = 36;

/// Variable store backed by the Linux `efivarfs` file system.
///
/// Reading usually works for any user; writing needs root. The kernel only
/// mounts efivarfs on hosts booted through UEFI, so the presence of the
/// mount point doubles as the firmware support check.
#[derive(Clone, Debug)]
pub struct Efivarfs {
    root: PathBuf,
}

impl Efivarfs {
    /// Where the kernel mounts efivarfs by default.
    pub const DEFAULT_ROOT: &'static str = "/sys/firmware/efi/efivars";

    /// Store at the default mount point.
    #[must_use]
    pub fn new() -> Self {
        Self::with_root(Self::DEFAULT_ROOT)
    }

    /// Store at a custom mount point.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The mount point.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path(&self, name: &str, vendor: &VariableVendor) -> PathBuf {
        self.root.join(format!("{name}-{}", vendor.0))
    }
}

impl Default for Efivarfs {
    fn default() -> Self {
        Self::new()
    }
}

impl VariableStore for Efivarfs {
    fn firmware_supported(&self) -> bool {
        self.root.is_dir()
    }

    fn read_variable(
        &self,
        name: &str,
        vendor: &VariableVendor,
    ) -> Result<(Vec<u8>, VariableAttributes), Status> {
        let mut data = fs::read(self.path(name, vendor)).map_err(to_status)?;
        if data.len() < ATTRIBUTES_SIZE {
            warn!(
                "{name}-{}: {} bytes is too short for the attribute prefix",
                vendor.0,
                data.len()
            );
            return Err(Status::DEVICE_ERROR);
        }
        let attributes = VariableAttributes::from_bits_retain(u32::from_le_bytes([
            data[0], data[1], data[2], data[3],
        ]));
        data.drain(..ATTRIBUTES_SIZE);
        Ok((data, attributes))
    }

    fn write_variable(
        &mut self,
        name: &str,
        vendor: &VariableVendor,
        data: &[u8],
        attributes: VariableAttributes,
    ) -> Result<(), Status> {
        let append = attributes.contains(VariableAttributes::APPEND_WRITE);
        if data.is_empty() && !append {
            return self.delete_variable(name, vendor);
        }

        let mut buf = Vec::with_capacity(ATTRIBUTES_SIZE + data.len());
        buf.extend_from_slice(&attributes.bits().to_le_bytes());
        buf.extend_from_slice(data);

        // efivarfs expects the whole variable in a single write.
        let mut file = fs::OpenOptions::new()
            .write(true)
            .create(true)
            .append(append)
            .truncate(!append)
            .open(self.path(name, vendor))
            .map_err(to_status)?;
        file.write_all(&buf).map_err(to_status)
    }

    fn delete_variable(&mut self, name: &str, vendor: &VariableVendor) -> Result<(), Status> {
        fs::remove_file(self.path(name, vendor)).map_err(to_status)
    }

    fn variable_keys(&self) -> Result<Vec<VariableKey>, Status> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.root).map_err(to_status)? {
            let entry = entry.map_err(to_status)?;
            let file_name = entry.file_name();
            match file_name.to_str().and_then(parse_file_name) {
                Some(key) => keys.push(key),
                None => warn!("skipping unexpected efivarfs entry {file_name:?}"),
            }
        }
        keys.sort();
        Ok(keys)
    }
}

/// Split `{name}-{guid}` into a variable key.
fn parse_file_name(file_name: &str) -> Option<VariableKey> {
    let split = file_name.len().checked_sub(GUID_STR_LEN + 1)?;
    let (name, rest) = (file_name.get(..split)?, file_name.get(split..)?);
    let guid = rest.strip_prefix('-')?;
    let vendor = Guid::try_parse(guid).ok()?;
    (!name.is_empty()).then(|| VariableKey::new(name, VariableVendor(vendor)))
}

fn to_status(err: io::Error) -> Status {
    match err.kind() {
        io::ErrorKind::NotFound => Status::NOT_FOUND,
        io::ErrorKind::PermissionDenied => Status::ACCESS_DENIED,
        _ => {
            warn!("efivarfs access failed: {err}");
            Status::DEVICE_ERROR
        }
    }
}
