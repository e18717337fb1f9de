// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device Path decoding and encoding.
//!
//! A UEFI device path is a list of nodes that together describe how to reach
//! a device or a file. Every node starts with a header naming its type,
//! its subtype and its total length in bytes. The payload that follows has a
//! layout fixed by the (type, subtype) pair.
//!
//! # Terminology
//!
//! In the UEFI specification a single node is called a "device path node"
//! and a sequence of nodes a "device path". Boot entries store a sequence of
//! nodes under the name "file path list", which may hold several path
//! instances separated by [`EndSubType::Instance`] nodes and is closed by an
//! [`EndSubType::Entire`] node.
//!
//! This module models the nodes as [`DevicePathNode`] and the sequence as
//! [`DevicePathList`]. A list is kept exactly as found on the wire: no end
//! node is added or removed, and instance separators are ordinary nodes.
//!
//! # Types
//!
//! The device type of a node is never stored on its own. It is implied by the
//! [`DeviceSubType`] variant, so a node can only ever hold a registered
//! (type, subtype) pairing.
//!
//! Payloads are kept as raw bytes. Only the two payload layouts boot entries
//! depend on are interpreted:
//!
//! - hard drive media nodes, through [`HardDriveNode`]
//! - file path media nodes, as UTF-16 text
//!
//! Everything else is carried through unchanged.

mod media;

pub use media::HardDriveNode;

pub use firmware_variables_raw::device_path::{
    AcpiSubType, BiosBootSpecSubType, DevicePathHeader, DeviceSubType, DeviceType, EndSubType,
    HardwareSubType, MediaSubType, MessagingSubType, PartitionFormat, SignatureType,
};

use crate::result::{Error, Result};
use crate::strs;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::{self, Display, Formatter};
use core::slice;
use log::{debug, trace};

const HARD_DRIVE: DeviceSubType = DeviceSubType::Media(MediaSubType::HardDrive);
const FILE_PATH: DeviceSubType = DeviceSubType::Media(MediaSubType::FilePath);

/// A single node within a [`DevicePathList`].
///
/// The node owns its payload. The length field of the header is not stored:
/// it is always recomputed from the payload when encoding. Payloads too large
/// for that 16-bit field are rejected when the node is built or modified, so
/// a node can always be encoded.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DevicePathNode {
    sub_type: DeviceSubType,
    data: Vec<u8>,
}

impl DevicePathNode {
    /// Create a node from its subtype and raw payload.
    ///
    /// Fails with [`Error::NodeTooBig`] if the node would not fit in a
    /// 16-bit length.
    pub fn new(sub_type: DeviceSubType, data: Vec<u8>) -> Result<Self> {
        check_payload_size(data.len())?;
        Ok(Self { sub_type, data })
    }

    /// Node that ends the entire device path.
    #[must_use]
    pub const fn end_entire() -> Self {
        Self {
            sub_type: DeviceSubType::End(EndSubType::Entire),
            data: Vec::new(),
        }
    }

    /// Node that ends one device path instance; another instance follows.
    #[must_use]
    pub const fn end_instance() -> Self {
        Self {
            sub_type: DeviceSubType::End(EndSubType::Instance),
            data: Vec::new(),
        }
    }

    /// File path media node holding `path`.
    pub fn file_path(path: &str) -> Result<Self> {
        Self::new(FILE_PATH, file_path_payload(path))
    }

    /// Hard drive media node describing `node`.
    #[must_use]
    pub fn hard_drive(node: &HardDriveNode) -> Self {
        Self {
            sub_type: HARD_DRIVE,
            data: node.to_payload().to_vec(),
        }
    }

    /// Decode the node whose header starts at `offset` in `buffer`.
    ///
    /// Returns the node and the number of bytes it occupies.
    ///
    /// # Errors
    ///
    /// - [`Error::MalformedHeader`] if fewer than four header bytes are
    ///   available, if the declared length is smaller than the header, or if
    ///   the node runs past the end of `buffer`.
    /// - [`Error::UnknownType`] or [`Error::UnknownSubType`] if the header
    ///   names a type or subtype that is not registered.
    pub fn decode(buffer: &[u8], offset: usize) -> Result<(Self, usize)> {
        let rest = buffer.get(offset..).unwrap_or_default();
        let available = rest.len();

        let header = rest
            .get(..DevicePathHeader::SIZE)
            .and_then(|bytes| bytes.try_into().ok())
            .map(DevicePathHeader::from_bytes)
            .ok_or(Error::MalformedHeader {
                offset,
                length: None,
                available,
            })?;

        let length = header.length();
        let node_size = usize::from(length);
        if node_size < DevicePathHeader::SIZE || node_size > available {
            return Err(Error::MalformedHeader {
                offset,
                length: Some(length),
                available,
            });
        }

        let device_type = DeviceType::from_raw(header.major_type).ok_or(Error::UnknownType {
            offset,
            device_type: header.major_type,
        })?;
        let sub_type = DeviceSubType::from_raw(device_type, header.sub_type).ok_or(
            Error::UnknownSubType {
                offset,
                device_type,
                sub_type: header.sub_type,
            },
        )?;

        trace!("device path node at {offset}: {sub_type:?}, {length} bytes");

        let node = Self {
            sub_type,
            data: rest[DevicePathHeader::SIZE..node_size].to_vec(),
        };
        Ok((node, node_size))
    }

    /// Wire representation of the node.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.encoded_len());
        self.encode_into(&mut out);
        out
    }

    /// Append the wire representation of the node to `out`.
    pub fn encode_into(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.header().to_bytes());
        out.extend_from_slice(&self.data);
    }

    fn encoded_len(&self) -> usize {
        DevicePathHeader::SIZE + self.data.len()
    }

    fn header(&self) -> DevicePathHeader {
        // Payload size is checked on every mutation.
        let length = u16::try_from(self.encoded_len()).unwrap_or(u16::MAX);
        DevicePathHeader::new(self.sub_type, length)
    }

    /// Type of the node.
    #[must_use]
    pub const fn device_type(&self) -> DeviceType {
        self.sub_type.device_type()
    }

    /// Subtype of the node.
    #[must_use]
    pub const fn sub_type(&self) -> DeviceSubType {
        self.sub_type
    }

    /// Total length of the encoded node, header included.
    #[must_use]
    pub fn length(&self) -> u16 {
        self.header().length()
    }

    /// Raw payload of the node, without the header.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Replace the raw payload.
    ///
    /// Fails with [`Error::NodeTooBig`], leaving the node unchanged, if the
    /// node would not fit in a 16-bit length.
    pub fn set_data(&mut self, data: Vec<u8>) -> Result {
        check_payload_size(data.len())?;
        self.data = data;
        Ok(())
    }

    /// True if this node ends the entire device path.
    #[must_use]
    pub fn is_end_entire(&self) -> bool {
        self.sub_type == DeviceSubType::End(EndSubType::Entire)
    }

    /// True if this is a hard drive media node.
    #[must_use]
    pub fn is_hard_drive(&self) -> bool {
        self.sub_type == HARD_DRIVE
    }

    /// Parsed payload of a hard drive media node.
    ///
    /// Returns `None` for any other node, or if the payload is shorter than
    /// the hard drive layout.
    #[must_use]
    pub fn as_hard_drive_node(&self) -> Option<HardDriveNode> {
        if !self.is_hard_drive() {
            return None;
        }
        HardDriveNode::from_payload(&self.data)
    }

    /// Overwrite the payload of a hard drive media node with `node`.
    ///
    /// `node.partition_guid` is ignored; the signature bytes are written as
    /// they are. Returns `false`, leaving the node unchanged, if this is not
    /// a hard drive node.
    pub fn set_hard_drive_node(&mut self, node: &HardDriveNode) -> bool {
        if !self.is_hard_drive() {
            debug!(
                "not setting hard drive fields on a {:?} node",
                self.sub_type
            );
            return false;
        }
        self.data = node.to_payload().to_vec();
        true
    }

    /// True if this is a file path media node.
    #[must_use]
    pub fn is_file_path(&self) -> bool {
        self.sub_type == FILE_PATH
    }

    /// Path stored in a file path media node, without its NUL terminator.
    ///
    /// Returns `None` for any other node, or if the payload is not valid
    /// UTF-16.
    #[must_use]
    pub fn as_file_path(&self) -> Option<String> {
        if !self.is_file_path() {
            return None;
        }
        strs::from_utf16le_with_nul(&self.data)
    }

    /// Overwrite the path stored in a file path media node.
    ///
    /// Returns `false`, leaving the node unchanged, if this is not a file
    /// path node or if the encoded path would not fit in the node.
    pub fn set_file_path(&mut self, path: &str) -> bool {
        if !self.is_file_path() {
            debug!("not setting a file path on a {:?} node", self.sub_type);
            return false;
        }
        let data = file_path_payload(path);
        if let Err(err) = check_payload_size(data.len()) {
            debug!("not setting file path: {err}");
            return false;
        }
        self.data = data;
        true
    }
}

fn check_payload_size(len: usize) -> Result {
    let size = DevicePathHeader::SIZE + len;
    if size > usize::from(u16::MAX) {
        return Err(Error::NodeTooBig { size });
    }
    Ok(())
}

fn file_path_payload(path: &str) -> Vec<u8> {
    let mut data = Vec::new();
    strs::push_utf16le_with_nul(path, &mut data);
    data
}

/// Ordered sequence of [`DevicePathNode`]s, as stored in a load option.
///
/// The list does not enforce any structure: it holds exactly the nodes that
/// were decoded or pushed, in wire order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct DevicePathList {
    nodes: Vec<DevicePathNode>,
}

impl DevicePathList {
    /// Create an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Decode every node in `buffer`.
    ///
    /// Decoding stops exactly at the end of the buffer, so an empty buffer
    /// is an empty list.
    ///
    /// # Errors
    ///
    /// - [`Error::TruncatedPath`] if the buffer ends in the middle of a node
    ///   header, or if a node declares a length running past the end of the
    ///   buffer.
    /// - Any error of [`DevicePathNode::decode`] for an individual node.
    pub fn decode(buffer: &[u8]) -> Result<Self> {
        let mut nodes = Vec::new();
        let mut offset = 0;
        while offset < buffer.len() {
            let remaining = buffer.len() - offset;
            let truncated = remaining < DevicePathHeader::SIZE
                || usize::from(u16::from_le_bytes([buffer[offset + 2], buffer[offset + 3]]))
                    > remaining;
            if truncated {
                return Err(Error::TruncatedPath { offset, remaining });
            }

            let (node, consumed) = DevicePathNode::decode(buffer, offset)?;
            nodes.push(node);
            offset += consumed;
        }
        Ok(Self { nodes })
    }

    /// Concatenated wire representation of all nodes.
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.nodes.iter().map(DevicePathNode::encoded_len).sum());
        for node in &self.nodes {
            node.encode_into(&mut out);
        }
        out
    }

    /// Path stored in the first file path node, if there is one.
    #[must_use]
    pub fn file_path(&self) -> Option<String> {
        self.nodes
            .iter()
            .find(|node| node.is_file_path())
            .and_then(DevicePathNode::as_file_path)
    }

    /// Overwrite the path stored in the first file path node.
    ///
    /// Returns `false` if the list holds no file path node. No node is ever
    /// inserted.
    pub fn set_file_path(&mut self, path: &str) -> bool {
        self.nodes
            .iter_mut()
            .find(|node| node.is_file_path())
            .is_some_and(|node| node.set_file_path(path))
    }

    /// Fields of the first hard drive node with a complete payload.
    ///
    /// Hard drive nodes too short to parse are skipped.
    #[must_use]
    pub fn hard_drive_node(&self) -> Option<HardDriveNode> {
        self.nodes.iter().find_map(DevicePathNode::as_hard_drive_node)
    }

    /// Overwrite the fields of the first hard drive node.
    ///
    /// Returns `false` if the list holds no hard drive node. No node is ever
    /// inserted.
    pub fn set_hard_drive_node(&mut self, node: &HardDriveNode) -> bool {
        self.nodes
            .iter_mut()
            .find(|n| n.is_hard_drive())
            .is_some_and(|n| n.set_hard_drive_node(node))
    }

    /// All nodes, in order.
    #[must_use]
    pub fn nodes(&self) -> &[DevicePathNode] {
        &self.nodes
    }

    /// Mutable access to the nodes, in order.
    pub fn nodes_mut(&mut self) -> &mut [DevicePathNode] {
        &mut self.nodes
    }

    /// Append a node.
    pub fn push(&mut self, node: DevicePathNode) {
        self.nodes.push(node);
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True if the list holds no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterator over the nodes.
    pub fn iter(&self) -> slice::Iter<'_, DevicePathNode> {
        self.nodes.iter()
    }
}

impl FromIterator<DevicePathNode> for DevicePathList {
    fn from_iter<I: IntoIterator<Item = DevicePathNode>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DevicePathList {
    type Item = DevicePathNode;
    type IntoIter = alloc::vec::IntoIter<DevicePathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

impl<'a> IntoIterator for &'a DevicePathList {
    type Item = &'a DevicePathNode;
    type IntoIter = slice::Iter<'a, DevicePathNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for DevicePathList {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self.file_path() {
            Some(path) => f.write_str(&path),
            None => f.write_str("<Custom Location>"),
        }
    }
}
