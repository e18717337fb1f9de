// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structured views of the media nodes boot entries point through.

use firmware_variables_raw::device_path::{hard_drive, PartitionFormat, SignatureType};
use firmware_variables_raw::Guid;

/// Fields of a hard drive media device path node.
///
/// This is a plain record: it is produced by
/// [`DevicePathNode::as_hard_drive_node`] and consumed by
/// [`DevicePathNode::set_hard_drive_node`], and is not stored on its own.
///
/// `partition_signature` is always the authoritative value.
/// `partition_guid` is derived from it, and only for GPT partitions with a
/// GUID signature (`partition_format == 2 && signature_type == 2`). It is
/// ignored when writing a node.
///
/// [`DevicePathNode::as_hard_drive_node`]: super::DevicePathNode::as_hard_drive_node
/// [`DevicePathNode::set_hard_drive_node`]: super::DevicePathNode::set_hard_drive_node
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct HardDriveNode {
    /// Index of the partition, starting from 1.
    pub partition_number: u32,
    /// Starting LBA (logical block address) of the partition.
    pub partition_start_lba: u64,
    /// Size of the partition in blocks.
    pub partition_size_lba: u64,
    /// Raw partition signature.
    pub partition_signature: [u8; 16],
    /// Partition GUID, present only for GPT partitions with a GUID signature.
    pub partition_guid: Option<Guid>,
    /// Raw partition format, see [`PartitionFormat`].
    pub partition_format: u8,
    /// Raw signature type, see [`SignatureType`].
    pub signature_type: u8,
}

impl HardDriveNode {
    /// Describe a GPT partition identified by its unique partition GUID.
    #[must_use]
    pub fn gpt(
        partition_number: u32,
        partition_start_lba: u64,
        partition_size_lba: u64,
        partition_guid: Guid,
    ) -> Self {
        Self {
            partition_number,
            partition_start_lba,
            partition_size_lba,
            partition_signature: partition_guid.to_bytes(),
            partition_guid: Some(partition_guid),
            partition_format: PartitionFormat::GPT.0,
            signature_type: SignatureType::GUID.0,
        }
    }

    /// Parse a hard drive node payload. Returns `None` if it is too short.
    pub(crate) fn from_payload(data: &[u8]) -> Option<Self> {
        if data.len() < hard_drive::PAYLOAD_SIZE {
            return None;
        }

        let partition_signature: [u8; 16] =
            data[hard_drive::PARTITION_SIGNATURE].try_into().ok()?;
        let partition_format = data[hard_drive::PARTITION_FORMAT];
        let signature_type = data[hard_drive::SIGNATURE_TYPE];

        let partition_guid = (PartitionFormat(partition_format) == PartitionFormat::GPT
            && SignatureType(signature_type) == SignatureType::GUID)
            .then_some(Guid::from_bytes(partition_signature));

        Some(Self {
            partition_number: u32::from_le_bytes(
                data[hard_drive::PARTITION_NUMBER].try_into().ok()?,
            ),
            partition_start_lba: u64::from_le_bytes(
                data[hard_drive::PARTITION_START].try_into().ok()?,
            ),
            partition_size_lba: u64::from_le_bytes(
                data[hard_drive::PARTITION_SIZE].try_into().ok()?,
            ),
            partition_signature,
            partition_guid,
            partition_format,
            signature_type,
        })
    }

    /// Fixed-size payload for this node.
    pub(crate) fn to_payload(&self) -> [u8; hard_drive::PAYLOAD_SIZE] {
        let mut out = [0u8; hard_drive::PAYLOAD_SIZE];
        out[hard_drive::PARTITION_NUMBER].copy_from_slice(&self.partition_number.to_le_bytes());
        out[hard_drive::PARTITION_START].copy_from_slice(&self.partition_start_lba.to_le_bytes());
        out[hard_drive::PARTITION_SIZE].copy_from_slice(&self.partition_size_lba.to_le_bytes());
        out[hard_drive::PARTITION_SIGNATURE].copy_from_slice(&self.partition_signature);
        out[hard_drive::PARTITION_FORMAT] = self.partition_format;
        out[hard_drive::SIGNATURE_TYPE] = self.signature_type;
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use firmware_variables_raw::guid;

    #[test]
    fn gpt_signature_yields_guid() {
        let guid = guid!("4e5fd2a3-b8c1-4a0b-93e0-6a3c2bd1c7e9");
        let node = HardDriveNode::gpt(1, 2048, 1_048_576, guid);
        let parsed = HardDriveNode::from_payload(&node.to_payload()).unwrap();
        assert_eq!(parsed, node);
        assert_eq!(
            parsed.partition_guid.unwrap().to_string(),
            "4e5fd2a3-b8c1-4a0b-93e0-6a3c2bd1c7e9"
        );
    }

    #[test]
    fn mbr_signature_has_no_guid() {
        let mut payload = [0u8; 38];
        payload[0] = 1;
        payload[20..24].copy_from_slice(&[0xde, 0xad, 0xbe, 0xef]);
        payload[36] = 1;
        payload[37] = 1;
        let parsed = HardDriveNode::from_payload(&payload).unwrap();
        assert_eq!(parsed.partition_number, 1);
        assert_eq!(parsed.partition_guid, None);
        assert_eq!(&parsed.partition_signature[..4], &[0xde, 0xad, 0xbe, 0xef]);
    }

    #[test]
    fn guid_gate_needs_both_fields() {
        let guid = guid!("4e5fd2a3-b8c1-4a0b-93e0-6a3c2bd1c7e9");
        let mut node = HardDriveNode::gpt(1, 0, 0, guid);
        node.partition_format = PartitionFormat::MBR.0;
        let parsed = HardDriveNode::from_payload(&node.to_payload()).unwrap();
        assert_eq!(parsed.partition_guid, None);
        assert_eq!(parsed.partition_signature, guid.to_bytes());
    }

    #[test]
    fn short_payload() {
        assert_eq!(HardDriveNode::from_payload(&[0u8; 37]), None);
    }
}
