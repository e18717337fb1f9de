// SPDX-License-Identifier: MIT OR Apache-2.0

//! Device path node tags and fixed payload layouts.
//!
//! Every device path node starts with a [`DevicePathHeader`] naming a
//! [`DeviceType`] and a subtype. Subtype values are only meaningful relative
//! to their type: `0x01` is a PCI node under [`DeviceType::Hardware`] but a
//! hard drive node under [`DeviceType::Media`]. [`DeviceSubType`] models that
//! as a two-level tagged union, with one closed subtype enumeration per
//! device type.

closed_enum! {
    /// Type identifier for a device path node.
    pub enum DeviceType: u8 {
        /// Hardware Device Path.
        ///
        /// Defines how a device is attached to the resource domain of the
        /// system (shared memory, memory mapped I/O and I/O space).
        Hardware = 0x01,
        /// ACPI Device Path.
        ///
        /// Links to devices described with ACPI AML in the ACPI namespace.
        Acpi = 0x02,
        /// Messaging Device Path.
        ///
        /// Describes the connection of devices outside the resource domain
        /// of the system, such as a SCSI ID or a network address.
        Messaging = 0x03,
        /// Media Device Path.
        ///
        /// Describes the portion of a medium abstracted by a boot service,
        /// for example a partition on a hard drive.
        Media = 0x04,
        /// BIOS Boot Specification Device Path.
        ///
        /// Points to legacy operating systems booted through BIOS Boot
        /// Specification 1.01.
        BiosBootSpec = 0x05,
        /// End of Hardware Device Path.
        ///
        /// Ends either the current device path instance or the entire device
        /// path, depending on the subtype.
        End = 0x7F,
    }
}

closed_enum! {
    /// Subtypes of [`DeviceType::Hardware`].
    pub enum HardwareSubType: u8 {
        /// PCI Device Path.
        Pci = 0x01,
        /// PCCARD Device Path.
        PcCard = 0x02,
        /// Memory-mapped Device Path.
        MemoryMapped = 0x03,
        /// Vendor-Defined Device Path.
        Vendor = 0x04,
        /// Controller Device Path.
        Controller = 0x05,
        /// BMC Device Path.
        Bmc = 0x06,
    }
}

closed_enum! {
    /// Subtypes of [`DeviceType::Acpi`].
    pub enum AcpiSubType: u8 {
        /// ACPI Device Path.
        Acpi = 0x01,
        /// Expanded ACPI Device Path.
        Expanded = 0x02,
        /// ACPI _ADR Device Path.
        Adr = 0x03,
        /// NVDIMM Device Path.
        Nvdimm = 0x04,
    }
}

closed_enum! {
    /// Subtypes of [`DeviceType::Messaging`].
    pub enum MessagingSubType: u8 {
        /// ATAPI Device Path.
        Atapi = 0x01,
        /// SCSI Device Path.
        Scsi = 0x02,
        /// Fibre Channel Device Path.
        FibreChannel = 0x03,
        /// 1394 Device Path.
        Ieee1394 = 0x04,
        /// USB Device Path.
        Usb = 0x05,
        /// I2O Device Path.
        I2o = 0x06,
        /// InfiniBand Device Path.
        Infiniband = 0x09,
        /// Vendor-Defined Device Path.
        Vendor = 0x0A,
        /// MAC Address Device Path.
        MacAddress = 0x0B,
        /// IPv4 Device Path.
        Ipv4 = 0x0C,
        /// IPv6 Device Path.
        Ipv6 = 0x0D,
        /// UART Device Path.
        Uart = 0x0E,
        /// USB Class Device Path.
        UsbClass = 0x0F,
        /// USB WWID Device Path.
        UsbWwid = 0x10,
        /// Device Logical Unit.
        DeviceLogicalUnit = 0x11,
        /// SATA Device Path.
        Sata = 0x12,
        /// iSCSI Device Path.
        Iscsi = 0x13,
        /// VLAN Device Path.
        Vlan = 0x14,
        /// Fibre Channel Ex Device Path.
        FibreChannelEx = 0x15,
        /// Serial Attached SCSI (SAS) Ex Device Path.
        SasEx = 0x16,
        /// NVM Express Namespace Device Path.
        NvmeNamespace = 0x17,
        /// Uniform Resource Identifier (URI) Device Path.
        Uri = 0x18,
        /// UFS Device Path.
        Ufs = 0x19,
        /// SD (Secure Digital) Device Path.
        Sd = 0x1A,
        /// Bluetooth Device Path.
        Bluetooth = 0x1B,
        /// Wi-Fi Device Path.
        Wifi = 0x1C,
        /// eMMC (Embedded Multi-Media Card) Device Path.
        Emmc = 0x1D,
        /// Bluetooth LE Device Path.
        BluetoothLe = 0x1E,
        /// DNS Device Path.
        Dns = 0x1F,
        /// NVDIMM Namespace Device Path.
        NvdimmNamespace = 0x20,
        /// REST Service Device Path.
        RestService = 0x21,
        /// NVMe over Fabric (NVMe-oF) Namespace Device Path.
        NvmeOfNamespace = 0x22,
    }
}

closed_enum! {
    /// Subtypes of [`DeviceType::Media`].
    pub enum MediaSubType: u8 {
        /// Hard Drive Media Device Path.
        HardDrive = 0x01,
        /// CD-ROM Media Device Path.
        CdRom = 0x02,
        /// Vendor-Defined Media Device Path.
        Vendor = 0x03,
        /// File Path Media Device Path.
        FilePath = 0x04,
        /// Media Protocol Device Path.
        Protocol = 0x05,
        /// PIWG Firmware File.
        PiwgFirmwareFile = 0x06,
        /// PIWG Firmware Volume.
        PiwgFirmwareVolume = 0x07,
        /// Relative Offset Range.
        RelativeOffsetRange = 0x08,
        /// RAM Disk Device Path.
        RamDisk = 0x09,
    }
}

closed_enum! {
    /// Subtypes of [`DeviceType::BiosBootSpec`].
    pub enum BiosBootSpecSubType: u8 {
        /// BIOS Boot Specification Version 1.01.
        BootSpecification = 0x01,
    }
}

closed_enum! {
    /// Subtypes of [`DeviceType::End`].
    pub enum EndSubType: u8 {
        /// End this instance of a device path and start a new one.
        Instance = 0x01,
        /// End the entire device path.
        Entire = 0xFF,
    }
}

/// Subtype of a device path node, tagged by the [`DeviceType`] it belongs
/// to.
///
/// A value of this type is always a valid (type, subtype) pairing, so the
/// device type of a node never needs to be stored separately.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum DeviceSubType {
    /// Subtype of a [`DeviceType::Hardware`] node.
    Hardware(HardwareSubType),
    /// Subtype of a [`DeviceType::Acpi`] node.
    Acpi(AcpiSubType),
    /// Subtype of a [`DeviceType::Messaging`] node.
    Messaging(MessagingSubType),
    /// Subtype of a [`DeviceType::Media`] node.
    Media(MediaSubType),
    /// Subtype of a [`DeviceType::BiosBootSpec`] node.
    BiosBootSpec(BiosBootSpecSubType),
    /// Subtype of a [`DeviceType::End`] node.
    End(EndSubType),
}

impl DeviceSubType {
    /// Look up `sub_type` in the subtype enumeration registered for
    /// `device_type`. Returns `None` if that type has no such subtype.
    #[must_use]
    pub fn from_raw(device_type: DeviceType, sub_type: u8) -> Option<Self> {
        match device_type {
            DeviceType::Hardware => HardwareSubType::from_raw(sub_type).map(Self::Hardware),
            DeviceType::Acpi => AcpiSubType::from_raw(sub_type).map(Self::Acpi),
            DeviceType::Messaging => MessagingSubType::from_raw(sub_type).map(Self::Messaging),
            DeviceType::Media => MediaSubType::from_raw(sub_type).map(Self::Media),
            DeviceType::BiosBootSpec => {
                BiosBootSpecSubType::from_raw(sub_type).map(Self::BiosBootSpec)
            }
            DeviceType::End => EndSubType::from_raw(sub_type).map(Self::End),
        }
    }

    /// The device type this subtype belongs to.
    #[must_use]
    pub const fn device_type(self) -> DeviceType {
        match self {
            Self::Hardware(_) => DeviceType::Hardware,
            Self::Acpi(_) => DeviceType::Acpi,
            Self::Messaging(_) => DeviceType::Messaging,
            Self::Media(_) => DeviceType::Media,
            Self::BiosBootSpec(_) => DeviceType::BiosBootSpec,
            Self::End(_) => DeviceType::End,
        }
    }

    /// The raw subtype byte.
    #[must_use]
    pub const fn raw(self) -> u8 {
        match self {
            Self::Hardware(s) => s.raw(),
            Self::Acpi(s) => s.raw(),
            Self::Messaging(s) => s.raw(),
            Self::Media(s) => s.raw(),
            Self::BiosBootSpec(s) => s.raw(),
            Self::End(s) => s.raw(),
        }
    }
}

/// Header that appears at the start of every device path node.
///
/// The length counts the whole node, header included, and is stored
/// little-endian. Nodes may start on any byte boundary, so the length is kept
/// as raw bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(C)]
pub struct DevicePathHeader {
    /// Raw [`DeviceType`] value.
    pub major_type: u8,
    /// Raw subtype value.
    pub sub_type: u8,
    /// Total length of the node in bytes, little-endian.
    pub length: [u8; 2],
}

impl DevicePathHeader {
    /// Size of the header in bytes.
    pub const SIZE: usize = 4;

    /// Build a header for a node of `length` bytes in total.
    #[must_use]
    pub const fn new(sub_type: DeviceSubType, length: u16) -> Self {
        Self {
            major_type: sub_type.device_type().raw(),
            sub_type: sub_type.raw(),
            length: length.to_le_bytes(),
        }
    }

    /// Read a header from its wire representation.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; Self::SIZE]) -> Self {
        Self {
            major_type: bytes[0],
            sub_type: bytes[1],
            length: [bytes[2], bytes[3]],
        }
    }

    /// Wire representation of the header.
    #[must_use]
    pub const fn to_bytes(self) -> [u8; Self::SIZE] {
        [self.major_type, self.sub_type, self.length[0], self.length[1]]
    }

    /// Total length of the node in bytes, header included.
    #[must_use]
    pub const fn length(&self) -> u16 {
        u16::from_le_bytes(self.length)
    }
}

/// Payload layout of a [`MediaSubType::HardDrive`] node.
///
/// All offsets are relative to the end of the node header. Integers are
/// little-endian.
pub mod hard_drive {
    use core::ops::Range;

    /// Minimum payload size of a hard drive node.
    pub const PAYLOAD_SIZE: usize = 38;

    /// `u32` index of the partition, starting from 1.
    pub const PARTITION_NUMBER: Range<usize> = 0..4;
    /// `u64` starting LBA of the partition.
    pub const PARTITION_START: Range<usize> = 4..12;
    /// `u64` size of the partition in blocks.
    pub const PARTITION_SIZE: Range<usize> = 12..20;
    /// 16 raw signature bytes.
    pub const PARTITION_SIGNATURE: Range<usize> = 20..36;
    /// `u8` [`PartitionFormat`](super::PartitionFormat).
    pub const PARTITION_FORMAT: usize = 36;
    /// `u8` [`SignatureType`](super::SignatureType).
    pub const SIGNATURE_TYPE: usize = 37;
}

newtype_enum! {
    /// Hard drive partition format.
    pub enum PartitionFormat: u8 => {
        /// MBR (PC-AT compatible Master Boot Record) format.
        MBR = 0x01,
        /// GPT (GUID Partition Table) format.
        GPT = 0x02,
    }
}

newtype_enum! {
    /// Kind of signature stored in a hard drive node.
    pub enum SignatureType: u8 => {
        /// No disk signature.
        NONE = 0x00,
        /// 32-bit MBR signature, stored in the first four signature bytes.
        MBR = 0x01,
        /// 128-bit GUID signature.
        GUID = 0x02,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtype_requires_matching_type() {
        assert_eq!(
            DeviceSubType::from_raw(DeviceType::Media, 0x04),
            Some(DeviceSubType::Media(MediaSubType::FilePath))
        );
        assert_eq!(
            DeviceSubType::from_raw(DeviceType::Hardware, 0x04),
            Some(DeviceSubType::Hardware(HardwareSubType::Vendor))
        );
        // Only End nodes use 0xFF.
        assert_eq!(DeviceSubType::from_raw(DeviceType::Media, 0xFF), None);
        assert_eq!(
            DeviceSubType::from_raw(DeviceType::End, 0xFF),
            Some(DeviceSubType::End(EndSubType::Entire))
        );
        // Reserved messaging subtypes are not registered.
        assert_eq!(DeviceSubType::from_raw(DeviceType::Messaging, 0x07), None);
        assert_eq!(DeviceSubType::from_raw(DeviceType::BiosBootSpec, 0x02), None);
    }

    #[test]
    fn unknown_type_is_rejected() {
        assert_eq!(DeviceType::from_raw(0x06), None);
        assert_eq!(DeviceType::try_from(0xFF), Err(0xFF));
        assert_eq!(DeviceType::try_from(0x7F), Ok(DeviceType::End));
    }

    #[test]
    fn subtype_raw_values_round_trip() {
        for &device_type in DeviceType::ALL {
            for raw in 0..=u8::MAX {
                if let Some(sub_type) = DeviceSubType::from_raw(device_type, raw) {
                    assert_eq!(sub_type.device_type(), device_type);
                    assert_eq!(sub_type.raw(), raw);
                }
            }
        }
    }

    #[test]
    fn header_bytes() {
        let header = DevicePathHeader::new(DeviceSubType::End(EndSubType::Entire), 4);
        assert_eq!(header.to_bytes(), [0x7F, 0xFF, 0x04, 0x00]);
        assert_eq!(DevicePathHeader::from_bytes([4, 1, 0x2a, 0x00]).length(), 42);
    }
}
