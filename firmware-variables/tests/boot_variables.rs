// SPDX-License-Identifier: MIT OR Apache-2.0

use firmware_variables::boot;
use firmware_variables::device_path::{DevicePathList, DevicePathNode, HardDriveNode};
use firmware_variables::{
    guid, Error, LoadOption, MemoryStore, Status, VariableAttributes, VariableKey, VariableStore,
    VariableVendor,
};
use std::cell::Cell;

fn sample_option() -> LoadOption {
    let path: DevicePathList = [
        DevicePathNode::hard_drive(&HardDriveNode::gpt(
            1,
            2048,
            1_048_576,
            guid!("4e5fd2a3-b8c1-4a0b-93e0-6a3c2bd1c7e9"),
        )),
        DevicePathNode::file_path(r"\EFI\BOOT\BOOTX64.EFI").unwrap(),
        DevicePathNode::end_entire(),
    ]
    .into_iter()
    .collect();
    LoadOption::new("Linux Boot Manager", path)
}

#[test]
fn boot_order_round_trip() {
    let mut store = MemoryStore::new();
    boot::set_boot_order(&mut store, &[3, 0, 7, 3]).unwrap();
    assert_eq!(boot::boot_order(&store).unwrap(), [3, 0, 7, 3]);

    let (raw, attributes) = store
        .read_variable("BootOrder", &VariableVendor::GLOBAL_VARIABLE)
        .unwrap();
    assert_eq!(raw, [3, 0, 0, 0, 7, 0, 3, 0]);
    assert_eq!(attributes, boot::DEFAULT_ATTRIBUTES);
}

#[test]
fn empty_boot_order_deletes() {
    let mut store = MemoryStore::new();
    boot::set_boot_order(&mut store, &[1]).unwrap();
    boot::set_boot_order(&mut store, &[]).unwrap();
    assert!(store.is_empty());
    boot::set_boot_order(&mut store, &[]).unwrap();

    let err = boot::boot_order(&store).unwrap_err();
    assert!(err.is_not_found());
}

#[test]
fn parsed_entry_round_trip() {
    let mut store = MemoryStore::new();
    let option = sample_option();
    boot::set_parsed_boot_entry(&mut store, 0x1a, &option).unwrap();

    assert_eq!(
        store.variable_keys().unwrap(),
        [VariableKey::new("Boot001A", VariableVendor::GLOBAL_VARIABLE)]
    );

    let raw = boot::boot_entry(&store, 0x1a).unwrap();
    assert_eq!(raw, option.encode().unwrap());

    let parsed = boot::parsed_boot_entry(&store, 0x1a).unwrap();
    assert_eq!(parsed, option);
    assert_eq!(parsed.device_path.to_string(), r"\EFI\BOOT\BOOTX64.EFI");
    assert_eq!(
        parsed
            .device_path
            .hard_drive_node()
            .and_then(|node| node.partition_guid)
            .map(|guid| guid.to_string())
            .as_deref(),
        Some("4e5fd2a3-b8c1-4a0b-93e0-6a3c2bd1c7e9")
    );
}

#[test]
fn edit_file_path_in_place() {
    let mut store = MemoryStore::new();
    boot::set_parsed_boot_entry(&mut store, 1, &sample_option()).unwrap();
    let before = boot::boot_entry(&store, 1).unwrap();

    let mut option = boot::parsed_boot_entry(&store, 1).unwrap();
    assert!(option.device_path.set_file_path(r"\EFI\systemd\systemd-bootx64.efi"));
    boot::set_parsed_boot_entry(&mut store, 1, &option).unwrap();

    let after = boot::boot_entry(&store, 1).unwrap();
    let path_len = usize::from(u16::from_le_bytes([after[4], after[5]]));
    assert_eq!(path_len, option.device_path.encode().len());
    assert!(after.len() > before.len());
    assert_eq!(boot::parsed_boot_entry(&store, 1).unwrap(), option);
}

#[test]
fn raw_entry_is_written_unchanged() {
    let mut store = MemoryStore::new();
    // Not a valid load option: no description terminator.
    let raw = [1, 0, 0, 0, 0, 0, b'x', 0];
    boot::set_boot_entry(&mut store, 2, &raw).unwrap();
    assert_eq!(boot::boot_entry(&store, 2).unwrap(), raw);

    match boot::parsed_boot_entry(&store, 2) {
        Err(Error::Variable { name, source }) => {
            assert_eq!(name, "Boot0002");
            assert!(matches!(*source, Error::MalformedLoadOption { .. }));
        }
        other => panic!("unexpected result: {other:?}"),
    }
}

#[test]
fn missing_entry() {
    let store = MemoryStore::new();
    assert_eq!(
        boot::boot_entry(&store, 5),
        Err(Error::Store {
            name: "Boot0005".into(),
            status: Status::NOT_FOUND
        })
    );
}

#[test]
fn delete_entry() {
    let mut store = MemoryStore::new();
    boot::set_parsed_boot_entry(&mut store, -1, &sample_option()).unwrap();
    assert!(store
        .read_variable("BootFFFF", &VariableVendor::GLOBAL_VARIABLE)
        .is_ok());

    boot::delete_boot_entry(&mut store, -1).unwrap();
    assert!(boot::boot_entry(&store, -1).unwrap_err().is_not_found());
    assert!(boot::delete_boot_entry(&mut store, -1)
        .unwrap_err()
        .is_not_found());
}

#[test]
fn boot_next_absent_is_none() {
    let store = MemoryStore::new();
    assert_eq!(boot::boot_next(&store), Ok(None));
    assert_eq!(boot::boot_current(&store), Ok(None));
}

#[test]
fn boot_next_round_trip() {
    let mut store = MemoryStore::new();
    boot::set_boot_next(&mut store, 0).unwrap();
    assert_eq!(boot::boot_next(&store), Ok(Some(0)));

    boot::set_boot_next(&mut store, -3).unwrap();
    assert_eq!(boot::boot_next(&store), Ok(Some(-3)));

    boot::clear_boot_next(&mut store).unwrap();
    assert_eq!(boot::boot_next(&store), Ok(None));
    boot::clear_boot_next(&mut store).unwrap();
}

#[test]
fn boot_current() {
    let mut store = MemoryStore::new();
    store
        .write_variable(
            "BootCurrent",
            &VariableVendor::GLOBAL_VARIABLE,
            &[4, 0],
            VariableAttributes::BOOTSERVICE_ACCESS | VariableAttributes::RUNTIME_ACCESS,
        )
        .unwrap();
    assert_eq!(boot::boot_current(&store), Ok(Some(4)));
}

/// Store that fails every access with a fixed status and counts calls.
struct FailingStore {
    supported: bool,
    status: Status,
    calls: Cell<usize>,
}

impl FailingStore {
    fn new(supported: bool, status: Status) -> Self {
        Self {
            supported,
            status,
            calls: Cell::new(0),
        }
    }

    fn fail<T>(&self) -> Result<T, Status> {
        self.calls.set(self.calls.get() + 1);
        Err(self.status)
    }
}

impl VariableStore for FailingStore {
    fn firmware_supported(&self) -> bool {
        self.supported
    }

    fn read_variable(
        &self,
        _name: &str,
        _vendor: &VariableVendor,
    ) -> Result<(Vec<u8>, VariableAttributes), Status> {
        self.fail()
    }

    fn write_variable(
        &mut self,
        _name: &str,
        _vendor: &VariableVendor,
        _data: &[u8],
        _attributes: VariableAttributes,
    ) -> Result<(), Status> {
        self.fail()
    }

    fn delete_variable(&mut self, _name: &str, _vendor: &VariableVendor) -> Result<(), Status> {
        self.fail()
    }

    fn variable_keys(&self) -> Result<Vec<VariableKey>, Status> {
        self.fail()
    }
}

#[test]
fn boot_next_passes_other_failures_through() {
    let store = FailingStore::new(true, Status::ACCESS_DENIED);
    let err = boot::boot_next(&store).unwrap_err();
    assert_eq!(err.status(), Some(Status::ACCESS_DENIED));
    assert_eq!(store.calls.get(), 1);
}

#[test]
fn clear_boot_next_passes_other_failures_through() {
    let mut store = FailingStore::new(true, Status::WRITE_PROTECTED);
    assert_eq!(
        boot::clear_boot_next(&mut store),
        Err(Error::Store {
            name: "BootNext".into(),
            status: Status::WRITE_PROTECTED
        })
    );
}

#[test]
fn unsupported_firmware_touches_nothing() {
    let mut store = FailingStore::new(false, Status::DEVICE_ERROR);
    let option = sample_option();

    assert_eq!(boot::boot_order(&store), Err(Error::UnsupportedFirmware));
    assert_eq!(
        boot::set_boot_order(&mut store, &[1]),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(boot::boot_entry(&store, 1), Err(Error::UnsupportedFirmware));
    assert_eq!(
        boot::set_boot_entry(&mut store, 1, &[]),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(
        boot::parsed_boot_entry(&store, 1),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(
        boot::set_parsed_boot_entry(&mut store, 1, &option),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(
        boot::delete_boot_entry(&mut store, 1),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(boot::boot_next(&store), Err(Error::UnsupportedFirmware));
    assert_eq!(
        boot::set_boot_next(&mut store, 1),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(
        boot::clear_boot_next(&mut store),
        Err(Error::UnsupportedFirmware)
    );
    assert_eq!(boot::boot_current(&store), Err(Error::UnsupportedFirmware));

    assert_eq!(store.calls.get(), 0);
}

#[test]
fn unsupported_memory_store() {
    let mut store = MemoryStore::unsupported();
    assert_eq!(
        boot::set_boot_next(&mut store, 1),
        Err(Error::UnsupportedFirmware)
    );
    assert!(store.is_empty());
}

#[test]
fn works_through_trait_objects() {
    let mut store = MemoryStore::new();
    let dyn_store: &mut dyn VariableStore = &mut store;
    boot::set_boot_order(&mut *dyn_store, &[2, 1]).unwrap();
    assert_eq!(boot::boot_order(&*dyn_store).unwrap(), [2, 1]);
}
