//! Snapshot persistence for inventory and equipment state.
//!
//! The logical snapshot is a plain serde structure; the durable form is
//! a small header (magic, version, CRC32, payload length) over a
//! zstd-compressed bincode payload, one file per save slot.

use crate::registry::ItemRegistry;
use crate::system::GearSystem;
use anyhow::{Context, Result};
use crc32fast::Hasher;
use satchel_core::{EquipSlot, ItemId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Magic number identifying a save file ("STCH").
const SAVE_MAGIC: u32 = 0x53544348;

/// Current save file format version.
const SAVE_VERSION: u16 = 1;

/// One occupied inventory slot as persisted.
///
/// Reservation flags are deliberately absent: reservations live and
/// die inside a single equip transaction, so a snapshot can never
/// observe one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedItem {
    /// Item id, resolved through the registry on restore.
    pub id: ItemId,
    /// Units in the stack.
    pub quantity: u32,
    /// Slot index the stack occupied.
    pub slot: usize,
}

/// Durable snapshot of inventory plus shared loadout.
///
/// Empty slots are omitted; the equipment map is ordered so snapshots
/// of identical state serialize identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Currency balance.
    pub currency: u32,
    /// Carry weight at save time (informational; recomputed on load).
    pub current_weight: f32,
    /// Carry-weight budget.
    pub max_weight: f32,
    /// Inventory slot count.
    pub capacity: usize,
    /// Every occupied inventory slot.
    pub items: Vec<SavedItem>,
    /// Shared loadout occupants by canonical slot kind.
    pub equipment: BTreeMap<EquipSlot, ItemId>,
}

impl GearSystem {
    /// Capture the inventory and shared loadout as a snapshot.
    pub fn snapshot(&self) -> Snapshot {
        let inventory = self.inventory();
        let items = inventory
            .slots()
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| {
                entry.as_ref().map(|entry| SavedItem {
                    id: entry.item.id.clone(),
                    quantity: entry.quantity,
                    slot,
                })
            })
            .collect();

        let equipment = self
            .shared_loadout()
            .iter()
            .filter_map(|(slot, item)| item.map(|item| (slot, item.id.clone())))
            .collect();

        Snapshot {
            currency: inventory.currency(),
            current_weight: inventory.current_weight(),
            max_weight: inventory.max_weight(),
            capacity: inventory.capacity(),
            items,
            equipment,
        }
    }

    /// Rebuild inventory and shared loadout from a snapshot, resolving
    /// every id through the registry.
    ///
    /// Entries that no longer resolve are skipped and logged, never
    /// fatal; the return value is the number of skipped entries. After
    /// the rebuild the shared loadout is mirrored onto the active
    /// member and the change events fire.
    pub fn restore(&mut self, snapshot: &Snapshot) -> usize {
        let mut skipped = 0;

        {
            let (registry, inventory, shared) = self.parts_mut();
            inventory.reinitialize(snapshot.capacity, snapshot.max_weight);

            for saved in &snapshot.items {
                let Some(item) = resolve_logged(registry, &saved.id, &mut skipped) else {
                    continue;
                };
                if let Err(err) = inventory.restore_entry(saved.slot, &item, saved.quantity) {
                    tracing::warn!(id = %saved.id, slot = saved.slot, %err,
                        "skipping inventory entry that no longer fits");
                    skipped += 1;
                }
            }
            inventory.restore_currency(snapshot.currency);

            *shared = crate::loadout::Loadout::new();
            for (slot, id) in &snapshot.equipment {
                let Some(item) = resolve_logged(registry, id, &mut skipped) else {
                    continue;
                };
                // The item was never in inventory at save time, so it
                // goes straight onto the loadout. A kind mismatch means
                // the pack changed under the save; skip it.
                let compatible = item
                    .equip_slot
                    .is_some_and(|item_slot| slot.accepts(item_slot));
                if !compatible {
                    tracing::warn!(id = %id, slot = %slot,
                        "skipping equipment entry whose slot kind no longer matches");
                    skipped += 1;
                    continue;
                }
                let _ = shared.equip(&item);
            }
        }

        self.after_restore();
        skipped
    }
}

fn resolve_logged(
    registry: &ItemRegistry,
    id: &ItemId,
    skipped: &mut usize,
) -> Option<std::sync::Arc<satchel_core::ItemDefinition>> {
    match registry.resolve(id) {
        Some(item) => Some(item),
        None => {
            tracing::warn!(id = %id, "skipping unresolvable item id in snapshot");
            *skipped += 1;
            None
        }
    }
}

/// Save file header structure.
#[derive(Debug, Clone)]
struct SaveHeader {
    magic: u32,
    version: u16,
    crc32: u32,
    payload_len: u32,
}

impl SaveHeader {
    fn new(crc32: u32, payload_len: u32) -> Self {
        Self {
            magic: SAVE_MAGIC,
            version: SAVE_VERSION,
            crc32,
            payload_len,
        }
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(14);
        bytes.extend_from_slice(&self.magic.to_le_bytes());
        bytes.extend_from_slice(&self.version.to_le_bytes());
        bytes.extend_from_slice(&self.crc32.to_le_bytes());
        bytes.extend_from_slice(&self.payload_len.to_le_bytes());
        bytes
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < 14 {
            anyhow::bail!("save header too short");
        }

        let magic = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        if magic != SAVE_MAGIC {
            anyhow::bail!(
                "invalid save magic: expected 0x{:08X}, got 0x{:08X}",
                SAVE_MAGIC,
                magic
            );
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        let crc32 = u32::from_le_bytes([bytes[6], bytes[7], bytes[8], bytes[9]]);
        let payload_len = u32::from_le_bytes([bytes[10], bytes[11], bytes[12], bytes[13]]);

        Ok(Self {
            magic,
            version,
            crc32,
            payload_len,
        })
    }
}

/// File-backed snapshot store keyed by save-slot integer.
pub struct SaveStore {
    save_dir: PathBuf,
}

impl SaveStore {
    /// Create a store rooted at the given directory.
    pub fn new<P: AsRef<Path>>(save_dir: P) -> Result<Self> {
        let save_dir = save_dir.as_ref().to_path_buf();
        fs::create_dir_all(&save_dir).context("failed to create save directory")?;
        Ok(Self { save_dir })
    }

    fn slot_path(&self, slot: u32) -> PathBuf {
        self.save_dir.join(format!("save.{slot}.sv"))
    }

    /// Write a snapshot to its slot file.
    pub fn write_slot(&self, slot: u32, snapshot: &Snapshot) -> Result<()> {
        let serialized = bincode::serialize(snapshot).context("failed to serialize snapshot")?;
        let compressed =
            zstd::encode_all(&serialized[..], 3).context("failed to compress snapshot")?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        let header = SaveHeader::new(hasher.finalize(), compressed.len() as u32);

        let path = self.slot_path(slot);
        let mut file = File::create(&path)
            .with_context(|| format!("failed to create save file {}", path.display()))?;
        file.write_all(&header.to_bytes())
            .context("failed to write save header")?;
        file.write_all(&compressed)
            .context("failed to write save payload")?;
        Ok(())
    }

    /// Read a snapshot from a slot file.
    ///
    /// A missing file is `Ok(None)`: no prior save means "use
    /// defaults", not an error. Corrupt files (bad magic, CRC
    /// mismatch, truncation) are errors.
    pub fn read_slot(&self, slot: u32) -> Result<Option<Snapshot>> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }

        let mut file = File::open(&path)
            .with_context(|| format!("failed to open save file {}", path.display()))?;

        let mut header_bytes = [0u8; 14];
        file.read_exact(&mut header_bytes)
            .context("failed to read save header")?;
        let header = SaveHeader::from_bytes(&header_bytes)?;
        if header.version != SAVE_VERSION {
            anyhow::bail!("unsupported save version {}", header.version);
        }

        let mut compressed = vec![0u8; header.payload_len as usize];
        file.read_exact(&mut compressed)
            .context("failed to read save payload")?;

        let mut hasher = Hasher::new();
        hasher.update(&compressed);
        let computed = hasher.finalize();
        if computed != header.crc32 {
            anyhow::bail!(
                "save CRC32 mismatch: expected {:08X}, got {:08X}",
                header.crc32,
                computed
            );
        }

        let decompressed =
            zstd::decode_all(&compressed[..]).context("failed to decompress snapshot")?;
        let snapshot =
            bincode::deserialize(&decompressed).context("failed to deserialize snapshot")?;
        Ok(Some(snapshot))
    }

    /// Whether a slot file exists.
    pub fn slot_exists(&self, slot: u32) -> bool {
        self.slot_path(slot).exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_header_roundtrip() {
        let header = SaveHeader::new(0xDEADBEEF, 1234);
        let bytes = header.to_bytes();
        let decoded = SaveHeader::from_bytes(&bytes).unwrap();

        assert_eq!(decoded.magic, SAVE_MAGIC);
        assert_eq!(decoded.version, SAVE_VERSION);
        assert_eq!(decoded.crc32, 0xDEADBEEF);
        assert_eq!(decoded.payload_len, 1234);
    }

    #[test]
    fn header_rejects_bad_magic() {
        let mut bytes = SaveHeader::new(1, 2).to_bytes();
        bytes[0] ^= 0xFF;
        assert!(SaveHeader::from_bytes(&bytes).is_err());
        assert!(SaveHeader::from_bytes(&bytes[..5]).is_err());
    }
}
