//! Structure identity codec.
//!
//! One `u32` packs (kind, owner keep, tower index, component, sub index)
//! into fixed decimal digit slots: kind at 10^8, owner keep id (3 digits) at
//! 10^5, tower index at 10^4, component id (2 digits) at 10^2 and sub index
//! (2 digits) at 10^0. The scheme is a closed internal convention: encoding
//! does not validate slot widths, callers supply values that fit.

/// Kind tag for door items.
pub const KIND_DOOR: u32 = 7;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct StructureIdent {
    pub kind: u32,
    pub owner_keep_id: u32,
    pub tower_index: u32,
    pub component_id: u32,
    pub sub_index: u32,
}

impl StructureIdent {
    #[inline]
    pub fn encode(self) -> u32 {
        self.kind * 100_000_000
            + self.owner_keep_id * 100_000
            + self.tower_index * 10_000
            + self.component_id * 100
            + self.sub_index
    }

    #[inline]
    pub fn decode(id: u32) -> Self {
        Self {
            kind: id / 100_000_000,
            owner_keep_id: (id / 100_000) % 1_000,
            tower_index: (id / 10_000) % 10,
            component_id: (id / 100) % 100,
            sub_index: id % 100,
        }
    }
}

/// Door id for a keep component slot.
#[inline]
pub fn door_id(owner_keep_id: u32, tower_index: u32, component_id: u32, sub_index: u32) -> u32 {
    StructureIdent {
        kind: KIND_DOOR,
        owner_keep_id,
        tower_index,
        component_id,
        sub_index,
    }
    .encode()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_known_example() {
        let id = door_id(12, 0, 3, 1);
        assert_eq!(id, 701_200_301);
        let back = StructureIdent::decode(id);
        assert_eq!(back.kind, KIND_DOOR);
        assert_eq!(back.owner_keep_id, 12);
        assert_eq!(back.tower_index, 0);
        assert_eq!(back.component_id, 3);
        assert_eq!(back.sub_index, 1);
    }

    #[test]
    fn round_trips_at_slot_bounds() {
        for ident in [
            StructureIdent { kind: 0, owner_keep_id: 0, tower_index: 0, component_id: 0, sub_index: 0 },
            StructureIdent { kind: 9, owner_keep_id: 999, tower_index: 9, component_id: 99, sub_index: 99 },
            StructureIdent { kind: 7, owner_keep_id: 255, tower_index: 4, component_id: 12, sub_index: 2 },
        ] {
            assert_eq!(StructureIdent::decode(ident.encode()), ident);
        }
    }
}
