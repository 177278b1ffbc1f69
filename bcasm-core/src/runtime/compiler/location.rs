//! 对象位置：存储类别 + 槽位
//!
//! 编码为 5 字节：1 字节存储类别，随后槽位 u32 小端。

use std::fmt;

/// 存储类别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DataStoreLocation {
    Null = 0,
    Static = 1,
    Local = 2,
    Register = 3,
}

impl DataStoreLocation {
    pub fn name(&self) -> &'static str {
        match self {
            DataStoreLocation::Null => "NULL",
            DataStoreLocation::Static => "STATIC",
            DataStoreLocation::Local => "LOCAL",
            DataStoreLocation::Register => "REGISTER",
        }
    }

    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(DataStoreLocation::Null),
            1 => Some(DataStoreLocation::Static),
            2 => Some(DataStoreLocation::Local),
            3 => Some(DataStoreLocation::Register),
            _ => None,
        }
    }
}

/// 对象位置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjLoc {
    slot: u32,
    store: DataStoreLocation,
}

impl ObjLoc {
    /// 编码后的字节数
    pub const ENCODED_SIZE: usize = 5;

    pub fn new(slot: u32, store: DataStoreLocation) -> Self {
        Self { slot, store }
    }

    pub fn static_slot(slot: u32) -> Self {
        Self::new(slot, DataStoreLocation::Static)
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn store(&self) -> DataStoreLocation {
        self.store
    }

    pub fn encode(&self) -> [u8; Self::ENCODED_SIZE] {
        let s = self.slot.to_le_bytes();
        [self.store as u8, s[0], s[1], s[2], s[3]]
    }

    pub fn decode(bytes: &[u8]) -> Option<Self> {
        let (&store, rest) = bytes.split_first()?;
        let slot: [u8; 4] = rest.get(..4)?.try_into().ok()?;
        Some(Self::new(
            u32::from_le_bytes(slot),
            DataStoreLocation::from_byte(store)?,
        ))
    }
}

impl fmt::Display for ObjLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.store.name(), self.slot)
    }
}
