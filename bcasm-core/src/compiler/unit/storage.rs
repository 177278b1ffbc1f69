//! 静态数据分配器
//!
//! 父编译单元和插值子单元共享同一个分配器，槽位编号全局唯一。

use std::fmt;

/// 静态区中的一项数据
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaticData {
    Integer(i64),
    String(String),
    /// 标签占位，值为标签名
    Label(String),
}

impl fmt::Display for StaticData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaticData::Integer(v) => write!(f, "{}", v),
            StaticData::String(s) => write!(f, "{:?}", s),
            StaticData::Label(name) => write!(f, "<label {}>", name),
        }
    }
}

/// 静态数据区
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataStorage {
    statics: Vec<StaticData>,
}

impl DataStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 分配一个新的静态槽位，返回槽位编号
    pub fn alloc_static(&mut self, data: StaticData) -> u32 {
        let slot = self.statics.len() as u32;
        self.statics.push(data);
        slot
    }

    pub fn get(&self, slot: u32) -> Option<&StaticData> {
        self.statics.get(slot as usize)
    }

    pub fn len(&self) -> usize {
        self.statics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.statics.is_empty()
    }

    pub fn statics(&self) -> &[StaticData] {
        &self.statics
    }
}
