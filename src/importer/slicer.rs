// ==========================================
// 查找表文本导入 - 切片
// ==========================================
// slice_size == 0 或条目数 < slice_size → 单片，无序号，Update
// 否则按固定步长切片: 首片 Update（整体替换），后续片 NoUpdate（增量合并）
// 红线: 按发出顺序拼接所有切片必须还原原始条目列表
// ==========================================

use crate::domain::lookup::{LookupSet, LookupValue};
use crate::domain::types::UpdateMode;

/// 一个切片
#[derive(Debug, Clone, PartialEq)]
pub struct LookupSlice {
    /// None 表示未切片（导出文件名不带序号）
    pub index: Option<usize>,
    pub update_mode: UpdateMode,
    pub values: Vec<LookupValue>,
}

impl LookupSlice {
    pub fn into_lookup_set(self, name: &str) -> LookupSet {
        LookupSet::new(name, self.update_mode, self.values)
    }
}

// ==========================================
// LookupSlicer - 切片状态（偏移 / 序号 / 剩余）
// ==========================================
pub struct LookupSlicer<'a> {
    values: &'a [LookupValue],
    slice_size: usize,
    offset: usize,
    index: usize,
    unsliced: bool,
}

impl<'a> LookupSlicer<'a> {
    pub fn new(values: &'a [LookupValue], slice_size: usize) -> Self {
        Self {
            values,
            slice_size,
            offset: 0,
            index: 0,
            unsliced: slice_size == 0 || values.len() < slice_size,
        }
    }

    /// 尚未发出的条目数
    pub fn remaining(&self) -> usize {
        self.values.len().saturating_sub(self.offset)
    }
}

impl Iterator for LookupSlicer<'_> {
    type Item = LookupSlice;

    fn next(&mut self) -> Option<Self::Item> {
        if self.unsliced {
            if self.index > 0 {
                return None;
            }
            self.index = 1;
            self.offset = self.values.len();
            return Some(LookupSlice {
                index: None,
                update_mode: UpdateMode::Update,
                values: self.values.to_vec(),
            });
        }

        if self.offset >= self.values.len() {
            return None;
        }

        let count = self.slice_size.min(self.remaining());
        let update_mode = if self.offset == 0 {
            UpdateMode::Update
        } else {
            UpdateMode::NoUpdate
        };
        let values = self.values[self.offset..self.offset + count].to_vec();

        self.index += 1;
        self.offset += self.slice_size;

        Some(LookupSlice {
            index: Some(self.index),
            update_mode,
            values,
        })
    }
}

/// 切分条目列表
pub fn slice_lookup_values(values: &[LookupValue], slice_size: usize) -> Vec<LookupSlice> {
    LookupSlicer::new(values, slice_size).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(count: usize) -> Vec<LookupValue> {
        (0..count)
            .map(|i| LookupValue {
                key: Some(format!("K{:04}", i)),
                value: Some(i.to_string()),
                ..LookupValue::default()
            })
            .collect()
    }

    #[test]
    fn test_unsliced_when_size_zero() {
        let values = entries(5);
        let slices = slice_lookup_values(&values, 0);

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].index, None);
        assert_eq!(slices[0].update_mode, UpdateMode::Update);
        assert_eq!(slices[0].values, values);
    }

    #[test]
    fn test_unsliced_when_fewer_entries_than_size() {
        let values = entries(99);
        let slices = slice_lookup_values(&values, 100);

        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].index, None);
        assert_eq!(slices[0].values.len(), 99);
    }

    #[test]
    fn test_sliced_250_by_100() {
        let values = entries(250);
        let slices = slice_lookup_values(&values, 100);

        let sizes: Vec<usize> = slices.iter().map(|s| s.values.len()).collect();
        let modes: Vec<UpdateMode> = slices.iter().map(|s| s.update_mode).collect();
        let indexes: Vec<Option<usize>> = slices.iter().map(|s| s.index).collect();

        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(
            modes,
            vec![UpdateMode::Update, UpdateMode::NoUpdate, UpdateMode::NoUpdate]
        );
        assert_eq!(indexes, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_exact_multiple_has_no_empty_trailing_slice() {
        let values = entries(200);
        let slices = slice_lookup_values(&values, 100);
        assert_eq!(slices.len(), 2);
        assert!(slices.iter().all(|s| s.values.len() == 100));

        let values = entries(100);
        let slices = slice_lookup_values(&values, 100);
        assert_eq!(slices.len(), 1);
        assert_eq!(slices[0].index, Some(1));
    }

    #[test]
    fn test_slices_cover_all_entries_in_order() {
        let values = entries(37);
        for size in 1..=40 {
            let slices = slice_lookup_values(&values, size);
            let joined: Vec<LookupValue> = slices.iter().flat_map(|s| s.values.clone()).collect();
            assert_eq!(joined, values, "slice_size={}", size);

            assert_eq!(slices[0].update_mode, UpdateMode::Update);
            assert!(slices
                .iter()
                .skip(1)
                .all(|s| s.update_mode == UpdateMode::NoUpdate));
        }
    }

    #[test]
    fn test_empty_values_unsliced() {
        let slices = slice_lookup_values(&[], 0);
        assert_eq!(slices.len(), 1);
        assert!(slices[0].values.is_empty());
    }

    #[test]
    fn test_slicer_remaining() {
        let values = entries(5);
        let mut slicer = LookupSlicer::new(&values, 2);
        assert_eq!(slicer.remaining(), 5);
        slicer.next();
        assert_eq!(slicer.remaining(), 3);
        slicer.next();
        slicer.next();
        assert_eq!(slicer.remaining(), 0);
        assert!(slicer.next().is_none());
    }

    #[test]
    fn test_into_lookup_set() {
        let values = entries(3);
        let slice = slice_lookup_values(&values, 2).remove(1);
        let lookup = slice.into_lookup_set("Rates");
        assert_eq!(lookup.name, "Rates");
        assert_eq!(lookup.update_mode, UpdateMode::NoUpdate);
        assert_eq!(lookup.values.len(), 1);
    }
}
