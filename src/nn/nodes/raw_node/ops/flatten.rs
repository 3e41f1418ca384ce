/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : Flatten 层：把[flatten_start, flatten_end]这段连续的维度合并为一维
 */

use crate::errors::{ComparisonOperator, ShapeError};
use crate::nn::layout::{OrderLabel, ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, single_input};
use crate::nn::shape::{Dim, ShapeDescriptor};
use crate::nn::validation::{FieldError, FieldRule};
use serde::{Deserialize, Serialize};

/// Flatten 层
///
/// # 规则
/// - 须满足`flatten_start ≤ flatten_end < rank`
/// - 合并后的维度为范围内各维之积；范围内只要有符号维，结果就取第一个符号
/// - 合并后的维度沿用范围内第一维的标签字母
/// - `flatten_start == flatten_end`时形状不变
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Flatten {
    pub flatten_start: usize,
    pub flatten_end: usize,
}

impl Flatten {
    pub fn new(flatten_start: usize, flatten_end: usize) -> Self {
        Self {
            flatten_start,
            flatten_end,
        }
    }
}

impl TraitShapeRule for Flatten {
    fn kind(&self) -> LayerKind {
        LayerKind::Flatten
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("flatten_start", FieldRule::NonNegativeInt),
            ("flatten_end", FieldRule::NonNegativeInt),
        ]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        let (start, end, rank) = (self.flatten_start, self.flatten_end, meta.rank());
        if start > end || end >= rank {
            return Err(ShapeError::InvalidFlattenRange { start, end, rank });
        }

        let dims = meta.shape().dims();
        let merged = match dims[start..=end].iter().find(|dim| dim.is_symbolic()) {
            Some(symbol) => *symbol,
            None => dims[start..=end]
                .iter()
                .filter_map(Dim::as_fixed)
                .try_fold(1usize, |acc, len| acc.checked_mul(len))
                .map(Dim::Fixed)
                .ok_or(ShapeError::DimOverflow {
                    layer: self.kind().display_name(),
                    axis: start,
                })?,
        };
        let shape: ShapeDescriptor = dims[..start]
            .iter()
            .copied()
            .chain(std::iter::once(merged))
            .chain(dims[end + 1..].iter().copied())
            .collect();

        let letters = meta.order().letters();
        let order: OrderLabel = letters[..=start]
            .iter()
            .chain(&letters[end + 1..])
            .copied()
            .collect();
        Ok(TensorMeta::new(shape, order)?.into())
    }

    /// 结束维不能单独改到起始维之前
    fn check_field(&self, field: &str) -> Result<(), FieldError> {
        if field == "flatten_end" && self.flatten_end < self.flatten_start {
            return Err(FieldError::comparison(
                field,
                ComparisonOperator::GreaterOrEqual,
                self.flatten_start,
            ));
        }
        Ok(())
    }

    /// 起始维调大后，结束维跟着拉到不小于起始维
    fn normalize(&mut self) {
        self.flatten_end = self.flatten_end.max(self.flatten_start);
    }
}
