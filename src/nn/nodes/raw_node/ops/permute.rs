/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 维度重排层
 *
 * 参数保存的是“目标维度标签”（如输入 "NCL" 时的 "NLC"），而不是下标排列：
 * 上游换了一个字母相同的输入后，重排意图仍按字母对应保持不变。
 * 目标标签未设置、或不是当前输入标签的重排时，退化为恒等排列。
 */

use crate::errors::ShapeError;
use crate::nn::layout::{OrderLabel, ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, single_input};
use crate::nn::shape::ShapeDescriptor;
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Permute {
    pub order: Option<String>,
}

impl Permute {
    pub fn new(order: &str) -> Self {
        Self {
            order: Some(order.to_string()),
        }
    }

    /// 对给定输入实际生效的排列（退化时为恒等排列）
    pub fn effective_permutation(&self, input: &TensorMeta) -> Vec<usize> {
        self.order
            .as_deref()
            .and_then(|order| resolve_permutation(input.order(), &OrderLabel::new(order)))
            .unwrap_or_else(|| (0..input.rank()).collect())
    }
}

impl TraitShapeRule for Permute {
    fn kind(&self) -> LayerKind {
        LayerKind::Permute
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[("order", FieldRule::Text)]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        Ok(permute_meta(meta, &self.effective_permutation(meta))?.into())
    }
}

/// 按字母把目标标签映射为输入维度的下标排列，重复字母按出现次序一一对应
///
/// # 示例
/// ```
/// use shape_flow::nn::{OrderLabel, resolve_permutation};
///
/// let perm = resolve_permutation(&OrderLabel::new("NCL"), &OrderLabel::new("NLC"));
/// assert_eq!(perm, Some(vec![0, 2, 1]));
/// assert_eq!(resolve_permutation(&OrderLabel::new("NCL"), &OrderLabel::new("NCHW")), None);
/// ```
pub fn resolve_permutation(input: &OrderLabel, target: &OrderLabel) -> Option<Vec<usize>> {
    if !target.is_rearrangement_of(input) {
        return None;
    }
    let letters = input.letters();
    let mut used = vec![false; letters.len()];
    target
        .letters()
        .into_iter()
        .map(|letter| {
            let index = (0..letters.len()).find(|&i| !used[i] && letters[i] == letter)?;
            used[index] = true;
            Some(index)
        })
        .collect()
}

/// 按下标排列重排形状与标签：输出第`i`维取输入第`perm[i]`维
pub fn permute_meta(meta: &TensorMeta, perm: &[usize]) -> Result<TensorMeta, ShapeError> {
    let rank = meta.rank();
    let mut seen = vec![false; rank];
    for &axis in perm {
        if axis >= rank || seen[axis] {
            return Err(ShapeError::InvalidPermutation { rank });
        }
        seen[axis] = true;
    }
    if perm.len() != rank {
        return Err(ShapeError::InvalidPermutation { rank });
    }

    let letters = meta.order().letters();
    let shape: ShapeDescriptor = perm
        .iter()
        .filter_map(|&axis| meta.shape().dim(axis))
        .collect();
    let order: OrderLabel = perm.iter().map(|&axis| letters[axis]).collect();
    TensorMeta::new(shape, order)
}

/// 逆排列：`inverse[perm[i]] = i`
pub fn inverse_permutation(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0; perm.len()];
    for (i, &axis) in perm.iter().enumerate() {
        if let Some(slot) = inverse.get_mut(axis) {
            *slot = i;
        }
    }
    inverse
}
