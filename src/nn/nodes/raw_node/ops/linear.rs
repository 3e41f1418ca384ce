/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 全连接层：只改变最后一维
 */

use crate::errors::ShapeError;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, single_input};
use crate::nn::shape::{Dim, Symbol};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

/// 输入 (..., in_features) → 输出 (..., num_neurons)；未设置神经元数时最后一维为`Hout`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Linear {
    pub num_neurons: Option<usize>,
    pub bias: bool,
}

impl Default for Linear {
    fn default() -> Self {
        Self {
            num_neurons: None,
            bias: true,
        }
    }
}

impl Linear {
    pub fn new(num_neurons: usize) -> Self {
        Self {
            num_neurons: Some(num_neurons),
            ..Self::default()
        }
    }
}

impl TraitShapeRule for Linear {
    fn kind(&self) -> LayerKind {
        LayerKind::Linear
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("num_neurons", FieldRule::PositiveInt),
            ("bias", FieldRule::Flag),
        ]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        let rank = meta.rank();
        if rank == 0 {
            return Err(ShapeError::RankTooSmall {
                layer: self.kind().display_name(),
                min: 1,
                got: 0,
            });
        }
        let shape = meta
            .shape()
            .with_dim(rank - 1, Dim::or_symbol(self.num_neurons, Symbol::Hout));
        Ok(meta.with_shape(shape)?.into())
    }
}
