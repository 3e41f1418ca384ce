/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 归一化层（BatchNorm1D/2D、LayerNorm），形状原样透传
 */

use crate::errors::ShapeError;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, identity, single_input};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

const BATCH_NORM_FIELDS: &[(&str, FieldRule)] = &[
    ("eps", FieldRule::PositiveReal),
    ("momentum", FieldRule::Probability),
    ("affine", FieldRule::Flag),
    ("track_running_stats", FieldRule::Flag),
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchNorm1d {
    pub eps: Option<f64>,
    pub momentum: Option<f64>,
    pub affine: bool,
    pub track_running_stats: bool,
}

impl Default for BatchNorm1d {
    fn default() -> Self {
        Self {
            eps: Some(1e-5),
            momentum: Some(0.1),
            affine: true,
            track_running_stats: true,
        }
    }
}

impl TraitShapeRule for BatchNorm1d {
    fn kind(&self) -> LayerKind {
        LayerKind::BatchNorm1d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        BATCH_NORM_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchNorm2d {
    pub eps: Option<f64>,
    pub momentum: Option<f64>,
    pub affine: bool,
    pub track_running_stats: bool,
}

impl Default for BatchNorm2d {
    fn default() -> Self {
        Self {
            eps: Some(1e-5),
            momentum: Some(0.1),
            affine: true,
            track_running_stats: true,
        }
    }
}

impl TraitShapeRule for BatchNorm2d {
    fn kind(&self) -> LayerKind {
        LayerKind::BatchNorm2d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        BATCH_NORM_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}

/// 对`normalized_from`及之后的所有维做归一化
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayerNorm {
    pub normalized_from: usize,
    pub eps: Option<f64>,
    pub elementwise_affine: bool,
    pub bias: bool,
}

impl Default for LayerNorm {
    fn default() -> Self {
        Self {
            normalized_from: 0,
            eps: Some(1e-5),
            elementwise_affine: true,
            bias: true,
        }
    }
}

impl TraitShapeRule for LayerNorm {
    fn kind(&self) -> LayerKind {
        LayerKind::LayerNorm
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("normalized_from", FieldRule::NonNegativeInt),
            ("eps", FieldRule::PositiveReal),
            ("elementwise_affine", FieldRule::Flag),
            ("bias", FieldRule::Flag),
        ]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        if let Some(meta) = single_input(inputs) {
            if meta.rank() > 0 && self.normalized_from >= meta.rank() {
                return Err(ShapeError::AxisOutOfRange {
                    layer: self.kind().display_name(),
                    axis: self.normalized_from,
                    rank: meta.rank(),
                });
            }
        }
        Ok(identity(inputs))
    }
}
