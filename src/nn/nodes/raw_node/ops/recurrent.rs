/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 循环层（LSTM/GRU）的形状规则
 *
 * 输入须为 3 维 (batch, seq_len, features)，输出只替换最后的特征维：
 * - LSTM 若`proj_size > 0`则为`proj_size`（不乘方向数）
 * - 否则为`hidden_size × (双向 ? 2 : 1)`
 * - `hidden_size`未设置时为`Hout`
 */

use crate::errors::{ComparisonOperator, ShapeError};
use crate::nn::layout::{ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, single_input};
use crate::nn::shape::{Dim, Symbol};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

const SEQUENCE_RANK: usize = 3;

fn replace_features(
    meta: &TensorMeta,
    layer: &'static str,
    features: Dim,
) -> Result<ShapeSlot, ShapeError> {
    if meta.rank() != SEQUENCE_RANK {
        return Err(ShapeError::RankMismatch {
            layer,
            expected: SEQUENCE_RANK,
            got: meta.rank(),
        });
    }
    let shape = meta.shape().with_dim(SEQUENCE_RANK - 1, features);
    Ok(meta.with_shape(shape)?.into())
}

fn directional(
    layer: &'static str,
    hidden_size: Option<usize>,
    bidirectional: bool,
) -> Result<Dim, ShapeError> {
    let directions = if bidirectional { 2 } else { 1 };
    let Some(hidden) = hidden_size else {
        return Ok(Dim::Symbol(Symbol::Hout));
    };
    hidden
        .checked_mul(directions)
        .map(Dim::Fixed)
        .ok_or(ShapeError::DimOverflow {
            layer,
            axis: SEQUENCE_RANK - 1,
        })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lstm {
    pub hidden_size: Option<usize>,
    pub num_layers: Option<usize>,
    pub dropout: Option<f64>,
    pub proj_size: Option<usize>,
    pub bidirectional: bool,
}

impl Default for Lstm {
    fn default() -> Self {
        Self {
            hidden_size: None,
            num_layers: Some(1),
            dropout: Some(0.0),
            proj_size: Some(0),
            bidirectional: false,
        }
    }
}

impl Lstm {
    pub fn new(hidden_size: usize) -> Self {
        Self {
            hidden_size: Some(hidden_size),
            ..Self::default()
        }
    }
}

impl TraitShapeRule for Lstm {
    fn kind(&self) -> LayerKind {
        LayerKind::Lstm
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("hidden_size", FieldRule::PositiveInt),
            ("num_layers", FieldRule::PositiveInt),
            ("dropout", FieldRule::Probability),
            ("proj_size", FieldRule::NonNegativeInt),
            ("bidirectional", FieldRule::Flag),
        ]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        let features = match (self.proj_size, self.hidden_size) {
            (Some(proj), Some(hidden)) if proj > 0 && proj >= hidden => {
                return Err(ShapeError::ValueMustSatisfyComparison {
                    value_name: "proj_size".to_string(),
                    operator: ComparisonOperator::LessThan,
                    threshold: hidden,
                });
            }
            (Some(proj), _) if proj > 0 => Dim::Fixed(proj),
            _ => directional(
                self.kind().display_name(),
                self.hidden_size,
                self.bidirectional,
            )?,
        };
        replace_features(meta, self.kind().display_name(), features)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gru {
    pub hidden_size: Option<usize>,
    pub num_layers: Option<usize>,
    pub dropout: Option<f64>,
    pub bidirectional: bool,
}

impl Default for Gru {
    fn default() -> Self {
        Self {
            hidden_size: None,
            num_layers: Some(1),
            dropout: Some(0.0),
            bidirectional: false,
        }
    }
}

impl Gru {
    pub fn new(hidden_size: usize) -> Self {
        Self {
            hidden_size: Some(hidden_size),
            ..Self::default()
        }
    }
}

impl TraitShapeRule for Gru {
    fn kind(&self) -> LayerKind {
        LayerKind::Gru
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("hidden_size", FieldRule::PositiveInt),
            ("num_layers", FieldRule::PositiveInt),
            ("dropout", FieldRule::Probability),
            ("bidirectional", FieldRule::Flag),
        ]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        let layer = self.kind().display_name();
        let features = directional(layer, self.hidden_size, self.bidirectional)?;
        replace_features(meta, layer, features)
    }
}
