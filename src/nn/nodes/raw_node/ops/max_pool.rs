/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 1D/2D 最大池化的形状规则（PyTorch 风格）
 *
 * 与卷积共用滑窗公式，但通道维保持不变；
 * `ceil_mode`为真时对除法向上取整。填充不得超过核大小的一半。
 */

use super::conv::{Window, infer_spatial};
use crate::errors::{ComparisonOperator, ShapeError};
use crate::nn::layout::{ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, single_input};
use crate::nn::shape::Symbol;
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

const POOL_FIELDS: &[(&str, FieldRule)] = &[
    ("kernel_size", FieldRule::PositiveInt),
    ("stride", FieldRule::PositiveInt),
    ("padding", FieldRule::NonNegativeInt),
    ("dilation", FieldRule::PositiveInt),
    ("ceil_mode", FieldRule::Flag),
];

fn infer_pool(
    meta: &TensorMeta,
    layer: &'static str,
    spatial_symbols: &[Symbol],
    window: &Window,
) -> Result<ShapeSlot, ShapeError> {
    if let (Some(kernel), Some(padding)) = (window.kernel_size, window.padding) {
        if padding > kernel / 2 {
            return Err(ShapeError::ValueMustSatisfyComparison {
                value_name: "padding".to_string(),
                operator: ComparisonOperator::LessOrEqual,
                threshold: kernel / 2,
            });
        }
    }
    infer_spatial(meta, layer, spatial_symbols, None, window)
}

/// 1D 最大池化：输入至少 2 维 (..., C, L)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxPool1d {
    pub kernel_size: Option<usize>,
    pub stride: Option<usize>,
    pub padding: Option<usize>,
    pub dilation: Option<usize>,
    pub ceil_mode: bool,
}

impl Default for MaxPool1d {
    fn default() -> Self {
        Self {
            kernel_size: None,
            stride: Some(1),
            padding: Some(0),
            dilation: Some(1),
            ceil_mode: false,
        }
    }
}

impl MaxPool1d {
    pub fn new(kernel_size: usize, stride: usize) -> Self {
        Self {
            kernel_size: Some(kernel_size),
            stride: Some(stride),
            ..Self::default()
        }
    }

    fn window(&self) -> Window {
        Window {
            kernel_size: self.kernel_size,
            stride: self.stride,
            padding: self.padding,
            dilation: self.dilation,
            ceil_mode: self.ceil_mode,
        }
    }
}

impl TraitShapeRule for MaxPool1d {
    fn kind(&self) -> LayerKind {
        LayerKind::MaxPool1d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        POOL_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        infer_pool(
            meta,
            self.kind().display_name(),
            &[Symbol::Lout],
            &self.window(),
        )
    }
}

/// 2D 最大池化：输入至少 3 维 (..., C, H, W)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaxPool2d {
    pub kernel_size: Option<usize>,
    pub stride: Option<usize>,
    pub padding: Option<usize>,
    pub dilation: Option<usize>,
    pub ceil_mode: bool,
}

impl Default for MaxPool2d {
    fn default() -> Self {
        Self {
            kernel_size: None,
            stride: Some(1),
            padding: Some(0),
            dilation: Some(1),
            ceil_mode: false,
        }
    }
}

impl MaxPool2d {
    pub fn new(kernel_size: usize, stride: usize) -> Self {
        Self {
            kernel_size: Some(kernel_size),
            stride: Some(stride),
            ..Self::default()
        }
    }

    fn window(&self) -> Window {
        Window {
            kernel_size: self.kernel_size,
            stride: self.stride,
            padding: self.padding,
            dilation: self.dilation,
            ceil_mode: self.ceil_mode,
        }
    }
}

impl TraitShapeRule for MaxPool2d {
    fn kind(&self) -> LayerKind {
        LayerKind::MaxPool2d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        POOL_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        infer_pool(
            meta,
            self.kind().display_name(),
            &[Symbol::Hout, Symbol::Wout],
            &self.window(),
        )
    }
}
