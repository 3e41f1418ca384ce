/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : 1D/2D 卷积的形状规则，以及与池化共用的滑窗尺寸公式
 *
 * 输入按 PyTorch 的通道在前约定：最后 1 维（1D）或 2 维（2D）是空间维，
 * 紧挨在它们前面的一维是通道维，更前面的维度（batch 等）原样保留。
 *
 * 每个空间维：L_out = floor((L + 2p − d(k−1) − 1) / s + 1)
 */

use crate::errors::{ComparisonOperator, ShapeError};
use crate::nn::layout::{ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, single_input};
use crate::nn::shape::{Dim, Symbol};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

/// 滑窗参数（卷积与池化共用）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Window {
    pub kernel_size: Option<usize>,
    pub stride: Option<usize>,
    pub padding: Option<usize>,
    pub dilation: Option<usize>,
    pub ceil_mode: bool,
}

impl Window {
    fn check(&self) -> Result<(), ShapeError> {
        for (name, value) in [
            ("kernel_size", self.kernel_size),
            ("stride", self.stride),
            ("dilation", self.dilation),
        ] {
            if value == Some(0) {
                return Err(ShapeError::ValueMustSatisfyComparison {
                    value_name: name.to_string(),
                    operator: ComparisonOperator::GreaterThan,
                    threshold: 0,
                });
            }
        }
        Ok(())
    }

    /// 某个空间维上的输出尺寸；有参数未设置时返回`Ok(None)`（由调用方退化为符号）
    pub(crate) fn output_len(
        &self,
        input: usize,
        layer: &'static str,
        axis: usize,
    ) -> Result<Option<usize>, ShapeError> {
        let (Some(kernel), Some(stride), Some(padding), Some(dilation)) =
            (self.kernel_size, self.stride, self.padding, self.dilation)
        else {
            return Ok(None);
        };

        let non_positive = ShapeError::NonPositiveOutput { layer, axis, input };
        let overflow = ShapeError::DimOverflow { layer, axis };
        let padded = padding
            .checked_mul(2)
            .and_then(|both| both.checked_add(input))
            .ok_or(overflow.clone())?;
        let reach = dilation
            .checked_mul(kernel - 1)
            .and_then(|extent| extent.checked_add(1))
            .ok_or(overflow.clone())?;
        if padded < reach {
            return Err(non_positive);
        }
        let span = padded - reach;

        let mut len = if self.ceil_mode {
            span.div_ceil(stride) + 1
        } else {
            span / stride + 1
        };
        // ceil 模式下，最后一个窗口不能从右侧填充区开始
        if self.ceil_mode {
            let last_start = (len - 1).checked_mul(stride).ok_or(overflow)?;
            if last_start >= input + padding {
                len -= 1;
            }
        }
        if len == 0 {
            return Err(non_positive);
        }
        Ok(Some(len))
    }
}

/// 通道在前的滑窗规则
///
/// - `spatial_symbols`：各空间维无法确定时的符号，其长度即空间维数
/// - `channels`：卷积传入新的通道维，池化传`None`保持通道不变
pub(crate) fn infer_spatial(
    meta: &TensorMeta,
    layer: &'static str,
    spatial_symbols: &[Symbol],
    channels: Option<Dim>,
    window: &Window,
) -> Result<ShapeSlot, ShapeError> {
    let rank = meta.rank();
    let spatial = spatial_symbols.len();
    if rank < spatial + 1 {
        return Err(ShapeError::RankTooSmall {
            layer,
            min: spatial + 1,
            got: rank,
        });
    }
    window.check()?;

    let first_spatial = rank - spatial;
    let mut shape = meta.shape().clone();
    if let Some(channels) = channels {
        shape = shape.with_dim(first_spatial - 1, channels);
    }
    for (offset, symbol) in spatial_symbols.iter().enumerate() {
        let axis = first_spatial + offset;
        let len = match meta.shape().dim(axis).and_then(|dim| dim.as_fixed()) {
            Some(input) => window.output_len(input, layer, axis)?,
            None => None,
        };
        shape = shape.with_dim(axis, len.map_or(Dim::Symbol(*symbol), Dim::Fixed));
    }
    Ok(meta.with_shape(shape)?.into())
}

const CONV_FIELDS: &[(&str, FieldRule)] = &[
    ("num_filters", FieldRule::PositiveInt),
    ("kernel_size", FieldRule::PositiveInt),
    ("stride", FieldRule::PositiveInt),
    ("padding", FieldRule::NonNegativeInt),
    ("dilation", FieldRule::PositiveInt),
    ("bias", FieldRule::Flag),
];

/// 1D 卷积：输入至少 2 维 (..., C, L)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conv1d {
    pub num_filters: Option<usize>,
    pub kernel_size: Option<usize>,
    pub stride: Option<usize>,
    pub padding: Option<usize>,
    pub dilation: Option<usize>,
    pub bias: bool,
}

impl Default for Conv1d {
    fn default() -> Self {
        Self {
            num_filters: None,
            kernel_size: None,
            stride: Some(1),
            padding: Some(0),
            dilation: Some(1),
            bias: true,
        }
    }
}

impl Conv1d {
    pub fn new(num_filters: usize, kernel_size: usize) -> Self {
        Self {
            num_filters: Some(num_filters),
            kernel_size: Some(kernel_size),
            ..Self::default()
        }
    }

    fn window(&self) -> Window {
        Window {
            kernel_size: self.kernel_size,
            stride: self.stride,
            padding: self.padding,
            dilation: self.dilation,
            ceil_mode: false,
        }
    }
}

impl TraitShapeRule for Conv1d {
    fn kind(&self) -> LayerKind {
        LayerKind::Conv1d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        CONV_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        infer_spatial(
            meta,
            self.kind().display_name(),
            &[Symbol::Lout],
            Some(Dim::or_symbol(self.num_filters, Symbol::Cout)),
            &self.window(),
        )
    }
}

/// 2D 卷积：输入至少 3 维 (..., C, H, W)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Conv2d {
    pub num_filters: Option<usize>,
    pub kernel_size: Option<usize>,
    pub stride: Option<usize>,
    pub padding: Option<usize>,
    pub dilation: Option<usize>,
    pub bias: bool,
}

impl Default for Conv2d {
    fn default() -> Self {
        Self {
            num_filters: None,
            kernel_size: None,
            stride: Some(1),
            padding: Some(0),
            dilation: Some(1),
            bias: true,
        }
    }
}

impl Conv2d {
    pub fn new(num_filters: usize, kernel_size: usize) -> Self {
        Self {
            num_filters: Some(num_filters),
            kernel_size: Some(kernel_size),
            ..Self::default()
        }
    }

    fn window(&self) -> Window {
        Window {
            kernel_size: self.kernel_size,
            stride: self.stride,
            padding: self.padding,
            dilation: self.dilation,
            ceil_mode: false,
        }
    }
}

impl TraitShapeRule for Conv2d {
    fn kind(&self) -> LayerKind {
        LayerKind::Conv2d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        CONV_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let Some(meta) = single_input(inputs) else {
            return Ok(ShapeSlot::NotConnected);
        };
        infer_spatial(
            meta,
            self.kind().display_name(),
            &[Symbol::Hout, Symbol::Wout],
            Some(Dim::or_symbol(self.num_filters, Symbol::Cout)),
            &self.window(),
        )
    }
}
