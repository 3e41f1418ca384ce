/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 层种类的封闭集合与各自的形状规则
 *
 * 每种层都是一个参数结构体，实现`TraitShapeRule`；`LayerParams`把它们收拢成一个
 * 封闭枚举，用`enum_dispatch`静态分发，图的其它部分只和`LayerParams`打交道。
 * 序列化时以`kind`字段区分种类，如`{"kind":"conv2d","num_filters":16,...}`。
 */

mod input;
mod ops;
mod output;

pub use input::*;
pub use ops::*;
pub use output::*;

use crate::errors::ShapeError;
use crate::nn::layout::{ShapeSlot, TensorMeta};
use crate::nn::validation::{FieldError, FieldRule};
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::fmt;

#[enum_dispatch]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LayerParams {
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓输入层↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    TabularInput(TabularInput),
    TimeseriesInput(TimeseriesInput),
    ImageInput(ImageInput),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑输入层↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓中间层↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    Relu(Relu),
    Sigmoid(Sigmoid),
    Tanh(Tanh),
    Linear(Linear),
    Conv1d(Conv1d),
    Conv2d(Conv2d),
    MaxPool1d(MaxPool1d),
    MaxPool2d(MaxPool2d),
    BatchNorm1d(BatchNorm1d),
    BatchNorm2d(BatchNorm2d),
    LayerNorm(LayerNorm),
    Dropout(Dropout),
    Dropout1d(Dropout1d),
    Dropout2d(Dropout2d),
    Lstm(Lstm),
    Gru(Gru),
    Concat(Concat),
    Permute(Permute),
    Flatten(Flatten),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑中间层↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
    /*↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓输出层↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓↓*/
    RegressionOutput(RegressionOutput),
    ClassificationOutput(ClassificationOutput),
    /*↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑输出层↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑↑*/
}

#[enum_dispatch(LayerParams)]
pub trait TraitShapeRule {
    fn kind(&self) -> LayerKind;

    /// 输入端口数：输入层为0，拼接为2，其余为1
    fn arity(&self) -> usize {
        1
    }

    /// 是否有可供下游连接的输出（终端输出层没有）
    fn has_output(&self) -> bool {
        true
    }

    /// 可编辑字段及其取值规则，字段名与序列化后的键一致
    fn field_rules(&self) -> &'static [(&'static str, FieldRule)];

    /// 根据输入槽位推导输出槽位（纯函数）
    ///
    /// 返回`Ok(ShapeSlot::NotConnected)`表示“尚未连通”，返回`Err`表示结构上无法成立。
    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError>;

    /// 单个字段提交前与其它字段的联合检查，`field`为本次修改的字段，默认总是通过
    fn check_field(&self, _field: &str) -> Result<(), FieldError> {
        Ok(())
    }

    /// 参数提交后的规整（如展平范围的首尾联动），默认什么都不做
    fn normalize(&mut self) {}
}

/// 层种类（不带参数），用于从调色板拖出默认节点、显示和快照
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerKind {
    TabularInput,
    TimeseriesInput,
    ImageInput,
    Relu,
    Sigmoid,
    Tanh,
    Linear,
    Conv1d,
    Conv2d,
    MaxPool1d,
    MaxPool2d,
    BatchNorm1d,
    BatchNorm2d,
    LayerNorm,
    Dropout,
    Dropout1d,
    Dropout2d,
    Lstm,
    Gru,
    Concat,
    Permute,
    Flatten,
    RegressionOutput,
    ClassificationOutput,
}

impl LayerKind {
    pub const ALL: [LayerKind; 24] = [
        Self::TabularInput,
        Self::TimeseriesInput,
        Self::ImageInput,
        Self::Relu,
        Self::Sigmoid,
        Self::Tanh,
        Self::Linear,
        Self::Conv1d,
        Self::Conv2d,
        Self::MaxPool1d,
        Self::MaxPool2d,
        Self::BatchNorm1d,
        Self::BatchNorm2d,
        Self::LayerNorm,
        Self::Dropout,
        Self::Dropout1d,
        Self::Dropout2d,
        Self::Lstm,
        Self::Gru,
        Self::Concat,
        Self::Permute,
        Self::Flatten,
        Self::RegressionOutput,
        Self::ClassificationOutput,
    ];

    /// 界面上显示的层名
    pub const fn display_name(&self) -> &'static str {
        match self {
            Self::TabularInput => "TabularInput",
            Self::TimeseriesInput => "TimeseriesInput",
            Self::ImageInput => "ImageInput",
            Self::Relu => "ReLU",
            Self::Sigmoid => "Sigmoid",
            Self::Tanh => "Tanh",
            Self::Linear => "Linear",
            Self::Conv1d => "Conv1D",
            Self::Conv2d => "Conv2D",
            Self::MaxPool1d => "MaxPool1D",
            Self::MaxPool2d => "MaxPool2D",
            Self::BatchNorm1d => "BatchNorm1D",
            Self::BatchNorm2d => "BatchNorm2D",
            Self::LayerNorm => "LayerNorm",
            Self::Dropout => "Dropout",
            Self::Dropout1d => "Dropout1D",
            Self::Dropout2d => "Dropout2D",
            Self::Lstm => "LSTM",
            Self::Gru => "GRU",
            Self::Concat => "Concatenate",
            Self::Permute => "Permute",
            Self::Flatten => "Flatten",
            Self::RegressionOutput => "RegressionOutput",
            Self::ClassificationOutput => "ClassificationOutput",
        }
    }

    pub const fn is_input(&self) -> bool {
        matches!(
            self,
            Self::TabularInput | Self::TimeseriesInput | Self::ImageInput
        )
    }

    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::RegressionOutput | Self::ClassificationOutput)
    }

    /// 该种类的默认参数（即刚从调色板拖到画布上的节点）
    pub fn default_params(self) -> LayerParams {
        match self {
            Self::TabularInput => TabularInput::default().into(),
            Self::TimeseriesInput => TimeseriesInput::default().into(),
            Self::ImageInput => ImageInput::default().into(),
            Self::Relu => Relu::default().into(),
            Self::Sigmoid => Sigmoid::default().into(),
            Self::Tanh => Tanh::default().into(),
            Self::Linear => Linear::default().into(),
            Self::Conv1d => Conv1d::default().into(),
            Self::Conv2d => Conv2d::default().into(),
            Self::MaxPool1d => MaxPool1d::default().into(),
            Self::MaxPool2d => MaxPool2d::default().into(),
            Self::BatchNorm1d => BatchNorm1d::default().into(),
            Self::BatchNorm2d => BatchNorm2d::default().into(),
            Self::LayerNorm => LayerNorm::default().into(),
            Self::Dropout => Dropout::default().into(),
            Self::Dropout1d => Dropout1d::default().into(),
            Self::Dropout2d => Dropout2d::default().into(),
            Self::Lstm => Lstm::default().into(),
            Self::Gru => Gru::default().into(),
            Self::Concat => Concat::default().into(),
            Self::Permute => Permute::default().into(),
            Self::Flatten => Flatten::default().into(),
            Self::RegressionOutput => RegressionOutput::default().into(),
            Self::ClassificationOutput => ClassificationOutput::default().into(),
        }
    }
}

impl fmt::Display for LayerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl From<LayerKind> for LayerParams {
    fn from(kind: LayerKind) -> Self {
        kind.default_params()
    }
}

/// 单输入规则共用：取第一个输入端口上的形状，未连接时为`None`
pub(crate) fn single_input(inputs: &[ShapeSlot]) -> Option<&TensorMeta> {
    inputs.first().and_then(ShapeSlot::meta)
}

/// 恒等规则：输出与输入完全相同（含维度标签）
pub(crate) fn identity(inputs: &[ShapeSlot]) -> ShapeSlot {
    single_input(inputs).map_or(ShapeSlot::NotConnected, |meta| {
        ShapeSlot::Shaped(meta.clone())
    })
}
