/*
 * @Author       : 老董
 * @Date         : 2024-01-31 20:23:53
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-08
 * @Description  : 负责神经网络（neural network）图的搭建与形状推导
 */

mod config;
mod debounce;
mod descriptor;
mod display;
mod graph;
mod layout;
mod nodes;
mod shape;
mod validation;

pub use config::GraphConfig;
pub use debounce::Debouncer;
pub use descriptor::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
pub(in crate::nn) use display::format_node_display;
pub use graph::{
    AxisMove, Edge, EdgeId, EdgeView, FieldCommit, Graph, GraphError, GraphInner, InputPort,
    NodeView, ParamUpdate, PropagationReport,
};
pub use layout::{OrderLabel, ResolveState, ShapeSlot, TensorMeta};
pub use nodes::{
    BatchNorm1d, BatchNorm2d, ClassificationOutput, ColorMode, Concat, Conv1d, Conv2d, Dropout,
    Dropout1d, Dropout2d, Flatten, Gru, ImageInput, LayerKind, LayerNorm, LayerParams, Linear,
    Lstm, MaxPool1d, MaxPool2d, NodeHandle, NodeId, Permute, RegressionOutput, Relu, Sigmoid,
    TabularInput, Tanh, TimeseriesInput, TraitShapeRule, inverse_permutation, permute_meta,
    resolve_permutation,
};
pub use shape::{Dim, ShapeDescriptor, Symbol};
pub use validation::{FieldError, FieldRule, parse_raw_field};

#[cfg(test)]
mod tests;
