mod node_handle;
pub(crate) mod raw_node;

pub use node_handle::{NodeHandle, NodeId};
pub use raw_node::{
    BatchNorm1d, BatchNorm2d, ClassificationOutput, ColorMode, Concat, Conv1d, Conv2d, Dropout,
    Dropout1d, Dropout2d, Flatten, Gru, ImageInput, LayerKind, LayerNorm, LayerParams, Linear,
    Lstm, MaxPool1d, MaxPool2d, Permute, RegressionOutput, Relu, Sigmoid, TabularInput, Tanh,
    TimeseriesInput, TraitShapeRule, inverse_permutation, permute_meta, resolve_permutation,
};
