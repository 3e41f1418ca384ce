/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 中间层的形状规则（激活、全连接、卷积、池化、归一化、dropout、循环、拼接、重排、展平）
 */

mod activation;
mod concat;
mod conv;
mod dropout;
mod flatten;
mod linear;
mod max_pool;
mod norm;
mod permute;
mod recurrent;

pub use activation::{Relu, Sigmoid, Tanh};
pub use concat::Concat;
pub use conv::{Conv1d, Conv2d};
pub use dropout::{Dropout, Dropout1d, Dropout2d};
pub use flatten::Flatten;
pub use linear::Linear;
pub use max_pool::{MaxPool1d, MaxPool2d};
pub use norm::{BatchNorm1d, BatchNorm2d, LayerNorm};
pub use permute::{Permute, inverse_permutation, permute_meta, resolve_permutation};
pub use recurrent::{Gru, Lstm};
