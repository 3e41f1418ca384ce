/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 维度标签（OrderLabel）与带标签的形状（TensorMeta）
 *
 * 维度标签为每一维指定一个语义字母（如 "NCHW"），与形状逐位对齐，
 * permute/flatten 等规则依赖它判断“哪一维是哪一维”。
 */

use super::shape::ShapeDescriptor;
use crate::errors::ShapeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// 维度标签：每个字符对应形状中的一维
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLabel(String);

impl OrderLabel {
    pub fn new(label: &str) -> Self {
        Self(label.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 标签字符数（即对应的维数）
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn letters(&self) -> Vec<char> {
        self.0.chars().collect()
    }

    pub fn letter(&self, index: usize) -> Option<char> {
        self.0.chars().nth(index)
    }

    /// 两个标签是否由同一组字母（计重数）组成，即互为重排
    ///
    /// # 示例
    /// ```
    /// use shape_flow::nn::OrderLabel;
    ///
    /// assert!(OrderLabel::new("NCL").is_rearrangement_of(&OrderLabel::new("NLC")));
    /// assert!(!OrderLabel::new("NCL").is_rearrangement_of(&OrderLabel::new("NCHW")));
    /// ```
    pub fn is_rearrangement_of(&self, other: &OrderLabel) -> bool {
        let mut a = self.letters();
        let mut b = other.letters();
        a.sort_unstable();
        b.sort_unstable();
        a == b
    }
}

impl fmt::Display for OrderLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OrderLabel {
    fn from(label: &str) -> Self {
        Self::new(label)
    }
}

impl FromIterator<char> for OrderLabel {
    fn from_iter<I: IntoIterator<Item = char>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 带维度标签的形状，构造时保证两者长度一致
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct TensorMeta {
    shape: ShapeDescriptor,
    order: OrderLabel,
}

impl TensorMeta {
    pub fn new(shape: ShapeDescriptor, order: OrderLabel) -> Result<Self, ShapeError> {
        if shape.ndim() != order.len() {
            return Err(ShapeError::InconsistentOrder {
                shape_len: shape.ndim(),
                order_len: order.len(),
            });
        }
        Ok(Self { shape, order })
    }

    pub fn shape(&self) -> &ShapeDescriptor {
        &self.shape
    }

    pub fn order(&self) -> &OrderLabel {
        &self.order
    }

    pub fn rank(&self) -> usize {
        self.shape.ndim()
    }

    /// 保持维度标签不变，仅替换形状（维数须不变）
    pub fn with_shape(&self, shape: ShapeDescriptor) -> Result<Self, ShapeError> {
        Self::new(shape, self.order.clone())
    }
}

/// 输入端口或输出端的形状槽位：要么未连接，要么持有带标签的形状
///
/// “未连接”不是空张量，而是“尚无定义”；消费它的规则也必须输出未连接。
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub enum ShapeSlot {
    #[default]
    NotConnected,
    Shaped(TensorMeta),
}

impl ShapeSlot {
    pub const fn is_connected(&self) -> bool {
        matches!(self, Self::Shaped(_))
    }

    pub const fn meta(&self) -> Option<&TensorMeta> {
        match self {
            Self::Shaped(meta) => Some(meta),
            Self::NotConnected => None,
        }
    }

    pub fn shape(&self) -> Option<&ShapeDescriptor> {
        self.meta().map(TensorMeta::shape)
    }

    pub fn order(&self) -> Option<&OrderLabel> {
        self.meta().map(TensorMeta::order)
    }

    pub fn state(&self) -> ResolveState {
        match self {
            Self::NotConnected => ResolveState::NotConnected,
            Self::Shaped(meta) if meta.shape().has_symbolic_dims() => ResolveState::Partial,
            Self::Shaped(_) => ResolveState::Resolved,
        }
    }
}

impl fmt::Display for ShapeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => f.write_str("Not Connected"),
            Self::Shaped(meta) => write!(f, "{}", meta.shape()),
        }
    }
}

impl From<TensorMeta> for ShapeSlot {
    fn from(meta: TensorMeta) -> Self {
        Self::Shaped(meta)
    }
}

/// 节点的形状解析状态（由传播结果派生，不单独存储）
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolveState {
    /// 没有有效输入
    NotConnected,
    /// 部分维度仍是符号占位
    Partial,
    /// 形状全部为确定数值
    Resolved,
}
