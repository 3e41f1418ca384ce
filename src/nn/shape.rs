/*
 * ShapeDescriptor: 支持符号维度的形状系统
 *
 * 与 Keras 的 (None, 128) 类似，但这里未确定的维度不是统一的 None，
 * 而是带语义的符号占位（N=batch，C=通道，H/W=空间，L=序列长度，
 * Hout/Cout/Lout/Wout=尚未确定的派生尺寸），以便界面上直接显示 "(N, 3, L)"。
 *
 * # 示例
 * ```
 * use shape_flow::nn::{Dim, ShapeDescriptor, Symbol};
 *
 * // 固定形状
 * let fixed = ShapeDescriptor::fixed(&[32, 16, 26, 26]);
 * assert_eq!(fixed.to_string(), "(32, 16, 26, 26)");
 *
 * // 含符号维度
 * let partial = ShapeDescriptor::new(&[Dim::Symbol(Symbol::N), Dim::Fixed(3), Dim::Symbol(Symbol::L)]);
 * assert_eq!(partial.to_string(), "(N, 3, L)");
 * ```
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// 符号占位：尚未确定具体数值的维度
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Symbol {
    /// batch
    N,
    /// 通道/特征数
    C,
    /// 高
    H,
    /// 宽
    W,
    /// 序列长度
    L,
    /// 派生的隐藏/输出特征数（或 2D 空间规则的输出高）
    Hout,
    /// 派生的输出通道数
    Cout,
    /// 派生的输出长度
    Lout,
    /// 派生的输出宽
    Wout,
}

impl Symbol {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::C => "C",
            Self::H => "H",
            Self::W => "W",
            Self::L => "L",
            Self::Hout => "Hout",
            Self::Cout => "Cout",
            Self::Lout => "Lout",
            Self::Wout => "Wout",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 维度值：`Fixed(n)` 表示确定的正整数，`Symbol(s)` 表示符号占位
///
/// 序列化为 JSON 时，固定维度是数字，符号维度是字符串，如 `[32, "C", 28, 28]`。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Dim {
    Fixed(usize),
    Symbol(Symbol),
}

impl Dim {
    /// `Some(n)`表示确定值；为`None`则说明是符号维度
    pub const fn as_fixed(&self) -> Option<usize> {
        match self {
            Self::Fixed(n) => Some(*n),
            Self::Symbol(_) => None,
        }
    }

    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Fixed(_))
    }

    pub const fn is_symbolic(&self) -> bool {
        matches!(self, Self::Symbol(_))
    }

    /// 参数已设置则为确定维度，否则退化为给定的符号
    pub fn or_symbol(value: Option<usize>, symbol: Symbol) -> Self {
        value.map_or(Self::Symbol(symbol), Self::Fixed)
    }
}

impl fmt::Display for Dim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(n) => write!(f, "{n}"),
            Self::Symbol(s) => write!(f, "{s}"),
        }
    }
}

impl From<usize> for Dim {
    fn from(n: usize) -> Self {
        Self::Fixed(n)
    }
}

impl From<Symbol> for Dim {
    fn from(s: Symbol) -> Self {
        Self::Symbol(s)
    }
}

/// 形状描述：有序的维度列表，每个维度是确定值或符号占位
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeDescriptor {
    dims: Vec<Dim>,
}

impl ShapeDescriptor {
    /// 创建一个形状
    ///
    /// # 示例
    /// ```
    /// use shape_flow::nn::{Dim, ShapeDescriptor, Symbol};
    ///
    /// let shape = ShapeDescriptor::new(&[Dim::Symbol(Symbol::N), Dim::Fixed(128)]);
    /// assert_eq!(shape.ndim(), 2);
    /// assert!(shape.is_symbolic(0));
    /// assert!(!shape.is_symbolic(1));
    /// ```
    pub fn new(dims: &[Dim]) -> Self {
        Self {
            dims: dims.to_vec(),
        }
    }

    /// 从全部确定的维度创建
    pub fn fixed(dims: &[usize]) -> Self {
        Self {
            dims: dims.iter().map(|&d| Dim::Fixed(d)).collect(),
        }
    }

    /// 获取维度数量
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    /// 获取指定维度（越界返回 None）
    pub fn dim(&self, index: usize) -> Option<Dim> {
        self.dims.get(index).copied()
    }

    /// 检查指定维度是否是符号维度
    pub fn is_symbolic(&self, index: usize) -> bool {
        self.dims.get(index).is_some_and(Dim::is_symbolic)
    }

    /// 检查是否有任何符号维度
    pub fn has_symbolic_dims(&self) -> bool {
        self.dims.iter().any(Dim::is_symbolic)
    }

    /// 转换为固定形状向量（如果所有维度都是确定的）
    ///
    /// # 示例
    /// ```
    /// use shape_flow::nn::ShapeDescriptor;
    ///
    /// let shape = ShapeDescriptor::fixed(&[32, 128, 64]);
    /// assert_eq!(shape.to_vec_fixed(), Some(vec![32, 128, 64]));
    /// ```
    pub fn to_vec_fixed(&self) -> Option<Vec<usize>> {
        self.dims.iter().map(Dim::as_fixed).collect()
    }

    /// 获取内部维度数组的引用
    pub fn dims(&self) -> &[Dim] {
        &self.dims
    }

    /// 返回替换了第`index`维之后的新形状（越界时原样返回）
    pub fn with_dim(&self, index: usize, dim: Dim) -> Self {
        let mut dims = self.dims.clone();
        if let Some(slot) = dims.get_mut(index) {
            *slot = dim;
        }
        Self { dims }
    }

    /// 转换为用于显示的字符串，如 `(32, C, 28, 28)`
    pub fn to_display_string(&self) -> String {
        let parts: Vec<String> = self.dims.iter().map(Dim::to_string).collect();
        format!("({})", parts.join(", "))
    }
}

impl fmt::Display for ShapeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_display_string())
    }
}

impl From<&[usize]> for ShapeDescriptor {
    fn from(shape: &[usize]) -> Self {
        ShapeDescriptor::fixed(shape)
    }
}

impl From<Vec<Dim>> for ShapeDescriptor {
    fn from(dims: Vec<Dim>) -> Self {
        Self { dims }
    }
}

impl FromIterator<Dim> for ShapeDescriptor {
    fn from_iter<I: IntoIterator<Item = Dim>>(iter: I) -> Self {
        Self {
            dims: iter.into_iter().collect(),
        }
    }
}
