use thiserror::Error;
mod ops;
pub use self::ops::*;

/// 形状规则在结构上无法成立时的错误（如拼接维度不匹配）。
///
/// 该错误只作为数据挂在出错的节点上，节点输出随之变为“未连接”，
/// 再经由正常的传播流程级联到下游，而不会中断传播本身。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShapeError {
    // 数字比较用
    #[error("{value_name}须{operator}{threshold}")]
    ValueMustSatisfyComparison {
        value_name: String,
        operator: ComparisonOperator,
        threshold: usize,
    },
    #[error("形状与维度标签长度不一致：形状有{shape_len}维，标签有{order_len}个字符")]
    InconsistentOrder { shape_len: usize, order_len: usize },
    #[error("{layer}的输入至少需要{min}维，实际为{got}维")]
    RankTooSmall {
        layer: &'static str,
        min: usize,
        got: usize,
    },
    #[error("{layer}的输入须为{expected}维，实际为{got}维")]
    RankMismatch {
        layer: &'static str,
        expected: usize,
        got: usize,
    },
    #[error("拼接的两个输入维数不一致：第一个为{left}维，第二个为{right}维")]
    ConcatRankMismatch { left: usize, right: usize },
    #[error("拼接的两个输入在第{axis}维上大小不一致：{left} != {right}")]
    ConcatAxisMismatch {
        axis: usize,
        left: usize,
        right: usize,
    },
    #[error("{layer}的维度{axis}超出输入的维数范围[0, {rank})")]
    AxisOutOfRange {
        layer: &'static str,
        axis: usize,
        rank: usize,
    },
    #[error("展平范围[{start}, {end}]无效，输入只有{rank}维")]
    InvalidFlattenRange {
        start: usize,
        end: usize,
        rank: usize,
    },
    #[error("需要交换的维度必须是唯一且在[0, {rank})范围内")]
    InvalidPermutation { rank: usize },
    #[error("{layer}在第{axis}维（输入大小{input}）上得到的输出尺寸不为正，请调小核或增大填充")]
    NonPositiveOutput {
        layer: &'static str,
        axis: usize,
        input: usize,
    },
    #[error("{layer}在第{axis}维上的尺寸超出可表示范围")]
    DimOverflow { layer: &'static str, axis: usize },
}
