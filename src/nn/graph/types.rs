/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : Graph 模块的类型定义（连线、端口、传播报告、渲染视图）
 */

use crate::nn::NodeId;
use crate::nn::layout::ResolveState;
use crate::nn::nodes::{LayerKind, LayerParams};
use crate::nn::validation::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(pub u64);

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 目标节点上的输入端口：单输入层只有`FIRST`，拼接层有`FIRST`/`SECOND`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InputPort(pub usize);

impl InputPort {
    pub const FIRST: Self = Self(0);
    pub const SECOND: Self = Self(1);

    pub const fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for InputPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 有向连线：把`source`的输出送进`target`的某个输入端口
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub target_port: InputPort,
}

/// 重排层中某一维上移/下移
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisMove {
    Up,
    Down,
}

/// 一次传播的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropagationReport {
    /// 本次传播的序号（图内递增）
    pub pass_id: u64,
    /// 按处理先后排列的被访问节点
    pub visited: Vec<NodeId>,
}

impl PropagationReport {
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    /// 本次传播中`id`的处理次序（未访问则为`None`）
    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.visited.iter().position(|&v| v == id)
    }
}

/// 一次参数补丁的结果：逐字段地接受或拒绝
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamUpdate {
    /// 已提交的字段
    pub committed: Vec<String>,
    /// 被拒绝的字段及原因（同时也记录在节点上）
    pub rejected: Vec<FieldError>,
    /// 有字段提交时触发的传播
    pub propagation: Option<PropagationReport>,
}

impl ParamUpdate {
    pub fn is_fully_committed(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// 供渲染层读取的节点视图
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub kind: LayerKind,
    pub params: LayerParams,
    /// 各输入端口的显示文本，如 "(32, 3, 28, 28)" 或 "Not Connected"
    pub inputs: Vec<String>,
    pub output: String,
    pub order: Option<String>,
    pub state: ResolveState,
    pub field_errors: BTreeMap<String, String>,
    pub shape_error: Option<String>,
}

/// 供渲染层读取的连线视图
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EdgeView {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    pub target_port: InputPort,
}

impl From<&Edge> for EdgeView {
    fn from(edge: &Edge) -> Self {
        Self {
            id: edge.id,
            source: edge.source,
            target: edge.target,
            target_port: edge.target_port,
        }
    }
}
