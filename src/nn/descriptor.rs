/*
 * @Author       : 老董
 * @Date         : 2025-12-27
 * @LastEditTime : 2026-03-08
 * @Description  : 图快照（Graph Snapshot）
 *                 交给代码生成等外部协作方的中间表示：只含层参数、形状与拓扑，不含任何渲染信息
 */

use crate::nn::nodes::{LayerKind, LayerParams};
use crate::nn::shape::ShapeDescriptor;
use serde::{Deserialize, Serialize};

/// 图的可序列化快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    /// 格式版本（用于向后兼容）
    pub version: String,
    /// 图名称
    pub name: String,
    /// 所有节点（按 id 升序）
    pub nodes: Vec<NodeSnapshot>,
    /// 所有连线（按 id 升序）
    pub edges: Vec<EdgeSnapshot>,
}

/// 节点快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: u64,
    pub kind: LayerKind,
    pub params: LayerParams,
    /// 各输入端口的形状，未连接为`null`
    pub input_shapes: Vec<Option<ShapeDescriptor>>,
    /// 输出形状，未连接（或终端层）为`null`
    pub output_shape: Option<ShapeDescriptor>,
    /// 输出的维度标签
    pub output_order: Option<String>,
}

/// 连线快照
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeSnapshot {
    pub id: u64,
    pub source: u64,
    pub target: u64,
    pub target_port: usize,
}

impl GraphSnapshot {
    /// 创建空快照
    pub fn new(name: &str) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            name: name.to_string(),
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    pub fn node(&self, id: u64) -> Option<&NodeSnapshot> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// 是否所有形状都已完全确定：
    /// 非终端层的输出、终端层的每个输入都须已连接且不含符号维度
    pub fn is_complete(&self) -> bool {
        let resolved =
            |shape: &Option<ShapeDescriptor>| shape.as_ref().is_some_and(|s| !s.has_symbolic_dims());
        self.nodes.iter().all(|node| {
            if node.kind.is_terminal() {
                node.input_shapes.iter().all(resolved)
            } else {
                resolved(&node.output_shape)
            }
        })
    }

    /// 转换为 JSON 字符串
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
