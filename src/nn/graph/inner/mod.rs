/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 节点/连线图的底层实现
 *
 * 各 impl 块分散在子模块中：
 * - core.rs: 创建、查询、增删节点
 * - edges.rs: 连线的建立/断开/改接，成环检测
 * - params.rs: 参数补丁（逐字段校验后提交）与重排层的辅助操作
 * - propagation.rs: 形状的增量传播
 * - describe.rs: 渲染视图、快照与摘要表格
 *
 * 每个变更操作都分两步：先在本地改动一处状态，再从受影响的节点起跑一次传播。
 */

mod core;
mod describe;
mod edges;
mod params;
mod propagation;

use super::types::{Edge, EdgeId};
use crate::nn::NodeId;
use crate::nn::nodes::NodeHandle;
use std::collections::{BTreeMap, HashMap};

/// 图的完整定义（核心实现）
///
/// 用户通常通过 `Graph` 句柄使用此结构，也可直接持有并调用其方法。
/// 节点与连线都用有序映射保存，使遍历次序（进而传播次序）可复现。
#[derive(Debug, Clone)]
pub struct GraphInner {
    pub(in crate::nn::graph) name: String,
    pub(in crate::nn::graph) nodes: BTreeMap<NodeId, NodeHandle>,
    pub(in crate::nn::graph) edges: BTreeMap<EdgeId, Edge>,
    /// 正向边：source -> 从它出发的连线
    pub(in crate::nn::graph) forward_edges: HashMap<NodeId, Vec<EdgeId>>,
    /// 反向边：target -> 进入它的连线
    pub(in crate::nn::graph) backward_edges: HashMap<NodeId, Vec<EdgeId>>,
    /// 最后一次传播的 id
    pub(in crate::nn::graph) last_propagation_id: u64,
    pub(in crate::nn::graph) next_node_id: u64,
    pub(in crate::nn::graph) next_edge_id: u64,
}

impl Default for GraphInner {
    fn default() -> Self {
        Self::new()
    }
}
