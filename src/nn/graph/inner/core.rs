/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 核心操作：创建、查询、增删节点
 */

use super::super::error::GraphError;
use super::super::types::PropagationReport;
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::layout::{ResolveState, ShapeSlot};
use crate::nn::nodes::{LayerKind, LayerParams, NodeHandle};
use log::{debug, info};
use std::collections::{BTreeMap, BTreeSet, HashMap};

impl GraphInner {
    // ========== 创建 ==========

    pub fn new() -> Self {
        Self::with_name("default_graph")
    }

    pub fn with_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            forward_edges: HashMap::new(),
            backward_edges: HashMap::new(),
            last_propagation_id: 0,
            next_node_id: 0,
            next_edge_id: 0,
        }
    }

    // ========== 基础访问器 ==========

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn last_propagation_id(&self) -> u64 {
        self.last_propagation_id
    }

    /// 所有节点 id（升序）
    pub fn nodes(&self) -> Vec<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn nodes_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.get_node(id)
    }

    pub(in crate::nn) fn get_node(&self, id: NodeId) -> Result<&NodeHandle, GraphError> {
        self.nodes.get(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub(in crate::nn) fn get_node_mut(&mut self, id: NodeId) -> Result<&mut NodeHandle, GraphError> {
        self.nodes.get_mut(&id).ok_or(GraphError::NodeNotFound(id))
    }

    pub fn node_params(&self, id: NodeId) -> Result<&LayerParams, GraphError> {
        Ok(self.get_node(id)?.params())
    }

    pub fn node_output(&self, id: NodeId) -> Result<&ShapeSlot, GraphError> {
        Ok(self.get_node(id)?.output())
    }

    pub fn node_inputs(&self, id: NodeId) -> Result<&[ShapeSlot], GraphError> {
        Ok(self.get_node(id)?.inputs())
    }

    pub fn node_state(&self, id: NodeId) -> Result<ResolveState, GraphError> {
        Ok(self.get_node(id)?.state())
    }

    /// 父节点（按输入端口次序）
    pub fn get_node_parents(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        let mut incoming = self.incoming_edges(id);
        incoming.sort_by_key(|edge| edge.target_port);
        Ok(incoming.into_iter().map(|edge| edge.source).collect())
    }

    /// 子节点（去重，升序）
    pub fn get_node_children(&self, id: NodeId) -> Result<Vec<NodeId>, GraphError> {
        // 先检查节点是否存在
        let _ = self.get_node(id)?;
        let children: BTreeSet<NodeId> = self
            .outgoing_edges(id)
            .into_iter()
            .map(|edge| edge.target)
            .collect();
        Ok(children.into_iter().collect())
    }

    pub(in crate::nn::graph) fn generate_valid_node_id(&mut self) -> NodeId {
        self.next_node_id += 1;
        NodeId(self.next_node_id)
    }

    // ========== 增删节点 ==========

    /// 加入一个节点；输入层的输出当即由参数构造，其余层在连线前为“未连接”
    pub fn add_node(&mut self, params: impl Into<LayerParams>) -> NodeId {
        let id = self.generate_valid_node_id();
        let node = NodeHandle::new(id, params.into());
        info!("图`{}`新增{}，输出{}", self.name, node, node.output());
        self.nodes.insert(id, node);
        id
    }

    /// 以该种类的默认参数加入一个节点
    pub fn add_default_node(&mut self, kind: LayerKind) -> NodeId {
        self.add_node(kind.default_params())
    }

    /// 删除节点及其所有连线；原下游节点对应端口变为“未连接”，并从它们起传播
    pub fn delete_node(&mut self, id: NodeId) -> Result<PropagationReport, GraphError> {
        let node = self.get_node(id)?;
        info!("图`{}`删除{}", self.name, node);

        let incident: BTreeSet<_> = self
            .incoming_edges(id)
            .into_iter()
            .chain(self.outgoing_edges(id))
            .map(|edge| edge.id)
            .collect();

        let mut affected = BTreeSet::new();
        for edge_id in incident {
            if let Some(edge) = self.detach_edge(edge_id) {
                if edge.target != id {
                    if let Some(target) = self.nodes.get_mut(&edge.target) {
                        target.set_input(edge.target_port.index(), ShapeSlot::NotConnected);
                    }
                    affected.insert(edge.target);
                }
            }
        }
        self.nodes.remove(&id);
        self.forward_edges.remove(&id);
        self.backward_edges.remove(&id);

        let seeds: Vec<NodeId> = affected.into_iter().collect();
        debug!("删除节点{id}后需要更新的下游节点：{seeds:?}");
        Ok(self.propagate_from(&seeds))
    }
}
