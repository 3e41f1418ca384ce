/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : GraphInner 连线操作：建立、断开、改接，以及成环检测
 *
 * 所有检查都在改动前完成：一旦返回`Err`，图保持原样。
 */

use super::super::error::GraphError;
use super::super::types::{Edge, EdgeId, InputPort, PropagationReport};
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::TraitShapeRule;
use log::info;
use std::collections::{HashSet, VecDeque};

impl GraphInner {
    // ========== 查询 ==========

    /// 所有连线（按 id 升序）
    pub fn edges(&self) -> Vec<Edge> {
        self.edges.values().copied().collect()
    }

    pub fn edges_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        self.edges.get(&id).ok_or(GraphError::EdgeNotFound(id))
    }

    /// 进入`id`的连线（按 id 升序）
    pub fn incoming_edges(&self, id: NodeId) -> Vec<Edge> {
        self.collect_edges(self.backward_edges.get(&id))
    }

    /// 从`id`出发的连线（按 id 升序）
    pub fn outgoing_edges(&self, id: NodeId) -> Vec<Edge> {
        self.collect_edges(self.forward_edges.get(&id))
    }

    fn collect_edges(&self, ids: Option<&Vec<EdgeId>>) -> Vec<Edge> {
        let mut edges: Vec<Edge> = ids
            .into_iter()
            .flatten()
            .filter_map(|id| self.edges.get(id).copied())
            .collect();
        edges.sort_by_key(|edge| edge.id);
        edges
    }

    /// 从`from`沿连线方向能否到达`to`（`from == to`视为可达）
    pub fn reaches(&self, from: NodeId, to: NodeId) -> bool {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from([from]);
        while let Some(current) = queue.pop_front() {
            if current == to {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            queue.extend(self.outgoing_edges(current).into_iter().map(|edge| edge.target));
        }
        false
    }

    // ========== 变更 ==========

    /// 连接`source`的输出到`target`的输入端口，成功后从`source`起传播
    ///
    /// `port`为`None`时取第一个空闲端口。
    pub fn connect(
        &mut self,
        source: NodeId,
        target: NodeId,
        port: Option<InputPort>,
    ) -> Result<EdgeId, GraphError> {
        let port = self.check_connection(source, target, port, None)?;

        let id = EdgeId(self.next_edge_id + 1);
        self.next_edge_id += 1;
        self.attach_edge(Edge {
            id,
            source,
            target,
            target_port: port,
        });
        info!("连线{id}：{source} → {target}（端口{port}）");

        self.propagate_from(&[source]);
        Ok(id)
    }

    /// 删除连线，目标端口变为“未连接”并从目标起传播
    pub fn disconnect(&mut self, id: EdgeId) -> Result<PropagationReport, GraphError> {
        let edge = self.detach_edge(id).ok_or(GraphError::EdgeNotFound(id))?;
        if let Some(target) = self.nodes.get_mut(&edge.target) {
            target.set_input(edge.target_port.index(), ShapeSlot::NotConnected);
        }
        info!("断开连线{id}：{} → {}", edge.source, edge.target);
        Ok(self.propagate_from(&[edge.target]))
    }

    /// 把连线的终点改接到`new_target`的端口上
    ///
    /// 原终点端口变为“未连接”，新终点端口收到源节点当前的输出，两者在同一次传播中完成。
    pub fn reconnect(
        &mut self,
        id: EdgeId,
        new_target: NodeId,
        new_port: Option<InputPort>,
    ) -> Result<PropagationReport, GraphError> {
        let edge = *self.edge(id)?;
        let port = self.check_connection(edge.source, new_target, new_port, Some(id))?;

        self.detach_edge(id);
        if let Some(old_target) = self.nodes.get_mut(&edge.target) {
            old_target.set_input(edge.target_port.index(), ShapeSlot::NotConnected);
        }
        self.attach_edge(Edge {
            target: new_target,
            target_port: port,
            ..edge
        });
        info!(
            "改接连线{id}：{} → {}（端口{}）改为 → {new_target}（端口{port}）",
            edge.source, edge.target, edge.target_port
        );

        Ok(self.propagate_from(&[edge.source, edge.target]))
    }

    // ========== 内部 ==========

    /// 检查`source → target`能否连接，返回实际使用的端口；`ignoring`为正在改接的连线本身
    fn check_connection(
        &self,
        source: NodeId,
        target: NodeId,
        port: Option<InputPort>,
        ignoring: Option<EdgeId>,
    ) -> Result<InputPort, GraphError> {
        let source_node = self.get_node(source)?;
        let target_node = self.get_node(target)?;

        if !source_node.params().has_output() {
            return Err(GraphError::NoOutput(source_node.to_string()));
        }
        let arity = target_node.params().arity();
        if arity == 0 {
            return Err(GraphError::NoInputPort(target_node.to_string()));
        }
        if self.reaches(target, source) {
            return Err(GraphError::CycleDetected {
                from: source,
                to: target,
            });
        }

        let occupied: HashSet<InputPort> = self
            .incoming_edges(target)
            .into_iter()
            .filter(|edge| Some(edge.id) != ignoring)
            .map(|edge| edge.target_port)
            .collect();
        match port {
            Some(port) if port.index() >= arity => Err(GraphError::InvalidPort {
                target,
                port,
                arity,
            }),
            Some(port) if occupied.contains(&port) => {
                Err(GraphError::PortOccupied { target, port })
            }
            Some(port) => Ok(port),
            None => (0..arity)
                .map(InputPort)
                .find(|port| !occupied.contains(port))
                .ok_or(GraphError::NoFreePort { target }),
        }
    }

    pub(in crate::nn::graph) fn attach_edge(&mut self, edge: Edge) {
        self.forward_edges
            .entry(edge.source)
            .or_default()
            .push(edge.id);
        self.backward_edges
            .entry(edge.target)
            .or_default()
            .push(edge.id);
        self.edges.insert(edge.id, edge);
    }

    /// 从存储和邻接表中摘除连线（不触碰端口上的形状）
    pub(in crate::nn::graph) fn detach_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let edge = self.edges.remove(&id)?;
        if let Some(ids) = self.forward_edges.get_mut(&edge.source) {
            ids.retain(|&e| e != id);
        }
        if let Some(ids) = self.backward_edges.get_mut(&edge.target) {
            ids.retain(|&e| e != id);
        }
        Some(edge)
    }
}
