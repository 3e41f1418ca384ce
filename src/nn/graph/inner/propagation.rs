/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 形状的增量传播
 *
 * 从一组种子节点出发，只处理其下游可达的子图：
 * 1. 先求出可达集合，并统计集合内每个节点来自集合内的入边数；
 * 2. 按拓扑次序逐层推进（FIFO，同时就绪的按 NodeId 升序）：
 *    处理一个节点 = 重新执行其形状规则，再把输出写进每条出边目标的对应端口；
 * 3. 一个节点只在其所有可达前驱都处理完后才会被处理，每次传播中每个节点恰好处理一次。
 *
 * 不跨传播缓存任何结果；规则内的结构错误只落在节点上，不会中断传播。
 */

use super::super::types::PropagationReport;
use super::GraphInner;
use crate::nn::NodeId;
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet, VecDeque};

impl GraphInner {
    pub(in crate::nn::graph) fn propagate_from(&mut self, seeds: &[NodeId]) -> PropagationReport {
        let pass_id = self.last_propagation_id + 1;
        self.last_propagation_id = pass_id;

        let reachable = self.reachable_from(seeds);
        let mut pending_parents: BTreeMap<NodeId, usize> =
            reachable.iter().map(|&id| (id, 0)).collect();
        for &id in &reachable {
            for edge in self.outgoing_edges(id) {
                if let Some(count) = pending_parents.get_mut(&edge.target) {
                    *count += 1;
                }
            }
        }

        let mut ready: VecDeque<NodeId> = pending_parents
            .iter()
            .filter(|&(_, &count)| count == 0)
            .map(|(&id, _)| id)
            .collect();
        let mut visited = Vec::with_capacity(reachable.len());

        while let Some(id) = ready.pop_front() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            let changed = node.recompute();
            let output = node.output().clone();
            trace!(
                "传播#{pass_id}：处理{node}，输出{output}{}",
                if changed { "（已变化）" } else { "" }
            );
            visited.push(id);

            let mut newly_ready = Vec::new();
            for edge in self.outgoing_edges(id) {
                if let Some(target) = self.nodes.get_mut(&edge.target) {
                    target.set_input(edge.target_port.index(), output.clone());
                }
                if let Some(count) = pending_parents.get_mut(&edge.target) {
                    *count -= 1;
                    if *count == 0 {
                        newly_ready.push(edge.target);
                    }
                }
            }
            newly_ready.sort_unstable();
            ready.extend(newly_ready);
        }

        debug!(
            "传播#{pass_id}：从{seeds:?}出发，共处理{}个节点",
            visited.len()
        );
        PropagationReport { pass_id, visited }
    }

    /// 种子及其所有下游节点（忽略不存在的种子）
    fn reachable_from(&self, seeds: &[NodeId]) -> BTreeSet<NodeId> {
        let mut reachable = BTreeSet::new();
        let mut queue: VecDeque<NodeId> = seeds
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
        while let Some(id) = queue.pop_front() {
            if reachable.insert(id) {
                queue.extend(self.outgoing_edges(id).into_iter().map(|edge| edge.target));
            }
        }
        reachable
    }
}
