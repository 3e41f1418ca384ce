/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : GraphInner 对外视图：渲染用的节点/连线视图、代码生成用的快照、摘要表格
 */

use super::super::error::GraphError;
use super::super::types::{EdgeView, NodeView};
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::descriptor::{EdgeSnapshot, GraphSnapshot, NodeSnapshot};
use crate::nn::layout::{ResolveState, ShapeSlot};
use crate::nn::nodes::NodeHandle;

impl GraphInner {
    // ========== 渲染视图 ==========

    pub fn node_view(&self, id: NodeId) -> Result<NodeView, GraphError> {
        Ok(Self::view_of(self.get_node(id)?))
    }

    /// 所有节点的视图（按 id 升序）
    pub fn node_views(&self) -> Vec<NodeView> {
        self.nodes.values().map(Self::view_of).collect()
    }

    /// 所有连线的视图（按 id 升序）
    pub fn edge_views(&self) -> Vec<EdgeView> {
        self.edges.values().map(EdgeView::from).collect()
    }

    fn view_of(node: &NodeHandle) -> NodeView {
        NodeView {
            id: node.id(),
            kind: node.kind(),
            params: node.params().clone(),
            inputs: node.inputs().iter().map(ShapeSlot::to_string).collect(),
            output: node.output().to_string(),
            order: node.output().order().map(|order| order.to_string()),
            state: node.state(),
            field_errors: node
                .field_errors()
                .iter()
                .map(|(field, error)| (field.clone(), error.message.clone()))
                .collect(),
            shape_error: node.shape_error().map(ToString::to_string),
        }
    }

    // ========== 快照（snapshot）==========

    /// 导出图的快照（用于代码生成等外部协作方）
    ///
    /// # 示例
    /// ```
    /// use shape_flow::nn::{GraphInner, ImageInput};
    ///
    /// let mut graph = GraphInner::new();
    /// graph.add_node(ImageInput::new(32, 3, 28, 28));
    /// let snapshot = graph.snapshot();
    /// assert!(snapshot.is_complete());
    /// assert!(snapshot.to_json().unwrap().contains("image_input"));
    /// ```
    pub fn snapshot(&self) -> GraphSnapshot {
        let mut snapshot = GraphSnapshot::new(&self.name);
        snapshot.nodes = self
            .nodes
            .values()
            .map(|node| NodeSnapshot {
                id: node.id().0,
                kind: node.kind(),
                params: node.params().clone(),
                input_shapes: node.inputs().iter().map(|s| s.shape().cloned()).collect(),
                output_shape: node.output().shape().cloned(),
                output_order: node.output().order().map(|order| order.to_string()),
            })
            .collect();
        snapshot.edges = self
            .edges
            .values()
            .map(|edge| EdgeSnapshot {
                id: edge.id.0,
                source: edge.source.0,
                target: edge.target.0,
                target_port: edge.target_port.index(),
            })
            .collect();
        snapshot
    }

    // ========== 摘要（summary）==========

    /// 返回图摘要字符串（Unicode 文本表格，用于控制台输出）
    ///
    /// ```text
    /// ┌──────┬──────────┬──────────────────┬──────────┬────────┐
    /// │ 节点 │ 类型     │ 输出形状         │ 状态     │ 父节点 │
    /// ├──────┼──────────┼──────────────────┼──────────┼────────┤
    /// │ #1   │ ImageInput │ (32, 3, 28, 28) │ 已解析   │ -      │
    /// ...
    /// ```
    pub fn summary_string(&self) -> String {
        let headers = ["节点", "类型", "输出形状", "状态", "父节点"];
        let rows: Vec<[String; 5]> = self
            .nodes
            .values()
            .map(|node| {
                [
                    format!("#{}", node.id()),
                    node.kind().display_name().to_string(),
                    node.output().to_string(),
                    Self::state_name(node.state()).to_string(),
                    self.format_parent_ids(node.id()),
                ]
            })
            .collect();

        let widths: Vec<usize> = (0..headers.len())
            .map(|col| {
                rows.iter()
                    .map(|row| Self::display_width(&row[col]))
                    .chain(std::iter::once(Self::display_width(headers[col])))
                    .max()
                    .unwrap_or(0)
            })
            .collect();
        let rule = |left: &str, mid: &str, right: &str| {
            let segments: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
            format!("{left}{}{right}\n", segments.join(mid))
        };
        let line = |cells: &[String]| {
            let padded: Vec<String> = cells
                .iter()
                .zip(&widths)
                .map(|(cell, &w)| Self::pad(cell, w))
                .collect();
            format!("│ {} │\n", padded.join(" │ "))
        };

        let mut output = String::new();
        output.push_str(&rule("┌", "┬", "┐"));
        output.push_str(&line(headers.map(String::from).as_slice()));
        output.push_str(&rule("├", "┼", "┤"));
        for row in &rows {
            output.push_str(&line(row.as_slice()));
        }
        output.push_str(&rule("└", "┴", "┘"));

        let resolved = self
            .nodes
            .values()
            .filter(|node| node.state() == ResolveState::Resolved)
            .count();
        output.push_str(&format!(
            "节点数: {}  连线数: {}  已解析: {}\n",
            self.nodes.len(),
            self.edges.len(),
            resolved
        ));
        output
    }

    /// 返回图摘要的 Markdown 格式字符串
    pub fn summary_markdown(&self) -> String {
        let mut output = format!("# 图摘要: {}\n\n", self.name);
        output.push_str("| 节点 | 类型 | 输出形状 | 状态 | 父节点 |\n");
        output.push_str("|------|------|----------|------|--------|\n");
        for node in self.nodes.values() {
            output.push_str(&format!(
                "| #{} | {} | {} | {} | {} |\n",
                node.id(),
                node.kind(),
                node.output(),
                Self::state_name(node.state()),
                self.format_parent_ids(node.id())
            ));
        }
        output
    }

    const fn state_name(state: ResolveState) -> &'static str {
        match state {
            ResolveState::NotConnected => "未连接",
            ResolveState::Partial => "部分确定",
            ResolveState::Resolved => "已解析",
        }
    }

    /// 格式化父节点 id 列表
    fn format_parent_ids(&self, id: NodeId) -> String {
        let parents = self.get_node_parents(id).unwrap_or_default();
        if parents.is_empty() {
            "-".to_string()
        } else {
            parents
                .iter()
                .map(|p| format!("#{p}"))
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    /// 计算字符串显示宽度（考虑中文字符）
    fn display_width(s: &str) -> usize {
        s.chars().map(|c| if c.is_ascii() { 1 } else { 2 }).sum()
    }

    fn pad(s: &str, width: usize) -> String {
        let fill = width.saturating_sub(Self::display_width(s));
        format!("{s}{}", " ".repeat(fill))
    }
}
