/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 句柄（用户级 API）
 */

use super::error::GraphError;
use super::inner::GraphInner;
use super::types::{AxisMove, EdgeId, EdgeView, InputPort, NodeView, ParamUpdate, PropagationReport};
use crate::nn::NodeId;
use crate::nn::config::GraphConfig;
use crate::nn::debounce::Debouncer;
use crate::nn::descriptor::GraphSnapshot;
use crate::nn::layout::{ResolveState, ShapeSlot};
use crate::nn::nodes::{LayerKind, LayerParams, TraitShapeRule};
use crate::nn::validation::parse_raw_field;
use log::debug;
use serde_json::{Map, Value};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;
use std::time::{Duration, Instant};

/// 一次防抖到期后的字段提交结果
#[derive(Debug, Clone)]
pub struct FieldCommit {
    pub node: NodeId,
    pub field: String,
    pub result: Result<ParamUpdate, GraphError>,
}

type PendingEdits = BTreeMap<(NodeId, String), Debouncer<Value>>;

/// Graph - 图句柄
///
/// # 设计原则
/// - 是 `Rc<RefCell<GraphInner>>` 的薄封装，Clone 后多个句柄引用同一张图
/// - 结构性编辑（增删节点、连线）立即生效；输入框里的字段编辑经防抖后才提交
/// - 时间由调用方传入，句柄本身不持有定时器
#[derive(Clone)]
pub struct Graph {
    inner: Rc<RefCell<GraphInner>>,
    edits: Rc<RefCell<PendingEdits>>,
    quiet: Duration,
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}

impl Graph {
    // ==================== 创建 ====================

    /// 创建新图
    pub fn new() -> Self {
        Self::with_config(&GraphConfig::default())
    }

    pub fn with_config(config: &GraphConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(GraphInner::with_name(&config.name))),
            edits: Rc::new(RefCell::new(BTreeMap::new())),
            quiet: config.quiet_period(),
        }
    }

    /// 从现有 GraphInner 创建句柄
    pub fn from_inner(inner: GraphInner) -> Self {
        Self {
            inner: Rc::new(RefCell::new(inner)),
            edits: Rc::new(RefCell::new(BTreeMap::new())),
            quiet: GraphConfig::default().quiet_period(),
        }
    }

    /// 获取内部 GraphInner 的不可变引用
    pub fn inner(&self) -> std::cell::Ref<'_, GraphInner> {
        self.inner.borrow()
    }

    /// 获取内部 GraphInner 的可变引用
    pub fn inner_mut(&self) -> std::cell::RefMut<'_, GraphInner> {
        self.inner.borrow_mut()
    }

    pub const fn quiet_period(&self) -> Duration {
        self.quiet
    }

    // ==================== 结构编辑（立即生效） ====================

    pub fn add_node(&self, params: impl Into<LayerParams>) -> NodeId {
        self.inner.borrow_mut().add_node(params)
    }

    pub fn add_default_node(&self, kind: LayerKind) -> NodeId {
        self.inner.borrow_mut().add_default_node(kind)
    }

    /// 删除节点，同时取消它尚未提交的字段编辑
    pub fn delete_node(&self, id: NodeId) -> Result<PropagationReport, GraphError> {
        let report = self.inner.borrow_mut().delete_node(id)?;
        self.edits.borrow_mut().retain(|(node, _), _| *node != id);
        Ok(report)
    }

    pub fn connect(
        &self,
        source: NodeId,
        target: NodeId,
        port: Option<InputPort>,
    ) -> Result<EdgeId, GraphError> {
        self.inner.borrow_mut().connect(source, target, port)
    }

    pub fn disconnect(&self, edge: EdgeId) -> Result<PropagationReport, GraphError> {
        self.inner.borrow_mut().disconnect(edge)
    }

    pub fn reconnect(
        &self,
        edge: EdgeId,
        new_target: NodeId,
        new_port: Option<InputPort>,
    ) -> Result<PropagationReport, GraphError> {
        self.inner.borrow_mut().reconnect(edge, new_target, new_port)
    }

    // ==================== 参数编辑 ====================

    pub fn update_node_params(&self, id: NodeId, patch: &Value) -> Result<ParamUpdate, GraphError> {
        self.inner.borrow_mut().update_node_params(id, patch)
    }

    pub fn set_node_params(
        &self,
        id: NodeId,
        params: impl Into<LayerParams>,
    ) -> Result<PropagationReport, GraphError> {
        self.inner.borrow_mut().set_node_params(id, params)
    }

    pub fn set_permutation(&self, id: NodeId, perm: &[usize]) -> Result<PropagationReport, GraphError> {
        self.inner.borrow_mut().set_permutation(id, perm)
    }

    pub fn move_permute_axis(
        &self,
        id: NodeId,
        index: usize,
        direction: AxisMove,
    ) -> Result<PropagationReport, GraphError> {
        self.inner.borrow_mut().move_permute_axis(id, index, direction)
    }

    /// 输入框中的一次按键：记下原始文本，静默期过后由`flush_due`提交
    ///
    /// 节点或字段不存在时立即报错；取值是否合法要到提交时才校验。
    pub fn edit_field(
        &self,
        id: NodeId,
        field: &str,
        raw: &str,
        now: Instant,
    ) -> Result<(), GraphError> {
        {
            let inner = self.inner.borrow();
            let node = inner.node(id)?;
            if !node.params().field_rules().iter().any(|(name, _)| *name == field) {
                return Err(GraphError::UnknownField {
                    node: id,
                    field: field.to_string(),
                });
            }
        }
        self.edits
            .borrow_mut()
            .entry((id, field.to_string()))
            .or_insert_with(|| Debouncer::new(self.quiet))
            .schedule(parse_raw_field(raw), now);
        Ok(())
    }

    /// 尚未提交的字段编辑数
    pub fn pending_edits(&self) -> usize {
        self.edits.borrow().len()
    }

    /// 提交所有静默期已过的字段编辑（按节点、字段次序）
    pub fn flush_due(&self, now: Instant) -> Vec<FieldCommit> {
        let due: Vec<((NodeId, String), Value)> = {
            let mut edits = self.edits.borrow_mut();
            let due: Vec<_> = edits
                .iter_mut()
                .filter_map(|(key, debouncer)| debouncer.poll(now).map(|value| (key.clone(), value)))
                .collect();
            edits.retain(|_, debouncer| debouncer.is_pending());
            due
        };
        self.commit_fields(due)
    }

    /// 不等静默期结束，立即提交所有字段编辑
    pub fn flush_all(&self) -> Vec<FieldCommit> {
        let due: Vec<((NodeId, String), Value)> = std::mem::take(&mut *self.edits.borrow_mut())
            .into_iter()
            .filter_map(|(key, mut debouncer)| debouncer.flush().map(|value| (key, value)))
            .collect();
        self.commit_fields(due)
    }

    fn commit_fields(&self, due: Vec<((NodeId, String), Value)>) -> Vec<FieldCommit> {
        let mut inner = self.inner.borrow_mut();
        due.into_iter()
            .map(|((node, field), value)| {
                debug!("防抖到期，提交节点{node}的字段`{field}` = {value}");
                let mut patch = Map::new();
                patch.insert(field.clone(), value);
                let result = inner.update_node_params(node, &Value::Object(patch));
                FieldCommit {
                    node,
                    field,
                    result,
                }
            })
            .collect()
    }

    // ==================== 查询 ====================

    pub fn nodes(&self) -> Vec<NodeId> {
        self.inner.borrow().nodes()
    }

    pub fn node_view(&self, id: NodeId) -> Result<NodeView, GraphError> {
        self.inner.borrow().node_view(id)
    }

    pub fn node_views(&self) -> Vec<NodeView> {
        self.inner.borrow().node_views()
    }

    pub fn edge_views(&self) -> Vec<EdgeView> {
        self.inner.borrow().edge_views()
    }

    pub fn node_output(&self, id: NodeId) -> Result<ShapeSlot, GraphError> {
        self.inner.borrow().node_output(id).cloned()
    }

    pub fn node_state(&self, id: NodeId) -> Result<ResolveState, GraphError> {
        self.inner.borrow().node_state(id)
    }

    pub fn snapshot(&self) -> GraphSnapshot {
        self.inner.borrow().snapshot()
    }

    pub fn summary_string(&self) -> String {
        self.inner.borrow().summary_string()
    }

    /// 打印图摘要
    pub fn summary(&self) {
        println!("{}", self.summary_string());
    }
}
