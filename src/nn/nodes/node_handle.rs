/*
 * @Author       : 老董
 * @Date         : 2026-03-06
 * @Description  : 图中节点的记录：层参数 + 各输入端口的形状 + 派生的输出形状 + 错误信息
 */

use super::raw_node::{LayerKind, LayerParams, TraitShapeRule};
use crate::errors::ShapeError;
use crate::nn::layout::{ResolveState, ShapeSlot};
use crate::nn::validation::FieldError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone)]
pub struct NodeHandle {
    id: NodeId,
    params: LayerParams,
    /// 每个输入端口一个槽位，长度等于层的输入端口数
    inputs: Vec<ShapeSlot>,
    output: ShapeSlot,
    field_errors: BTreeMap<String, FieldError>,
    shape_error: Option<ShapeError>,
}

impl NodeHandle {
    pub(in crate::nn) fn new(id: NodeId, params: LayerParams) -> Self {
        let inputs = vec![ShapeSlot::NotConnected; params.arity()];
        let mut node = Self {
            id,
            params,
            inputs,
            output: ShapeSlot::NotConnected,
            field_errors: BTreeMap::new(),
            shape_error: None,
        };
        node.recompute();
        node
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> LayerKind {
        self.params.kind()
    }

    pub fn params(&self) -> &LayerParams {
        &self.params
    }

    pub fn inputs(&self) -> &[ShapeSlot] {
        &self.inputs
    }

    pub fn input(&self, port: usize) -> Option<&ShapeSlot> {
        self.inputs.get(port)
    }

    pub fn output(&self) -> &ShapeSlot {
        &self.output
    }

    pub fn field_errors(&self) -> &BTreeMap<String, FieldError> {
        &self.field_errors
    }

    pub fn field_error(&self, field: &str) -> Option<&FieldError> {
        self.field_errors.get(field)
    }

    pub fn shape_error(&self) -> Option<&ShapeError> {
        self.shape_error.as_ref()
    }

    /// 节点的解析状态；终端层没有输出，按其输入判断
    pub fn state(&self) -> ResolveState {
        if self.params.has_output() {
            return self.output.state();
        }
        self.inputs
            .iter()
            .map(ShapeSlot::state)
            .min_by_key(|state| match state {
                ResolveState::NotConnected => 0,
                ResolveState::Partial => 1,
                ResolveState::Resolved => 2,
            })
            .unwrap_or(ResolveState::NotConnected)
    }

    pub(in crate::nn) fn params_mut(&mut self) -> &mut LayerParams {
        &mut self.params
    }

    pub(in crate::nn) fn set_params(&mut self, params: LayerParams) {
        self.params = params;
    }

    /// 写入某个输入端口；端口越界时忽略
    pub(in crate::nn) fn set_input(&mut self, port: usize, slot: ShapeSlot) {
        if let Some(input) = self.inputs.get_mut(port) {
            *input = slot;
        }
    }

    pub(in crate::nn) fn set_field_error(&mut self, error: FieldError) {
        self.field_errors.insert(error.field.clone(), error);
    }

    pub(in crate::nn) fn clear_field_error(&mut self, field: &str) {
        self.field_errors.remove(field);
    }

    /// 按当前参数和输入重新执行形状规则，返回输出是否发生了变化
    ///
    /// 结构错误不向外抛出：记录在节点上，输出变为“未连接”。
    pub(in crate::nn) fn recompute(&mut self) -> bool {
        let (output, shape_error) = match self.params.infer(&self.inputs) {
            Ok(slot) => (slot, None),
            Err(error) => (ShapeSlot::NotConnected, Some(error)),
        };
        let changed = output != self.output;
        self.output = output;
        self.shape_error = shape_error;
        changed
    }
}

impl fmt::Display for NodeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            crate::nn::format_node_display(self.id, self.kind().display_name())
        )
    }
}
