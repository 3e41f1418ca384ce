/*
 * @Author       : 老董
 * @Date         : 2026-03-07
 * @Description  : GraphInner 参数变更：JSON 补丁的逐字段校验与提交，以及重排层的辅助操作
 */

use super::super::error::GraphError;
use super::super::types::{AxisMove, ParamUpdate, PropagationReport};
use super::GraphInner;
use crate::nn::NodeId;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::{LayerKind, LayerParams, TraitShapeRule, permute_meta};
use crate::nn::validation::FieldError;
use log::{debug, warn};
use serde_json::Value;

impl GraphInner {
    /// 以 JSON 对象形式修改节点参数，如`{"kernel_size": 3, "padding": null}`
    ///
    /// 每个字段独立校验：不合法的字段不提交并在节点上记下错误，合法的字段照常提交并清掉旧错误。
    /// 未知字段（包括`kind`）使整个补丁被拒绝。只要有字段提交，就重新推导本节点并向下游传播。
    pub fn update_node_params(
        &mut self,
        id: NodeId,
        patch: &Value,
    ) -> Result<ParamUpdate, GraphError> {
        let Value::Object(fields) = patch else {
            return Err(GraphError::InvalidOperation(format!(
                "参数补丁须为JSON对象，实际为{patch}"
            )));
        };
        let node = self.get_node(id)?;
        let rules = node.params().field_rules();
        if let Some(unknown) = fields
            .keys()
            .find(|field| !rules.iter().any(|(name, _)| *name == field.as_str()))
        {
            return Err(GraphError::UnknownField {
                node: id,
                field: unknown.clone(),
            });
        }

        let mut current = serde_json::to_value(node.params())?;
        let mut update = ParamUpdate::default();
        let mut outcomes = Vec::with_capacity(fields.len());
        for (field, value) in fields {
            let Some((_, rule)) = rules.iter().find(|(name, _)| *name == field.as_str()) else {
                continue;
            };
            let value = rule.canonical(value);
            let outcome = rule.check(field, &value).and_then(|()| {
                let mut candidate = current.clone();
                candidate[field.as_str()] = value.clone();
                match serde_json::from_value::<LayerParams>(candidate.clone()) {
                    Ok(params) => params.check_field(field).map(|()| candidate),
                    Err(_) if value.is_null() => {
                        Err(FieldError::new(field, format!("{field}不能为空")))
                    }
                    Err(_) => Err(FieldError::new(field, format!("{field}取值无效"))),
                }
            });
            match outcome {
                Ok(candidate) => {
                    current = candidate;
                    update.committed.push(field.clone());
                    outcomes.push(Ok(field.clone()));
                }
                Err(error) => {
                    update.rejected.push(error.clone());
                    outcomes.push(Err(error));
                }
            }
        }

        let node = self.get_node_mut(id)?;
        for outcome in outcomes {
            match outcome {
                Ok(field) => node.clear_field_error(&field),
                Err(error) => {
                    warn!("{node}的字段`{}`未提交：{}", error.field, error.message);
                    node.set_field_error(error);
                }
            }
        }
        if update.committed.is_empty() {
            return Ok(update);
        }

        let mut params: LayerParams = serde_json::from_value(current)?;
        params.normalize();
        node.set_params(params);
        debug!("{node}提交字段{:?}", update.committed);
        update.propagation = Some(self.propagate_from(&[id]));
        Ok(update)
    }

    /// 整体替换节点参数（层类型须一致），清空该节点所有字段错误
    pub fn set_node_params(
        &mut self,
        id: NodeId,
        params: impl Into<LayerParams>,
    ) -> Result<PropagationReport, GraphError> {
        let mut params = params.into();
        let node = self.get_node_mut(id)?;
        if params.kind() != node.kind() {
            return Err(GraphError::KindMismatch {
                expected: node.kind(),
                got: params.kind(),
            });
        }
        params.normalize();
        node.set_params(params);
        let fields: Vec<String> = node.field_errors().keys().cloned().collect();
        for field in fields {
            node.clear_field_error(&field);
        }
        debug!("{node}的参数已整体替换");
        Ok(self.propagate_from(&[id]))
    }

    /// 按输入维度下标设置重排层的输出次序，如输入 "NCL" 时`[0, 2, 1]`得到 "NLC"
    pub fn set_permutation(
        &mut self,
        id: NodeId,
        perm: &[usize],
    ) -> Result<PropagationReport, GraphError> {
        let node = self.get_node(id)?;
        if node.kind() != LayerKind::Permute {
            return Err(GraphError::KindMismatch {
                expected: LayerKind::Permute,
                got: node.kind(),
            });
        }
        let Some(input) = node.input(0).and_then(ShapeSlot::meta) else {
            return Err(GraphError::InvalidOperation(format!(
                "{node}尚未连接输入，无法设置维度顺序"
            )));
        };
        let permuted =
            permute_meta(input, perm).map_err(|e| GraphError::InvalidOperation(e.to_string()))?;
        let order = permuted.order().as_str().to_string();

        let node = self.get_node_mut(id)?;
        if let LayerParams::Permute(permute) = node.params_mut() {
            permute.order = Some(order);
        }
        node.clear_field_error("order");
        debug!("{node}的维度顺序设为{perm:?}");
        Ok(self.propagate_from(&[id]))
    }

    /// 把重排层输出中第`index`维与前一维（`Up`）或后一维（`Down`）交换
    pub fn move_permute_axis(
        &mut self,
        id: NodeId,
        index: usize,
        direction: AxisMove,
    ) -> Result<PropagationReport, GraphError> {
        let node = self.get_node(id)?;
        let (LayerParams::Permute(permute), Some(input)) =
            (node.params(), node.input(0).and_then(ShapeSlot::meta))
        else {
            return match node.kind() {
                LayerKind::Permute => Err(GraphError::InvalidOperation(format!(
                    "{node}尚未连接输入，无法调整维度顺序"
                ))),
                got => Err(GraphError::KindMismatch {
                    expected: LayerKind::Permute,
                    got,
                }),
            };
        };

        let mut perm = permute.effective_permutation(input);
        let other = match direction {
            AxisMove::Up => index.checked_sub(1),
            AxisMove::Down => Some(index + 1),
        };
        let Some(other) = other.filter(|&other| other < perm.len() && index < perm.len()) else {
            return Err(GraphError::InvalidOperation(format!(
                "{node}的第{index}维无法{}",
                match direction {
                    AxisMove::Up => "上移",
                    AxisMove::Down => "下移",
                }
            )));
        };
        perm.swap(index, other);
        self.set_permutation(id, &perm)
    }
}
