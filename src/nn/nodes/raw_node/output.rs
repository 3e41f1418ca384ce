/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 终端输出层（回归/分类头）
 *
 * 终端层只消费形状，自身没有可供下游连接的输出，输出槽恒为“未连接”；
 * 其解析状态由输入槽决定。
 */

use crate::errors::ShapeError;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegressionOutput {
    pub num_predicted_variables: Option<usize>,
}

impl TraitShapeRule for RegressionOutput {
    fn kind(&self) -> LayerKind {
        LayerKind::RegressionOutput
    }

    fn has_output(&self) -> bool {
        false
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[("num_predicted_variables", FieldRule::PositiveInt)]
    }

    fn infer(&self, _inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(ShapeSlot::NotConnected)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationOutput {
    pub num_classes: Option<usize>,
}

impl TraitShapeRule for ClassificationOutput {
    fn kind(&self) -> LayerKind {
        LayerKind::ClassificationOutput
    }

    fn has_output(&self) -> bool {
        false
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[("num_classes", FieldRule::PositiveInt)]
    }

    fn infer(&self, _inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(ShapeSlot::NotConnected)
    }
}
