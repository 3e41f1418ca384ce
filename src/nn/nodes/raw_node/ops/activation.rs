/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 逐元素激活函数（ReLU/Sigmoid/Tanh），形状原样透传
 */

use crate::errors::ShapeError;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, identity};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relu {
    pub inplace: bool,
}

impl TraitShapeRule for Relu {
    fn kind(&self) -> LayerKind {
        LayerKind::Relu
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[("inplace", FieldRule::Flag)]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sigmoid {}

impl TraitShapeRule for Sigmoid {
    fn kind(&self) -> LayerKind {
        LayerKind::Sigmoid
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tanh {}

impl TraitShapeRule for Tanh {
    fn kind(&self) -> LayerKind {
        LayerKind::Tanh
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}
