/*
 * @Author       : 老董
 * @Date         : 2026-03-04
 * @Description  : Dropout 系列（逐元素/按通道 1D/按通道 2D），形状原样透传
 */

use crate::errors::ShapeError;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule, identity};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

const DROPOUT_FIELDS: &[(&str, FieldRule)] =
    &[("p", FieldRule::Probability), ("inplace", FieldRule::Flag)];

const DEFAULT_P: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dropout {
    pub p: Option<f64>,
    pub inplace: bool,
}

impl Default for Dropout {
    fn default() -> Self {
        Self {
            p: Some(DEFAULT_P),
            inplace: false,
        }
    }
}

impl TraitShapeRule for Dropout {
    fn kind(&self) -> LayerKind {
        LayerKind::Dropout
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        DROPOUT_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dropout1d {
    pub p: Option<f64>,
    pub inplace: bool,
}

impl Default for Dropout1d {
    fn default() -> Self {
        Self {
            p: Some(DEFAULT_P),
            inplace: false,
        }
    }
}

impl TraitShapeRule for Dropout1d {
    fn kind(&self) -> LayerKind {
        LayerKind::Dropout1d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        DROPOUT_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dropout2d {
    pub p: Option<f64>,
    pub inplace: bool,
}

impl Default for Dropout2d {
    fn default() -> Self {
        Self {
            p: Some(DEFAULT_P),
            inplace: false,
        }
    }
}

impl TraitShapeRule for Dropout2d {
    fn kind(&self) -> LayerKind {
        LayerKind::Dropout2d
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        DROPOUT_FIELDS
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        Ok(identity(inputs))
    }
}
