/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 表格数据输入层，输出 (batch, features)，标签 "NC"
 */

use crate::errors::ShapeError;
use crate::nn::layout::{OrderLabel, ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule};
use crate::nn::shape::{Dim, ShapeDescriptor, Symbol};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TabularInput {
    pub batch_size: Option<usize>,
    pub num_features: Option<usize>,
}

impl TraitShapeRule for TabularInput {
    fn kind(&self) -> LayerKind {
        LayerKind::TabularInput
    }

    fn arity(&self) -> usize {
        0
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("batch_size", FieldRule::PositiveInt),
            ("num_features", FieldRule::PositiveInt),
        ]
    }

    fn infer(&self, _inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let shape = ShapeDescriptor::new(&[
            Dim::or_symbol(self.batch_size, Symbol::N),
            Dim::or_symbol(self.num_features, Symbol::C),
        ]);
        Ok(TensorMeta::new(shape, OrderLabel::new("NC"))?.into())
    }
}
