/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 时间序列输入层
 *
 * 默认通道在前：(batch, features, seq_len)，标签 "NCL"；
 * `channels_last`为真时输出 (batch, seq_len, features)，标签 "NLC"。
 */

use crate::errors::ShapeError;
use crate::nn::layout::{OrderLabel, ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule};
use crate::nn::shape::{Dim, ShapeDescriptor, Symbol};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeseriesInput {
    pub batch_size: Option<usize>,
    pub num_features: Option<usize>,
    pub sequence_length: Option<usize>,
    pub channels_last: bool,
}

impl Default for TimeseriesInput {
    fn default() -> Self {
        Self {
            batch_size: Some(32),
            num_features: None,
            sequence_length: None,
            channels_last: false,
        }
    }
}

impl TraitShapeRule for TimeseriesInput {
    fn kind(&self) -> LayerKind {
        LayerKind::TimeseriesInput
    }

    fn arity(&self) -> usize {
        0
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("batch_size", FieldRule::PositiveInt),
            ("num_features", FieldRule::PositiveInt),
            ("sequence_length", FieldRule::PositiveInt),
            ("channels_last", FieldRule::Flag),
        ]
    }

    fn infer(&self, _inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let batch = Dim::or_symbol(self.batch_size, Symbol::N);
        let features = Dim::or_symbol(self.num_features, Symbol::C);
        let length = Dim::or_symbol(self.sequence_length, Symbol::L);

        let meta = if self.channels_last {
            TensorMeta::new(
                ShapeDescriptor::new(&[batch, length, features]),
                OrderLabel::new("NLC"),
            )?
        } else {
            TensorMeta::new(
                ShapeDescriptor::new(&[batch, features, length]),
                OrderLabel::new("NCL"),
            )?
        };
        Ok(meta.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_channels_first_with_batch_32() {
        let slot = TimeseriesInput::default().infer(&[]).unwrap();
        assert_eq!(slot.to_string(), "(32, C, L)");
        assert_eq!(slot.order().unwrap().as_str(), "NCL");
    }

    #[test]
    fn test_channels_last() {
        let input = TimeseriesInput {
            batch_size: None,
            num_features: Some(8),
            sequence_length: Some(100),
            channels_last: true,
        };
        let slot = input.infer(&[]).unwrap();
        assert_eq!(slot.to_string(), "(N, 100, 8)");
        assert_eq!(slot.order().unwrap().as_str(), "NLC");
    }
}
