/*
 * @Author       : 老董
 * @Date         : 2026-03-05
 * @Description  : 拼接层：两个输入沿`dim`拼接
 *
 * 两个输入维数须相同；拼接维上两个确定值相加，否则取符号。
 * 其余维上两个确定值须相等；只要有一方是符号就视为兼容并保留该符号，
 * 之后符号一旦被具体数值取代，规则会随传播重新执行并在那时报出不匹配。
 * 输出的维度标签取第一个输入的。
 */

use crate::errors::ShapeError;
use crate::nn::layout::ShapeSlot;
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule};
use crate::nn::shape::{Dim, ShapeDescriptor};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Concat {
    pub dim: usize,
}

impl Concat {
    pub fn new(dim: usize) -> Self {
        Self { dim }
    }
}

fn merge_axis(axis: usize, is_concat_axis: bool, left: Dim, right: Dim) -> Result<Dim, ShapeError> {
    match (left, right) {
        (Dim::Fixed(a), Dim::Fixed(b)) if is_concat_axis => {
            a.checked_add(b)
                .map(Dim::Fixed)
                .ok_or(ShapeError::DimOverflow {
                    layer: LayerKind::Concat.display_name(),
                    axis,
                })
        }
        (Dim::Fixed(a), Dim::Fixed(b)) if a != b => Err(ShapeError::ConcatAxisMismatch {
            axis,
            left: a,
            right: b,
        }),
        (Dim::Symbol(_), _) | (Dim::Fixed(_), Dim::Fixed(_)) => Ok(left),
        (Dim::Fixed(_), Dim::Symbol(_)) => Ok(right),
    }
}

impl TraitShapeRule for Concat {
    fn kind(&self) -> LayerKind {
        LayerKind::Concat
    }

    fn arity(&self) -> usize {
        2
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[("dim", FieldRule::NonNegativeInt)]
    }

    fn infer(&self, inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let (Some(first), Some(second)) = (
            inputs.first().and_then(ShapeSlot::meta),
            inputs.get(1).and_then(ShapeSlot::meta),
        ) else {
            return Ok(ShapeSlot::NotConnected);
        };

        if first.rank() != second.rank() {
            return Err(ShapeError::ConcatRankMismatch {
                left: first.rank(),
                right: second.rank(),
            });
        }
        if self.dim >= first.rank() {
            return Err(ShapeError::AxisOutOfRange {
                layer: self.kind().display_name(),
                axis: self.dim,
                rank: first.rank(),
            });
        }

        let shape = first
            .shape()
            .dims()
            .iter()
            .zip(second.shape().dims())
            .enumerate()
            .map(|(axis, (&left, &right))| merge_axis(axis, axis == self.dim, left, right))
            .collect::<Result<ShapeDescriptor, _>>()?;
        Ok(first.with_shape(shape)?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::nn::shape::Symbol;

    #[test]
    fn test_merge_axis() {
        let n = Dim::Symbol(Symbol::N);
        assert_eq!(merge_axis(1, true, Dim::Fixed(3), Dim::Fixed(5)), Ok(Dim::Fixed(8)));
        assert_eq!(merge_axis(1, true, n, Dim::Fixed(5)), Ok(n));
        assert_eq!(merge_axis(1, true, Dim::Fixed(5), n), Ok(n));
        assert_eq!(merge_axis(0, false, Dim::Fixed(4), n), Ok(n));
        assert_eq!(merge_axis(0, false, Dim::Fixed(4), Dim::Fixed(4)), Ok(Dim::Fixed(4)));
        assert_eq!(
            merge_axis(2, false, Dim::Fixed(20), Dim::Fixed(10)),
            Err(ShapeError::ConcatAxisMismatch {
                axis: 2,
                left: 20,
                right: 10
            })
        );
    }
}
