/*
 * @Author       : 老董
 * @Date         : 2026-03-03
 * @Description  : 图像输入层，输出 (batch, channels, height, width)，标签 "NCHW"
 */

use crate::errors::ShapeError;
use crate::nn::layout::{OrderLabel, ShapeSlot, TensorMeta};
use crate::nn::nodes::raw_node::{LayerKind, TraitShapeRule};
use crate::nn::shape::{Dim, ShapeDescriptor, Symbol};
use crate::nn::validation::FieldRule;
use serde::{Deserialize, Serialize};

/// 界面上的“黑白/彩色”切换，对应通道数 1/3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Grayscale,
    Rgb,
}

impl ColorMode {
    pub const fn num_channels(&self) -> usize {
        match self {
            Self::Grayscale => 1,
            Self::Rgb => 3,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageInput {
    pub batch_size: Option<usize>,
    pub num_channels: Option<usize>,
    pub height: Option<usize>,
    pub width: Option<usize>,
}

impl ImageInput {
    pub fn new(batch_size: usize, num_channels: usize, height: usize, width: usize) -> Self {
        Self {
            batch_size: Some(batch_size),
            num_channels: Some(num_channels),
            height: Some(height),
            width: Some(width),
        }
    }

    pub fn with_color_mode(mut self, mode: ColorMode) -> Self {
        self.num_channels = Some(mode.num_channels());
        self
    }

    /// 当前通道数对应的颜色模式（1/3之外的通道数没有对应模式）
    pub fn color_mode(&self) -> Option<ColorMode> {
        match self.num_channels {
            Some(1) => Some(ColorMode::Grayscale),
            Some(3) => Some(ColorMode::Rgb),
            _ => None,
        }
    }
}

impl TraitShapeRule for ImageInput {
    fn kind(&self) -> LayerKind {
        LayerKind::ImageInput
    }

    fn arity(&self) -> usize {
        0
    }

    fn field_rules(&self) -> &'static [(&'static str, FieldRule)] {
        &[
            ("batch_size", FieldRule::PositiveInt),
            ("num_channels", FieldRule::PositiveInt),
            ("height", FieldRule::PositiveInt),
            ("width", FieldRule::PositiveInt),
        ]
    }

    fn infer(&self, _inputs: &[ShapeSlot]) -> Result<ShapeSlot, ShapeError> {
        let shape = ShapeDescriptor::new(&[
            Dim::or_symbol(self.batch_size, Symbol::N),
            Dim::or_symbol(self.num_channels, Symbol::C),
            Dim::or_symbol(self.height, Symbol::H),
            Dim::or_symbol(self.width, Symbol::W),
        ]);
        Ok(TensorMeta::new(shape, OrderLabel::new("NCHW"))?.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_mode() {
        let input = ImageInput::default().with_color_mode(ColorMode::Rgb);
        assert_eq!(input.num_channels, Some(3));
        assert_eq!(input.color_mode(), Some(ColorMode::Rgb));
        assert_eq!(
            ImageInput::default()
                .with_color_mode(ColorMode::Grayscale)
                .infer(&[])
                .unwrap()
                .to_string(),
            "(N, 1, H, W)"
        );
        assert_eq!(ImageInput::default().color_mode(), None);
    }
}
