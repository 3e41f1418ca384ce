/*
 * 输入层：没有输入端口，输出直接由用户参数构造
 *
 * 未设置的参数退化为对应的符号占位（batch→N，特征/通道→C，高→H，宽→W，序列长→L）。
 */

mod image;
mod tabular;
mod timeseries;

pub use image::{ColorMode, ImageInput};
pub use tabular::TabularInput;
pub use timeseries::TimeseriesInput;
