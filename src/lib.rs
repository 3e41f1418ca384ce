//! # Shape Flow
//!
//! `shape_flow`负责在可视化搭建神经网络（拖拽层节点、连线）时，
//! 为图中每个节点实时推导张量形状：节点参数或上游连线一旦变化，
//! 就把新的形状沿连线增量传播到所有下游节点。
//!
//! 本crate只处理形状元数据，不做渲染、持久化、代码生成或数值计算。
//!
//! ```
//! use shape_flow::nn::{Conv2d, Graph, ImageInput};
//!
//! let graph = Graph::new();
//! let image = graph.add_node(ImageInput::new(32, 3, 28, 28));
//! let conv = graph.add_node(Conv2d::new(16, 3));
//! graph.connect(image, conv, None).unwrap();
//! assert_eq!(graph.node_output(conv).unwrap().to_string(), "(32, 16, 26, 26)");
//! ```

pub mod errors;
pub mod nn;
mod utils;
