/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块：节点/连线图的存储与形状传播
 *
 * 公开 API：
 * - `Graph`: 用户级句柄（带字段编辑的防抖）
 * - `GraphInner`: 底层实现（所有变更 + 传播）
 * - `GraphError`: 错误类型
 */

mod error;
mod handle;
mod inner;
mod types;

pub use error::GraphError;
pub use handle::{FieldCommit, Graph};
pub use inner::GraphInner;
pub use types::{
    AxisMove, Edge, EdgeId, EdgeView, InputPort, NodeView, ParamUpdate, PropagationReport,
};
