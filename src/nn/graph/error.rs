/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Graph 模块的错误类型
 *
 * 这里只包含调用方用错接口的情况（节点不存在、成环、端口占用等），此时图保持不变；
 * 形状规则在结构上无法成立属于节点数据（见`ShapeError`），不会以`Err`的形式返回。
 */

use super::types::{EdgeId, InputPort};
use crate::nn::NodeId;
use crate::nn::nodes::LayerKind;
use thiserror::Error;

/// Graph 操作错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("节点{0}不存在")]
    NodeNotFound(NodeId),
    #[error("连线{0}不存在")]
    EdgeNotFound(EdgeId),
    #[error("连接{from}→{to}会形成环")]
    CycleDetected { from: NodeId, to: NodeId },
    #[error("节点{target}的输入端口{port}已被占用")]
    PortOccupied { target: NodeId, port: InputPort },
    #[error("节点{target}没有空闲的输入端口")]
    NoFreePort { target: NodeId },
    #[error("节点{target}只有{arity}个输入端口，不存在端口{port}")]
    InvalidPort {
        target: NodeId,
        port: InputPort,
        arity: usize,
    },
    #[error("{0}没有输出，不能作为连线的起点")]
    NoOutput(String),
    #[error("{0}没有输入端口，不能作为连线的终点")]
    NoInputPort(String),
    #[error("节点{node}没有可编辑的字段`{field}`")]
    UnknownField { node: NodeId, field: String },
    #[error("期望的层类型为{expected}，实际为{got}")]
    KindMismatch { expected: LayerKind, got: LayerKind },
    #[error("{0}")]
    InvalidOperation(String),
    #[error("序列化失败：{0}")]
    Serialization(String),
}

impl From<serde_json::Error> for GraphError {
    fn from(error: serde_json::Error) -> Self {
        Self::Serialization(error.to_string())
    }
}
