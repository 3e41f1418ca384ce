/*
 * @Author       : 老董
 * @Date         : 2024-02-04 20:37:13
 * @LastEditors  : 老董
 * @LastEditTime : 2026-03-06
 * @Description  : 图中节点的显示格式化
 */

use super::NodeId;

/// 格式化节点的显示
///
/// # Arguments
/// * `id` - 节点ID
/// * `type_name` - 层类型名称
///
/// # Returns
/// 返回格式化后的字符串，格式为：`节点[id={}, type={}]`
pub(in crate::nn) fn format_node_display(id: NodeId, type_name: &str) -> String {
    format!("节点[id={}, type={}]", id, type_name)
}
