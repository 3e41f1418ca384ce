/*
 * @Author       : 老董
 * @Date         : 2026-03-08
 * @Description  : 图的配置项
 */

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// 图的配置（缺省字段取默认值）
///
/// # 示例
/// ```
/// use shape_flow::nn::GraphConfig;
///
/// let config = GraphConfig::from_json(r#"{"debounce_ms": 350}"#).unwrap();
/// assert_eq!(config.name, "default_graph");
/// assert_eq!(config.quiet_period().as_millis(), 350);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// 图名称
    pub name: String,
    /// 字段编辑的防抖静默期（毫秒）
    pub debounce_ms: u64,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            name: "default_graph".to_string(),
            debounce_ms: 200,
        }
    }
}

impl GraphConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn quiet_period(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
