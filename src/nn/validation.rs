/*
 * @Author       : 老董
 * @Date         : 2026-03-02
 * @Description  : 参数字段校验：每个可编辑字段对应一条取值规则
 *
 * 校验失败只会给该字段挂上错误信息并拒绝提交，不影响其它字段，也不会触发传播。
 */

use crate::errors::ComparisonOperator;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// 单个字段的取值规则（`null` 一律表示“未设置”，总是合法）
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldRule {
    /// 正整数（如核大小、通道数）
    PositiveInt,
    /// 非负整数（如填充、维度下标）
    NonNegativeInt,
    /// [0, 1] 内的实数（如 dropout 概率）
    Probability,
    /// 正实数（如 eps）
    PositiveReal,
    /// 布尔开关（不可为空）
    Flag,
    /// 文本
    Text,
}

/// 字段级错误：只属于一个节点的一个字段
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }

    pub(crate) fn comparison(field: &str, operator: ComparisonOperator, threshold: usize) -> Self {
        Self::new(field, format!("{field}须{operator}{threshold}"))
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl FieldRule {
    /// 检查`value`是否满足本规则
    ///
    /// # 示例
    /// ```
    /// use shape_flow::nn::FieldRule;
    /// use serde_json::json;
    ///
    /// assert!(FieldRule::PositiveInt.check("kernel_size", &json!(3)).is_ok());
    /// assert!(FieldRule::PositiveInt.check("kernel_size", &json!(null)).is_ok());
    /// let err = FieldRule::PositiveInt.check("kernel_size", &json!(0)).unwrap_err();
    /// assert_eq!(err.message, "kernel_size须>0");
    /// ```
    pub fn check(&self, field: &str, value: &Value) -> Result<(), FieldError> {
        let value = &self.canonical(value);
        match self {
            Self::Flag => {
                return if value.is_boolean() {
                    Ok(())
                } else {
                    Err(FieldError::new(field, format!("{field}须为布尔值")))
                };
            }
            Self::Text => {
                return if value.is_null() || value.is_string() {
                    Ok(())
                } else {
                    Err(FieldError::new(field, format!("{field}须为文本")))
                };
            }
            _ => {}
        }

        if value.is_null() {
            return Ok(());
        }
        let Some(number) = value.as_f64() else {
            return Err(FieldError::new(field, format!("{field}须为数字")));
        };

        match self {
            Self::PositiveInt | Self::NonNegativeInt => {
                if number.fract() != 0.0 {
                    return Err(FieldError::new(field, format!("{field}须为整数")));
                }
                if !(value.is_i64() || value.is_u64()) {
                    return Err(FieldError::new(field, format!("{field}超出可表示范围")));
                }
                let (operator, threshold) = match self {
                    Self::PositiveInt => (ComparisonOperator::GreaterThan, 0),
                    _ => (ComparisonOperator::GreaterOrEqual, 0),
                };
                if !operator.holds(number, threshold as f64) {
                    return Err(FieldError::comparison(field, operator, threshold));
                }
            }
            Self::Probability => {
                if !ComparisonOperator::GreaterOrEqual.holds(number, 0.0) {
                    return Err(FieldError::comparison(
                        field,
                        ComparisonOperator::GreaterOrEqual,
                        0,
                    ));
                }
                if !ComparisonOperator::LessOrEqual.holds(number, 1.0) {
                    return Err(FieldError::comparison(
                        field,
                        ComparisonOperator::LessOrEqual,
                        1,
                    ));
                }
            }
            Self::PositiveReal => {
                if !ComparisonOperator::GreaterThan.holds(number, 0.0) {
                    return Err(FieldError::comparison(
                        field,
                        ComparisonOperator::GreaterThan,
                        0,
                    ));
                }
            }
            Self::Flag | Self::Text => {}
        }
        Ok(())
    }
}

impl FieldRule {
    /// 整数字段接受没有小数部分的实数写法（如`3.0`、`1e3`），统一换成整数
    ///
    /// # 示例
    /// ```
    /// use shape_flow::nn::FieldRule;
    /// use serde_json::json;
    ///
    /// assert_eq!(FieldRule::PositiveInt.canonical(&json!(3.0)), json!(3));
    /// assert_eq!(FieldRule::PositiveInt.canonical(&json!(2.5)), json!(2.5));
    /// assert_eq!(FieldRule::Probability.canonical(&json!(1.0)), json!(1.0));
    /// ```
    pub fn canonical(&self, value: &Value) -> Value {
        if !matches!(self, Self::PositiveInt | Self::NonNegativeInt) {
            return value.clone();
        }
        let Some(number) = value.as_f64().filter(|_| value.is_f64()) else {
            return value.clone();
        };
        if number.fract() != 0.0 {
            return value.clone();
        }
        // 2^64 与 -2^63 都能被 f64 精确表示
        if (0.0..18_446_744_073_709_551_616.0).contains(&number) {
            Value::from(number as u64)
        } else if (-9_223_372_036_854_775_808.0..0.0).contains(&number) {
            Value::from(number as i64)
        } else {
            value.clone()
        }
    }
}

/// 把界面输入框中的原始文本解析为字段值
///
/// - 空白文本 → `null`（未设置）
/// - 合法的 JSON 标量（数字、布尔）→ 对应的值
/// - 其它 → 字符串（交给字段规则判断是否接受）
pub fn parse_raw_field(raw: &str) -> Value {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Value::Null;
    }
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) if !value.is_object() && !value.is_array() => value,
        _ => Value::String(trimmed.to_string()),
    }
}
