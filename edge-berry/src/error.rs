//! 运行时错误.

use thiserror::Error;

/// 边缘提取流程中的运行时错误.
///
/// 所有错误都会原样传递给调用者, 库内部不会重试或吞掉错误.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EdgeError {
    /// 体数据动态范围为零 (所有样本都等于该值), 无法线性缩放到 8-bit.
    #[error("体数据强度范围退化: 所有样本都等于 {0}")]
    DegenerateRange(f64),

    /// 切片提取或重组得到的形状与源数据不一致.
    #[error("形状不一致: 期望 {expected:?}, 实际 {found:?}")]
    ShapeMismatch {
        /// 期望的形状.
        expected: Vec<usize>,

        /// 实际得到的形状.
        found: Vec<usize>,
    },

    /// 参数不在合法范围内.
    #[error("参数 `{name}` 非法: {reason}")]
    InvalidParameter {
        /// 参数名.
        name: &'static str,

        /// 非法原因.
        reason: String,
    },

    /// 外部 2D 边缘检测器自身报告的错误.
    #[error("切片边缘检测失败: {0}")]
    Detector(String),
}

impl EdgeError {
    /// 构造 [`EdgeError::InvalidParameter`].
    #[inline]
    pub(crate) fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name,
            reason: reason.into(),
        }
    }

    /// 构造 [`EdgeError::ShapeMismatch`].
    #[inline]
    pub(crate) fn shape(expected: &[usize], found: &[usize]) -> Self {
        Self::ShapeMismatch {
            expected: expected.to_vec(),
            found: found.to_vec(),
        }
    }
}

/// 边缘提取运行时结果.
pub type EdgeResult<T> = Result<T, EdgeError>;

/// 检查 `value` 是否为有限非负数. 是则原样返回, 否则返回 `InvalidParameter`.
pub(crate) fn check_non_negative(name: &'static str, value: f64) -> EdgeResult<f64> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(EdgeError::invalid(name, format!("应为有限非负数, 实际为 {value}")))
    }
}
