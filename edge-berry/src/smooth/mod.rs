//! 体数据平滑能力.

mod gaussian;

pub use gaussian::{GaussianBlur, GaussianKernel};

use ndarray::{Array3, ArrayView3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::NDIM;
use crate::data::Voxel;
use crate::error::{check_non_negative, EdgeResult};

/// 高斯平滑标准差.
///
/// 可以是各向同性的单个值, 也可以按轴分别指定. 值为 0 的轴不做平滑.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Sigma {
    /// 三个轴共用同一个标准差.
    Isotropic(f64),

    /// 按轴 `[0, 1, 2]` 分别指定标准差.
    PerAxis([f64; NDIM]),
}

impl Default for Sigma {
    /// 不做平滑.
    #[inline]
    fn default() -> Self {
        Self::Isotropic(0.0)
    }
}

impl From<f64> for Sigma {
    #[inline]
    fn from(value: f64) -> Self {
        Self::Isotropic(value)
    }
}

impl From<[f64; NDIM]> for Sigma {
    #[inline]
    fn from(value: [f64; NDIM]) -> Self {
        Self::PerAxis(value)
    }
}

impl Sigma {
    /// 第 `axis` 个轴上的标准差. 调用者保证 `axis < NDIM`.
    #[inline]
    pub(crate) fn along(&self, axis: usize) -> f64 {
        match self {
            Self::Isotropic(s) => *s,
            Self::PerAxis(s) => s[axis],
        }
    }

    /// 转换为按轴表示.
    #[inline]
    pub fn per_axis(&self) -> [f64; NDIM] {
        [self.along(0), self.along(1), self.along(2)]
    }

    /// 是否所有轴都不做平滑?
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.per_axis().iter().all(|s| *s == 0.0)
    }

    /// 检查每个轴上的标准差都是有限非负数.
    pub fn validate(&self) -> EdgeResult<()> {
        self.per_axis()
            .into_iter()
            .try_for_each(|s| check_non_negative("sigma", s).map(drop))
    }
}

/// 体数据平滑器.
///
/// # 约定
///
/// 输出与输入同形状、同数值类型. 平滑结果只用于投票计算,
/// 不会出现在最终输出中.
pub trait VolumeSmoother: Sync {
    /// 以标准差 `sigma` 平滑 `volume`.
    fn smooth<T: Voxel>(&self, volume: ArrayView3<'_, T>, sigma: &Sigma) -> EdgeResult<Array3<T>>;
}
