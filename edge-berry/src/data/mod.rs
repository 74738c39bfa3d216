//! 体数据样本类型与轴相关的基础操作.

use ndarray::{ArrayView3, Axis};

use crate::consts::NDIM;
use crate::error::{EdgeError, EdgeResult};

pub mod edge;
pub mod range;

pub use edge::EdgeData;
pub use range::{normalize, IntensityRange};

/// 可作为体素样本的数值类型.
///
/// 只有 `u8` 是边缘检测器可以直接消费的灰度类型, 这一点由 [`Voxel::as_gray`]
/// 在编译期区分, 而不是在运行时比较类型.
pub trait Voxel: Copy + PartialOrd + Send + Sync + 'static {
    /// 扩展为 `f64`. 对 64 位整数可能损失精度.
    fn to_f64(self) -> f64;

    /// 由 `f64` 转换回样本类型. 浮点数直接转换; 整数四舍五入后饱和截断.
    fn from_f64(v: f64) -> Self;

    /// 如果样本类型本身就是 `u8`, 则原样返回同一份视图; 否则返回 `None`.
    #[inline]
    fn as_gray(_volume: ArrayView3<'_, Self>) -> Option<ArrayView3<'_, u8>> {
        None
    }
}

macro_rules! impl_voxel_float {
    ($($t: ty),*) => {
        $(
            impl Voxel for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(v: f64) -> Self {
                    v as $t
                }
            }
        )*
    };
}

macro_rules! impl_voxel_int {
    ($($t: ty),*) => {
        $(
            impl Voxel for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                /// `as` 对越界值饱和, 对 NaN 取 0.
                #[inline]
                fn from_f64(v: f64) -> Self {
                    v.round() as $t
                }
            }
        )*
    };
}

impl_voxel_float!(f32, f64);
impl_voxel_int!(i8, u16, i16, u32, i32, u64, i64);

impl Voxel for u8 {
    #[inline]
    fn to_f64(self) -> f64 {
        self as f64
    }

    #[inline]
    fn from_f64(v: f64) -> Self {
        v.round() as u8
    }

    #[inline]
    fn as_gray(volume: ArrayView3<'_, u8>) -> Option<ArrayView3<'_, u8>> {
        Some(volume)
    }
}

/// 检查 `axis` 是否是合法的切片轴 (0, 1 或 2).
pub fn check_axis(axis: usize) -> EdgeResult<Axis> {
    if axis < NDIM {
        Ok(Axis(axis))
    } else {
        Err(EdgeError::invalid(
            "axis",
            format!("切片轴必须为 0, 1 或 2, 实际为 {axis}"),
        ))
    }
}
