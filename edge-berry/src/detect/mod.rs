//! 2D 切片边缘检测能力.
//!
//! 核心流程只依赖 [`SliceEdgeDetector`] 这一窄接口. 任何满足约定的 2D
//! 边缘检测实现 (包括手写的检测器) 都可以替换默认的 [`CannyDetector`],
//! 而无需改动投票聚合逻辑.

mod canny;

pub use canny::CannyDetector;

cfg_if::cfg_if! {
    if #[cfg(feature = "opencv")] {
        mod cv;

        pub use cv::OpencvCanny;
    }
}

use ndarray::{Array2, ArrayView2};

use crate::error::EdgeResult;

/// 2D 切片边缘检测器.
///
/// # 约定
///
/// 1. 输入为 `u8` 灰度切片 `slice`, 以及滞后阈值 `low` 和 `high`;
/// 2. 输出为与 `slice` 同形状的二值图, 非零代表边缘, 零代表非边缘;
/// 3. 对每个切片的调用相互独立且无状态, 因此允许并行调用.
///
/// `low <= high` 是期望的输入, 违反时的行为由具体实现决定.
pub trait SliceEdgeDetector: Sync {
    /// 检测 `slice` 的边缘.
    fn detect(&self, slice: ArrayView2<'_, u8>, low: f64, high: f64) -> EdgeResult<Array2<u8>>;
}

impl<D: SliceEdgeDetector + ?Sized> SliceEdgeDetector for &D {
    #[inline]
    fn detect(&self, slice: ArrayView2<'_, u8>, low: f64, high: f64) -> EdgeResult<Array2<u8>> {
        (**self).detect(slice, low, high)
    }
}

/// 将普通函数或闭包包装为 [`SliceEdgeDetector`].
///
/// ```
/// use edge_berry::detect::{FnDetector, SliceEdgeDetector};
/// use ndarray::{Array2, ArrayView2};
///
/// // 把高于 `high` 的像素当作边缘.
/// let bright = FnDetector::new(|s: ArrayView2<u8>, _low: f64, high: f64| {
///     s.mapv(|p| u8::from(p as f64 > high))
/// });
/// let slice = Array2::from_shape_vec((1, 3), vec![0u8, 200, 90]).unwrap();
/// let mask = bright.detect(slice.view(), 0.0, 100.0).unwrap();
/// assert_eq!(mask.as_slice().unwrap(), &[0, 1, 0]);
/// ```
#[derive(Copy, Clone, Debug)]
pub struct FnDetector<F> {
    f: F,
}

impl<F> FnDetector<F> {
    /// 包装 `f`.
    #[inline]
    pub fn new(f: F) -> Self
    where
        F: Fn(ArrayView2<'_, u8>, f64, f64) -> Array2<u8> + Sync,
    {
        Self { f }
    }
}

impl<F> SliceEdgeDetector for FnDetector<F>
where
    F: Fn(ArrayView2<'_, u8>, f64, f64) -> Array2<u8> + Sync,
{
    #[inline]
    fn detect(&self, slice: ArrayView2<'_, u8>, low: f64, high: f64) -> EdgeResult<Array2<u8>> {
        Ok((self.f)(slice, low, high))
    }
}

/// 测试用的确定性检测器.
///
/// 若像素与其任一 4-邻居的灰度差不小于 `high`, 则该像素为边缘.
/// 孤立的亮点因此会连同其 4-邻居一起被标记.
#[cfg(test)]
pub(crate) fn step_edges(slice: ArrayView2<'_, u8>, _low: f64, high: f64) -> Array2<u8> {
    use crate::consts::gray::{BLACK, WHITE};

    Array2::from_shape_fn(slice.dim(), |(h, w)| {
        let p = slice[(h, w)] as f64;
        let hit = [
            (h.wrapping_sub(1), w),
            (h.saturating_add(1), w),
            (h, w.wrapping_sub(1)),
            (h, w.saturating_add(1)),
        ]
        .into_iter()
        .filter_map(|n| slice.get(n))
        .any(|&q| (p - q as f64).abs() >= high);
        if hit {
            WHITE
        } else {
            BLACK
        }
    })
}
