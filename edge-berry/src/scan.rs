//! 沿单个轴逐切片运行 2D 边缘检测, 并重组为 3D 边缘掩码.

use ndarray::{Array3, ArrayView2, ArrayView3, ArrayViewMut2};

use crate::data::check_axis;
use crate::detect::SliceEdgeDetector;
use crate::error::{EdgeError, EdgeResult};

cfg_if::cfg_if! {
    if #[cfg(feature = "rayon")] {
        use rayon::iter::{IndexedParallelIterator, IntoParallelIterator, ParallelIterator};
    }
}

/// 对 `gray` 沿 `axis` 的每一个切片运行 `detector`, 返回与 `gray` 同形状的边缘掩码.
///
/// 第 `i` 个切片即 `gray.index_axis(Axis(axis), i)`, 其余两个轴保持原顺序.
/// 检测结果按相同顺序写回第 `i` 个切片位置, 与执行顺序无关.
///
/// # 错误
///
/// - `axis` 不是 0, 1 或 2 时返回 `Err(EdgeError::InvalidParameter)`;
/// - 检测器返回的形状与切片不一致时返回 `Err(EdgeError::ShapeMismatch)`;
/// - 检测器自身的错误原样返回.
///
/// 空体数据不会调用检测器.
pub fn scan_axis<D>(
    gray: ArrayView3<'_, u8>,
    axis: usize,
    low: f64,
    high: f64,
    detector: &D,
) -> EdgeResult<Array3<u8>>
where
    D: SliceEdgeDetector + ?Sized,
{
    let ax = check_axis(axis)?;
    let mut edges = Array3::<u8>::zeros(gray.raw_dim());
    if gray.is_empty() {
        return Ok(edges);
    }
    log::trace!(
        "scan axis {axis}: {} slices of {:?}",
        gray.len_of(ax),
        gray.index_axis(ax, 0).shape()
    );

    let scan_one =
        |(mut dst, src): (ArrayViewMut2<'_, u8>, ArrayView2<'_, u8>)| -> EdgeResult<()> {
            let mask = detector.detect(src, low, high)?;
            if mask.dim() != dst.dim() {
                return Err(EdgeError::shape(dst.shape(), mask.shape()));
            }
            dst.assign(&mask);
            Ok(())
        };

    #[cfg(feature = "rayon")]
    edges
        .axis_iter_mut(ax)
        .into_par_iter()
        .zip(gray.axis_iter(ax).into_par_iter())
        .try_for_each(scan_one)?;
    #[cfg(not(feature = "rayon"))]
    edges
        .axis_iter_mut(ax)
        .zip(gray.axis_iter(ax))
        .try_for_each(scan_one)?;

    Ok(edges)
}
