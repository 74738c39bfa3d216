//! OpenCV canny 后端. 需要打开 `opencv` feature.

use ndarray::{Array2, ArrayView2};
use opencv::core::{Mat, MatTraitConst};
use opencv::imgproc;

use super::SliceEdgeDetector;
use crate::error::{EdgeError, EdgeResult};

/// 基于 `opencv::imgproc::canny` 的边缘检测器.
///
/// 默认参数下与 [`super::CannyDetector`] 的结果一致, 额外支持 5, 7 孔径和 L2 梯度.
#[derive(Copy, Clone, Debug)]
pub struct OpencvCanny {
    /// Sobel 算子孔径大小, 必须为 3, 5 或 7.
    pub aperture: i32,

    /// 是否使用 L2 范数计算梯度幅值.
    pub l2_gradient: bool,
}

impl Default for OpencvCanny {
    fn default() -> Self {
        Self {
            aperture: 3,
            l2_gradient: false,
        }
    }
}

#[inline]
fn cv_err(e: opencv::Error) -> EdgeError {
    EdgeError::Detector(e.to_string())
}

impl SliceEdgeDetector for OpencvCanny {
    fn detect(&self, slice: ArrayView2<'_, u8>, low: f64, high: f64) -> EdgeResult<Array2<u8>> {
        let (h, w) = slice.dim();
        if h == 0 || w == 0 {
            return Ok(Array2::zeros((h, w)));
        }

        let contiguous = slice.as_standard_layout();
        let raw = contiguous
            .as_slice()
            .ok_or_else(|| EdgeError::Detector("切片无法转换为连续内存".to_string()))?;
        let in_mat = Mat::from_slice_rows_cols(raw, h, w).map_err(cv_err)?;
        let mut out_mat = Mat::default();
        imgproc::canny(&in_mat, &mut out_mat, low, high, self.aperture, self.l2_gradient)
            .map_err(cv_err)?;

        let found = [out_mat.rows() as usize, out_mat.cols() as usize];
        if found != [h, w] {
            return Err(EdgeError::shape(&[h, w], &found));
        }

        let mut out = Array2::<u8>::zeros((h, w));
        for ((y, x), p) in out.indexed_iter_mut() {
            *p = *out_mat.at_2d::<u8>(y as i32, x as i32).map_err(cv_err)?;
        }
        Ok(out)
    }
}
