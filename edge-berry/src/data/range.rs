//! 强度归一化: 将任意数值类型的体数据线性映射为边缘检测器所需的 8-bit 灰度.

use ndarray::{Array3, ArrayView3, CowArray, Ix3};

use super::Voxel;
use crate::consts::NORMALIZE_SCALE;
use crate::error::{EdgeError, EdgeResult};

/// 体数据强度范围, 包含最小值和最大值.
///
/// 该范围是只读的. 若要修改范围, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntensityRange {
    min: f64,
    max: f64,
}

impl IntensityRange {
    /// 构建强度范围.
    ///
    /// - 当 `min` 或 `max` 不是有限数, 或 `min > max` 时, 返回 `Err(EdgeError::InvalidParameter)`;
    /// - 当 `min == max` 时, 缩放除数为零, 返回 `Err(EdgeError::DegenerateRange)`;
    /// - 当 `max - min` 超出 `f64` 表示范围时, 返回 `Err(EdgeError::InvalidParameter)`.
    pub fn new(min: f64, max: f64) -> EdgeResult<Self> {
        if !min.is_finite() || !max.is_finite() {
            return Err(EdgeError::invalid(
                "range",
                format!("范围端点必须为有限数, 实际为 [{min}, {max}]"),
            ));
        }
        if min > max {
            return Err(EdgeError::invalid(
                "range",
                format!("下限 {min} 大于上限 {max}"),
            ));
        }
        if min == max {
            return Err(EdgeError::DegenerateRange(min));
        }
        if !(max - min).is_finite() {
            return Err(EdgeError::invalid(
                "range",
                format!("范围宽度溢出, 实际为 [{min}, {max}]"),
            ));
        }
        Ok(Self { min, max })
    }

    /// 统计 `volume` 全部样本的强度范围.
    ///
    /// 空体数据或存在非有限样本 (inf, NaN) 时返回 `Err(EdgeError::InvalidParameter)`;
    /// 全部样本相等时返回 `Err(EdgeError::DegenerateRange)`.
    pub fn of<T: Voxel>(volume: ArrayView3<'_, T>) -> EdgeResult<Self> {
        let mut samples = volume.iter().map(|v| v.to_f64());
        let Some(first) = samples.next() else {
            return Err(EdgeError::invalid("volume", "体数据为空"));
        };
        let (mut min, mut max) = (first, first);
        for v in std::iter::once(first).chain(samples) {
            if !v.is_finite() {
                return Err(EdgeError::invalid(
                    "volume",
                    format!("存在非有限样本 {v}"),
                ));
            }
            min = min.min(v);
            max = max.max(v);
        }
        Self::new(min, max)
    }

    /// 下限.
    #[inline]
    pub fn min(&self) -> f64 {
        self.min
    }

    /// 上限.
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// 范围宽度. 恒为正数.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// 求在当前范围下, 样本 `v` 对应的灰度值 (0 <= value <= 255).
    ///
    /// 下限映射为 0, 上限恰好映射为 255. 范围外的值饱和到两端.
    #[inline]
    pub fn eval(&self, v: f64) -> u8 {
        // `as` 截断即 floor (非负部分), 负数和 NaN 饱和为 0.
        (NORMALIZE_SCALE * (v - self.min) / self.width()) as u8
    }
}

/// 将体数据归一化为 `u8` 灰度体数据.
///
/// 1. 若样本类型本身就是 `u8`, 直接借用原数据返回, 不做任何缩放;
/// 2. 若体数据为空, 返回同形状的空 `u8` 体数据;
/// 3. 否则按 [`IntensityRange::of`] 统计范围后逐体素映射. 常量体数据返回
///   `Err(EdgeError::DegenerateRange)`.
pub fn normalize<T: Voxel>(volume: ArrayView3<'_, T>) -> EdgeResult<CowArray<'_, u8, Ix3>> {
    if let Some(gray) = T::as_gray(volume) {
        return Ok(CowArray::from(gray));
    }
    if volume.is_empty() {
        return Ok(CowArray::from(Array3::<u8>::zeros(volume.raw_dim())));
    }
    let range = IntensityRange::of(volume.view())?;
    log::debug!(
        "normalize {:?}: range [{}, {}]",
        volume.shape(),
        range.min(),
        range.max()
    );
    Ok(CowArray::from(volume.mapv(|v| range.eval(v.to_f64()))))
}

#[cfg(test)]
mod tests {
    use super::{normalize, IntensityRange};
    use crate::error::EdgeError;
    use ndarray::{Array3, ShapeBuilder};

    #[test]
    fn test_range_invalid_input() {
        assert!(matches!(
            IntensityRange::new(1.0, 0.0),
            Err(EdgeError::InvalidParameter { .. })
        ));
        assert!(matches!(
            IntensityRange::new(f64::NAN, 1.0),
            Err(EdgeError::InvalidParameter { .. })
        ));
        assert_eq!(
            IntensityRange::new(3.0, 3.0),
            Err(EdgeError::DegenerateRange(3.0))
        );
    }

    #[test]
    fn test_range_eval() {
        // [60, 100]
        let r = IntensityRange::new(60.0, 100.0).unwrap();
        assert_eq!(r.eval(f64::NAN), 0);
        assert_eq!(r.eval(f64::MIN), 0);
        assert_eq!(r.eval(f64::MAX), 255);

        assert_eq!(r.eval(50.0), 0);
        assert_eq!(r.eval(60.0), 0);
        assert_eq!(r.eval(70.0), 63);
        assert_eq!(r.eval(80.0), 127);
        assert_eq!(r.eval(90.0), 191);

        // 最大值不会因为截断落到 254.
        assert_eq!(r.eval(99.999), 255);
        assert_eq!(r.eval(100.0), 255);
    }

    #[test]
    fn test_normalize_u8_identity() {
        let data = Array3::from_shape_fn((3, 4, 5), |(z, h, w)| (z * 20 + h * 5 + w) as u8);
        let gray = normalize(data.view()).unwrap();
        assert!(gray.is_view());
        assert_eq!(gray, data);

        // 即使不满 [0, 255] 也不重新缩放.
        let narrow = Array3::<u8>::from_elem((2, 2, 2), 9);
        assert_eq!(normalize(narrow.view()).unwrap(), narrow);
    }

    #[test]
    fn test_normalize_full_range() {
        let data = Array3::from_shape_fn((4, 3, 2), |(z, h, w)| {
            -1000.0f32 + 37.5 * (z * 6 + h * 2 + w) as f32
        });
        let gray = normalize(data.view()).unwrap();
        assert_eq!(gray.shape(), data.shape());
        assert_eq!(gray.iter().copied().min(), Some(0));
        assert_eq!(gray.iter().copied().max(), Some(255));
        assert_eq!(gray[(0, 0, 0)], 0);
        assert_eq!(gray[(3, 2, 1)], 255);

        // 单调性.
        let flat: Vec<u8> = gray.iter().copied().collect();
        assert!(flat.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_normalize_integer_and_layout() {
        // Fortran 布局不应影响结果.
        let data = Array3::from_shape_fn((2, 3, 4).f(), |(z, h, w)| (z * 12 + h * 4 + w) as i16);
        let gray = normalize(data.view()).unwrap();
        assert_eq!(gray[(0, 0, 0)], 0);
        assert_eq!(gray[(1, 2, 3)], 255);
        assert_eq!(gray[(0, 0, 1)], (255.999999f64 / 23.0) as u8);
    }

    #[test]
    fn test_normalize_degenerate() {
        let data = Array3::<f64>::from_elem((3, 3, 3), 42.0);
        assert_eq!(
            normalize(data.view()).unwrap_err(),
            EdgeError::DegenerateRange(42.0)
        );
    }

    #[test]
    fn test_range_width_overflow() {
        assert!(matches!(
            IntensityRange::new(-f64::MAX, f64::MAX),
            Err(EdgeError::InvalidParameter { name: "range", .. })
        ));
        assert!(IntensityRange::new(0.0, f64::MAX).is_ok());

        let mut data = Array3::<f64>::zeros((1, 1, 3));
        data[(0, 0, 0)] = -f64::MAX;
        data[(0, 0, 2)] = f64::MAX;
        assert!(matches!(
            normalize(data.view()),
            Err(EdgeError::InvalidParameter { name: "range", .. })
        ));
    }

    #[test]
    fn test_normalize_non_finite_and_empty() {
        let mut data = Array3::<f32>::zeros((2, 2, 2));
        data[(1, 1, 1)] = f32::NAN;
        assert!(matches!(
            normalize(data.view()),
            Err(EdgeError::InvalidParameter { name: "volume", .. })
        ));

        let empty = Array3::<f32>::zeros((0, 3, 3));
        let gray = normalize(empty.view()).unwrap();
        assert_eq!(gray.shape(), &[0, 3, 3]);
    }
}
