//! 可分离的 3D 高斯平滑.
//!
//! 截断半径为 `floor(truncate * sigma + 0.5)`, 边界按半采样对称方式反射
//! (`d c b a | a b c d | d c b a`). 对浮点数据, 结果与
//! `scipy.ndimage.gaussian_filter` 的默认行为一致.
//!
//! 三个轴上的中间结果始终以 `f64` 保存, 整数数据只在最后四舍五入一次.
//! 因此整数数据的结果与逐轴写回整数的实现 (如 scipy) 可能相差 1.

use ndarray::{Array3, ArrayView1, ArrayView3, ArrayViewMut1, Axis, Zip};

use super::{Sigma, VolumeSmoother};
use crate::consts::{AXES, DEFAULT_TRUNCATE};
use crate::data::Voxel;
use crate::error::{EdgeError, EdgeResult};

/// 归一化的一维高斯核.
#[derive(Debug, Clone)]
pub struct GaussianKernel {
    sigma: f64,
    radius: usize,
    weights: Vec<f64>,
}

impl GaussianKernel {
    /// 构建标准差为 `sigma`, 截断于 `truncate` 倍标准差处的高斯核.
    ///
    /// 调用者保证 `sigma > 0`, `truncate > 0`.
    pub fn new(sigma: f64, truncate: f64) -> Self {
        debug_assert!(sigma > 0.0 && truncate > 0.0);
        let radius = (truncate * sigma + 0.5) as usize;
        let sigma2 = sigma * sigma;
        let mut weights: Vec<f64> = (0..=2 * radius)
            .map(|i| {
                let x = i as f64 - radius as f64;
                (-0.5 / sigma2 * x * x).exp()
            })
            .collect();
        let sum: f64 = weights.iter().sum();
        weights.iter_mut().for_each(|w| *w /= sum);
        Self {
            sigma,
            radius,
            weights,
        }
    }

    /// 标准差.
    #[inline]
    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    /// 半径. 核长度为 `2 * radius + 1`.
    #[inline]
    pub fn radius(&self) -> usize {
        self.radius
    }

    /// 核权重, 和为 1.
    #[inline]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// 对 `signal` 做相关运算, 结果写入 `out`. 两者长度必须一致且非零.
    fn correlate(&self, signal: &[f64], mut out: ArrayViewMut1<'_, f64>) {
        let n = signal.len();
        let r = self.radius as isize;
        for (i, o) in out.iter_mut().enumerate() {
            *o = self
                .weights
                .iter()
                .enumerate()
                .map(|(k, w)| w * signal[reflect_index(i as isize + k as isize - r, n)])
                .sum();
        }
    }
}

/// 半采样对称反射: 将任意整数下标映射到 `[0, len)`. `len` 必须非零.
#[inline]
fn reflect_index(i: isize, len: usize) -> usize {
    let period = 2 * len as isize;
    let r = i.rem_euclid(period) as usize;
    if r < len {
        r
    } else {
        2 * len - 1 - r
    }
}

/// 沿 `axis` 对 `data` 做一维相关运算.
fn correlate_axis(data: &Array3<f64>, axis: Axis, kernel: &GaussianKernel) -> Array3<f64> {
    let mut out = Array3::<f64>::zeros(data.raw_dim());
    let op = |dst: ArrayViewMut1<'_, f64>, src: ArrayView1<'_, f64>| {
        let signal = src.to_vec();
        kernel.correlate(&signal, dst);
    };
    let zip = Zip::from(out.lanes_mut(axis)).and(data.lanes(axis));

    #[cfg(feature = "rayon")]
    zip.par_for_each(op);
    #[cfg(not(feature = "rayon"))]
    zip.for_each(op);

    out
}

/// 可分离高斯平滑器.
#[derive(Copy, Clone, Debug)]
pub struct GaussianBlur {
    truncate: f64,
}

impl Default for GaussianBlur {
    #[inline]
    fn default() -> Self {
        Self {
            truncate: DEFAULT_TRUNCATE,
        }
    }
}

impl GaussianBlur {
    /// 构建截断于 `truncate` 倍标准差处的平滑器.
    ///
    /// `truncate` 必须为有限正数, 否则返回 `Err(EdgeError::InvalidParameter)`.
    pub fn new(truncate: f64) -> EdgeResult<Self> {
        if truncate.is_finite() && truncate > 0.0 {
            Ok(Self { truncate })
        } else {
            Err(EdgeError::invalid(
                "truncate",
                format!("应为有限正数, 实际为 {truncate}"),
            ))
        }
    }

    /// 截断倍数.
    #[inline]
    pub fn truncate(&self) -> f64 {
        self.truncate
    }
}

impl VolumeSmoother for GaussianBlur {
    fn smooth<T: Voxel>(&self, volume: ArrayView3<'_, T>, sigma: &Sigma) -> EdgeResult<Array3<T>> {
        sigma.validate()?;
        if volume.is_empty() || sigma.is_zero() {
            return Ok(volume.to_owned());
        }

        let mut data = volume.mapv(T::to_f64);
        for axis in AXES {
            let s = sigma.along(axis);
            if s > 0.0 {
                let kernel = GaussianKernel::new(s, self.truncate);
                log::trace!("gaussian axis {axis}: sigma {s}, radius {}", kernel.radius());
                data = correlate_axis(&data, Axis(axis), &kernel);
            }
        }
        Ok(data.mapv(T::from_f64))
    }
}
