//! [canny 算法](https://ieeexplore.ieee.org/abstract/document/4767851).
//!
//! 梯度由 `imageproc` 的 3x3 Sobel 算子计算 (边界按复制填充), 非极大值抑制与
//! 滞后阈值在 `ndarray` 上完成. 与 `imageproc::edges::canny` 不同, 这里 **不做**
//! 预平滑, 行为与 OpenCV `Canny(src, low, high, 3, false)` 一致.

use image::{GrayImage, Luma};
use imageproc::definitions::Image;
use imageproc::gradients::{horizontal_sobel, vertical_sobel};
use ndarray::{Array2, ArrayView2, Zip};

use super::SliceEdgeDetector;
use crate::consts::gray::{BLACK, WHITE};
use crate::error::{check_non_negative, EdgeError, EdgeResult};

/// 定点数的小数位数.
const SHIFT: u32 = 15;

/// tan(22.5°), 按 [`SHIFT`] 位定点数表示.
const TG22: i64 = 13573;

/// 8-邻居的偏移量.
const NEIGHBOUR8: [(isize, isize); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// 无预平滑的 canny 边缘检测器.
///
/// 梯度幅值为 `|dx| + |dy|`. 输出中边缘像素为 [`WHITE`], 其余为 [`BLACK`].
/// `low > high` 时两个阈值会被交换.
///
/// 注意孤立亮点自身的 Sobel 梯度为零, 因此被标记的是它周围的一圈像素.
#[derive(Copy, Clone, Debug, Default)]
pub struct CannyDetector;

impl CannyDetector {
    /// 初始化.
    #[inline]
    pub const fn new() -> Self {
        Self
    }
}

/// 梯度方向, 量化为 4 个区间.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Direction {
    Horizontal,
    Vertical,
    /// 参数为沿梯度方向走一行时的列偏移 (`1` 或 `-1`).
    Diagonal(isize),
}

impl Direction {
    fn of(dx: i32, dy: i32) -> Self {
        let x = i64::from(dx.unsigned_abs());
        let y = i64::from(dy.unsigned_abs()) << SHIFT;
        let tg22x = x * TG22;
        if y < tg22x {
            Self::Horizontal
        } else if y > tg22x + (x << (SHIFT + 1)) {
            Self::Vertical
        } else if (dx ^ dy) < 0 {
            Self::Diagonal(-1)
        } else {
            Self::Diagonal(1)
        }
    }
}

/// 把切片尺寸转换为 `image` 使用的 `u32`.
#[inline]
fn to_u32(name: &'static str, len: usize) -> EdgeResult<u32> {
    u32::try_from(len).map_err(|_| EdgeError::invalid(name, format!("切片尺寸 {len} 过大")))
}

fn to_array(dim: (usize, usize), g: Image<Luma<i16>>) -> EdgeResult<Array2<i32>> {
    let found = [g.height() as usize, g.width() as usize];
    Array2::from_shape_vec(dim, g.into_raw())
        .map(|a| a.mapv(i32::from))
        .map_err(|_| EdgeError::shape(&[dim.0, dim.1], &found))
}

/// 计算 `(dx, dy)`.
fn sobel(slice: ArrayView2<'_, u8>) -> EdgeResult<(Array2<i32>, Array2<i32>)> {
    let (h, w) = slice.dim();
    // `iter()` 按逻辑行优先顺序迭代, 与切片的内存布局无关.
    let raw: Vec<u8> = slice.iter().copied().collect();
    let img = GrayImage::from_raw(to_u32("width", w)?, to_u32("height", h)?, raw)
        .ok_or_else(|| EdgeError::shape(&[h, w], &[]))?;
    Ok((
        to_array((h, w), horizontal_sobel(&img))?,
        to_array((h, w), vertical_sobel(&img))?,
    ))
}

/// 图像外的梯度幅值视为 0.
#[inline]
fn mag_at(mag: &Array2<i32>, y: usize, dy: isize, x: usize, dx: isize) -> i32 {
    let (y, x) = (y.wrapping_add_signed(dy), x.wrapping_add_signed(dx));
    mag.get((y, x)).copied().unwrap_or(0)
}

/// 非极大值抑制后, 幅值大于 `low` 的候选像素.
fn suppress(dx: &Array2<i32>, dy: &Array2<i32>, mag: &Array2<i32>, low: f64) -> Array2<bool> {
    let mut keep = Array2::from_elem(mag.raw_dim(), false);
    Zip::indexed(&mut keep)
        .and(dx)
        .and(dy)
        .and(mag)
        .for_each(|(y, x), k, &gx, &gy, &m| {
            if f64::from(m) <= low {
                return;
            }
            *k = match Direction::of(gx, gy) {
                Direction::Horizontal => {
                    m > mag_at(mag, y, 0, x, -1) && m >= mag_at(mag, y, 0, x, 1)
                }
                Direction::Vertical => {
                    m > mag_at(mag, y, -1, x, 0) && m >= mag_at(mag, y, 1, x, 0)
                }
                Direction::Diagonal(s) => {
                    m > mag_at(mag, y, -1, x, -s) && m > mag_at(mag, y, 1, x, s)
                }
            };
        });
    keep
}

/// 从强边缘出发, 沿 8-邻接的候选像素生长.
fn hysteresis(candidate: &Array2<bool>, mag: &Array2<i32>, high: f64) -> Array2<u8> {
    let mut out = Array2::from_elem(candidate.raw_dim(), BLACK);
    let mut stack = Vec::new();
    for ((pos, &c), &m) in candidate.indexed_iter().zip(mag.iter()) {
        if c && f64::from(m) > high {
            out[pos] = WHITE;
            stack.push(pos);
        }
    }
    while let Some((y, x)) = stack.pop() {
        for (dy, dx) in NEIGHBOUR8 {
            let next = (y.wrapping_add_signed(dy), x.wrapping_add_signed(dx));
            if candidate.get(next) == Some(&true) && out[next] == BLACK {
                out[next] = WHITE;
                stack.push(next);
            }
        }
    }
    out
}

impl SliceEdgeDetector for CannyDetector {
    fn detect(&self, slice: ArrayView2<'_, u8>, low: f64, high: f64) -> EdgeResult<Array2<u8>> {
        let low = check_non_negative("low", low)?.floor();
        let high = check_non_negative("high", high)?.floor();
        let (low, high) = if low > high { (high, low) } else { (low, high) };

        let (h, w) = slice.dim();
        if h == 0 || w == 0 {
            return Ok(Array2::zeros((h, w)));
        }

        let (dx, dy) = sobel(slice)?;
        let mut mag = dx.mapv(i32::abs);
        mag.zip_mut_with(&dy, |m, g| *m += g.abs());

        let candidate = suppress(&dx, &dy, &mag, low);
        Ok(hysteresis(&candidate, &mag, high))
    }
}
