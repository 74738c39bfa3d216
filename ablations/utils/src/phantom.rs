//! 合成体模.

use edge_berry::Idx3d;
use ndarray::Array3;

/// 背景 (脂肪) 的 HU 值.
pub const HU_FAT: f32 = -100.0;

/// 肝脏实质的 HU 值.
pub const HU_LIVER: f32 = 60.0;

/// 肿瘤的 HU 值.
pub const HU_TUMOR: f32 = 20.0;

/// `pos` 到 `center` 的归一化椭球距离的平方.
#[inline]
fn ellipsoid((z, h, w): Idx3d, center: [f64; 3], radii: [f64; 3]) -> f64 {
    let d = [z as f64 - center[0], h as f64 - center[1], w as f64 - center[2]];
    d.iter().zip(radii).map(|(d, r)| (d / r) * (d / r)).sum()
}

/// 生成边长为 `side` 的肝脏体模.
///
/// 背景为 [`HU_FAT`]; 居中的椭球为 [`HU_LIVER`], 三个半轴分别为边长的
/// 0.30, 0.38, 0.42 倍; 椭球内偏心放置一个半径为边长 0.1 倍的球形
/// [`HU_TUMOR`].
pub fn liver_phantom(side: usize) -> Array3<f32> {
    let s = side as f64;
    let center = [s / 2.0; 3];
    let radii = [0.30 * s, 0.38 * s, 0.42 * s];
    let tumor_center = [s / 2.0, s / 2.0 - 0.12 * s, s / 2.0 + 0.15 * s];
    let tumor_radii = [0.1 * s; 3];

    Array3::from_shape_fn((side, side, side), |pos| {
        if ellipsoid(pos, tumor_center, tumor_radii) <= 1.0 {
            HU_TUMOR
        } else if ellipsoid(pos, center, radii) <= 1.0 {
            HU_LIVER
        } else {
            HU_FAT
        }
    })
}
