//! 三轴边缘投票聚合.

use std::ops::Index;

use ndarray::{Array3, ArrayView3, Zip};

use crate::consts::{gray::is_edge, AXES, NDIM};
use crate::data::{normalize, Voxel};
use crate::detect::SliceEdgeDetector;
use crate::error::EdgeResult;
use crate::scan::scan_axis;
use crate::Idx3d;

/// 投票体数据. 每个体素的值在 `0..=3` 之间,
/// 表示该体素在多少个轴的逐切片扫描中被标记为边缘.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteVolume {
    data: Array3<u8>,
}

impl Index<Idx3d> for VoteVolume {
    type Output = u8;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl VoteVolume {
    /// 将三个轴的边缘掩码逐体素求和. 非零视为 1.
    ///
    /// 求和满足交换律, 与掩码的排列顺序无关. 调用者保证三个掩码形状一致.
    fn from_masks(masks: &[Array3<u8>; NDIM]) -> Self {
        let mut data = Array3::<u8>::zeros(masks[0].raw_dim());
        for mask in masks {
            Zip::from(&mut data)
                .and(mask)
                .for_each(|v, &m| *v += u8::from(is_edge(m)));
        }
        Self { data }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, u8> {
        self.data.view()
    }

    /// 消费自我, 获得底层数据.
    #[inline]
    pub fn into_inner(self) -> Array3<u8> {
        self.data
    }

    /// 数据形状.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 获取投票的基本统计信息.
    ///
    /// 统计信息格式为: \[0 票体素数, 1 票体素数, 2 票体素数, 3 票体素数\].
    pub fn histogram(&self) -> [usize; NDIM + 1] {
        let mut ans = [0; NDIM + 1];
        for v in self.data.iter() {
            ans[*v as usize] += 1;
        }
        ans
    }

    /// 票数不少于 `min_axes` 的体素掩码.
    ///
    /// `min_axes == 0` 时全部选中, `min_axes > 3` 时全部不选.
    #[inline]
    pub fn select(&self, min_axes: usize) -> Array3<bool> {
        self.data.mapv(|v| v as usize >= min_axes)
    }
}

/// 对三个轴分别扫描 `volume` 并聚合投票.
///
/// `volume` 只做一次归一化, 三个轴共用同一份灰度数据与阈值.
/// 打开 `rayon` feature 时三个轴并行扫描, 各自写入独立的缓冲区.
pub fn aggregate_votes<T, D>(
    volume: ArrayView3<'_, T>,
    low: f64,
    high: f64,
    detector: &D,
) -> EdgeResult<VoteVolume>
where
    T: Voxel,
    D: SliceEdgeDetector + ?Sized,
{
    let gray = normalize(volume)?;
    let scan = |axis: usize| scan_axis(gray.view(), axis, low, high, detector);

    #[cfg(feature = "rayon")]
    let masks = {
        let (m0, (m1, m2)) = rayon::join(
            || scan(AXES[0]),
            || rayon::join(|| scan(AXES[1]), || scan(AXES[2])),
        );
        [m0?, m1?, m2?]
    };
    #[cfg(not(feature = "rayon"))]
    let masks = [scan(AXES[0])?, scan(AXES[1])?, scan(AXES[2])?];

    let votes = VoteVolume::from_masks(&masks);
    log::debug!(
        "votes {:?}: histogram {:?}",
        votes.shape(),
        votes.histogram()
    );
    Ok(votes)
}
