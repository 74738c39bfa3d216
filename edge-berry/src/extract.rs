//! 边缘体素提取: 可选预平滑, 三轴投票, 按票数阈值保留原始样本.

use ndarray::{ArrayView3, Zip};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HIGH, DEFAULT_LOW, MISSING};
use crate::data::{EdgeData, Voxel};
use crate::detect::{CannyDetector, SliceEdgeDetector};
use crate::error::{check_non_negative, EdgeError, EdgeResult};
use crate::smooth::{GaussianBlur, Sigma, VolumeSmoother};
use crate::vote::{aggregate_votes, VoteVolume};

/// 边缘提取参数.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EdgeParams {
    /// canny 低阈值.
    low: f64,

    /// canny 高阈值.
    high: f64,

    /// 体素至少需要在多少个轴上被标记为边缘才会被选中.
    min_axes: usize,

    /// 预平滑标准差. 为 0 时不平滑.
    #[cfg_attr(feature = "serde", serde(default))]
    sigma: Sigma,
}

impl Default for EdgeParams {
    /// 低阈值 50, 高阈值 150, 至少 1 个轴, 不平滑.
    #[inline]
    fn default() -> Self {
        Self {
            low: DEFAULT_LOW,
            high: DEFAULT_HIGH,
            min_axes: 1,
            sigma: Sigma::default(),
        }
    }
}

impl EdgeParams {
    /// 构建提取参数.
    ///
    /// `low` 和 `high` 必须为有限非负数, 否则返回 `Err(EdgeError::InvalidParameter)`.
    /// `low <= high` 不在此检查, 由检测器决定.
    ///
    /// `min_axes` 的有效范围是 `1..=3`; 0 会选中全部体素, 大于 3 则全不选中,
    /// 两者都是合法输入.
    pub fn new(low: f64, high: f64, min_axes: usize) -> EdgeResult<Self> {
        let params = Self {
            low,
            high,
            min_axes,
            sigma: Sigma::default(),
        };
        params.validate()?;
        Ok(params)
    }

    /// 设置预平滑标准差. `sigma` 非法时返回 `Err(EdgeError::InvalidParameter)`.
    pub fn with_sigma(mut self, sigma: impl Into<Sigma>) -> EdgeResult<Self> {
        self.sigma = sigma.into();
        self.validate()?;
        Ok(self)
    }

    /// 检查全部参数. 反序列化得到的参数应当先调用该方法.
    pub fn validate(&self) -> EdgeResult<()> {
        check_non_negative("low", self.low)?;
        check_non_negative("high", self.high)?;
        self.sigma.validate()
    }

    /// canny 低阈值.
    #[inline]
    pub fn low(&self) -> f64 {
        self.low
    }

    /// canny 高阈值.
    #[inline]
    pub fn high(&self) -> f64 {
        self.high
    }

    /// 最少轴数.
    #[inline]
    pub fn min_axes(&self) -> usize {
        self.min_axes
    }

    /// 预平滑标准差.
    #[inline]
    pub fn sigma(&self) -> &Sigma {
        &self.sigma
    }
}

/// 计算 `volume` (必要时先用 `smoother` 平滑) 的投票体数据.
fn votes_with<T, D, S>(
    volume: ArrayView3<'_, T>,
    params: &EdgeParams,
    detector: &D,
    smoother: &S,
) -> EdgeResult<VoteVolume>
where
    T: Voxel,
    D: SliceEdgeDetector + ?Sized,
    S: VolumeSmoother + ?Sized,
{
    params.validate()?;
    if params.sigma.is_zero() {
        return aggregate_votes(volume, params.low, params.high, detector);
    }

    let blurred = smoother.smooth(volume, &params.sigma)?;
    if blurred.shape() != volume.shape() {
        return Err(EdgeError::shape(volume.shape(), blurred.shape()));
    }
    aggregate_votes(blurred.view(), params.low, params.high, detector)
}

/// 提取 `volume` 中的边缘体素, 平滑由 `smoother` 完成.
///
/// 被选中的体素保留 **原始、未平滑** 的样本值, 其余体素为缺失标记.
/// 输出形状与 `volume` 一致.
pub fn extract_edges_with<T, D, S>(
    volume: ArrayView3<'_, T>,
    params: &EdgeParams,
    detector: &D,
    smoother: &S,
) -> EdgeResult<EdgeData>
where
    T: Voxel,
    D: SliceEdgeDetector + ?Sized,
    S: VolumeSmoother + ?Sized,
{
    log::debug!("extract edges {:?} with {params:?}", volume.shape());
    let votes = votes_with(volume, params, detector, smoother)?;
    let min_axes = params.min_axes;
    let data = Zip::from(&volume)
        .and(votes.data())
        .map_collect(|v, &n| {
            if n as usize >= min_axes {
                v.to_f64()
            } else {
                MISSING
            }
        });
    let edges = EdgeData::new(data);
    log::debug!("selected {} of {} voxels", edges.count(), edges.size());
    Ok(edges)
}

/// 提取 `volume` 中的边缘体素, 平滑使用默认的 [`GaussianBlur`].
///
/// 参见 [`extract_edges_with`].
#[inline]
pub fn extract_edges<T, D>(
    volume: ArrayView3<'_, T>,
    params: &EdgeParams,
    detector: &D,
) -> EdgeResult<EdgeData>
where
    T: Voxel,
    D: SliceEdgeDetector + ?Sized,
{
    extract_edges_with(volume, params, detector, &GaussianBlur::default())
}

/// 可复用的边缘提取流程, 持有检测器、平滑器与参数.
///
/// 该结构不保存任何跨调用状态, 因此可以在多线程间共享.
#[derive(Clone, Debug, Default)]
pub struct EdgeExtractor<D = CannyDetector, S = GaussianBlur> {
    params: EdgeParams,
    detector: D,
    smoother: S,
}

impl EdgeExtractor {
    /// 使用默认检测器与平滑器初始化.
    #[inline]
    pub fn new(params: EdgeParams) -> Self {
        Self::with_parts(params, CannyDetector, GaussianBlur::default())
    }
}

impl<D: SliceEdgeDetector, S: VolumeSmoother> EdgeExtractor<D, S> {
    /// 使用给定的检测器与平滑器初始化.
    #[inline]
    pub fn with_parts(params: EdgeParams, detector: D, smoother: S) -> Self {
        Self {
            params,
            detector,
            smoother,
        }
    }

    /// 提取参数.
    #[inline]
    pub fn params(&self) -> &EdgeParams {
        &self.params
    }

    /// 检测器.
    #[inline]
    pub fn detector(&self) -> &D {
        &self.detector
    }

    /// 计算 `volume` 的投票体数据 (包括可选的预平滑).
    #[inline]
    pub fn votes<T: Voxel>(&self, volume: ArrayView3<'_, T>) -> EdgeResult<VoteVolume> {
        votes_with(volume, &self.params, &self.detector, &self.smoother)
    }

    /// 提取 `volume` 中的边缘体素.
    #[inline]
    pub fn run<T: Voxel>(&self, volume: ArrayView3<'_, T>) -> EdgeResult<EdgeData> {
        extract_edges_with(volume, &self.params, &self.detector, &self.smoother)
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_edges, extract_edges_with, EdgeExtractor, EdgeParams};
    use crate::detect::{step_edges, FnDetector};
    use crate::error::{EdgeError, EdgeResult};
    use crate::smooth::{GaussianBlur, Sigma, VolumeSmoother};
    use crate::Voxel;
    use ndarray::{Array3, ArrayView3};

    /// 全 100 的 4x4x4 体数据, 仅 (1, 1, 1) 为 200.
    fn spot_volume() -> Array3<f32> {
        let mut v = Array3::from_elem((4, 4, 4), 100.0);
        v[(1, 1, 1)] = 200.0;
        v
    }

    /// 沿 axis 0 的阶跃体数据: 前半部分为 `lo`, 后半部分为 `hi`.
    fn step_volume(lo: i32, hi: i32) -> Array3<i32> {
        Array3::from_shape_fn((8, 5, 6), |(z, _, _)| if z < 4 { lo } else { hi })
    }

    #[test]
    fn test_params_validation() {
        assert!(EdgeParams::new(50.0, 150.0, 2).is_ok());
        assert!(EdgeParams::new(150.0, 50.0, 2).is_ok());
        assert!(matches!(
            EdgeParams::new(-1.0, 150.0, 1),
            Err(EdgeError::InvalidParameter { name: "low", .. })
        ));
        assert!(matches!(
            EdgeParams::new(1.0, f64::INFINITY, 1),
            Err(EdgeError::InvalidParameter { name: "high", .. })
        ));
        let p = EdgeParams::default().with_sigma([0.0, 1.0, 0.5]).unwrap();
        assert_eq!(p.sigma(), &Sigma::PerAxis([0.0, 1.0, 0.5]));
        assert!(EdgeParams::default().with_sigma(-2.0).is_err());
        assert_eq!(EdgeParams::default(), EdgeParams::new(50.0, 150.0, 1).unwrap());
    }

    #[test]
    fn test_extract_spot_scenario() {
        let v = spot_volume();
        let d = FnDetector::new(step_edges);
        let params = EdgeParams::new(50.0, 150.0, 1).unwrap();
        let e = extract_edges(v.view(), &params, &d).unwrap();

        assert_eq!(e.shape(), (4, 4, 4));
        assert_eq!(
            e.edge_pos(),
            vec![
                (0, 1, 1),
                (1, 0, 1),
                (1, 1, 0),
                (1, 1, 1),
                (1, 1, 2),
                (1, 2, 1),
                (2, 1, 1)
            ]
        );
        assert_eq!(e[(1, 1, 1)], 200.0);
        assert_eq!(e[(0, 1, 1)], 100.0);
        assert!(!e.is_edge((3, 3, 3)));
        assert!(e[(3, 3, 3)].is_nan());

        // 相同输入的结果可复现.
        let again = extract_edges(v.view(), &params, &d).unwrap();
        assert!(again == e.clone().into_inner());

        // 三个轴都投票的只有中心.
        let strict = EdgeParams::new(50.0, 150.0, 3).unwrap();
        let e = extract_edges(v.view(), &strict, &d).unwrap();
        assert_eq!(e.edge_pos(), vec![(1, 1, 1)]);
    }

    #[test]
    fn test_extract_min_axes_extremes() {
        let v = spot_volume();
        let d = FnDetector::new(step_edges);

        let all = extract_edges(v.view(), &EdgeParams::new(50.0, 150.0, 0).unwrap(), &d).unwrap();
        assert_eq!(all.count(), 64);
        assert!(all == v.mapv(f64::from));

        for min_axes in [4, 5, usize::MAX] {
            let p = EdgeParams::new(50.0, 150.0, min_axes).unwrap();
            let none = extract_edges(v.view(), &p, &d).unwrap();
            assert_eq!(none.count(), 0);
            assert!(none.data().iter().all(|x| x.is_nan()));
        }
    }

    #[test]
    fn test_extract_keeps_unblurred_values() {
        let v = step_volume(-500, 1500);
        let d = FnDetector::new(step_edges);
        let params = EdgeParams::new(10.0, 20.0, 1)
            .unwrap()
            .with_sigma(1.0)
            .unwrap();
        let e = extract_edges(v.view(), &params, &d).unwrap();
        assert_eq!(e.shape(), v.dim());
        assert!(e.count() > 0);

        let blurred = GaussianBlur::default()
            .smooth(v.view(), params.sigma())
            .unwrap();
        let mut differs = false;
        for pos in e.edge_pos() {
            assert_eq!(e[pos], v[pos].to_f64());
            differs |= blurred[pos] != v[pos];
        }
        // 至少有一个被选中的体素在平滑后数值发生了变化, 否则该测试没有意义.
        assert!(differs);
    }

    #[test]
    fn test_extract_blur_changes_votes() {
        let v = step_volume(0, 100);
        let d = FnDetector::new(step_edges);
        let sharp = EdgeExtractor::with_parts(
            EdgeParams::new(0.0, 200.0, 1).unwrap(),
            d,
            GaussianBlur::default(),
        );
        // 阶跃两侧的平面在 axis 1, 2 的切片里都是 255 的跳变.
        let votes = sharp.votes(v.view()).unwrap();
        assert_eq!(votes.histogram()[0], 8 * 5 * 6 - 2 * 5 * 6);

        let soft = EdgeExtractor::with_parts(
            EdgeParams::new(0.0, 200.0, 1).unwrap().with_sigma(2.0).unwrap(),
            d,
            GaussianBlur::default(),
        );
        // 平滑后相邻体素之差不再超过阈值.
        let e = soft.run(v.view()).unwrap();
        assert_eq!(e.count(), 0);
    }

    /// 返回错误形状的平滑器.
    struct Shrink;

    impl VolumeSmoother for Shrink {
        fn smooth<T: Voxel>(&self, volume: ArrayView3<'_, T>, _: &Sigma) -> EdgeResult<Array3<T>> {
            let (z, h, w) = volume.dim();
            Ok(Array3::from_elem((z, h, w.saturating_sub(1)), volume[(0, 0, 0)]))
        }
    }

    #[test]
    fn test_extract_smoother_shape_mismatch() {
        let v = spot_volume();
        let d = FnDetector::new(step_edges);
        let p = EdgeParams::default().with_sigma(1.0).unwrap();
        assert_eq!(
            extract_edges_with(v.view(), &p, &d, &Shrink).unwrap_err(),
            EdgeError::shape(&[4, 4, 4], &[4, 4, 3])
        );
        // sigma 为 0 时不会调用平滑器.
        assert!(extract_edges_with(v.view(), &EdgeParams::default(), &d, &Shrink).is_ok());
    }

    #[test]
    fn test_extract_errors_propagate() {
        let flat = Array3::<f32>::from_elem((3, 3, 3), 5.0);
        let d = FnDetector::new(step_edges);
        assert_eq!(
            extract_edges(flat.view(), &EdgeParams::default(), &d).unwrap_err(),
            EdgeError::DegenerateRange(5.0)
        );
    }

    #[test]
    fn test_extract_spot_with_default_detector() {
        let v = spot_volume();
        let ex = EdgeExtractor::new(EdgeParams::default());
        let e = ex.run(v.view()).unwrap();
        assert_eq!(e.shape(), (4, 4, 4));

        // 经过 (1, 1, 1) 的三个切片上, 亮点周围的一圈像素各得一票.
        // 亮点自身的梯度为零, 因此只有它周围 3x3x3 范围内且至少一个坐标为 1
        // 的体素被选中.
        let expected: Vec<_> = (0..3)
            .flat_map(|z| (0..3).flat_map(move |h| (0..3).map(move |w| (z, h, w))))
            .filter(|&(z, h, w)| (z == 1 || h == 1 || w == 1) && (z, h, w) != (1, 1, 1))
            .collect();
        assert_eq!(expected.len(), 18);
        assert_eq!(e.edge_pos(), expected);
        for pos in expected {
            assert_eq!(e[pos], 100.0);
        }
        assert!(!e.is_edge((1, 1, 1)));
        assert!(!e.is_edge((0, 0, 0)));
        assert!(!e.is_edge((3, 3, 3)));
        assert!(e[(3, 3, 3)].is_nan());

        let votes = ex.votes(v.view()).unwrap();
        assert_eq!(votes.histogram(), [46, 12, 6, 0]);

        // 至少两个轴: 仅剩六个面邻居.
        let strict = EdgeExtractor::new(EdgeParams::new(50.0, 150.0, 2).unwrap());
        assert_eq!(
            strict.run(v.view()).unwrap().edge_pos(),
            vec![
                (0, 1, 1),
                (1, 0, 1),
                (1, 1, 0),
                (1, 1, 2),
                (1, 2, 1),
                (2, 1, 1)
            ]
        );

        // 相同输入的结果可复现.
        for _ in 0..3 {
            assert!(ex.run(v.view()).unwrap() == e.clone().into_inner());
        }
    }

    #[test]
    fn test_extractor_with_canny() {
        // 一个 16^3 的立方体, 中心 8^3 区域更亮.
        let v = Array3::from_shape_fn((16, 16, 16), |(z, h, w)| {
            let inside = (4..12).contains(&z) && (4..12).contains(&h) && (4..12).contains(&w);
            if inside {
                1000.0f64
            } else {
                0.0
            }
        });
        let ex = EdgeExtractor::new(EdgeParams::new(50.0, 150.0, 2).unwrap());
        let e = ex.run(v.view()).unwrap();
        assert_eq!(e.shape(), (16, 16, 16));
        assert!(e.count() > 0);
        // 远离立方体表面的体素不会被选中.
        assert!(!e.is_edge((0, 0, 0)));
        assert!(!e.is_edge((8, 8, 8)));
        for pos in e.edge_pos() {
            assert_eq!(e[pos], v[pos]);
        }
    }
}
