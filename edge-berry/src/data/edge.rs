use std::ops::Index;

use ndarray::{Array3, ArrayView3};

use crate::Idx3d;

/// 边缘提取结果.
///
/// 与输入同形状的 `f64` 体数据: 被选中的体素保留原始 (未模糊) 样本值,
/// 其余体素为缺失标记 [`crate::consts::MISSING`] (NaN).
#[derive(Debug, Clone)]
pub struct EdgeData {
    data: Array3<f64>,
}

impl Index<Idx3d> for EdgeData {
    type Output = f64;

    #[inline]
    fn index(&self, index: Idx3d) -> &Self::Output {
        &self.data[index]
    }
}

impl EdgeData {
    /// 直接初始化.
    #[inline]
    pub(crate) fn new(data: Array3<f64>) -> Self {
        Self { data }
    }

    /// 获得数据的一份不可变 shallow copy.
    #[inline]
    pub fn data(&self) -> ArrayView3<'_, f64> {
        self.data.view()
    }

    /// 消费自我, 获得底层数据.
    #[inline]
    pub fn into_inner(self) -> Array3<f64> {
        self.data
    }

    /// 数据形状.
    #[inline]
    pub fn shape(&self) -> Idx3d {
        self.data.dim()
    }

    /// 体素个数.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// `pos` 处的体素是否被选为边缘? 越界时返回 `false`.
    #[inline]
    pub fn is_edge(&self, pos: Idx3d) -> bool {
        self.data.get(pos).is_some_and(|v| !v.is_nan())
    }

    /// 被选为边缘的体素个数.
    #[inline]
    pub fn count(&self) -> usize {
        self.data.iter().filter(|v| !v.is_nan()).count()
    }

    /// 收集所有边缘体素对应的下标, 结果按行优先存储.
    pub fn edge_pos(&self) -> Vec<Idx3d> {
        self.data
            .indexed_iter()
            .filter_map(|(pos, v)| (!v.is_nan()).then_some(pos))
            .collect()
    }

    /// 边缘体素掩码.
    #[inline]
    pub fn mask(&self) -> Array3<bool> {
        self.data.mapv(|v| !v.is_nan())
    }
}

impl From<EdgeData> for Array3<f64> {
    #[inline]
    fn from(value: EdgeData) -> Self {
        value.into_inner()
    }
}

impl PartialEq<Array3<f64>> for EdgeData {
    /// 逐体素比较, 两侧同为缺失标记时视为相等.
    fn eq(&self, other: &Array3<f64>) -> bool {
        self.data.raw_dim() == other.raw_dim()
            && self
                .data
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a == b || (a.is_nan() && b.is_nan()))
    }
}
