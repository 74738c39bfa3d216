//! 通用常量.

/// 单通道颜色.
pub mod gray {
    /// 单通道黑色. 边缘检测结果中代表非边缘.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道白色. 边缘检测结果中代表边缘.
    pub const WHITE: u8 = 0b_1111_1111;

    /// 边缘检测结果中, 像素是否属于边缘?
    ///
    /// 任意非零值都视为边缘, 而不仅仅是 [`WHITE`].
    #[inline]
    pub const fn is_edge(p: u8) -> bool {
        p != BLACK
    }
}

/// 体数据的维数, 同时也是投票数的上限.
pub const NDIM: usize = 3;

/// 三个可切片的轴, 按索引升序排列.
pub const AXES: [usize; NDIM] = [0, 1, 2];

/// 归一化缩放系数.
///
/// 使用 `255.999999` 而不是 `255` 或 `256`: 前者会使除最大值以外的样本整体偏暗一档,
/// 后者会使最大值溢出为 256.
pub const NORMALIZE_SCALE: f64 = 255.999999;

/// 非边缘体素在输出中的缺失标记.
pub const MISSING: f64 = f64::NAN;

/// 高斯核截断半径 (以 sigma 为单位) 的默认值.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// 默认 canny 低阈值.
pub const DEFAULT_LOW: f64 = 50.0;

/// 默认 canny 高阈值.
pub const DEFAULT_HIGH: f64 = 150.0;
