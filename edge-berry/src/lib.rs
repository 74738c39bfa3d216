#![warn(missing_docs)]

//! 核心库. 通过对 3D 体数据三个轴上的每一个 2D 切片分别做边缘检测,
//! 再逐体素统计 "在几个轴上被判定为边缘", 从而提取体数据中的边缘体素.
//!
//! 该 crate 目前仅提供 `safe` 接口.
//!
//! # 流程
//!
//! ```text
//! 原始体数据 -> (可选) 高斯平滑 -> 归一化为 u8 -> 三轴逐切片边缘检测
//!            -> 逐体素投票 (0..=3) -> 按票数阈值保留原始值, 其余置为 NaN
//! ```
//!
//! 平滑结果只参与投票, 输出中被选中的体素永远是 **原始** 样本值.
//!
//! # 注意
//!
//! 1. 2D 边缘检测与 3D 平滑都是可替换的能力 ([`detect::SliceEdgeDetector`],
//!   [`smooth::VolumeSmoother`]). 默认实现分别为不做预平滑的 canny
//!   (与 OpenCV `Canny` 一致) 和可分离高斯平滑 (浮点数据与
//!   `scipy.ndimage.gaussian_filter` 一致).
//! 2. 所有错误都以 [`EdgeError`] 返回给调用者, 库内部不会 panic 或重试.
//! 3. 打开 `rayon` feature 后, 三个轴之间以及同一轴的切片之间并行计算.
//!   并行与否不影响结果.
//!
//! # 开发计划
//!
//! ### 强度归一化 ✅
//!
//! 实现位于 `edge-berry/src/data/range.rs`.
//!
//! ### 单轴逐切片扫描 ✅
//!
//! 实现位于 `edge-berry/src/scan.rs`.
//!
//! ### 三轴投票聚合 ✅
//!
//! 实现位于 `edge-berry/src/vote.rs`.
//!
//! ### 边缘体素提取与预平滑 ✅
//!
//! 实现位于 `edge-berry/src/extract.rs` 与 `edge-berry/src/smooth`.
//!
//! ### OpenCV canny 后端 ✅
//!
//! 需要打开 `opencv` feature. 实现位于 `edge-berry/src/detect/cv.rs`.
//!
//! # 示例
//!
//! ```
//! use edge_berry::prelude::*;
//! use ndarray::Array3;
//!
//! let mut volume = Array3::<f32>::zeros((16, 16, 16));
//! volume
//!     .slice_mut(ndarray::s![4..12, 4..12, 4..12])
//!     .fill(1000.0);
//!
//! let params = EdgeParams::new(50.0, 150.0, 2)?;
//! let edges = EdgeExtractor::new(params).run(volume.view())?;
//! assert_eq!(edges.shape(), (16, 16, 16));
//! assert!(!edges.is_edge((0, 0, 0)));
//! # Ok::<(), EdgeError>(())
//! ```

/// 三维索引, 同时也可一定程度上用作非负整数向量.
pub type Idx3d = (usize, usize, usize);

/// 体数据样本类型与归一化.
mod data;

mod error;

pub mod consts;
pub mod detect;
pub mod extract;
pub mod prelude;
pub mod scan;
pub mod smooth;
pub mod vote;

pub use data::{check_axis, normalize, EdgeData, IntensityRange, Voxel};
pub use error::{EdgeError, EdgeResult};

pub use extract::{extract_edges, extract_edges_with, EdgeExtractor, EdgeParams};
pub use scan::scan_axis;
pub use vote::{aggregate_votes, VoteVolume};
