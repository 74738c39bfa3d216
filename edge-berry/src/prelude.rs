//! 🍇欢迎光临🍓
//!
//! 涵盖了本 crate 一系列常用的功能.

pub use crate::Idx3d;

pub use crate::data::{normalize, EdgeData, IntensityRange, Voxel};
pub use crate::error::{EdgeError, EdgeResult};

pub use crate::detect::{CannyDetector, FnDetector, SliceEdgeDetector};
pub use crate::smooth::{GaussianBlur, Sigma, VolumeSmoother};

pub use crate::extract::{extract_edges, extract_edges_with, EdgeExtractor, EdgeParams};
pub use crate::scan::scan_axis;
pub use crate::vote::{aggregate_votes, VoteVolume};

#[cfg(feature = "opencv")]
pub use crate::detect::OpencvCanny;
