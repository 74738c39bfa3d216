mod profile;

use edge_berry::prelude::*;
use ndarray::Array3;

pub use profile::Profile;

/// 一组待对比的提取配置.
#[derive(Clone, Debug)]
pub struct Trial {
    /// 配置名称, 用于报告.
    pub name: String,

    /// 提取参数.
    pub params: EdgeParams,
}

/// 消融网格: `min_axes ∈ {1, 2, 3}` × `sigma ∈ {0, 1}`.
pub fn trials() -> EdgeResult<Vec<Trial>> {
    let mut out = Vec::with_capacity(6);
    for sigma in [0.0, 1.0] {
        for min_axes in 1..=3 {
            let params = EdgeParams::new(50.0, 150.0, min_axes)?.with_sigma(sigma)?;
            out.push(Trial {
                name: format!("min_axes={min_axes}, sigma={sigma}"),
                params,
            });
        }
    }
    Ok(out)
}

/// 用 `detector` 对 `volume` 重复 `repeat` 次运行 `trial`, 统计耗时与选中情况.
pub fn run_trial<D: SliceEdgeDetector>(
    volume: &Array3<f32>,
    trial: &Trial,
    detector: D,
    repeat: usize,
) -> EdgeResult<Profile> {
    let mut profile = Profile::new(volume.len());
    let extractor = EdgeExtractor::with_parts(trial.params, detector, GaussianBlur::default());

    profile.record_histogram(extractor.votes(volume.view())?.histogram());
    for round in 0..repeat {
        profile.target_start();
        let edges = extractor.run(volume.view())?;
        profile.target_elapsed(edges.count());
        log::debug!("{}: round {round} selected {}", trial.name, edges.count());
    }
    Ok(profile.finish())
}
