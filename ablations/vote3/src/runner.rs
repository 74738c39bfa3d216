//! 程序运行函数.

use crate::algos::{self, Profile, Trial};
use crate::result::AblationResult;
use edge_berry::prelude::*;
use ndarray::Array3;
use std::thread;
use utils::{config, phantom};

/// 在每个配置上并行运行 `detector`.
fn run_all<D>(
    volume: &Array3<f32>,
    trials: &[Trial],
    detector: D,
    repeat: usize,
) -> Vec<(String, EdgeResult<Profile>)>
where
    D: SliceEdgeDetector + Copy + Send,
{
    thread::scope(|s| {
        let handles: Vec<_> = trials
            .iter()
            .map(|t| s.spawn(move || algos::run_trial(volume, t, detector, repeat)))
            .collect();

        trials
            .iter()
            .zip(handles)
            .map(|(t, th)| (t.name.clone(), th.join().expect("Thread joining error")))
            .collect()
    })
}

/// 实际运行.
pub fn run() -> EdgeResult<AblationResult> {
    let side = config::side_from_env();
    let repeat = config::repeat_from_env();
    log::info!(
        "phantom side {side}, {repeat} rounds per trial, {} cpus",
        utils::cpus()
    );

    let volume = phantom::liver_phantom(side);
    let trials = algos::trials()?;

    println!("Running ablation studies...");
    let mut result = AblationResult::new(side);
    for (name, profile) in run_all(&volume, &trials, CannyDetector, repeat) {
        result.push(format!("canny, {name}"), profile?);
    }

    #[cfg(feature = "opencv")]
    for (name, profile) in run_all(&volume, &trials, OpencvCanny::default(), repeat) {
        result.push(format!("opencv, {name}"), profile?);
    }

    Ok(result)
}
