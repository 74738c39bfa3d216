//! 算法运行统计.

use std::time::{Duration, Instant};

/// 分段计时的秒表.
///
/// 每次 `start` 到 `stop` 记为一段, 秒表累加全部分段的时长并记住最长的一段.
#[derive(Clone, Debug, Default)]
struct LapTimer {
    running: Option<Instant>,
    total: Duration,
    laps: u32,
    longest: Option<Duration>,
}

impl LapTimer {
    /// 已经处于计时状态的秒表.
    fn started() -> Self {
        Self {
            running: Some(Instant::now()),
            ..Self::default()
        }
    }

    /// 开始新的一段. 正在进行的分段会被丢弃.
    #[inline]
    fn start(&mut self) {
        self.running = Some(Instant::now());
    }

    /// 结束当前分段并返回其时长. 秒表未在计时时返回 `None`.
    fn stop(&mut self) -> Option<Duration> {
        let lap = self.running.take()?.elapsed();
        self.total += lap;
        self.laps += 1;
        self.longest = Some(self.longest.map_or(lap, |m| m.max(lap)));
        Some(lap)
    }

    #[inline]
    fn total_us(&self) -> u64 {
        u64::try_from(self.total.as_micros()).unwrap_or(u64::MAX)
    }
}

/// ablation/benchmark 数据统计.
#[derive(Clone, Debug)]
pub struct Profile {
    /// 全部提取中被选中的边缘体素总数.
    selected: u64,

    /// 体数据体素个数.
    voxels: u64,

    /// 最后一次提取的投票直方图.
    histogram: [usize; 4],

    /// 每次提取各记一段.
    target_time: LapTimer,

    /// 整个任务花费的总时间 (包括准备体数据的时间).
    real_time: LapTimer,
}

impl Profile {
    /// 初始化.
    #[inline]
    pub fn new(voxels: usize) -> Self {
        Self {
            selected: 0,
            voxels: voxels as u64,
            histogram: [0; 4],
            target_time: LapTimer::default(),
            real_time: LapTimer::started(),
        }
    }

    /// 开始一次提取计时.
    #[inline]
    pub fn target_start(&mut self) {
        self.target_time.start();
    }

    /// 结束一次提取计时, 并记录本次选中的体素个数.
    #[inline]
    pub fn target_elapsed(&mut self, selected: usize) {
        if self.target_time.stop().is_some() {
            self.selected += selected as u64;
        }
    }

    /// 记录投票直方图.
    #[inline]
    pub fn record_histogram(&mut self, histogram: [usize; 4]) {
        self.histogram = histogram;
    }

    /// 结束全部计时.
    #[inline]
    pub fn finish(mut self) -> Self {
        self.real_time.stop();
        self
    }

    /// 获得提取次数.
    #[inline]
    pub fn get_runs(&self) -> u64 {
        u64::from(self.target_time.laps)
    }

    /// 获得投票直方图.
    #[inline]
    pub fn get_histogram(&self) -> [usize; 4] {
        self.histogram
    }

    /// 获得每次提取平均选中的体素个数.
    #[inline]
    pub fn get_avg_selected(&self) -> Option<f64> {
        match self.get_runs() {
            0 => None,
            runs => Some(self.selected as f64 / runs as f64),
        }
    }

    /// 获得选中体素占全部体素的比例.
    #[inline]
    pub fn get_selected_ratio(&self) -> Option<f64> {
        let avg = self.get_avg_selected()?;
        (self.voxels != 0).then(|| avg / self.voxels as f64)
    }

    /// 以微秒为单位获得提取的总花费自然时间.
    #[inline]
    pub fn get_target_time_us(&self) -> u64 {
        self.target_time.total_us()
    }

    /// 以微秒为单位获得任务到目前的总自然时间.
    #[inline]
    pub fn get_real_time_us(&self) -> u64 {
        self.real_time.total_us()
    }

    /// 以微秒为单位获得单次提取的平均时间.
    #[inline]
    pub fn get_avg_target_time_us(&self) -> Option<f64> {
        match self.get_runs() {
            0 => None,
            runs => Some(self.get_target_time_us() as f64 / runs as f64),
        }
    }

    /// 获取最耗时的一次提取所消耗的时间. 如果不存在任务, 则返回 `None`.
    #[inline]
    pub fn get_most_time_consuming(&self) -> Option<Duration> {
        self.target_time.longest
    }
}
