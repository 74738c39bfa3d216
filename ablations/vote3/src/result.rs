//! 实验结果.

use crate::algos::Profile;
use std::io::{self, Write};

/// 将 `profile` 的结果写进 `w` 中.
fn describe_into<W: Write>(name: &str, p: &Profile, w: &mut W) -> io::Result<()> {
    const S4: &str = "    ";

    #[inline]
    fn f64_to_display(f: Option<f64>) -> String {
        match f {
            Some(f) => format!("{f:.6}"),
            None => "/".to_string(),
        }
    }

    writeln!(w, "Profile `{name}`:")?;
    writeln!(w, "{S4}Runs: {}", p.get_runs())?;
    writeln!(w, "{S4}Vote histogram [0, 1, 2, 3]: {:?}", p.get_histogram())?;
    writeln!(
        w,
        "{S4}Average selected voxels: {}",
        f64_to_display(p.get_avg_selected())
    )?;
    writeln!(
        w,
        "{S4}Selected ratio: {}",
        f64_to_display(p.get_selected_ratio())
    )?;
    writeln!(w, "{S4}Effective total time: {} us", p.get_target_time_us())?;
    writeln!(
        w,
        "{S4}Effective average time: {} us",
        f64_to_display(p.get_avg_target_time_us())
    )?;
    writeln!(w, "{S4}Total machine time: {} us", p.get_real_time_us())?;
    let t = p.get_most_time_consuming().map(|d| d.as_micros() as f64);
    write!(w, "{S4}Most time-consuming run costs {} us", f64_to_display(t))?;
    Ok(())
}

/// 消融实验最终结果.
pub struct AblationResult {
    side: usize,
    data: Vec<(String, Profile)>,
}

impl AblationResult {
    /// 初始化. `side` 为体模边长.
    pub fn new(side: usize) -> Self {
        Self {
            side,
            data: Vec::new(),
        }
    }

    /// 追加一条配置结果.
    pub fn push(&mut self, name: String, profile: Profile) {
        self.data.push((name, profile));
    }

    /// 将全部结果写进 `w` 中.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        utils::sep_to(&mut *w)?;
        writeln!(w, "Phantom: {0}x{0}x{0}", self.side)?;
        utils::sep_to(&mut *w)?;
        for (key, profile) in self.data.iter() {
            describe_into(key, profile, w)?;
            writeln!(w)?;
            utils::sep_to(&mut *w)?;
        }
        Ok(())
    }

    /// 分析运行结果.
    pub fn analyze(&self) -> io::Result<()> {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        self.write_to(&mut lock)
    }
}
