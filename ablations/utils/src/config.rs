//! 从环境变量读取实验配置.

use std::env;
use std::str::FromStr;

/// 默认体模边长.
pub const DEFAULT_SIDE: usize = 48;

/// 默认每个配置的重复次数.
pub const DEFAULT_REPEAT: usize = 3;

/// 读取环境变量 `key` 并解析为 `T`.
///
/// 1. 若环境变量存在且可以解析, 则返回其值;
/// 2. 否则, 返回 `default`.
pub fn from_env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// 获取体模边长.
///
/// 1. 若环境变量 `$VOTE3_SIDE` 为合法正整数, 则返回其值;
/// 2. 否则, 返回 [`DEFAULT_SIDE`].
#[inline]
pub fn side_from_env() -> usize {
    match from_env_or("VOTE3_SIDE", DEFAULT_SIDE) {
        0 => DEFAULT_SIDE,
        n => n,
    }
}

/// 获取每个配置的重复次数.
///
/// 1. 若环境变量 `$VOTE3_REPEAT` 为合法正整数, 则返回其值;
/// 2. 否则, 返回 [`DEFAULT_REPEAT`].
#[inline]
pub fn repeat_from_env() -> usize {
    match from_env_or("VOTE3_REPEAT", DEFAULT_REPEAT) {
        0 => DEFAULT_REPEAT,
        n => n,
    }
}
