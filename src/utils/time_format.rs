//! 创建时间格式化
//!
//! 存储的 `create_time` 是给人看的字符串：Asia/Shanghai 时区，
//! zh-CN 长日期格式，例如 `2024年5月3日 08:05:09`。

use chrono::{DateTime, Datelike, TimeDelta, Timelike, Utc};

/// Asia/Shanghai 固定 UTC+8，没有夏令时
const SHANGHAI_OFFSET_HOURS: i64 = 8;

pub fn format_create_time(now: DateTime<Utc>) -> String {
    let local = now.naive_utc() + TimeDelta::hours(SHANGHAI_OFFSET_HOURS);

    format!(
        "{}年{}月{}日 {:02}:{:02}:{:02}",
        local.year(),
        local.month(),
        local.day(),
        local.hour(),
        local.minute(),
        local.second()
    )
}
