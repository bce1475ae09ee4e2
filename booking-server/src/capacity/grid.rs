//! Slot Grid
//!
//! 服务日的固定时段网格：有序的 "HH:MM" 标签序列。

use std::ops::Range;

use chrono::NaiveTime;

use crate::core::BookingPolicy;
use crate::utils::{AppError, AppResult};

/// 固定时段网格
///
/// 标签从 `opens` 到 `last_seating` (含端点) 按 `slot_minutes` 间隔生成。
/// 默认策略 (11:00-21:00, 15 分钟) 产生 41 个标签。
#[derive(Debug, Clone)]
pub struct SlotGrid {
    labels: Vec<String>,
    slots_per_booking: usize,
}

impl SlotGrid {
    /// 由策略构建网格
    ///
    /// # Errors
    ///
    /// 时间标签无法解析、间隔为零或窗口为空时返回验证错误。
    pub fn from_policy(policy: &BookingPolicy) -> AppResult<Self> {
        Self::build(
            &policy.opens,
            &policy.last_seating,
            policy.slot_minutes,
            policy.slots_per_booking(),
        )
    }

    /// 构建网格：`[opens, last_seating]` 闭区间，步长 `slot_minutes`
    pub fn build(
        opens: &str,
        last_seating: &str,
        slot_minutes: u32,
        slots_per_booking: usize,
    ) -> AppResult<Self> {
        if slot_minutes == 0 {
            return Err(AppError::validation("slot_minutes must be positive"));
        }
        if slots_per_booking == 0 {
            return Err(AppError::validation(
                "booking duration must cover at least one slot",
            ));
        }

        let start = parse_label(opens)?;
        let end = parse_label(last_seating)?;
        if end < start {
            return Err(AppError::validation(format!(
                "last seating {} is before opening {}",
                last_seating, opens
            )));
        }

        let step = chrono::Duration::minutes(slot_minutes as i64);
        let mut labels = Vec::new();
        let mut cursor = start;
        while cursor <= end {
            labels.push(cursor.format("%H:%M").to_string());
            // 越过午夜说明配置荒谬，直接停止而不是回绕
            let (next, wrapped) = cursor.overflowing_add_signed(step);
            if wrapped != 0 {
                break;
            }
            cursor = next;
        }

        Ok(Self {
            labels,
            slots_per_booking,
        })
    }

    /// 网格标签 (有序)
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    /// 网格大小
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 标签是否在网格上
    pub fn contains(&self, label: &str) -> bool {
        self.index_of(label).is_some()
    }

    /// 标签在网格上的位置
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.labels.iter().position(|l| l == label)
    }

    /// 从 `start` 起一个预订覆盖的网格下标区间
    ///
    /// 越过网格末尾时截断。`start` 不在网格上时返回空区间;
    /// 调用方应当在此之前就拒绝这样的时间，这里只做防御性兜底。
    pub fn covered_range(&self, start: &str) -> Range<usize> {
        match self.index_of(start) {
            Some(i) => i..usize::min(i + self.slots_per_booking, self.labels.len()),
            None => 0..0,
        }
    }

    /// 从 `start` 起一个预订覆盖的标签子序列 (截断语义同上)
    pub fn slots_covered_by(&self, start: &str) -> &[String] {
        &self.labels[self.covered_range(start)]
    }
}

fn parse_label(label: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(label, "%H:%M")
        .map_err(|_| AppError::validation(format!("Invalid time label: {}", label)))
}
