//! 容量准入模块 - 时段占用检查
//!
//! 判定一个新建或编辑后的预订在当日时段网格上的占用足迹
//! 是否会使任一时段的合计人数超出上限。
//!
//! # 模型
//!
//! - 服务日被切分为固定的 15 分钟时段网格 ([`SlotGrid`])，
//!   标签形如 "11:00" .. "21:00"，进程启动时由 [`BookingPolicy`]
//!   构建一次，之后不可变。
//! - 每个预订从其起始时段起连续占用 `slots_per_booking` 个时段，
//!   越过网格末尾时静默截断 (不回绕、不报错)。
//! - 每次检查都重新构建占用表，检查之间不共享任何可变状态。
//!
//! # 已知限制
//!
//! 准入检查与预订写入之间没有事务或按日期的互斥保护：两个并发请求
//! 可以分别通过检查后各自落库，使实际合计人数超出上限。消除它需要
//! 按日期加锁或改为原子的"有余量才预留"写入；当前部署的并发量
//! 用不上这些。
//!
//! [`BookingPolicy`]: crate::core::BookingPolicy

mod checker;
mod grid;

pub use checker::{AdmissionDecision, BookingFootprint, CapacityChecker};
pub use grid::SlotGrid;
