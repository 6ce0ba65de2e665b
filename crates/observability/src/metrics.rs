//! Dispatch 指标收集模块
//!
//! 记录轮转、隔离与分发结果，并在内存中聚合摘要。

use metrics::{counter, gauge};

/// 记录一次分发调用中发生的轮转次数
pub fn record_transport_switched(dispatcher: &str, rotations: u64) {
    counter!(
        "rotary_transport_switches_total",
        "dispatcher" => dispatcher.to_string()
    )
    .increment(rotations);
}

/// 记录被隔离的 transport
pub fn record_transport_quarantined(dispatcher: &str, transport: &str) {
    counter!(
        "rotary_transports_quarantined_total",
        "dispatcher" => dispatcher.to_string(),
        "transport" => transport.to_string()
    )
    .increment(1);
}

/// 记录分发结果
///
/// `accepted` 为 `None` 表示所有 transport 均失败。
pub fn record_dispatch_outcome(dispatcher: &str, accepted: Option<usize>) {
    let status = match accepted {
        Some(0) => "unaccepted",
        Some(_) => "accepted",
        None => "exhausted",
    };
    counter!(
        "rotary_dispatch_total",
        "dispatcher" => dispatcher.to_string(),
        "status" => status
    )
    .increment(1);

    if let Some(count) = accepted {
        counter!(
            "rotary_recipients_accepted_total",
            "dispatcher" => dispatcher.to_string()
        )
        .increment(count as u64);
    }
}

/// 记录工作集与隔离集大小
pub fn record_pool_sizes(dispatcher: &str, working: usize, quarantined: usize) {
    gauge!(
        "rotary_working_transports",
        "dispatcher" => dispatcher.to_string()
    )
    .set(working as f64);
    gauge!(
        "rotary_quarantined_transports",
        "dispatcher" => dispatcher.to_string()
    )
    .set(quarantined as f64);
}

/// 分发结果聚合器
#[derive(Debug, Clone, Default)]
pub struct DispatchStats {
    /// 分发调用总数
    pub total: u64,
    /// 至少一个收件人被接受的调用数
    pub accepted: u64,
    /// 无收件人被接受的调用数
    pub unaccepted: u64,
    /// 所有 transport 失败的调用数
    pub exhausted: u64,
    /// 被接受的收件人总数
    pub recipients: u64,
}

impl DispatchStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// 更新聚合统计
    pub fn update(&mut self, accepted: Option<usize>) {
        self.total += 1;
        match accepted {
            Some(0) => self.unaccepted += 1,
            Some(count) => {
                self.accepted += 1;
                self.recipients += count as u64;
            }
            None => self.exhausted += 1,
        }
    }

    /// 成功率 (百分比)
    pub fn success_rate(&self) -> f64 {
        if self.total > 0 {
            self.accepted as f64 / self.total as f64 * 100.0
        } else {
            0.0
        }
    }
}

impl std::fmt::Display for DispatchStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "=== Dispatch Summary ===")?;
        writeln!(f, "Dispatches: {}", self.total)?;
        writeln!(
            f,
            "Accepted: {} ({:.2}%)",
            self.accepted,
            self.success_rate()
        )?;
        writeln!(f, "Accepted nobody: {}", self.unaccepted)?;
        writeln!(f, "All transports failed: {}", self.exhausted)?;
        write!(f, "Recipients accepted: {}", self.recipients)
    }
}
