mod compare;

// Compare commands
pub use compare::{render_listing, render_summary, run_compare};

/// 命令执行结果，决定进程退出码
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Success,
    /// 指定了 --fail-on-drift 且发现差异
    Drift,
    /// 有比较器失败，结果不完整
    Incomplete,
}

impl CommandOutcome {
    pub fn exit_code(self) -> i32 {
        match self {
            CommandOutcome::Success => 0,
            CommandOutcome::Incomplete => 1,
            CommandOutcome::Drift => 3,
        }
    }
}
