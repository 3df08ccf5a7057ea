//! 核心常量定义

use std::time::Duration;

/// 棋盘边长（行列数）
pub const BOARD_SIZE: usize = 8;

/// 可落子的深色格数量
pub const DARK_SQUARES: usize = 32;

/// 每方初始棋子数
pub const PIECES_PER_SIDE: usize = 12;

/// AI 玩家 ID（使用最大值避免与真实玩家 ID 冲突）
pub const AI_PLAYER_ID: u64 = u64::MAX;

/// 历史记录中 AI 的显示名称
pub const AI_LABEL: &str = "AI";

/// 走子超时（秒）- 超过此时间未走子则判负
pub const MOVE_TIMEOUT_SECS: u64 = 60;

/// 和棋阈值：连续无吃子的半回合数（约 40 个完整回合）
pub const DRAW_QUIET_PLIES: u32 = 80;

/// 每走一步扣除的代币数
pub const MOVE_TOKEN_COST: i64 = 1;

/// 获胜奖励积分
pub const WIN_SCORE_DELTA: i64 = 1;

/// 超时判负扣除积分
pub const TIMEOUT_PENALTY: i64 = 1;

/// 走子超时 Duration
pub const MOVE_TIMEOUT: Duration = Duration::from_secs(MOVE_TIMEOUT_SECS);
