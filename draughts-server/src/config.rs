//! 会话服务配置

use std::time::Duration;

use draughts_core::{
    DRAW_QUIET_PLIES, MOVE_TIMEOUT, MOVE_TOKEN_COST, TIMEOUT_PENALTY, WIN_SCORE_DELTA,
};

/// 会话服务的可调参数
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// 单步落子的时限，超过即判负
    pub move_timeout: Duration,
    /// 连续无吃子达到该半回合数即判和
    pub draw_threshold: u32,
    /// 每次落子扣除的代币数
    pub move_cost: i64,
    /// 获胜方的积分奖励
    pub win_score: i64,
    /// 超时方的积分惩罚
    pub timeout_penalty: i64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            move_timeout: MOVE_TIMEOUT,
            draw_threshold: DRAW_QUIET_PLIES,
            move_cost: MOVE_TOKEN_COST,
            win_score: WIN_SCORE_DELTA,
            timeout_penalty: TIMEOUT_PENALTY,
        }
    }
}
