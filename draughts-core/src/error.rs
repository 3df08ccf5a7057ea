//! 错误类型定义

use thiserror::Error;

/// 规则违例（非法或重复走法）
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleViolation {
    /// 走法不在当前合法走法集中
    #[error("not a valid move")]
    NotValidMove,

    /// 持久化的棋盘结构不是合法的 8x8 棋盘
    #[error("stored board is not a valid array")]
    NotValidArray,

    /// 与该玩家上一步完全相同的走法
    #[error("duplicate of the previous move")]
    DuplicateMove,

    /// 不是该玩家的回合
    #[error("not your turn")]
    NotYourTurn,

    /// 目标位置是浅色格，不可落子
    #[error("square is not playable")]
    NotPlayable,
}

/// 会话操作错误（对外失败分类）
#[derive(Error, Debug)]
pub enum GameError {
    /// 会话不存在
    #[error("game {0} not found")]
    GameNotFound(u64),

    /// 会话已结束，不接受走子
    #[error("game is not in progress")]
    GameNotInProgress,

    /// 操作者不是对局参与者
    #[error("player is not a participant of this game")]
    Unauthorized,

    /// 输入格式错误（如坐标超界）
    #[error("invalid input: {0}")]
    Validation(String),

    /// 规则违例
    #[error("rule violation: {0}")]
    Rule(#[from] RuleViolation),

    /// 持久化棋盘数据损坏
    #[error("failed to parse stored board: {0}")]
    Parse(#[from] serde_json::Error),

    /// 代币余额不足
    #[error("insufficient token balance")]
    InsufficientBalance,

    /// 协作方（存储/经济系统）内部错误
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// 核心操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
