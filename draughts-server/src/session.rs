//! 对局会话
//!
//! 会话是持久化的对局实体：棋盘以 JSON 文本存储，
//! 走子方由已落子总数的奇偶性推导，不单独存储。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use draughts_ai::Difficulty;
use draughts_core::{Board, Result, Side, AI_PLAYER_ID};

/// 玩家 ID
pub type PlayerId = u64;

/// 会话 ID
pub type SessionId = u64;

/// 会话类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionType {
    /// 双人对战
    Pvp,
    /// 人机对战（携带 AI 难度）
    Pve(Difficulty),
}

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// 进行中
    Ongoing,
    /// 正常结束（分出胜负或和棋）
    Completed,
    /// 被放弃
    Abandoned,
    /// 超时判负
    TimedOut,
}

impl SessionStatus {
    /// 是否为终局状态
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Ongoing)
    }
}

/// 对局会话
///
/// 创建者执白先行；PvE 会话的黑方是 AI，`opponent_id` 为 `None`。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: SessionId,
    /// 创建者（白方）
    pub player_id: PlayerId,
    /// 对手（黑方）；PvE 会话中为 `None`
    pub opponent_id: Option<PlayerId>,
    pub session_type: SessionType,
    pub status: SessionStatus,
    /// 棋盘状态（JSON 文本）
    pub board: String,
    /// 已落子总数（双方合计）
    pub total_moves: u32,
    /// 连续无吃子的半回合数，用于和棋判定
    pub quiet_moves: u32,
    pub winner_id: Option<PlayerId>,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl GameSession {
    /// 创建新会话，棋盘为初始局面
    pub fn new(
        id: SessionId,
        player_id: PlayerId,
        opponent_id: Option<PlayerId>,
        session_type: SessionType,
    ) -> Result<Self> {
        Ok(Self {
            id,
            player_id,
            opponent_id,
            session_type,
            status: SessionStatus::Ongoing,
            board: Board::initial().to_json()?,
            total_moves: 0,
            quiet_moves: 0,
            winner_id: None,
            created_at: Utc::now(),
            ended_at: None,
        })
    }

    /// 是否人机会话
    pub fn is_pve(&self) -> bool {
        matches!(self.session_type, SessionType::Pve(_))
    }

    /// 人机会话的 AI 难度
    pub fn ai_difficulty(&self) -> Option<Difficulty> {
        match self.session_type {
            SessionType::Pve(difficulty) => Some(difficulty),
            SessionType::Pvp => None,
        }
    }

    /// 检查玩家是否为会话参与者（AI 哨兵不算参与者）
    pub fn is_participant(&self, actor_id: PlayerId) -> bool {
        self.player_id == actor_id || self.opponent_id == Some(actor_id)
    }

    /// 获取玩家执棋颜色
    pub fn side_of(&self, actor_id: PlayerId) -> Option<Side> {
        if self.player_id == actor_id {
            Some(Side::White)
        } else if self.opponent_id == Some(actor_id) {
            Some(Side::Black)
        } else {
            None
        }
    }

    /// 获取指定颜色的参与者 ID（PvE 黑方为 AI 哨兵）
    pub fn participant_of(&self, side: Side) -> PlayerId {
        match side {
            Side::White => self.player_id,
            Side::Black => self.opponent_id.unwrap_or(AI_PLAYER_ID),
        }
    }

    /// 获取对手 ID（PvE 会话中对手为 AI 哨兵）
    pub fn opponent_of(&self, actor_id: PlayerId) -> PlayerId {
        if self.player_id == actor_id {
            self.opponent_id.unwrap_or(AI_PLAYER_ID)
        } else {
            self.player_id
        }
    }

    /// 当前走子方：偶数步轮白方，奇数步轮黑方
    pub fn side_to_move(&self) -> Side {
        if self.total_moves % 2 == 0 {
            Side::White
        } else {
            Side::Black
        }
    }

    /// 结束会话并记录胜者；已终局的会话不再改写
    pub fn finish(&mut self, status: SessionStatus, winner_id: Option<PlayerId>) {
        if self.status == SessionStatus::Ongoing {
            self.status = status;
            self.winner_id = winner_id;
            self.ended_at = Some(Utc::now());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session() {
        let session = GameSession::new(1, 10, Some(20), SessionType::Pvp).unwrap();
        assert_eq!(session.status, SessionStatus::Ongoing);
        assert_eq!(session.total_moves, 0);
        assert_eq!(session.side_to_move(), Side::White);

        // 棋盘文本可以解析回初始局面
        let board = Board::from_json(&session.board).unwrap();
        assert_eq!(board, Board::initial());
    }

    #[test]
    fn test_participants() {
        let session = GameSession::new(1, 10, Some(20), SessionType::Pvp).unwrap();
        assert!(session.is_participant(10));
        assert!(session.is_participant(20));
        assert!(!session.is_participant(30));
        assert_eq!(session.side_of(10), Some(Side::White));
        assert_eq!(session.side_of(20), Some(Side::Black));
        assert_eq!(session.opponent_of(10), 20);
        assert_eq!(session.opponent_of(20), 10);
    }

    #[test]
    fn test_pve_opponent_is_sentinel() {
        let session = GameSession::new(1, 10, None, SessionType::Pve(Difficulty::Easy)).unwrap();
        assert!(session.is_pve());
        assert_eq!(session.ai_difficulty(), Some(Difficulty::Easy));
        assert_eq!(session.opponent_of(10), AI_PLAYER_ID);
        assert_eq!(session.participant_of(Side::Black), AI_PLAYER_ID);
        // AI 哨兵不是可提交走子的参与者
        assert!(!session.is_participant(AI_PLAYER_ID));
    }

    #[test]
    fn test_side_to_move_parity() {
        let mut session = GameSession::new(1, 10, Some(20), SessionType::Pvp).unwrap();
        assert_eq!(session.side_to_move(), Side::White);
        session.total_moves = 1;
        assert_eq!(session.side_to_move(), Side::Black);
        session.total_moves = 2;
        assert_eq!(session.side_to_move(), Side::White);
    }

    #[test]
    fn test_finish_is_idempotent() {
        let mut session = GameSession::new(1, 10, Some(20), SessionType::Pvp).unwrap();
        session.finish(SessionStatus::Completed, Some(10));
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.winner_id, Some(10));
        assert!(session.ended_at.is_some());

        // 终局后不再改写
        session.finish(SessionStatus::TimedOut, Some(20));
        assert_eq!(session.status, SessionStatus::Completed);
        assert_eq!(session.winner_id, Some(10));
    }
}
