//! 落子记录
//!
//! 每次落子（包括 AI 的回应）写入一条记录，序号在会话内严格递增。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use draughts_core::{Piece, Position};

use crate::session::{PlayerId, SessionId};

/// 单步落子记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub session_id: SessionId,
    /// 会话内序号，从 1 开始
    pub sequence_number: u32,
    /// 落子后的棋盘状态（JSON 文本）
    pub board_after: String,
    pub from: Position,
    pub to: Position,
    /// 落点上的棋子（升王在本步完成时 `king` 为真）
    pub piece: Piece,
    /// 落子者；AI 的回应记为 AI 哨兵 ID
    pub actor: PlayerId,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use draughts_core::Side;

    #[test]
    fn test_record_serde() {
        let record = MoveRecord {
            session_id: 7,
            sequence_number: 1,
            board_after: "[]".to_string(),
            from: Position::new_unchecked(2, 2),
            to: Position::new_unchecked(3, 3),
            piece: Piece::man(Side::White),
            actor: 10,
            timestamp: Utc::now(),
        };

        let json = serde_json::to_string(&record).unwrap();
        let back: MoveRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
