//! 历史记录查询
//!
//! 按时间顺序返回会话的落子记录，并附带落子者的显示名，
//! AI 的回应显示为固定标签。

use serde::Serialize;

use draughts_core::{GameError, Notation, Result, AI_LABEL, AI_PLAYER_ID};

use crate::orchestrator::GameService;
use crate::record::MoveRecord;
use crate::session::SessionId;

/// 历史记录条目
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// 落子者显示名；AI 显示为固定标签
    pub actor_name: String,
    /// 代数坐标表示的走法，如 "C3-D4"
    pub notation: String,
    #[serde(flatten)]
    pub record: MoveRecord,
}

impl GameService {
    /// 查询会话的落子历史，按序号升序排列
    pub async fn history(&self, session_id: SessionId) -> Result<Vec<HistoryEntry>> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(GameError::GameNotFound(session_id))?;

        let mut records = self.moves.list_by_session(session.id).await?;
        records.sort_by_key(|record| record.sequence_number);

        let mut entries = Vec::with_capacity(records.len());
        for record in records {
            let actor_name = if record.actor == AI_PLAYER_ID {
                AI_LABEL.to_string()
            } else {
                self.identity.display_name(record.actor).await?
            };
            let notation = format!(
                "{}-{}",
                Notation::format(record.from),
                Notation::format(record.to)
            );
            entries.push(HistoryEntry {
                actor_name,
                notation,
                record,
            });
        }
        Ok(entries)
    }
}
