//! 存储与外部协作接口
//!
//! 会话、记录、代币积分与玩家身份都隐藏在 trait 背后，
//! 内存实现用于测试和演示，生产环境可替换为数据库实现。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use draughts_core::GameError;

use crate::record::MoveRecord;
use crate::session::{GameSession, PlayerId, SessionId, SessionType};

/// 扣费结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebitOutcome {
    /// 扣费成功
    Ok,
    /// 余额不足，未扣费
    InsufficientFunds,
}

/// 会话存储
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// 按 ID 读取会话
    async fn get(&self, id: SessionId) -> anyhow::Result<Option<GameSession>>;

    /// 写入会话（覆盖同 ID 的旧状态）
    async fn save(&self, session: &GameSession) -> anyhow::Result<()>;
}

/// 落子记录存储
#[async_trait]
pub trait MoveStore: Send + Sync {
    /// 追加一条记录
    async fn append(&self, record: &MoveRecord) -> anyhow::Result<()>;

    /// 按时间顺序列出会话的全部记录
    async fn list_by_session(&self, id: SessionId) -> anyhow::Result<Vec<MoveRecord>>;
}

/// 代币与积分
#[async_trait]
pub trait Economy: Send + Sync {
    /// 扣除代币；余额不足时不扣费并返回 [`DebitOutcome::InsufficientFunds`]
    async fn debit(&self, player_id: PlayerId, amount: i64) -> anyhow::Result<DebitOutcome>;

    /// 调整积分（`delta` 可为负）
    async fn credit_score(&self, player_id: PlayerId, delta: i64) -> anyhow::Result<()>;
}

/// 玩家身份
#[async_trait]
pub trait Identity: Send + Sync {
    /// 获取玩家显示名
    async fn display_name(&self, player_id: PlayerId) -> anyhow::Result<String>;
}

/// 内存存储，同时实现全部四个协作接口
#[derive(Default)]
pub struct MemoryStore {
    sessions: Mutex<HashMap<SessionId, GameSession>>,
    records: Mutex<HashMap<SessionId, Vec<MoveRecord>>>,
    balances: Mutex<HashMap<PlayerId, i64>>,
    scores: Mutex<HashMap<PlayerId, i64>>,
    names: Mutex<HashMap<PlayerId, String>>,
    next_id: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            ..Default::default()
        }
    }

    /// 创建会话并写入存储
    pub async fn create_session(
        &self,
        player_id: PlayerId,
        opponent_id: Option<PlayerId>,
        session_type: SessionType,
    ) -> Result<GameSession, GameError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let session = GameSession::new(id, player_id, opponent_id, session_type)?;
        self.sessions.lock().await.insert(id, session.clone());
        Ok(session)
    }

    /// 设置玩家代币余额
    pub async fn set_balance(&self, player_id: PlayerId, amount: i64) {
        self.balances.lock().await.insert(player_id, amount);
    }

    /// 查询玩家代币余额（未知玩家视为 0）
    pub async fn balance(&self, player_id: PlayerId) -> i64 {
        self.balances.lock().await.get(&player_id).copied().unwrap_or(0)
    }

    /// 查询玩家积分（未知玩家视为 0）
    pub async fn score(&self, player_id: PlayerId) -> i64 {
        self.scores.lock().await.get(&player_id).copied().unwrap_or(0)
    }

    /// 设置玩家显示名
    pub async fn set_display_name(&self, player_id: PlayerId, name: impl Into<String>) {
        self.names.lock().await.insert(player_id, name.into());
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, id: SessionId) -> anyhow::Result<Option<GameSession>> {
        Ok(self.sessions.lock().await.get(&id).cloned())
    }

    async fn save(&self, session: &GameSession) -> anyhow::Result<()> {
        self.sessions.lock().await.insert(session.id, session.clone());
        Ok(())
    }
}

#[async_trait]
impl MoveStore for MemoryStore {
    async fn append(&self, record: &MoveRecord) -> anyhow::Result<()> {
        self.records
            .lock()
            .await
            .entry(record.session_id)
            .or_default()
            .push(record.clone());
        Ok(())
    }

    async fn list_by_session(&self, id: SessionId) -> anyhow::Result<Vec<MoveRecord>> {
        Ok(self.records.lock().await.get(&id).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl Economy for MemoryStore {
    async fn debit(&self, player_id: PlayerId, amount: i64) -> anyhow::Result<DebitOutcome> {
        let mut balances = self.balances.lock().await;
        let balance = balances.entry(player_id).or_insert(0);
        if *balance < amount {
            return Ok(DebitOutcome::InsufficientFunds);
        }
        *balance -= amount;
        Ok(DebitOutcome::Ok)
    }

    async fn credit_score(&self, player_id: PlayerId, delta: i64) -> anyhow::Result<()> {
        let mut scores = self.scores.lock().await;
        *scores.entry(player_id).or_insert(0) += delta;
        Ok(())
    }
}

#[async_trait]
impl Identity for MemoryStore {
    async fn display_name(&self, player_id: PlayerId) -> anyhow::Result<String> {
        let names = self.names.lock().await;
        Ok(names
            .get(&player_id)
            .cloned()
            .unwrap_or_else(|| format!("player-{player_id}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_session_assigns_ids() {
        let store = MemoryStore::new();
        let a = store.create_session(10, Some(20), SessionType::Pvp).await.unwrap();
        let b = store.create_session(10, Some(20), SessionType::Pvp).await.unwrap();
        assert_ne!(a.id, b.id);

        let loaded = SessionStore::get(&store, a.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, a.id);
    }

    #[tokio::test]
    async fn test_debit_insufficient_funds() {
        let store = MemoryStore::new();
        store.set_balance(10, 1).await;

        assert_eq!(store.debit(10, 1).await.unwrap(), DebitOutcome::Ok);
        assert_eq!(store.balance(10).await, 0);
        // 余额不足时不扣费
        assert_eq!(store.debit(10, 1).await.unwrap(), DebitOutcome::InsufficientFunds);
        assert_eq!(store.balance(10).await, 0);
    }

    #[tokio::test]
    async fn test_score_accumulates() {
        let store = MemoryStore::new();
        store.credit_score(10, 1).await.unwrap();
        store.credit_score(10, -2).await.unwrap();
        assert_eq!(store.score(10).await, -1);
    }

    #[tokio::test]
    async fn test_display_name_fallback() {
        let store = MemoryStore::new();
        store.set_display_name(10, "Alice").await;
        assert_eq!(store.display_name(10).await.unwrap(), "Alice");
        assert_eq!(store.display_name(11).await.unwrap(), "player-11");
    }
}
