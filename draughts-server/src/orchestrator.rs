//! 会话编排
//!
//! [`GameService`] 是落子的唯一入口：同一会话的提交被逐会话锁
//! 串行化，超时在下一次提交时惰性判定，扣费发生在校验之后、
//! 落子提交之前。PvE 会话中玩家落子提交后由 AI 立即回应。

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;

use draughts_ai::AiEngine;
use draughts_core::{
    Board, GameError, Move, MoveGenerator, Notation, Result, RuleViolation, Side, AI_PLAYER_ID,
};

use crate::config::SessionConfig;
use crate::record::MoveRecord;
use crate::session::{GameSession, PlayerId, SessionId, SessionStatus};
use crate::store::{DebitOutcome, Economy, Identity, MoveStore, SessionStore};

/// 落子提交的结果
#[derive(Debug, Clone)]
pub enum MoveOutcome {
    /// 落子已提交；PvE 会话中 `reply` 为 AI 的回应
    Accepted {
        record: MoveRecord,
        reply: Option<MoveRecord>,
        status: SessionStatus,
        winner_id: Option<PlayerId>,
    },
    /// 提交前已超时，会话被判负
    TimedOut { winner_id: PlayerId },
}

/// 会话状态报告
#[derive(Debug, Clone)]
pub struct StatusReport {
    pub status: SessionStatus,
    pub winner_id: Option<PlayerId>,
    pub board: Board,
    pub total_moves: u32,
    pub side_to_move: Side,
}

/// 会话服务
pub struct GameService {
    pub(crate) sessions: Arc<dyn SessionStore>,
    pub(crate) moves: Arc<dyn MoveStore>,
    pub(crate) economy: Arc<dyn Economy>,
    pub(crate) identity: Arc<dyn Identity>,
    config: SessionConfig,
    /// 测试用固定 AI 随机种子
    ai_seed: Option<u64>,
    /// 逐会话互斥锁，保证同一会话的提交串行执行
    locks: Mutex<HashMap<SessionId, Arc<Mutex<()>>>>,
}

impl GameService {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        moves: Arc<dyn MoveStore>,
        economy: Arc<dyn Economy>,
        identity: Arc<dyn Identity>,
    ) -> Self {
        Self {
            sessions,
            moves,
            economy,
            identity,
            config: SessionConfig::default(),
            ai_seed: None,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_ai_seed(mut self, seed: u64) -> Self {
        self.ai_seed = Some(seed);
        self
    }

    /// 提交一步落子
    ///
    /// 校验顺序：会话存在且进行中 → 提交者是参与者 → 超时判定 →
    /// 重复提交拦截 → 轮次校验 → 规则校验 → 扣费 → 提交。
    /// 扣费失败或规则校验失败时会话状态不变。
    pub async fn submit_move(
        &self,
        session_id: SessionId,
        from: &str,
        to: &str,
        actor_id: PlayerId,
    ) -> Result<MoveOutcome> {
        let from = Notation::parse(from)?;
        let to = Notation::parse(to)?;

        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(GameError::GameNotFound(session_id))?;

        if session.status.is_terminal() {
            return Err(GameError::GameNotInProgress);
        }
        if !session.is_participant(actor_id) {
            return Err(GameError::Unauthorized);
        }

        let mut records = self.moves.list_by_session(session_id).await?;

        // 记录是提交基准：上一次提交在保存会话前失败时，
        // 会话行会落后于记录，先追平再受理本次提交
        if self.reconcile(&mut session, &records).await? {
            let board = Board::from_json(&session.board)?;
            if self.settle_if_terminal(&mut session, &board).await? {
                self.prune_lock(session_id).await;
                return Err(GameError::GameNotInProgress);
            }
        }

        // 惰性超时：距上一条记录（或会话创建）超过时限即判负，
        // 不做规则校验，也不扣费
        let turn_started = records
            .last()
            .map(|record| record.timestamp)
            .unwrap_or(session.created_at);
        let elapsed = (Utc::now() - turn_started).to_std().unwrap_or_default();
        if elapsed > self.config.move_timeout {
            let winner_id = session.opponent_of(actor_id);
            session.finish(SessionStatus::TimedOut, Some(winner_id));
            self.sessions.save(&session).await?;
            self.economy
                .credit_score(actor_id, -self.config.timeout_penalty)
                .await?;
            tracing::info!(
                session_id,
                loser_id = actor_id,
                winner_id,
                elapsed_secs = elapsed.as_secs(),
                "move timed out, session forfeited"
            );
            self.prune_lock(session_id).await;
            return Ok(MoveOutcome::TimedOut { winner_id });
        }

        // 拦截同一玩家紧接着重复提交同一步（网络重试的常见形态）
        if let Some(previous) = records.iter().rev().find(|r| r.actor == actor_id) {
            if previous.from == from && previous.to == to {
                return Err(RuleViolation::DuplicateMove.into());
            }
        }

        // 上一次调用中 AI 半步失败会让轮次停在 AI 侧，
        // 先补走欠下的 AI 半步，会话才能继续（补走同样扣费）
        if let Some(difficulty) = session.ai_difficulty() {
            if session.side_to_move() == Side::Black {
                let board = Board::from_json(&session.board)?;
                self.ai_reply(&mut session, &board, &records, difficulty).await?;
                if session.status.is_terminal() {
                    self.prune_lock(session_id).await;
                    return Err(GameError::GameNotInProgress);
                }
                records = self.moves.list_by_session(session_id).await?;
            }
        }

        let board = Board::from_json(&session.board)?;

        let side = session.side_of(actor_id).ok_or(GameError::Unauthorized)?;
        if side != session.side_to_move() {
            return Err(RuleViolation::NotYourTurn.into());
        }

        let legal = MoveGenerator::legal_moves(&board, side);
        let mv = legal
            .iter()
            .find(|m| m.from == from && m.to == to)
            .cloned()
            .ok_or(RuleViolation::NotValidMove)?;

        // 先扣费后提交：扣费失败时棋盘不变
        match self.economy.debit(actor_id, self.config.move_cost).await? {
            DebitOutcome::Ok => {}
            DebitOutcome::InsufficientFunds => return Err(GameError::InsufficientBalance),
        }

        let (board, record) = self.commit_move(&mut session, &board, &mv, actor_id).await?;
        tracing::debug!(
            session_id,
            actor_id,
            sequence = record.sequence_number,
            %mv,
            "move committed"
        );

        if self.settle_if_terminal(&mut session, &board).await? {
            self.prune_lock(session_id).await;
            return Ok(MoveOutcome::Accepted {
                record,
                reply: None,
                status: session.status,
                winner_id: session.winner_id,
            });
        }

        // PvE：玩家落子提交后由 AI 立即回应
        let mut reply = None;
        if let Some(difficulty) = session.ai_difficulty() {
            reply = self
                .ai_reply(&mut session, &board, &records, difficulty)
                .await?;
        }

        if session.status.is_terminal() {
            self.prune_lock(session_id).await;
        }
        Ok(MoveOutcome::Accepted {
            record,
            reply,
            status: session.status,
            winner_id: session.winner_id,
        })
    }

    /// 主动认输，对局以放弃结束，对手获胜
    pub async fn abandon(&self, session_id: SessionId, actor_id: PlayerId) -> Result<()> {
        let lock = self.session_lock(session_id).await;
        let _guard = lock.lock().await;

        let mut session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(GameError::GameNotFound(session_id))?;

        if session.status.is_terminal() {
            return Err(GameError::GameNotInProgress);
        }
        if !session.is_participant(actor_id) {
            return Err(GameError::Unauthorized);
        }

        let winner_id = session.opponent_of(actor_id);
        session.finish(SessionStatus::Abandoned, Some(winner_id));
        self.sessions.save(&session).await?;
        if winner_id != AI_PLAYER_ID {
            self.economy
                .credit_score(winner_id, self.config.win_score)
                .await?;
        }
        tracing::info!(session_id, loser_id = actor_id, winner_id, "session abandoned");
        self.prune_lock(session_id).await;
        Ok(())
    }

    /// 查询会话状态（只读）
    pub async fn evaluate_status(&self, session_id: SessionId) -> Result<StatusReport> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(GameError::GameNotFound(session_id))?;
        let board = Board::from_json(&session.board)?;
        Ok(StatusReport {
            status: session.status,
            winner_id: session.winner_id,
            board,
            total_moves: session.total_moves,
            side_to_move: session.side_to_move(),
        })
    }

    /// AI 回应：选子、扣玩家的费、提交、终局判定
    ///
    /// 玩家落子此时已提交，AI 回应失败时会话停留在合法状态，
    /// 下一次提交可以继续。
    async fn ai_reply(
        &self,
        session: &mut GameSession,
        board: &Board,
        records: &[MoveRecord],
        difficulty: draughts_ai::Difficulty,
    ) -> Result<Option<MoveRecord>> {
        let ai_side = session.side_to_move();
        let legal = MoveGenerator::legal_moves(board, ai_side);

        let mut engine = match self.ai_seed {
            Some(seed) => AiEngine::with_seed(difficulty, seed),
            None => AiEngine::from_difficulty(difficulty),
        };
        let Some(chosen) = engine.choose(board, ai_side) else {
            // 终局判定已通过，走到这里说明棋盘状态被外部破坏
            tracing::warn!(session_id = session.id, "ai found no legal move");
            return Ok(None);
        };
        let mv = avoid_repetition(
            records.iter().rev().find(|r| r.actor == AI_PLAYER_ID),
            chosen,
            &legal,
        );

        // PvE 会话中 AI 的回应同样从玩家余额扣费
        match self
            .economy
            .debit(session.player_id, self.config.move_cost)
            .await?
        {
            DebitOutcome::Ok => {}
            DebitOutcome::InsufficientFunds => return Err(GameError::InsufficientBalance),
        }

        let (board, record) = self
            .commit_move(session, board, &mv, AI_PLAYER_ID)
            .await?;
        tracing::debug!(
            session_id = session.id,
            sequence = record.sequence_number,
            %mv,
            "ai reply committed"
        );

        self.settle_if_terminal(session, &board).await?;
        Ok(Some(record))
    }

    /// 提交一步：更新棋盘与计数，先追加记录再保存会话
    ///
    /// 记录追加成功即视为提交；保存会话失败留下的中间态由
    /// 下一次提交的 [`Self::reconcile`] 追平。
    async fn commit_move(
        &self,
        session: &mut GameSession,
        board: &Board,
        mv: &Move,
        actor_id: PlayerId,
    ) -> Result<(Board, MoveRecord)> {
        let next = MoveGenerator::apply(board, mv);
        session.board = next.to_json()?;
        session.total_moves += 1;
        if mv.is_capture() {
            session.quiet_moves = 0;
        } else {
            session.quiet_moves += 1;
        }

        let piece = next
            .get(mv.to)
            .ok_or_else(|| GameError::Validation("no piece on destination after move".into()))?;
        let record = MoveRecord {
            session_id: session.id,
            sequence_number: session.total_moves,
            board_after: session.board.clone(),
            from: mv.from,
            to: mv.to,
            piece,
            actor: actor_id,
            timestamp: Utc::now(),
        };

        self.moves.append(&record).await?;
        self.sessions.save(session).await?;
        Ok((next, record))
    }

    /// 会话行落后于记录时向前追平
    ///
    /// 逐条重放缺失的记录：棋盘取记录的落子后状态，步数加一，
    /// 无吃子计数通过对比前后棋子总数恢复。
    async fn reconcile(
        &self,
        session: &mut GameSession,
        records: &[MoveRecord],
    ) -> Result<bool> {
        let mut advanced = false;
        while (session.total_moves as usize) < records.len() {
            let record = &records[session.total_moves as usize];
            let before = Board::from_json(&session.board)?;
            let after = Board::from_json(&record.board_after)?;
            let capture = after.count(Side::White) + after.count(Side::Black)
                < before.count(Side::White) + before.count(Side::Black);

            session.board = record.board_after.clone();
            session.total_moves += 1;
            if capture {
                session.quiet_moves = 0;
            } else {
                session.quiet_moves += 1;
            }
            advanced = true;
            tracing::warn!(
                session_id = session.id,
                sequence = record.sequence_number,
                "session row behind records, replaying committed move"
            );
        }
        if advanced {
            self.sessions.save(session).await?;
        }
        Ok(advanced)
    }

    /// 终局判定：对方无子可动即落败，连续无吃子达到阈值即和棋
    ///
    /// 胜者获得积分奖励，AI 哨兵不计分。
    async fn settle_if_terminal(
        &self,
        session: &mut GameSession,
        board: &Board,
    ) -> Result<bool> {
        if let Some(winner_side) = MoveGenerator::winner(board, session.side_to_move()) {
            let winner_id = session.participant_of(winner_side);
            session.finish(SessionStatus::Completed, Some(winner_id));
            self.sessions.save(session).await?;
            if winner_id != AI_PLAYER_ID {
                self.economy
                    .credit_score(winner_id, self.config.win_score)
                    .await?;
            }
            tracing::info!(session_id = session.id, winner_id, "session completed");
            return Ok(true);
        }

        if session.quiet_moves >= self.config.draw_threshold {
            session.finish(SessionStatus::Completed, None);
            self.sessions.save(session).await?;
            tracing::info!(
                session_id = session.id,
                quiet_moves = session.quiet_moves,
                "session drawn"
            );
            return Ok(true);
        }

        Ok(false)
    }

    /// 获取会话的互斥锁，首次访问时创建
    async fn session_lock(&self, session_id: SessionId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(session_id).or_default().clone()
    }

    /// 终局后回收会话锁表项，防止锁表随会话数无限增长
    ///
    /// 仅在没有其他等待者时移除（表内一份 + 调用方一份）；
    /// 留下的表项会在下一次终局提交时再被回收。
    async fn prune_lock(&self, session_id: SessionId) {
        let mut locks = self.locks.lock().await;
        if let Some(entry) = locks.get(&session_id) {
            if Arc::strong_count(entry) <= 2 {
                locks.remove(&session_id);
            }
        }
    }

    #[cfg(test)]
    async fn lock_count(&self) -> usize {
        self.locks.lock().await.len()
    }
}

/// AI 防复读：若选中的走法与 AI 上一步的起止格完全相同，
/// 且存在其他合法走法，则换用另一个
fn avoid_repetition(previous: Option<&MoveRecord>, chosen: Move, legal: &[Move]) -> Move {
    let Some(previous) = previous else {
        return chosen;
    };
    if previous.from != chosen.from || previous.to != chosen.to {
        return chosen;
    }
    legal
        .iter()
        .find(|m| m.from != chosen.from || m.to != chosen.to)
        .cloned()
        .unwrap_or(chosen)
}
