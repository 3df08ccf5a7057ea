//! 演示程序：内存存储上的一局人机对战
//!
//! 白方每回合取第一个合法走法提交，黑方由 AI 回应，
//! 对局结束或步数耗尽后打印历史记录。

use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use draughts_ai::Difficulty;
use draughts_core::{MoveGenerator, Notation, Side};
use draughts_server::{GameService, MemoryStore, MoveOutcome, SessionType};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("draughts_server=debug".parse()?),
        )
        .init();

    let store = Arc::new(MemoryStore::new());
    let player_id = 1;
    store.set_balance(player_id, 100).await;
    store.set_display_name(player_id, "演示玩家").await;

    let service = GameService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    );

    let session = store
        .create_session(player_id, None, SessionType::Pve(Difficulty::Hard))
        .await?;
    info!(session_id = session.id, "人机会话已创建");

    for _ in 0..20 {
        let report = service.evaluate_status(session.id).await?;
        if report.status.is_terminal() {
            break;
        }

        let legal = MoveGenerator::legal_moves(&report.board, Side::White);
        let Some(mv) = legal.first() else {
            break;
        };
        let from = Notation::format(mv.from);
        let to = Notation::format(mv.to);

        let outcome = service
            .submit_move(session.id, &from, &to, player_id)
            .await?;
        match outcome {
            MoveOutcome::Accepted { status, winner_id, .. } => {
                info!(%from, %to, ?status, ?winner_id, "落子完成");
                if status.is_terminal() {
                    break;
                }
            }
            MoveOutcome::TimedOut { winner_id } => {
                info!(winner_id, "会话超时判负");
                break;
            }
        }
    }

    let report = service.evaluate_status(session.id).await?;
    info!(
        status = ?report.status,
        winner_id = ?report.winner_id,
        total_moves = report.total_moves,
        balance = store.balance(player_id).await,
        score = store.score(player_id).await,
        "对局结束"
    );

    for entry in service.history(session.id).await? {
        info!(
            sequence = entry.record.sequence_number,
            actor = %entry.actor_name,
            notation = %entry.notation,
            "历史记录"
        );
    }

    Ok(())
}
