//! 데모 데이터 시드 명령어.
//!
//! # 사용 예시
//!
//! ```bash
//! # 비어 있는 DB에 데모 데이터 생성
//! leadflow seed
//!
//! # 기존 데이터를 지우고 다시 생성
//! leadflow seed --force
//! ```

use std::collections::HashMap;

use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use leadflow_api::hash_password;
use leadflow_api::repository::{
    clear_all, CallRepository, ChatRepository, LeadRepository, NewCall, NewChatMessage, NewLead,
    PgAccountStore,
};
use leadflow_core::NewAccount;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use super::fixtures;

/// 시드 결과 요약.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub accounts: usize,
    pub leads: usize,
    pub messages: usize,
    pub calls: usize,
}

/// 이미 시드된 DB인지 판단합니다 (계정 2개 이상, 리드 1개 이상).
pub fn is_seeded(accounts: i64, leads: i64) -> bool {
    accounts >= 2 && leads > 0
}

/// 데모 데이터 시드.
///
/// 이미 시드된 DB는 `force`가 없으면 건드리지 않고 `None`을 반환합니다.
/// 그 외에는 모든 데이터를 지운 뒤 새로 삽입합니다.
pub async fn seed(pool: &PgPool, force: bool) -> Result<Option<SeedSummary>> {
    let account_count = PgAccountStore::count(pool).await?;
    let lead_count = LeadRepository::count(pool).await?;
    info!(accounts = account_count, leads = lead_count, "Current database stats");

    if is_seeded(account_count, lead_count) && !force {
        return Ok(None);
    }

    clear_all(pool).await.context("failed to clear existing data")?;
    info!("Cleared existing data");

    let now = Utc::now();
    let mut summary = SeedSummary::default();

    for seed in fixtures::accounts() {
        let hash = hash_password(seed.password)?;
        let account = PgAccountStore::insert_with(
            pool,
            &NewAccount::new(seed.name, seed.email, hash),
            seed.role,
            seed.status,
        )
        .await?;

        if let Some(ago) = seed.last_login_ago {
            PgAccountStore::set_last_login(pool, account.id, now - Duration::seconds(ago)).await?;
        }
        summary.accounts += 1;
    }
    info!(count = summary.accounts, "Created accounts");

    let mut lead_ids: HashMap<&str, (Uuid, &str)> = HashMap::new();
    for seed in fixtures::leads() {
        let at = now - Duration::seconds(seed.ago);
        let input = NewLead {
            name: seed.name.to_string(),
            phone: seed.phone.to_string(),
            email: Some(seed.email()),
            source: seed.source,
            status: seed.status,
            notes: Some(seed.notes.to_string()),
            assigned_to: None,
            last_contact: Some(at),
        };
        let lead = LeadRepository::insert_at(pool, &input, at).await?;
        lead_ids.insert(seed.phone, (lead.id, seed.name));
        summary.leads += 1;
    }
    info!(count = summary.leads, "Created leads");

    for seed in fixtures::messages() {
        let lead = lead_ids.get(seed.phone);
        let input = NewChatMessage {
            phone_number: seed.phone.to_string(),
            contact_name: lead.map(|(_, name)| name.to_string()),
            message: seed.message.to_string(),
            direction: seed.direction,
            read: seed.read,
            lead_id: lead.map(|(id, _)| *id),
            created_at: now - Duration::seconds(seed.ago),
        };
        ChatRepository::insert(pool, &input).await?;
        summary.messages += 1;
    }
    info!(count = summary.messages, "Created chat messages");

    for seed in fixtures::calls() {
        let lead = lead_ids.get(seed.phone);
        let input = NewCall {
            phone_number: seed.phone.to_string(),
            contact_name: lead.map(|(_, name)| name.to_string()),
            direction: seed.direction,
            duration: seed.duration,
            cost: seed.cost,
            status: seed.status,
            notes: Some(seed.notes.to_string()),
            lead_id: lead.map(|(id, _)| *id),
            assigned_to: None,
        };
        CallRepository::insert_at(pool, &input, now - Duration::seconds(seed.ago)).await?;
        summary.calls += 1;
    }
    info!(count = summary.calls, "Created calls");

    Ok(Some(summary))
}
