//! 结算：被暂停商户不得收到打款

use async_trait::async_trait;
use chrono::Utc;
use kado_client::dto::{
    CreateHoldRequest, PayoutHold, PayoutSimulation, PayoutSimulationRequest, Role,
    VerificationStatus,
};
use kado_client::{PayoutClient, RawResponse};
use kado_shared::{KadoError, Result};
use tracing::{info, warn};

use crate::context::FlowContext;
use crate::model::lifecycle::verify_merchant_status;
use crate::model::payout::{is_held, verify_payout_exclusion};
use crate::model::redemption::verify_redemption_accepted;
use crate::report::Verdict;

const SUSPENSION_REASON: &str = "Conformance suite payout hold test";

/// 结算模拟与冻结列表来源
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PayoutSource: Send + Sync {
    async fn simulate(&self, token: &str, req: &PayoutSimulationRequest) -> Result<RawResponse>;
    async fn holds(&self) -> Result<Vec<PayoutHold>>;
}

#[async_trait]
impl PayoutSource for PayoutClient {
    async fn simulate(&self, token: &str, req: &PayoutSimulationRequest) -> Result<RawResponse> {
        self.simulate_raw(Some(token), req).await
    }

    async fn holds(&self) -> Result<Vec<PayoutHold>> {
        self.list_holds().await
    }
}

/// 对已暂停商户执行周结算模拟并判定
///
/// 模拟成功时发放名单不得包含该商户；模拟被拒时发放结果不可观测，
/// 商户在冻结列表中则跳过，不在则失败。
pub async fn check_payout_exclusion<S>(
    source: &S,
    token: &str,
    merchant_id: i64,
    request: &PayoutSimulationRequest,
    mut notes: Vec<String>,
) -> Result<Verdict>
where
    S: PayoutSource + ?Sized,
{
    let raw = source.simulate(token, request).await?;
    if raw.is_server_error() {
        return Err(KadoError::unavailable("payout", raw.error_message()));
    }

    if raw.is_success() {
        let simulation: PayoutSimulation = raw.decode_data()?;
        let held = verify_payout_exclusion(merchant_id, &simulation)?;
        info!(
            merchant_id,
            payouts = simulation.payouts.len(),
            held,
            "结算模拟完成"
        );
        notes.push(format!(
            "absent from {} payouts for week ending {}",
            simulation.payouts.len(),
            request.week_ending
        ));
        if held {
            notes.push("listed in hold queue".to_string());
        }
        return Ok(Verdict::Passed(notes));
    }

    let holds = source.holds().await?;
    if !is_held(merchant_id, &holds) {
        return Err(KadoError::invariant(format!(
            "结算模拟被拒绝 ({})，且被暂停商户 {} 不在 {} 条冻结记录中",
            raw.status,
            merchant_id,
            holds.len()
        )));
    }
    warn!(status = raw.status, merchant_id, "结算模拟被拒绝，仅确认冻结存在");
    notes.push("merchant present in hold list".to_string());
    Ok(Verdict::Skipped(format!(
        "payout simulation refused with {}; exclusion not observable ({})",
        raw.status,
        notes.join("; ")
    )))
}

/// PO-N01：有核销收入的商户被暂停后，周结算模拟中不得出现在打款名单
pub async fn suspended_merchant_excluded(ctx: &FlowContext) -> Result<Verdict> {
    let (merchant, voucher) = ctx.merchant_with_voucher().await?;
    let denomination = ctx.first_denomination(&voucher)?;
    let consumer = ctx.register_actor(Role::Consumer, "consumer").await?;
    ctx.purchase(&consumer, voucher.id, denomination).await?;
    let entry = ctx.wait_for_voucher(&consumer, voucher.id).await?;
    let redemption = ctx.redeem(&merchant, &entry.voucher_code, denomination).await?;
    verify_redemption_accepted(&redemption)?;

    let admin = ctx.admin_token().await?;
    let suspended = ctx
        .platform
        .merchants
        .suspend(&admin, merchant.merchant_id, SUSPENSION_REASON)
        .await?;
    verify_merchant_status(
        &suspended,
        Some(VerificationStatus::Approved),
        VerificationStatus::Suspended,
    )?;

    let mut notes = vec![format!("merchant {} suspended", merchant.merchant_id)];
    let hold = CreateHoldRequest {
        merchant_id: merchant.merchant_id,
        reason: SUSPENSION_REASON.to_string(),
    };
    if let Err(e) = ctx.platform.payouts.create_hold(&hold).await {
        if matches!(e, KadoError::Unavailable { .. }) {
            return Err(e);
        }
        warn!(error = %e, "登记结算冻结被拒绝，依赖暂停自动冻结");
        notes.push(format!("hold registration refused: {}", e));
    }

    let request = PayoutSimulationRequest {
        week_ending: Utc::now().date_naive().format("%Y-%m-%d").to_string(),
        dry_run: true,
    };
    check_payout_exclusion(
        &ctx.platform.payouts,
        &admin,
        merchant.merchant_id,
        &request,
        notes,
    )
    .await
}
