//! 场景注册表
//!
//! 每个场景有稳定的 ID（如 `CP-N01`）和若干标签，运行器按 ID 或标签筛选。
//! 场景体是普通的 async 函数，通过 [`scenario!`] 宏注册为 [`Scenario`] 实现。

mod health;
mod onboarding;
mod payment;
mod payout;
mod purchase;
mod redemption;
mod revenue;
mod wallet;

use async_trait::async_trait;
use kado_shared::Result;

use crate::context::FlowContext;
use crate::report::Verdict;

/// 一个可执行的一致性场景
#[async_trait]
pub trait Scenario: Send + Sync {
    fn id(&self) -> &'static str;
    fn title(&self) -> &'static str;
    fn tags(&self) -> &'static [&'static str];
    async fn run(&self, ctx: &FlowContext) -> Result<Verdict>;

    /// 是否被筛选条件选中；两个条件都为空时全选
    fn matches(&self, ids: &[String], tags: &[String]) -> bool {
        if ids.is_empty() && tags.is_empty() {
            return true;
        }
        ids.iter().any(|id| id.eq_ignore_ascii_case(self.id()))
            || tags
                .iter()
                .any(|tag| self.tags().iter().any(|t| t.eq_ignore_ascii_case(tag)))
    }
}

macro_rules! scenario {
    ($name:ident, $id:literal, $title:literal, [$($tag:literal),+], $run:path) => {
        pub struct $name;

        #[async_trait]
        impl Scenario for $name {
            fn id(&self) -> &'static str {
                $id
            }

            fn title(&self) -> &'static str {
                $title
            }

            fn tags(&self) -> &'static [&'static str] {
                &[$($tag),+]
            }

            async fn run(&self, ctx: &FlowContext) -> Result<Verdict> {
                $run(ctx).await
            }
        }
    };
}

// ========== 健康检查 ==========
scenario!(ServiceMatrix, "HEALTH-01", "all services report UP", ["health", "smoke"], health::service_matrix);

// ========== 商户入驻 ==========
scenario!(MerchantRegistration, "MO-A01", "merchant registration, approval and first voucher", ["onboarding", "smoke"], onboarding::merchant_registration);
scenario!(AdminReview, "BF-ADMIN-01", "admin reviews a pending merchant application", ["onboarding", "admin"], onboarding::admin_review);
scenario!(ApprovalEnablesPublishing, "BF-ADMIN-02", "approval enables voucher publishing", ["onboarding", "admin"], onboarding::approval_enables_publishing);
scenario!(DuplicateEmail, "MO-N01", "duplicate email registration is rejected", ["onboarding", "negative"], onboarding::duplicate_email);

// ========== 购买 ==========
scenario!(FullPurchase, "CP-A01", "full consumer purchase, issuance and redemption", ["purchase", "smoke"], purchase::full_purchase_flow);
scenario!(MultipleVouchers, "CP-A04", "one consumer buys two different vouchers", ["purchase"], purchase::multiple_vouchers);
scenario!(EachDenomination, "BF-PURCHASE-03", "every denomination prices correctly", ["purchase"], purchase::each_denomination);
scenario!(AbaPayment, "BF-PURCHASE-04", "ABA payment completes the order", ["purchase"], purchase::aba_payment);
scenario!(ManyConsumers, "BF-CYCLE-02", "ten consumers buy the same voucher", ["purchase", "stock"], purchase::many_consumers);

// ========== 支付负向 ==========
scenario!(AmountMismatch, "CP-N01", "payment of total minus 1.00 is rejected", ["payment", "negative"], payment::amount_mismatch);
scenario!(InsufficientAmount, "BF-PURCHASE-07", "payment of total minus 5.00 is rejected", ["payment", "negative"], payment::insufficient_amount);
scenario!(FailedPaymentIssuesNothing, "BF-CYCLE-04", "failed payment issues no voucher", ["payment", "negative"], payment::failed_payment_issues_nothing);
scenario!(CancelThenPay, "CP-N02", "payment after cancellation is rejected", ["payment", "negative"], payment::cancel_then_pay);
scenario!(DoubleSpend, "CP-N03", "concurrent duplicate payments are idempotent", ["payment", "negative", "concurrency"], payment::double_spend);
scenario!(LastUnitSequential, "CP-N05", "second buyer of the last unit is rejected", ["payment", "negative", "stock"], payment::last_unit_sequential);
scenario!(LastUnitRace, "CP-N06", "simultaneous payments for the last unit", ["payment", "negative", "stock", "concurrency"], payment::last_unit_race);
scenario!(ExpiredVoucher, "CP-N04", "expired voucher cannot be bought", ["payment", "negative"], payment::expired_voucher);

// ========== 钱包 ==========
scenario!(GiftThenRedeem, "GF-A01", "gift a voucher then redeem it as recipient", ["wallet", "gift"], wallet::gift_then_redeem);
scenario!(OpenWallet, "BF-REDEEM-01", "purchased voucher is listed as ACTIVE", ["wallet"], wallet::open_wallet);

// ========== 核销 ==========
scenario!(ReuseUsedVoucher, "VR-N01", "reusing a used voucher never double spends", ["redemption", "negative"], redemption::reuse_used_voucher);
scenario!(PartialRedemption, "VR-A03", "partial redemption decrements the balance", ["redemption"], redemption::partial_redemption);
scenario!(ValidatesFirstRedemption, "BF-REDEEM-03", "first redemption of a fresh voucher succeeds", ["redemption"], redemption::validates_first_redemption);
scenario!(UsedVoucherValidation, "BF-REDEEM-05", "validation fails for a used voucher", ["redemption", "negative"], redemption::used_voucher_validation);

// ========== 营收 ==========
scenario!(CompleteCycle, "BF-CYCLE-01", "complete business cycle with revenue split", ["revenue", "smoke"], revenue::complete_cycle);
scenario!(SingleOrderSplit, "BF-MONEY-01", "single order 8% / 92% split", ["revenue"], revenue::single_order_split);
scenario!(AggregateSplit, "BF-MONEY-04", "ten 25.00 orders aggregate split", ["revenue"], revenue::aggregate_split);

// ========== 结算 ==========
scenario!(SuspendedMerchantExcluded, "PO-N01", "suspended merchant is excluded from payouts", ["payout", "negative"], payout::suspended_merchant_excluded);

/// 全部场景，按推荐执行顺序排列
pub fn all() -> Vec<Box<dyn Scenario>> {
    vec![
        Box::new(ServiceMatrix),
        Box::new(MerchantRegistration),
        Box::new(AdminReview),
        Box::new(ApprovalEnablesPublishing),
        Box::new(DuplicateEmail),
        Box::new(FullPurchase),
        Box::new(MultipleVouchers),
        Box::new(EachDenomination),
        Box::new(AbaPayment),
        Box::new(ManyConsumers),
        Box::new(AmountMismatch),
        Box::new(InsufficientAmount),
        Box::new(FailedPaymentIssuesNothing),
        Box::new(CancelThenPay),
        Box::new(DoubleSpend),
        Box::new(LastUnitSequential),
        Box::new(LastUnitRace),
        Box::new(ExpiredVoucher),
        Box::new(GiftThenRedeem),
        Box::new(OpenWallet),
        Box::new(ReuseUsedVoucher),
        Box::new(PartialRedemption),
        Box::new(ValidatesFirstRedemption),
        Box::new(UsedVoucherValidation),
        Box::new(CompleteCycle),
        Box::new(SingleOrderSplit),
        Box::new(AggregateSplit),
        Box::new(SuspendedMerchantExcluded),
    ]
}

/// 按 ID / 标签筛选
pub fn select(ids: &[String], tags: &[String]) -> Vec<Box<dyn Scenario>> {
    all().into_iter().filter(|s| s.matches(ids, tags)).collect()
}

/// 按 ID 查找单个场景
pub fn find(id: &str) -> Option<Box<dyn Scenario>> {
    all().into_iter().find(|s| s.id().eq_ignore_ascii_case(id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_are_unique() {
        let scenarios = all();
        let ids: HashSet<_> = scenarios.iter().map(|s| s.id()).collect();
        assert_eq!(ids.len(), scenarios.len());
    }

    #[test]
    fn test_select_by_id_and_tag() {
        let by_id = select(&["cp-n01".to_string()], &[]);
        assert_eq!(by_id.len(), 1);
        assert_eq!(by_id[0].id(), "CP-N01");

        let concurrency = select(&[], &["concurrency".to_string()]);
        let ids: Vec<_> = concurrency.iter().map(|s| s.id()).collect();
        assert_eq!(ids, vec!["CP-N03", "CP-N06"]);

        assert_eq!(select(&[], &[]).len(), all().len());
        assert!(select(&["NOPE".to_string()], &[]).is_empty());
    }

    #[test]
    fn test_find() {
        assert_eq!(find("PO-N01").map(|s| s.title()), Some("suspended merchant is excluded from payouts"));
        assert!(find("XX-00").is_none());
    }

    #[test]
    fn test_every_scenario_is_tagged() {
        for scenario in all() {
            assert!(!scenario.tags().is_empty(), "{} 没有标签", scenario.id());
        }
    }
}
