//! 订单/支付状态机
//!
//! `PENDING → {COMPLETED, CANCELLED}`，两个终态不可再迁移。
//! 平台在支付完成后可能报告 CONFIRMED，这里与 COMPLETED 等价。

use kado_client::RawResponse;
use kado_client::dto::{OrderDto, OrderStatus, PaymentResponse, PaymentStatus};
use kado_shared::Result;
use rust_decimal::Decimal;

use super::ensure;
use crate::rejection::{RejectionKind, expect_rejection};

/// 归一化后的订单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderState {
    Pending,
    Completed,
    Cancelled,
}

impl OrderState {
    /// 由订单状态与支付状态归一化
    pub fn observe(order_status: OrderStatus, payment_status: PaymentStatus) -> Self {
        match (order_status, payment_status) {
            (OrderStatus::Completed | OrderStatus::Confirmed, _) => Self::Completed,
            (_, PaymentStatus::Completed) => Self::Completed,
            (OrderStatus::Cancelled | OrderStatus::Refunded, _) => Self::Cancelled,
            (_, PaymentStatus::Cancelled) => Self::Cancelled,
            _ => Self::Pending,
        }
    }

    pub fn of(order: &OrderDto) -> Self {
        Self::observe(order.order_status, order.payment_status)
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }

    /// 迁移是否合法（原地不动视为合法）
    pub fn can_transition_to(self, next: Self) -> bool {
        self == next || (self == Self::Pending && next.is_terminal())
    }
}

/// 一次支付尝试的预期结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentExpectation {
    /// 金额正确且订单待支付，应完成
    Complete,
    /// 金额不符，应以 400 拒绝且订单不变
    RejectAmountMismatch,
    /// 订单已取消，应以 400 拒绝且订单不变
    RejectInvalidState,
    /// 订单已完成，应提示已支付或按重复支付拒绝
    AlreadyCompleted,
}

/// 单个订单的参考模型
#[derive(Debug, Clone)]
pub struct OrderModel {
    pub order_id: i64,
    pub total: Decimal,
    pub state: OrderState,
}

impl OrderModel {
    pub fn from_order(order: &OrderDto) -> Self {
        Self {
            order_id: order.id,
            total: order.total_amount,
            state: OrderState::of(order),
        }
    }

    /// 预测支付结果
    pub fn expect_payment(&self, amount: Decimal) -> PaymentExpectation {
        match self.state {
            OrderState::Completed => PaymentExpectation::AlreadyCompleted,
            OrderState::Cancelled => PaymentExpectation::RejectInvalidState,
            OrderState::Pending if amount != self.total => PaymentExpectation::RejectAmountMismatch,
            OrderState::Pending => PaymentExpectation::Complete,
        }
    }

    /// 校验支付响应符合预测，并推进模型状态
    pub fn apply_payment(&mut self, expectation: PaymentExpectation, raw: &RawResponse) -> Result<()> {
        match expectation {
            PaymentExpectation::Complete => {
                ensure(raw.is_success() && raw.status == 201, || {
                    format!(
                        "订单 {} 支付应成功(201)，实际 {}: {}",
                        self.order_id,
                        raw.status,
                        raw.error_message()
                    )
                })?;
                self.state = OrderState::Completed;
            }
            PaymentExpectation::RejectAmountMismatch => {
                expect_rejection(raw, &[400], RejectionKind::AmountMismatch)?;
            }
            PaymentExpectation::RejectInvalidState => {
                expect_rejection(raw, &[400, 409], RejectionKind::InvalidState)?;
            }
            PaymentExpectation::AlreadyCompleted => verify_duplicate_payment(raw)?,
        }
        Ok(())
    }

    /// 取消只允许发生在待支付状态
    pub fn apply_cancel(&mut self, raw: &RawResponse) -> Result<()> {
        if self.state == OrderState::Pending {
            ensure(raw.is_success(), || {
                format!("待支付订单 {} 取消失败: {}", self.order_id, raw.error_message())
            })?;
            self.state = OrderState::Cancelled;
        } else {
            ensure(!raw.is_success() || self.state == OrderState::Cancelled, || {
                format!("已完成订单 {} 不应被取消", self.order_id)
            })?;
        }
        Ok(())
    }

    /// 校验平台上的订单与模型一致
    pub fn verify_observed(&self, observed: &OrderDto) -> Result<()> {
        ensure(observed.id == self.order_id, || {
            format!("订单 ID 不符: 期望 {}, 实际 {}", self.order_id, observed.id)
        })?;
        ensure(observed.total_amount == self.total, || {
            format!(
                "订单 {} 金额被改变: {} -> {}",
                self.order_id, self.total, observed.total_amount
            )
        })?;
        let state = OrderState::of(observed);
        ensure(state == self.state, || {
            format!(
                "订单 {} 状态不符: 期望 {:?}, 实际 {:?} ({:?}/{:?})",
                self.order_id, self.state, state, observed.order_status, observed.payment_status
            )
        })
    }
}

/// 新建订单：数量为 1 时总额等于面值，且处于待支付
pub fn verify_new_order(order: &OrderDto, denomination: Decimal) -> Result<()> {
    ensure(order.total_amount == denomination, || {
        format!(
            "订单 {} 总额 {} 与面值 {} 不符",
            order.id, order.total_amount, denomination
        )
    })?;
    ensure(
        order.order_status == OrderStatus::Pending && order.payment_status == PaymentStatus::Pending,
        || {
            format!(
                "新订单 {} 应为 PENDING/PENDING，实际 {:?}/{:?}",
                order.id, order.order_status, order.payment_status
            )
        },
    )
}

/// 支付响应若带状态则必须为 COMPLETED
pub fn verify_payment_completed(payment: &PaymentResponse) -> Result<()> {
    match payment.status {
        Some(status) => ensure(status == PaymentStatus::Completed, || {
            format!("支付状态应为 COMPLETED，实际 {:?}", status)
        }),
        None => Ok(()),
    }
}

/// 重复支付：成功但提示已支付，或以重复/已支付拒绝，绝不能 5xx
pub fn verify_duplicate_payment(raw: &RawResponse) -> Result<()> {
    if raw.is_success() {
        let message = raw.combined_message();
        return ensure(RejectionKind::DuplicatePayment.matches(&message), || {
            format!("重复支付被当作新支付受理: {}", message)
        });
    }
    expect_rejection(raw, &[400, 409], RejectionKind::DuplicatePayment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn order(status: &str, payment: &str, total: f64) -> OrderDto {
        serde_json::from_value(json!({
            "id": 10,
            "totalAmount": total,
            "orderStatus": status,
            "paymentStatus": payment
        }))
        .unwrap()
    }

    fn raw(status: u16, body: Value) -> RawResponse {
        RawResponse {
            service: "payment",
            status,
            text: body.to_string(),
            body,
        }
    }

    #[test]
    fn test_state_normalisation() {
        assert_eq!(OrderState::of(&order("CONFIRMED", "COMPLETED", 25.0)), OrderState::Completed);
        assert_eq!(OrderState::of(&order("PENDING", "COMPLETED", 25.0)), OrderState::Completed);
        assert_eq!(OrderState::of(&order("CANCELLED", "PENDING", 25.0)), OrderState::Cancelled);
        assert_eq!(OrderState::of(&order("PENDING", "PENDING", 25.0)), OrderState::Pending);
    }

    #[test]
    fn test_transitions() {
        assert!(OrderState::Pending.can_transition_to(OrderState::Completed));
        assert!(OrderState::Pending.can_transition_to(OrderState::Cancelled));
        assert!(!OrderState::Completed.can_transition_to(OrderState::Cancelled));
        assert!(!OrderState::Cancelled.can_transition_to(OrderState::Pending));
        assert!(OrderState::Completed.can_transition_to(OrderState::Completed));
    }

    #[test]
    fn test_payment_expectations() {
        let pending = OrderModel::from_order(&order("PENDING", "PENDING", 25.0));
        assert_eq!(pending.expect_payment(Decimal::new(25, 0)), PaymentExpectation::Complete);
        assert_eq!(
            pending.expect_payment(Decimal::new(24, 0)),
            PaymentExpectation::RejectAmountMismatch
        );

        let cancelled = OrderModel::from_order(&order("CANCELLED", "CANCELLED", 25.0));
        assert_eq!(
            cancelled.expect_payment(Decimal::new(25, 0)),
            PaymentExpectation::RejectInvalidState
        );

        let done = OrderModel::from_order(&order("COMPLETED", "COMPLETED", 25.0));
        assert_eq!(done.expect_payment(Decimal::new(25, 0)), PaymentExpectation::AlreadyCompleted);
    }

    #[test]
    fn test_apply_payment_advances_state() {
        let mut model = OrderModel::from_order(&order("PENDING", "PENDING", 25.0));
        let response = raw(201, json!({"success": true, "data": {"status": "COMPLETED"}}));
        model.apply_payment(PaymentExpectation::Complete, &response).unwrap();
        assert_eq!(model.state, OrderState::Completed);
        model.verify_observed(&order("CONFIRMED", "COMPLETED", 25.0)).unwrap();
        assert!(model.verify_observed(&order("PENDING", "PENDING", 25.0)).is_err());
    }

    #[test]
    fn test_amount_mismatch_keeps_state() {
        let mut model = OrderModel::from_order(&order("PENDING", "PENDING", 25.0));
        let response = raw(400, json!({"success": false, "message": "Payment amount mismatch"}));
        model
            .apply_payment(PaymentExpectation::RejectAmountMismatch, &response)
            .unwrap();
        assert_eq!(model.state, OrderState::Pending);
    }

    #[test]
    fn test_duplicate_payment_signals() {
        let already = raw(
            201,
            json!({"success": true, "data": {"message": "Order already completed"}}),
        );
        assert!(verify_duplicate_payment(&already).is_ok());

        let rejected = raw(400, json!({"success": false, "message": "Order already paid"}));
        assert!(verify_duplicate_payment(&rejected).is_ok());

        let second_charge = raw(201, json!({"success": true, "message": "Payment successful", "data": {}}));
        assert!(verify_duplicate_payment(&second_charge).is_err());

        let crash = raw(500, json!({"message": "duplicate key"}));
        assert!(verify_duplicate_payment(&crash).is_err());
    }

    #[test]
    fn test_payment_response_status() {
        let done: PaymentResponse =
            serde_json::from_value(json!({"orderId": 1, "status": "COMPLETED"})).unwrap();
        assert!(verify_payment_completed(&done).is_ok());
        let failed: PaymentResponse =
            serde_json::from_value(json!({"orderId": 1, "status": "FAILED"})).unwrap();
        assert!(verify_payment_completed(&failed).is_err());
    }

    #[test]
    fn test_new_order_checks() {
        let fresh = order("PENDING", "PENDING", 25.0);
        assert!(verify_new_order(&fresh, Decimal::new(25, 0)).is_ok());
        assert!(verify_new_order(&fresh, Decimal::new(10, 0)).is_err());
    }

    #[test]
    fn test_cancel_only_from_pending() {
        let mut model = OrderModel::from_order(&order("PENDING", "PENDING", 10.0));
        model
            .apply_cancel(&raw(200, json!({"success": true, "data": {}})))
            .unwrap();
        assert_eq!(model.state, OrderState::Cancelled);

        let mut done = OrderModel::from_order(&order("COMPLETED", "COMPLETED", 10.0));
        assert!(done.apply_cancel(&raw(200, json!({"success": true}))).is_err());
        assert!(done.apply_cancel(&raw(400, json!({"success": false}))).is_ok());
    }
}
