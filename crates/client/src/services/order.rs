use kado_shared::Result;

use crate::dto::{CreateOrderRequest, OrderDto, PaymentRequest, PaymentResponse};
use crate::http::{ApiRequest, HttpCore, RawResponse};

/// 订单与支付客户端
///
/// 支付接口默认与订单服务同源，但允许独立配置地址。
#[derive(Debug, Clone)]
pub struct OrderClient {
    orders: HttpCore,
    payments: HttpCore,
}

impl OrderClient {
    pub fn new(orders: HttpCore, payments: HttpCore) -> Self {
        Self { orders, payments }
    }

    // ========== 订单 API ==========

    /// 创建订单（网络抖动时重试）
    pub async fn create_raw(&self, token: &str, req: &CreateOrderRequest) -> Result<RawResponse> {
        self.orders
            .send(
                ApiRequest::post("/api/v1/orders")
                    .bearer(token)
                    .json(req)?
                    .retrying(),
            )
            .await
    }

    /// 创建订单，期望 201 且状态为 PENDING
    pub async fn create(&self, token: &str, req: &CreateOrderRequest) -> Result<OrderDto> {
        self.create_raw(token, req).await?.expect_data(201)
    }

    pub async fn get(&self, token: &str, order_id: i64) -> Result<OrderDto> {
        self.orders
            .send(ApiRequest::get(format!("/api/v1/orders/{}", order_id)).bearer(token))
            .await?
            .expect_data(200)
    }

    pub async fn cancel_raw(&self, token: &str, order_id: i64) -> Result<RawResponse> {
        self.orders
            .send(ApiRequest::post(format!("/api/v1/orders/{}/cancel", order_id)).bearer(token))
            .await
    }

    /// 显式取消订单
    pub async fn cancel(&self, token: &str, order_id: i64) -> Result<OrderDto> {
        self.cancel_raw(token, order_id).await?.expect_success()
    }

    // ========== 支付 API ==========

    /// 提交支付（网络抖动时重试）
    pub async fn pay_raw(&self, token: &str, req: &PaymentRequest) -> Result<RawResponse> {
        self.payments
            .send(
                ApiRequest::post("/api/v1/payments")
                    .bearer(token)
                    .json(req)?
                    .retrying(),
            )
            .await
    }

    /// 提交支付，期望 201
    pub async fn pay(&self, token: &str, req: &PaymentRequest) -> Result<PaymentResponse> {
        self.pay_raw(token, req).await?.expect_data(201)
    }

    /// 不重试的单次支付，用于并发提交
    pub async fn pay_once(&self, token: &str, req: &PaymentRequest) -> Result<RawResponse> {
        self.payments
            .send(ApiRequest::post("/api/v1/payments").bearer(token).json(req)?)
            .await
    }

    pub async fn payment_for_order(&self, token: &str, order_id: i64) -> Result<PaymentResponse> {
        self.payments
            .send(ApiRequest::get(format!("/api/v1/payments/order/{}", order_id)).bearer(token))
            .await?
            .expect_data(200)
    }
}
