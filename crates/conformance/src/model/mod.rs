//! 领域状态机参考模型
//!
//! 套件不实现任何平台逻辑，这里只是“观察者”：根据已观测到的状态预测
//! 下一步的合法结果，并校验平台的实际响应是否落在合法范围内。

pub mod lifecycle;
pub mod order;
pub mod payout;
pub mod redemption;
pub mod revenue;
pub mod stock;
pub mod wallet;

use kado_shared::{KadoError, Result};

/// 条件不成立时返回不变量错误
pub fn ensure(condition: bool, message: impl FnOnce() -> String) -> Result<()> {
    if condition {
        Ok(())
    } else {
        Err(KadoError::invariant(message()))
    }
}
