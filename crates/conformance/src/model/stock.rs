//! 库存准入模型：每次成功支付扣减一个单位，库存为 0 后的支付必须被拒绝

use kado_client::RawResponse;
use kado_shared::{KadoError, Result};

use super::ensure;
use crate::rejection::{RejectionKind, expect_rejection};

/// 有界计数器
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StockModel {
    remaining: i32,
}

impl StockModel {
    pub fn new(remaining: i32) -> Self {
        Self {
            remaining: remaining.max(0),
        }
    }

    pub fn remaining(&self) -> i32 {
        self.remaining
    }

    /// 尝试准入一笔支付，返回是否应当成功
    pub fn admit(&mut self) -> bool {
        if self.remaining > 0 {
            self.remaining -= 1;
            true
        } else {
            false
        }
    }

    /// 平台报告的库存不能高于模型（其他消费者也可能在消耗）
    pub fn verify_observed(&self, observed: Option<i32>) -> Result<()> {
        match observed {
            Some(stock) => {
                ensure(stock >= 0, || format!("库存出现负数: {}", stock))?;
                ensure(stock <= self.remaining, || {
                    format!("库存未按支付扣减: 期望 ≤ {}, 实际 {}", self.remaining, stock)
                })
            }
            None => Ok(()),
        }
    }
}

/// 最后一件库存的竞争结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RaceVerdict {
    /// 成功支付在输入中的下标
    pub winner: usize,
    pub losers: Vec<usize>,
}

/// 校验对最后一件库存的并发支付：恰好一笔成功，其余以库存类原因拒绝
pub fn verify_last_unit_race(responses: &[RawResponse]) -> Result<RaceVerdict> {
    let winners: Vec<usize> = responses
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_success())
        .map(|(i, _)| i)
        .collect();

    let winner = match winners.as_slice() {
        [single] => *single,
        [] => {
            return Err(KadoError::invariant(format!(
                "最后一件库存无人购得: {}",
                describe(responses)
            )));
        }
        many => {
            return Err(KadoError::invariant(format!(
                "最后一件库存被售出 {} 次",
                many.len()
            )));
        }
    };

    let mut losers = Vec::with_capacity(responses.len().saturating_sub(1));
    for (index, response) in responses.iter().enumerate() {
        if index == winner {
            continue;
        }
        expect_rejection(response, &[400, 409], RejectionKind::StockExhausted)?;
        losers.push(index);
    }

    Ok(RaceVerdict { winner, losers })
}

fn describe(responses: &[RawResponse]) -> String {
    responses
        .iter()
        .map(|r| format!("{} {}", r.status, r.error_message()))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{Value, json};

    fn raw(status: u16, body: Value) -> RawResponse {
        RawResponse {
            service: "payment",
            status,
            text: body.to_string(),
            body,
        }
    }

    #[test]
    fn test_admission_is_bounded() {
        let mut stock = StockModel::new(1);
        assert!(stock.admit());
        assert!(!stock.admit());
        assert_eq!(stock.remaining(), 0);
    }

    #[test]
    fn test_observed_stock_must_not_exceed_model() {
        let mut stock = StockModel::new(3);
        stock.admit();
        assert!(stock.verify_observed(Some(2)).is_ok());
        assert!(stock.verify_observed(Some(1)).is_ok());
        assert!(stock.verify_observed(Some(3)).is_err());
        assert!(stock.verify_observed(Some(-1)).is_err());
        assert!(stock.verify_observed(None).is_ok());
    }

    #[test]
    fn test_race_with_single_winner() {
        let responses = vec![
            raw(400, json!({"success": false, "message": "Voucher out of stock"})),
            raw(201, json!({"success": true, "data": {"status": "COMPLETED"}})),
        ];
        let verdict = verify_last_unit_race(&responses).unwrap();
        assert_eq!(verdict.winner, 1);
        assert_eq!(verdict.losers, vec![0]);
    }

    #[test]
    fn test_race_oversold_or_unsold_fails() {
        let both = vec![
            raw(201, json!({"success": true})),
            raw(201, json!({"success": true})),
        ];
        assert!(verify_last_unit_race(&both).is_err());

        let none = vec![
            raw(400, json!({"message": "stock"})),
            raw(400, json!({"message": "stock"})),
        ];
        assert!(verify_last_unit_race(&none).is_err());
    }

    #[test]
    fn test_race_loser_must_not_crash() {
        let responses = vec![
            raw(201, json!({"success": true})),
            raw(500, json!({"message": "deadlock detected"})),
        ];
        assert!(verify_last_unit_race(&responses).is_err());
    }
}
