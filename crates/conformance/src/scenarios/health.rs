use kado_shared::{KadoError, Result};
use tracing::info;

use crate::context::FlowContext;
use crate::report::Verdict;

/// HEALTH-01：所有服务 `/actuator/health` 报告 UP
pub async fn service_matrix(ctx: &FlowContext) -> Result<Verdict> {
    let targets = ctx.config.endpoints.health_targets();
    let results = ctx.platform.health.check_all(&targets).await;

    let mut notes = Vec::with_capacity(results.len());
    let mut unhealthy = Vec::new();
    for (service, health) in results {
        if health.is_healthy() {
            notes.push(format!("{} UP", service));
        } else {
            unhealthy.push(format!("{}: {:?}", service, health));
        }
    }

    if !unhealthy.is_empty() {
        return Err(KadoError::invariant(format!(
            "{} 个服务不健康: {}",
            unhealthy.len(),
            unhealthy.join("; ")
        )));
    }
    info!(services = notes.len(), "全部服务健康");
    Ok(Verdict::Passed(notes))
}
