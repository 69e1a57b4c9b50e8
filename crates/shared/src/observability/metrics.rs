//! 指标模块
//!
//! 通过 metrics 门面记录请求与场景指标。套件本身不安装导出器，
//! 宿主进程可以自行安装任意 recorder 抓取这些指标。

/// 注册指标描述
pub fn describe() {
    metrics::describe_counter!("kado_http_requests_total", "Total number of platform HTTP requests");
    metrics::describe_histogram!(
        "kado_http_request_duration_seconds",
        "Platform HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        "kado_poll_attempts_total",
        "Total number of eventual-consistency polling attempts"
    );
    metrics::describe_counter!("kado_scenarios_total", "Total number of executed scenarios");
    metrics::describe_histogram!(
        "kado_scenario_duration_seconds",
        "Scenario duration in seconds"
    );
}

/// 记录平台 HTTP 请求
#[inline]
pub fn record_http_request(service: &str, method: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "kado_http_requests_total",
        "service" => service.to_string(),
        "method" => method.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "kado_http_request_duration_seconds",
        "service" => service.to_string(),
        "method" => method.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录场景结果
#[inline]
pub fn record_scenario(scenario: &str, outcome: &str, duration_secs: f64) {
    metrics::counter!(
        "kado_scenarios_total",
        "scenario" => scenario.to_string(),
        "outcome" => outcome.to_string()
    )
    .increment(1);

    metrics::histogram!(
        "kado_scenario_duration_seconds",
        "scenario" => scenario.to_string()
    )
    .record(duration_secs);
}
