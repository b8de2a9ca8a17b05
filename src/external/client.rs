use std::sync::LazyLock;
use std::time::Duration;

/// Process-wide HTTP client for outbound calls.
///
/// Built on first use and shared so connections are pooled across requests.
/// Per-call deadlines come from the caller's configuration via
/// `RequestBuilder::timeout`; the values here are upper bounds.
///
/// ```ignore
/// let response = HTTP_CLIENT
///     .post(url)
///     .timeout(Duration::from_secs(config.timeout))
///     .json(&body)
///     .send()
///     .await?;
/// ```
pub static HTTP_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(|| {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .pool_idle_timeout(Duration::from_secs(90))
        .http2_adaptive_window(true)
        .gzip(true)
        .use_rustls_tls()
        .user_agent(user_agent())
        .build()
        .expect("Failed to build HTTP client")
});

/// `crm-auth/<version>`
pub fn user_agent() -> String {
    format!("crm-auth/{}", crate::pkg_version())
}
