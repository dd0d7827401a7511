/// `GET /health` liveness probe.
pub async fn handler() -> &'static str {
    "ok"
}
