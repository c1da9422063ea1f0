pub async fn health() -> &'static str {
    "Car Doctor Server is running"
}
