use std::sync::Arc;

use duochat_client::prelude::*;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    let base_url = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:5000".to_string());
    let csrf_token = std::env::var("DUOCHAT_CSRF_TOKEN").unwrap_or_default();

    let transport = Arc::new(HttpTransport::new(ClientConfig::new(base_url, csrf_token))?);
    let plain = Arc::new(TranscriptBuffer::new());
    let plain_metrics = Arc::new(MetricsCell::new());
    let augmented = Arc::new(TranscriptBuffer::new());
    let augmented_metrics = Arc::new(MetricsCell::new());

    let context = ChatContext::builder()
        .transport(transport)
        .channel(ChannelConfig::new(1), plain.clone(), plain_metrics.clone())
        .channel(
            ChannelConfig::new(2).extra_field("use_rag", serde_json::Value::Bool(true)),
            augmented.clone(),
            augmented_metrics.clone(),
        )
        .build()?;

    let outcomes = context.send_message("Summarize the uploaded document.").await?;

    println!("--- bot 1 ---\n{}", plain.contents());
    if let Some(metrics) = plain_metrics.latest() {
        println!("{metrics}");
    }
    println!("--- bot 2 (augmented) ---\n{}", augmented.contents());
    if let Some(metrics) = augmented_metrics.latest() {
        println!("{metrics}");
    }
    for failure in outcomes.failed() {
        eprintln!("{failure}");
    }
    Ok(())
}
