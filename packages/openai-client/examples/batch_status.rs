//! List recent batches and stored files for the configured account

use openai_client::OpenAIClient;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    println!("=== Batches ===");
    for batch in client.list_batches(20).await? {
        let counts = batch
            .request_counts
            .map(|c| format!("{}/{} done, {} failed", c.completed, c.total, c.failed))
            .unwrap_or_default();
        println!(
            "{} [{}] {} {}",
            batch.id,
            batch.status.as_str(),
            batch.output_file_id.as_deref().unwrap_or("-"),
            counts
        );
    }

    println!("\n=== Files ===");
    for file in client.list_files().await? {
        println!("{} {} ({} bytes, {})", file.id, file.filename, file.bytes, file.purpose.as_str());
    }

    Ok(())
}
