//! Submit a one-line structured-output batch and wait for it to finish

use std::time::Duration;

use openai_client::{
    BatchOutputLine, BatchRequestLine, CreateBatchRequest, FilePurpose, OpenAIClient,
    ReasoningEffort, ResponseBody, ResponsesRequest,
};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client = OpenAIClient::from_env()?;

    let schema = json!({
        "type": "object",
        "properties": {
            "summary": { "type": "string" }
        },
        "required": ["summary"],
        "additionalProperties": false
    });
    let body = ResponsesRequest::new("gpt-5-mini", "Summarize: Rust 1.0 shipped in May 2015.")
        .json_schema("summary", schema)
        .reasoning_effort(ReasoningEffort::Low);
    let line = BatchRequestLine::post("example-1", "/v1/responses", body);

    let jsonl = format!("{}\n", serde_json::to_string(&line)?);
    let file = client
        .upload_bytes(jsonl.into_bytes(), "example_batch.jsonl", FilePurpose::Batch)
        .await?;
    println!("Uploaded {}", file.id);

    let mut batch = client
        .create_batch(CreateBatchRequest::new(&file.id, "/v1/responses").description("example"))
        .await?;
    println!("Created {} ({})", batch.id, batch.status.as_str());

    while !batch.status.is_terminal() {
        tokio::time::sleep(Duration::from_secs(30)).await;
        batch = client.retrieve_batch(&batch.id).await?;
        println!("Status: {}", batch.status.as_str());
    }

    let Some(output) = batch.output_file_id else {
        println!("Batch finished without output");
        return Ok(());
    };
    let bytes = client.file_content(&output).await?;
    for raw in String::from_utf8_lossy(&bytes).lines() {
        let line: BatchOutputLine = serde_json::from_str(raw)?;
        let Some(response) = line.response else {
            println!("{}: {:?}", line.custom_id, line.error);
            continue;
        };
        let body: ResponseBody = serde_json::from_value(response.body)?;
        println!("{}: {}", line.custom_id, body.output_text().unwrap_or("<no text>"));
    }

    Ok(())
}
