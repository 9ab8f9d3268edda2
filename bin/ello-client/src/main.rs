//! ello-client – smoke-test harness for a running ello-server.
//!
//! Sends one streaming and one unary chat completion and prints what comes
//! back.

use anyhow::Context;
use clap::Parser;
use ello_proto::{ChatRequest, LlmServiceClient, Message};
use tonic::transport::Channel;
use tracing::debug;

#[derive(Debug, Parser)]
#[command(name = "ello-client", version, about = "Exercise both LLMService RPCs")]
struct Args {
    /// Server endpoint.
    #[arg(long, default_value = "http://localhost:50051")]
    addr: String,

    /// Model name sent with each request.
    #[arg(long, default_value = "gpt-3.5-turbo")]
    model: String,

    /// User message to echo.
    #[arg(long, default_value = "Hello, this is a test message!")]
    message: String,

    #[arg(long, default_value_t = 0.7)]
    temperature: f32,

    #[arg(long, default_value_t = 1000)]
    max_tokens: i32,

    #[arg(long, default_value = "test-client")]
    user_id: String,
}

impl Args {
    fn request(&self) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            messages: vec![Message::user(self.message.clone())],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            user_id: self.user_id.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut client = LlmServiceClient::connect(args.addr.clone())
        .await
        .with_context(|| format!("failed to connect to {}", args.addr))?;

    println!("Testing streaming chat completion...");
    stream_completion(&mut client, args.request()).await?;

    println!("\nTesting non-streaming chat completion...");
    let resp = client
        .chat_completion(args.request())
        .await
        .context("ChatCompletion failed")?
        .into_inner();

    let content = resp
        .choices
        .first()
        .and_then(|c| c.message.as_ref())
        .map(|m| m.content.as_str())
        .unwrap_or_default();
    println!("Complete response: {content}");
    println!("Usage: {} total tokens", resp.usage_total_tokens);

    Ok(())
}

async fn stream_completion(
    client: &mut LlmServiceClient<Channel>,
    req: ChatRequest,
) -> anyhow::Result<()> {
    let mut stream = client
        .chat_completion_stream(req)
        .await
        .context("ChatCompletionStream failed")?
        .into_inner();

    while let Some(chunk) = stream.message().await.context("failed to receive chunk")? {
        let content = chunk
            .choice
            .as_ref()
            .and_then(|c| c.message.as_ref())
            .map(|m| m.content.as_str())
            .unwrap_or_default();
        println!("Stream response: {content} (done: {})", chunk.done);
        if chunk.done {
            break;
        }
    }
    debug!("stream finished");
    Ok(())
}
