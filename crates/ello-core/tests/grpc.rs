//! End-to-end tests over a real tonic transport on an ephemeral port.

use std::net::SocketAddr;
use std::time::Duration;

use ello_core::{EchoService, ServiceConfig};
use ello_proto::{ChatRequest, LlmServiceClient, Message};
use tokio::net::TcpListener;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::{Channel, Server};
use tonic::Code;

async fn spawn_server(config: ServiceConfig) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");

    tokio::spawn(async move {
        Server::builder()
            .add_service(EchoService::new(config).into_server())
            .serve_with_incoming(TcpListenerStream::new(listener))
            .await
            .expect("server should run");
    });

    addr
}

async fn connect(addr: SocketAddr) -> LlmServiceClient<Channel> {
    LlmServiceClient::connect(format!("http://{addr}"))
        .await
        .expect("connect to test server")
}

fn request(content: &str) -> ChatRequest {
    ChatRequest {
        model: "gpt-3.5-turbo".into(),
        messages: vec![Message::user(content)],
        temperature: 0.7,
        max_tokens: 1000,
        user_id: "test-client".into(),
    }
}

fn fast() -> ServiceConfig {
    ServiceConfig {
        chunk_delay: Duration::ZERO,
        ..ServiceConfig::default()
    }
}

#[tokio::test]
async fn streaming_call_delivers_ordered_chunks_then_terminal() {
    let mut client = connect(spawn_server(fast()).await).await;

    let mut stream = client
        .chat_completion_stream(request("hi"))
        .await
        .expect("stream call")
        .into_inner();

    let mut chunks = Vec::new();
    while let Some(chunk) = stream.message().await.expect("chunk") {
        chunks.push(chunk);
    }

    let summary: Vec<(i32, String, String, bool)> = chunks
        .iter()
        .map(|c| {
            let choice = c.choice.clone().unwrap_or_default();
            let content = choice.message.unwrap_or_default().content;
            (choice.index, content, choice.finish_reason, c.done)
        })
        .collect();

    let expected: Vec<(i32, String, String, bool)> = [
        "Echo: ",
        "hi ",
        "(streaming ",
        "response ",
        "from ",
        "server) ",
    ]
    .iter()
    .enumerate()
    .map(|(i, s)| (i as i32, s.to_string(), String::new(), false))
    .chain(std::iter::once((6, String::new(), "stop".to_owned(), true)))
    .collect();

    assert_eq!(summary, expected);
}

#[tokio::test]
async fn invalid_request_fails_both_methods() {
    let mut client = connect(spawn_server(fast()).await).await;

    let mut bad = request("");
    bad.messages.push(Message::assistant("not a user"));

    let status = client
        .chat_completion_stream(bad.clone())
        .await
        .expect_err("stream should be rejected");
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "No user message found");

    let status = client
        .chat_completion(bad)
        .await
        .expect_err("unary should be rejected");
    assert_eq!(status.code(), Code::InvalidArgument);
    assert_eq!(status.message(), "No user message found");
}

#[tokio::test]
async fn unary_call_returns_usage_fixture() {
    let mut client = connect(spawn_server(fast()).await).await;

    let resp = client
        .chat_completion(request("Hello, this is a test message!!"))
        .await
        .expect("unary call")
        .into_inner();

    assert_eq!(resp.id, "msg_complete");
    assert_eq!(resp.choices.len(), 1);
    assert_eq!(resp.choices[0].finish_reason, "stop");
    assert_eq!(resp.usage_prompt_tokens, 31);
    assert_eq!(resp.usage_completion_tokens, 61);
    assert_eq!(resp.usage_total_tokens, 92);
}

#[tokio::test]
async fn dropping_the_stream_stops_the_server_side() {
    let config = ServiceConfig {
        chunk_delay: Duration::from_millis(50),
        stream_buffer: 1,
    };
    let mut client = connect(spawn_server(config).await).await;

    let mut stream = client
        .chat_completion_stream(request("bye"))
        .await
        .expect("stream call")
        .into_inner();

    let first = stream.message().await.expect("chunk").expect("first chunk");
    assert_eq!(first.choice.map(|c| c.index), Some(0));
    drop(stream);

    // The server keeps serving new calls after an abandoned stream.
    let resp = client
        .chat_completion(request("still up"))
        .await
        .expect("unary call after disconnect")
        .into_inner();
    assert_eq!(resp.usage_prompt_tokens, 8);
}
