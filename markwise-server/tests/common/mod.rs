//! Shared test utilities for markwise-server integration tests

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use markwise_core::{FeedbackCategory, MemoryRetryStore, ModelClient};
use markwise_models::providers::ScriptedProvider;
use markwise_server::{AppState, MarkwiseServer, ServerConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Creates a test server backed by `provider`, returns state and address
pub async fn create_test_server(provider: Arc<ScriptedProvider>) -> (Arc<AppState>, SocketAddr) {
    let client = ModelClient::new(provider, "test-model");
    let retries = Arc::new(MemoryRetryStore::new(Duration::from_secs(60)));
    let state = Arc::new(AppState::with_model(client, retries));

    let server = MarkwiseServer::with_state(ServerConfig::default(), Arc::clone(&state));
    let addr = spawn_server(server).await;

    (state, addr)
}

/// Spawns server in background task, returns bound address
async fn spawn_server(server: MarkwiseServer) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        let _ = server.run_with_listener(listener).await;
    });

    // Brief delay to ensure server is accepting connections
    tokio::time::sleep(Duration::from_millis(10)).await;

    addr
}

pub const PHOTOSYNTHESIS: &str =
    "Photosynthesis converts sunlight, water, and CO2 into glucose and oxygen";

/// Three-question bank: capital (saq), photosynthesis (saq), gas (mcq)
pub fn question_bank() -> Value {
    json!({
        "questions": [
            {
                "question_id": "capital",
                "page_number": 1,
                "question_type": "saq",
                "question_text": "What is the capital of France?",
                "ideal_answer": "Paris"
            },
            {
                "question_id": "photo",
                "page_number": 2,
                "question_type": "saq",
                "question_text": "What is photosynthesis?",
                "ideal_answer": PHOTOSYNTHESIS
            },
            {
                "question_id": "gas",
                "page_number": 3,
                "question_type": "mcq",
                "question_text": "Which gas do plants release?",
                "mcq_options": [
                    {"option_id": "n", "text": "Nitrogen", "is_correct": false},
                    {"option_id": "o", "text": "Oxygen", "is_correct": true}
                ]
            }
        ]
    })
}

/// POST an answer and return status plus JSON body
pub async fn submit(
    addr: SocketAddr,
    question_id: &str,
    answer: &str,
    session_id: Option<&str>,
) -> (reqwest::StatusCode, Value) {
    let mut body = json!({
        "question_id": question_id,
        "answer": answer,
        "question_bank": question_bank(),
        "current_score": 0,
        "total_questions_answered": 0
    });
    if let Some(session) = session_id {
        body["session_id"] = json!(session);
    }

    let response = reqwest::Client::new()
        .post(format!("http://{addr}/assessment/quiz/answer"))
        .json(&body)
        .send()
        .await
        .unwrap();
    let status = response.status();
    (status, response.json().await.unwrap())
}

/// JSON reply for the semantic scorer
pub fn score_reply(score: f64) -> String {
    let category = FeedbackCategory::from_score(score);
    format!(r#"{{"score": {score}, "category": "{category}", "reasoning": "scripted"}}"#)
}
