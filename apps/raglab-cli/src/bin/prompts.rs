use raglab_core::chunker::split_with_overlap;
use raglab_core::config::Config;
use raglab_core::template::PromptTemplate;
use raglab_core::traits::CompletionModel;
use raglab_core::types::ChatMessage;
use raglab_llm::chat::{ChatClient, DEFAULT_CHAT_MODEL};

const EXPLAIN_TEMPLATE: &str = "\
You are a helpful assistant.
Explain the following text in {language} language.

TEXT:
{text}
";

const LONG_TEXT: &str = "\
Albert Einstein developed the theory of relativity, which changed our
understanding of space, time, and gravity. Special relativity explains
how time slows down at high speeds, while general relativity explains
how massive objects bend space-time.
";

/// Template demo: one templated completion, a batched round-trip, and
/// per-chunk completions over a split text. One-shot; errors abort.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let model_name: String = config
        .get("llm.model")
        .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
    let client = ChatClient::new(Config::api_key()?, model_name)?
        .with_temperature(0.7)
        .with_max_tokens(500);

    let explain = PromptTemplate::new(EXPLAIN_TEMPLATE, &["language", "text"]);

    // Single call
    let prompt = explain.format(&[
        ("language", "simple English"),
        ("text", "Explain the theory of relativity"),
    ])?;
    let response = client.complete(&[ChatMessage::user(prompt)]).await?;
    println!("\n🔹 SINGLE RESPONSE:");
    println!("{}", response);

    // Batch call: independent prompts, one round-trip, input order kept
    let prompts = vec![
        explain.format(&[("language", "English"), ("text", "What is JavaScript?")])?,
        explain.format(&[("language", "English"), ("text", "What is the capital of France?")])?,
    ];
    let responses = client.complete_batch(&prompts).await?;
    println!("\n🔹 BATCH RESPONSES:");
    for (i, res) in responses.iter().enumerate() {
        println!("{}. {}", i + 1, res);
    }

    // Chunked calls
    let chunks = split_with_overlap(LONG_TEXT, 150, 30)?;
    println!("\n🧩 TOTAL CHUNKS: {}", chunks.len());
    for (i, (_, text)) in chunks.iter().enumerate() {
        let prompt = explain.format(&[("language", "simple English"), ("text", text)])?;
        let response = client.complete(&[ChatMessage::user(prompt)]).await?;
        println!("\n🔸 CHUNK {} RESPONSE:", i + 1);
        println!("{}", response);
    }

    Ok(())
}
