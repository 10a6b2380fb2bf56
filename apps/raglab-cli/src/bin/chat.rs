use std::io::{self, Write};

use raglab_core::config::Config;
use raglab_llm::chat::{ChatClient, ChatSession, DEFAULT_CHAT_MODEL};
use raglab_llm::ToolRegistry;

/// Interactive chat with tool calling. Service errors are reported and the
/// loop keeps going; only a failed startup aborts.
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

    let client = ChatClient::new(Config::api_key()?, model_name)?;
    let registry = ToolRegistry::builtin()?;
    let mut session = ChatSession::with_tools(&client, &registry)
        .with_system_prompt("You are a helpful assistant.");

    println!("🤖 Chat started (type 'exit' to quit)");
    loop {
        print!("You: ");
        io::stdout().flush()?;

        let mut input = String::new();
        if io::stdin().read_line(&mut input)? == 0 {
            break;
        }
        let input = input.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") || input.eq_ignore_ascii_case("quit") {
            println!("👋 Bye!");
            break;
        }

        match session.send(input).await {
            Ok(reply) => println!("AI: {}", reply),
            Err(e) => {
                eprintln!("❌ Chat error: {}", e);
                continue;
            }
        }
    }
    Ok(())
}
