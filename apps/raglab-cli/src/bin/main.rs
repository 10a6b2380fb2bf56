use std::env;
use std::path::PathBuf;

use raglab_core::chunker::ChunkingConfig;
use raglab_core::config::Config;
use raglab_core::document::DocumentProcessor;
use raglab_embed::get_default_embedder;
use raglab_llm::chat::{ChatClient, DEFAULT_CHAT_MODEL};
use raglab_rag::{RagEngine, DEFAULT_TOP_K};
use raglab_vector::RemoteVectorIndex;

fn parse_args() -> (String, Vec<String>) {
    let mut args: Vec<String> = env::args().collect();
    let prog = args.remove(0);
    if args.is_empty() {
        eprintln!("Usage: {} <ingest|search|ask> [args...]", prog);
        std::process::exit(1);
    }
    let cmd = args.remove(0);
    (cmd, args)
}

async fn build_engine(config: &Config) -> anyhow::Result<RagEngine<RemoteVectorIndex>> {
    let index_url: String = config
        .get("index.url")
        .unwrap_or_else(|_| "http://localhost:8000".to_string());
    let collection: String = config
        .get("index.collection")
        .unwrap_or_else(|_| "documents".to_string());
    let model_name: String = config
        .get("llm.model")
        .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
    let top_k: usize = config.get("rag.top_k").unwrap_or(DEFAULT_TOP_K);

    let embedder = get_default_embedder(config)?;
    let index = RemoteVectorIndex::connect(&index_url, &collection).await?;
    let model = ChatClient::new(Config::api_key()?, model_name)?.with_temperature(0.0);
    Ok(RagEngine::new(embedder, index, Box::new(model)).with_top_k(top_k))
}

fn chunking_config(config: &Config) -> anyhow::Result<ChunkingConfig> {
    let chunk_size: usize = config.get("rag.chunk_size").unwrap_or(200);
    let chunk_overlap: usize = config.get("rag.chunk_overlap").unwrap_or(40);
    Ok(ChunkingConfig::new(chunk_size, chunk_overlap)?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();
    let config = Config::load().map_err(|e| {
        eprintln!("Error loading config: {}", e);
        e
    })?;
    let (cmd, args) = parse_args();
    match cmd.as_str() {
        "ingest" => {
            let data_path = args.get(0).map(PathBuf::from).unwrap_or_else(|| {
                let path: String = config
                    .get("data.file")
                    .unwrap_or_else(|_| "data/docs.txt".to_string());
                PathBuf::from(path)
            });
            println!("Ingesting from {}", data_path.display());
            let processor = DocumentProcessor::with_chunking(chunking_config(&config)?);
            let chunks = if data_path.is_dir() {
                processor.process_directory(&data_path)?
            } else {
                processor.process_file(&data_path)?
            };
            println!("🧩 Total chunks: {}", chunks.len());
            let engine = build_engine(&config).await?;
            let ingested = engine.ingest(&chunks).await?;
            println!("✅ Ingest complete ({} chunks)", ingested);
        }
        "search" => {
            let query = args.get(0).cloned().unwrap_or_else(|| {
                eprintln!("Usage: raglab search \"<query>\"");
                std::process::exit(1)
            });
            let engine = build_engine(&config).await?;
            let hits = engine.retrieve(&query).await?;
            println!("\n🔍 Query: {}\n", query);
            if hits.is_empty() {
                println!("No similar chunks found.");
            } else {
                println!("📌 Similar chunks:\n");
                for (i, hit) in hits.iter().enumerate() {
                    println!("{}. score={:.4}  {}", i + 1, hit.score, hit.text);
                }
            }
        }
        "ask" => {
            let question = args.get(0).cloned().unwrap_or_else(|| {
                eprintln!("Usage: raglab ask \"<question>\"");
                std::process::exit(1)
            });
            let engine = build_engine(&config).await?;
            let answer = engine.ask(&question).await?;
            println!("\n❓ Question: {}", question);
            println!("\n📚 Retrieved Context:\n{}", answer.context);
            println!("\n🤖 Answer:\n{}", answer.text);
        }
        _ => {
            eprintln!("Unknown command: {}", cmd);
            std::process::exit(1);
        }
    }
    Ok(())
}
