//! Retrieval-augmented generation: embed chunks into a vector index, then
//! answer questions from the retrieved context.

use indicatif::{ProgressBar, ProgressStyle};

use raglab_core::error::Result;
use raglab_core::template::PromptTemplate;
use raglab_core::traits::{CompletionModel, Embedder, VectorIndex};
use raglab_core::types::{ChatMessage, Chunk, IndexEntry, SearchHit};

/// Default question-answering prompt. Keeping the model inside the
/// retrieved context is a prompt-level contract; there is no code-level
/// relevance threshold.
pub const RAG_TEMPLATE: &str = "\
You are a helpful assistant.
Answer the question ONLY using the context below.
If the answer is not in the context, say \"I don't know\".

Context:
{context}

Question:
{question}
";

pub const DEFAULT_TOP_K: usize = 2;

/// A question answered from retrieved context.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub context: String,
    pub hits: Vec<SearchHit>,
}

/// The query pipeline: embedder + vector index + completion model,
/// constructed once by the entry point and passed in.
pub struct RagEngine<I: VectorIndex> {
    embedder: Box<dyn Embedder>,
    index: I,
    model: Box<dyn CompletionModel>,
    prompt: PromptTemplate,
    top_k: usize,
}

impl<I: VectorIndex> RagEngine<I> {
    pub fn new(embedder: Box<dyn Embedder>, index: I, model: Box<dyn CompletionModel>) -> Self {
        Self {
            embedder,
            index,
            model,
            prompt: PromptTemplate::new(RAG_TEMPLATE, &["context", "question"]),
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    pub fn with_prompt(mut self, prompt: PromptTemplate) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn index(&self) -> &I {
        &self.index
    }

    /// Embed chunks in one batch and upsert them into the index.
    pub async fn ingest(&self, chunks: &[Chunk]) -> Result<usize> {
        if chunks.is_empty() {
            println!("No chunks to ingest");
            return Ok(0);
        }
        let texts: Vec<String> = chunks.iter().map(|c| c.text.clone()).collect();
        let embeddings = self.embedder.embed_batch(&texts).await?;

        println!("Ingesting {} chunks into the vector index", chunks.len());
        let pb = ProgressBar::new(chunks.len() as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} chunks ({percent}%) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        let mut entries = Vec::with_capacity(chunks.len());
        for (chunk, vector) in chunks.iter().zip(embeddings) {
            let mut metadata = raglab_core::types::Meta::new();
            metadata.insert("doc_id".to_string(), chunk.doc_id.clone());
            metadata.insert("chunk_index".to_string(), chunk.chunk_index.to_string());
            metadata.insert(
                "content_hash".to_string(),
                blake3::hash(chunk.text.as_bytes()).to_hex().to_string(),
            );
            entries.push(IndexEntry {
                id: chunk.id.clone(),
                vector,
                text: chunk.text.clone(),
                metadata,
            });
            pb.inc(1);
        }
        let ingested = entries.len();
        self.index.upsert(entries).await?;
        pb.finish_with_message("✅ ingest complete");
        Ok(ingested)
    }

    /// Top-k most similar chunks for a question, in rank order.
    pub async fn retrieve(&self, question: &str) -> Result<Vec<SearchHit>> {
        let query_vec = self.embedder.embed(question).await?;
        self.index.query(&query_vec, self.top_k).await
    }

    /// Full query pipeline: retrieve, compose the prompt, complete once.
    pub async fn ask(&self, question: &str) -> Result<Answer> {
        let hits = self.retrieve(question).await?;
        let context = hits
            .iter()
            .map(|h| h.text.as_str())
            .collect::<Vec<_>>()
            .join("\n\n");
        let prompt = self
            .prompt
            .format(&[("context", context.as_str()), ("question", question)])?;
        let text = self.model.complete(&[ChatMessage::user(prompt)]).await?;
        Ok(Answer { text, context, hits })
    }
}
