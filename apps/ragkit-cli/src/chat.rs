use anyhow::Result;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};

use ragkit_core::VectorStore;
use ragkit_pipeline::prompt::{augment, build_messages};
use ragkit_pipeline::{RagPipeline, RetrieveOptions};

use crate::completion::ChatClient;

/// Read a question, retrieve context, augment, generate; until `exit` or EOF.
pub async fn run_console_chat<S: VectorStore>(
    pipeline: &RagPipeline<S>,
    opts: &RetrieveOptions,
    client: Option<&ChatClient>,
) -> Result<()> {
    println!("Welcome to the RAG-powered console chat! Type 'exit' to quit.");
    if client.is_none() {
        println!("⚠️  chat.api_key is not set, the augmented prompt is shown instead of an answer");
    }
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("You: ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let question = line.trim();
        if question.eq_ignore_ascii_case("exit") {
            println!("Exiting chat. Goodbye!");
            break;
        }
        if question.is_empty() {
            continue;
        }
        match answer(pipeline, opts, client, question).await {
            Ok(reply) => println!("AI: {reply}\n"),
            Err(e) => eprintln!("❌ {e:#}\n"),
        }
    }
    Ok(())
}

async fn answer<S: VectorStore>(
    pipeline: &RagPipeline<S>,
    opts: &RetrieveOptions,
    client: Option<&ChatClient>,
    question: &str,
) -> Result<String> {
    let context = pipeline.retrieve(question, opts).await?;
    match client {
        Some(client) => client.complete(&build_messages(&context, question)).await,
        None => Ok(format!("\n{}", augment(&context, question))),
    }
}
