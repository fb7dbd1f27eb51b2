//! Interactive command-line front end for the generation engine.
//!
//! One async line loop: a plain line submits a topic, slash commands manage
//! the session. The engine stays responsive while a request is in flight,
//! so `/cancel` works mid-generation.

use std::sync::Arc;

use eyre::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

use speechgen::export::export_document;
use speechgen::language::Language;
use speechgen::session::{GenerationOutcome, SessionEngine, SubmitOutcome};
use speechgen::{Config, GeminiClient};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .init();

    let client = Arc::new(GeminiClient::new(&config));
    let engine = SessionEngine::new_with_timeout(
        client,
        config.language,
        std::time::Duration::from_secs(config.request_timeout_secs),
    );

    println!("speechgen — type a topic to generate, /help for commands");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await? {
            Some(line) => line,
            None => break,
        };
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        match input.split_once(' ').map_or((input, ""), |(c, rest)| (c, rest.trim())) {
            ("/quit" | "/exit", _) => break,
            ("/help", _) => print_help(),
            ("/cancel", _) => {
                if engine.cancel() {
                    println!("Generation cancelled.");
                } else {
                    println!("Nothing to cancel.");
                }
            }
            ("/lang", tag) => match Language::from_tag(tag) {
                Some(language) => {
                    engine.set_language(language);
                    println!("Language set to {}.", language.tag());
                }
                None => println!("Unknown language, use: /lang ru | kz"),
            },
            ("/history", _) => print_history(&engine),
            ("/export", index) => export_entry(&engine, index),
            (command, _) if command.starts_with('/') => {
                println!("Unknown command {command}, try /help");
            }
            _ => submit_topic(&engine, input),
        }
    }

    Ok(())
}

fn submit_topic(engine: &SessionEngine, topic: &str) {
    match engine.submit(topic) {
        // Ignored submits (empty topic, request already in flight) are
        // silent no-ops, the same as in the engine.
        SubmitOutcome::Ignored => {}
        SubmitOutcome::Started(handle) => {
            println!("Generating…");
            let language = engine.language();
            // Await the outcome off the input loop so /cancel stays usable.
            tokio::spawn(async move {
                match handle.await {
                    Ok(GenerationOutcome::Completed(results)) => {
                        for result in &results {
                            println!();
                            println!("— {} ({}, {})", result.title, result.author, result.category);
                            if result.script.is_empty() {
                                println!("  [all sentences were duplicates of earlier results]");
                            } else {
                                println!("{}", result.script);
                            }
                        }
                    }
                    Ok(GenerationOutcome::Cancelled) => {
                        // Discarded silently; /cancel already reported.
                    }
                    Ok(GenerationOutcome::Failed(err)) => {
                        tracing::warn!(error = %err, "generation failed");
                        println!("{}", err.user_message(language));
                    }
                    Err(join_err) => {
                        tracing::error!(error = %join_err, "generation task panicked");
                    }
                }
            });
        }
    }
}

fn print_history(engine: &SessionEngine) {
    let history = engine.history();
    if history.is_empty() {
        println!("History is empty.");
        return;
    }
    for (index, result) in history.iter().enumerate() {
        println!(
            "{index:>3}  {}  {} ({})",
            result.created_at.format("%H:%M:%S"),
            result.title,
            result.category,
        );
    }
}

fn export_entry(engine: &SessionEngine, index: &str) {
    let Ok(index) = index.parse::<usize>() else {
        println!("Usage: /export <history index>");
        return;
    };
    let history = engine.history();
    let Some(result) = history.get(index) else {
        println!("No history entry {index}, see /history");
        return;
    };

    let document = export_document(result);
    match std::fs::write(&document.file_name, &document.contents) {
        Ok(()) => println!("Saved {}", document.file_name),
        Err(err) => println!("Could not write {}: {err}", document.file_name),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  <topic>          generate a new script about the topic");
    println!("  /cancel          cancel the in-flight generation");
    println!("  /history         list this session's results, newest first");
    println!("  /export <index>  save a history entry as a .doc file");
    println!("  /lang ru|kz      switch the target language");
    println!("  /quit            exit");
}
