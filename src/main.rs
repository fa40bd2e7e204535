//! Demo binary: runs student queries through the support desk and prints
//! each step as it completes.
//!
//! ```text
//! cargo run -- "When is the registration deadline for Spring 2026?"
//! ```
//!
//! With no arguments, a built-in set of sample queries is used. Requires
//! `ANTHROPIC_API_KEY` (a `.env` file works).

use std::sync::Arc;

use campus_desk::events::RouterEvent;
use campus_desk::responder::AnthropicResponder;
use campus_desk::router::SupportDesk;
use campus_desk::telemetry;

const SAMPLE_QUERIES: &[&str] = &[
    "When is the registration deadline for Spring 2026?",
    "What scholarships are available and can I pay fees via M-Pesa?",
    "I can't log into the student portal and my email isn't syncing.",
];

#[tokio::main]
async fn main() -> miette::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();
    miette::set_panic_hook();

    let responder = Arc::new(AnthropicResponder::from_env()?);
    let mut desk = SupportDesk::new(responder);
    let events = desk.event_stream();

    let printer = tokio::spawn(async move {
        while let Ok(event) = events.recv_async().await {
            match event {
                RouterEvent::StepStarted { agent, iteration, .. } => {
                    println!("→ [{iteration}] {agent} ...");
                }
                RouterEvent::StepCompleted {
                    agent,
                    iteration,
                    preview,
                    ..
                } => {
                    println!("✓ [{iteration}] {agent}: {preview}");
                    println!("{}", "-".repeat(60));
                }
                RouterEvent::SessionFinished {
                    escalated, steps, ..
                } => {
                    println!("session finished after {steps} steps (escalated: {escalated})\n");
                }
            }
        }
    });

    let args: Vec<String> = std::env::args().skip(1).collect();
    let queries: Vec<String> = if args.is_empty() {
        SAMPLE_QUERIES.iter().map(|q| q.to_string()).collect()
    } else {
        args
    };

    for query in &queries {
        println!("{}", "=".repeat(60));
        println!("Student query: {query}");
        println!("{}", "=".repeat(60));

        let session = desk.run(query).await?;

        if let Some(reply) = session.messages().last() {
            println!("\nFinal response:\n{}\n", reply.content);
        }
        if let Some(escalation) = session.escalation() {
            println!("Escalated to human support: {}\n", escalation.reason());
        }
    }

    drop(desk);
    let _ = printer.await;
    Ok(())
}
