//! `runcoach chat`: Interactive or single-message chat mode.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use runcoach_agent::{ChatReply, Coach};
use tokio::io::{AsyncBufReadExt, BufReader};

pub async fn run(config_path: Option<&Path>, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = super::load_config(config_path)?;
    super::require_api_key(&config)?;

    let coach = Arc::new(Coach::from_config(&config)?);
    coach.initialize().await?;
    let session = coach.session();

    if let Some(msg) = message {
        // Single message mode
        eprint!("  Thinking...");
        let reply = session.chat(&msg, None).await;
        eprint!("\r              \r");
        print_reply(&reply);
        if !reply.success {
            return Err("Chat turn failed".into());
        }
        return Ok(());
    }

    // Interactive mode
    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║        RunCoach AI — Interactive Mode        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Provider:  {}", config.default_provider);
    println!("  Model:     {}", coach.model());
    println!("  Tools:     {}", coach.tools().names().join(", "));
    println!("  Knowledge: {:?}", coach.index().status().await);
    println!();
    println!("  Type your message and press Enter.");
    println!("  Type 'reset' to clear history, 'exit' or Ctrl+C to quit.");
    println!();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    print!("  You > ");
    std::io::stdout().flush()?;

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        match input {
            "" => {}
            "exit" | "quit" => break,
            "reset" => {
                session.reset_memory().await;
                println!("  History cleared.");
                println!();
            }
            _ => {
                eprint!("  ...");
                let reply = session.chat(input, None).await;
                eprint!("\r     \r");
                println!();
                print_reply(&reply);
                println!();
            }
        }

        print!("  You > ");
        std::io::stdout().flush()?;
    }

    println!();
    println!("  Goodbye! 👋");
    println!();
    Ok(())
}

fn print_reply(reply: &ChatReply) {
    let prefix = if reply.success { "Coach" } else { "Error" };
    for line in reply.response.lines() {
        println!("  {prefix} > {line}");
    }
}
