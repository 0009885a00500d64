//! Comprehensive example showcasing the 22.do client functionality.
//!
//! Features demonstrated:
//! - Creating a client (with optional proxy support)
//! - Generating a filtered, clean-looking Gmail address
//! - Polling the inbox for incoming messages
//! - Fetching full message content

use std::time::Duration;
use tempmail22_client::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("📧 22.do Temp Mail Client - Full Demo");
    println!("{}", "=".repeat(50));

    // =========================================
    // 1. Create client (optionally with proxy)
    // =========================================
    println!("\n🔌 Creating client...");

    // Without proxy:
    let mut client = Client::new()?;

    // With proxy (uncomment to use):
    // let mut client = Client::builder().proxy("http://127.0.0.1:8888").build()?;

    println!("   ✅ Session ready");

    // =========================================
    // 2. Generate a clean Gmail address
    // =========================================
    println!("\n📬 Generating temporary email (max 2 dots, 30 attempts)...");
    let email = loop {
        match client.generate_filtered_mailbox(2, 30).await? {
            Some(email) => break email,
            None => {
                println!("   ⚠️  No acceptable address after 30 attempts, retrying...");
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        }
    };
    println!("   ✅ Mailbox: {email}");

    // =========================================
    // 3. Poll the inbox
    // =========================================
    println!("\n⏳ Waiting for messages...");
    println!("   Send an email to: {email}");
    println!("   (Polling for up to 2 minutes)");

    let start = std::time::Instant::now();
    let timeout = Duration::from_secs(120);
    let poll_interval = Duration::from_secs(3);

    loop {
        let messages = client.check_new_messages().await?;

        if !messages.is_empty() {
            println!("\n\n📥 Received {} message(s)!", messages.len());

            for msg in &messages {
                println!("\n{}", "-".repeat(50));
                println!("Message ID:  {}", msg.mail_id);
                println!("From:        {}", msg.from);
                println!("Subject:     {}", msg.subject);
                println!("Received:    {}", msg.received_ago);

                // =========================================
                // 4. Fetch the full message body
                // =========================================
                println!("\n📄 Fetching message body...");
                match client.fetch_content(&msg.mail_id).await {
                    Ok(html) => {
                        println!("   Body length: {} characters", html.len());
                        println!("   Preview (first 500 chars):");
                        println!("   {}", "-".repeat(40));
                        let preview: String = html.chars().take(500).collect();
                        for line in preview.lines().take(10) {
                            println!("   {line}");
                        }
                        if html.len() > 500 {
                            println!("   ... (truncated)");
                        }
                    }
                    Err(e) => {
                        eprintln!("   ❌ Failed to fetch: {e}");
                    }
                }
            }
            break;
        }

        if start.elapsed() >= timeout {
            println!("\n\n⚠️  Timeout: No messages received");
            break;
        }

        let remaining = (timeout - start.elapsed()).as_secs();
        print!("\r   Checking... {remaining} seconds remaining   ");
        use std::io::Write;
        std::io::stdout().flush().ok();

        tokio::time::sleep(poll_interval).await;
    }

    println!("\n{}", "=".repeat(50));
    println!("✨ Demo complete!");

    Ok(())
}
