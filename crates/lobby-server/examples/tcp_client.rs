use std::env;
use std::io::{self, Write};
use std::time::Duration;

use lobby_protocol::parse_input_line;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Where to connect: env override or default.
    let addr = env::var("LOBBY_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:9000".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");
    println!("Type commands like:");
    println!("  I, 1            (identify as user 1, required first)");
    println!("  J, 100          (join table 100)");
    println!("  S, 100          (spectate table 100)");
    println!("  M, 100, hello   (chat)");
    println!("  L, 100          (leave)");
    println!("  T               (list my tables)");
    println!("Type 'quit' or 'exit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let stdin = io::stdin();

    loop {
        // Prompt
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            // EOF
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            println!("Exiting client.");
            break;
        }

        // Catch typos locally; the server would reject them anyway.
        if let Err(e) = parse_input_line(trimmed) {
            eprintln!("Could not parse line: {}", e);
            continue;
        }

        write_half.write_all(format!("{}\n", trimmed).as_bytes()).await?;

        // Print everything that arrives shortly after.
        loop {
            match timeout(Duration::from_millis(100), lines.next_line()).await {
                Ok(Ok(Some(reply))) => println!("<< {}", reply),
                Ok(Ok(None)) => {
                    println!("Server closed the connection.");
                    return Ok(());
                }
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => break,
            }
        }
    }

    Ok(())
}
