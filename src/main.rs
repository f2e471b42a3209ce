use lisple::{Config, EvaluationContext};
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Logging stays off unless `RUST_LOG` asks for it, and goes to stderr so it
/// never mixes with results.
fn init_tracing() {
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr).with_target(true).with_level(true))
            .with(EnvFilter::from_default_env())
            .init();
    }
}

async fn query(stdout: &mut io::Stdout, lines: &mut io::Lines<io::BufReader<io::Stdin>>, lineno: usize) -> io::Result<Option<String>> {
    stdout.write_all(format!("{} => ", lineno).as_bytes()).await?;
    stdout.flush().await?;
    lines.next_line().await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let mut context = EvaluationContext::with_config(Config::from_env());
    let mut lines = io::BufReader::new(io::stdin()).lines();
    let mut stdout = io::stdout();

    let mut lineno = 0;
    while let Some(line) = query(&mut stdout, &mut lines, lineno).await? {
        let output = match context.evaluate_str(&line) {
            Ok(value) => format!("{}\n", value),
            Err(err) => format!("error[{}]: {}\n", err.kind(), err),
        };
        stdout.write_all(output.as_bytes()).await?;
        lineno += 1;
    }

    // End of input, leave the terminal on a fresh line
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
