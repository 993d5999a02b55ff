//! Tabby command line tool
//!
//! Terminal HTTP testing and stress testing with random data generated from
//! `{{placeholder}}` templates. Argument parsing, the reqwest transport and
//! console reporting live here; rendering and the request loop come from
//! `tabby-engine`.

use clap::{ArgAction, Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tabby_engine::{
    parse_interval, BodySource, FsTemplateSource, HttpMethod, LoopConfig, RequestLoop, RunSummary,
    TabbyError, TabbyResult, TemplateRenderer, TemplateSource, PLACEHOLDER_CATALOG,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

pub mod client;
pub mod logging;
pub mod reporter;


use client::{ClientConfig, ReqwestTransport};
use logging::LoggingConfig;
use reporter::ConsoleReporter;

#[derive(Parser, Debug, Clone)]
#[command(name = "tabby", author, version, long_about = None)]
#[command(about = "A terminal-based HTTP testing and stress testing tool with random data generation")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Request timeout in seconds
    #[arg(long, global = true, default_value_t = 30)]
    pub timeout: u64,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to this file (rotated daily)
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// Accept invalid TLS certificates
    #[arg(long, global = true)]
    pub insecure: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Make a GET request and display the formatted response
    Get(GetArgs),
    /// Make a POST request with optional templated data
    Post(PostArgs),
    /// List the supported placeholders
    Placeholders,
    /// Render data or a template once without sending it
    Render(BodyArgs),
}

#[derive(Args, Debug, Clone)]
pub struct GetArgs {
    /// Target URL
    pub url: String,

    /// Additional header, repeatable: --header "Key: Value"
    #[arg(long = "header")]
    pub headers: Vec<String>,

    #[command(flatten)]
    pub looping: LoopArgs,
}

#[derive(Args, Debug, Clone)]
pub struct PostArgs {
    /// Target URL
    pub url: String,

    #[command(flatten)]
    pub body: BodyArgs,

    /// Content-Type header
    #[arg(short = 'H', long = "content-type", default_value = LoopConfig::DEFAULT_CONTENT_TYPE)]
    pub content_type: String,

    /// Additional header, repeatable: --header "Key: Value"
    #[arg(long = "header")]
    pub headers: Vec<String>,

    #[command(flatten)]
    pub looping: LoopArgs,
}

#[derive(Args, Debug, Clone, Default)]
pub struct BodyArgs {
    /// Request data, may contain placeholders
    #[arg(short, long)]
    pub data: Option<String>,

    /// Template file with placeholders; takes precedence over --data
    #[arg(short, long)]
    pub template: Option<PathBuf>,
}

#[derive(Args, Debug, Clone)]
pub struct LoopArgs {
    /// Send requests in a loop
    #[arg(short, long = "loop")]
    pub looped: bool,

    /// Number of requests in loop mode (0 = until stopped)
    #[arg(short, long, default_value_t = 0, allow_negative_numbers = true)]
    pub count: i64,

    /// Interval between requests in loop mode (e.g. 500ms, 1s, 2m)
    #[arg(short, long, default_value = "1s")]
    pub interval: String,
}

impl Default for LoopArgs {
    fn default() -> Self {
        Self {
            looped: false,
            count: 0,
            interval: "1s".to_string(),
        }
    }
}

impl BodyArgs {
    pub fn body_source(&self) -> BodySource {
        if let Some(path) = &self.template {
            return BodySource::TemplateFile(path.clone());
        }
        match &self.data {
            Some(data) if !data.is_empty() => BodySource::Literal(data.clone()),
            _ => BodySource::None,
        }
    }
}

impl LoopArgs {
    fn apply(&self, config: LoopConfig) -> TabbyResult<LoopConfig> {
        let interval = parse_interval(&self.interval)?;
        if self.looped {
            Ok(config.looped(self.count, interval))
        } else {
            Ok(LoopConfig { interval, ..config })
        }
    }
}

impl GetArgs {
    pub fn to_loop_config(&self) -> TabbyResult<LoopConfig> {
        let config = LoopConfig::new(HttpMethod::Get, self.url.trim())
            .with_content_type("")
            .with_header_entries(&self.headers);
        let config = self.looping.apply(config)?;
        config.validate()?;
        Ok(config)
    }
}

impl PostArgs {
    pub fn to_loop_config(&self) -> TabbyResult<LoopConfig> {
        let config = LoopConfig::new(HttpMethod::Post, self.url.trim())
            .with_content_type(self.content_type.as_str())
            .with_header_entries(&self.headers)
            .with_body(self.body.body_source());
        let config = self.looping.apply(config)?;
        config.validate()?;
        Ok(config)
    }
}

impl Cli {
    pub fn logging_config(&self) -> LoggingConfig {
        let mut config = LoggingConfig::for_verbosity(self.global.verbose, self.global.quiet);
        config.json_format = self.global.json_logs;
        config.log_file = self.global.log_file.clone();
        config
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            timeout: Duration::from_secs(self.global.timeout),
            insecure: self.global.insecure,
        }
    }
}

/// Result of a successfully executed command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// A request run finished or was stopped
    Run(RunSummary),
    /// Output was printed without sending anything
    Printed,
}

/// Execute a parsed command, writing user facing output to `console`
pub async fn execute<O, E>(
    cli: &Cli,
    cancel: CancellationToken,
    console: &mut ConsoleReporter<O, E>,
) -> TabbyResult<Outcome>
where
    O: Write + Send,
    E: Write + Send,
{
    let config = match &cli.command {
        Command::Get(args) => args.to_loop_config()?,
        Command::Post(args) => args.to_loop_config()?,
        Command::Placeholders => {
            print_placeholders(console)?;
            return Ok(Outcome::Printed);
        }
        Command::Render(args) => {
            render_once(args, console).await?;
            return Ok(Outcome::Printed);
        }
    };

    let transport = Arc::new(ReqwestTransport::new(&cli.client_config())?);
    let mut runner = RequestLoop::new(transport).with_cancellation(cancel);
    let summary = runner.run(&config, console).await?;

    Ok(Outcome::Run(summary))
}

/// Run a parsed command against stdout/stderr and return the exit code
pub async fn run(cli: &Cli, cancel: CancellationToken) -> i32 {
    let mut console = ConsoleReporter::stdio();

    match execute(cli, cancel, &mut console).await {
        Ok(Outcome::Run(summary)) if !summary.completed => {
            if let Err(e) = console.print_line(&format!("\n Stopped after {} requests", summary.requests_sent)) {
                warn!("Failed to write summary: {}", e);
            }
            0
        }
        Ok(_) => 0,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!("Hint: {}", e.remediation());
            e.exit_code()
        }
    }
}

fn print_placeholders<O, E>(console: &mut ConsoleReporter<O, E>) -> TabbyResult<()>
where
    O: Write + Send,
    E: Write + Send,
{
    console.print_line("Available placeholders:")?;
    for info in PLACEHOLDER_CATALOG {
        console.print_line(&format!("  {:<18} - {}", info.example, info.description))?;
    }
    console.print_line("")?;
    console.print_line("Note: for numeric JSON fields, don't wrap placeholders in quotes:")?;
    console.print_line("  ✓ \"price\": {{price}}")?;
    console.print_line("  ✗ \"price\": \"{{price}}\"")?;
    Ok(())
}

async fn render_once<O, E>(args: &BodyArgs, console: &mut ConsoleReporter<O, E>) -> TabbyResult<()>
where
    O: Write + Send,
    E: Write + Send,
{
    let template = match args.body_source() {
        BodySource::TemplateFile(path) => FsTemplateSource.read_template(&path).await?,
        BodySource::Literal(data) => data,
        BodySource::None => {
            return Err(TabbyError::configuration(
                "render",
                "provide --data or --template to render",
            ))
        }
    };

    let output = TemplateRenderer::new().render_detailed(&template);
    if !output.unresolved.is_empty() {
        info!(
            unresolved = ?output.unresolved,
            "Unknown placeholders were left as written"
        );
    }

    console.print_line(&output.text)?;
    Ok(())
}
