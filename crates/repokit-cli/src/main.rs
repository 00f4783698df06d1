//! RepoKit CLI - Command-line interface for reading GitHub repositories

mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use repokit::reader::DEFAULT_TOKEN_ENV;
use repokit::{
    Document, GitHubRepositoryReader, ReaderBuilder, ReaderConfig, RunOutput, RunRequest, Secret,
    COMPONENT_LLMTXT,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Output format for fetch subcommand
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum OutputFormat {
    /// JSON `{"documents": [...]}` mapping
    #[default]
    Json,
    /// Each document as markdown with YAML frontmatter
    Md,
}

/// RepoKit - read GitHub repository files as documents
#[derive(Parser, Debug)]
#[command(name = "repokit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Print full help with examples (llmtxt)
    #[arg(long)]
    llmtxt: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as MCP (Model Context Protocol) server over stdio
    Mcp {
        /// Reader configuration file (JSON)
        #[arg(long)]
        config: PathBuf,
    },
    /// Download a repository and print its matching files
    Fetch {
        /// Repository in the form owner/repo (overrides the config file)
        repository: Option<String>,

        /// File extension to keep, including the dot (repeatable)
        #[arg(long = "ext", short = 'e')]
        extensions: Vec<String>,

        /// Branch or tag
        #[arg(long = "ref", short = 'r')]
        git_ref: Option<String>,

        /// File encoding
        #[arg(long)]
        encoding: Option<String>,

        /// Environment variable holding the access token [default: GITHUB_TOKEN]
        #[arg(long)]
        token_env: Option<String>,

        /// GitHub API root (for GitHub Enterprise)
        #[arg(long)]
        api_base_url: Option<String>,

        /// Reader configuration file (JSON)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short, default_value = "json")]
        output: OutputFormat,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    // Handle --llmtxt flag
    if cli.llmtxt {
        writeln_safe(COMPONENT_LLMTXT);
        std::process::exit(0);
    }

    match cli.command {
        Some(Commands::Mcp { config }) => {
            let config = load_config(&config).unwrap_or_else(|e| exit_with_error(&e));
            mcp::run_server(config).await;
        }
        Some(Commands::Fetch {
            repository,
            extensions,
            git_ref,
            encoding,
            token_env,
            api_base_url,
            config,
            output,
        }) => {
            let builder = match config {
                Some(path) => {
                    let config = load_config(&path).unwrap_or_else(|e| exit_with_error(&e));
                    ReaderBuilder::from_config(&config)
                }
                None => GitHubRepositoryReader::builder()
                    .access_token(Secret::from_env_var(DEFAULT_TOKEN_ENV)),
            };
            let builder = apply_overrides(
                builder,
                Overrides {
                    repository,
                    extensions,
                    encoding,
                    token_env,
                    api_base_url,
                },
            );
            run_fetch(builder, git_ref, output).await;
        }
        None => {
            eprintln!("Usage: repokit fetch <owner/repo> --ext .md");
            eprintln!("   or: repokit mcp --config reader.json");
            eprintln!("   or: repokit --help");
            std::process::exit(1);
        }
    }
}

/// Log to stderr so stdout stays machine-readable; `RUST_LOG` overrides
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<ReaderConfig, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
    serde_json::from_str(&raw).map_err(|e| format!("Invalid config {}: {}", path.display(), e))
}

/// Command-line values that take precedence over the config file
#[derive(Debug, Default)]
struct Overrides {
    repository: Option<String>,
    extensions: Vec<String>,
    encoding: Option<String>,
    token_env: Option<String>,
    api_base_url: Option<String>,
}

fn apply_overrides(mut builder: ReaderBuilder, overrides: Overrides) -> ReaderBuilder {
    if let Some(repository) = overrides.repository {
        builder = builder.repository(repository);
    }
    if !overrides.extensions.is_empty() {
        builder = builder.file_extensions(overrides.extensions);
    }
    if let Some(encoding) = overrides.encoding {
        builder = builder.file_encoding(encoding);
    }
    if let Some(name) = overrides.token_env {
        builder = builder.access_token(Secret::from_env_var(name));
    }
    if let Some(url) = overrides.api_base_url {
        builder = builder.api_base_url(url);
    }
    builder
}

async fn run_fetch(builder: ReaderBuilder, git_ref: Option<String>, output: OutputFormat) {
    let reader = builder
        .build()
        .unwrap_or_else(|e| exit_with_error(&e.to_string()));

    let request = RunRequest {
        repository: None,
        git_ref,
    };

    match reader.run(request).await {
        Ok(result) => match output {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&result).unwrap_or_else(|e| {
                    exit_with_error(&format!("Error serializing documents: {}", e))
                });
                writeln_safe(&json);
            }
            OutputFormat::Md => writeln_safe(&format_documents_md(&result)),
        },
        Err(e) => exit_with_error(&e.to_string()),
    }
}

/// Format every document as markdown with YAML frontmatter
fn format_documents_md(output: &RunOutput) -> String {
    output
        .documents
        .iter()
        .map(format_document_md)
        .collect::<Vec<_>>()
        .concat()
}

fn format_document_md(doc: &Document) -> String {
    let mut out = String::new();

    out.push_str("---\n");
    out.push_str(&format!("id: {}\n", doc.id));
    out.push_str(&format!("file_name: {}\n", doc.meta.file_name));
    out.push_str(&format!("file_path: {}\n", doc.meta.file_path));
    out.push_str("---\n");
    out.push_str(&doc.content);
    if !doc.content.ends_with('\n') {
        out.push('\n');
    }

    out
}

fn exit_with_error(message: &str) -> ! {
    eprintln!("Error: {}", message);
    std::process::exit(1);
}

/// Write to stdout, exit silently on broken pipe
fn writeln_safe(s: &str) {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    if let Err(e) = writeln!(handle, "{}", s) {
        if e.kind() == io::ErrorKind::BrokenPipe {
            std::process::exit(0);
        }
        eprintln!("Error writing to stdout: {}", e);
        std::process::exit(1);
    }
}
