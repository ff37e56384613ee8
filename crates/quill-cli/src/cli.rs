use std::path::PathBuf;

use clap::{Parser, Subcommand};
use quill_orchestrator::DocumentStyle;

/// Command-line arguments for the quill CLI
#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Plan and dry-run document editing requests", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        help = "Config file to use instead of the default location"
    )]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Classify how complex a request is")]
    Classify {
        #[arg(help = "The request to classify")]
        request: String,
    },

    #[command(about = "Classify a request and build a plan when one is needed")]
    Plan {
        #[arg(help = "The request to plan")]
        request: String,

        #[arg(long, help = "Maximum number of dynamically assembled steps")]
        max_steps: Option<usize>,

        #[arg(long, help = "Mark every planned step as needing confirmation")]
        confirm_steps: bool,
    },

    #[command(about = "Build a remediation plan from review findings")]
    ReviewPlan {
        #[arg(help = "The request that refers to the review")]
        request: String,

        #[arg(short, long, help = "JSON file holding the review result")]
        findings: PathBuf,
    },

    #[command(about = "Print the planning prompt for a request")]
    Prompt {
        #[arg(help = "The request to plan")]
        request: String,

        #[arg(short, long, help = "Summary of the open document")]
        summary: Option<String>,

        #[arg(short, long, help = "JSON file holding review findings")]
        findings: Option<PathBuf>,
    },

    #[command(about = "Print the canned formatting plan for a document style")]
    Style {
        #[arg(help = "academic, business or casual")]
        style: DocumentStyle,
    },

    #[command(about = "Plan a request and run it against dry-run tools")]
    Simulate {
        #[arg(help = "The request to run")]
        request: String,

        #[arg(long, help = "Per-step timeout in milliseconds")]
        timeout_ms: Option<u64>,

        #[arg(long, help = "Keep running after a step fails")]
        continue_on_error: bool,

        #[arg(short, long, help = "Log every step outcome at info level")]
        verbose: bool,

        #[arg(long, value_name = "TOOL", help = "Make a dry-run tool fail")]
        fail: Vec<String>,
    },

    #[command(about = "Show configuration")]
    Config,
}
