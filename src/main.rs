use clap::Parser;
use std::fs;
use std::sync::Arc;
use textprep::{
    Language, LocalBroadcaster, NormalizeResponse, PipelineConfig, RunSummary, TokenJson,
    TranslationSession, generate_execution_id, load_config, read_file, tokenize_with_provenance,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Provenance-tracking text normalizer for translation preprocessing
#[derive(Parser, Debug)]
#[command(name = "textprep")]
#[command(version)]
#[command(about = "Normalize text while tracing every character back to the raw input", long_about = None)]
struct Args {
    /// File to normalize
    #[arg(short, long)]
    file: String,

    /// JSON pipeline configuration
    #[arg(short, long)]
    config: Option<String>,

    /// Input language code (overrides the config file)
    #[arg(short, long)]
    language: Option<Language>,

    /// Skip the whitespace normalizer
    #[arg(long)]
    no_normalize: bool,

    /// Output structured JSON instead of human-readable
    #[arg(short, long)]
    json: bool,

    /// Write output to file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Merge the config file (if any) with command-line overrides
fn resolve_config(args: &Args) -> Result<PipelineConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => load_config(path)?,
        None => PipelineConfig::default(),
    };

    if let Some(language) = args.language {
        config.language = language;
    }
    if args.no_normalize {
        config.normalize_whitespace = false;
    }
    Ok(config)
}

fn run(args: &Args, execution_id: String) -> Result<NormalizeResponse, Box<dyn std::error::Error>> {
    let config = resolve_config(args)?;
    info!(?config, "resolved pipeline config");

    let file_content = read_file(&args.file)
        .map_err(|e| format!("Failed to read file '{}': {}", args.file, e))?;

    let mut session = TranslationSession::open(Arc::new(LocalBroadcaster));

    let pipeline = config.build_pipeline();
    let result = pipeline.run(&file_content.content)?;
    let tokens = tokenize_with_provenance(&config.tokenizer(), &result)?;

    info!(
        session = session.id().0,
        version = result.version(),
        chars = result.char_len(),
        tokens = tokens.len(),
        "pipeline complete"
    );

    let response = NormalizeResponse::success(
        execution_id,
        RunSummary {
            session_id: session.id(),
            language: config.language,
            input_checksum: file_content.checksum,
            stages: pipeline.stage_names().into_iter().map(String::from).collect(),
            result: &result,
            tokens: TokenJson::from_tokens(tokens, &file_content.content),
        },
    );

    session.close();
    Ok(response)
}

fn main() {
    let args = Args::parse();
    init_logging(args.log_json);

    let execution_id = generate_execution_id();
    let response = match run(&args, execution_id.clone()) {
        Ok(response) => response,
        Err(e) => NormalizeResponse::failure(execution_id, e.to_string()),
    };

    output_response(&response, args.json, args.output.as_ref());

    // Exit with error code if not successful
    if !response.success {
        std::process::exit(1);
    }
}

/// Human-readable summary of a run
fn format_human(response: &NormalizeResponse) -> String {
    if !response.success {
        return format!("Error: {}", response.error.as_deref().unwrap_or("Unknown error"));
    }

    let mut lines = vec![
        format!(
            "Normalized text ({} revision(s), {} token(s))",
            response.version,
            response.tokens.len()
        ),
        format!("Final checksum: {}", response.final_checksum.as_deref().unwrap_or("")),
    ];
    if let Some(language) = response.language {
        lines.push(format!("Language: {language}"));
    }
    lines.push(format!("Text: {}", response.text.as_deref().unwrap_or("")));
    for token in &response.tokens {
        lines.push(format!(
            "  {}:{}\t{}\t{} -> {}",
            token.position.line, token.position.column, token.text, token.current, token.original
        ));
    }
    lines.join("\n")
}

/// Format and output the response
fn output_response(response: &NormalizeResponse, json_mode: bool, output_path: Option<&String>) {
    let output = if json_mode {
        serde_json::to_string_pretty(response)
            .unwrap_or_else(|_| r#"{"error": "Failed to serialize response"}"#.to_string())
    } else {
        format_human(response)
    };

    // Write to file or stdout
    if let Some(path) = output_path {
        if let Err(e) = fs::write(path, &output) {
            eprintln!("Failed to write output to '{}': {}", path, e);
            std::process::exit(1);
        }
    } else {
        println!("{}", output);
    }
}
