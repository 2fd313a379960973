//! Revcheck: fake review detector CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use revcheck::bulk;
use revcheck::config::{default_config_json, load_config, Config, CONFIG_FILENAME};
use revcheck::reporter::{ConsoleReporter, JsonReporter};
use revcheck::transcribe::{transcribe_review, AudioFormat, HttpTranscriber};
use revcheck::translate::{translate_review, HttpTranslator};
use revcheck::{Rating, Review, ReviewScorer};
use std::io::{IsTerminal, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Revcheck: heuristic fake review detector
#[derive(Parser, Debug)]
#[command(name = "revcheck")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: search .revcheckrc.json in current dir and parents)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiet mode (minimal output)
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Verbose output (also enables debug logging)
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a single review
    Check {
        /// Review text (omit to use --file or stdin)
        text: Option<String>,

        /// Read the review text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Star rating (1-5); enables the sentiment/rating checks
        #[arg(long, short, value_parser = parse_rating)]
        rating: Option<Rating>,

        /// Translate the review before scoring; pick the language with --translate=LANG
        /// (default target: config or "en")
        #[arg(long, value_name = "LANG", num_args = 0..=1, require_equals = true)]
        translate: Option<Option<String>>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Minimum genuineness score (exit 1 if below)
        #[arg(long, short)]
        threshold: Option<u8>,
    },

    /// Score every review in a CSV file with a 'review' column
    Bulk {
        /// Input CSV file
        input: PathBuf,

        /// Write results as CSV to this path ("-" for stdout)
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Number of parallel threads (default: number of CPU cores)
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Predict a label with the trained ML model
    Predict {
        /// Review text (omit to use --file or stdin)
        text: Option<String>,

        /// Read the review text from a file
        #[arg(long, conflicts_with = "text")]
        file: Option<PathBuf>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Transcribe a spoken review (mp3, wav, webm)
    Transcribe {
        /// Audio file
        audio: PathBuf,

        /// Audio format hint (default: from file extension)
        #[arg(long)]
        format: Option<String>,

        /// Score the transcript
        #[arg(long)]
        score: bool,

        /// Star rating used when scoring
        #[arg(long, short, value_parser = parse_rating, requires = "score")]
        rating: Option<Rating>,

        /// Translate the transcript before scoring (--translate=LANG for a target)
        #[arg(
            long,
            value_name = "LANG",
            num_args = 0..=1,
            require_equals = true,
            requires = "score"
        )]
        translate: Option<Option<String>>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Create .revcheckrc.json with sensible defaults
    Init {
        /// Minimum score threshold (e.g. 60)
        #[arg(long)]
        threshold: Option<u8>,

        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Shared state for every command
struct App {
    config: Config,
    cwd: PathBuf,
    quiet: bool,
    verbose: bool,
    use_colors: bool,
}

impl App {
    fn console(&self) -> ConsoleReporter {
        let mut reporter = ConsoleReporter::new();
        if self.verbose {
            reporter = reporter.verbose();
        }
        if !self.use_colors {
            reporter = reporter.without_colors();
        }
        reporter
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn parse_rating(s: &str) -> Result<Rating, String> {
    s.parse::<Rating>().map_err(|e| e.to_string())
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();

    revcheck::logging::init_tracing("warn", args.verbose);
    if args.no_color {
        colored::control::set_override(false);
    }

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    if let Commands::Init { threshold, dir } = &args.command {
        return run_init(*threshold, dir.as_deref().unwrap_or(&cwd));
    }

    let config = load_config(&cwd, args.config.as_deref())?;
    let app = App {
        config,
        cwd,
        quiet: args.quiet,
        verbose: args.verbose,
        use_colors: !args.no_color,
    };

    match args.command {
        Commands::Check {
            text,
            file,
            rating,
            translate,
            json,
            threshold,
        } => run_check(&app, text, file, rating, translate, json, threshold),
        Commands::Bulk {
            input,
            output,
            json,
            jobs,
        } => run_bulk(&app, &input, output.as_deref(), json, jobs),
        Commands::Predict { text, file, json } => run_predict(&app, text, file, json),
        Commands::Transcribe {
            audio,
            format,
            score,
            rating,
            translate,
            json,
        } => run_transcribe(&app, &audio, format, score, rating, translate, json),
        Commands::Init { .. } => unreachable!("handled above"),
    }
}

fn run_check(
    app: &App,
    text: Option<String>,
    file: Option<PathBuf>,
    rating: Option<Rating>,
    translate: Option<Option<String>>,
    json: bool,
    threshold: Option<u8>,
) -> Result<ExitCode> {
    let text = read_review_text(text, file.as_deref())?;
    let text = maybe_translate(app, &text, translate);

    let scorer = ReviewScorer::from_config(&app.config);
    let review = Review { text, rating };
    let result = scorer.score_review(&review);

    if json {
        println!("{}", JsonReporter::new().pretty().report(&review, &result));
    } else if app.quiet {
        app.console().report_quiet(&result);
    } else {
        app.console().report(&review, &result);
    }

    // Check threshold (config or CLI)
    let threshold = app.config.clone().merge_with_cli(threshold).threshold;
    if let Some(threshold) = threshold {
        if result.score < threshold {
            if !app.quiet && !json {
                eprintln!(
                    "\n{}: Score {} is below threshold {}",
                    "Failed".red().bold(),
                    result.score,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_bulk(
    app: &App,
    input: &Path,
    output: Option<&Path>,
    json: bool,
    jobs: Option<usize>,
) -> Result<ExitCode> {
    // Set up parallel processing
    if let Some(jobs) = jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let file = std::fs::File::open(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let scorer = ReviewScorer::from_config(&app.config);
    let report = bulk::process(file, &scorer)
        .with_context(|| format!("Failed to process {}", input.display()))?;

    match output {
        Some(path) if path == Path::new("-") => {
            bulk::write_csv(&report, std::io::stdout().lock())?;
        }
        Some(path) => {
            let out = std::fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            bulk::write_csv(&report, out)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            if !app.quiet && !json {
                eprintln!(
                    "{}: {} results written to {}",
                    "Info".blue(),
                    report.rows.len(),
                    path.display()
                );
            }
        }
        None => {}
    }

    let stdout_taken = matches!(output, Some(p) if p == Path::new("-"));
    if json && !stdout_taken {
        println!("{}", JsonReporter::new().pretty().report_bulk(&report));
    } else if !app.quiet && !stdout_taken {
        app.console().report_bulk(&report);
    }

    Ok(ExitCode::SUCCESS)
}

fn run_predict(
    app: &App,
    text: Option<String>,
    file: Option<PathBuf>,
    json: bool,
) -> Result<ExitCode> {
    let artifacts = app.config.model_artifacts(&app.cwd);
    // Loaded once, before any input is read
    let classifier = match artifacts.load() {
        Ok(classifier) => classifier,
        Err(e) if e.is_missing() => {
            eprintln!("{}: ML model not available: {}", "Warning".yellow(), e);
            eprintln!(
                "   Expected {} and {} (set \"model\" in {} to change)",
                artifacts.model.display(),
                artifacts.vectorizer.display(),
                CONFIG_FILENAME
            );
            return Ok(ExitCode::from(2));
        }
        Err(e) => return Err(e.into()),
    };

    let text = read_review_text(text, file.as_deref())?;
    let label = classifier.predict(&text);

    if json {
        println!(
            "{}",
            JsonReporter::new()
                .pretty()
                .report_prediction(&text, &label, classifier.fingerprint())
        );
    } else if app.quiet {
        println!("{}", label);
    } else {
        app.console().report_prediction(&label, classifier.fingerprint());
    }
    Ok(ExitCode::SUCCESS)
}

fn run_transcribe(
    app: &App,
    audio_path: &Path,
    format: Option<String>,
    score: bool,
    rating: Option<Rating>,
    translate: Option<Option<String>>,
    json: bool,
) -> Result<ExitCode> {
    let format = match format {
        Some(hint) => hint.parse::<AudioFormat>()?,
        None => AudioFormat::from_path(audio_path)?,
    };
    let audio = std::fs::read(audio_path)
        .with_context(|| format!("Failed to read {}", audio_path.display()))?;

    let transcriber = match app.config.transcription.url {
        Some(ref url) => {
            let mut t = HttpTranscriber::new(url.clone());
            if let Some(ref language) = app.config.transcription.language {
                t = t.language(language.clone());
            }
            if let Ok(key) = std::env::var("REVCHECK_TRANSCRIBE_KEY") {
                t = t.api_key(key);
            }
            t
        }
        None => HttpTranscriber::from_env()?,
    };

    let transcript = match transcribe_review(&transcriber, &audio, format) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("{}: Transcription failed: {}", "Error".red().bold(), e);
            return Ok(ExitCode::from(2));
        }
    };

    if !score {
        if json {
            println!("{}", serde_json::json!({ "transcript": transcript }));
        } else {
            println!("{}", transcript);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if !app.quiet && !json {
        println!("{}: {}", "Transcript".bold(), transcript);
    }
    let text = maybe_translate(app, &transcript, translate);
    let review = Review { text, rating };
    let result = ReviewScorer::from_config(&app.config).score_review(&review);

    if json {
        println!("{}", JsonReporter::new().pretty().report(&review, &result));
    } else if app.quiet {
        app.console().report_quiet(&result);
    } else {
        app.console().report(&review, &result);
    }
    Ok(ExitCode::SUCCESS)
}

fn run_init(threshold: Option<u8>, dir: &Path) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let threshold_value = threshold.unwrap_or(60);
    std::fs::write(&config_path, default_config_json(threshold_value)).with_context(|| {
        format!("Failed to write config to {}", config_path.display())
    })?;

    println!(
        "{}: Created {} with threshold={}",
        "Done".green().bold(),
        config_path.display(),
        threshold_value
    );
    Ok(ExitCode::SUCCESS)
}

/// Review text from the argument, a file, or stdin
fn read_review_text(text: Option<String>, file: Option<&Path>) -> Result<String> {
    if let Some(text) = text {
        return Ok(text);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }
    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        anyhow::bail!("No review text given (pass TEXT, --file, or pipe it on stdin)");
    }
    let mut buf = String::new();
    stdin
        .lock()
        .read_to_string(&mut buf)
        .context("Failed to read review from stdin")?;
    // Drop the single trailing newline a pipe adds
    if buf.ends_with('\n') {
        buf.pop();
        if buf.ends_with('\r') {
            buf.pop();
        }
    }
    if buf.is_empty() {
        anyhow::bail!("No review text on stdin (pass TEXT, --file, or pipe it on stdin)");
    }
    Ok(buf)
}

/// Translate when requested; any failure keeps the original text
fn maybe_translate(app: &App, text: &str, translate: Option<Option<String>>) -> String {
    let Some(lang) = translate else {
        return text.to_string();
    };
    let target = lang.unwrap_or_else(|| app.config.target_lang().to_string());

    let translator = match app.config.translation.url {
        Some(ref url) => {
            let mut t = HttpTranslator::new(url.clone());
            if let Ok(key) = std::env::var("REVCHECK_TRANSLATE_KEY") {
                t = t.api_key(key);
            }
            t
        }
        None => match HttpTranslator::from_env() {
            Ok(t) => t,
            Err(e) => {
                if !app.quiet {
                    eprintln!(
                        "{}: {}; scoring the original text",
                        "Warning".yellow(),
                        e
                    );
                }
                return text.to_string();
            }
        },
    };

    translate_review(&translator, text, &target)
}
