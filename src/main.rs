use chrono::Utc;
use clap::{Parser, Subcommand};
use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use iq_snapshot::checkout::{normalize_email, CheckoutError, CheckoutRequest, MetadataError};
use iq_snapshot::credentials::{
    require_secret, RESEND_API_KEY_VAR, STRIPE_SECRET_KEY_VAR, STRIPE_WEBHOOK_SECRET_VAR,
};
use iq_snapshot::email::{build_result_email, vsl_url, EmailClient, ResultEmailData};
use iq_snapshot::rate_limit::RateLimiter;
use iq_snapshot::results::ResultsError;
use iq_snapshot::input::read_input;
use iq_snapshot::store::{clear_store, DiskStore};
use iq_snapshot::stripe::StripeClient;
use iq_snapshot::webhook::{WebhookContext, WebhookError, WebhookOutcome};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_AUTH: i32 = 1;
const EXIT_NETWORK: i32 = 2;
const EXIT_RATE_LIMIT: i32 = 3;
const EXIT_CONFIG: i32 = 4;
const EXIT_INVALID_INPUT: i32 = 5;
const EXIT_PAYMENT_REQUIRED: i32 = 6;

/// Session id used when rendering an email that is not tied to a payment
const PREVIEW_SESSION_ID: &str = "cs_preview";

#[derive(Subcommand, Debug)]
enum Commands {
    /// List the quiz questions (default if no subcommand)
    Questions {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate and score an answer set
    Score {
        /// JSON object of question id to option index ("-" for stdin)
        answers: PathBuf,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Create a hosted checkout session for an answer set
    Checkout {
        /// Address the result is sent to
        #[arg(long)]
        email: String,
        /// JSON object of question id to option index ("-" for stdin)
        answers: PathBuf,
        /// Add the PDF report order bump
        #[arg(long)]
        bump: bool,
        /// Rate-limit key (defaults to the email)
        #[arg(long)]
        client: Option<String>,
        /// Open the checkout page in a browser
        #[arg(long)]
        open: bool,
    },
    /// Show the result for a paid checkout session
    Results {
        /// Checkout session id (cs_...)
        session_id: String,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Relay one webhook delivery
    Webhook {
        /// Raw event body ("-" for stdin)
        payload: PathBuf,
        /// Value of the stripe-signature header
        #[arg(long)]
        signature: String,
    },
    /// Print the result email for an answer set without sending it
    EmailPreview {
        /// JSON object of question id to option index ("-" for stdin)
        answers: PathBuf,
        #[arg(long)]
        email: String,
    },
    /// Write a default config file
    Init {
        /// Overwrite an existing config
        #[arg(long)]
        force: bool,
    },
    /// Remove rate-limit and webhook state
    ResetStore,
}

#[derive(Parser, Debug)]
#[command(name = "iq-snapshot")]
#[command(about = "$1 IQ Snapshot quiz, scoring and checkout CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/iq-snapshot/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn init_logging(verbose: bool) {
    let mut builder = pretty_env_logger::formatted_builder();
    match std::env::var("RUST_LOG") {
        Ok(filters) => {
            builder.parse_filters(&filters);
        }
        Err(_) => {
            let level = if verbose {
                log::LevelFilter::Debug
            } else {
                log::LevelFilter::Warn
            };
            builder.filter_level(level);
        }
    }
    builder.init();
}

fn fail(code: i32, message: impl Display) -> ! {
    eprintln!("{}", message);
    std::process::exit(code);
}

fn load_answers_or_exit(path: &Path) -> iq_snapshot::quiz::AnswerSet {
    match iq_snapshot::quiz::load_answer_set(path) {
        Ok(answers) => answers,
        Err(e) => fail(EXIT_INVALID_INPUT, format!("Answer error: {:#}", e)),
    }
}

fn secret_or_exit(var: &'static str) -> String {
    match require_secret(var) {
        Ok(secret) => secret,
        Err(e) => fail(EXIT_AUTH, format!("Credential error: {}", e)),
    }
}

fn print_json<T: serde::Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => fail(EXIT_INVALID_INPUT, format!("Failed to serialize output: {}", e)),
    }
}

#[tokio::main]
async fn main() {
    // Install rustls crypto provider (required for rustls 0.23+)
    rustls::crypto::ring::default_provider()
        .install_default()
        .expect("Failed to install rustls crypto provider");

    let cli = Cli::parse();
    init_logging(cli.verbose);
    let command = cli.command.unwrap_or(Commands::Questions { json: false });
    let start_time = Instant::now();
    let config_path = cli.config.map(PathBuf::from);

    // Init runs before loading, the config may not exist yet
    if let Commands::Init { force } = command {
        let path = config_path.unwrap_or_else(iq_snapshot::config::get_config_path);
        if let Err(e) = iq_snapshot::config::write_default_config(&path, force) {
            fail(EXIT_CONFIG, format!("Config error: {:#}", e));
        }
        println!("Wrote default config to {}", path.display());
        std::process::exit(EXIT_SUCCESS);
    }

    if let Commands::ResetStore = command {
        let store = DiskStore::open_default();
        if let Err(e) = clear_store(store.path()) {
            fail(EXIT_CONFIG, format!("Store error: {:#}", e));
        }
        println!("Cleared store at {}", store.path().display());
        std::process::exit(EXIT_SUCCESS);
    }

    let config = match iq_snapshot::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
    };

    if let Err(errors) = iq_snapshot::config::validate_config(&config) {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let use_colors = iq_snapshot::output::should_use_colors();

    match command {
        Commands::Questions { json } => {
            let questions = iq_snapshot::quiz::questions();
            if json {
                print_json(&questions);
            } else {
                println!(
                    "{}",
                    iq_snapshot::output::format_question_list(questions, use_colors)
                );
            }
        }
        Commands::Score { answers, json } => {
            let answers = load_answers_or_exit(&answers);
            if let Err(errors) = iq_snapshot::scoring::check_answers(&answers) {
                fail(
                    EXIT_INVALID_INPUT,
                    iq_snapshot::output::format_validation_errors(&errors, use_colors),
                );
            }

            let result = iq_snapshot::scoring::score_answers(&answers);
            if json {
                print_json(&result);
            } else {
                println!(
                    "{}",
                    iq_snapshot::output::format_score_result(&result, use_colors)
                );
            }
        }
        Commands::Checkout {
            email,
            answers,
            bump,
            client,
            open,
        } => {
            let store = DiskStore::open_default();
            let limiter = match RateLimiter::from_config(&store, &config.rate_limit) {
                Ok(l) => l,
                Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
            };
            let client_key = client.unwrap_or_else(|| normalize_email(&email));
            match limiter.check(&client_key, Utc::now()) {
                Ok(true) => {}
                Ok(false) => fail(EXIT_RATE_LIMIT, CheckoutError::RateLimited),
                Err(e) => {
                    // An unreadable store must not block checkout
                    log::warn!("Rate limit check skipped: {:#}", e);
                }
            }

            let request = CheckoutRequest {
                email,
                answers: load_answers_or_exit(&answers),
                bump,
            };
            let plan = match iq_snapshot::checkout::prepare_checkout(&request, &config) {
                Ok(p) => p,
                Err(CheckoutError::InvalidAnswers(errors)) => fail(
                    EXIT_INVALID_INPUT,
                    iq_snapshot::output::format_validation_errors(&errors, use_colors),
                ),
                Err(e) => fail(EXIT_INVALID_INPUT, e),
            };

            let secret = secret_or_exit(STRIPE_SECRET_KEY_VAR);
            let stripe = StripeClient::new(&secret);
            let session = match stripe.create_checkout_session(&plan).await {
                Ok(s) => s,
                Err(e) => fail(EXIT_NETWORK, format!("Checkout failed: {:#}", e)),
            };

            let Some(url) = session.url else {
                fail(
                    EXIT_NETWORK,
                    format!("Checkout session {} has no payment page", session.id),
                );
            };
            println!("{}", url);

            if open {
                if let Err(e) = iq_snapshot::browser::open_url(&url) {
                    fail(EXIT_NETWORK, format!("Failed to open browser: {}", e));
                }
            }
        }
        Commands::Results { session_id, json } => {
            let secret = secret_or_exit(STRIPE_SECRET_KEY_VAR);
            let stripe = StripeClient::new(&secret);
            let result = match iq_snapshot::results::fetch_paid_result(&stripe, &session_id).await
            {
                Ok(r) => r,
                Err(e) => {
                    let code = match &e {
                        ResultsError::InvalidSessionId
                        | ResultsError::Metadata(MetadataError::NotFound) => EXIT_INVALID_INPUT,
                        ResultsError::PaymentRequired => EXIT_PAYMENT_REQUIRED,
                        ResultsError::Metadata(_) | ResultsError::Api(_) => EXIT_NETWORK,
                    };
                    fail(code, format!("{:#}", e));
                }
            };

            if json {
                print_json(&result);
            } else {
                println!(
                    "{}",
                    iq_snapshot::output::format_result_metadata(&result, use_colors)
                );
            }
        }
        Commands::Webhook { payload, signature } => {
            let payload = match read_input(&payload) {
                Ok(p) => p,
                Err(e) => fail(EXIT_INVALID_INPUT, format!("{:#}", e)),
            };
            let stripe = StripeClient::new(&secret_or_exit(STRIPE_SECRET_KEY_VAR));
            let webhook_secret = secret_or_exit(STRIPE_WEBHOOK_SECRET_VAR);
            let mailer = EmailClient::new(&secret_or_exit(RESEND_API_KEY_VAR), &config.from_email);
            let ctx = WebhookContext {
                stripe: &stripe,
                email: &mailer,
                store: Arc::new(DiskStore::open_default()),
                config: &config,
                webhook_secret: &webhook_secret,
            };

            match iq_snapshot::webhook::handle_webhook(&payload, Some(signature.as_str()), &ctx, Utc::now())
                .await
            {
                Ok(WebhookOutcome::Duplicate) => println!("Already processed"),
                Ok(WebhookOutcome::Ignored(reason)) => println!("Ignored: {}", reason),
                Ok(WebhookOutcome::Delivered { email }) => println!("Result email sent to {}", email),
                Err(e @ WebhookError::Signature(_)) => fail(EXIT_INVALID_INPUT, e),
                Err(e) => fail(EXIT_NETWORK, format!("Webhook handler error: {:#}", e)),
            }
        }
        Commands::EmailPreview { answers, email } => {
            let answers = load_answers_or_exit(&answers);
            if let Err(errors) = iq_snapshot::scoring::check_answers(&answers) {
                fail(
                    EXIT_INVALID_INPUT,
                    iq_snapshot::output::format_validation_errors(&errors, use_colors),
                );
            }

            let score = iq_snapshot::scoring::score_answers(&answers);
            let link = match vsl_url(&config.affiliate_vsl_url, PREVIEW_SESSION_ID) {
                Ok(l) => l,
                Err(e) => fail(EXIT_CONFIG, format!("Config error: {:#}", e)),
            };
            let data = ResultEmailData {
                email: normalize_email(&email),
                iq_score: score.iq_score,
                percentile: score.percentile,
                band: score.band,
                interpretation: score.interpretation,
                vsl_url: link,
            };
            let rendered = build_result_email(&data, &config.site_url);
            eprintln!("To: {}\nSubject: {}", data.email, rendered.subject);
            println!("{}", rendered.html);
        }
        Commands::Init { .. } | Commands::ResetStore => {
            unreachable!("handled before config load")
        }
    }

    log::debug!("Done in {:?}", start_time.elapsed());
    std::process::exit(EXIT_SUCCESS);
}
