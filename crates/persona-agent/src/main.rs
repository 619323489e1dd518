//! Chat with the persona agent in the terminal.

#[macro_use]
extern crate tracing;

use std::io::Write as _;
use std::pin::pin;
use std::process::ExitCode;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use persona_agent::config::Config;
use persona_agent::{SessionBuilder, logging, profile};
use persona_agent_openai_model::OpenAIProvider;
use tokio::io::{self, AsyncBufReadExt};
use tokio::select;
use tokio::time::sleep;

const BAR_CHAR: &str = "▎";

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{} {err}", "error:".bright_red().bold());
            return ExitCode::FAILURE;
        }
    };
    if let Err(err) = logging::init(&config.log_dir) {
        eprintln!("{} {err}", "error:".bright_red().bold());
        return ExitCode::FAILURE;
    }

    let persona =
        match profile::load_persona(&config.profile_name_path, &config.profile_path)
        {
            Ok(persona) => persona,
            Err(err) => {
                error!("failed to load profile: {err}");
                return ExitCode::FAILURE;
            }
        };

    let responder = OpenAIProvider::new(config.responder_provider_config());
    let evaluator = OpenAIProvider::new(config.evaluator_provider_config());
    let mut builder = SessionBuilder::new(persona, responder, evaluator);
    if let Some(limit) = config.max_tool_rounds {
        builder = builder.with_max_tool_rounds(limit);
    }
    let mut session = match builder.build() {
        Ok(session) => session,
        Err(err) => {
            error!("failed to build the agent: {err}");
            return ExitCode::FAILURE;
        }
    };
    info!("chat agent initialized");

    let name = session.agent().persona().display_name().to_owned();
    println!(
        "{}Chatting with {}. Type {} to start over, {} to quit.\n",
        BAR_CHAR.bright_cyan(),
        name.bright_white().bold(),
        "/reset".bold(),
        "/exit".bold()
    );

    let progress_style = ProgressStyle::with_template("{spinner} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

    loop {
        print!("> ");
        std::io::stdout().flush().ok();

        let Some(line) = read_line().await else {
            break;
        };
        let message = line.trim();
        match message {
            "" => continue,
            "/exit" => break,
            "/reset" => {
                session.reset();
                println!("{}Conversation cleared.\n", BAR_CHAR.bright_cyan());
                continue;
            }
            _ => {}
        }

        let progress_bar = ProgressBar::new_spinner();
        progress_bar.set_style(progress_style.clone());
        progress_bar.set_message(format!("🤔 {name} is thinking..."));

        let result = {
            let mut chat = pin!(session.send_message(message));
            loop {
                progress_bar.inc(1);
                select! {
                    result = &mut chat => break result,
                    _ = sleep(Duration::from_millis(100)) => {}
                }
            }
        };

        // Finish the progress bar before printing anything else.
        progress_bar.finish_and_clear();

        match result {
            Ok(reply) => {
                println!("{}🤖 {}\n", BAR_CHAR.bright_cyan(), reply.bright_white());
            }
            Err(err) => {
                error!("failed to answer: {err}");
                println!(
                    "{}⚠️  {}\n",
                    BAR_CHAR.bright_yellow(),
                    "Sorry, something went wrong. Please try again.".yellow()
                );
            }
        }
    }

    ExitCode::SUCCESS
}

async fn read_line() -> Option<String> {
    let mut stdin = io::BufReader::new(io::stdin());
    let mut line = String::new();

    match stdin.read_line(&mut line).await {
        Ok(count) => {
            if count == 0 {
                return None;
            }
            Some(line)
        }
        Err(err) => {
            error!("error reading input: {}", err);
            None
        }
    }
}
