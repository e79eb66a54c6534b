//! Terminal interview loop.
//!
//! Greeting, then one oracle call per message until the respondent submits
//! with `/finish` or leaves. The transcript lives only in this function.

use std::path::Path;
use std::time::Duration;

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use interviewer_core::interview::prompt;
use interviewer_core::interview::session::InterviewSession;
use interviewer_types::error::FinalizeError;
use interviewer_types::turn::{Turn, TurnRole};

use crate::state::AppState;

use super::banner::print_welcome_banner;
use super::commands::{self, ChatCommand};
use super::input::{ChatInput, InputEvent};

fn spinner(message: &'static str) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("  {spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner
}

fn print_assistant(turn: &Turn) {
    if turn.is_diagnostic() {
        println!("\n  {} {}\n", style("!").red().bold(), style(turn.text()).red());
    } else {
        println!("\n  {} {}\n", style("Interviewer >").cyan().bold(), turn.text());
    }
}

fn print_history(session: &InterviewSession) {
    println!();
    for turn in session.transcript() {
        let label = match turn.role() {
            TurnRole::User => style("You").green().bold(),
            TurnRole::Assistant => style("Interviewer").cyan().bold(),
        };
        let preview: String = turn.text().chars().take(100).collect();
        let ellipsis = if turn.text().chars().count() > 100 { "..." } else { "" };
        println!("  {label} {preview}{ellipsis}");
    }
    if !session.attachments().is_empty() {
        println!("  {} {}", style("Attachments").bold(), session.attachments().join(", "));
    }
    println!();
}

async fn export_transcript(session: &InterviewSession, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(session.transcript())?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

/// Run one interview in the terminal.
pub async fn run_chat_loop(state: &AppState) -> anyhow::Result<()> {
    let config = &state.config;
    let mut session = InterviewSession::start(prompt::greeting(&config.interview));
    let session_id = session.id().to_string();
    info!(session_id = %session_id, "Session started");

    print_welcome_banner(&config.oracle.chat_model, &session_id, config.interview.min_turns);
    if let Some(greeting) = session.transcript().last() {
        print_assistant(greeting);
    }

    let prompt_text = format!("  {} ", style("You >").green().bold());
    let (mut chat_input, _writer) =
        ChatInput::new(prompt_text).map_err(|e| anyhow::anyhow!("Failed to initialize input: {e}"))?;
    let mut announced_ready = false;

    loop {
        match chat_input.read_line().await {
            InputEvent::Eof => {
                println!("\n  {}", style("Session ended. Nothing was submitted.").dim());
                break;
            }
            InputEvent::Interrupted => {
                println!("\n  {}", style("Press Ctrl+D to exit, or keep talking.").dim());
                continue;
            }
            InputEvent::Message(text) => {
                if text.is_empty() {
                    continue;
                }

                if let Some(cmd) = commands::parse(&text) {
                    match cmd {
                        ChatCommand::Help => commands::print_help(),
                        ChatCommand::Exit => {
                            println!("\n  {}", style("Session ended. Nothing was submitted.").dim());
                            break;
                        }
                        ChatCommand::History => print_history(&session),
                        ChatCommand::Attach(name) => {
                            if session.record_attachment(&name) {
                                println!("\n  {} Noted attachment: {}\n", style("+").cyan().bold(), style(&name).dim());
                            }
                        }
                        ChatCommand::Export(path) => match export_transcript(&session, &path).await {
                            Ok(()) => println!("\n  {} Transcript saved to {}\n", style("✓").green().bold(), path.display()),
                            Err(e) => println!("\n  {} Could not save transcript: {e}\n", style("!").red().bold()),
                        },
                        ChatCommand::Finish => {
                            if !state.pipeline.is_ready(&session) {
                                println!(
                                    "\n  {} Please share a little more before submitting.\n",
                                    style("!").yellow().bold()
                                );
                                continue;
                            }

                            let progress = spinner("preparing your report...");
                            let outcome = state.pipeline.finalize(&session).await;
                            progress.finish_and_clear();

                            match outcome {
                                Ok(receipt) => {
                                    session.mark_finalized();
                                    println!("\n  {} Your report was submitted. Thank you.", style("✓").green().bold());
                                    if let Some(url) = receipt.url {
                                        println!("  {} {}", style("Reference:").bold(), style(url).cyan());
                                    }
                                    println!();
                                    break;
                                }
                                Err(FinalizeError::Submission(e)) => {
                                    println!("\n  {} Submission failed: {e}", style("!").red().bold());
                                    println!("  {}\n", style("Your conversation is kept; try /finish again or /export it.").dim());
                                }
                                Err(e) => {
                                    println!("\n  {} {e}", style("!").red().bold());
                                    println!("  {}\n", style("Your conversation is kept; try /finish again.").dim());
                                }
                            }
                        }
                        ChatCommand::Usage(usage) => {
                            println!("\n  {} Usage: {}\n", style("?").yellow().bold(), style(usage).cyan());
                        }
                        ChatCommand::Unknown(name) => {
                            println!(
                                "\n  {} Unknown command: {}. Type /help for available commands.\n",
                                style("?").yellow().bold(),
                                style(name).dim()
                            );
                        }
                    }
                    continue;
                }

                let progress = spinner("thinking...");
                let result = state.controller.submit_user_turn(&mut session, &text).await;
                progress.finish_and_clear();

                match result {
                    Ok(reply) => print_assistant(&reply),
                    Err(e) => println!("\n  {} {e}\n", style("!").red().bold()),
                }

                if !announced_ready && state.pipeline.is_ready(&session) {
                    announced_ready = true;
                    println!("  {}\n", style("You can type /finish at any time to submit your report.").dim());
                }
            }
        }
    }

    info!(session_id = %session_id, turns = session.transcript().len(), "Session ended");
    Ok(())
}
