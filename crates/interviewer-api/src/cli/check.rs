//! `interviewer check` -- validate configuration without starting an interview.

use std::path::Path;

use console::style;

use interviewer_infra::config::load_config;
use interviewer_infra::llm::{create_provider, test_provider_connection};

pub async fn run_check(config_path: &Path, ping: bool) -> anyhow::Result<()> {
    let loaded = load_config(config_path).await?;
    let config = &loaded.config;

    println!();
    println!(
        "  {} Configuration {} is valid",
        style("✓").green().bold(),
        style(config_path.display()).cyan()
    );
    println!();
    println!("  {}  {}", style("Oracle:").bold(), config.oracle.provider);
    println!(
        "  {}  {} / {}",
        style("Models:").bold(),
        config.oracle.chat_model,
        config.oracle.extraction_model
    );
    println!(
        "  {}  more than {} turns",
        style("Finalize after:").bold(),
        config.interview.min_turns
    );
    println!(
        "  {}  {} ({} mapped fields)",
        style("Form:").bold(),
        config.form.form_id,
        config.form.field_mapping.len()
    );
    println!(
        "  {}  {}",
        style("Operator:").bold(),
        config.form.operator_name
    );

    if ping {
        let provider = create_provider(&config.oracle, loaded.oracle_api_key)?;
        match test_provider_connection(&provider, &config.oracle.chat_model).await {
            Ok(()) => println!("  {} Oracle reachable", style("✓").green().bold()),
            Err(e) => {
                println!("  {} Oracle unreachable: {e}", style("✗").red().bold());
                println!();
                return Err(e.into());
            }
        }
    }
    println!();
    Ok(())
}
