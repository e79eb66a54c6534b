//! Welcome banner for a terminal interview.

use console::style;

pub fn print_welcome_banner(model: &str, session_id: &str, min_turns: usize) {
    println!();
    println!("  {}", style("Confidential intake interview").cyan().bold());
    println!(
        "  {}",
        style("Your answers stay in this session until you choose to submit.").dim()
    );
    println!();
    println!("  {}  {}", style("Model:").bold(), style(model).dim());
    println!(
        "  {}  {}",
        style("Session:").bold(),
        style(&session_id[..8.min(session_id.len())]).dim()
    );
    println!(
        "  {}  {}",
        style("Submit:").bold(),
        style(format!("/finish, after more than {min_turns} turns")).dim()
    );
    println!();
    println!("  {}", style("Type /help for commands, Ctrl+D to exit").dim());
    println!("  {}", style("---").dim());
    println!();
}
