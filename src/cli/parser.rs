use crate::config::ConfigKey;

/// Enum representing CLI commands
#[derive(Debug, PartialEq)]
pub enum Command {
    /// Detect duplicates and post the comment
    Run,
    /// Detect duplicates and print the comment without posting
    Check,
    Help,
    Unknown(String),
}

const COMMANDS: &str = "\
Usage: issuedup [check|help]

  (no command)  Look for duplicates of the issue and comment on it
  check         Print the comment instead of posting it
  help          Show this message
";

/// Help text, including every environment variable that is read.
pub fn usage() -> String {
    let keys: Vec<String> = ConfigKey::all()
        .iter()
        .map(|key| format!("  {}", key.as_str()))
        .collect();
    format!("{COMMANDS}\nEnvironment:\n{}", keys.join("\n"))
}

/// Parse command line arguments and return a Command
///
/// # Arguments
/// * `args` - Command line arguments (including program name)
///
/// # Returns
/// * `Command` - The parsed command
pub fn parse_args(args: &[String]) -> Command {
    match args.len() {
        0 | 1 => Command::Run,
        2 => match args[1].as_str() {
            "check" => Command::Check,
            "help" | "--help" | "-h" => Command::Help,
            cmd => Command::Unknown(cmd.to_string()),
        },
        _ => Command::Unknown(args[1..].join(" ")),
    }
}
