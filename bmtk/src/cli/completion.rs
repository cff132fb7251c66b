// src/cli/completion.rs
use crate::cli::args::Cli;
use clap::CommandFactory;
use clap_complete::{generate, Shell};
use std::io::{self, Write};
use tracing::{debug, instrument};

fn parse_shell(name: &str) -> Option<Shell> {
    match name.to_lowercase().as_str() {
        "bash" => Some(Shell::Bash),
        "zsh" => Some(Shell::Zsh),
        "fish" => Some(Shell::Fish),
        _ => None,
    }
}

/// Writes the completion script for `shell` ("bash", "zsh" or "fish") to `out`.
///
/// ```bash
/// eval "$(bmtk completion bash)"
/// ```
#[instrument(level = "debug", skip(out))]
pub fn generate_completion<W: Write>(shell: &str, out: &mut W) -> io::Result<()> {
    let target = parse_shell(shell).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("Unsupported shell: {}. Supported shells: bash, zsh, fish", shell),
        )
    })?;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    debug!("Generating {} completion for {}", target, bin_name);
    generate(target, &mut cmd, bin_name, out);
    Ok(())
}
