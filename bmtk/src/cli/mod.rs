// bmtk/src/cli/mod.rs
use crate::cli::args::{Cli, Commands};
use crate::cli::commands::CommandContext;
use crate::cli::error::CliResult;

pub mod args;
pub mod commands;
pub mod completion;
pub mod display;
pub mod error;

pub fn execute_command(cli: Cli, ctx: &CommandContext) -> CliResult<()> {
    match cli.command {
        Some(Commands::Summary { input }) => commands::summary(ctx, &input),
        Some(Commands::Dist { input, by, top }) => commands::dist(ctx, &input, by, top),
        Some(Commands::Timeline { input, by, year }) => commands::timeline(ctx, &input, by, year),
        Some(Commands::Heatmap { input, kind, top }) => commands::heatmap(ctx, &input, kind, top),
        Some(Commands::Tree { input }) => commands::tree(ctx, &input),
        Some(Commands::Folders { input }) => commands::folders(ctx, &input),
        Some(Commands::Treemap {
            input,
            grouped,
            max_depth,
        }) => commands::treemap(ctx, &input, grouped, max_depth),
        Some(Commands::Words {
            input,
            mode,
            years,
            latest,
            top,
            export,
            output,
        }) => commands::words(
            ctx,
            &input,
            mode,
            &years,
            latest,
            top,
            export,
            output.as_deref(),
        ),
        Some(Commands::Preview { input, rows }) => commands::preview(ctx, &input, rows),
        Some(Commands::Completion { shell }) => handle_completion(&shell),
        None => Ok(()),
    }
}

fn handle_completion(shell: &str) -> CliResult<()> {
    // Usage hints go to stderr, the script itself to stdout
    match shell {
        "bash" => eprintln!("# To use, run: eval \"$(bmtk completion bash)\""),
        "zsh" => eprintln!("# To use, run: bmtk completion zsh > ~/.zfunc/_bmtk"),
        "fish" => {
            eprintln!("# To use, run: bmtk completion fish > ~/.config/fish/completions/bmtk.fish")
        }
        _ => {}
    }

    completion::generate_completion(shell, &mut std::io::stdout()).map_err(|e| {
        error::CliError::CommandFailed(format!("Failed to generate completion script: {}", e))
    })
}
