//! Shell completion generation.

use crate::cli::Shell;
use clap::Command;
use clap_complete::{generate, Shell as CompletionShell};
use std::io;

/// Map the CLI shell enum to clap_complete's shell type.
#[must_use]
pub fn shell_to_completion_shell(shell: &Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}

/// Write a completion script for the given shell to stdout.
pub fn generate_completions(shell: CompletionShell, cmd: &mut Command) {
    let bin_name = cmd.get_name().to_string();
    generate(shell, cmd, bin_name, &mut io::stdout());
}
