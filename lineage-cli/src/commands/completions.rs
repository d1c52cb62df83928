//! Shell completions command - Generate shell completion scripts
//!
//! Generates completion scripts for bash, zsh, fish, powershell and elvish.

use std::io;

use clap::Command;
use clap_complete::{generate, shells};
use colored::Colorize;
use serde::Serialize;

use crate::output::{CsvOutput, Output, OutputConfig, OutputFormat, Outputter};

const BIN_NAME: &str = "lineage";

/// Supported shells for completion generation
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Shell::Bash => write!(f, "bash"),
            Shell::Zsh => write!(f, "zsh"),
            Shell::Fish => write!(f, "fish"),
            Shell::PowerShell => write!(f, "powershell"),
            Shell::Elvish => write!(f, "elvish"),
        }
    }
}

/// Instructions for installing completions
#[derive(Debug, Serialize)]
pub struct CompletionInstructions {
    pub shell: String,
    pub instructions: Vec<String>,
}

impl Outputter for CompletionInstructions {
    fn to_table(&self, _config: &OutputConfig) -> String {
        let mut output = format!(
            "{} completions for {}\n\n{}\n",
            BIN_NAME.cyan().bold(),
            self.shell.yellow(),
            "Installation:".cyan().bold()
        );
        for instruction in &self.instructions {
            output.push_str(&format!("  {}\n", instruction));
        }
        output
    }

    fn to_csv(&self, _config: &OutputConfig) -> String {
        let mut lines = vec!["shell,instruction".to_string()];
        for instruction in self.instructions.iter().filter(|i| !i.is_empty()) {
            lines.push(format!("{},{}", self.shell, CsvOutput::escape_value(instruction)));
        }
        lines.join("\n")
    }
}

/// Get installation instructions for a shell
fn get_instructions(shell: Shell) -> Vec<String> {
    let lines: &[&str] = match shell {
        Shell::Bash => &[
            "# Add to ~/.bashrc:",
            "eval \"$(lineage completions bash)\"",
            "",
            "# Or save to a file:",
            "lineage completions bash > ~/.local/share/bash-completion/completions/lineage",
        ],
        Shell::Zsh => &[
            "# Add to ~/.zshrc:",
            "eval \"$(lineage completions zsh)\"",
            "",
            "# Or save to a file in fpath:",
            "lineage completions zsh > ~/.zfunc/_lineage",
            "# Then add to ~/.zshrc before compinit:",
            "fpath=(~/.zfunc $fpath)",
        ],
        Shell::Fish => &[
            "# Save to fish completions directory:",
            "lineage completions fish > ~/.config/fish/completions/lineage.fish",
        ],
        Shell::PowerShell => &[
            "# Add to $PROFILE:",
            "Invoke-Expression (& lineage completions powershell | Out-String)",
        ],
        Shell::Elvish => &[
            "# Add to ~/.elvish/rc.elv:",
            "eval (lineage completions elvish | slurp)",
        ],
    };
    lines.iter().map(|l| l.to_string()).collect()
}

/// Generate completions and write to stdout using provided Command
pub fn generate_completions_with_cmd(shell: Shell, cmd: &mut Command) {
    let out = &mut io::stdout();
    match shell {
        Shell::Bash => generate(shells::Bash, cmd, BIN_NAME, out),
        Shell::Zsh => generate(shells::Zsh, cmd, BIN_NAME, out),
        Shell::Fish => generate(shells::Fish, cmd, BIN_NAME, out),
        Shell::PowerShell => generate(shells::PowerShell, cmd, BIN_NAME, out),
        Shell::Elvish => generate(shells::Elvish, cmd, BIN_NAME, out),
    }
}

/// Print installation instructions for a shell
pub fn run(shell: Shell, format: OutputFormat) -> anyhow::Result<()> {
    let instructions = CompletionInstructions {
        shell: shell.to_string(),
        instructions: get_instructions(shell),
    };
    Output::new(instructions, format).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_display() {
        assert_eq!(Shell::Bash.to_string(), "bash");
        assert_eq!(Shell::PowerShell.to_string(), "powershell");
        assert_eq!(Shell::Elvish.to_string(), "elvish");
    }

    #[test]
    fn test_get_instructions() {
        let bash = get_instructions(Shell::Bash);
        assert!(bash.iter().any(|i| i.contains("bashrc")));
        assert!(bash.iter().all(|i| !i.contains("mu ")));

        let fish = get_instructions(Shell::Fish);
        assert!(fish[1].ends_with("lineage.fish"));
    }

    #[test]
    fn test_instructions_csv_skips_blank_lines() {
        let instructions = CompletionInstructions {
            shell: "bash".to_string(),
            instructions: get_instructions(Shell::Bash),
        };
        let csv = instructions.to_csv(&OutputConfig::new(OutputFormat::Csv));
        assert_eq!(csv.lines().count(), 5);
        assert!(csv.contains("bash,\"eval \"\"$(lineage completions bash)\"\"\""));
    }
}
