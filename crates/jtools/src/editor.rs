//! Editor and pager plumbing. Issue text is drafted in `$EDITOR` via a
//! temporary markdown file; long displays go through `$PAGER`.

use crate::prelude::{println, *};
use std::io::{IsTerminal, Write};
use std::process::{Command, Stdio};

/// Seeds a temp file with `seed`, opens `$EDITOR` (default `nano`) on it,
/// and returns the edited contents.
pub fn edit_text(seed: &str) -> Result<String> {
    let editor = std::env::var("EDITOR").unwrap_or_else(|_| "nano".to_string());

    let file = tempfile::Builder::new()
        .prefix("jtools-")
        .suffix(".md")
        .tempfile()
        .context("Failed to create a scratch file")?;
    std::fs::write(file.path(), seed)
        .with_context(|| f!("Failed to seed {}", file.path().display()))?;

    let status = Command::new(&editor)
        .arg(file.path())
        .status()
        .with_context(|| f!("Failed to launch editor '{}'", editor))?;
    if !status.success() {
        return Err(eyre!("Editor '{}' exited with {}", editor, status));
    }

    std::fs::read_to_string(file.path())
        .with_context(|| f!("Failed to read back {}", file.path().display()))
}

/// Pipes `text` through `$PAGER` (default `less`), setting the terminal
/// title first. Falls back to plain stdout when there is no tty or the
/// pager cannot start. `LESS=FRX` is exported unless the user has their
/// own setting.
pub fn page_output(text: &str, title: &str) {
    if !std::io::stdout().is_terminal() {
        println!("{}", text);
        return;
    }

    // xterm title escape, same as the shells do it.
    print!("\x1b]0;{}\x07", title);

    let pager = std::env::var("PAGER").unwrap_or_else(|_| "less".to_string());
    let mut command = Command::new("sh");
    command.arg("-c").arg(&pager).stdin(Stdio::piped());
    if std::env::var_os("LESS").is_none() {
        command.env("LESS", "FRX");
    }

    match command.spawn() {
        Ok(mut child) => {
            if let Some(stdin) = child.stdin.as_mut() {
                // The pager may quit before reading everything.
                let _ = stdin.write_all(text.as_bytes());
            }
            drop(child.stdin.take());
            let _ = child.wait();
        }
        Err(err) => {
            log::warn!("Failed to start pager '{}': {}", pager, err);
            println!("{}", text);
        }
    }
}
