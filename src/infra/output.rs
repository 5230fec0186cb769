#[cfg(feature = "clipboard-support")]
use clipboard::{ClipboardContext, ClipboardProvider};
use crate::domain::models::RunStats;
use anyhow::Context;
use crossterm::{
    ExecutableCommand,
    style::{Color, ResetColor, SetForegroundColor},
};
use log::{debug, info, warn};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

pub trait OutputWriter {
    fn write(&self, content: &str) -> anyhow::Result<()>;
}

pub struct FileWriter {
    path: PathBuf,
    overwrite: bool,
}

impl FileWriter {
    pub fn new(path: PathBuf, overwrite: bool) -> Self {
        Self { path, overwrite }
    }
}

impl OutputWriter for FileWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to file: {}", self.path.display());

        if self.overwrite {
            fs::write(&self.path, content)
                .with_context(|| format!("Failed to write {}", self.path.display()))?;
        } else {
            let mut file = match OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&self.path)
            {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    anyhow::bail!(
                        "{} already exists; pass --force to overwrite it",
                        self.path.display()
                    );
                }
                Err(e) => {
                    return Err(e)
                        .with_context(|| format!("Failed to create {}", self.path.display()));
                }
            };
            file.write_all(content.as_bytes())?;
        }

        info!("Output written to file: {}", self.path.display());
        Ok(())
    }
}

pub struct ConsoleWriter;

impl OutputWriter for ConsoleWriter {
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to console");
        let mut stdout = io::stdout().lock();
        stdout.write_all(content.as_bytes())?;
        stdout.flush()?;
        Ok(())
    }
}

pub struct ClipboardWriter;

impl OutputWriter for ClipboardWriter {
    #[cfg(feature = "clipboard-support")]
    fn write(&self, content: &str) -> anyhow::Result<()> {
        debug!("Writing output to clipboard");

        let mut ctx: ClipboardContext = match ClipboardProvider::new() {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!("Failed to access clipboard: {}", e);
                return Err(anyhow::anyhow!("Failed to access clipboard: {}", e));
            }
        };

        match ctx.set_contents(content.to_owned()) {
            Ok(_) => {
                info!("Output copied to clipboard (size: {} bytes)", content.len());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to copy to clipboard: {}", e);
                Err(anyhow::anyhow!("Failed to copy to clipboard: {}", e))
            }
        }
    }

    #[cfg(not(feature = "clipboard-support"))]
    fn write(&self, _content: &str) -> anyhow::Result<()> {
        warn!("Clipboard output requested but clipboard support is disabled");
        anyhow::bail!("this build has no clipboard support (feature `clipboard-support`)")
    }
}

pub fn create_writer(
    output_path: Option<PathBuf>,
    clipboard_output: bool,
    overwrite: bool,
) -> Box<dyn OutputWriter> {
    match output_path {
        Some(path) => Box::new(FileWriter::new(path, overwrite)),
        None if clipboard_output => Box::new(ClipboardWriter),
        None => Box::new(ConsoleWriter),
    }
}

pub fn write_output(
    formatted_content: &str,
    output_path: Option<PathBuf>,
    clipboard_output: bool,
    overwrite: bool,
) -> anyhow::Result<()> {
    let to_clipboard = clipboard_output && output_path.is_none();
    let writer = create_writer(output_path, clipboard_output, overwrite);
    writer.write(formatted_content)?;

    if to_clipboard {
        let mut stderr = io::stderr();
        stderr.execute(SetForegroundColor(Color::Green))?;
        writeln!(stderr, "\n📋 Content copied to clipboard!")?;
        stderr.execute(ResetColor)?;

        writeln!(stderr, "\nPreview of copied content:\n")?;
        writeln!(stderr, "{}", preview(formatted_content, 200))?;
    }

    Ok(())
}

fn preview(content: &str, max_chars: usize) -> String {
    if content.chars().count() > max_chars {
        let safe_substring: String = content.chars().take(max_chars).collect();
        format!("{}...", safe_substring)
    } else {
        content.to_string()
    }
}

/// Prints run statistics to stderr so stdout stays clean for the document.
pub fn print_summary(stats: &RunStats) -> anyhow::Result<()> {
    let mut stderr = io::stderr();
    stderr.execute(SetForegroundColor(Color::Cyan))?;
    writeln!(
        stderr,
        "✓ Processed {} of {} files",
        stats.files_processed, stats.files_total
    )?;
    stderr.execute(ResetColor)?;
    writeln!(
        stderr,
        "  {} chars, {} lines, ~{} tokens",
        stats.char_count, stats.line_count, stats.token_count
    )?;
    Ok(())
}
