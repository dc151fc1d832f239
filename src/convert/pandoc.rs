//! pandoc backend.

use super::{MarkdownBackend, RenderJob};
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempPath;

/// Lua filter promoting every heading below level 1 by one level.
///
/// The Markdown title is a level 1 heading, so `##` sections become
/// Heading 1 in the document.
pub const LUA_FILTER: &str = r#"function Header(el)
  if el.level > 1 then
    el.level = el.level - 1
  end
  return el
end
"#;

/// Installation instructions for pandoc on the current platform.
pub fn install_hint() -> &'static str {
    match std::env::consts::OS {
        "macos" => "brew install pandoc",
        "linux" => "sudo apt-get install pandoc  # or use your package manager",
        "windows" => "Download from https://pandoc.org/installing.html",
        _ => "See https://pandoc.org/installing.html",
    }
}

/// Runs the `pandoc` executable.
#[derive(Debug, Clone)]
pub struct PandocBackend {
    program: PathBuf,
}

impl PandocBackend {
    /// Find `pandoc` on `PATH`.
    pub fn locate() -> Result<Self> {
        match which::which("pandoc") {
            Ok(program) => {
                log::debug!("Found pandoc at {}", program.display());
                Ok(Self { program })
            }
            Err(_) => Err(Error::ToolNotFound {
                tool: "Pandoc".to_string(),
                hint: install_hint().to_string(),
            }),
        }
    }

    /// Use an explicit pandoc binary.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Path of the pandoc binary.
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Command-line arguments for a render job.
    pub fn build_args(job: &RenderJob, filter: &Path) -> Vec<OsString> {
        let mut filter_arg = OsString::from("--lua-filter=");
        filter_arg.push(filter);

        let mut args: Vec<OsString> = vec![
            job.input.clone().into(),
            "-o".into(),
            job.output.clone().into(),
            "-f".into(),
            "markdown".into(),
            "-t".into(),
            "docx".into(),
            "--wrap=none".into(),
            "--columns=999".into(),
            filter_arg,
        ];
        for (key, value) in [
            ("title", &job.title),
            ("author", &job.author),
            ("date", &job.date),
        ] {
            args.push("-M".into());
            args.push(format!("{}={}", key, value).into());
        }
        if job.toc {
            args.push("--toc".into());
            args.push("--number-sections".into());
        }
        args
    }

    /// First line of `pandoc --version`.
    pub fn version(&self) -> Result<String> {
        let output = Command::new(&self.program).arg("--version").output()?;
        if !output.status.success() {
            return Err(Error::Conversion(failure_message(
                &output.stderr,
                output.status,
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or_default()
            .trim()
            .to_string())
    }
}

fn failure_message(stderr: &[u8], status: std::process::ExitStatus) -> String {
    let stderr = String::from_utf8_lossy(stderr).trim().to_string();
    if stderr.is_empty() {
        format!("pandoc exited with {}", status)
    } else {
        stderr
    }
}

/// Write the Lua filter to a temporary file in `dir`.
fn write_filter(dir: &Path) -> Result<TempPath> {
    let mut file = tempfile::Builder::new()
        .prefix(".mdocx-filter-")
        .suffix(".lua")
        .tempfile_in(dir)?;
    file.write_all(LUA_FILTER.as_bytes())?;
    file.flush()?;
    Ok(file.into_temp_path())
}

impl MarkdownBackend for PandocBackend {
    fn name(&self) -> &str {
        "pandoc"
    }

    fn render(&self, job: &RenderJob) -> Result<()> {
        let filter = write_filter(&job.working_dir)?;
        let args = Self::build_args(job, &filter);
        log::debug!("Running {} {:?}", self.program.display(), args);
        log::info!("Converting {} with pandoc", job.input.display());

        let output = Command::new(&self.program)
            .args(&args)
            .current_dir(&job.working_dir)
            .output()?;

        if !output.status.success() {
            return Err(Error::Conversion(failure_message(
                &output.stderr,
                output.status,
            )));
        }
        log::info!("Pandoc conversion completed");
        Ok(())
    }
}
