use anyhow::{Context, Result};
use clap::ValueEnum;
use quasi_jsx::{TransformOptions, WhitespacePolicy};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file looked up next to each input when `--config` is not given.
pub const CONFIG_FILE: &str = "quasi.toml";

pub const DEFAULT_OUT_DIR: &str = "target/quasi-gen";

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum WhitespaceArg {
    Preserve,
    Trim,
    Collapse,
}

impl From<WhitespaceArg> for WhitespacePolicy {
    fn from(arg: WhitespaceArg) -> Self {
        match arg {
            WhitespaceArg::Preserve => WhitespacePolicy::Preserve,
            WhitespaceArg::Trim => WhitespacePolicy::Trim,
            WhitespaceArg::Collapse => WhitespacePolicy::Collapse,
        }
    }
}

/// Command-line settings layered over the config file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub trim: bool,
    pub whitespace: Option<WhitespaceArg>,
    pub merge_helper: Option<String>,
    pub components: Vec<String>,
}

impl Overrides {
    pub fn apply(&self, options: &mut TransformOptions) {
        if self.trim {
            options.whitespace = WhitespacePolicy::Trim;
        }
        if let Some(ws) = self.whitespace {
            options.whitespace = ws.into();
        }
        if let Some(helper) = &self.merge_helper {
            options.merge_helper = helper.clone();
        }
        options.components.extend(self.components.iter().cloned());
    }
}

/// Options for `input`: the explicit config file if given, else a
/// `quasi.toml` beside the input, else defaults.
pub fn load_options(input: &Path, config: Option<&Path>) -> Result<TransformOptions> {
    let path = match config {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let beside = input
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .join(CONFIG_FILE);
            beside.is_file().then_some(beside)
        }
    };
    match path {
        Some(path) => TransformOptions::load(&path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(TransformOptions::default()),
    }
}

/// `App.tsx` -> `App.ts`, `App.jsx` -> `App.js`, anything else -> `.js`.
pub fn output_name(input: &Path) -> PathBuf {
    let ext = match input.extension().and_then(|e| e.to_str()) {
        Some("tsx") => "ts",
        _ => "js",
    };
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("module");
    PathBuf::from(format!("{stem}.{ext}"))
}

/// Compile one file to source text.
pub fn compile_file(input: &Path, options: &TransformOptions) -> Result<String> {
    let src =
        fs::read_to_string(input).with_context(|| format!("failed to read {}", input.display()))?;
    quasi_jsx::compile_source(&src, options)
        .with_context(|| format!("failed to compile {}", input.display()))
}

/// Compile `input` and write the result into `out_dir`.
pub fn build_cmd(
    input: &Path,
    out_dir: Option<&Path>,
    options: &TransformOptions,
) -> Result<PathBuf> {
    let code = compile_file(input, options)?;

    let out_dir = out_dir
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR));
    fs::create_dir_all(&out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let out_path = out_dir.join(output_name(input));
    let len = code.len();
    fs::write(&out_path, code)
        .with_context(|| format!("failed to write {}", out_path.display()))?;

    log::debug!("wrote {len} bytes to {}", out_path.display());
    Ok(out_path)
}
