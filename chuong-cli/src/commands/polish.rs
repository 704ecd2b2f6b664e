//! Polish command implementation
//!
//! Runs the pipeline, sends every chunk through a transformer in order with
//! checkpoint/resume, then exports the collected outputs.

use anyhow::{Context, Result};
use chuong_core::Chunk;
use clap::Args;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use super::InputArgs;
use crate::checkpoint::{settings_hash, CheckpointStore, ProgressStore, RunIdentity};
use crate::config::CliConfig;
use crate::error::{exit_code, CliError};
use crate::input::FileReader;
use crate::output::{
    write_chunks, ChunkFormatter, DocumentHeader, ExportFormat, JsonFormatter, MarkdownFormatter,
};
use crate::progress::{LogReporter, ProgressReporter, StatusLines};
use crate::prompt::{find_default_file, Mode, PromptContext, GLOSSARY_FILE, STYLE_FILE};
use crate::transform::{CommandTransformer, PassthroughTransformer, TextTransformer};

/// Markdown export file name
pub const MARKDOWN_EXPORT: &str = "polished.md";

/// JSON export file name
pub const JSON_EXPORT: &str = "polished.json";

/// Arguments for the polish command
#[derive(Debug, Args)]
pub struct PolishArgs {
    #[command(flatten)]
    pub input: InputArgs,

    /// Output directory
    #[arg(short = 'o', long = "outdir", value_name = "DIR")]
    pub outdir: PathBuf,

    /// Checkpoint directory (default: the output directory)
    #[arg(long, value_name = "DIR")]
    pub checkpoint: Option<PathBuf>,

    /// Discard any existing checkpoint and chunk outputs
    #[arg(long)]
    pub overwrite: bool,

    /// Processing mode (default: from config)
    #[arg(short, long, value_enum)]
    pub mode: Option<Mode>,

    /// Export format (default: from config)
    #[arg(short, long, value_enum)]
    pub export: Option<ExportFormat>,

    /// Delay between transformer calls in milliseconds
    #[arg(long, value_name = "MS")]
    pub sleep_ms: Option<u64>,

    /// Style guide file (default: style.yaml next to the input or in the working directory)
    #[arg(long, value_name = "FILE")]
    pub style: Option<PathBuf>,

    /// Glossary file (default: glossary.json next to the input or in the working directory)
    #[arg(long, value_name = "FILE")]
    pub glossary: Option<PathBuf>,

    /// Transformer program; receives the prompt on stdin
    #[arg(long, value_name = "PROGRAM")]
    pub transformer: Option<String>,

    /// Argument for the transformer program (repeatable)
    #[arg(long = "transformer-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub transformer_args: Vec<String>,

    /// Keep chunk text unchanged instead of calling a transformer
    #[arg(long)]
    pub dry_run: bool,

    /// Emit machine-readable status lines on stdout
    #[arg(long)]
    pub status_lines: bool,
}

/// Counts from one pass over the chunks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Chunks sent to the transformer
    pub processed: usize,
    /// Chunks already done in the store
    pub skipped: usize,
}

/// Per-run settings for [`run_chunks`]
pub struct ChunkRun<'a> {
    /// Rewrites each chunk
    pub transformer: &'a dyn TextTransformer,
    /// Style guide and glossary
    pub context: &'a PromptContext,
    /// Processing mode
    pub mode: Mode,
    /// Pause between transformer calls
    pub sleep: Duration,
}

/// Send every chunk that is not done yet through the transformer, in order
pub fn run_chunks(
    chunks: &[Chunk],
    run: &ChunkRun<'_>,
    store: &mut dyn ProgressStore,
    progress: &ProgressReporter,
    status: Option<&StatusLines>,
) -> Result<RunSummary> {
    let mut summary = RunSummary::default();
    let total = chunks.len().max(1);

    for (index, chunk) in chunks.iter().enumerate() {
        let percent = (index + 1) * 100 / total;

        if store.is_done(&chunk.chunk_id) {
            log::debug!("Skipping {} (already done)", chunk.chunk_id);
            summary.skipped += 1;
            progress.chunk_completed(chunk, true);
            if let Some(status) = status {
                status.progress(percent, chunk);
            }
            continue;
        }

        if summary.processed > 0 && !run.sleep.is_zero() {
            thread::sleep(run.sleep);
        }

        log::info!("Processing {} ({})", chunk.chunk_id, chunk.context());
        let prompt = run.context.prompt(run.mode, chunk);
        let text = run
            .transformer
            .rewrite(chunk, &prompt)
            .with_context(|| format!("Failed to process {}", chunk.chunk_id))?;
        store.mark_done(&chunk.chunk_id, &text)?;

        summary.processed += 1;
        progress.chunk_completed(chunk, false);
        if let Some(status) = status {
            status.progress(percent, chunk);
        }
    }

    Ok(summary)
}

/// Chunk outputs in order; a missing output falls back to the chunk text
pub fn collect_outputs(chunks: &[Chunk], store: &dyn ProgressStore) -> Result<Vec<String>> {
    chunks
        .iter()
        .map(|chunk| match store.output(&chunk.chunk_id)? {
            Some(text) => Ok(text),
            None => {
                log::warn!("No output for {}, using the original text", chunk.chunk_id);
                Ok(chunk.text.clone())
            }
        })
        .collect()
}

/// Write the requested export files into `outdir`
pub fn export(
    outdir: &Path,
    chunks: &[Chunk],
    texts: &[String],
    format: ExportFormat,
    header: &DocumentHeader,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    if format.includes_markdown() {
        let path = outdir.join(MARKDOWN_EXPORT);
        let file = create(&path)?;
        let mut formatter = MarkdownFormatter::new(BufWriter::new(file), Some(header.clone()));
        write_export(&mut formatter, chunks, texts)?;
        written.push(path);
    }

    if format.includes_json() {
        let path = outdir.join(JSON_EXPORT);
        let file = create(&path)?;
        let mut formatter = JsonFormatter::new(BufWriter::new(file));
        write_export(&mut formatter, chunks, texts)?;
        written.push(path);
    }

    for path in &written {
        log::info!("Exported {}", path.display());
    }
    Ok(written)
}

fn create(path: &Path) -> Result<File> {
    File::create(path).with_context(|| format!("Failed to create {}", path.display()))
}

fn write_export(
    formatter: &mut dyn ChunkFormatter,
    chunks: &[Chunk],
    texts: &[String],
) -> Result<()> {
    write_chunks(formatter, chunks.iter().zip(texts.iter().map(String::as_str)))
}

impl PolishArgs {
    /// Execute the polish command
    pub fn execute(&self, quiet: bool) -> Result<()> {
        let status = self.status_lines.then(|| Arc::new(StatusLines::stdout()));

        let result = self.run(quiet, status.clone());
        if let (Err(err), Some(status)) = (&result, &status) {
            status.error(exit_code(err), &format!("{err:#}"));
        }
        result
    }

    fn transformer(&self, config: &CliConfig) -> Result<Box<dyn TextTransformer>> {
        if self.dry_run {
            return Ok(Box::new(PassthroughTransformer));
        }
        if let Some(program) = &self.transformer {
            return Ok(Box::new(CommandTransformer::new(
                program.clone(),
                self.transformer_args.clone(),
            )));
        }
        if !config.polish.transformer_command.is_empty() {
            return Ok(Box::new(CommandTransformer::from_argv(
                &config.polish.transformer_command,
            )?));
        }
        Err(CliError::Configuration(
            "no transformer configured: pass --transformer, set polish.transformer_command, or use --dry-run"
                .into(),
        )
        .into())
    }

    fn prompt_context(&self) -> Result<PromptContext> {
        let input = &self.input.input;
        let style = self
            .style
            .clone()
            .or_else(|| find_default_file(input, STYLE_FILE));
        let glossary = self
            .glossary
            .clone()
            .or_else(|| find_default_file(input, GLOSSARY_FILE));

        if let Some(path) = &style {
            log::info!("Style guide: {}", path.display());
        }
        if let Some(path) = &glossary {
            log::info!("Glossary: {}", path.display());
        }
        PromptContext::load(style.as_deref(), glossary.as_deref())
    }

    fn run(&self, quiet: bool, status: Option<Arc<StatusLines>>) -> Result<()> {
        let input = &self.input.input;
        let input_label = input.display().to_string();
        if let Some(status) = &status {
            status.status("LOAD", &[("file", input_label.as_str())]);
        }

        let config = self.input.load_config()?;
        let mode = self.mode.unwrap_or(config.polish.mode);
        let export_format = self.export.unwrap_or(config.polish.export);
        let sleep = Duration::from_millis(self.sleep_ms.unwrap_or(config.polish.sleep_ms));
        let transformer = self.transformer(&config)?;
        let context = self.prompt_context()?;

        if let Some(status) = &status {
            status.status("EXTRACT", &[]);
        }
        let (source, output) = self
            .input
            .run_pipeline(&config, LogReporter::shared(status.clone()))?;
        let chunks = &output.chunks;
        if let Some(status) = &status {
            let pages = source.pages().len().to_string();
            let chapters = output.chapters.len().to_string();
            let count = chunks.len().to_string();
            status.status(
                "SPLIT",
                &[
                    ("pages", pages.as_str()),
                    ("chapters", chapters.as_str()),
                    ("chunks", count.as_str()),
                ],
            );
        }

        fs::create_dir_all(&self.outdir)
            .with_context(|| format!("Failed to create {}", self.outdir.display()))?;
        let checkpoint_dir = self.checkpoint.as_deref().unwrap_or(self.outdir.as_path());
        if self.overwrite {
            CheckpointStore::clear(checkpoint_dir)?;
        }

        let identity = RunIdentity {
            input_file: input_label.clone(),
            input_hash: FileReader::sha256_hex(input)?,
            input_size: FileReader::file_size(input)?,
            mode: mode.as_str().to_string(),
            transformer: transformer.label(),
            max_chars: config.pipeline.max_chars,
            settings_hash: settings_hash(&self.input.page_range(), &config.pipeline)?,
        };
        let mut store = CheckpointStore::open(checkpoint_dir, &identity, chunks.len())?;

        if let Some(status) = &status {
            let done = store.done_count().to_string();
            status.status(
                "POLISH",
                &[
                    ("mode", mode.as_str()),
                    ("transformer", identity.transformer.as_str()),
                    ("done", done.as_str()),
                ],
            );
        }
        let mut progress = ProgressReporter::new(quiet || status.is_some());
        progress.init_chunks(chunks.len() as u64);

        let run = ChunkRun {
            transformer: transformer.as_ref(),
            context: &context,
            mode,
            sleep,
        };
        let summary = match run_chunks(chunks, &run, &mut store, &progress, status.as_deref()) {
            Ok(summary) => summary,
            Err(err) => {
                progress.abandon();
                return Err(err);
            }
        };
        progress.finish();
        log::info!(
            "Polished {} chunks, {} already done",
            summary.processed,
            summary.skipped
        );

        if let Some(status) = &status {
            status.status("EXPORT", &[("format", export_format.as_str())]);
        }
        let texts = collect_outputs(chunks, &store)?;
        let header = DocumentHeader {
            title: self.input.title(),
            subtitle: Some(mode.subtitle().to_string()),
        };
        let written = export(&self.outdir, chunks, &texts, export_format, &header)?;

        match &status {
            Some(status) => {
                if let Some(first) = written.first() {
                    status.done(&self.outdir, first);
                }
            }
            None if !quiet => {
                println!("✓ Polished {} chunks into {}", chunks.len(), self.outdir.display());
                for path in &written {
                    println!("  {}", path.display());
                }
            }
            None => {}
        }
        Ok(())
    }
}
