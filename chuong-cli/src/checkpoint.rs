//! Resumable progress for the polishing loop
//!
//! The output directory holds `checkpoint.json` plus one `chunks/<id>.md`
//! file per finished chunk. A run resumes only when it would reproduce the
//! same chunks with the same transformer.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chuong_core::PipelineConfig;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::input::PageRange;

/// Checkpoint file name inside the checkpoint directory
pub const CHECKPOINT_FILE: &str = "checkpoint.json";

/// Directory holding one output file per finished chunk
pub const CHUNKS_DIR: &str = "chunks";

/// Where finished chunk outputs are kept
pub trait ProgressStore {
    /// Whether the chunk already has an output
    fn is_done(&self, chunk_id: &str) -> bool;

    /// Record the output of a chunk
    fn mark_done(&mut self, chunk_id: &str, text: &str) -> Result<()>;

    /// Stored output of a chunk, if any
    fn output(&self, chunk_id: &str) -> Result<Option<String>>;
}

/// Parameters that must match for a run to resume
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunIdentity {
    /// Input path as given
    pub input_file: String,
    /// SHA-256 of the input, lowercase hex
    pub input_hash: String,
    /// Input size in bytes
    pub input_size: u64,
    /// Processing mode
    pub mode: String,
    /// Transformer label
    pub transformer: String,
    /// Chunk size the chunks were packed with
    pub max_chars: usize,
    /// [`settings_hash`] of the page range and pipeline settings
    pub settings_hash: String,
}

impl RunIdentity {
    fn matches(&self, data: &CheckpointData) -> bool {
        self.input_hash == data.input_hash
            && self.mode == data.mode
            && self.transformer == data.transformer
            && self.max_chars == data.max_chars
            && self.settings_hash == data.settings_hash
    }
}

/// Lowercase hex SHA-256 over everything besides the input bytes that
/// decides chunk boundaries
pub fn settings_hash(range: &PageRange, pipeline: &PipelineConfig) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(format!("pages:{}-{}\n", range.start, range.end));
    hasher.update(serde_json::to_vec(pipeline)?);
    Ok(hasher
        .finalize()
        .iter()
        .map(|byte| format!("{byte:02x}"))
        .collect())
}

/// On-disk checkpoint contents
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckpointData {
    /// Input path as given
    pub input_file: String,
    /// SHA-256 of the input, lowercase hex
    pub input_hash: String,
    /// Input size in bytes
    pub input_size: u64,
    /// Processing mode
    pub mode: String,
    /// Transformer label
    pub transformer: String,
    /// Chunk size
    pub max_chars: usize,
    /// Page range and pipeline settings digest; absent in older checkpoints
    #[serde(default)]
    pub settings_hash: String,
    /// When the run started
    pub created_at: DateTime<Utc>,
    /// Last save
    pub updated_at: DateTime<Utc>,
    /// Finished chunk ids in completion order
    pub chunks_done: Vec<String>,
    /// Chunks in the run
    pub total_chunks: usize,
}

impl CheckpointData {
    fn fresh(identity: &RunIdentity, total_chunks: usize) -> Self {
        let now = Utc::now();
        Self {
            input_file: identity.input_file.clone(),
            input_hash: identity.input_hash.clone(),
            input_size: identity.input_size,
            mode: identity.mode.clone(),
            transformer: identity.transformer.clone(),
            max_chars: identity.max_chars,
            settings_hash: identity.settings_hash.clone(),
            created_at: now,
            updated_at: now,
            chunks_done: Vec::new(),
            total_chunks,
        }
    }
}

/// File-backed [`ProgressStore`]
#[derive(Debug)]
pub struct CheckpointStore {
    dir: PathBuf,
    data: CheckpointData,
    done: HashSet<String>,
}

impl CheckpointStore {
    /// Open the checkpoint in `dir`, resuming when the identity matches
    pub fn open(dir: &Path, identity: &RunIdentity, total_chunks: usize) -> Result<Self> {
        let chunks_dir = dir.join(CHUNKS_DIR);
        fs::create_dir_all(&chunks_dir)
            .with_context(|| format!("Failed to create {}", chunks_dir.display()))?;

        let path = dir.join(CHECKPOINT_FILE);
        let mut data = match Self::read(&path) {
            Some(data) if identity.matches(&data) => {
                log::info!(
                    "Resuming from checkpoint: {} chunks already done",
                    data.chunks_done.len()
                );
                data
            }
            Some(_) => {
                log::warn!("Checkpoint parameters changed, starting fresh");
                CheckpointData::fresh(identity, total_chunks)
            }
            None => CheckpointData::fresh(identity, total_chunks),
        };
        data.total_chunks = total_chunks;

        let done = data.chunks_done.iter().cloned().collect();
        let store = Self {
            dir: dir.to_path_buf(),
            data,
            done,
        };
        store.save()?;
        Ok(store)
    }

    fn read(path: &Path) -> Option<CheckpointData> {
        if !path.exists() {
            return None;
        }
        let parsed = fs::read_to_string(path)
            .map_err(anyhow::Error::from)
            .and_then(|content| Ok(serde_json::from_str::<CheckpointData>(&content)?));
        match parsed {
            Ok(data) => Some(data),
            Err(e) => {
                log::warn!("Unreadable checkpoint {}: {e}; starting fresh", path.display());
                None
            }
        }
    }

    /// Delete the checkpoint file and every chunk output in `dir`
    pub fn clear(dir: &Path) -> Result<()> {
        let path = dir.join(CHECKPOINT_FILE);
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove {}", path.display()))?;
        }
        let chunks_dir = dir.join(CHUNKS_DIR);
        if chunks_dir.exists() {
            fs::remove_dir_all(&chunks_dir)
                .with_context(|| format!("Failed to remove {}", chunks_dir.display()))?;
        }
        log::info!("Cleared checkpoint in {}", dir.display());
        Ok(())
    }

    /// Current checkpoint contents
    pub fn data(&self) -> &CheckpointData {
        &self.data
    }

    /// Chunks with a recorded output file
    pub fn done_count(&self) -> usize {
        self.done.iter().filter(|id| self.is_done(id)).count()
    }

    fn chunk_path(&self, chunk_id: &str) -> PathBuf {
        self.dir.join(CHUNKS_DIR).join(format!("{chunk_id}.md"))
    }

    fn save(&self) -> Result<()> {
        let path = self.dir.join(CHECKPOINT_FILE);
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(&self.data)?;
        fs::write(&tmp, content).with_context(|| format!("Failed to write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

impl ProgressStore for CheckpointStore {
    fn is_done(&self, chunk_id: &str) -> bool {
        self.done.contains(chunk_id) && self.chunk_path(chunk_id).is_file()
    }

    fn mark_done(&mut self, chunk_id: &str, text: &str) -> Result<()> {
        let path = self.chunk_path(chunk_id);
        fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;

        if self.done.insert(chunk_id.to_string()) {
            self.data.chunks_done.push(chunk_id.to_string());
        }
        self.data.updated_at = Utc::now();
        self.save()
    }

    fn output(&self, chunk_id: &str) -> Result<Option<String>> {
        let path = self.chunk_path(chunk_id);
        if !path.is_file() {
            return Ok(None);
        }
        let text =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))?;
        Ok(Some(text))
    }
}
