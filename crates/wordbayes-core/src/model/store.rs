//! Model Store
//!
//! 分類器スナップショットのJSONファイル保存・読み込み。

use std::fs;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{Result, WordBayesError};

use super::snapshot::ClassifierData;

/// スナップショットのファイルストア
#[derive(Debug, Clone)]
pub struct ModelStore {
    path: PathBuf,
}

impl ModelStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// スナップショットを読み込む（ファイルが無ければ`None`）
    pub fn load(&self) -> Result<Option<ClassifierData>> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "model file not found");
            return Ok(None);
        }

        let reader = BufReader::new(fs::File::open(&self.path)?);
        let data: ClassifierData =
            serde_json::from_reader(reader).map_err(|e| WordBayesError::ModelParse {
                path: self.path.clone(),
                message: e.to_string(),
            })?;

        debug!(
            path = %self.path.display(),
            categories = data.categories.len(),
            vocabulary = data.vocabulary.len(),
            "model loaded"
        );
        Ok(Some(data))
    }

    /// スナップショットを保存
    ///
    /// 同じディレクトリの一時ファイルに書いてからリネームする。
    pub fn save(&self, data: &ClassifierData) -> Result<()> {
        let parent = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&parent)?;

        let temp_file = NamedTempFile::new_in(&parent)?;
        {
            let mut writer = BufWriter::new(temp_file.as_file());
            serde_json::to_writer_pretty(&mut writer, data)?;
            writer.write_all(b"\n")?;
            writer.flush()?;
        }
        temp_file.persist(&self.path).map_err(|e| e.error)?;

        info!(path = %self.path.display(), "model saved");
        Ok(())
    }

    /// ファイルを削除。存在した場合は`true`
    pub fn remove(&self) -> Result<bool> {
        if !self.path.exists() {
            return Ok(false);
        }
        fs::remove_file(&self.path)?;
        info!(path = %self.path.display(), "model removed");
        Ok(true)
    }
}
