//! 投稿ファイルの読み込み

use crate::error::{DaraError, Result};
use dara_local_common::FileRef;
use std::path::{Path, PathBuf};

/// ディスクから読み込んだ投稿ファイル
#[derive(Debug, Clone)]
pub struct LoadedFile {
    pub path: PathBuf,
    pub file_ref: FileRef,
    pub bytes: Vec<u8>,
}

/// ファイル名とサイズだけを調べる（検証用、中身は読まない）
pub fn describe(path: &Path) -> Result<FileRef> {
    let metadata = std::fs::metadata(path)
        .map_err(|_| DaraError::FileNotFound(path.display().to_string()))?;
    if !metadata.is_file() {
        return Err(DaraError::FileNotFound(path.display().to_string()));
    }
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| DaraError::FileNotFound(path.display().to_string()))?;
    Ok(FileRef::new(name, metadata.len()))
}

pub fn load(path: &Path) -> Result<LoadedFile> {
    let file_ref = describe(path)?;
    let bytes = std::fs::read(path)?;
    Ok(LoadedFile {
        path: path.to_path_buf(),
        file_ref,
        bytes,
    })
}

/// 投稿に必要なファイル一式
#[derive(Debug, Clone)]
pub struct SubmissionFiles {
    pub pattern: LoadedFile,
    pub structures: Vec<LoadedFile>,
}

impl SubmissionFiles {
    pub fn load(pattern: &Path, structures: &[PathBuf]) -> Result<Self> {
        Ok(Self {
            pattern: load(pattern)?,
            structures: structures.iter().map(|p| load(p)).collect::<Result<Vec<_>>>()?,
        })
    }
}
