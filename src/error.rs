//! # 错误类型模块
//!
//! 定义编解码器可能返回的所有错误种类。每一种失败都对应一个独立的变体，
//! 调用方可以按种类分别处理，而不是依赖一个笼统的错误。

use std::path::{Path, PathBuf};
use thiserror::Error;

/// 图像与 PDF 编解码器共用的错误类型。
#[derive(Error, Debug)]
pub enum StegoError {
    /// 输入的载体文件或脚本文件不存在。
    #[error("File not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// 载体文件无法解码或打开 (损坏或格式不受支持)。
    #[error("Failed to open {}: {reason}", path.display())]
    OpenFailure { path: PathBuf, reason: String },

    /// 脚本文件存在但无法读取。
    #[error("Failed to read {}", path.display())]
    ReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 有效载荷加上分帧数据超出了图像的隐写容量 (单位：位)。
    /// 长度前缀模式下，图像连长度头部都放不下时也返回此错误。
    #[error("Carrier capacity exceeded. Required: {required} bits, Available: {available} bits")]
    CapacityExceeded { required: usize, available: usize },

    /// 没有任何页面 (或文档 Info 字典) 携带非空的隐藏数据。
    #[error("No script data found in {}", path.display())]
    DataAbsent { path: PathBuf },

    /// 长度前缀声明的长度超出了图像剩余的容量。
    #[error("Length header declares {declared} bytes, but only {available} bytes follow it in the image")]
    InvalidLength { declared: usize, available: usize },

    /// 输出文件无法写入。
    #[error("Failed to write {}: {reason}", path.display())]
    WriteFailure { path: PathBuf, reason: String },
}

/// 编解码器使用的 `Result` 别名。
pub type Result<T> = std::result::Result<T, StegoError>;

/// 如果 `path` 不是一个已存在的文件，返回 `NotFound`。
pub(crate) fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(StegoError::NotFound {
            path: path.to_path_buf(),
        })
    }
}

/// 完整读取脚本文件。
pub(crate) fn read_payload(path: &Path) -> Result<Vec<u8>> {
    ensure_exists(path)?;
    std::fs::read(path).map_err(|source| StegoError::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// 将恢复出的脚本写入目标路径。
pub(crate) fn write_payload(path: &Path, payload: &[u8]) -> Result<()> {
    std::fs::write(path, payload).map_err(|e| StegoError::WriteFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}
