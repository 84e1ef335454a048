//! # script_hide 库
//!
//! 本库包含把脚本隐藏进图像 (LSB 隐写) 和 PDF (元数据) 的核心逻辑。

// 声明库包含的所有模块。

pub mod cli;
pub mod constants;
pub mod error;
pub mod handler;
pub mod image_codec;
pub mod pdf_codec;
pub mod steganography;

pub use error::{Result, StegoError};
