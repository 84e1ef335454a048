//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use crate::pdf_codec::Placement;
use crate::steganography::Framing;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// 把脚本文件隐藏进无损图像 (LSB 隐写) 或 PDF 元数据中，并在之后原样恢复。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "把脚本文件隐藏进无损格式图像 (如 PNG, BMP) 的最低有效位，或写入 PDF 的元数据中，并在之后原样恢复。\n隐藏不等于加密：任何知道方法的人都能取出内容。"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 按载体类型划分的子命令。
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 图像 LSB 隐写。
    #[command(subcommand)]
    Image(ImageCommands),

    /// PDF 元数据嵌入。
    #[command(subcommand)]
    Pdf(PdfCommands),
}

#[derive(Subcommand, Debug)]
pub enum ImageCommands {
    /// 把脚本隐藏进图像。
    Encode(ImageEncodeArgs),

    /// 从图像中恢复脚本。
    Decode(ImageDecodeArgs),

    /// 显示图像可容纳的最大脚本大小。
    Capacity(ImageCapacityArgs),
}

#[derive(Subcommand, Debug)]
pub enum PdfCommands {
    /// 把脚本嵌入 PDF。
    Embed(PdfEmbedArgs),

    /// 从 PDF 中提取脚本。
    Extract(PdfExtractArgs),
}

/// 'image encode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ImageEncodeArgs {
    /// 用于隐写的输入图像文件路径 (如 PNG, BMP)。
    pub input_image: PathBuf,

    /// 隐写完成后，保存结果图像的输出路径。必须是无损格式。
    pub output_image: PathBuf,

    /// 要隐藏的脚本文件路径。
    pub script: PathBuf,

    /// 载荷的分帧方式。解码时必须使用相同的方式。
    #[arg(long, value_enum, default_value_t = Framing::Delimiter)]
    pub framing: Framing,

    /// 输出文件已存在时覆盖它。
    #[arg(short, long)]
    pub force: bool,
}

/// 'image decode' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ImageDecodeArgs {
    /// 已隐藏脚本的图像文件路径。
    pub input_image: PathBuf,

    /// 恢复脚本后的保存路径。
    pub output_script: PathBuf,

    /// 编码时使用的分帧方式。
    #[arg(long, value_enum, default_value_t = Framing::Delimiter)]
    pub framing: Framing,

    /// 输出文件已存在时覆盖它。
    #[arg(short, long)]
    pub force: bool,
}

/// 'image capacity' 命令所需的参数。
#[derive(Args, Debug)]
pub struct ImageCapacityArgs {
    /// 要检查的图像文件路径。
    pub input_image: PathBuf,
}

/// 'pdf embed' 命令所需的参数。
#[derive(Args, Debug)]
pub struct PdfEmbedArgs {
    /// 输入 PDF 文件路径。
    pub input_pdf: PathBuf,

    /// 嵌入完成后，保存结果 PDF 的输出路径。
    pub output_pdf: PathBuf,

    /// 要嵌入的脚本文件路径。
    pub script: PathBuf,

    /// 脚本的存放位置：每个页面各一份，或文档 Info 字典中一份。
    #[arg(long, value_enum, default_value_t = Placement::Pages)]
    pub placement: Placement,

    /// 输出文件已存在时覆盖它。
    #[arg(short, long)]
    pub force: bool,
}

/// 'pdf extract' 命令所需的参数。
#[derive(Args, Debug)]
pub struct PdfExtractArgs {
    /// 已嵌入脚本的 PDF 文件路径。
    pub input_pdf: PathBuf,

    /// 提取脚本后的保存路径。
    pub output_script: PathBuf,

    /// 输出文件已存在时覆盖它。
    #[arg(short, long)]
    pub force: bool,
}
