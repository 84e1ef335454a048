//! # 命令处理逻辑模块
//!
//! 包含处理各个子命令的高级业务逻辑。
//! 本模块负责输出路径检查、调用编解码器以及向用户报告结果。

use crate::cli::{ImageCapacityArgs, ImageDecodeArgs, ImageEncodeArgs, PdfEmbedArgs, PdfExtractArgs};
use crate::image_codec::{decode_image, encode_image, image_capacity};
use crate::pdf_codec::{embed_pdf, extract_pdf};
use crate::steganography::Framing;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

/// 未指定 `--force` 时，拒绝覆盖已存在的输出文件。
fn ensure_writable(dest: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !dest.exists(),
        "Output file already exists: {}. \nUse --force to overwrite it.",
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 处理 'image encode' 命令的执行逻辑。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法读取输入图像或脚本文件。
/// * 图像没有足够的空间来隐藏脚本。
/// * 无法写入到目标图像文件。
pub fn handle_image_encode(args: ImageEncodeArgs) -> Result<()> {
    ensure_writable(&args.output_image, args.force)?;

    let report = encode_image(&args.input_image, &args.output_image, &args.script, args.framing)
        .with_context(|| {
            format!(
                "Unable to hide script {} in image {}",
                args.script.to_string_lossy().red().bold(),
                args.input_image.to_string_lossy().red().bold()
            )
        })?;

    println!(
        "The script has been successfully hidden and saved: {} ({} of {} bits used)",
        args.output_image.to_string_lossy().green().bold(),
        report.bits_written.to_string().green(),
        report.capacity_bits.to_string().green()
    );

    Ok(())
}

/// 处理 'image decode' 命令的执行逻辑。
///
/// 分隔符模式下，如果图像中没有零字节，会输出全部恢复的字节而不报错。
pub fn handle_image_decode(args: ImageDecodeArgs) -> Result<()> {
    ensure_writable(&args.output_script, args.force)?;

    let recovered = decode_image(&args.input_image, &args.output_script, args.framing).with_context(|| {
        format!(
            "Failed to recover script from '{}'. \nThe image may not contain a hidden script or is corrupted.",
            args.input_image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The script has been successfully recovered and saved: {} ({} bytes)",
        args.output_script.to_string_lossy().green().bold(),
        recovered.to_string().green()
    );

    Ok(())
}

/// 处理 'image capacity' 命令的执行逻辑。
pub fn handle_image_capacity(args: ImageCapacityArgs) -> Result<()> {
    let capacity = image_capacity(&args.input_image).with_context(|| {
        format!(
            "Unable to read image file: {}",
            args.input_image.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "{} ({}x{}): {} bits",
        args.input_image.to_string_lossy().green().bold(),
        capacity.width,
        capacity.height,
        capacity.bits.to_string().green()
    );
    println!(
        "  delimiter:       up to {} bytes",
        capacity.max_payload_bytes(Framing::Delimiter).to_string().green().bold()
    );
    println!(
        "  length-prefixed: up to {} bytes",
        capacity.max_payload_bytes(Framing::LengthPrefixed).to_string().green().bold()
    );

    Ok(())
}

/// 处理 'pdf embed' 命令的执行逻辑。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 输出文件已存在且未指定 `--force`。
/// * 无法打开输入 PDF 或读取脚本文件。
/// * 无法保存目标 PDF 文件。
pub fn handle_pdf_embed(args: PdfEmbedArgs) -> Result<()> {
    ensure_writable(&args.output_pdf, args.force)?;

    let written = embed_pdf(&args.input_pdf, &args.output_pdf, &args.script, args.placement)
        .with_context(|| {
            format!(
                "Unable to embed script {} in PDF {}",
                args.script.to_string_lossy().red().bold(),
                args.input_pdf.to_string_lossy().red().bold()
            )
        })?;

    if written == 0 {
        eprintln!(
            "{} the document has no pages, so nothing was embedded.",
            "Warning:".yellow().bold()
        );
    }

    println!(
        "The script has been successfully embedded and saved: {} ({} {})",
        args.output_pdf.to_string_lossy().green().bold(),
        written.to_string().green(),
        if written == 1 { "copy" } else { "copies" }
    );

    Ok(())
}

/// 处理 'pdf extract' 命令的执行逻辑。
pub fn handle_pdf_extract(args: PdfExtractArgs) -> Result<()> {
    ensure_writable(&args.output_script, args.force)?;

    let extracted = extract_pdf(&args.input_pdf, &args.output_script).with_context(|| {
        format!(
            "Failed to extract script from '{}'.",
            args.input_pdf.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The script has been successfully extracted and saved: {} ({} bytes)",
        args.output_script.to_string_lossy().green().bold(),
        extracted.to_string().green()
    );

    Ok(())
}
