//! # 图像 LSB 编解码器
//!
//! 负责载体图像的加载与保存，并把像素缓冲区交给 [`crate::steganography`]
//! 中的核心算法处理。输出必须使用无损格式，否则隐藏的位会被破坏。

use crate::error::{Result, StegoError, ensure_exists, read_payload, write_payload};
use crate::steganography::{Framing, PixelLayout, capacity_bits, modify, recover};
use image::{DynamicImage, GenericImageView, ImageReader, RgbImage, RgbaImage};
use std::path::Path;

/// 按文件内容 (而不是扩展名) 识别格式并解码图像。
fn load_image(path: &Path) -> Result<DynamicImage> {
    let open_failure = |reason: String| StegoError::OpenFailure {
        path: path.to_path_buf(),
        reason,
    };

    ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| open_failure(e.to_string()))?
        .decode()
        .map_err(|e| open_failure(e.to_string()))
}

/// 解码后的载体图像。带 Alpha 通道的图像保留 Alpha，但不在其中写入数据。
enum Carrier {
    Rgb(RgbImage),
    Rgba(RgbaImage),
}

impl Carrier {
    fn open(path: &Path) -> Result<Self> {
        let image = load_image(path)?;

        Ok(if image.color().has_alpha() {
            Carrier::Rgba(image.into_rgba8())
        } else {
            Carrier::Rgb(image.into_rgb8())
        })
    }

    fn dimensions(&self) -> (u32, u32) {
        match self {
            Carrier::Rgb(buf) => buf.dimensions(),
            Carrier::Rgba(buf) => buf.dimensions(),
        }
    }

    fn samples(&self) -> (&[u8], PixelLayout) {
        match self {
            Carrier::Rgb(buf) => (buf.as_raw().as_slice(), PixelLayout::Rgb),
            Carrier::Rgba(buf) => (buf.as_raw().as_slice(), PixelLayout::Rgba),
        }
    }

    fn samples_mut(&mut self) -> (&mut [u8], PixelLayout) {
        match self {
            Carrier::Rgb(buf) => (&mut **buf, PixelLayout::Rgb),
            Carrier::Rgba(buf) => (&mut **buf, PixelLayout::Rgba),
        }
    }

    fn save(&self, path: &Path) -> Result<()> {
        let saved = match self {
            Carrier::Rgb(buf) => buf.save(path),
            Carrier::Rgba(buf) => buf.save(path),
        };
        saved.map_err(|e| StegoError::WriteFailure {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }
}

/// 一次成功编码的统计信息。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodeReport {
    pub payload_bytes: usize,
    pub bits_written: usize,
    pub capacity_bits: usize,
}

/// 图像的隐写容量。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageCapacity {
    pub width: u32,
    pub height: u32,
    pub bits: usize,
}

impl ImageCapacity {
    /// 在给定分帧方式下可隐藏的最大载荷字节数。
    pub fn max_payload_bytes(&self, framing: Framing) -> usize {
        framing.max_payload_bytes(self.bits)
    }
}

/// 把 `script` 的内容隐藏进 `input` 图像，结果保存到 `output`。
///
/// 只有在内存中的图像全部修改完成后才会写出文件，
/// 任何错误都不会留下部分输出。原始输入文件不会被修改。
///
/// # Errors
///
/// * [`StegoError::NotFound`] - 输入图像或脚本文件不存在。
/// * [`StegoError::OpenFailure`] - 图像无法解码。
/// * [`StegoError::ReadFailure`] - 脚本文件无法读取。
/// * [`StegoError::CapacityExceeded`] - 图像容量不足。
/// * [`StegoError::WriteFailure`] - 无法保存输出图像。
pub fn encode_image(input: &Path, output: &Path, script: &Path, framing: Framing) -> Result<EncodeReport> {
    ensure_exists(input)?;
    ensure_exists(script)?;

    let mut carrier = Carrier::open(input)?;
    let payload = read_payload(script)?;

    let (width, height) = carrier.dimensions();
    let (pix, layout) = carrier.samples_mut();
    let bits_written = modify(&payload, pix, layout, framing)?;

    carrier.save(output)?;

    Ok(EncodeReport {
        payload_bytes: payload.len(),
        bits_written,
        capacity_bits: capacity_bits(width, height),
    })
}

/// 从 `input` 图像中恢复隐藏的脚本并写入 `output`，返回恢复的字节数。
///
/// # Errors
///
/// * [`StegoError::NotFound`] - 图像文件不存在。
/// * [`StegoError::OpenFailure`] - 图像无法解码。
/// * [`StegoError::CapacityExceeded`] / [`StegoError::InvalidLength`] - 长度前缀无效。
/// * [`StegoError::WriteFailure`] - 无法写入输出脚本。
pub fn decode_image(input: &Path, output: &Path, framing: Framing) -> Result<usize> {
    ensure_exists(input)?;

    let carrier = Carrier::open(input)?;
    let (pix, layout) = carrier.samples();
    let payload = recover(pix, layout, framing)?;

    write_payload(output, &payload)?;
    Ok(payload.len())
}

/// 查询 `input` 图像的隐写容量。
pub fn image_capacity(input: &Path) -> Result<ImageCapacity> {
    ensure_exists(input)?;

    let (width, height) = load_image(input)?.dimensions();

    Ok(ImageCapacity {
        width,
        height,
        bits: capacity_bits(width, height),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, Rgba};
    use tempfile::tempdir;

    #[test]
    fn encode_keeps_alpha_and_decodes() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        let script = dir.path().join("script.sh");
        let recovered = dir.path().join("recovered.sh");

        RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 77]))
            .save(&input)
            .unwrap();
        std::fs::write(&script, "echo hi\n").unwrap();

        let report = encode_image(&input, &output, &script, Framing::Delimiter).unwrap();
        assert_eq!(report.payload_bytes, 8);
        assert_eq!(report.bits_written, 72);
        assert_eq!(report.capacity_bits, 192);

        let encoded = image::open(&output).unwrap().into_rgba8();
        assert!(encoded.pixels().all(|p| p.0[3] == 77));

        assert_eq!(decode_image(&output, &recovered, Framing::Delimiter).unwrap(), 8);
        assert_eq!(std::fs::read(&recovered).unwrap(), b"echo hi\n");
    }

    #[test]
    fn capacity_of_rgb_image() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in.bmp");
        RgbImage::from_pixel(10, 4, Rgb([1, 2, 3])).save(&input).unwrap();

        let capacity = image_capacity(&input).unwrap();
        assert_eq!((capacity.width, capacity.height, capacity.bits), (10, 4, 120));
        assert_eq!(capacity.max_payload_bytes(Framing::Delimiter), 14);
        assert_eq!(capacity.max_payload_bytes(Framing::LengthPrefixed), 11);
    }

    #[test]
    fn format_is_detected_from_contents() {
        let dir = tempdir().unwrap();
        let png = dir.path().join("carrier.png");
        let renamed = dir.path().join("carrier.img");
        let output = dir.path().join("out.png");
        let script = dir.path().join("script.sh");
        let recovered = dir.path().join("recovered.sh");

        RgbImage::from_pixel(6, 6, Rgb([9, 8, 7])).save(&png).unwrap();
        std::fs::rename(&png, &renamed).unwrap();
        std::fs::write(&script, "id").unwrap();

        assert_eq!(image_capacity(&renamed).unwrap().bits, 108);
        encode_image(&renamed, &output, &script, Framing::Delimiter).unwrap();
        decode_image(&output, &recovered, Framing::Delimiter).unwrap();
        assert_eq!(std::fs::read(&recovered).unwrap(), b"id");
    }

    #[test]
    fn corrupt_image_is_an_open_failure() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("broken.png");
        let script = dir.path().join("script.sh");
        std::fs::write(&input, b"definitely not a png").unwrap();
        std::fs::write(&script, b"ls").unwrap();

        let err = encode_image(&input, &dir.path().join("out.png"), &script, Framing::Delimiter)
            .unwrap_err();
        assert!(matches!(err, StegoError::OpenFailure { .. }));
    }
}
