//! # LSB 隐写核心算法
//!
//! 在像素采样缓冲区上按行优先顺序 (先 y 后 x) 逐通道写入/读取最低有效位。
//! 每个像素的 R、G、B 通道各承载 1 位，Alpha 通道保持不变。
//! 字节按原顺序展开，每个字节内部高位在前 (MSB-first)。

use crate::constants::{BITS_PER_BYTE, CHANNELS_PER_PIXEL, DELIMITER, LENGTH_HEADER_BITS};
use crate::error::{Result, StegoError};
use clap::ValueEnum;

/// 有效载荷在比特流中的分帧方式。
///
/// 两种方式互不兼容：解码时必须使用编码时的分帧方式。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Framing {
    /// 在载荷之后追加一个零字节作为结束标记。
    /// 载荷中若含有零字节，解码时会在该处被截断。
    #[default]
    Delimiter,

    /// 在载荷之前写入 32 位大端序长度头部，载荷可以包含任意字节。
    LengthPrefixed,
}

impl Framing {
    /// 分帧本身占用的位数。
    pub fn overhead_bits(self) -> usize {
        match self {
            Framing::Delimiter => BITS_PER_BYTE,
            Framing::LengthPrefixed => LENGTH_HEADER_BITS,
        }
    }

    /// 在给定容量 (位) 下可以隐藏的最大载荷字节数。
    pub fn max_payload_bytes(self, capacity_bits: usize) -> usize {
        capacity_bits.saturating_sub(self.overhead_bits()) / BITS_PER_BYTE
    }
}

/// 像素缓冲区中每个像素的采样布局。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb,
    Rgba,
}

impl PixelLayout {
    /// 每个像素占用的字节数。
    pub fn stride(self) -> usize {
        match self {
            PixelLayout::Rgb => 3,
            PixelLayout::Rgba => 4,
        }
    }
}

/// 宽 × 高的图像可承载的位数。
pub fn capacity_bits(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS_PER_PIXEL
}

fn buffer_capacity(pix: &[u8], layout: PixelLayout) -> usize {
    pix.len() / layout.stride() * CHANNELS_PER_PIXEL
}

fn channels_mut(pix: &mut [u8], layout: PixelLayout) -> impl Iterator<Item = &mut u8> {
    pix.chunks_exact_mut(layout.stride())
        .flat_map(|pixel| pixel.into_iter().take(CHANNELS_PER_PIXEL))
}

fn channels(pix: &[u8], layout: PixelLayout) -> impl Iterator<Item = u8> + '_ {
    pix.chunks_exact(layout.stride())
        .flat_map(|pixel| pixel.into_iter().take(CHANNELS_PER_PIXEL).copied())
}

fn bits(bytes: &[u8]) -> impl Iterator<Item = u8> + '_ {
    bytes
        .iter()
        .flat_map(|&byte| (0..BITS_PER_BYTE).rev().map(move |i| (byte >> i) & 1))
}

fn frame(payload: &[u8], framing: Framing, available: usize) -> Result<Vec<u8>> {
    let mut framed = Vec::with_capacity(payload.len() + framing.overhead_bits() / BITS_PER_BYTE);
    match framing {
        Framing::Delimiter => {
            framed.extend_from_slice(payload);
            framed.push(DELIMITER);
        }
        Framing::LengthPrefixed => {
            let len = u32::try_from(payload.len()).map_err(|_| StegoError::CapacityExceeded {
                required: LENGTH_HEADER_BITS + payload.len() * BITS_PER_BYTE,
                available,
            })?;
            framed.extend_from_slice(&len.to_be_bytes());
            framed.extend_from_slice(payload);
        }
    }
    Ok(framed)
}

/// 将 `payload` 按 `framing` 分帧后写入 `pix` 中各颜色通道的最低有效位。
///
/// 写入从第一个像素开始，全部位写完后立即停止，其余像素保持原样。
/// 每个被修改的通道只改变最低位：`channel = (channel & !1) | bit`。
///
/// 返回实际写入的位数 (载荷加分帧)。
///
/// # Errors
///
/// 如果分帧后的位数超过缓冲区容量，返回 [`StegoError::CapacityExceeded`]，
/// 此时 `pix` 不会被修改。
pub fn modify(payload: &[u8], pix: &mut [u8], layout: PixelLayout, framing: Framing) -> Result<usize> {
    let available = buffer_capacity(pix, layout);
    let required = payload.len() * BITS_PER_BYTE + framing.overhead_bits();
    if required > available {
        return Err(StegoError::CapacityExceeded {
            required,
            available,
        });
    }

    let framed = frame(payload, framing, available)?;

    channels_mut(pix, layout)
        .zip(bits(&framed))
        .for_each(|(channel, bit)| *channel = (*channel & !1) | bit);

    Ok(required)
}

/// 读取整幅图像所有颜色通道的最低有效位，按 MSB-first 打包成字节。
/// 末尾凑不满 8 位的部分被丢弃。
fn unpack(pix: &[u8], layout: PixelLayout) -> Vec<u8> {
    let lsbs: Vec<u8> = channels(pix, layout).map(|channel| channel & 1).collect();
    lsbs.chunks_exact(BITS_PER_BYTE)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | bit))
        .collect()
}

/// 从 `pix` 中恢复按 `framing` 分帧的载荷。
///
/// 分隔符模式下，结果在第一个零字节处截断；找不到零字节时返回全部字节，
/// 这不视为错误。
///
/// # Errors
///
/// 仅长度前缀模式会失败：图像放不下长度头部时返回
/// [`StegoError::CapacityExceeded`]，头部声明的长度超出剩余数据时返回
/// [`StegoError::InvalidLength`]。
pub fn recover(pix: &[u8], layout: PixelLayout, framing: Framing) -> Result<Vec<u8>> {
    let mut bytes = unpack(pix, layout);

    match framing {
        Framing::Delimiter => {
            if let Some(end) = bytes.iter().position(|&b| b == DELIMITER) {
                bytes.truncate(end);
            }
            Ok(bytes)
        }
        Framing::LengthPrefixed => {
            let header_len = LENGTH_HEADER_BITS / BITS_PER_BYTE;
            let Some(header) = bytes.get(..header_len) else {
                return Err(StegoError::CapacityExceeded {
                    required: LENGTH_HEADER_BITS,
                    available: buffer_capacity(pix, layout),
                });
            };

            let mut len_bytes = [0u8; 4];
            len_bytes.copy_from_slice(header);
            let declared = u32::from_be_bytes(len_bytes) as usize;
            let available = bytes.len() - header_len;
            if declared > available {
                return Err(StegoError::InvalidLength {
                    declared,
                    available,
                });
            }

            Ok(bytes[header_len..header_len + declared].to_vec())
        }
    }
}
