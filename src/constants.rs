/// 每个像素中用于隐写的颜色通道数 (R, G, B)。
/// Alpha 通道即使存在也不会写入任何数据。
pub const CHANNELS_PER_PIXEL: usize = 3;

/// 每个字节的位数。
pub const BITS_PER_BYTE: usize = 8;

/// 分隔符模式下标记数据结束的字节。
pub const DELIMITER: u8 = 0x00;

/// 长度前缀模式下，长度头部所占的位数。
/// 长度以 `u32` 大端序存储，因此需要 32 个颜色通道。
pub const LENGTH_HEADER_BITS: usize = 32;

/// PDF 页面字典 (或文档 Info 字典) 中保存脚本内容的键名。
pub const PDF_METADATA_KEY: &[u8] = b"ScriptData";
