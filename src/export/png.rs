//! PNG 编码器
//!
//! 把捕获的报告位图原样序列化为 PNG 字节流（单张长图，不分页）

use anyhow::Result;
use image::{DynamicImage, ImageOutputFormat};
use std::io::Cursor;

/// 位图 -> PNG 字节流
pub fn encode(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
        .map_err(|e| anyhow::anyhow!("PNG 编码失败: {}", e))?;
    Ok(bytes)
}
