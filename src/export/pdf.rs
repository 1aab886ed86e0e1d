//! PDF 编码器
//!
//! 把捕获的报告位图编码成 A4 纵向的多页 PDF。
//! 图片按页面宽度等比缩放；超过一页高度时分页：每一页都放置
//! 完整图片，纵向偏移逐页上移一个页高，页面边界裁掉可见区域
//! 之外的部分，从而把一张长图切成连续的页高切片。

use anyhow::Result;
use image::DynamicImage;
use printpdf::{
    ColorBits, ColorSpace, Image, ImageTransform, ImageXObject, Mm, PdfDocument, Px,
};
use tracing::debug;

use crate::models::PageFormat;

/// 分页时的浮点容差（毫米）
///
/// 缩放高度恰好等于整数页时，避免浮点残差多出一张空白页
const PAGE_EPSILON_MM: f64 = 1e-6;

/// 分页布局：位图到页面几何的换算结果
#[derive(Debug, Clone, PartialEq)]
pub struct PdfLayout {
    /// 页面宽度（毫米）
    pub page_width_mm: f64,
    /// 页面高度（毫米）
    pub page_height_mm: f64,
    /// 图片显示宽度（毫米，等于页面宽度）
    pub image_width_mm: f64,
    /// 图片显示高度（毫米，按宽度等比缩放）
    pub image_height_mm: f64,
    /// 总页数 = ceil(图片显示高度 / 页面高度)
    pub page_count: usize,
    /// 像素到页面宽度换算出的有效 DPI
    pub dpi: f64,
}

impl PdfLayout {
    /// 第 `page` 页上图片的纵向平移量（毫米，PDF 坐标系原点在左下）
    ///
    /// 第0页图片顶边对齐页面顶边，之后每页整体上移一个页高
    pub fn translate_y_mm(&self, page: usize) -> f64 {
        self.page_height_mm - self.image_height_mm + page as f64 * self.page_height_mm
    }

    /// 第 `page` 页实际可见的图片纵向区间（毫米，从图片顶边起算）
    ///
    /// 用于校验切片无缝覆盖整张图片
    pub fn visible_band_mm(&self, page: usize) -> (f64, f64) {
        let top = page as f64 * self.page_height_mm;
        let bottom = ((page + 1) as f64 * self.page_height_mm).min(self.image_height_mm);
        (top, bottom)
    }
}

/// 计算位图在指定页面规格下的分页布局
pub fn paginate(width_px: u32, height_px: u32, format: PageFormat) -> Result<PdfLayout> {
    if width_px == 0 || height_px == 0 {
        anyhow::bail!("位图尺寸为零，无法分页: {}x{}", width_px, height_px);
    }

    let (page_width_mm, page_height_mm) = format.dimensions_mm();
    let image_width_mm = page_width_mm;
    let image_height_mm = page_width_mm * height_px as f64 / width_px as f64;
    let page_count = ((image_height_mm - PAGE_EPSILON_MM) / page_height_mm)
        .ceil()
        .max(1.0) as usize;
    let dpi = width_px as f64 * 25.4 / page_width_mm;

    Ok(PdfLayout {
        page_width_mm,
        page_height_mm,
        image_width_mm,
        image_height_mm,
        page_count,
        dpi,
    })
}

/// 把位图编码为分页 PDF 字节流
pub fn encode(img: &DynamicImage, format: PageFormat) -> Result<Vec<u8>> {
    let layout = paginate(img.width(), img.height(), format)?;
    debug!(
        "PDF 分页布局: {}x{}px -> {:.1}mm 高, {} 页",
        img.width(),
        img.height(),
        layout.image_height_mm,
        layout.page_count
    );

    // PDF 图片对象使用无 alpha 的 RGB8
    let rgb = img.to_rgb8();

    let (doc, first_page, first_layer) = PdfDocument::new(
        "Work Performance Report",
        Mm(layout.page_width_mm as f32),
        Mm(layout.page_height_mm as f32),
        "report",
    );

    for page in 0..layout.page_count {
        let layer = if page == 0 {
            doc.get_page(first_page).get_layer(first_layer)
        } else {
            let (page_index, layer_index) = doc.add_page(
                Mm(layout.page_width_mm as f32),
                Mm(layout.page_height_mm as f32),
                "report",
            );
            doc.get_page(page_index).get_layer(layer_index)
        };

        let xobject = ImageXObject {
            width: Px(img.width() as usize),
            height: Px(img.height() as usize),
            color_space: ColorSpace::Rgb,
            bits_per_component: ColorBits::Bit8,
            interpolate: true,
            image_data: rgb.as_raw().clone(),
            image_filter: None,
            smask: None,
            clipping_bbox: None,
        };

        Image::from(xobject).add_to_layer(
            layer,
            ImageTransform {
                translate_x: Some(Mm(0.0)),
                translate_y: Some(Mm(layout.translate_y_mm(page) as f32)),
                rotate: None,
                scale_x: None,
                scale_y: None,
                dpi: Some(layout.dpi as f32),
            },
        );
    }

    doc.save_to_bytes()
        .map_err(|e| anyhow::anyhow!("PDF 序列化失败: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_single_page_when_image_fits() {
        // 1000x500px -> 210mm x 105mm，单页
        let layout = paginate(1000, 500, PageFormat::A4).unwrap();
        assert_eq!(layout.page_count, 1);
        assert!((layout.image_height_mm - 105.0).abs() < 1e-9);
    }

    #[test]
    fn test_page_count_is_ceiling() {
        // 1000x4000px -> 840mm 高, 840/297 = 2.83 -> 3 页
        let layout = paginate(1000, 4000, PageFormat::A4).unwrap();
        assert_eq!(layout.page_count, 3);
    }

    #[test]
    fn test_exact_page_multiple_no_blank_page() {
        // 2100px 宽时 1px = 0.1mm；5940px 高 = 594mm = 恰好2页
        let layout = paginate(2100, 5940, PageFormat::A4).unwrap();
        assert_eq!(layout.page_count, 2);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(paginate(0, 100, PageFormat::A4).is_err());
        assert!(paginate(100, 0, PageFormat::A4).is_err());
    }

    #[test]
    fn test_slices_tile_image_without_gap_or_overlap() {
        let layout = paginate(1000, 4321, PageFormat::A4).unwrap();
        let mut covered = 0.0;
        for page in 0..layout.page_count {
            let (top, bottom) = layout.visible_band_mm(page);
            // 每页切片紧接上一页结束的位置
            assert!((top - covered).abs() < 1e-9);
            assert!(bottom > top);
            covered = bottom;
        }
        // 全部切片拼起来正好是整张图片的高度
        assert!((covered - layout.image_height_mm).abs() < 1e-9);
    }

    #[test]
    fn test_last_page_not_cropped_short() {
        let layout = paginate(1000, 4000, PageFormat::A4).unwrap();
        // 倒数第二页结束时仍有剩余，最后一页结束时剩余 <= 0
        let before_last = (layout.page_count - 1) as f64 * layout.page_height_mm;
        assert!(layout.image_height_mm - before_last > 0.0);
        let after_last = layout.page_count as f64 * layout.page_height_mm;
        assert!(layout.image_height_mm - after_last <= PAGE_EPSILON_MM);
    }

    #[test]
    fn test_translate_y_shifts_one_page_per_page() {
        let layout = paginate(1000, 4000, PageFormat::A4).unwrap();
        let step = layout.translate_y_mm(1) - layout.translate_y_mm(0);
        assert!((step - layout.page_height_mm).abs() < 1e-9);
        // 第0页图片顶边与页面顶边对齐
        let top_of_image = layout.translate_y_mm(0) + layout.image_height_mm;
        assert!((top_of_image - layout.page_height_mm).abs() < 1e-9);
    }

    #[test]
    fn test_encode_produces_pdf_bytes() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            200,
            800,
            image::Rgba([240, 240, 240, 255]),
        ));
        let bytes = encode(&img, PageFormat::A4).unwrap();
        // PDF 魔数
        assert!(bytes.starts_with(b"%PDF"));
    }
}
