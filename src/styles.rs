//! Named paragraph styles used throughout the portfolio report.

use genpdf::style::{Color, Style};

use crate::model::HorizontalAlignment;

/// Primary brand colour (#2c5aa0).
pub const BRAND_COLOR: Color = Color::Rgb(0x2c, 0x5a, 0xa0);
/// Secondary brand colour (#1f4788).
pub const SECONDARY_BRAND_COLOR: Color = Color::Rgb(0x1f, 0x47, 0x88);

const DEFAULT_LINE_SPACING: f64 = 1.2;

/// Identifies one entry of the [`StyleSet`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleName {
    Title,
    Subtitle,
    Body,
    FeatureBullet,
}

/// Typographic settings of a single paragraph style.
///
/// Sizes and spacing are stored in points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParagraphStyle {
    pub font_size: u8,
    pub line_spacing: f64,
    pub space_before: f64,
    pub space_after: f64,
    pub left_indent: f64,
    pub alignment: HorizontalAlignment,
    pub color: Option<Color>,
    pub bold: bool,
}

impl ParagraphStyle {
    /// Converts the style to the `genpdf` text style used for rendering.
    pub fn text_style(&self) -> Style {
        let mut style = Style::new()
            .with_font_size(self.font_size)
            .with_line_spacing(self.line_spacing);
        if let Some(color) = self.color {
            style.set_color(color);
        }
        if self.bold {
            style.set_bold();
        }
        style
    }
}

/// Immutable lookup table from [`StyleName`] to [`ParagraphStyle`].
#[derive(Clone, Debug, PartialEq)]
pub struct StyleSet {
    title: ParagraphStyle,
    subtitle: ParagraphStyle,
    body: ParagraphStyle,
    feature_bullet: ParagraphStyle,
}

impl StyleSet {
    pub fn new() -> Self {
        Self {
            title: ParagraphStyle {
                font_size: 24,
                line_spacing: DEFAULT_LINE_SPACING,
                space_before: 0.0,
                space_after: 30.0,
                left_indent: 0.0,
                alignment: HorizontalAlignment::Center,
                color: Some(BRAND_COLOR),
                bold: true,
            },
            subtitle: ParagraphStyle {
                font_size: 16,
                line_spacing: DEFAULT_LINE_SPACING,
                space_before: 0.0,
                space_after: 20.0,
                left_indent: 0.0,
                alignment: HorizontalAlignment::Left,
                color: Some(SECONDARY_BRAND_COLOR),
                bold: true,
            },
            body: ParagraphStyle {
                font_size: 11,
                // 14pt leading on 11pt text
                line_spacing: 14.0 / 11.0,
                space_before: 0.0,
                space_after: 12.0,
                left_indent: 0.0,
                alignment: HorizontalAlignment::Justified,
                color: None,
                bold: false,
            },
            feature_bullet: ParagraphStyle {
                font_size: 10,
                line_spacing: DEFAULT_LINE_SPACING,
                space_before: 0.0,
                space_after: 8.0,
                left_indent: 20.0,
                alignment: HorizontalAlignment::Left,
                color: None,
                bold: false,
            },
        }
    }

    /// Returns the style registered under `name`.
    pub fn get(&self, name: StyleName) -> &ParagraphStyle {
        match name {
            StyleName::Title => &self.title,
            StyleName::Subtitle => &self.subtitle,
            StyleName::Body => &self.body,
            StyleName::FeatureBullet => &self.feature_bullet,
        }
    }
}

impl Default for StyleSet {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_large_centered_brand_text() {
        let styles = StyleSet::new();
        let title = styles.get(StyleName::Title);
        assert_eq!(title.font_size, 24);
        assert_eq!(title.alignment, HorizontalAlignment::Center);
        assert_eq!(title.color, Some(BRAND_COLOR));

        let text = title.text_style();
        assert!(text.is_bold());
        assert_eq!(text.color(), Some(BRAND_COLOR));
    }

    #[test]
    fn feature_bullets_are_small_and_indented() {
        let styles = StyleSet::new();
        let bullet = styles.get(StyleName::FeatureBullet);
        assert!(bullet.font_size < styles.get(StyleName::Body).font_size);
        assert!(bullet.left_indent > 0.0);
    }

    #[test]
    fn style_set_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StyleSet>();
    }
}
