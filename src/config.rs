//! Injected configuration for the report generator.
//!
//! The image sets shown in the report are environment specific, so they live here instead of in
//! the composer. Values come from [`ReportConfig::default`], a JSON document, or environment
//! variables layered on top of the defaults.
//!
//! The default image sets are WebP files. The `image` decoder only handles lossy WebP, so
//! lossless or transparent WebP images are shown as placeholders; convert them to PNG or JPEG.

use std::path::{Path, PathBuf};

use ::config::{Config, Environment, File, FileFormat, Map};
use serde::Deserialize;

use crate::builder::PageLayout;
use crate::error::ReportError;

const ENV_PREFIX: &str = "PORTFOLIO";

/// Brand label drawn in the page header.
pub const DEFAULT_BRAND: &str = "BizzPulse Portfolio";

const DEFAULT_MAIN_IMAGES: &[&str] = &[
    "static/img/portfolio/portfolio-5.webp",
    "static/img/portfolio/portfolio-7.webp",
    "static/img/portfolio/portfolio-8.webp",
];

const DEFAULT_GALLERY_IMAGES: &[&str] = &[
    "static/img/portfolio/portfolio-4.webp",
    "static/img/portfolio/portfolio-6.webp",
    "static/img/portfolio/portfolio-11.webp",
    "static/img/portfolio/portfolio-12.webp",
];

/// Settings that influence how a report is composed and decorated.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReportConfig {
    /// Label drawn at the top-left of every page.
    pub brand: String,
    /// Directory that relative image paths are resolved against.
    pub image_root: Option<PathBuf>,
    /// Images stacked under "Project Screenshots".
    pub main_images: Vec<PathBuf>,
    /// Images laid out two per row under "Additional Screenshots".
    pub gallery_images: Vec<PathBuf>,
    /// Page margins and header/footer bands.
    pub layout: PageLayout,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            brand: DEFAULT_BRAND.to_owned(),
            image_root: None,
            main_images: DEFAULT_MAIN_IMAGES.iter().map(PathBuf::from).collect(),
            gallery_images: DEFAULT_GALLERY_IMAGES.iter().map(PathBuf::from).collect(),
            layout: PageLayout::default(),
        }
    }
}

impl ReportConfig {
    /// Loads the configuration from the defaults, an optional JSON file and `PORTFOLIO_*`
    /// environment variables, later sources overriding earlier ones.
    ///
    /// - `PORTFOLIO_BRAND` replaces the header label.
    /// - `PORTFOLIO_IMAGE_ROOT` sets the directory relative image paths are resolved against.
    /// - `PORTFOLIO_MAIN_IMAGES` and `PORTFOLIO_GALLERY_IMAGES` take comma-separated path lists.
    pub fn load(file: Option<&Path>) -> Result<Self, ReportError> {
        Self::load_with_env(file, None)
    }

    /// Defaults overridden by `PORTFOLIO_*` environment variables only.
    pub fn from_env() -> Result<Self, ReportError> {
        Self::load(None)
    }

    /// `env` replaces the process environment when set.
    fn load_with_env(
        file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ReportError> {
        let mut builder = Config::builder();
        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Json));
        }
        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .ignore_empty(true)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("main_images")
                .with_list_parse_key("gallery_images")
                .source(env),
        );

        let mut config: Self = builder.build()?.try_deserialize()?;
        drop_blank_entries(&mut config.main_images);
        drop_blank_entries(&mut config.gallery_images);
        Ok(config)
    }

    /// Sets the image root and returns the updated configuration.
    pub fn with_image_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.image_root = Some(root.into());
        self
    }

    /// Replaces the main image set and returns the updated configuration.
    pub fn with_main_images<I, P>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.main_images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Replaces the gallery image set and returns the updated configuration.
    pub fn with_gallery_images<I, P>(mut self, images: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.gallery_images = images.into_iter().map(Into::into).collect();
        self
    }

    /// Resolves an image path against [`ReportConfig::image_root`].
    pub fn resolve_image(&self, path: &Path) -> PathBuf {
        match &self.image_root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Main image paths after resolution.
    pub fn main_image_paths(&self) -> Vec<PathBuf> {
        self.main_images
            .iter()
            .map(|path| self.resolve_image(path))
            .collect()
    }

    /// Gallery image paths after resolution.
    pub fn gallery_image_paths(&self) -> Vec<PathBuf> {
        self.gallery_images
            .iter()
            .map(|path| self.resolve_image(path))
            .collect()
    }
}

// list entries arrive untrimmed from the environment
fn drop_blank_entries(paths: &mut Vec<PathBuf>) {
    *paths = paths
        .iter()
        .filter_map(|path| path.to_str().map(str::trim))
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_stock_image_sets() {
        let config = ReportConfig::default();
        assert_eq!(config.brand, DEFAULT_BRAND);
        assert_eq!(config.main_images.len(), 3);
        assert_eq!(config.gallery_images.len(), 4);
        assert_eq!(
            config.gallery_images[2],
            PathBuf::from("static/img/portfolio/portfolio-11.webp")
        );
    }

    #[test]
    fn relative_paths_resolve_against_image_root() {
        let config = ReportConfig::default().with_image_root("/srv/site");
        let paths = config.main_image_paths();
        assert_eq!(
            paths[0],
            PathBuf::from("/srv/site/static/img/portfolio/portfolio-5.webp")
        );
    }

    #[test]
    fn absolute_paths_ignore_image_root() {
        let config = ReportConfig::default()
            .with_image_root("/srv/site")
            .with_gallery_images(["/tmp/shot.png"]);
        assert_eq!(
            config.gallery_image_paths(),
            vec![PathBuf::from("/tmp/shot.png")]
        );
    }

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn environment_lists_skip_blank_entries() {
        let config = ReportConfig::load_with_env(
            None,
            env(&[
                ("PORTFOLIO_MAIN_IMAGES", " a.png, ,b.png ,"),
                ("PORTFOLIO_BRAND", "Studio Nine"),
                ("PORTFOLIO_IMAGE_ROOT", "/srv/site"),
            ]),
        )
        .expect("config loads");

        assert_eq!(
            config.main_images,
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
        assert_eq!(config.brand, "Studio Nine");
        assert_eq!(config.image_root, Some(PathBuf::from("/srv/site")));
        assert_eq!(config.gallery_images.len(), 4);
    }

    #[test]
    fn empty_environment_keeps_defaults() {
        let config = ReportConfig::load_with_env(None, env(&[("PORTFOLIO_BRAND", "")]))
            .expect("config loads");
        assert_eq!(config, ReportConfig::default());
    }

    #[test]
    fn environment_overrides_the_config_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("report.json");
        std::fs::write(
            &path,
            r#"{ "brand": "From File", "gallery_images": ["one.png"], "layout": { "side_margin": 36.0 } }"#,
        )
        .expect("write config");

        let config = ReportConfig::load_with_env(
            Some(&path),
            env(&[("PORTFOLIO_BRAND", "From Env")]),
        )
        .expect("config loads");

        assert_eq!(config.brand, "From Env");
        assert_eq!(config.gallery_images, vec![PathBuf::from("one.png")]);
        assert_eq!(config.layout.side_margin, 36.0);
        assert_eq!(config.main_images.len(), 3);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = ReportConfig::load_with_env(
            Some(Path::new("/__portfolio_report_missing__.json")),
            env(&[]),
        );
        assert!(matches!(result, Err(ReportError::Config(_))));
    }

    #[test]
    fn json_overrides_keep_missing_defaults() {
        let config: ReportConfig =
            serde_json::from_str(r#"{ "brand": "Acme" }"#).expect("config parses");
        assert_eq!(config.brand, "Acme");
        assert_eq!(config.main_images.len(), 3);
        assert_eq!(config.layout, PageLayout::default());
    }

    #[test]
    fn json_can_override_page_geometry() {
        let config: ReportConfig =
            serde_json::from_str(r#"{ "layout": { "side_margin": 36.0 } }"#).expect("config parses");
        assert_eq!(config.layout.side_margin, 36.0);
        assert_eq!(config.layout.content_top, 80.0);
    }
}
