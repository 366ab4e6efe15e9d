//! Font loading for report rendering.
//!
//! `genpdf` embeds a TrueType family into every document. The family is searched in this order:
//!
//! 1. `PORTFOLIO_FONTS_DIR`, `assets/fonts` next to the executable, `assets/fonts` in the crate
//!    (expects the `Roboto-{Regular,Bold,Italic,BoldItalic}.ttf` files);
//! 2. system fallbacks: Arial from the Windows font directory, then Liberation Sans or DejaVu Sans
//!    from the usual Linux font directories.

use std::env;
use std::io;
use std::path::{Path, PathBuf};

use genpdf::error::{Error, ErrorKind};
use genpdf::fonts::{self, FontData, FontFamily};
use log::{debug, warn};

/// Name of the bundled font family.
pub const DEFAULT_FONT_FAMILY_NAME: &str = "Roboto";

const FONT_FILES: &[&str] = &[
    "Roboto-Regular.ttf",
    "Roboto-Bold.ttf",
    "Roboto-Italic.ttf",
    "Roboto-BoldItalic.ttf",
];

/// Font family installed with the operating system.
struct SystemFontFamily {
    name: &'static str,
    regular: &'static str,
    bold: &'static str,
    italic: &'static str,
    bold_italic: &'static str,
}

const WINDOWS_FALLBACK: SystemFontFamily = SystemFontFamily {
    name: "Arial",
    regular: "arial.ttf",
    bold: "arialbd.ttf",
    italic: "ariali.ttf",
    bold_italic: "arialbi.ttf",
};

const LINUX_FALLBACK: SystemFontFamily = SystemFontFamily {
    name: "Liberation Sans",
    regular: "LiberationSans-Regular.ttf",
    bold: "LiberationSans-Bold.ttf",
    italic: "LiberationSans-Italic.ttf",
    bold_italic: "LiberationSans-BoldItalic.ttf",
};

const DEJAVU_FALLBACK: SystemFontFamily = SystemFontFamily {
    name: "DejaVu Sans",
    regular: "DejaVuSans.ttf",
    bold: "DejaVuSans-Bold.ttf",
    italic: "DejaVuSans-Oblique.ttf",
    bold_italic: "DejaVuSans-BoldOblique.ttf",
};

const LINUX_FONT_DIRECTORIES: &[&str] = &[
    "/usr/share/fonts/truetype/liberation",
    "/usr/share/fonts/truetype/liberation2",
    "/usr/share/fonts/liberation-sans",
    "/usr/share/fonts/liberation",
    "/usr/share/fonts/truetype/dejavu",
    "/usr/share/fonts/dejavu",
    "/usr/share/fonts/TTF",
];

/// Directory holding the fonts shipped with the crate sources.
pub fn bundled_fonts_source_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts")
}

fn font_directory_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(path) = env_path("PORTFOLIO_FONTS_DIR") {
        candidates.push(path);
    }

    if let Ok(current_exe) = env::current_exe() {
        if let Some(bin_dir) = current_exe.parent() {
            let candidate = bin_dir.join("assets/fonts");
            if !candidates.iter().any(|existing| existing == &candidate) {
                candidates.push(candidate);
            }
        }
    }

    let manifest_candidate = bundled_fonts_source_dir();
    if !candidates
        .iter()
        .any(|existing| existing == &manifest_candidate)
    {
        candidates.push(manifest_candidate);
    }

    candidates
}

fn missing_font_files(path: &Path) -> Vec<PathBuf> {
    FONT_FILES
        .iter()
        .map(|name| path.join(name))
        .filter(|candidate| !candidate.is_file())
        .collect()
}

fn resolve_font_directory() -> Result<PathBuf, Error> {
    let mut attempts = Vec::new();

    for candidate in font_directory_candidates() {
        let exists = candidate.is_dir();
        let missing = missing_font_files(&candidate);

        if exists && missing.is_empty() {
            return Ok(candidate);
        }

        let reason = if !exists {
            format!("directory missing at {}", candidate.display())
        } else {
            let missing_list = missing
                .iter()
                .map(|path| path.file_name().unwrap_or_default().to_string_lossy())
                .collect::<Vec<_>>()
                .join(", ");
            format!("missing files [{}]", missing_list)
        };

        attempts.push(format!("{} ({})", candidate.display(), reason));
    }

    let summary = if attempts.is_empty() {
        "no search paths were available".to_owned()
    } else {
        attempts.join(", ")
    };

    Err(Error::new(
        format!(
            "Unable to locate bundled font directory. Checked: {}. Set PORTFOLIO_FONTS_DIR to a directory with the Roboto family.",
            summary
        ),
        io::Error::new(io::ErrorKind::NotFound, "bundled fonts directory not found"),
    ))
}

fn load_bundled_font_family() -> Result<FontFamily<FontData>, Error> {
    let directory = resolve_font_directory()?;

    fonts::from_files(&directory, DEFAULT_FONT_FAMILY_NAME, None).map_err(|err| {
        Error::new(
            format!(
                "Failed to load default font family '{}' from {}: {}",
                DEFAULT_FONT_FAMILY_NAME,
                directory.display(),
                err
            ),
            io::Error::new(io::ErrorKind::Other, err.to_string()),
        )
    })
}

fn env_path(var: &str) -> Option<PathBuf> {
    env::var_os(var).and_then(|value| {
        let path = PathBuf::from(value);
        if path.as_os_str().is_empty() {
            None
        } else {
            Some(path)
        }
    })
}

fn windows_font_directory() -> Option<PathBuf> {
    if let Some(path) = env_path("PORTFOLIO_WINDOWS_FONTS_DIR") {
        return Some(path);
    }

    #[cfg(windows)]
    {
        for var in ["WINDIR", "SystemRoot"] {
            if let Some(root) = env_path(var) {
                let candidate = root.join("Fonts");
                if candidate.is_dir() {
                    return Some(candidate);
                }
            }
        }
    }

    None
}

fn linux_font_directory(family: &SystemFontFamily) -> Option<PathBuf> {
    LINUX_FONT_DIRECTORIES
        .iter()
        .map(PathBuf::from)
        .find(|directory| directory.join(family.regular).is_file())
}

fn load_system_font(directory: &Path, file: &str, style: &str) -> Result<FontData, Error> {
    let path = directory.join(file);
    FontData::load(&path, None).map_err(|err| {
        let io_kind = if path.is_file() {
            io::ErrorKind::Other
        } else {
            io::ErrorKind::NotFound
        };
        Error::new(
            format!(
                "Failed to load fallback {} font at {}: {}",
                style,
                path.display(),
                err
            ),
            io::Error::new(io_kind, err.to_string()),
        )
    })
}

fn load_system_family(
    directory: &Path,
    family: &SystemFontFamily,
) -> Result<FontFamily<FontData>, Error> {
    Ok(FontFamily {
        regular: load_system_font(directory, family.regular, "regular")?,
        bold: load_system_font(directory, family.bold, "bold")?,
        italic: load_system_font(directory, family.italic, "italic")?,
        bold_italic: load_system_font(directory, family.bold_italic, "bold italic")?,
    })
}

fn system_fallback_font_family() -> Result<(FontFamily<FontData>, &'static str), Error> {
    let candidates = [
        (windows_font_directory(), &WINDOWS_FALLBACK),
        (linux_font_directory(&LINUX_FALLBACK), &LINUX_FALLBACK),
        (linux_font_directory(&DEJAVU_FALLBACK), &DEJAVU_FALLBACK),
    ];

    let mut failures = Vec::new();
    for (directory, family) in candidates {
        let Some(directory) = directory else {
            failures.push(format!("{}: font directory not found", family.name));
            continue;
        };
        match load_system_family(&directory, family) {
            Ok(loaded) => return Ok((loaded, family.name)),
            Err(err) => failures.push(format!("{}: {}", family.name, err)),
        }
    }

    Err(Error::new(
        format!("No system fallback font family available ({})", failures.join("; ")),
        io::Error::new(io::ErrorKind::NotFound, "system fonts not found"),
    ))
}

fn fonts_missing(err: &Error) -> bool {
    matches!(
        err.kind(),
        ErrorKind::IoError(io_err)
            if io_err.kind() == io::ErrorKind::NotFound
                || io_err.kind() == io::ErrorKind::PermissionDenied
    )
}

/// Returns the bundled Roboto font family if available and falls back to a system family when
/// the bundled fonts are missing.
pub fn default_font_family() -> Result<FontFamily<FontData>, Error> {
    match load_bundled_font_family() {
        Ok(family) => {
            debug!("Loaded bundled '{}' font family", DEFAULT_FONT_FAMILY_NAME);
            Ok(family)
        }
        Err(err) if fonts_missing(&err) => match system_fallback_font_family() {
            Ok((fallback, name)) => {
                warn!(
                    "Bundled fonts unavailable ({}); falling back to system '{}' family.",
                    err, name
                );
                Ok(fallback)
            }
            Err(fallback_err) => {
                warn!(
                    "Bundled fonts unavailable ({}); system fallback failed: {}",
                    err, fallback_err
                );
                Err(Error::new(
                    format!(
                        "Bundled fonts unavailable and system fallback failed: {}",
                        fallback_err
                    ),
                    io::Error::new(io::ErrorKind::NotFound, "default fonts are not available"),
                ))
            }
        },
        Err(err) => Err(err),
    }
}

/// Indicates whether any font family usable for rendering can be found.
pub fn default_fonts_available() -> bool {
    resolve_font_directory().is_ok()
        || windows_font_directory()
            .map(|directory| directory.join(WINDOWS_FALLBACK.regular).is_file())
            .unwrap_or(false)
        || linux_font_directory(&LINUX_FALLBACK).is_some()
        || linux_font_directory(&DEJAVU_FALLBACK).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_directory_is_always_a_candidate() {
        let candidates = font_directory_candidates();
        assert!(candidates.contains(&bundled_fonts_source_dir()));
    }

    #[test]
    fn missing_directory_reports_every_font_file() {
        let missing = missing_font_files(Path::new("/__portfolio_report_no_fonts__"));
        assert_eq!(missing.len(), FONT_FILES.len());
    }

    #[test]
    fn linux_fallbacks_are_looked_up_per_family() {
        for family in [&LINUX_FALLBACK, &DEJAVU_FALLBACK] {
            if let Some(directory) = linux_font_directory(family) {
                assert!(directory.join(family.regular).is_file());
            }
        }
    }

    #[test]
    fn not_found_errors_count_as_missing_fonts() {
        let err = Error::new(
            "fonts gone",
            io::Error::new(io::ErrorKind::NotFound, "not found"),
        );
        assert!(fonts_missing(&err));

        let other = Error::new("bad font", ErrorKind::InvalidFont);
        assert!(!fonts_missing(&other));
    }
}
