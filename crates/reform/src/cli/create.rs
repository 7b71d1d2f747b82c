//! Bulk reform generation over the originals directory.
//!
//! Walks every original, generates any missing reform, and prints the
//! created / ignored / failed tallies. Errors on individual images are
//! recorded and the pass continues; the command only fails outright for
//! configuration errors.

use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use walkdir::WalkDir;

use reform_core::{Config, FsStore, GenerateOptions, GenerateReport, ImageRecord, ReformGenerator};

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Only consider originals whose file name contains this text
    #[arg(short, long)]
    pub contains: Option<String>,

    /// Suppress the progress bar
    #[arg(long)]
    pub no_progress: bool,
}

pub fn execute(args: CreateArgs, config: &Config) -> anyhow::Result<()> {
    // Configuration problems are fatal before any work starts
    let registry = config.build_registry()?;
    let media_root = config.media_root();
    let store = FsStore::new(&media_root);

    let originals = collect_originals(config, args.contains.as_deref());
    tracing::info!("Found {} original image(s)", originals.len());

    let generator = ReformGenerator::new(&registry, &store, config.reform_root());
    let options = GenerateOptions {
        allow: config.reform.filters.clone(),
    };

    let progress = if args.no_progress {
        ProgressBar::hidden()
    } else {
        let bar = ProgressBar::new(originals.len() as u64);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}",
            )?
            .progress_chars("#>-"),
        );
        bar
    };

    let mut report = GenerateReport::default();
    for src in &originals {
        let record = match ingest(config, &media_root, src) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("Skipping {:?}: {e}", src);
                report.failed.push(src.clone());
                progress.inc(1);
                continue;
            }
        };
        match generator.generate(&record, &options) {
            Ok(run) => report.merge(run),
            Err(e) => {
                tracing::warn!("Skipping {:?}: {e}", src);
                report.failed.push(src.clone());
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    println!("{report}");
    Ok(())
}

/// Originals under the upload directory, relative to the media root.
fn collect_originals(config: &Config, contains: Option<&str>) -> Vec<PathBuf> {
    let media_root = config.media_root();
    let originals_root = media_root.join(config.originals_dir());
    let mut files = Vec::new();
    for entry in WalkDir::new(&originals_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(needle) = contains {
            if !entry.file_name().to_string_lossy().contains(needle) {
                continue;
            }
        }
        if let Ok(relative) = entry.path().strip_prefix(&media_root) {
            files.push(relative.to_path_buf());
        }
    }
    files
}

/// Build a record for an existing original, capturing its dimensions.
fn ingest(
    config: &Config,
    media_root: &std::path::Path,
    src: &std::path::Path,
) -> anyhow::Result<ImageRecord> {
    let bytes = std::fs::read(media_root.join(src))?;
    Ok(ImageRecord::ingest(
        config.namespace.0.clone(),
        src,
        &bytes,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use reform_core::filters::{encode, OutputFormat};

    fn write_png(path: &std::path::Path, width: u32, height: u32) {
        let img = image_bytes(width, height);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, img).unwrap();
    }

    fn image_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::DynamicImage::ImageRgb8(image::RgbImage::new(width, height));
        encode(&img, OutputFormat::Png).unwrap()
    }

    fn config_for(dir: &std::path::Path) -> Config {
        let toml = format!(
            r#"
            namespace = "app"

            [storage]
            media_root = "{}"

            [[filter]]
            type = "resize_smart"
            name = "thumbnail"
            format = "jpeg"
            width = 16
            height = 16
            "#,
            dir.display()
        );
        toml::from_str(&toml).unwrap()
    }

    #[test]
    fn test_collect_originals_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("originals/sunset.png"), 8, 8);
        write_png(&dir.path().join("originals/pier.png"), 8, 8);

        let config = config_for(dir.path());
        let all = collect_originals(&config, None);
        assert_eq!(all.len(), 2);
        assert!(all.contains(&PathBuf::from("originals/pier.png")));

        let filtered = collect_originals(&config, Some("sunset"));
        assert_eq!(filtered, vec![PathBuf::from("originals/sunset.png")]);
    }

    #[test]
    fn test_execute_generates_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("originals/sunset.png"), 32, 32);
        let config = config_for(dir.path());

        let args = CreateArgs {
            contains: None,
            no_progress: true,
        };
        execute(args, &config).unwrap();
        assert!(dir.path().join("reforms/sunset.jpeg").exists());

        // second pass finds the reform present and writes nothing new
        let before = std::fs::metadata(dir.path().join("reforms/sunset.jpeg"))
            .unwrap()
            .modified()
            .unwrap();
        let args = CreateArgs {
            contains: None,
            no_progress: true,
        };
        execute(args, &config).unwrap();
        let after = std::fs::metadata(dir.path().join("reforms/sunset.jpeg"))
            .unwrap()
            .modified()
            .unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_execute_continues_past_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        write_png(&dir.path().join("originals/good.png"), 32, 32);
        std::fs::write(dir.path().join("originals/bad.txt"), b"not an image").unwrap();
        let config = config_for(dir.path());

        let args = CreateArgs {
            contains: None,
            no_progress: true,
        };
        execute(args, &config).unwrap();
        assert!(dir.path().join("reforms/good.jpeg").exists());
    }
}
