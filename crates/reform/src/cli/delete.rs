//! Bulk deletion of reform files.
//!
//! Walks the reform root (flat files and filter subdirectories alike),
//! deletes what matches, and prints the count. A file that vanishes
//! between listing and deletion is skipped, not an error.

use clap::Args;

use reform_core::{BlobStore, Config, FsStore};

use super::reform_files;

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Only delete reforms whose file name contains this text
    #[arg(short, long)]
    pub contains: Option<String>,
}

pub fn execute(args: DeleteArgs, config: &Config) -> anyhow::Result<()> {
    let media_root = config.media_root();
    let store = FsStore::new(&media_root);

    let targets = reform_files(&media_root, config.reform_root(), args.contains.as_deref());

    let mut count = 0usize;
    for path in &targets {
        match store.delete(path) {
            Ok(true) => count += 1,
            Ok(false) => {} // vanished since listing
            Err(e) => tracing::warn!("Failed to delete {:?}: {e}", path),
        }
    }

    println!("{count} reform(s) deleted");
    Ok(())
}
