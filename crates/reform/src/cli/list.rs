//! List reform files under the reform root.

use clap::Args;

use reform_core::Config;

use super::reform_files;

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only list reforms whose file name contains this text
    #[arg(short, long)]
    pub contains: Option<String>,
}

pub fn execute(args: ListArgs, config: &Config) -> anyhow::Result<()> {
    let media_root = config.media_root();
    let files = reform_files(&media_root, config.reform_root(), args.contains.as_deref());
    for path in &files {
        println!("{}", path.display());
    }
    tracing::debug!("{} reform file(s)", files.len());
    Ok(())
}
