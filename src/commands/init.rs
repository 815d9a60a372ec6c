use crate::core::{
    config::Settings,
    error::Result,
    git::Git2Backend,
    output::{print_info, print_success},
};
use std::path::PathBuf;

/// Initialize (or adopt) a notes repository and remember it as the notes directory
pub fn execute_init(path: Option<PathBuf>) -> Result<()> {
    let mut settings = Settings::load_or_create()?;

    let target = match path.or_else(|| settings.root_dir.clone()) {
        Some(path) => path,
        None => std::env::current_dir()?,
    };
    std::fs::create_dir_all(&target)?;
    let target = target.canonicalize()?;

    let backend = Git2Backend::init(&target)?;
    settings.root_dir = Some(backend.workdir().to_path_buf());
    settings.save()?;

    print_success(&format!(
        "Notes repository ready at {}",
        backend.workdir().display()
    ));
    if settings.remote_url.is_none() {
        print_info("Set a remote with 'notegit config set-remote <url>' to push and pull.");
    }

    Ok(())
}
