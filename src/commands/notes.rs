use crate::core::{
    config::Settings,
    error::Result,
    notes::NoteStore,
    output::{print_info, print_success},
};
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

fn open_store() -> Result<NoteStore> {
    let settings = Settings::load_or_create()?;
    Ok(NoteStore::new(settings.require_root_dir()?))
}

pub async fn execute_notes_list() -> Result<()> {
    let notes = open_store()?.list().await?;
    if notes.is_empty() {
        print_info("No notes yet");
        return Ok(());
    }
    for note in notes {
        println!("{}", note.display());
    }
    Ok(())
}

pub async fn execute_notes_read(path: PathBuf) -> Result<()> {
    let content = open_store()?.read(&path).await?;
    print!("{content}");
    Ok(())
}

/// Replace a note with the markdown read from stdin
pub async fn execute_notes_write(path: PathBuf) -> Result<()> {
    let store = open_store()?;
    let mut content = String::new();
    tokio::io::stdin().read_to_string(&mut content).await?;
    store.write(&path, &content).await?;
    print_success(&format!("Saved {}", path.display()));
    Ok(())
}

pub async fn execute_notes_new(path: PathBuf) -> Result<()> {
    open_store()?.create(&path).await?;
    print_success(&format!("Created {}", path.display()));
    Ok(())
}

pub async fn execute_notes_remove(path: PathBuf) -> Result<()> {
    open_store()?.delete(&path).await?;
    print_success(&format!("Deleted {}", path.display()));
    Ok(())
}

pub async fn execute_notes_move(from: PathBuf, to: PathBuf) -> Result<()> {
    open_store()?.rename(&from, &to).await?;
    print_success(&format!("Moved {} to {}", from.display(), to.display()));
    Ok(())
}
