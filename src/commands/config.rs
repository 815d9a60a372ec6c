use crate::core::{
    config::{Author, Settings},
    error::Result,
    output::{print_section_header, print_success},
};
use colored::*;
use std::path::PathBuf;

pub fn execute_config_show() -> Result<()> {
    let settings = Settings::load_or_create()?;
    let unset = || "<not set>".bright_black().to_string();

    print_section_header("Settings");
    println!(
        "  {:<8} {}",
        "root".blue(),
        settings
            .root_dir
            .as_ref()
            .map(|path| path.display().to_string())
            .unwrap_or_else(unset)
    );
    println!(
        "  {:<8} {}",
        "remote".blue(),
        settings.remote_url.clone().unwrap_or_else(unset)
    );
    println!(
        "  {:<8} {}",
        "token".blue(),
        settings.masked_token().unwrap_or_else(unset)
    );
    println!(
        "  {:<8} {} <{}>",
        "author".blue(),
        settings.author.name,
        settings.author.email
    );
    println!();

    Ok(())
}

pub fn execute_config_set_root(path: PathBuf) -> Result<()> {
    let path = path.canonicalize()?;
    update(|settings| settings.root_dir = Some(path.clone()))?;
    print_success(&format!("Notes directory set to {}", path.display()));
    Ok(())
}

pub fn execute_config_set_remote(url: String) -> Result<()> {
    update(|settings| settings.remote_url = Some(url.clone()))?;
    print_success(&format!("Remote set to {url}"));
    Ok(())
}

pub fn execute_config_set_token(token: String) -> Result<()> {
    update(|settings| settings.token = Some(token.clone()))?;
    print_success("Token saved");
    Ok(())
}

pub fn execute_config_set_author(name: String, email: String) -> Result<()> {
    let author = Author { name, email };
    update(|settings| settings.author = author.clone())?;
    print_success(&format!("Author set to {} <{}>", author.name, author.email));
    Ok(())
}

fn update(change: impl FnOnce(&mut Settings)) -> Result<()> {
    let mut settings = Settings::load_or_create()?;
    change(&mut settings);
    settings.save()
}
