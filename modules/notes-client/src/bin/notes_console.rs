//! Notes Console: line-driven front end for the notes widget.
//!
//! Loads the collection from the notes service, applies commands read from
//! stdin and lets the manager push changes back after each quiet period.

use notes_client::console::{self, Command};
use notes_client::summary::export_file_name;
use notes_client::{ClientConfig, HttpNoteSync, NoteManager, NoteSync};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = ClientConfig::from_env();
    let sync = Arc::new(HttpNoteSync::new(&config.api_url));

    if !sync.health().await.unwrap_or(false) {
        log::warn!("[SYNC] Notes service at {} is not responding", config.api_url);
    }

    let mut manager = NoteManager::load(sync.clone(), config.manager_config()).await;
    println!("{}", console::HELP);
    print!("{}", console::render_view(&manager));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::error!("Failed to read stdin: {}", e);
                break;
            }
        };

        let command = match console::parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        match command {
            Command::Add(text) => match manager.create(text) {
                Some(id) => println!("created {}", id),
                None => println!("nothing to add"),
            },
            Command::Edit { id, content } => {
                if !manager.begin_edit(&id) {
                    println!("no note {}", id);
                    continue;
                }
                manager.set_edit_content(content);
                if !manager.save_edit() {
                    manager.cancel_edit();
                    println!("edit rejected: content is blank");
                }
            }
            Command::Archive(id) => {
                if !manager.archive(&id) {
                    println!("no active note {}", id);
                }
            }
            Command::Delete(id) => {
                if !manager.delete(&id) {
                    println!("no note {}", id);
                }
            }
            Command::List => {}
            Command::ToggleArchived => manager.toggle_archived_view(),
            Command::Filter(Some(category)) => manager.select_category(category),
            Command::Filter(None) => manager.clear_category_filter(),
            Command::Export(dir) => {
                let summary = manager.export();
                let dir = dir.unwrap_or_else(|| PathBuf::from("."));
                let path = dir.join(export_file_name(chrono::Local::now().date_naive()));
                match tokio::fs::write(&path, summary.report.as_bytes()).await {
                    Ok(()) => println!("{}\nwrote {}", summary.narrative, path.display()),
                    Err(e) => log::error!("Failed to write export {}: {}", path.display(), e),
                }
                continue;
            }
            Command::Wipe => {
                // A pending push would otherwise land after the clear
                if let Err(e) = manager.flush().await {
                    log::error!("[SYNC] Error saving notes: {}", e);
                }
                if let Err(e) = sync.clear_all().await {
                    log::error!("[SYNC] Error deleting notes: {}", e);
                }
                manager = NoteManager::load(sync.clone(), config.manager_config()).await;
            }
            Command::Help => {
                println!("{}", console::HELP);
                continue;
            }
            Command::Quit => break,
        }

        print!("{}", console::render_view(&manager));
    }

    if let Err(e) = manager.flush().await {
        log::error!("[SYNC] Error saving notes on exit: {}", e);
    }
}
