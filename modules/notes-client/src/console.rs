//! Line commands and rendering for the `notes-console` binary.

use crate::manager::NoteManager;
use notes_types::Category;
use std::fmt::Write;
use std::path::PathBuf;

pub const HELP: &str = "\
Commands:
  add <text>            create a note
  edit <id> <text>      replace a note's content
  archive <id>          archive a note
  delete <id>           delete a note
  list                  show notes in the current view
  archived              toggle between active and archived notes
  filter <category>     filter by category (again to clear, or 'filter all')
  export [dir]          write the summary report
  wipe                  clear the server collection and reload
  help                  show this help
  quit                  save pending changes and exit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(String),
    Edit { id: String, content: String },
    Archive(String),
    Delete(String),
    List,
    ToggleArchived,
    /// `None` clears the category filter
    Filter(Option<Category>),
    Export(Option<PathBuf>),
    Wipe,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_command(line: &str) -> Result<Option<Command>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let command = match verb.to_lowercase().as_str() {
        "add" => Command::Add(rest.to_string()),
        "edit" => {
            let Some((id, content)) = rest.split_once(char::is_whitespace) else {
                return Err("usage: edit <id> <text>".to_string());
            };
            Command::Edit {
                id: id.to_string(),
                content: content.trim().to_string(),
            }
        }
        "archive" => Command::Archive(required_id(rest, "archive")?),
        "delete" | "rm" => Command::Delete(required_id(rest, "delete")?),
        "list" | "ls" => Command::List,
        "archived" => Command::ToggleArchived,
        "filter" => match rest {
            "" => return Err("usage: filter <category|all>".to_string()),
            r if r.eq_ignore_ascii_case("all") => Command::Filter(None),
            r => Command::Filter(Some(r.parse()?)),
        },
        "export" => Command::Export((!rest.is_empty()).then(|| PathBuf::from(rest))),
        "wipe" => Command::Wipe,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(format!("unknown command: {}", other)),
    };

    Ok(Some(command))
}

fn required_id(rest: &str, verb: &str) -> Result<String, String> {
    if rest.is_empty() {
        return Err(format!("usage: {} <id>", verb));
    }
    Ok(rest.to_string())
}

/// Render the manager's current view
pub fn render_view(manager: &NoteManager) -> String {
    let filter = manager.filter();
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} notes ({} active, {} archived) | view: {} | category: {}",
        manager.notes().len(),
        manager.active_count(),
        manager.archived_count(),
        if filter.show_archived { "archived" } else { "active" },
        filter.category.map(|c| c.as_str()).unwrap_or("All"),
    );

    let chips: Vec<String> = manager
        .category_counts()
        .into_iter()
        .map(|(category, count)| format!("{} ({})", category, count))
        .collect();
    if !chips.is_empty() {
        let _ = writeln!(out, "categories: {}", chips.join(", "));
    }

    let visible = manager.visible_notes();
    if visible.is_empty() {
        out.push_str("  (no notes)\n");
    }
    for note in visible {
        let _ = writeln!(
            out,
            "  [{}] {} | {} | {}",
            note.id,
            note.category,
            note.timestamp.format("%Y-%m-%d %H:%M"),
            note.content
        );
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(
            parse_command("add Klarna checkout flow").unwrap(),
            Some(Command::Add("Klarna checkout flow".to_string()))
        );
        assert_eq!(
            parse_command("edit 1714557600000   Bank app flow ").unwrap(),
            Some(Command::Edit {
                id: "1714557600000".to_string(),
                content: "Bank app flow".to_string(),
            })
        );
        assert_eq!(
            parse_command("ARCHIVE 42").unwrap(),
            Some(Command::Archive("42".to_string()))
        );
        assert_eq!(parse_command("rm 42").unwrap(), Some(Command::Delete("42".to_string())));
        assert_eq!(parse_command("list").unwrap(), Some(Command::List));
        assert_eq!(parse_command("export").unwrap(), Some(Command::Export(None)));
        assert_eq!(
            parse_command("export /tmp/out").unwrap(),
            Some(Command::Export(Some(PathBuf::from("/tmp/out"))))
        );
        assert_eq!(parse_command("   ").unwrap(), None);
    }

    #[test]
    fn test_parse_filter() {
        assert_eq!(
            parse_command("filter Deposit & Flexible").unwrap(),
            Some(Command::Filter(Some(Category::DepositFlexible)))
        );
        assert_eq!(parse_command("filter ALL").unwrap(), Some(Command::Filter(None)));
        assert!(parse_command("filter Crypto").is_err());
        assert!(parse_command("filter").is_err());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_command("edit 42").is_err());
        assert!(parse_command("archive").is_err());
        assert!(parse_command("frobnicate").is_err());
    }
}
