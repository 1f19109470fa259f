//! # Transcript Export
//!
//! Writes the current chat to `~/.jarvis/transcripts/` as a standalone HTML
//! document built from the already-sanitized message fragments.
//!
//! Writes go through a `.tmp` file and `rename()` so a crash never leaves a
//! half-written transcript behind.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use log::info;

use crate::core::conversation::Role;
use crate::core::state::App;
use crate::render::RenderedMessage;

const STYLE: &str = "body{background:#0a0f1a;color:#cfe8ff;font-family:sans-serif;\
max-width:860px;margin:2em auto}.message{margin:1em 0;padding:.6em 1em;border-radius:8px}\
.user{background:#12324a}.bot{background:#111c2a;border:1px solid #1f7ab8}\
.chat-image{max-width:320px;border-radius:6px}pre{background:#050a12;padding:.8em;\
overflow-x:auto}.language-label{font-size:.75em;opacity:.7}.copy-btn{display:none}";

/// Returns `~/.jarvis/transcripts/`, creating it if needed.
pub fn transcripts_dir() -> io::Result<PathBuf> {
    let home = dirs::home_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no home directory"))?;
    let dir = home.join(".jarvis").join("transcripts");
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

pub fn transcript_document<'a>(
    messages: impl IntoIterator<Item = &'a RenderedMessage>,
    exported_at: DateTime<Local>,
) -> String {
    let mut body = String::new();
    for message in messages {
        let class = match message.role {
            Role::User => "user",
            Role::Assistant => "bot",
        };
        body.push_str(&format!(
            "<div class=\"message {class}\">{}</div>\n",
            message.html
        ));
    }

    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
         <title>J.A.R.V.I.S. transcript {stamp}</title>\n<style>{STYLE}</style>\n</head>\n\
         <body>\n{body}</body>\n</html>\n",
        stamp = exported_at.format("%Y-%m-%d %H:%M")
    )
}

/// Write the transcript into `dir`. Returns `Ok(None)` when there is nothing to export.
pub fn export_to(dir: &Path, app: &App, now: DateTime<Local>) -> io::Result<Option<PathBuf>> {
    if app.rendered_messages().next().is_none() {
        return Ok(None);
    }

    let path = dir.join(format!("jarvis-{}.html", now.format("%Y%m%d-%H%M%S")));
    let tmp_path = path.with_extension("tmp");
    fs::write(&tmp_path, transcript_document(app.rendered_messages(), now))?;
    fs::rename(&tmp_path, &path)?;

    info!("Transcript exported to {}", path.display());
    Ok(Some(path))
}

pub fn export_current(app: &App) -> io::Result<Option<PathBuf>> {
    export_to(&transcripts_dir()?, app, Local::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn document_tags_each_message_by_role() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hello <there>".into()));

        let doc = transcript_document(app.rendered_messages(), fixed_time());
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("<title>J.A.R.V.I.S. transcript 2026-03-14 09:26</title>"));
        assert!(doc.contains("<div class=\"message user\">"));
        assert!(doc.contains("hello &lt;there&gt;"));
    }

    #[test]
    fn empty_chat_is_not_exported() {
        let app = test_app();
        let dir = std::env::temp_dir();
        assert!(export_to(&dir, &app, fixed_time()).unwrap().is_none());
    }

    #[test]
    fn export_writes_a_timestamped_file() {
        let mut app = test_app();
        update(&mut app, Action::Submit("status report".into()));

        let dir = std::env::temp_dir().join(format!("jarvis-export-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();

        let path = export_to(&dir, &app, fixed_time()).unwrap().unwrap();
        assert_eq!(path.file_name().unwrap(), "jarvis-20260314-092653.html");
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.contains("status report"));
        assert!(!dir.join("jarvis-20260314-092653.tmp").exists());

        fs::remove_dir_all(&dir).unwrap();
    }
}
