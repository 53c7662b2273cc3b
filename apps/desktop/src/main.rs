use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{
    ClickTarget, Controller, HttpWordCloudService, Notification, Notifier, UiAction, ViewState,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

const HELP_TEXT: &str = "\
Commands:
  text <content>     replace the text to analyse
  import <file.txt>  load text from a plain-text file
  generate           build the word cloud from the current text
  add <word>         add a stopword and regenerate
  remove <word>      remove a stopword and regenerate
  save [dir]         download the cloud as wordcloud.png
  reset              clear text, results and stopwords
  theme              switch between light and dark
  show               print the current view
  help / close       open or close this help
  quit               leave";

#[derive(Parser, Debug)]
#[command(name = "wordcloud", about = "Interactive word-cloud client")]
struct Args {
    #[arg(long, env = "WORDCLOUD_SERVER_URL", default_value = "http://127.0.0.1:5000")]
    server_url: String,
    /// Directory that `save` writes into when no directory is given.
    #[arg(long, env = "WORDCLOUD_DOWNLOAD_DIR", default_value = ".")]
    download_dir: PathBuf,
}

/// Prints notifications the way a blocking alert would.
struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notification: Notification) {
        eprintln!("[{notification}]");
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Actions(Vec<UiAction>),
    Show,
    Quit,
}

fn parse_command(line: &str, download_dir: &Path) -> Result<Command, String> {
    let line = line.trim();
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    let actions = match verb.to_ascii_lowercase().as_str() {
        "" | "show" => return Ok(Command::Show),
        "quit" | "exit" => return Ok(Command::Quit),
        "text" => vec![UiAction::EditText(rest.to_string())],
        "import" if !rest.is_empty() => vec![UiAction::Import(PathBuf::from(rest))],
        "import" => return Err("usage: import <file.txt>".into()),
        "generate" => vec![UiAction::Generate],
        "add" => vec![UiAction::EditStopword(rest.to_string()), UiAction::AddStopword],
        "remove" if !rest.is_empty() => vec![UiAction::RemoveStopword(rest.to_string())],
        "remove" => return Err("usage: remove <word>".into()),
        "save" if rest.is_empty() => vec![UiAction::SaveImage(download_dir.to_path_buf())],
        "save" => vec![UiAction::SaveImage(PathBuf::from(rest))],
        "reset" => vec![UiAction::Reset],
        "theme" => vec![UiAction::ToggleTheme],
        "help" => vec![UiAction::OpenHelp],
        "close" => vec![UiAction::ClickHelp(ClickTarget::Backdrop)],
        other => return Err(format!("unknown command '{other}', type 'help'")),
    };
    Ok(Command::Actions(actions))
}

fn render_view(view: &ViewState) -> String {
    let mut out = String::new();
    out.push_str(&format!("theme: {}\n", view.theme.attribute()));

    let preview: String = view.text.chars().take(60).collect();
    if view.text.chars().count() > 60 {
        out.push_str(&format!("text: {preview}...\n"));
    } else {
        out.push_str(&format!("text: {preview}\n"));
    }

    if !view.frequencies.is_empty() {
        out.push_str("frequencies:\n");
        for row in view.frequency_rows() {
            out.push_str(&format!("  {row}\n"));
        }
    }
    if let Some(image) = &view.image {
        out.push_str(&format!("image: {} chars\n", image.len()));
    }
    if view.stopwords_visible {
        out.push_str(&format!("stopwords: [{}]\n", view.stopwords.join(", ")));
    }
    out.push_str(&format!(
        "save: {}\n",
        if view.save_enabled { "enabled" } else { "disabled" }
    ));
    if view.help_visible {
        out.push_str(HELP_TEXT);
        out.push('\n');
    }
    out
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let args = Args::parse();

    let service = HttpWordCloudService::new(args.server_url.as_str())
        .with_context(|| format!("cannot use server url '{}'", args.server_url))?;
    println!("Using server {}. Type 'help' for commands.", service.server_url());
    let mut controller = Controller::new(service, ConsoleNotifier);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let actions = match parse_command(&line, &args.download_dir) {
            Ok(Command::Quit) => break,
            Ok(Command::Show) => {
                print!("{}", render_view(controller.view()));
                continue;
            }
            Ok(Command::Actions(actions)) => actions,
            Err(usage) => {
                eprintln!("{usage}");
                continue;
            }
        };

        for action in actions {
            if let Err(error) = controller.dispatch(action).await {
                tracing::debug!(%error, "action failed");
                break;
            }
        }
        print!("{}", render_view(controller.view()));
    }
    Ok(())
}
