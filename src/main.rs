use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use promptr::app::{App, TITLE_PREVIEW_CHARS};
use promptr::clipboard::{CLEAR_DELAY, ClearTimer, create_backend};
use promptr::dispatch::{self, DRAIN_INTERVAL, DispatchHandle};
use promptr::logging::init_logger;
use promptr::models::{Language, SearchIndex};
use promptr::notices::Notice;
use promptr::pins::{MAX_PINNED, PinFlow, PinRequest};
use promptr::storage::{DOCUMENT_FILE, JsonDocumentStorage, document_path, ensure_directories};
use promptr::store::{PromptStore, StoreError};

#[derive(Parser)]
#[command(name = "promptr")]
#[command(about = "Prompt library with pinned favorites and clipboard copy", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a prompt (content from the argument or stdin)
    Add {
        title: String,
        /// Prompt content; read from stdin when omitted
        content: Option<String>,
    },

    /// List prompts
    List {
        /// Show pinned prompts only
        #[arg(short, long)]
        pinned: bool,
    },

    /// Print a prompt's full content
    Show { index: usize },

    /// Replace a prompt's title and content
    Update {
        index: usize,
        title: String,
        /// New content; read from stdin when omitted
        content: Option<String>,
    },

    /// Delete a prompt
    Delete { index: usize },

    /// Toggle a prompt's pin
    Pin { index: usize },

    /// Fuzzy-search prompt titles and content
    Search { query: String },

    /// Copy a prompt's content to the clipboard
    Copy {
        index: usize,
        /// Keep the process alive until the timed clear fires
        #[arg(long)]
        hold: bool,
    },

    /// Append prompts from a JSON file
    Import { path: PathBuf },

    /// Write the whole document to a JSON file
    Export { path: PathBuf },

    /// Toggle the display language
    Language,

    /// Toggle the display theme
    Theme,

    /// Show store statistics
    Stats,

    /// Start the interactive shell
    Run,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // The interactive shell installs its own file logger; one-shot
    // commands log to stderr
    if !matches!(cli.command, None | Some(Commands::Run)) {
        env_logger::init();
    }

    match cli.command {
        None | Some(Commands::Run) => cmd_run(),
        Some(Commands::Add { title, content }) => cmd_add(title, content),
        Some(Commands::List { pinned }) => cmd_list(pinned),
        Some(Commands::Show { index }) => cmd_show(index),
        Some(Commands::Update {
            index,
            title,
            content,
        }) => cmd_update(index, title, content),
        Some(Commands::Delete { index }) => cmd_delete(index),
        Some(Commands::Pin { index }) => cmd_pin(index),
        Some(Commands::Search { query }) => cmd_search(query),
        Some(Commands::Copy { index, hold }) => cmd_copy(index, hold),
        Some(Commands::Import { path }) => cmd_import(path),
        Some(Commands::Export { path }) => cmd_export(path),
        Some(Commands::Language) => cmd_language(),
        Some(Commands::Theme) => cmd_theme(),
        Some(Commands::Stats) => cmd_stats(),
    }
}

/// Open the store at the default location and load it
fn open_store() -> Result<PromptStore> {
    let path = document_path()?;
    let mut store = PromptStore::new(Box::new(JsonDocumentStorage::new(path)));
    store.load().context("Failed to load prompt store")?;
    Ok(store)
}

/// Read prompt content from stdin
fn read_stdin() -> Result<String> {
    let mut buffer = String::new();
    io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read from stdin")?;
    Ok(buffer.trim_end_matches('\n').to_string())
}

/// Add a prompt to the store
fn cmd_add(title: String, content: Option<String>) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None => read_stdin()?,
    };

    let mut store = open_store()?;
    let index = store.add(title, content)?;
    println!("Added prompt {}", index);
    Ok(())
}

/// List prompts with pin markers
fn cmd_list(pinned_only: bool) -> Result<()> {
    let store = open_store()?;

    let mut shown = 0;
    for (index, prompt) in store.prompts().iter().enumerate() {
        if pinned_only && !prompt.pinned {
            continue;
        }
        let pin_mark = if prompt.pinned { " 📌" } else { "   " };
        println!("{:3}.{} {}", index, pin_mark, prompt.preview(60));
        shown += 1;
    }

    if shown == 0 {
        println!("(no prompts)");
    }
    Ok(())
}

/// Print a prompt's full content
fn cmd_show(index: usize) -> Result<()> {
    let store = open_store()?;
    let prompt = store
        .get(index)
        .with_context(|| format!("No prompt at index {}", index))?;
    println!("{}", prompt.content);
    Ok(())
}

/// Replace a prompt's title and content
fn cmd_update(index: usize, title: String, content: Option<String>) -> Result<()> {
    let content = match content {
        Some(content) => content,
        None => read_stdin()?,
    };

    let mut store = open_store()?;
    store.update(index, title, content, None)?;
    println!("Updated prompt {}", index);
    Ok(())
}

/// Delete a prompt
fn cmd_delete(index: usize) -> Result<()> {
    let mut store = open_store()?;
    if store.delete(index)? {
        println!("Deleted prompt {}", index);
    } else {
        println!("No prompt at index {}", index);
    }
    Ok(())
}

/// Toggle a prompt's pin, asking for a replacement at the ceiling
fn cmd_pin(index: usize) -> Result<()> {
    let mut store = open_store()?;
    let mut flow = PinFlow::new();

    match flow.request_toggle(&mut store, index)? {
        PinRequest::Toggled { pinned } => {
            let verb = if pinned { "Pinned" } else { "Unpinned" };
            println!("{} prompt {}", verb, index);
        }
        PinRequest::Ignored => println!("No prompt at index {}", index),
        PinRequest::NeedsReplacement(candidates) => {
            println!("Pin limit ({}) reached. Unpin which prompt?", MAX_PINNED);
            for candidate in &candidates {
                println!("{:3}. {}", candidate.index, candidate.title);
            }
            print!("Choice (empty cancels): ");
            io::stdout().flush()?;

            let mut line = String::new();
            io::stdin().read_line(&mut line)?;
            match line.trim().parse::<usize>() {
                Ok(chosen) => {
                    flow.commit(&mut store, chosen)?;
                    println!("Unpinned prompt {}, pinned prompt {}", chosen, index);
                }
                Err(_) => {
                    flow.cancel();
                    println!("Cancelled");
                }
            }
        }
    }
    Ok(())
}

/// Fuzzy-search titles and content
fn cmd_search(query: String) -> Result<()> {
    let store = open_store()?;
    let mut index = SearchIndex::new();

    let matches = index.search(store.prompts(), &query);
    if matches.is_empty() {
        println!("(no matches)");
        return Ok(());
    }

    for (i, _score) in matches {
        if let Some(prompt) = store.get(i) {
            let pin_mark = if prompt.pinned { " 📌" } else { "   " };
            println!("{:3}.{} {}", i, pin_mark, prompt.preview(60));
        }
    }
    Ok(())
}

/// Copy a prompt's content to the clipboard
fn cmd_copy(index: usize, hold: bool) -> Result<()> {
    let store = open_store()?;
    let prompt = store
        .get(index)
        .with_context(|| format!("No prompt at index {}", index))?;

    let mut backend = create_backend()?;
    backend.write_text(&prompt.content)?;
    println!("Copied \"{}\"", prompt.preview(TITLE_PREVIEW_CHARS));

    if hold {
        let (notice_tx, notice_rx) = mpsc::channel();
        let timer = ClearTimer::spawn(create_backend()?, notice_tx);
        timer.arm(CLEAR_DELAY);
        println!("Clearing clipboard in {} seconds...", CLEAR_DELAY.as_secs());

        while let Ok(notice) = notice_rx.recv() {
            if notice == Notice::ClipboardCleared {
                println!("Clipboard cleared");
                break;
            }
        }
    }
    Ok(())
}

/// Import prompts from a JSON file
fn cmd_import(path: PathBuf) -> Result<()> {
    let mut store = open_store()?;
    let count = store.import_from(&path)?;
    println!("Imported {} prompts from {:?}", count, path);
    Ok(())
}

/// Export the document to a JSON file
fn cmd_export(path: PathBuf) -> Result<()> {
    let store = open_store()?;
    store.export_to(&path)?;
    println!("Exported {} prompts to {:?}", store.len(), path);
    Ok(())
}

/// Toggle the display language
fn cmd_language() -> Result<()> {
    let mut store = open_store()?;
    let language = store.switch_language()?;
    println!("Language: {}", language.as_str());
    Ok(())
}

/// Toggle the display theme
fn cmd_theme() -> Result<()> {
    let mut store = open_store()?;
    let theme = store.switch_theme()?;
    println!("Theme: {}", theme.as_str());
    Ok(())
}

/// Show store statistics
fn cmd_stats() -> Result<()> {
    let store = open_store()?;

    println!("Prompt Store Statistics");
    println!("=======================");
    println!("Prompts: {}", store.len());
    println!("Pinned: {} / {}", store.pinned_count(), MAX_PINNED);
    println!(
        "Content bytes: {} / {}",
        store.content_bytes(),
        store.limits().max_document_bytes
    );
    println!("Language: {}", store.settings().language.as_str());
    println!("Theme: {}", store.settings().theme.as_str());
    println!("Document: {:?}", store.path());
    Ok(())
}

/// Start the interactive shell
///
/// Stdin lines and document watcher events are produced on their own
/// threads and funnel through the dispatch queue; the loop below is the
/// only context that ever touches the store.
fn cmd_run() -> Result<()> {
    let data_dir = ensure_directories()?;

    let (flash_tx, flash_rx) = mpsc::channel();
    init_logger(data_dir.join("promptr.log"), Some(flash_tx), "info", "warn")?;

    let document = data_dir.join(DOCUMENT_FILE);
    log::info!("Starting shell, document {:?}", document);

    let mut store = PromptStore::new(Box::new(JsonDocumentStorage::new(document.clone())));
    if let Err(e) = store.load() {
        println!("{}", error_text(store.settings().language, &e));
    }

    let (notice_tx, notice_rx) = mpsc::channel();
    let timer = ClearTimer::spawn(create_backend()?, notice_tx.clone());
    let mut app = App::new(store, create_backend()?, timer, CLEAR_DELAY, notice_tx);

    let (handle, queue) = dispatch::channel::<App>();
    spawn_stdin_reader(handle.clone());
    let _watcher = spawn_document_watcher(&data_dir, handle)?;

    println!("promptr shell. Type 'help' for commands.");
    print_prompt_list(&app);

    loop {
        queue.drain(&mut app);

        while let Ok(notice) = notice_rx.try_recv() {
            println!("{}", notice_text(app.store().settings().language, &notice));
        }
        while let Ok(flash) = flash_rx.try_recv() {
            eprintln!("[{}] {}", flash.level, flash.message);
        }

        if app.should_quit() {
            break;
        }
        thread::sleep(DRAIN_INTERVAL);
    }

    app.shutdown();
    println!("Bye");
    Ok(())
}

/// Forward stdin lines to the owning loop
fn spawn_stdin_reader(handle: DispatchHandle<App>) {
    thread::spawn(move || {
        for line in io::stdin().lines().map_while(Result::ok) {
            if !handle.enqueue(move |app| shell_handle_line(app, &line)) {
                return;
            }
        }
        // Stdin closed; ask the loop to exit
        let _ = handle.enqueue(|app| app.request_quit());
    });
}

/// Watch the data directory and reload the store on document changes
fn spawn_document_watcher(
    data_dir: &Path,
    handle: DispatchHandle<App>,
) -> Result<RecommendedWatcher> {
    let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
        match res {
            Ok(event) => {
                let document_changed = matches!(
                    event.kind,
                    notify::EventKind::Modify(_) | notify::EventKind::Create(_)
                ) && event.paths.iter().any(|p| p.ends_with(DOCUMENT_FILE));
                if document_changed {
                    let _ = handle.enqueue(|app| app.reload());
                }
            }
            Err(e) => log::warn!("Document watcher error: {}", e),
        }
    })
    .context("Failed to create document watcher")?;

    // Watch the directory instead of the specific file
    // This handles writers that do atomic writes (create temp, rename)
    watcher
        .watch(data_dir, RecursiveMode::NonRecursive)
        .with_context(|| format!("Failed to watch data directory {:?}", data_dir))?;

    log::debug!("Watching data directory: {:?}", data_dir);
    Ok(watcher)
}

/// Parse and run one shell line against the coordinator
fn shell_handle_line(app: &mut App, line: &str) {
    let line = line.trim();

    // A pending replacement choice intercepts the next line
    if app.awaiting_replacement() {
        handle_replacement_choice(app, line);
        return;
    }

    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "" => {}
        "help" | "h" | "?" => print_help(),
        "list" | "ls" => {
            app.reload();
            print_prompt_list(app);
        }
        "show" => shell_show(app, rest),
        "add" => shell_add(app, rest),
        "update" => shell_update(app, rest),
        "delete" | "del" => shell_delete(app, rest),
        "pin" | "p" => shell_pin(app, rest),
        "copy" | "c" => shell_copy(app, rest),
        "search" | "s" => shell_search(app, rest),
        "import" => shell_import(app, rest),
        "export" => shell_export(app, rest),
        "lang" => {
            if let Err(e) = app.switch_language() {
                print_error(app, &e);
            }
        }
        "theme" => {
            if let Err(e) = app.switch_theme() {
                print_error(app, &e);
            }
        }
        "stats" => print_stats(app),
        "reload" => {
            app.reload();
            println!("Reloaded");
        }
        "quit" | "q" | "exit" => app.request_quit(),
        _ => println!("Unknown command {:?}. Type 'help' for commands.", command),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  list                   Show all prompts");
    println!("  show INDEX             Print a prompt in full");
    println!("  add TITLE :: CONTENT   Add a prompt");
    println!("  update INDEX TITLE :: CONTENT");
    println!("  delete INDEX           Delete a prompt");
    println!("  pin INDEX              Toggle a pin (max {})", MAX_PINNED);
    println!("  copy INDEX             Copy to the clipboard (timed clear)");
    println!("  search QUERY           Fuzzy-search prompts");
    println!("  import PATH            Append prompts from a JSON file");
    println!("  export PATH            Write the document to a JSON file");
    println!("  lang / theme           Toggle language / theme");
    println!("  stats                  Show store statistics");
    println!("  reload                 Re-read the document from disk");
    println!("  quit                   Exit");
}

fn print_prompt_list(app: &App) {
    if app.store().is_empty() {
        println!("(no prompts)");
        return;
    }
    for index in 0..app.store().len() {
        print_prompt_line(app, index);
    }
}

fn print_prompt_line(app: &App, index: usize) {
    if let Some(prompt) = app.store().get(index) {
        let pin_mark = if prompt.pinned { " 📌" } else { "   " };
        println!("{:3}.{} {}", index, pin_mark, prompt.preview(60));
    }
}

fn print_stats(app: &App) {
    let store = app.store();
    println!(
        "{} prompts, {} pinned, {} content bytes",
        store.len(),
        store.pinned_count(),
        store.content_bytes()
    );
}

fn print_error(app: &App, error: &StoreError) {
    println!("{}", error_text(app.store().settings().language, error));
}

fn shell_show(app: &App, rest: &str) {
    let Ok(index) = rest.parse::<usize>() else {
        println!("Usage: show INDEX");
        return;
    };
    match app.store().get(index) {
        Some(prompt) => {
            println!("# {}", prompt.title);
            println!("{}", prompt.content);
        }
        None => println!("No prompt at index {}", index),
    }
}

fn shell_add(app: &mut App, rest: &str) {
    let Some((title, content)) = rest.split_once("::") else {
        println!("Usage: add TITLE :: CONTENT");
        return;
    };
    match app.store_mut().add(title.trim(), content.trim()) {
        Ok(index) => println!("Added prompt {}", index),
        Err(e) => print_error(app, &e),
    }
}

fn shell_update(app: &mut App, rest: &str) {
    let usage = || println!("Usage: update INDEX TITLE :: CONTENT");
    let Some((index, edit)) = rest.split_once(' ') else {
        usage();
        return;
    };
    let Ok(index) = index.parse::<usize>() else {
        usage();
        return;
    };
    let Some((title, content)) = edit.split_once("::") else {
        usage();
        return;
    };
    match app.store_mut().update(index, title.trim(), content.trim(), None) {
        Ok(()) => println!("Updated prompt {}", index),
        Err(e) => print_error(app, &e),
    }
}

fn shell_delete(app: &mut App, rest: &str) {
    let Ok(index) = rest.parse::<usize>() else {
        println!("Usage: delete INDEX");
        return;
    };
    match app.store_mut().delete(index) {
        Ok(true) => println!("Deleted prompt {}", index),
        Ok(false) => println!("No prompt at index {}", index),
        Err(e) => print_error(app, &e),
    }
}

fn shell_pin(app: &mut App, rest: &str) {
    let Ok(index) = rest.parse::<usize>() else {
        println!("Usage: pin INDEX");
        return;
    };
    match app.request_pin(index) {
        Ok(PinRequest::Toggled { pinned }) => {
            let verb = if pinned { "Pinned" } else { "Unpinned" };
            println!("{} prompt {}", verb, index);
        }
        Ok(PinRequest::Ignored) => println!("No prompt at index {}", index),
        Ok(PinRequest::NeedsReplacement(candidates)) => {
            println!(
                "Pin limit ({}) reached. Reply with an index to unpin, or an empty line to cancel:",
                MAX_PINNED
            );
            for candidate in &candidates {
                println!("{:3}. {}", candidate.index, candidate.title);
            }
        }
        Err(e) => print_error(app, &e),
    }
}

fn handle_replacement_choice(app: &mut App, line: &str) {
    match line.parse::<usize>() {
        Ok(chosen) => {
            if let Err(e) = app.commit_replacement(chosen) {
                print_error(app, &e);
            } else {
                println!("Replaced");
            }
        }
        // Anything that is not an index cancels the flow
        Err(_) => {
            app.cancel_replacement();
            println!("Cancelled");
        }
    }
}

fn shell_copy(app: &mut App, rest: &str) {
    match rest.parse::<usize>() {
        Ok(index) => app.copy(index),
        Err(_) => println!("Usage: copy INDEX"),
    }
}

fn shell_search(app: &mut App, query: &str) {
    if query.is_empty() {
        println!("Usage: search QUERY");
        return;
    }
    let matches = app.search(query);
    if matches.is_empty() {
        println!("(no matches)");
        return;
    }
    for (index, _score) in matches {
        print_prompt_line(app, index);
    }
}

fn shell_import(app: &mut App, rest: &str) {
    if rest.is_empty() {
        println!("Usage: import PATH");
        return;
    }
    if let Err(e) = app.import_from(Path::new(rest)) {
        print_error(app, &e);
    }
}

fn shell_export(app: &mut App, rest: &str) {
    if rest.is_empty() {
        println!("Usage: export PATH");
        return;
    }
    if let Err(e) = app.export_to(Path::new(rest)) {
        print_error(app, &e);
    }
}

/// Map a notice to display text in the configured language
fn notice_text(language: Language, notice: &Notice) -> String {
    match language {
        Language::En => match notice {
            Notice::Copied { title } => format!(
                "Copied \"{}\", clipboard clears in {}s",
                title,
                CLEAR_DELAY.as_secs()
            ),
            Notice::ClipboardCleared => "Clipboard cleared".to_string(),
            Notice::Imported { count } => format!("Imported {} prompts", count),
            Notice::Exported => "Export complete".to_string(),
            Notice::LanguageSwitched(language) => format!("Language: {}", language.as_str()),
            Notice::ThemeSwitched(theme) => format!("Theme: {}", theme.as_str()),
        },
        Language::Zh => match notice {
            Notice::Copied { title } => format!(
                "已复制 \"{}\"，剪贴板将在 {} 秒后清空",
                title,
                CLEAR_DELAY.as_secs()
            ),
            Notice::ClipboardCleared => "剪贴板已清空".to_string(),
            Notice::Imported { count } => format!("已导入 {} 条提示词", count),
            Notice::Exported => "导出完成".to_string(),
            Notice::LanguageSwitched(language) => format!("语言: {}", language.as_str()),
            Notice::ThemeSwitched(theme) => format!("主题: {}", theme.as_str()),
        },
    }
}

/// Map a store error to display text in the configured language
fn error_text(language: Language, error: &StoreError) -> String {
    match language {
        Language::En => format!("Error: {}", error),
        Language::Zh => {
            let text = match error.key() {
                "load_error" => "读取提示词文件失败",
                "save_error" => "保存提示词文件失败",
                "file_too_large" => "提示词库超出大小上限",
                "prompt_too_large" => "提示词内容超出大小上限",
                "invalid_format" => "导入文件格式无效",
                "index_out_of_range" => "序号超出范围",
                "export_failed" => "导出失败",
                _ => "操作失败",
            };
            format!("错误: {}", text)
        }
    }
}
