use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind,
};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use gameconf::build_info;
use gameconf::constants::LOG_FILE_NAME;
use gameconf::engine::{DisplayService, HeadlessEngine};
use gameconf::input::{ActionMap, InputBindings};
use gameconf::ui::{draw_settings_menu, SettingsMenu};
use gameconf::utils::persistence;
use gameconf::versioning;
use gameconf::{SettingsError, SettingsStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let command = args.get(1).map(String::as_str).unwrap_or("menu");

    match command {
        "--version" | "-v" => {
            println!("{}", build_info::version_line());
            return;
        }
        "--help" | "-h" => {
            print_help();
            return;
        }
        _ => {}
    }

    init_logging(command == "menu");

    let result = match command {
        "menu" => run_menu(),
        "path" => cmd_path(),
        "show" => cmd_show(),
        "reset" => cmd_reset(),
        "bind" => cmd_bind(&args[2..]),
        "unbind" => cmd_unbind(&args[2..]),
        "version" => cmd_version(&args[2..]),
        other => {
            eprintln!("Unknown command: {}", other);
            eprintln!("Run 'gameconf --help' for usage.");
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        error!("{} failed: {}", command, e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn print_help() {
    println!("gameconf - game settings and keybinds\n");
    println!("Usage: gameconf [command]\n");
    println!("Commands:");
    println!("  menu                          Open the settings menu (default)");
    println!("  path                          Print the settings file location");
    println!("  show                          Print the current settings file");
    println!("  reset                         Remove every keybind override");
    println!("  bind <action> <index> <path>  Override a binding, e.g. bind Jump 0 <Keyboard>/f");
    println!("  unbind <action>               Restore an action's default binding");
    println!("  version [dir]                 Print the bundle version for a project directory");
    println!("  --version                     Show build information");
    println!("  --help                        Show this help message");
    println!("\nSet GAMECONF_SETTINGS to use another settings file.");
}

/// The menu owns the terminal, so its log goes to a file in the data directory.
fn init_logging(to_file: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if to_file {
        let file = persistence::data_dir().and_then(|dir| {
            std::fs::create_dir_all(&dir)?;
            Ok(OpenOptions::new()
                .create(true)
                .append(true)
                .open(dir.join(LOG_FILE_NAME))?)
        });
        if let Ok(file) = file {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        return;
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Store plus the action map with the stored overrides applied.
fn open() -> Result<(SettingsStore, ActionMap, HeadlessEngine), SettingsError> {
    let mut engine = HeadlessEngine::with_common_modes();
    let mut store = SettingsStore::open_default()?.with_display(engine.current_resolution());
    let mut map = ActionMap::first_person_defaults();
    store.get_settings().apply_all(&mut engine);
    let applied = store.load_overrides(&mut map);
    info!(applied, "Loaded keybind overrides");
    Ok((store, map, engine))
}

fn cmd_path() -> Result<(), SettingsError> {
    println!("{}", persistence::default_settings_path()?.display());
    Ok(())
}

fn cmd_show() -> Result<(), SettingsError> {
    let (mut store, _, _) = open()?;
    print!("{}", persistence::to_xml(store.get_settings())?);
    Ok(())
}

fn cmd_reset() -> Result<(), SettingsError> {
    let (mut store, _, _) = open()?;
    store.reset_overrides();
    store.try_save()?;
    println!("All keybinds restored to defaults.");
    Ok(())
}

fn cmd_bind(args: &[String]) -> Result<(), SettingsError> {
    let [action, index, path] = args else {
        eprintln!("Usage: gameconf bind <action> <index> <path>");
        std::process::exit(1);
    };
    let index: usize = index.parse().map_err(|_| SettingsError::InvalidValue {
        field: "bindingIndex",
        reason: format!("'{}' is not a binding index", index),
    })?;

    let (mut store, mut map, _) = open()?;
    // rejects unknown actions and slots before anything is stored
    map.apply_binding_override(action, index, path)?;
    let added = store.add_override(action, index, path);
    store.try_save()?;
    println!(
        "{} [{}] -> {}",
        added.action_name, added.binding_index, added.binding_path
    );
    Ok(())
}

fn cmd_unbind(args: &[String]) -> Result<(), SettingsError> {
    let [action] = args else {
        eprintln!("Usage: gameconf unbind <action>");
        std::process::exit(1);
    };
    let (mut store, _, _) = open()?;
    match store.remove_override(action) {
        Some(removed) => {
            store.try_save()?;
            println!("{} restored to its default binding.", removed.action_name);
        }
        None => println!("{} has no override.", action),
    }
    Ok(())
}

fn cmd_version(args: &[String]) -> Result<(), SettingsError> {
    let dir = match args.first() {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    println!("{}", versioning::update_version(&dir)?);
    Ok(())
}

fn run_menu() -> Result<(), SettingsError> {
    let (mut store, mut map, mut engine) = open()?;
    let mut menu = SettingsMenu::new(&map, &mut store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    stdout.execute(EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = menu_loop(&mut terminal, &mut menu, &mut store, &mut map, &mut engine);

    disable_raw_mode()?;
    terminal.backend_mut().execute(DisableMouseCapture)?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    menu.detach(&mut store);
    store.on_quit();
    result
}

fn menu_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    menu: &mut SettingsMenu,
    store: &mut SettingsStore,
    map: &mut ActionMap,
    engine: &mut HeadlessEngine,
) -> Result<(), SettingsError> {
    while !menu.should_quit() {
        let settings = store.get_settings().clone();
        terminal.draw(|frame| draw_settings_menu(frame, menu, &settings))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    menu.handle_key(key, Instant::now(), store, map, engine)
                }
                Event::Mouse(mouse) => menu.handle_mouse(mouse, Instant::now()),
                _ => {}
            }
        }
        menu.tick(Instant::now(), store, map);
    }
    Ok(())
}
