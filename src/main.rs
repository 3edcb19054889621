use anyhow::{anyhow, Context, Result};
use clap::{crate_version, App as ClapApp, AppSettings, Arg, ArgMatches, SubCommand};
use sitenav::app::{Action, App, AppState, Content};
use sitenav::nav::{self, NavigationModel};
use sitenav::state::{JsonStore, MemoryStore, SelectionStore};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let matches = ClapApp::new("sitenav")
        .version(crate_version!())
        .about("Browse and preview the posts and collections of a static site project")
        .setting(AppSettings::SubcommandRequiredElseHelp)
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .long("verbose")
                .multiple(true)
                .global(true)
                .help("Log more (repeat for more detail); RUST_LOG overrides"),
        )
        .arg(
            Arg::with_name("state")
                .long("state")
                .takes_value(true)
                .value_name("FILE")
                .global(true)
                .help("The file in which the selected directory is remembered"),
        )
        .subcommand(
            SubCommand::with_name("open")
                .about("Selects a site directory, remembers it, and lists it")
                .arg(Arg::with_name("DIRECTORY").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("nav")
                .about("Lists the collections and posts of a site")
                .arg(
                    Arg::with_name("DIRECTORY")
                        .index(1)
                        .help("Defaults to the remembered directory"),
                )
                .arg(
                    Arg::with_name("json")
                        .long("json")
                        .help("Prints the navigation as JSON"),
                ),
        )
        .subcommand(
            SubCommand::with_name("show")
                .about("Renders a post to HTML")
                .arg(Arg::with_name("POST").required(true).index(1)),
        )
        .subcommand(
            SubCommand::with_name("settings")
                .about("Shows the site configuration file")
                .arg(
                    Arg::with_name("DIRECTORY")
                        .index(1)
                        .help("Defaults to the remembered directory"),
                ),
        )
        .get_matches();

    let (_, sub) = matches.subcommand();
    init_logging(
        sub.map_or(0, |m| m.occurrences_of("verbose")).max(matches.occurrences_of("verbose")),
    );

    match matches.subcommand() {
        ("open", Some(m)) => {
            let mut app = App::start(store(&matches, m)?);
            let directory = directory_arg(m).ok_or_else(|| anyhow!("missing DIRECTORY"))?;
            let state = app.dispatch(Action::SelectDirectory(Some(directory)));
            print_notice(state);
            print_navigation(&state.navigation);
            Ok(())
        }
        ("nav", Some(m)) => {
            let navigation = match directory_arg(m) {
                Some(directory) => {
                    let (navigation, err) = nav::build_or_fallback(&directory);
                    if let Some(err) = err {
                        eprintln!("{}", err);
                    }
                    navigation
                }
                None => {
                    let app = App::start(store(&matches, m)?);
                    remembered(app.state())?;
                    print_notice(app.state());
                    app.state().navigation.clone()
                }
            };
            if m.is_present("json") {
                println!("{}", serde_json::to_string_pretty(&navigation)?);
            } else {
                print_navigation(&navigation);
            }
            Ok(())
        }
        ("show", Some(m)) => {
            let post = m
                .value_of_os("POST")
                .map(PathBuf::from)
                .ok_or_else(|| anyhow!("missing POST"))?;
            let html = sitenav::markdown::render(&post)?;
            print!("{}", html);
            Ok(())
        }
        ("settings", Some(m)) => {
            let html = match directory_arg(m) {
                Some(directory) => {
                    let mut app = App::start(MemoryStore::default());
                    app.dispatch(Action::SelectDirectory(Some(directory)));
                    settings(app)?
                }
                None => settings(App::start(store(&matches, m)?))?,
            };
            print!("{}", html);
            Ok(())
        }
        _ => Ok(()),
    }
}

fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

// Global flags may appear before or after the subcommand.
fn store(matches: &ArgMatches, sub: &ArgMatches) -> Result<JsonStore> {
    match sub.value_of_os("state").or_else(|| matches.value_of_os("state")) {
        Some(path) => Ok(JsonStore::new(PathBuf::from(path))),
        None => JsonStore::at_default_location()
            .ok_or_else(|| anyhow!("no config directory; pass --state FILE")),
    }
}

fn directory_arg(matches: &ArgMatches) -> Option<PathBuf> {
    matches.value_of_os("DIRECTORY").map(PathBuf::from)
}

fn remembered(state: &AppState) -> Result<&Path> {
    state
        .directory
        .as_deref()
        .context("no site directory remembered; run `sitenav open DIRECTORY` first")
}

// The site configuration of the app's directory as HTML.
fn settings<S: SelectionStore>(mut app: App<S>) -> Result<String> {
    remembered(app.state())?;
    match &app.dispatch(Action::OpenSiteSettings).content {
        Content::Html(html) => Ok(html.clone()),
        Content::Error(err) => Err(anyhow!("{}", err)),
        Content::Empty => Ok(String::new()),
    }
}

fn print_notice(state: &AppState) {
    if let Some(notice) = &state.notice {
        eprintln!("{}", notice);
    }
}

fn print_navigation(navigation: &NavigationModel) {
    println!("{}", navigation.site_title);
    for link in &navigation.links {
        println!("  [{}] {}", link.kind.label(), link.path.display());
    }
    for section in &navigation.sections {
        println!();
        println!("{}", section.name);
        if section.entries.is_empty() {
            println!("  (no posts)");
        }
        for entry in &section.entries {
            println!("  {}  ({})", entry.display_name, entry.raw_filename);
        }
    }
}
