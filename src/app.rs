//! The application layer. [`App`] owns the [`AppState`] and the
//! [`SelectionStore`], and maps each UI [`Action`] onto the library
//! operations: loading the configuration and scanning collections
//! ([`crate::nav`]) and rendering posts ([`crate::markdown`]).
//!
//! Every action runs to completion inside [`App::dispatch`], which takes
//! `&mut self`, so a directory selection always fully replaces the previous
//! navigation model before the next action is handled.

use crate::config;
use crate::markdown;
use crate::nav::{self, NavigationModel};
use crate::state::SelectionStore;
use pulldown_cmark::escape::escape_html;
use std::path::{Path, PathBuf};

/// Something the user did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// The user picked a directory in the directory dialog. `None` means the
    /// dialog was cancelled.
    SelectDirectory(Option<PathBuf>),

    /// Reload the configuration and collections of the current directory.
    Reload,

    /// Show a post in the content pane.
    OpenPost(PathBuf),

    /// Show the site configuration file in the content pane.
    OpenSiteSettings,
}

/// What the content pane shows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Content {
    Empty,
    Html(String),
    Error(String),
}

/// Everything the UI renders.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppState {
    /// The selected site root, if any.
    pub directory: Option<PathBuf>,

    /// The collections and posts of the selected site.
    pub navigation: NavigationModel,

    /// The content pane.
    pub content: Content,

    /// A message for the user about the last rebuild or selection (e.g. the
    /// site configuration couldn't be read).
    pub notice: Option<String>,
}

pub struct App<S> {
    state: AppState,
    store: S,
}

impl<S: SelectionStore> App<S> {
    /// Starts the application: reads the remembered directory from `store`
    /// and builds its navigation. Without a remembered directory the
    /// navigation is [`NavigationModel::fallback`].
    pub fn start(store: S) -> App<S> {
        let mut app = App {
            state: AppState {
                directory: None,
                navigation: NavigationModel::fallback(),
                content: Content::Empty,
                notice: None,
            },
            store,
        };

        match app.store.load() {
            Ok(Some(directory)) => {
                tracing::info!(directory = ?directory, "opening remembered directory");
                app.state.directory = Some(directory);
                app.rebuild();
            }
            Ok(None) => {
                tracing::info!("no directory selected");
                app.state.notice = Some(NO_DIRECTORY.to_owned());
            }
            Err(err) => {
                tracing::warn!(error = %err, "reading remembered directory");
                app.state.notice = Some(err.to_string());
            }
        }
        app
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Handles one [`Action`] and returns the resulting state. Failures never
    /// escape; they become a [`Content::Error`] or a notice.
    pub fn dispatch(&mut self, action: Action) -> &AppState {
        tracing::debug!(action = ?action, "dispatching");
        match action {
            Action::SelectDirectory(None) => {
                tracing::debug!("directory dialog cancelled");
            }
            Action::SelectDirectory(Some(directory)) => self.select_directory(directory),
            Action::Reload => self.rebuild(),
            Action::OpenPost(path) => self.open_post(&path),
            Action::OpenSiteSettings => self.open_site_settings(),
        }
        &self.state
    }

    fn select_directory(&mut self, directory: PathBuf) {
        tracing::info!(directory = ?directory, "selected directory");
        let saved = self.store.save(&directory);
        self.state.directory = Some(directory);
        self.state.content = Content::Empty;
        self.rebuild();
        if let Err(err) = saved {
            tracing::warn!(error = %err, "remembering directory");
            self.state.notice = Some(match self.state.notice.take() {
                Some(notice) => format!("{}; {}", notice, err),
                None => err.to_string(),
            });
        }
    }

    fn rebuild(&mut self) {
        let (navigation, notice) = match &self.state.directory {
            Some(directory) => {
                let (navigation, err) = nav::build_or_fallback(directory);
                (navigation, err.map(|e| e.to_string()))
            }
            None => (NavigationModel::fallback(), Some(NO_DIRECTORY.to_owned())),
        };
        self.state.navigation = navigation;
        self.state.notice = notice;
    }

    fn open_post(&mut self, path: &Path) {
        self.state.content = match markdown::render(path) {
            Ok(html) => Content::Html(html),
            Err(err) => {
                tracing::warn!(error = %err, "opening post");
                Content::Error(err.to_string())
            }
        };
    }

    fn open_site_settings(&mut self) {
        self.state.content = match &self.state.directory {
            None => Content::Error(NO_DIRECTORY.to_owned()),
            Some(directory) => {
                let path = config::config_path(directory);
                match settings_html(&path) {
                    Ok(html) => Content::Html(html),
                    Err(err) => Content::Error(format!(
                        "reading site config '{}': {}",
                        path.display(),
                        err
                    )),
                }
            }
        };
    }
}

const NO_DIRECTORY: &str = "no site directory selected";

// The raw configuration file as an escaped preformatted block.
fn settings_html(path: &Path) -> std::io::Result<String> {
    let contents = std::fs::read_to_string(path)?;
    let mut html = String::from("<pre><code class=\"language-yaml\">");
    escape_html(&mut html, &contents)?;
    html.push_str("</code></pre>\n");
    Ok(html)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::nav::DEFAULT_SITE_TITLE;
    use crate::state::MemoryStore;
    use std::fs;
    use tempfile::TempDir;

    fn blog() -> std::io::Result<TempDir> {
        let tmp = TempDir::new()?;
        fs::write(
            tmp.path().join("_config.yml"),
            "title: My Blog\ncollections:\n  projects: {}\n",
        )?;
        fs::create_dir(tmp.path().join("_posts"))?;
        fs::write(
            tmp.path().join("_posts").join("2014-02-04-my-first-post.md"),
            "# Hello\n",
        )?;
        Ok(tmp)
    }

    #[test]
    fn test_start_without_directory() {
        let app = App::start(MemoryStore::default());
        assert_eq!(None, app.state().directory);
        assert_eq!(DEFAULT_SITE_TITLE, app.state().navigation.site_title);
        assert!(app.state().navigation.sections.is_empty());
        assert!(app.state().notice.is_some());
    }

    #[test]
    fn test_start_with_remembered_directory() -> std::io::Result<()> {
        let tmp = blog()?;
        let app = App::start(MemoryStore::new(Some(tmp.path().to_owned())));
        assert_eq!("My Blog", app.state().navigation.site_title);
        assert_eq!(None, app.state().notice);
        Ok(())
    }

    #[test]
    fn test_select_directory_persists_and_builds() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let tmp = blog()?;
        let mut app = App::start(MemoryStore::default());

        let state = app.dispatch(Action::SelectDirectory(Some(tmp.path().to_owned())));
        assert_eq!(
            vec!["posts", "projects"],
            state.navigation.section_names().collect::<Vec<_>>()
        );
        assert_eq!(Some(tmp.path().to_owned()), app.store().load()?);
        Ok(())
    }

    #[test]
    fn test_cancelled_selection_is_noop() -> std::io::Result<()> {
        let tmp = blog()?;
        let mut app = App::start(MemoryStore::new(Some(tmp.path().to_owned())));
        let before = app.state().clone();
        assert_eq!(&before, app.dispatch(Action::SelectDirectory(None)));
        Ok(())
    }

    #[test]
    fn test_open_post() -> std::io::Result<()> {
        let tmp = blog()?;
        let mut app = App::start(MemoryStore::new(Some(tmp.path().to_owned())));
        let path = app.state().navigation.sections[0].entries[0].full_path.clone();

        match &app.dispatch(Action::OpenPost(path)).content {
            Content::Html(html) => assert!(html.contains("<h1>Hello</h1>")),
            other => panic!("wanted Html; found {:?}", other),
        }

        let missing = tmp.path().join("_posts").join("gone.md");
        match &app.dispatch(Action::OpenPost(missing)).content {
            Content::Error(_) => {}
            other => panic!("wanted Error; found {:?}", other),
        }
        Ok(())
    }

    #[test]
    fn test_broken_config_falls_back() -> std::io::Result<()> {
        let tmp = blog()?;
        let mut app = App::start(MemoryStore::new(Some(tmp.path().to_owned())));
        fs::write(tmp.path().join("_config.yml"), "title: [unclosed\n")?;

        let state = app.dispatch(Action::Reload);
        assert_eq!(NavigationModel::fallback(), state.navigation);
        assert!(state.notice.is_some());
        Ok(())
    }

    struct ReadOnlyStore;

    impl SelectionStore for ReadOnlyStore {
        fn load(&self) -> crate::state::Result<Option<PathBuf>> {
            Ok(None)
        }

        fn save(&mut self, _: &Path) -> crate::state::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into())
        }
    }

    #[test]
    fn test_store_failure_keeps_config_notice() -> std::io::Result<()> {
        let tmp = blog()?;
        fs::write(tmp.path().join("_config.yml"), "title: [unclosed\n")?;
        let mut app = App::start(ReadOnlyStore);

        let state = app.dispatch(Action::SelectDirectory(Some(tmp.path().to_owned())));
        assert_eq!(Some(tmp.path().to_owned()), state.directory);
        let notice = state.notice.as_deref().unwrap_or_default();
        assert!(notice.contains("parsing site config"), "notice: {}", notice);
        assert!(notice.contains("selection store: read-only"), "notice: {}", notice);
        Ok(())
    }

    #[test]
    fn test_open_site_settings_escapes() -> std::io::Result<()> {
        let tmp = blog()?;
        fs::write(tmp.path().join("_config.yml"), "title: <b>&</b>\n")?;
        let mut app = App::start(MemoryStore::new(Some(tmp.path().to_owned())));

        match &app.dispatch(Action::OpenSiteSettings).content {
            Content::Html(html) => {
                assert!(html.contains("title: &lt;b&gt;&amp;&lt;/b&gt;"))
            }
            other => panic!("wanted Html; found {:?}", other),
        }
        Ok(())
    }
}
