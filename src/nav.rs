//! Exports [`build`], which stitches together the site configuration
//! ([`crate::config`]) and the collection listings ([`crate::scan`]) into the
//! [`NavigationModel`] that drives the UI.

use crate::config::{self, SiteConfig};
use crate::post::PostEntry;
use crate::scan::{self, RootLink};
use serde::Serialize;
use std::path::Path;

/// The title shown when the site has no usable title.
pub const DEFAULT_SITE_TITLE: &str = "new site!";

/// The collection that is always listed first, whether or not the
/// configuration declares it.
pub const POSTS_COLLECTION: &str = "posts";

/// Everything the UI needs to list a site's collections and posts.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct NavigationModel {
    /// The site title, or [`DEFAULT_SITE_TITLE`].
    pub site_title: String,

    /// One section per collection. The first section is always
    /// [`POSTS_COLLECTION`].
    pub sections: Vec<CollectionSection>,

    /// Well-known entries in the site root (settings, assets, build output).
    pub links: Vec<RootLink>,
}

/// A collection and its posts, newest first.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CollectionSection {
    pub name: String,
    pub entries: Vec<PostEntry>,
}

impl NavigationModel {
    /// The model shown when there is no site or its configuration can't be
    /// loaded: the default title and nothing to list.
    pub fn fallback() -> NavigationModel {
        NavigationModel {
            site_title: DEFAULT_SITE_TITLE.to_owned(),
            sections: Vec::new(),
            links: Vec::new(),
        }
    }

    /// Looks up a section by name. With duplicate names the first wins.
    pub fn section(&self, name: &str) -> Option<&CollectionSection> {
        self.sections.iter().find(|s| s.name == name)
    }

    /// The section names in display order.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.iter().map(|s| s.name.as_str())
    }
}

/// Returns the section names for a configuration: [`POSTS_COLLECTION`]
/// followed by each declared collection in declaration order. Names are not
/// deduplicated, so a config that declares `posts` lists it twice.
pub fn section_names(config: &SiteConfig) -> Vec<&str> {
    std::iter::once(POSTS_COLLECTION)
        .chain(config.collection_names())
        .collect()
}

/// Builds the [`NavigationModel`] for the site rooted at `base_directory`.
/// Fails only if the site configuration can't be loaded; unreadable
/// collections show up as empty sections.
pub fn build(base_directory: &Path) -> config::Result<NavigationModel> {
    let config = SiteConfig::load(base_directory)?;
    Ok(from_config(base_directory, &config))
}

/// Builds the [`NavigationModel`] for an already-loaded configuration.
pub fn from_config(base_directory: &Path, config: &SiteConfig) -> NavigationModel {
    let sections: Vec<CollectionSection> = section_names(config)
        .into_iter()
        .map(|name| CollectionSection {
            name: name.to_owned(),
            entries: scan::scan(base_directory, name),
        })
        .collect();

    tracing::info!(
        path = ?base_directory,
        sections = sections.len(),
        "built navigation"
    );

    NavigationModel {
        site_title: config
            .title
            .clone()
            .unwrap_or_else(|| DEFAULT_SITE_TITLE.to_owned()),
        sections,
        links: scan::root_links(base_directory),
    }
}

/// Like [`build`] but substitutes [`NavigationModel::fallback`] when the
/// configuration can't be loaded. The error is returned alongside so the
/// caller can show it.
pub fn build_or_fallback(
    base_directory: &Path,
) -> (NavigationModel, Option<config::Error>) {
    match build(base_directory) {
        Ok(model) => (model, None),
        Err(err) => {
            tracing::warn!(error = %err, "using fallback navigation");
            (NavigationModel::fallback(), Some(err))
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scan::RootLinkKind;
    use std::fs;
    use tempfile::TempDir;

    type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

    fn site(config: &str, collections: &[(&str, &[&str])]) -> std::io::Result<TempDir> {
        let tmp = TempDir::new()?;
        fs::write(tmp.path().join("_config.yml"), config)?;
        for (collection, posts) in collections {
            let dir = tmp.path().join(format!("_{}", collection));
            fs::create_dir(&dir)?;
            for post in *posts {
                fs::write(dir.join(post), format!("# {}\n", post))?;
            }
        }
        Ok(tmp)
    }

    #[test]
    fn test_posts_always_first() -> Result<()> {
        let tmp = site(
            "title: My Blog\ncollections:\n  projects:\n    output: true\n",
            &[
                ("posts", &["2014-02-04-a.md", "2015-01-01-b.md"][..]),
                ("projects", &["2016-05-05-rocket.md"][..]),
            ],
        )?;
        let model = build(tmp.path())?;

        assert_eq!("My Blog", model.site_title);
        assert_eq!(
            vec!["posts", "projects"],
            model.section_names().collect::<Vec<_>>()
        );
        let posts: Vec<&str> = model.sections[0]
            .entries
            .iter()
            .map(|e| e.display_name.as_str())
            .collect();
        assert_eq!(vec!["b", "a"], posts);
        assert_eq!(
            "rocket",
            model.sections[1].entries[0].display_name.as_str()
        );
        assert_eq!(
            vec![RootLinkKind::SiteSettings],
            model.links.iter().map(|l| l.kind).collect::<Vec<_>>()
        );
        Ok(())
    }

    #[test]
    fn test_declared_posts_is_duplicated() -> Result<()> {
        let tmp = site(
            "collections:\n  posts: {}\n  notes: {}\n",
            &[("posts", &["2014-02-04-a.md"][..])],
        )?;
        let model = build(tmp.path())?;
        assert_eq!(
            vec!["posts", "posts", "notes"],
            model.section_names().collect::<Vec<_>>()
        );
        assert_eq!(model.sections[0], model.sections[1]);
        assert!(model.section("notes").map_or(false, |s| s.entries.is_empty()));
        Ok(())
    }

    #[test]
    fn test_default_title() -> Result<()> {
        let tmp = site("markdown: kramdown\n", &[])?;
        let model = build(tmp.path())?;
        assert_eq!(DEFAULT_SITE_TITLE, model.site_title);
        assert_eq!(vec!["posts"], model.section_names().collect::<Vec<_>>());
        assert!(model.sections[0].entries.is_empty());
        Ok(())
    }

    #[test]
    fn test_missing_config_fails() -> Result<()> {
        let tmp = TempDir::new()?;
        fs::create_dir(tmp.path().join("_posts"))?;
        match build(tmp.path()) {
            Err(config::Error::Read { .. }) => {}
            other => panic!("wanted Read; found {:?}", other),
        }

        let (model, err) = build_or_fallback(tmp.path());
        assert_eq!(NavigationModel::fallback(), model);
        assert!(err.is_some());
        Ok(())
    }

    #[test]
    fn test_build_is_deterministic() -> Result<()> {
        let tmp = site(
            "title: Site\ncollections:\n  projects: {}\n  drafts: {}\n",
            &[
                ("posts", &["2017-07-05-c.md", "2014-02-04-a.md", "2015-01-01-b.md"][..]),
                ("drafts", &["untitled.md"][..]),
            ],
        )?;
        assert_eq!(build(tmp.path())?, build(tmp.path())?);
        Ok(())
    }
}
