//! The library code for `sitenav`, which browses the content of a static
//! site project. The interesting part is turning a site directory into the
//! [`nav::NavigationModel`] that the UI lists:
//!
//! 1. Loading `_config.yml` for the site title and declared collections
//!    ([`crate::config`])
//! 2. Listing each collection's `_{name}/` directory, newest post first
//!    ([`crate::scan`]), with a readable title for each post file
//!    ([`crate::post::prettify`])
//! 3. Assembling the sections, always starting with `posts`
//!    ([`crate::nav`])
//!
//! Selecting a post renders its markdown to HTML ([`crate::markdown`]). The
//! [`crate::app`] module ties these to user actions and remembers the
//! selected directory between runs ([`crate::state`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod app;
pub mod config;
pub mod markdown;
pub mod nav;
pub mod post;
pub mod scan;
pub mod state;
