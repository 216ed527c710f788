//! The library code for the `gemcap` capsule generator, which republishes a
//! markdown blog as a Gemini capsule. The architecture can be generally
//! broken down into three steps:
//!
//! 1. Parsing posts from the content tree on disk ([`crate::parser`])
//! 2. Rendering each post into a Gemtext page ([`crate::page`]) and the posts
//!    into an index page ([`crate::index`])
//! 3. Writing the pages to the output directory ([`crate::write`])
//!
//! The interesting work happens in the second step. Gemtext has no inline
//! links, so every markdown link `[text](url)` in a post body is turned into
//! `text [N]` followed by a `=> url N` line ([`crate::gemtext`]). Links back
//! into the website are rewritten to point at the matching capsule page
//! ([`crate::url`]).

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod build;
pub mod config;
pub mod gemtext;
pub mod index;
pub mod page;
pub mod parser;
pub mod post;
pub mod template;
pub mod url;
mod value;
pub mod write;
