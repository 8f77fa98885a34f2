//! Outbound HTTP clients for the two external fact providers.
//!
//! Each provider sits behind a small fetch trait so request handlers can be
//! tested against stub servers (the concrete clients take their base URL from
//! configuration). The concrete implementations use `reqwest`.
//!
//! - [`apod`]: astronomy picture of the day for a calendar date
//! - [`datefact`]: numeric/historical trivia for a month/day pair

pub mod apod;
pub mod datefact;

pub use apod::{ApodClient, FetchApod};
pub use datefact::{FetchDateFact, NumbersClient};

use url::Url;

/// Makes sure a url has a trailing slash.
///
/// This fixes a weird idiosyncracy in rusts 'join' method on urls, where joining URLs like
/// '/hello', 'world' gives you '/world', but '/hello/', 'world' gives you '/hello/world'.
/// Basically, call this before calling .join
pub(crate) fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}
