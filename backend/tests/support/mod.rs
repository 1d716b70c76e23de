#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use wikimap::sources::local::{LocalPage, LocalSource};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Map center used throughout the tests (Pariser Platz, Berlin).
pub const BERLIN: (f64, f64) = (52.516389, 13.377778);

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on unwind and serializes access to the
/// process environment across parallel tests.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

/// Every `WIKIMAP_*` override cleared, plus `HOST` and `PORT`.
pub fn clean_env() -> Vec<(&'static str, Option<&'static str>)> {
    [
        "HOST",
        "PORT",
        "WIKIMAP_CONFIG",
        "WIKIMAP_LANGUAGE",
        "WIKIMAP_API_URL",
        "WIKIMAP_SOURCE",
        "WIKIMAP_FIXTURE",
    ]
    .into_iter()
    .map(|k| (k, None))
    .collect()
}

/// A handful of landmarks around [`BERLIN`], all within two kilometres.
pub fn berlin_pages() -> Vec<LocalPage> {
    vec![
        LocalPage::new(6151, "Brandenburger Tor", 52.516275, 13.377704, 4096)
            .with_text("Das Brandenburger Tor in Berlin ist ein frühklassizistisches Triumphtor."),
        LocalPage::new(7028, "Pariser Platz", 52.516300, 13.379100, 512),
        LocalPage::new(1512, "Reichstagsgebäude", 52.518620, 13.376187, 2048),
        LocalPage::new(9001, "Denkmal für die ermordeten Juden Europas", 52.513889, 13.378889, 1024),
        LocalPage::new(9002, "Tiergarten-Gedenkstein", 52.515000, 13.372000, 0),
    ]
}

pub fn berlin_source() -> LocalSource {
    LocalSource::with_pages(berlin_pages())
}

/// `n` pages on a small grid around [`BERLIN`] with views `1..=n`.
pub fn grid_source(n: u64) -> LocalSource {
    LocalSource::with_pages((1..=n).map(|i| {
        let (dlat, dlon) = ((i % 10) as f64 * 0.0005, (i / 10) as f64 * 0.0005);
        LocalPage::new(i, format!("Ort {}", i), BERLIN.0 + dlat, BERLIN.1 + dlon, i)
    }))
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}
