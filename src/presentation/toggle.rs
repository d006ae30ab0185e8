//! Language toggle adapter: the only place resolution meets navigation.

use crate::i18n::RouteResolver;
use tracing::info;

/// The hosting environment's location: current path and navigation.
pub trait Location {
    fn pathname(&self) -> String;
    fn assign(&mut self, href: &str);
}

/// Navigate `location` to the equivalent page in the other language.
///
/// Returns the relative URL that was assigned.
pub fn toggle_language<L: Location + ?Sized>(location: &mut L, resolver: &RouteResolver) -> String {
    let resolution = resolver.resolve(&location.pathname());

    info!(
        "Language toggle: {} -> {}",
        resolution.current, resolution.target
    );

    location.assign(&resolution.href);
    resolution.href
}
