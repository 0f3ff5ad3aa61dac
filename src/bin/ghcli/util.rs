use ghcli::github::ClientBuilder;

use crate::args::GlobalArgs;

/// Get a `ClientBuilder` configured from the global arguments.
///
/// The builder logs through the dispatcher that is current at the time of the call.
pub fn client_builder(global_args: &GlobalArgs) -> ClientBuilder {
    let dispatch = tracing::dispatcher::get_default(|d| d.clone());
    ClientBuilder::new()
        .api_version(global_args.gh.api_version.clone())
        .executable(global_args.gh.executable.clone())
        .dispatch(dispatch)
}

/// A utility type to generate properly pluralized count expressions in log messages,
/// e.g., "1 repository" or "7 repositories", without copying data.
pub struct Counted<'a> {
    singular: &'a str,
    plural: &'a str,
    count: usize,
}

impl<'a> Counted<'a> {
    /// Create a new `Counted` value with the given count, singular, and plural values.
    pub fn new(count: usize, singular: &'a str, plural: &'a str) -> Self {
        Counted {
            singular,
            plural,
            count,
        }
    }
}

impl<'a> std::fmt::Display for Counted<'a> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.count == 1 {
            write!(f, "1 {}", self.singular)
        } else {
            write!(f, "{} {}", self.count, self.plural)
        }
    }
}
