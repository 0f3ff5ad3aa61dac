pub mod gh_binary;
pub mod github;
pub mod logging;
