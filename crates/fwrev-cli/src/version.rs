/// Build version of the tool itself, e.g. `0.1.0+git.abc1234.dirty`.
pub const FULL: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    "+git.",
    env!("FWREV_GIT_SHA"),
    env!("FWREV_GIT_DIRTY")
);
