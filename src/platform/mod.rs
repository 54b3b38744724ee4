//! Platform capabilities the feed drives but does not implement:
//! media playback, native share, and the clipboard.
//!
//! Each capability is a trait so the feed can run headless in tests.

mod player;
mod share;

pub use player::{HeadlessBackend, MediaPlayer, PlaybackError, PlayerBackend, ProcessBackend};
pub use share::{
    Clipboard, CommandShare, NativeShare, ShareError, ShareOutcome, SharePayload, Sharer,
    SystemClipboard, COPIED_NOTICE,
};

/// Substitute `{name}` placeholders in an argv template.
///
/// Placeholders may appear anywhere inside an argument, e.g. `--title={title}`.
pub(crate) fn expand_args(template: &[String], vars: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            vars.iter().fold(arg.clone(), |acc, (name, value)| {
                acc.replace(&format!("{{{}}}", name), value)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_args() {
        let template = vec![
            "mpv".to_string(),
            "--title={title}".to_string(),
            "{url}".to_string(),
        ];
        let out = expand_args(
            &template,
            &[("url", "https://cdn.example.com/a.mp4"), ("title", "reel a")],
        );
        assert_eq!(
            out,
            vec!["mpv", "--title=reel a", "https://cdn.example.com/a.mp4"]
        );
    }

    #[test]
    fn test_expand_args_leaves_unknown_placeholders() {
        let out = expand_args(&["{other}".to_string()], &[("url", "x")]);
        assert_eq!(out, vec!["{other}"]);
    }
}
