use tracing::warn;

/// Engine options for one recognition pass.
///
/// Built either programmatically (the alternate-segmentation pass) or parsed
/// from the raw `config` form field, which accepts a small CLI-style grammar:
/// `--psm N`, `-c key=value`, and bare `key=value` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognizeOptions {
    /// Page segmentation mode override. `None` keeps the engine's automatic
    /// page segmentation.
    pub page_seg_mode: Option<u32>,
    /// Engine variables as `(name, value)` pairs, applied in order.
    pub variables: Vec<(String, String)>,
}

impl RecognizeOptions {
    /// Force a specific page segmentation mode.
    pub fn with_page_seg_mode(mode: u32) -> Self {
        Self {
            page_seg_mode: Some(mode),
            ..Self::default()
        }
    }

    /// Parse a raw engine configuration string. Unknown flags are logged and
    /// skipped rather than failing the request; the config string is a
    /// convenience surface, not a validated contract.
    pub fn parse(raw: &str) -> Self {
        let mut opts = Self::default();
        let mut tokens = raw.split_whitespace().peekable();

        while let Some(token) = tokens.next() {
            match token {
                "--psm" => match tokens.next().and_then(|v| v.parse().ok()) {
                    Some(mode) => opts.page_seg_mode = Some(mode),
                    None => warn!("ignoring --psm without a numeric argument"),
                },
                "-c" => match tokens.next().and_then(split_pair) {
                    Some(pair) => opts.variables.push(pair),
                    None => warn!("ignoring -c without a key=value argument"),
                },
                other => match split_pair(other) {
                    Some(pair) => opts.variables.push(pair),
                    None => warn!(token = other, "ignoring unrecognized engine config token"),
                },
            }
        }

        opts
    }
}

fn split_pair(token: &str) -> Option<(String, String)> {
    let (key, value) = token.split_once('=')?;
    if key.is_empty() {
        return None;
    }
    Some((key.to_string(), value.to_string()))
}
