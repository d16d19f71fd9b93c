//! User-facing error display.
//!
//! Prints anyhow errors with their causal chain and, when the chain carries an
//! [`HttpError`] or a transport failure, a short hint about what to check.

use std::io::Write;

use crate::api::HttpError;
use crate::style;

/// Write `err` to stderr.
///
/// ```text
/// error: top-level message
///   caused by: root cause
///
///   hint: what to check next
/// ```
///
/// With `verbose`, the full Debug chain follows; otherwise a pointer to
/// `--verbose` is printed when there is a deeper chain to see.
pub fn display_error(err: &anyhow::Error, verbose: bool) {
    let mut stderr = std::io::stderr().lock();

    let _ = writeln!(stderr, "{}: {}", style::err_red_bold("error"), err);

    let chain: Vec<_> = err.chain().skip(1).collect();
    if chain.len() == 1 {
        let _ = writeln!(
            stderr,
            "  {}",
            style::err_dim(&format!("caused by: {}", chain[0]))
        );
    } else {
        for (i, cause) in chain.iter().enumerate() {
            let _ = writeln!(
                stderr,
                "  {}",
                style::err_dim(&format!("{}: {}", i + 1, cause))
            );
        }
    }

    if let Some(hint) = hint_for(err) {
        let _ = writeln!(stderr, "\n  {}: {}", style::err_cyan_bold("hint"), hint);
    }

    if verbose {
        let _ = writeln!(stderr, "\nFull error chain:\n{:?}", err);
    } else if !chain.is_empty() {
        let _ = writeln!(
            stderr,
            "\n  {}",
            style::err_dim("run with --verbose for full details")
        );
    }
}

/// First actionable suggestion found in the chain.
pub fn hint_for(err: &anyhow::Error) -> Option<String> {
    err.chain().find_map(|cause| {
        if let Some(e) = cause.downcast_ref::<HttpError>() {
            return e.hint();
        }
        if let Some(ureq::Error::Transport(_)) = cause.downcast_ref::<ureq::Error>() {
            return Some(
                "the server could not be reached; check the `url` in your config or VAXCTL_URL"
                    .to_string(),
            );
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use anyhow::Context;

    use super::*;

    #[test]
    fn hint_found_through_context() {
        let http = HttpError {
            status: 404,
            message: "rule not found".into(),
            errors: BTreeMap::new(),
        };
        let err = Err::<(), _>(http)
            .context("failed to fetch rule 'disk-full'")
            .unwrap_err();
        let hint = hint_for(&err).unwrap();
        assert!(hint.contains("does not exist"), "{hint}");
    }

    #[test]
    fn no_hint_for_plain_errors() {
        let err = anyhow::anyhow!("something else");
        assert!(hint_for(&err).is_none());
    }
}
