use std::sync::LazyLock;

use error_stack::report;
use regex::Regex;

use crate::errors::{CustomResult, OperationError};

/// Removes every whitespace run that sits directly before a tag opening.
///
/// Request fragments are composed from indented templates, but the gateway
/// hashes the transmitted bytes: the signed string and the wire body must be
/// the collapsed form, character for character.
pub(crate) fn collapse_fragment(fragment: &str) -> CustomResult<String, OperationError> {
    static TAG_GAP: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"\s*<").ok());

    let pattern = TAG_GAP
        .as_ref()
        .ok_or_else(|| report!(OperationError::RequestEncoding))?;

    Ok(pattern.replace_all(fragment, "<").into_owned())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn indentation_before_tags_is_removed() {
        let fragment = "<A>\n    <B>1</B>\n    <C>2</C>\n</A>";
        assert_eq!(
            collapse_fragment(fragment).unwrap(),
            "<A><B>1</B><C>2</C></A>"
        );
    }

    #[test]
    fn whitespace_inside_values_survives() {
        let fragment = "<A>\n    <B>Fulano de tal</B>\n</A>";
        assert_eq!(
            collapse_fragment(fragment).unwrap(),
            "<A><B>Fulano de tal</B></A>"
        );
    }

    #[test]
    fn already_collapsed_fragments_are_unchanged() {
        let fragment = "<A><B>1</B></A>";
        assert_eq!(collapse_fragment(fragment).unwrap(), fragment);
    }
}
