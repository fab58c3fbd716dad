//! Canonical key derivation for URI templates.

use crate::uri::tokenizer::Segment;

/// Derive the canonical key of a tokenized template.
///
/// The key is the in-order concatenation of literal segment values only, so
/// it captures the literal "shape" of the route independent of variable
/// naming: `/users/[id]` and `/users/[name]` both derive `"/users/"`.
pub fn derive_key(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter_map(|segment| match segment {
            Segment::Literal(v) => Some(v.as_str()),
            Segment::Variable(_) => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::uri::tokenizer::tokenize;

    #[test]
    fn test_key_drops_variables() {
        assert_eq!(derive_key(&tokenize("/users/[id]")), "/users/");
    }

    #[test]
    fn test_key_of_literal_pattern() {
        assert_eq!(derive_key(&tokenize("/health")), "/health");
    }

    #[test]
    fn test_different_variable_names_collide() {
        let by_id = derive_key(&tokenize("/users/[id]"));
        let by_name = derive_key(&tokenize("/users/[name]"));
        assert_eq!(by_id, by_name);
    }

    #[test]
    fn test_multi_variable_key() {
        assert_eq!(
            derive_key(&tokenize("/users/[id]/posts/[post_id]")),
            "/users//posts/"
        );
    }

    #[test]
    fn test_empty_sequence() {
        assert_eq!(derive_key(&[]), "");
    }
}
