//! Message templates for user-visible errors.
//!
//! Templates use `{0}`, `{1}` placeholders substituted by `apply`. The
//! default set is English; hosts may supply their own translated bundle.

/// Message dictionary keyed per error kind.
#[derive(Clone, Debug)]
pub struct LocalizationTemplates {
    pub expected_token_kind: &'static str,
    pub expected_any_token_kind: &'static str,
    pub csv_continuation_dangling_comma: &'static str,
    pub csv_continuation_let: &'static str,
    pub unused_tokens_remain: &'static str,
    pub unterminated_parentheses: &'static str,
    pub unterminated_bracket: &'static str,
    pub invalid_primitive_type: &'static str,
    pub required_parameter_after_optional: &'static str,
    pub end_of_input: &'static str,
}

impl LocalizationTemplates {
    /// The default English bundle.
    pub fn en() -> &'static LocalizationTemplates {
        static EN: LocalizationTemplates = LocalizationTemplates {
            expected_token_kind: "expected {0}, found {1}",
            expected_any_token_kind: "expected one of {0}, found {1}",
            csv_continuation_dangling_comma: "a comma cannot precede {0}",
            csv_continuation_let: "a comma cannot precede the `in` of a let-expression",
            unused_tokens_remain: "unexpected {0} after the end of the document",
            unterminated_parentheses: "the `(` at {0} was never closed",
            unterminated_bracket: "the bracket at {0} was never closed",
            invalid_primitive_type: "`{0}` is not a primitive type name",
            required_parameter_after_optional:
                "a required parameter cannot follow an optional parameter",
            end_of_input: "the end of input",
        };
        &EN
    }

    /// Substitutes `{0}`, `{1}`, ... with `args`, left to right.
    pub fn apply(template: &str, args: &[&str]) -> String {
        let mut message = template.to_string();
        for (index, arg) in args.iter().enumerate() {
            message = message.replace(&format!("{{{index}}}"), arg);
        }
        message
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_substitutes_in_order() {
        let message = LocalizationTemplates::apply("expected {0}, found {1}", &["`in`", "`a`"]);
        assert_eq!(message, "expected `in`, found `a`");
    }

    #[test]
    fn apply_without_placeholders_is_identity() {
        let template = LocalizationTemplates::en().required_parameter_after_optional;
        assert_eq!(LocalizationTemplates::apply(template, &[]), template);
    }
}
