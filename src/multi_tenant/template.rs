//! Name templates with `{placeholder}` tokens.
//!
//! Rendering is a single left-to-right pass over the template. A recognized
//! placeholder is replaced by its value and the value is never scanned again,
//! so a tenant id that itself looks like `{database}` ends up in the output
//! literally. Unknown placeholders and unmatched braces are copied verbatim.

pub const TENANT: &str = "tenant";
pub const DATABASE: &str = "database";
pub const COLLECTION: &str = "collection";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

fn segments(template: &str) -> impl Iterator<Item = Segment<'_>> {
    let mut rest = template;

    std::iter::from_fn(move || {
        if rest.is_empty() {
            return None;
        }

        let Some(open) = rest.find('{') else {
            let literal = rest;
            rest = "";
            return Some(Segment::Literal(literal));
        };

        if open > 0 {
            let literal = &rest[..open];
            rest = &rest[open..];
            return Some(Segment::Literal(literal));
        }

        // `rest` starts with '{'
        let candidate = &rest[1..];
        match candidate.find(['{', '}']) {
            Some(close) if candidate.as_bytes()[close] == b'}' => {
                let name = &candidate[..close];
                rest = &candidate[close + 1..];
                Some(Segment::Placeholder(name))
            }
            _ => {
                let literal = &rest[..1];
                rest = candidate;
                Some(Segment::Literal(literal))
            }
        }
    })
}

/// Render `template`, replacing each `{name}` found in `values`.
pub fn render(template: &str, values: &[(&str, &str)]) -> String {
    let mut output = String::with_capacity(template.len() + 16);

    for segment in segments(template) {
        match segment {
            Segment::Literal(text) => output.push_str(text),
            Segment::Placeholder(name) => {
                match values.iter().find(|(token, _)| *token == name) {
                    Some((_, value)) => output.push_str(value),
                    None => {
                        output.push('{');
                        output.push_str(name);
                        output.push('}');
                    }
                }
            }
        }
    }

    output
}

/// Whether `template` contains the `{name}` placeholder.
pub fn has_placeholder(template: &str, name: &str) -> bool {
    segments(template).any(|segment| segment == Segment::Placeholder(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_render_default_formats() {
        assert_eq!(
            render("{tenant}_{database}", &[(TENANT, "acme"), (DATABASE, "identity")]),
            "acme_identity"
        );
        assert_eq!(
            render("{tenant}_{collection}", &[(TENANT, "acme"), (COLLECTION, "users")]),
            "acme_users"
        );
    }

    #[test]
    fn test_render_keeps_unknown_tokens_and_stray_braces() {
        let values = [(TENANT, "acme")];
        assert_eq!(render("{region}/{tenant}", &values), "{region}/acme");
        assert_eq!(render("{{tenant}}", &values), "{acme}");
        assert_eq!(render("db_{tenant", &values), "db_{tenant");
        assert_eq!(render("}{tenant}{", &values), "}acme{");
        assert_eq!(render("plain", &values), "plain");
        assert_eq!(render("", &values), "");
    }

    #[test]
    fn test_substituted_values_are_not_rescanned() {
        let rendered = render(
            "{tenant}_{database}",
            &[(TENANT, "{database}"), (DATABASE, "identity")],
        );
        assert_eq!(rendered, "{database}_identity");
    }

    #[test]
    fn test_has_placeholder() {
        assert!(has_placeholder("{tenant}_{database}", TENANT));
        assert!(has_placeholder("x{{tenant}", TENANT));
        assert!(!has_placeholder("shared_{database}", TENANT));
        assert!(!has_placeholder("{tenant", TENANT));
        assert!(!has_placeholder("tenant", TENANT));
    }

    proptest! {
        #[test]
        fn prop_default_database_format(tenant in "[a-z0-9-]{1,16}", database in "[a-z0-9_]{1,16}") {
            let rendered = render("{tenant}_{database}", &[(TENANT, &tenant), (DATABASE, &database)]);
            prop_assert_eq!(rendered, format!("{}_{}", tenant, database));
        }

        #[test]
        fn prop_values_appear_verbatim(tenant in "\\PC{0,12}", collection in "[a-z]{1,8}") {
            let rendered = render("{collection}:{tenant}", &[(TENANT, &tenant), (COLLECTION, &collection)]);
            prop_assert_eq!(rendered, format!("{}:{}", collection, tenant));
        }

        #[test]
        fn prop_templates_without_braces_are_unchanged(template in "[^{}]{0,32}") {
            prop_assert_eq!(render(&template, &[(TENANT, "acme")]), template);
        }
    }
}
