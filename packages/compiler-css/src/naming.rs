//! Identifier conversions between the document model and CSS text.

/// Placeholder authors write in custom CSS to mean "this node"
pub const SELECTOR_PLACEHOLDER: &str = "selector";

/// `backgroundColor` -> `background-color`.
///
/// Vendor prefixes become leading dashes (`WebkitTransform` ->
/// `-webkit-transform`, `msFlex` -> `-ms-flex`); custom properties (`--x`)
/// and names that are already kebab-case pass through.
pub fn kebab_case(property: &str) -> String {
    let property = property.trim();
    if property.starts_with("--") {
        return property.to_string();
    }

    let mut out = String::with_capacity(property.len() + 4);
    if property.starts_with("ms") && property[2..].starts_with(|c: char| c.is_ascii_uppercase()) {
        out.push('-');
    }
    for c in property.chars() {
        if c.is_ascii_uppercase() {
            out.push('-');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Token display name to a custom-property suffix: `"Brand Blue"` and
/// `"brandBlue"` both become `brand-blue`
pub fn token_slug(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut prev_lower = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if c.is_uppercase() && prev_lower && !out.ends_with('-') {
                out.push('-');
            }
            out.extend(c.to_lowercase());
            prev_lower = c.is_lowercase() || c.is_numeric();
        } else {
            if !out.is_empty() && !out.ends_with('-') {
                out.push('-');
            }
            prev_lower = false;
        }
    }
    out.trim_end_matches('-').to_string()
}

/// Replace every whole-word `selector` in `css` with `scope`.
///
/// `.selector-card` or `myselector` are left alone.
pub fn scope_custom_css(css: &str, scope: &str) -> String {
    let mut out = String::with_capacity(css.len() + scope.len());
    let mut rest = css;

    while let Some(pos) = rest.find(SELECTOR_PLACEHOLDER) {
        let end = pos + SELECTOR_PLACEHOLDER.len();
        let before = rest[..pos].chars().next_back();
        let after = rest[end..].chars().next();

        out.push_str(&rest[..pos]);
        if !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char) {
            out.push_str(scope);
        } else {
            out.push_str(SELECTOR_PLACEHOLDER);
        }
        rest = &rest[end..];
    }
    out.push_str(rest);
    out
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kebab_case() {
        assert_eq!(kebab_case("color"), "color");
        assert_eq!(kebab_case("backgroundColor"), "background-color");
        assert_eq!(kebab_case("borderTopLeftRadius"), "border-top-left-radius");
        assert_eq!(kebab_case("WebkitLineClamp"), "-webkit-line-clamp");
        assert_eq!(kebab_case("msTransform"), "-ms-transform");
        assert_eq!(kebab_case("--brand-color"), "--brand-color");
        assert_eq!(kebab_case("font-size"), "font-size");
    }

    #[test]
    fn test_token_slug() {
        assert_eq!(token_slug("primary"), "primary");
        assert_eq!(token_slug("Brand Blue"), "brand-blue");
        assert_eq!(token_slug("brandBlue"), "brand-blue");
        assert_eq!(token_slug("  Heading 1 "), "heading-1");
        assert_eq!(token_slug("accent/dark!"), "accent-dark");
    }

    #[test]
    fn test_scope_custom_css() {
        let scope = "[data-node-id=\"abc\"]";
        assert_eq!(
            scope_custom_css("selector { color: red; }", scope),
            "[data-node-id=\"abc\"] { color: red; }"
        );
        assert_eq!(
            scope_custom_css("selector:hover, selector > p { x: y }", scope),
            "[data-node-id=\"abc\"]:hover, [data-node-id=\"abc\"] > p { x: y }"
        );
        assert_eq!(scope_custom_css(".selector-card { }", scope), ".selector-card { }");
        assert_eq!(scope_custom_css("myselector { }", scope), "myselector { }");
        assert_eq!(scope_custom_css("div { }", scope), "div { }");
    }
}
