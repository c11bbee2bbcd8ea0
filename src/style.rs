/// Look up a property in an inline `style` attribute ("fill:#000;stroke:none")
pub fn style_property<'a>(style: &'a str, name: &str) -> Option<&'a str> {
    style
        .split(';')
        .filter_map(|decl| decl.split_once(':'))
        .filter(|(key, _)| key.trim() == name)
        .map(|(_, value)| value.trim())
        .last()
}

/// A path is filled when its `style` attribute sets a `fill` other than `none`.
///
/// A missing style or a style without `fill` counts as unfilled; the `fill`
/// presentation attribute is not consulted.
pub fn is_filled(style: Option<&str>) -> bool {
    style
        .and_then(|s| style_property(s, "fill"))
        .is_some_and(|fill| fill != "none")
}
