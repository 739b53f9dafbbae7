use super::SortDirective;

/// Parse `field[:asc|desc](,field[:asc|desc])*` into sort directives.
///
/// Whitespace anywhere in the input is ignored. The direction token is
/// permissive: only a case-insensitive `desc` sorts descending, anything else
/// (including typos) sorts ascending. Empty phrases from stray commas and empty
/// `:` tokens are skipped, so a directive never carries an empty field.
pub fn parse_sort(raw: &str) -> Vec<SortDirective> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Vec::new();
    }

    compact
        .split(',')
        .filter_map(|phrase| {
            let mut words = phrase.split(':').filter(|w| !w.is_empty());
            let field = words.next()?;
            let ascending = !words
                .next()
                .is_some_and(|dir| dir.eq_ignore_ascii_case("desc"));
            Some(SortDirective {
                field: field.to_string(),
                ascending,
            })
        })
        .collect()
}
