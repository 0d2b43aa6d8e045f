/// Turns free-form roster text (one name per line) into a candidate list.
/// Lines are trimmed and blank lines dropped; duplicates are kept.
pub fn parse_roster(text: &str) -> Vec<String> {
    clean_names(text.lines())
}

/// Trims every name and drops the ones left empty. Order and duplicates are kept.
pub fn clean_names<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    names
        .into_iter()
        .filter_map(|name| {
            let name = name.as_ref().trim();
            (!name.is_empty()).then(|| name.to_string())
        })
        .collect()
}
