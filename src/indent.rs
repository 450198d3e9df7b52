/// Leading whitespace of a line
///
/// Returns the longest run of spaces and tabs at the start of `line`,
/// or an empty string if the line starts with anything else.
pub fn indentation_of(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, ch)| *ch != ' ' && *ch != '\t')
        .map(|(offset, _)| offset)
        .unwrap_or(line.len());
    &line[..end]
}
