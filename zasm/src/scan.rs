use crate::SYMSIZE;

/// Inline comment character.
pub const COMMENT: char = ';';
/// Whole-line comment marker, only in column one.
pub const LINCOM: char = '*';
/// Optional separator after a label.
pub const LABSEP: char = ':';
/// String delimiter.
pub const STRSEP: char = '\'';

/// The three fields of a source line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Fields {
    pub label: String,
    pub opcode: String,
    pub operand: String,
}

/// Split a source line into label, opcode and operand.
///
/// The label starts in column one and ends at whitespace, `:` or `;`; label
/// and opcode are upper-cased, the label additionally truncated to
/// [`SYMSIZE`] characters. The operand is upper-cased with all whitespace
/// dropped, except that text between `'` separators is kept verbatim. A
/// `;` outside a string ends the line; a `*` in column one comments out the
/// whole line.
pub fn split_line(line: &str) -> Fields {
    let mut fields = Fields::default();
    let chars: Vec<char> = line.chars().collect();
    if chars.first() == Some(&LINCOM) {
        return fields;
    }

    let mut i = 0;

    // label
    while i < chars.len()
        && !chars[i].is_whitespace()
        && chars[i] != COMMENT
        && chars[i] != LABSEP
    {
        if fields.label.chars().count() < SYMSIZE {
            fields.label.push(chars[i].to_ascii_uppercase());
        }
        i += 1;
    }

    // opcode
    if chars.get(i) == Some(&LABSEP) {
        i += 1;
    }
    while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
        i += 1;
    }
    while i < chars.len() && !chars[i].is_whitespace() && chars[i] != COMMENT {
        fields.opcode.push(chars[i].to_ascii_uppercase());
        i += 1;
    }

    // operand
    while i < chars.len() && (chars[i] == ' ' || chars[i] == '\t') {
        i += 1;
    }
    while i < chars.len() && chars[i] != COMMENT {
        if chars[i].is_whitespace() {
            i += 1;
            continue;
        }
        if chars[i] != STRSEP {
            fields.operand.push(chars[i].to_ascii_uppercase());
            i += 1;
            continue;
        }
        fields.operand.push(STRSEP);
        i += 1;
        // A quote right after F is the shadow-register tick of EX AF,AF',
        // not a string opener.
        let bytes = fields.operand.as_bytes();
        if bytes.len() >= 2 && bytes[bytes.len() - 2] == b'F' {
            continue;
        }
        loop {
            match chars.get(i) {
                None => return fields,
                Some(&STRSEP) => {
                    fields.operand.push(STRSEP);
                    i += 1;
                    break;
                }
                Some(&c) => {
                    fields.operand.push(c);
                    i += 1;
                }
            }
        }
    }

    fields
}

/// Truncate a symbol name to the table's significant length.
pub fn sym_name(s: &str) -> &str {
    match s.char_indices().nth(SYMSIZE) {
        Some((i, _)) => &s[..i],
        None => s,
    }
}

/// Split an operand at its first comma outside of string separators.
pub fn split2(s: &str) -> (&str, Option<&str>) {
    let mut in_string = false;
    for (i, c) in s.char_indices() {
        match c {
            STRSEP => in_string = !in_string,
            ',' if !in_string => return (&s[..i], Some(&s[i + 1..])),
            _ => {}
        }
    }
    (s, None)
}

/// Iterate the comma-separated items of an operand, strings kept whole.
pub fn split_items(s: &str) -> Vec<&str> {
    let mut items = Vec::new();
    let mut rest = s;
    if rest.is_empty() {
        return items;
    }
    loop {
        let (item, tail) = split2(rest);
        items.push(item);
        match tail {
            Some(t) => rest = t,
            None => return items,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn fields(label: &str, opcode: &str, operand: &str) -> Fields {
        Fields {
            label: label.to_string(),
            opcode: opcode.to_string(),
            operand: operand.to_string(),
        }
    }

    #[test]
    fn plain_instruction() {
        assert_eq!(split_line("\tld a,b"), fields("", "LD", "A,B"));
    }

    #[test]
    fn label_and_separator() {
        assert_eq!(split_line("loop: djnz loop"), fields("LOOP", "DJNZ", "LOOP"));
        assert_eq!(split_line("loop djnz loop"), fields("LOOP", "DJNZ", "LOOP"));
    }

    #[test]
    fn label_truncated_to_eight() {
        let f = split_line("verylonglabel: nop");
        assert_eq!(f.label, "VERYLONG");
        assert_eq!(f.opcode, "NOP");
    }

    #[test]
    fn comment_line() {
        assert_eq!(split_line("* whole line comment"), fields("", "", ""));
    }

    #[test]
    fn inline_comment() {
        assert_eq!(split_line(" ld a,b ; copy"), fields("", "LD", "A,B"));
    }

    #[test]
    fn string_contents_kept_verbatim() {
        assert_eq!(
            split_line(" defb 'a; b',5"),
            fields("", "DEFB", "'a; b',5")
        );
    }

    #[test]
    fn whitespace_dropped_outside_strings() {
        assert_eq!(split_line(" defw 1 + 2, 3"), fields("", "DEFW", "1+2,3"));
    }

    #[test]
    fn shadow_af_is_not_a_string() {
        assert_eq!(split_line(" ex af,af'"), fields("", "EX", "AF,AF'"));
    }

    #[test]
    fn unterminated_string_reaches_line_end() {
        assert_eq!(split_line(" defm 'abc"), fields("", "DEFM", "'abc"));
    }

    #[test]
    fn split2_respects_strings() {
        assert_eq!(split2("A,','"), ("A", Some("','")));
        assert_eq!(split2("'A,B',0"), ("'A,B'", Some("0")));
        assert_eq!(split2("HL"), ("HL", None));
    }

    #[test]
    fn split_items_list() {
        assert_eq!(split_items("'AB',0,'C'"), vec!["'AB'", "0", "'C'"]);
        assert!(split_items("").is_empty());
    }

    #[test]
    fn empty_fields() {
        assert_eq!(split_line(""), fields("", "", ""));
        assert_eq!(split_line("   "), fields("", "", ""));
    }
}
