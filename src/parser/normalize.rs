use super::dialect::Dialect;

/// Collapse a raw pasted row into a single clean line: newlines become
/// spaces, whitespace runs collapse to one space, leading/trailing
/// whitespace is dropped. The natural-gas tables mix em/en dashes into
/// pipeline names, so that dialect also standardizes them to `-` first.
pub fn clean_raw(raw: &str, dialect: Dialect) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut prev_space = false;
    for ch in raw.chars() {
        let ch = match ch {
            '\u{2013}' | '\u{2014}' if dialect.standardize_dashes() => '-',
            c => c,
        };
        if ch.is_whitespace() {
            if !prev_space && !out.is_empty() {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    while out.ends_with(' ') {
        out.pop();
    }
    out
}

/// Split a cleaned line into its ordered tokens. Position is significant:
/// everything downstream of the anchor is addressed by offset.
pub fn tokenize(line: &str) -> Vec<String> {
    line.split(' ')
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collapses_whitespace_and_newlines() {
        let raw = "  12  17.08\nParadip\t –  Raipur ";
        assert_eq!(clean_raw(raw, Dialect::Petroleum), "12 17.08 Paradip – Raipur");
    }

    #[test]
    fn idempotent() {
        for d in [Dialect::Petroleum, Dialect::NaturalGas] {
            let raw = "  a \n\n b\u{2014}c \t d  ";
            let once = clean_raw(raw, d);
            assert_eq!(clean_raw(&once, d), once);
        }
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert_eq!(clean_raw("", Dialect::Petroleum), "");
        assert_eq!(clean_raw("   \n ", Dialect::NaturalGas), "");
    }

    #[test]
    fn gas_standardizes_dashes() {
        assert_eq!(
            clean_raw("Dukli \u{2014} Maharajganj", Dialect::NaturalGas),
            "Dukli - Maharajganj"
        );
        assert_eq!(
            clean_raw("Uran\u{2013}Taloja", Dialect::NaturalGas),
            "Uran-Taloja"
        );
    }

    #[test]
    fn petroleum_keeps_dashes() {
        assert_eq!(
            clean_raw("Mundra \u{2013} Delhi", Dialect::Petroleum),
            "Mundra \u{2013} Delhi"
        );
    }

    #[test]
    fn tokenize_splits_on_spaces() {
        let tokens = tokenize("12 17.08 Paradip");
        assert_eq!(tokens, vec!["12", "17.08", "Paradip"]);
        assert!(tokenize("").is_empty());
    }

}
