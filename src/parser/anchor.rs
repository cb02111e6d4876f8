use super::dialect::Dialect;
use super::ParseError;

/// Position of the entity code in a token sequence, and how many tokens the
/// entity field consumes from there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Anchor {
    pub index: usize,
    pub width: usize,
}

/// Scan left to right for the first token matching the dialect's entity
/// table; first match wins. Every downstream field offset is relative to the
/// result, so failure here fails the whole row.
///
/// A token matched only by the other dialect's table, seen at or before our
/// own first match, means the row was fed to the wrong parser and is rejected
/// loudly rather than anchored at a garbage offset.
pub fn locate(tokens: &[String], dialect: Dialect) -> Result<Anchor, ParseError> {
    let own = first_match(tokens, dialect);
    let foreign = first_foreign(tokens, dialect);

    match (own, foreign) {
        (Some(anchor), Some(f)) if f < anchor.index => Err(ParseError::DialectMismatch {
            token: tokens[f].clone(),
            expected: dialect,
        }),
        (Some(anchor), _) => Ok(anchor),
        (None, Some(f)) => Err(ParseError::DialectMismatch {
            token: tokens[f].clone(),
            expected: dialect,
        }),
        (None, None) => Err(ParseError::NoEntityFound { dialect }),
    }
}

fn first_match(tokens: &[String], dialect: Dialect) -> Option<Anchor> {
    let re = dialect.entity_regex();
    tokens.iter().enumerate().find_map(|(index, token)| {
        let caps = re.captures(token)?;
        let trigger = caps.get(1)?.as_str();
        let width = dialect
            .entities()
            .iter()
            .find(|e| e.trigger == trigger)
            .map(|e| e.width)
            .unwrap_or(1);
        Some(Anchor { index, width })
    })
}

/// First token exactly equal to one of the other dialect's codes while ours
/// matches nothing. Exact equality only: the petroleum table's prefix mode
/// would flag ordinary name tokens here.
fn first_foreign(tokens: &[String], dialect: Dialect) -> Option<usize> {
    let own_re = dialect.entity_regex();
    let foreign_re = dialect.other().entity_exact_regex();
    tokens
        .iter()
        .position(|t| foreign_re.is_match(t) && !own_re.is_match(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(s: &str) -> Vec<String> {
        s.split(' ').map(String::from).collect()
    }

    #[test]
    fn single_token_entity() {
        let tokens = toks("12 17.08 Paradip Ranchi IOCL 17.08.2015");
        let a = locate(&tokens, Dialect::Petroleum).unwrap();
        assert_eq!(a, Anchor { index: 4, width: 1 });
    }

    #[test]
    fn oil_india_spans_three_tokens() {
        let tokens = toks("15 17.09 Numaligarh Siliguri Oil India Ltd. 01.11.2021 660");
        let a = locate(&tokens, Dialect::Petroleum).unwrap();
        assert_eq!(a, Anchor { index: 4, width: 3 });
    }

    #[test]
    fn petronet_spans_three_tokens() {
        let tokens = toks("3 4.01 Mangalore Hassan Petronet MHB Ltd. 02.02.2004 362");
        let a = locate(&tokens, Dialect::Petroleum).unwrap();
        assert_eq!(a, Anchor { index: 4, width: 3 });
    }

    #[test]
    fn first_match_wins() {
        let tokens = toks("1 2.01 Foo HPCL 01.01.2010 10 1 10 GAIL");
        let a = locate(&tokens, Dialect::Petroleum).unwrap();
        assert_eq!(a.index, 3);
    }

    #[test]
    fn gas_requires_exact_token() {
        // Prefix would bite on GAILTEL; the gas table must not.
        let tokens = toks("1 1.01.NGPL GAILTEL Network GAIL 01.01.2010");
        let a = locate(&tokens, Dialect::NaturalGas).unwrap();
        assert_eq!(a.index, 4);
    }

    #[test]
    fn no_entity_found() {
        let tokens = toks("12 17.08 Paradip Raipur Ranchi 17.08.2015 1108");
        let err = locate(&tokens, Dialect::Petroleum).unwrap_err();
        assert_eq!(err, ParseError::NoEntityFound { dialect: Dialect::Petroleum });
    }

    #[test]
    fn gas_code_rejected_by_petroleum_parser() {
        let tokens = toks("19 17.19.NGPL Uran-Taloja DFPCL 21.10.2014 42.00");
        let err = locate(&tokens, Dialect::Petroleum).unwrap_err();
        assert_eq!(
            err,
            ParseError::DialectMismatch { token: "DFPCL".into(), expected: Dialect::Petroleum }
        );
    }

    #[test]
    fn petroleum_code_rejected_by_gas_parser() {
        let tokens = toks("15 17.09 Numaligarh Siliguri Oil India Ltd. 01.11.2021");
        let err = locate(&tokens, Dialect::NaturalGas).unwrap_err();
        assert_eq!(
            err,
            ParseError::DialectMismatch { token: "Oil".into(), expected: Dialect::NaturalGas }
        );
    }

    #[test]
    fn shared_codes_anchor_in_both_dialects() {
        let tokens = toks("20 17.09.NGPL Chainsa-Jhajjar-Hissar GAIL 13.12.2010 455");
        assert!(locate(&tokens, Dialect::NaturalGas).is_ok());
        assert!(locate(&tokens, Dialect::Petroleum).is_ok());
    }
}
