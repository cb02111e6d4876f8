use super::anchor::Anchor;
use super::dialect::Dialect;
use super::{MissingPolicy, ParseError, PipelineRecord, MISSING};

/// Slice the token sequence into the nine record fields by fixed offsets
/// relative to the anchor.
///
/// Layout: serial number, unique identifier (a suffixed token run in the gas
/// dialect), pipeline name up to the anchor, the entity itself, then four
/// single-token fields, then everything left as the states field.
pub fn extract(
    tokens: &[String],
    anchor: Anchor,
    dialect: Dialect,
    policy: MissingPolicy,
) -> Result<PipelineRecord, ParseError> {
    if anchor.index == 0 {
        return Err(ParseError::MalformedRow { column: "serial number" });
    }
    let serial_no = tokens[0].clone();

    // Identifier scan runs over the leading tokens before any anchor math.
    let (unique_id, id_end) = match dialect.id_suffix() {
        Some(suffix) => {
            let run: Vec<&str> = tokens[1..]
                .iter()
                .take_while(|t| t.ends_with(suffix))
                .map(String::as_str)
                .collect();
            if run.is_empty() {
                match policy {
                    MissingPolicy::Placeholder => (MISSING.to_string(), 1),
                    MissingPolicy::Reject => {
                        return Err(ParseError::MalformedRow { column: "unique id" })
                    }
                }
            } else {
                let end = 1 + run.len();
                (run.join(" "), end)
            }
        }
        None => {
            if anchor.index < 2 {
                return Err(ParseError::MalformedRow { column: "unique id" });
            }
            (tokens[1].clone(), 2)
        }
    };

    if id_end > anchor.index {
        return Err(ParseError::MalformedRow { column: "unique id" });
    }

    // Name is whatever sits between the identifier and the anchor. A row can
    // legitimately have none.
    let name = tokens[id_end..anchor.index].join(" ");

    // The anchor-width invariant is structural: a truncated multi-word
    // entity fails under either policy.
    let entity_end = anchor.index + anchor.width;
    if entity_end > tokens.len() {
        return Err(ParseError::MalformedRow { column: "entity" });
    }
    let entity = tokens[anchor.index..entity_end].join(" ");

    let authorized_on = fixed_field(tokens, entity_end, "authorization date", policy)?;
    let mut authorized_length = fixed_field(tokens, entity_end + 1, "authorised length", policy)?;
    if dialect.strip_length_commas() {
        authorized_length = authorized_length.replace(',', "");
    }
    let authorized_capacity = fixed_field(tokens, entity_end + 2, "authorised capacity", policy)?;
    let operating_length = fixed_field(tokens, entity_end + 3, "operating length", policy)?;

    let rest = tokens.get(entity_end + 4..).unwrap_or(&[]);
    let jurisdictions = if rest.is_empty() {
        match policy {
            MissingPolicy::Placeholder => MISSING.to_string(),
            MissingPolicy::Reject => return Err(ParseError::MalformedRow { column: "states" }),
        }
    } else {
        rest.join(" ")
    };

    Ok(PipelineRecord {
        serial_no,
        unique_id,
        name,
        entity,
        authorized_on,
        authorized_length,
        authorized_capacity,
        operating_length,
        jurisdictions,
    })
}

fn fixed_field(
    tokens: &[String],
    idx: usize,
    column: &'static str,
    policy: MissingPolicy,
) -> Result<String, ParseError> {
    match tokens.get(idx) {
        Some(t) => Ok(t.clone()),
        None => match policy {
            MissingPolicy::Placeholder => Ok(MISSING.to_string()),
            MissingPolicy::Reject => Err(ParseError::MalformedRow { column }),
        },
    }
}
