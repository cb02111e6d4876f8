use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

/// One row format. The two formats are structurally parallel but carry
/// different entity-code tables, identifier conventions, and column headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    Petroleum,
    NaturalGas,
}

/// A known entity code and the number of tokens it consumes. Multi-word
/// organizations ("Oil India Ltd.", "Petronet MHB Ltd.") are triggered by
/// their first word and span three tokens.
pub struct EntitySpec {
    pub trigger: &'static str,
    pub width: usize,
}

/// How a token is tested against the entity table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// Token starts with the trigger (petroleum tables).
    Prefix,
    /// Token equals the trigger exactly (gas tables).
    Exact,
}

const PETROLEUM_ENTITIES: &[EntitySpec] = &[
    EntitySpec { trigger: "IOCL", width: 1 },
    EntitySpec { trigger: "HPCL", width: 1 },
    EntitySpec { trigger: "BPCL", width: 1 },
    EntitySpec { trigger: "GAIL", width: 1 },
    EntitySpec { trigger: "Oil", width: 3 },
    EntitySpec { trigger: "APSEZ", width: 1 },
    EntitySpec { trigger: "Petronet", width: 3 },
];

const GAS_ENTITIES: &[EntitySpec] = &[
    EntitySpec { trigger: "GAIL", width: 1 },
    EntitySpec { trigger: "GSPL", width: 1 },
    EntitySpec { trigger: "PIL", width: 1 },
    EntitySpec { trigger: "GIGL", width: 1 },
    EntitySpec { trigger: "GITL", width: 1 },
    EntitySpec { trigger: "GGL", width: 1 },
    EntitySpec { trigger: "AGCL", width: 1 },
    EntitySpec { trigger: "IOCL", width: 1 },
    EntitySpec { trigger: "ONGC", width: 1 },
    EntitySpec { trigger: "RGPL", width: 1 },
    EntitySpec { trigger: "DFPCL", width: 1 },
];

const PETROLEUM_HEADERS: [&str; 9] = [
    "S.No",
    "Unique ID",
    "Pipeline",
    "Entity",
    "Date of Authorisation",
    "Authorised Length (km)",
    "Authorised Capacity (MMTPA)",
    "Operating length (km)",
    "Passing through states",
];

const GAS_HEADERS: [&str; 9] = [
    "Sl No.",
    "PL Unique ID",
    "Name of Natural Gas Pipelines",
    "Entity",
    "Date of Authorization",
    "Auth Length (KM)",
    "Auth Capacity(MMSCMD)",
    "Operating Length (KM)",
    "States from which Pipeline passes",
];

static PETROLEUM_RE: LazyLock<Regex> =
    LazyLock::new(|| entity_pattern(PETROLEUM_ENTITIES, Dialect::Petroleum.entity_match()));
static PETROLEUM_EXACT_RE: LazyLock<Regex> =
    LazyLock::new(|| entity_pattern(PETROLEUM_ENTITIES, MatchMode::Exact));
static GAS_RE: LazyLock<Regex> =
    LazyLock::new(|| entity_pattern(GAS_ENTITIES, Dialect::NaturalGas.entity_match()));

fn entity_pattern(entities: &[EntitySpec], mode: MatchMode) -> Regex {
    let alternation = entities
        .iter()
        .map(|e| regex::escape(e.trigger))
        .collect::<Vec<_>>()
        .join("|");
    let pattern = match mode {
        MatchMode::Prefix => format!("^({alternation})"),
        MatchMode::Exact => format!("^({alternation})$"),
    };
    Regex::new(&pattern).unwrap()
}

impl Dialect {
    /// Column headers, in declared output order.
    pub fn headers(self) -> &'static [&'static str; 9] {
        match self {
            Dialect::Petroleum => &PETROLEUM_HEADERS,
            Dialect::NaturalGas => &GAS_HEADERS,
        }
    }

    /// The closed entity-code table. New operator codes are a data change.
    pub fn entities(self) -> &'static [EntitySpec] {
        match self {
            Dialect::Petroleum => PETROLEUM_ENTITIES,
            Dialect::NaturalGas => GAS_ENTITIES,
        }
    }

    pub fn entity_match(self) -> MatchMode {
        match self {
            Dialect::Petroleum => MatchMode::Prefix,
            Dialect::NaturalGas => MatchMode::Exact,
        }
    }

    /// Compiled alternation over the entity table, anchored per match mode.
    pub fn entity_regex(self) -> &'static Regex {
        match self {
            Dialect::Petroleum => &PETROLEUM_RE,
            Dialect::NaturalGas => &GAS_RE,
        }
    }

    /// Exact-equality alternation over the entity triggers, independent of
    /// the dialect's own match mode. Used to spot this dialect's codes in
    /// rows being parsed under the other dialect.
    pub fn entity_exact_regex(self) -> &'static Regex {
        match self {
            Dialect::Petroleum => &PETROLEUM_EXACT_RE,
            Dialect::NaturalGas => &GAS_RE,
        }
    }

    /// Marker appended to every token of a gas unique identifier.
    pub fn id_suffix(self) -> Option<&'static str> {
        match self {
            Dialect::Petroleum => None,
            Dialect::NaturalGas => Some(".NGPL"),
        }
    }

    /// Gas tables write authorised lengths with thousand separators.
    pub fn strip_length_commas(self) -> bool {
        matches!(self, Dialect::NaturalGas)
    }

    /// Gas tables mix em/en dashes into pipeline names.
    pub fn standardize_dashes(self) -> bool {
        matches!(self, Dialect::NaturalGas)
    }

    /// Default destination sheet.
    pub fn sheet(self) -> &'static str {
        match self {
            Dialect::Petroleum => "petroleum_pipelines",
            Dialect::NaturalGas => "gas_pipelines",
        }
    }

    pub fn other(self) -> Dialect {
        match self {
            Dialect::Petroleum => Dialect::NaturalGas,
            Dialect::NaturalGas => Dialect::Petroleum,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dialect::Petroleum => write!(f, "petroleum"),
            Dialect::NaturalGas => write!(f, "gas"),
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "petroleum" | "oil" => Ok(Dialect::Petroleum),
            "gas" | "natural-gas" | "ngpl" => Ok(Dialect::NaturalGas),
            other => Err(format!("unknown dialect '{other}' (expected petroleum or gas)")),
        }
    }
}
