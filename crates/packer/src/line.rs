/// Marker opening a named sub-document inside an MPD file.
const SELF_DECLARATION_MARKER: &str = "0 FILE ";

/// Line type of a sub-file placement.
const PLACEMENT_MARKER: &str = "1";

/// A placement carries the line type, a colour, a position vector and
/// a 3x3 orientation matrix before the referenced name begins:
/// `1 <colour> x y z a b c d e f g h i <name...>`.
const PLACEMENT_NAME_FIELD: usize = 14;

/// Closed set of line kinds the walker distinguishes. Everything that
/// is not a self-declaration or a well-formed placement passes through
/// untouched, including under-length placement lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    SelfDeclaration { name: String },
    Placement { name: String },
    Other,
}

/// Strip leading spaces and tabs only; the rest of the line is kept
/// verbatim.
#[must_use]
pub fn strip_indent(line: &str) -> &str {
    line.trim_start_matches([' ', '\t'])
}

/// Classify an indent-stripped line.
#[must_use]
pub fn classify(line: &str) -> LineKind {
    if let Some(rest) = line.strip_prefix(SELF_DECLARATION_MARKER) {
        return LineKind::SelfDeclaration {
            name: rest.trim().to_string(),
        };
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.first() == Some(&PLACEMENT_MARKER) && fields.len() > PLACEMENT_NAME_FIELD {
        // Names may contain spaces; the trailing fields are rejoined.
        return LineKind::Placement {
            name: fields[PLACEMENT_NAME_FIELD..].join(" "),
        };
    }

    LineKind::Other
}
