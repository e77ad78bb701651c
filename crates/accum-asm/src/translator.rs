//! The translation passes.
//!
//! Pass 1 walks the cleaned source with a placement cursor, collecting the
//! label table and raw placements. Pass 2 resolves symbols and indirection
//! marks. Pass 3 encodes cells and prepends the bootstrap jump. The label
//! table and the placement tables live only for the duration of a
//! [`translate`] call.

use crate::AsmError;
use accum_isa::{Cell, Opcode};
use std::collections::{BTreeMap, HashMap};

/// The entry-point label every program must define.
const START_LABEL: &str = "_start";

/// A placement collected by pass 1, before symbol resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Placement {
    /// A data word with a known value.
    Datum(i64),
    /// A `.word` referring to a label, resolved in pass 2.
    Ref(String),
    /// An instruction line, operand still textual.
    Instr {
        mnemonic: String,
        operand: Option<String>,
    },
}

/// A placement after pass 2: all text resolved to addresses or integers.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Resolved {
    Datum(i64),
    Instr {
        mnemonic: String,
        operand: Option<i64>,
        is_indirect: bool,
    },
}

/// Translates assembly source text into an instruction image.
///
/// # Errors
///
/// Returns an [`AsmError`] for a missing or malformed `org`, a malformed or
/// oversized `.word`, an unresolved symbol, or a missing `_start`.
pub fn translate(source: &str) -> Result<Vec<Cell>, AsmError> {
    let lines = clean(source);
    let origin = find_org(&lines)?;
    let (labels, placements) = stage_1(&lines, origin)?;
    let resolved = stage_2(&labels, placements)?;
    stage_3(&labels, &resolved)
}

/// Strips `;` comments, trims, and drops lines left empty.
fn clean(source: &str) -> Vec<String> {
    source
        .lines()
        .filter_map(|line| {
            let code = match line.find(';') {
                Some(pos) => &line[..pos],
                None => line,
            };
            let code = code.trim();
            (!code.is_empty()).then(|| code.to_owned())
        })
        .collect()
}

/// Finds the first `org N` directive. Only the first one seeds the cursor.
fn find_org(lines: &[String]) -> Result<usize, AsmError> {
    for line in lines {
        let mut parts = line.split_whitespace();
        if parts.next() == Some("org") {
            return parts
                .next()
                .and_then(|arg| arg.parse().ok())
                .ok_or_else(|| AsmError::InvalidOrigin(line.clone()));
        }
    }
    Err(AsmError::MissingOrigin)
}

/// Splits a leading `label:` token off a line, if present.
fn split_label(line: &str) -> Option<(&str, &str)> {
    let (head, tail) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let name = head.strip_suffix(':')?;
    if name.is_empty() {
        return None;
    }
    Some((name, tail.trim_start()))
}

/// Pass 1: walk lines with a placement cursor, collecting labels and raw
/// placements.
///
/// A label shares its address with the placement that follows it;
/// consecutive label lines advance the cursor between them so that every
/// label keeps a distinct address. `org` lines after the first are skipped
/// without moving the cursor.
fn stage_1(
    lines: &[String],
    origin: usize,
) -> Result<(HashMap<String, usize>, BTreeMap<usize, Placement>), AsmError> {
    let mut labels = HashMap::new();
    let mut placements = BTreeMap::new();
    let mut cursor = origin;
    let mut pending_label = false;

    for line in lines {
        if line.split_whitespace().next() == Some("org") {
            pending_label = false;
            continue;
        }

        let mut rest = line.as_str();
        if let Some((name, tail)) = split_label(line) {
            if pending_label {
                cursor += 1;
            }
            labels.insert(name.to_owned(), cursor);
            pending_label = true;
            rest = tail;
            if rest.is_empty() {
                continue;
            }
        }

        if let Some(payload) = rest.strip_prefix(".word") {
            cursor = place_word(payload.trim(), cursor, &mut placements)?;
        } else {
            let mut parts = rest.split_whitespace();
            let mnemonic = parts.next().unwrap_or_default().to_owned();
            let operand = parts.next().map(str::to_owned);
            placements.insert(cursor, Placement::Instr { mnemonic, operand });
            cursor += 1;
        }
        pending_label = false;
    }

    Ok((labels, placements))
}

/// Places one `.word` payload: a pascal string, a signed integer, or a
/// symbol reference.
fn place_word(
    payload: &str,
    mut cursor: usize,
    placements: &mut BTreeMap<usize, Placement>,
) -> Result<usize, AsmError> {
    if payload.contains('\'') {
        // Pascal string: length cell, then one cell per character.
        let (size_text, rest) = payload
            .split_once(',')
            .ok_or_else(|| AsmError::MalformedWord(payload.to_owned()))?;
        let declared: usize = size_text
            .trim()
            .parse()
            .map_err(|_| AsmError::MalformedWord(payload.to_owned()))?;
        let text = rest.trim().trim_matches('\'');
        let actual = text.chars().count();
        if actual > declared {
            return Err(AsmError::StringOverflow { declared, actual });
        }
        placements.insert(cursor, Placement::Datum(declared as i64));
        cursor += 1;
        for ch in text.chars() {
            placements.insert(cursor, Placement::Datum(i64::from(u32::from(ch))));
            cursor += 1;
        }
    } else if payload.starts_with(|c: char| c.is_ascii_digit()) || payload.starts_with('-') {
        let value: i64 = payload
            .parse()
            .map_err(|_| AsmError::MalformedWord(payload.to_owned()))?;
        placements.insert(cursor, Placement::Datum(value));
        cursor += 1;
    } else if payload.is_empty() {
        return Err(AsmError::MalformedWord(payload.to_owned()));
    } else {
        placements.insert(cursor, Placement::Ref(payload.to_owned()));
        cursor += 1;
    }
    Ok(cursor)
}

/// Pass 2: replace label references with their addresses and strip
/// indirection parentheses into the `is_indirect` mark.
fn stage_2(
    labels: &HashMap<String, usize>,
    placements: BTreeMap<usize, Placement>,
) -> Result<BTreeMap<usize, Resolved>, AsmError> {
    placements
        .into_iter()
        .map(|(addr, placement)| {
            let resolved = match placement {
                Placement::Datum(value) => Resolved::Datum(value),
                Placement::Ref(name) => Resolved::Datum(resolve(labels, &name)?),
                Placement::Instr { mnemonic, operand } => match operand {
                    None => Resolved::Instr {
                        mnemonic,
                        operand: None,
                        is_indirect: false,
                    },
                    Some(text) => {
                        let (body, is_indirect) = match text.strip_prefix('(') {
                            Some(inner) => (
                                inner
                                    .strip_suffix(')')
                                    .ok_or_else(|| AsmError::MalformedOperand(text.clone()))?,
                                true,
                            ),
                            None => (text.as_str(), false),
                        };
                        Resolved::Instr {
                            mnemonic,
                            operand: Some(resolve(labels, body)?),
                            is_indirect,
                        }
                    }
                },
            };
            Ok((addr, resolved))
        })
        .collect()
}

/// Resolves operand text: a label address, or an integer literal.
fn resolve(labels: &HashMap<String, usize>, text: &str) -> Result<i64, AsmError> {
    if let Some(&addr) = labels.get(text) {
        return Ok(addr as i64);
    }
    text.parse()
        .map_err(|_| AsmError::UnresolvedSymbol(text.to_owned()))
}

/// Pass 3: encode cells, bootstrap jump first.
fn stage_3(
    labels: &HashMap<String, usize>,
    resolved: &BTreeMap<usize, Resolved>,
) -> Result<Vec<Cell>, AsmError> {
    let start = *labels.get(START_LABEL).ok_or(AsmError::MissingStart)?;
    let mut cells = vec![Cell {
        index: 0,
        opcode: Opcode::Jmp,
        value: start as i64,
        is_indirect: false,
    }];

    for (&addr, token) in resolved {
        cells.push(match token {
            Resolved::Datum(value) => Cell::data(addr, *value),
            Resolved::Instr {
                mnemonic,
                operand,
                is_indirect,
            } => {
                let opcode = Opcode::lookup(mnemonic).unwrap_or_else(|| {
                    log::warn!("unknown mnemonic `{mnemonic}` at address {addr}, demoting to NOP");
                    Opcode::Nop
                });
                Cell {
                    index: addr,
                    opcode,
                    value: operand.unwrap_or(0),
                    is_indirect: *is_indirect,
                }
            }
        });
    }

    Ok(cells)
}
