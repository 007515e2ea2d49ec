use std::error::Error;
use std::io::Read;
use std::io::Write;

use log::debug;
use log::trace;
use regex::Captures;
use regex::Regex;
use streaming_iterator::StreamingIterator;
use thiserror::Error;

use dfamin_dfa::Dfa;
use dfamin_dfa::DfaBuilder;

use crate::line_iterator::LineIterator;

#[derive(Error, Debug)]
pub enum IOError {
    #[error("Invalid .dfa header {0}")]
    InvalidHeader(&'static str),

    #[error("Invalid state list on line {0}")]
    InvalidList(usize),

    #[error("Invalid transition on line {0}")]
    InvalidTransition(usize),

    #[error("The header declares {expected} {kind}, but the file contains {actual}")]
    CountMismatch {
        kind: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("The name {0:?} cannot be written since it contains a double quote")]
    InvalidName(String),
}

/// A state or symbol name, either double quoted or a bare identifier.
const TOKEN: &str = r#"(?:"([^"]*)"|([^\s,()"]+))"#;

/// Loads a deterministic automaton in the .dfa format from the given reader.
///
/// The format consists of a header:
///     `dfa (<initial>, <num_of_transitions>, <num_of_states>)`
///
/// Optional lines that declare the states, the alphabet and the accepting states:
///     `states (<state>, ...)`
///     `alphabet (<symbol>, ...)`
///     `accepting (<state>, ...)`
///
/// And one line for every transition:
///     `(<from>, "<symbol>", <to>)`
///
/// Names are either bare identifiers or double quoted strings. Empty lines and
/// lines starting with `#` are skipped. States that are not declared are the
/// initial state, the accepting states and the endpoints of transitions, in
/// that order, and the alphabet consists of the declared symbols followed by
/// the symbols that occur on transitions.
pub fn read_dfa(reader: impl Read) -> Result<Dfa, Box<dyn Error>> {
    let mut lines = LineIterator::new(reader);

    let header_regex = Regex::new(&format!(
        r#"^\s*dfa\s*\(\s*{TOKEN}\s*,\s*([0-9]+)\s*,\s*([0-9]+)\s*\)\s*$"#
    ))
    .expect("Regex compilation should not fail");

    let list_regex = Regex::new(r#"^\s*(states|alphabet|accepting)\s*\((.*)\)\s*$"#)
        .expect("Regex compilation should not fail");

    let list_contents_regex = Regex::new(&format!(r#"^\s*(?:{TOKEN}\s*(?:,\s*{TOKEN}\s*)*)?$"#))
        .expect("Regex compilation should not fail");

    let token_regex = Regex::new(TOKEN).expect("Regex compilation should not fail");

    let transition_regex = Regex::new(&format!(
        r#"^\s*\(\s*{TOKEN}\s*,\s*{TOKEN}\s*,\s*{TOKEN}\s*\)\s*$"#
    ))
    .expect("Regex compilation should not fail");

    // Skip the leading comments to find the header.
    let header = loop {
        let line = lines
            .next()
            .ok_or(IOError::InvalidHeader("The first line should be the header"))?;
        if !is_skipped(line) {
            break line.clone();
        }
    };

    let captures = header_regex.captures(&header).ok_or(IOError::InvalidHeader(
        "does not match dfa (<initial>, <num_of_transitions>, <num_of_states>)",
    ))?;
    let initial_state = token(&captures, 1).to_string();
    let num_of_transitions: usize = captures[3].parse()?;
    let num_of_states: usize = captures[4].parse()?;

    let mut declared_states: Vec<String> = Vec::new();
    let mut declared_symbols: Vec<String> = Vec::new();
    let mut accepting: Vec<String> = Vec::new();
    let mut transitions: Vec<(String, String, String)> = Vec::new();

    loop {
        lines.advance();
        let line_number = lines.line_number();
        let Some(line) = lines.get() else {
            break;
        };

        trace!("{}", line);
        if is_skipped(line) {
            continue;
        }

        if let Some(captures) = list_regex.captures(line) {
            let contents = captures.get(2).map_or("", |contents| contents.as_str());
            if !list_contents_regex.is_match(contents) {
                return Err(IOError::InvalidList(line_number).into());
            }

            let names = token_regex
                .captures_iter(contents)
                .map(|captures| token(&captures, 1).to_string());

            match &captures[1] {
                "states" => declared_states.extend(names),
                "alphabet" => declared_symbols.extend(names),
                _ => accepting.extend(names),
            }
            continue;
        }

        let captures = transition_regex
            .captures(line)
            .ok_or(IOError::InvalidTransition(line_number))?;

        let from = token(&captures, 1);
        let symbol = token(&captures, 3);
        let to = token(&captures, 5);

        trace!("Read transition {} --[{}]-> {}", from, symbol, to);
        transitions.push((from.to_string(), symbol.to_string(), to.to_string()));
    }

    if let Some(error) = lines.error() {
        return Err(error.into());
    }

    if transitions.len() != num_of_transitions {
        return Err(IOError::CountMismatch {
            kind: "transitions",
            expected: num_of_transitions,
            actual: transitions.len(),
        }
        .into());
    }

    let mut builder = DfaBuilder::new();
    for state in declared_states {
        builder.add_state(state);
    }
    for symbol in declared_symbols {
        builder.add_symbol(symbol);
    }

    builder.add_state(initial_state.clone());
    builder.set_initial(initial_state);
    for state in accepting {
        builder.add_state(state.clone());
        builder.add_accepting(state);
    }

    for (from, symbol, to) in transitions {
        builder.add_state(from.clone());
        builder.add_state(to.clone());
        builder.add_symbol(symbol.clone());
        builder.add_transition(from, symbol, to);
    }

    let dfa = builder.finish()?;
    if dfa.num_of_states() != num_of_states {
        return Err(IOError::CountMismatch {
            kind: "states",
            expected: num_of_states,
            actual: dfa.num_of_states(),
        }
        .into());
    }

    debug!("Read {dfa}");
    Ok(dfa)
}

/// Writes the automaton in the .dfa format, see [read_dfa].
///
/// All names are quoted, and the states and alphabet are always declared such
/// that reading the result yields the same automaton.
pub fn write_dfa(writer: &mut impl Write, dfa: &Dfa) -> Result<(), Box<dyn Error>> {
    writeln!(
        writer,
        "dfa ({}, {}, {})",
        quote(dfa.state_name(dfa.initial_state()))?,
        dfa.num_of_transitions(),
        dfa.num_of_states()
    )?;

    write_list(writer, "states", dfa.state_names().iter().map(|name| name.as_str()))?;
    write_list(writer, "alphabet", dfa.symbols().iter().map(|name| name.as_str()))?;
    write_list(
        writer,
        "accepting",
        dfa.iter_states()
            .filter(|state_index| dfa.is_accepting(*state_index))
            .map(|state_index| dfa.state_name(state_index)),
    )?;

    for state_index in dfa.iter_states() {
        for (symbol_index, to) in dfa.outgoing_transitions(state_index) {
            writeln!(
                writer,
                "({}, {}, {})",
                quote(dfa.state_name(state_index))?,
                quote(dfa.symbol_name(symbol_index))?,
                quote(dfa.state_name(to))?
            )?;
        }
    }

    writer.flush()?;
    Ok(())
}

/// Returns true iff the line is empty or a comment.
fn is_skipped(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Returns the token that starts at the given capture group, which is either
/// the quoted contents or the bare identifier in the next group.
fn token<'a>(captures: &Captures<'a>, group: usize) -> &'a str {
    captures
        .get(group)
        .or_else(|| captures.get(group + 1))
        .map_or("", |name| name.as_str())
}

fn quote(name: &str) -> Result<String, IOError> {
    if name.contains('"') {
        return Err(IOError::InvalidName(name.to_string()));
    }

    Ok(format!("\"{name}\""))
}

fn write_list<'a>(
    writer: &mut impl Write,
    keyword: &str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), Box<dyn Error>> {
    let quoted: Vec<String> = names.map(quote).collect::<Result<_, _>>()?;
    writeln!(writer, "{keyword} ({})", quoted.join(", "))?;
    Ok(())
}
