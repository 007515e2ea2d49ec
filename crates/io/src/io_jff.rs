use std::error::Error;
use std::io::BufReader;
use std::io::Read;
use std::io::Write;

use log::debug;
use log::trace;
use quick_xml::events::BytesDecl;
use quick_xml::events::BytesEnd;
use quick_xml::events::BytesStart;
use quick_xml::events::BytesText;
use quick_xml::events::Event;
use quick_xml::Reader;
use quick_xml::Writer;
use thiserror::Error;

use dfamin_dfa::Dfa;
use dfamin_dfa::DfaBuilder;

#[derive(Error, Debug)]
pub enum JffError {
    #[error("Invalid .jff file: {0}")]
    InvalidStructure(String),

    #[error("The .jff file contains a {0:?} automaton instead of a finite automaton")]
    UnsupportedType(String),

    #[error("The transition from {0} to {1} has no symbol")]
    EmptyTransition(String, String),
}

/// Loads a deterministic automaton from a JFLAP file.
///
/// The file has the layout:
///     `<structure><type>fa</type><automaton>...</automaton></structure>`
///
/// Where the automaton contains the states and transitions:
///     `<state id="0" name="q0"><initial/><final/></state>`
///     `<transition><from>0</from><to>1</to><read>a</read></transition>`
///
/// States are identified by their id, which becomes the name of the state.
/// The alphabet consists of the symbols that occur on transitions. The layout
/// information of JFLAP (coordinates, labels) is ignored.
pub fn read_jff(reader: impl Read) -> Result<Dfa, Box<dyn Error>> {
    let mut reader = Reader::from_reader(BufReader::new(reader));
    reader.config_mut().trim_text(true);

    let mut parser = JffParser::default();
    let mut buffer = Vec::new();

    loop {
        match reader.read_event_into(&mut buffer)? {
            Event::Start(element) => {
                let name = element_name(&element)?;
                parser.open(&name, &element)?;
                parser.path.push(name);
            }
            Event::Empty(element) => {
                let name = element_name(&element)?;
                parser.open(&name, &element)?;
                parser.close(&name)?;
            }
            Event::End(_) => {
                if let Some(name) = parser.path.pop() {
                    parser.close(&name)?;
                }
            }
            Event::Text(text) => parser.text(&text.unescape()?),
            Event::Eof => break,
            _ => {}
        }

        buffer.clear();
    }

    match parser.automaton_type.as_deref() {
        Some("fa") | None => {}
        Some(other) => return Err(JffError::UnsupportedType(other.to_string()).into()),
    }

    let dfa = parser.builder.finish()?;
    debug!("Read {dfa}");
    Ok(dfa)
}

/// Writes the automaton as a JFLAP finite automaton, see [read_jff].
///
/// The state names are used as ids, and states are labelled q0, q1, ... in
/// the order of their index.
pub fn write_jff(writer: &mut impl Write, dfa: &Dfa) -> Result<(), Box<dyn Error>> {
    let mut xml = Writer::new_with_indent(&mut *writer, b'\t', 1);

    xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
    xml.write_event(Event::Start(BytesStart::new("structure")))?;
    write_text_element(&mut xml, "type", "fa")?;
    xml.write_event(Event::Start(BytesStart::new("automaton")))?;

    for state_index in dfa.iter_states() {
        let label = format!("q{state_index}");
        let element = BytesStart::new("state")
            .with_attributes([("id", dfa.state_name(state_index)), ("name", label.as_str())]);

        xml.write_event(Event::Start(element))?;
        write_text_element(&mut xml, "x", "0")?;
        write_text_element(&mut xml, "y", "0")?;
        if state_index == dfa.initial_state() {
            xml.write_event(Event::Empty(BytesStart::new("initial")))?;
        }
        if dfa.is_accepting(state_index) {
            xml.write_event(Event::Empty(BytesStart::new("final")))?;
        }
        xml.write_event(Event::End(BytesEnd::new("state")))?;
    }

    for state_index in dfa.iter_states() {
        for (symbol_index, to) in dfa.outgoing_transitions(state_index) {
            xml.write_event(Event::Start(BytesStart::new("transition")))?;
            write_text_element(&mut xml, "from", dfa.state_name(state_index))?;
            write_text_element(&mut xml, "to", dfa.state_name(to))?;
            write_text_element(&mut xml, "read", dfa.symbol_name(symbol_index))?;
            xml.write_event(Event::End(BytesEnd::new("transition")))?;
        }
    }

    xml.write_event(Event::End(BytesEnd::new("automaton")))?;
    xml.write_event(Event::End(BytesEnd::new("structure")))?;

    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// The state of reading a JFLAP document, driven by the events of the reader.
#[derive(Default)]
struct JffParser {
    builder: DfaBuilder,

    /// The names of the currently open elements.
    path: Vec<String>,

    automaton_type: Option<String>,
    initial_state: Option<String>,

    /// The id of the state element that is currently open.
    state: Option<String>,

    /// The from, to and read values of the transition element that is currently open.
    transition: Option<[Option<String>; 3]>,
}

impl JffParser {
    /// Returns true iff the innermost open element has the given name.
    fn inside(&self, name: &str) -> bool {
        self.path.last().is_some_and(|last| last == name)
    }

    fn open(&mut self, name: &str, element: &BytesStart) -> Result<(), Box<dyn Error>> {
        match name {
            "state" if self.inside("automaton") => {
                let id = element
                    .try_get_attribute("id")?
                    .ok_or_else(|| JffError::InvalidStructure("a state has no id".into()))?
                    .unescape_value()?
                    .into_owned();

                trace!("Read state {id}");
                self.builder.add_state(id.clone());
                self.state = Some(id);
            }
            "initial" if self.inside("state") => {
                if let Some(id) = &self.state {
                    if self.initial_state.as_ref().is_some_and(|initial| initial != id) {
                        let message = "there are multiple initial states".into();
                        return Err(JffError::InvalidStructure(message).into());
                    }

                    self.builder.set_initial(id.clone());
                    self.initial_state = Some(id.clone());
                }
            }
            "final" if self.inside("state") => {
                if let Some(id) = &self.state {
                    self.builder.add_accepting(id.clone());
                }
            }
            "transition" if self.inside("automaton") => {
                self.transition = Some([None, None, None]);
            }
            _ => {}
        }

        Ok(())
    }

    fn close(&mut self, name: &str) -> Result<(), Box<dyn Error>> {
        match name {
            "state" => self.state = None,
            "transition" => {
                if let Some([from, to, read]) = self.transition.take() {
                    let missing = || {
                        JffError::InvalidStructure("a transition has no from or to state".into())
                    };
                    let from = from.ok_or_else(missing)?;
                    let to = to.ok_or_else(missing)?;
                    let symbol = read
                        .ok_or_else(|| JffError::EmptyTransition(from.clone(), to.clone()))?;

                    trace!("Read transition {} --[{}]-> {}", from, symbol, to);
                    self.builder.add_symbol(symbol.clone());
                    self.builder.add_transition(from, symbol, to);
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn text(&mut self, text: &str) {
        let parent = self.path.len().checked_sub(2).map(|index| self.path[index].as_str());

        match (parent, self.path.last().map(|last| last.as_str())) {
            (Some("structure"), Some("type")) => self.automaton_type = Some(text.to_string()),
            (Some("transition"), Some(field)) => {
                let index = match field {
                    "from" => 0,
                    "to" => 1,
                    "read" => 2,
                    _ => return,
                };

                if let Some(transition) = &mut self.transition {
                    transition[index] = Some(text.to_string());
                }
            }
            _ => {}
        }
    }
}

/// Returns the name of the element as a string.
fn element_name(element: &BytesStart) -> Result<String, Box<dyn Error>> {
    Ok(std::str::from_utf8(element.name().as_ref())?.to_string())
}

/// Writes `<name>text</name>`.
fn write_text_element<W: Write>(
    xml: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    xml.write_event(Event::Start(BytesStart::new(name)))?;
    xml.write_event(Event::Text(BytesText::new(text)))?;
    xml.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use dfamin_dfa::random_dfa;
    use test_log::test;

    use super::*;

    #[test]
    fn test_reading_jff() {
        let file = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
        <!--Created with JFLAP 7.1.-->
        <structure>
            <type>fa</type>
            <automaton>
                <!--The list of states.-->
                <state id="0" name="q0"><x>62.0</x><y>120.0</y><initial/></state>
                <state id="1" name="q1"><x>180.0</x><y>120.0</y><final/></state>
                <!--The list of transitions.-->
                <transition><from>0</from><to>1</to><read>a</read></transition>
                <transition><from>1</from><to>0</to><read>b</read></transition>
                <transition><from>1</from><to>1</to><read>a</read></transition>
            </automaton>
        </structure>"#;

        let dfa = read_jff(file.as_bytes()).unwrap();

        assert_eq!(dfa.state_names(), ["0", "1"]);
        assert_eq!(dfa.symbols(), ["a", "b"]);
        assert_eq!(dfa.state_name(dfa.initial_state()), "0");
        assert!(dfa.is_accepting(1));
        assert_eq!(dfa.num_of_transitions(), 3);
        assert!(dfa.accepts([0, 0, 1, 0]));
        assert!(!dfa.accepts([0, 1]));
    }

    #[test]
    fn test_invalid_jff() {
        let turing = "<structure><type>turing</type><automaton>\
            <state id=\"0\"><initial/></state>\
            <transition><from>0</from><to>0</to><read>a</read></transition>\
            </automaton></structure>";
        assert!(read_jff(turing.as_bytes()).is_err(), "Not a finite automaton");

        let empty = "<structure><type>fa</type><automaton>\
            <state id=\"0\"><initial/></state>\
            <transition><from>0</from><to>0</to><read/></transition>\
            </automaton></structure>";
        assert!(read_jff(empty.as_bytes()).is_err(), "Empty transition");

        let no_initial = "<structure><type>fa</type><automaton>\
            <state id=\"0\"/>\
            <transition><from>0</from><to>0</to><read>a</read></transition>\
            </automaton></structure>";
        assert!(read_jff(no_initial.as_bytes()).is_err(), "No initial state");

        let dangling = "<structure><type>fa</type><automaton>\
            <state id=\"0\"><initial/></state>\
            <transition><from>0</from><to>7</to><read>a</read></transition>\
            </automaton></structure>";
        assert!(read_jff(dangling.as_bytes()).is_err(), "Unknown target state");

        assert!(read_jff("<structure><automaton>".as_bytes()).is_err(), "Unclosed elements");
    }

    #[test]
    fn test_writing_jff() {
        let dfa = random_dfa(8, 2);

        let mut buffer: Vec<u8> = Vec::new();
        write_jff(&mut buffer, &dfa).unwrap();

        let result = read_jff(&buffer[..]).unwrap();
        assert_eq!(result.state_names(), dfa.state_names());
        assert_eq!(result.state_name(result.initial_state()), dfa.state_name(dfa.initial_state()));
        assert_eq!(result.num_of_transitions(), dfa.num_of_transitions());
        for state_index in dfa.iter_states() {
            assert_eq!(result.is_accepting(state_index), dfa.is_accepting(state_index));
        }
    }

    #[test]
    fn test_escaped_names() {
        let dfa = Dfa::new(
            0,
            vec!["<a & b>".into(), "\"c\"".into()],
            vec!["x<y".into()],
            vec![Some(1), Some(0)],
            vec![false, true],
        );

        let mut buffer: Vec<u8> = Vec::new();
        write_jff(&mut buffer, &dfa).unwrap();

        assert_eq!(read_jff(&buffer[..]).unwrap(), dfa);
    }
}
