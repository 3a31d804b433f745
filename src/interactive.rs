//! Terminal front end: lines typed at the prompt are appended to a scratch
//! buffer and echoed back with their annotation.

use crate::document::{Document, TextDocument};
use crate::engine::{render_line, render_plain, Scratchpad};
use crate::eval::Evaluator;
use std::io::{self, BufRead, Write};

const HELP: &str = "\
:set <key> <value>  change showResults, alignColumn, padding or precision
:show               print the whole buffer with annotations
:vars               list the variables defined so far
:clear              empty the buffer
:quit               leave";

enum Flow {
    Continue,
    Quit,
}

pub fn run_interactive<E, R, W>(pad: &mut Scratchpad<E>, input: R, output: &mut W) -> io::Result<()>
where
    E: Evaluator,
    R: BufRead,
    W: Write,
{
    let mut document = TextDocument::default();

    for line in input.lines() {
        let line = line?;

        if let Some(command) = line.trim_start().strip_prefix(':') {
            match run_command(pad, &mut document, command, output)? {
                Flow::Continue => continue,
                Flow::Quit => break,
            }
        }

        document.push_line(line);
        let index = document.line_count() - 1;
        let annotations = pad.recompute(&document);
        let annotation = annotations.iter().find(|a| a.line == index);
        writeln!(output, "{}", render_line(document.line(index), annotation))?;
    }

    output.flush()
}

fn run_command<E, W>(
    pad: &mut Scratchpad<E>,
    document: &mut TextDocument,
    command: &str,
    output: &mut W,
) -> io::Result<Flow>
where
    E: Evaluator,
    W: Write,
{
    let Some(words) = shlex::split(command) else {
        writeln!(output, "unbalanced quotes in `:{}`", command)?;
        return Ok(Flow::Continue);
    };

    match words.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["set", key, value] => {
            if let Err(err) = pad.settings_mut().set(key, value) {
                writeln!(output, "{}", err)?;
            }
        }
        ["show"] => {
            let annotations = pad.recompute(&*document);
            write!(output, "{}", render_plain(&*document, &annotations))?;
        }
        ["vars"] => {
            for variable in pad.variables(&*document, None) {
                writeln!(output, "{} = {}", variable.name, variable.value)?;
            }
        }
        ["clear"] => document.clear(),
        ["quit"] | ["q"] => return Ok(Flow::Quit),
        ["help"] => writeln!(output, "{}", HELP)?,
        _ => writeln!(output, "unknown command `:{}`, try :help", command)?,
    }
    Ok(Flow::Continue)
}
