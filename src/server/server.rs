use super::protocol::{read_message, write_message, Message, MessageContent};
use super::ServerError;
use crate::document::{Document, Position, TextDocument};
use crate::engine::{Scratchpad, Trigger, TRIGGER_CHARACTER};
use crate::eval::Evaluator;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::{BufRead, Write};

#[derive(Debug, Deserialize)]
struct TextArguments {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ConfigurationArguments {
    #[serde(default)]
    settings: Value,
    #[serde(default)]
    changed: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct VariablesArguments {
    line: Option<usize>,
}

/// One host connection: the latest document text plus the engine.
pub struct ScratchpadServer<R, W, E> {
    seq: u64,
    reader: R,
    writer: W,
    pad: Scratchpad<E>,
    document: TextDocument,
}

impl<R: BufRead, W: Write, E: Evaluator> ScratchpadServer<R, W, E> {
    pub fn new(reader: R, writer: W, pad: Scratchpad<E>) -> Self {
        Self {
            seq: 0,
            reader,
            writer,
            pad,
            document: TextDocument::default(),
        }
    }

    pub fn document(&self) -> &TextDocument {
        &self.document
    }

    pub fn scratchpad(&self) -> &Scratchpad<E> {
        &self.pad
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        message: Option<String>,
        body: Option<Value>,
    ) -> Result<(), ServerError> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success,
                command,
                message,
                body,
            },
        };
        write_message(&mut self.writer, &msg)
    }

    pub fn send_event(&mut self, event: &str, body: Option<Value>) -> Result<(), ServerError> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: MessageContent::Event {
                event: event.to_string(),
                body,
            },
        };
        write_message(&mut self.writer, &msg)
    }

    pub fn read_message(&mut self) -> Result<Option<Message>, ServerError> {
        read_message(&mut self.reader)
    }

    /// Serve requests until `disconnect`/`shutdown` or end of input.
    pub fn run(&mut self) -> Result<(), ServerError> {
        loop {
            let msg = match self.read_message() {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    log::info!("input closed");
                    return Ok(());
                }
                Err(ServerError::Io(err)) => return Err(err.into()),
                Err(err) => {
                    log::warn!("skipping message: {}", err);
                    continue;
                }
            };

            match msg.content {
                MessageContent::Request { command, arguments } => {
                    log::debug!("request #{}: {}", msg.seq, command);
                    if !self.dispatch(msg.seq, command, arguments)? {
                        return Ok(());
                    }
                }
                _ => log::debug!("ignoring non-request message #{}", msg.seq),
            }
        }
    }

    /// Handle one request; `false` once the host asked us to stop.
    fn dispatch(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<bool, ServerError> {
        let result = match command.as_str() {
            "initialize" => self.handle_initialize(seq, command.clone()),
            "didOpen" | "didChange" => {
                self.handle_document(seq, command.clone(), arguments, Trigger::DocumentChanged)
            }
            "didChangeActiveEditor" => self.handle_document(
                seq,
                command.clone(),
                arguments,
                Trigger::ActiveEditorChanged,
            ),
            "didChangeConfiguration" => {
                self.handle_configuration(seq, command.clone(), arguments)
            }
            "recompute" => self.handle_recompute(seq, command.clone()),
            "completion" => self.handle_completion(seq, command.clone(), arguments),
            "variables" => self.handle_variables(seq, command.clone(), arguments),
            "disconnect" | "shutdown" => {
                self.send_response(seq, command.clone(), true, None, None)?;
                return Ok(false);
            }
            _ => Err(ServerError::UnknownCommand(command.clone())),
        };

        match result {
            Ok(()) => {}
            Err(ServerError::Io(err)) => return Err(err.into()),
            Err(err) => {
                log::warn!("`{}` failed: {}", command, err);
                self.send_response(seq, command, false, Some(err.to_string()), None)?;
            }
        }
        Ok(true)
    }

    pub fn handle_initialize(&mut self, seq: u64, command: String) -> Result<(), ServerError> {
        let body = json!({
            "completionTriggerCharacters": [TRIGGER_CHARACTER.to_string()],
            "supportsAnnotations": true,
            "supportsVariables": true,
        });
        self.send_response(seq, command, true, None, Some(body))?;
        self.send_event("initialized", None)
    }

    pub fn handle_document(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
        trigger: Trigger,
    ) -> Result<(), ServerError> {
        let args: TextArguments = parse_arguments(&command, arguments)?;
        self.document = TextDocument::new(&args.text);
        log::debug!("document now has {} lines", self.document.line_count());

        self.send_response(seq, command, true, None, None)?;
        self.publish(&trigger)
    }

    pub fn handle_configuration(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<(), ServerError> {
        let args: ConfigurationArguments = parse_arguments(&command, arguments)?;
        let settings = self.pad.settings().merged(&args.settings)?;

        let changed = if args.changed.is_empty() {
            changed_keys(&args.settings)
        } else {
            args.changed
        };
        self.pad.set_settings(settings);

        self.send_response(seq, command, true, None, None)?;
        self.publish(&Trigger::ConfigurationChanged(changed))
    }

    pub fn handle_recompute(&mut self, seq: u64, command: String) -> Result<(), ServerError> {
        let annotations = self.pad.recompute(&self.document);
        self.send_response(
            seq,
            command,
            true,
            None,
            Some(json!({ "annotations": annotations })),
        )
    }

    pub fn handle_completion(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<(), ServerError> {
        let position: Position = parse_arguments(&command, arguments)?;
        let items: Vec<_> = self.pad.complete(&self.document, position).into_iter().collect();
        self.send_response(seq, command, true, None, Some(json!({ "items": items })))
    }

    pub fn handle_variables(
        &mut self,
        seq: u64,
        command: String,
        arguments: Option<Value>,
    ) -> Result<(), ServerError> {
        let args: VariablesArguments = match arguments {
            Some(_) => parse_arguments(&command, arguments)?,
            None => VariablesArguments::default(),
        };
        let variables = self.pad.variables(&self.document, args.line);
        self.send_response(
            seq,
            command,
            true,
            None,
            Some(json!({ "variables": variables })),
        )
    }

    /// Send a fresh annotation set when the trigger invalidates the old one.
    fn publish(&mut self, trigger: &Trigger) -> Result<(), ServerError> {
        match self.pad.handle(trigger, &self.document) {
            Some(annotations) => {
                log::debug!("{:?}: {} annotations", trigger, annotations.len());
                self.send_event("annotations", Some(json!({ "annotations": annotations })))
            }
            None => Ok(()),
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(
    command: &str,
    arguments: Option<Value>,
) -> Result<T, ServerError> {
    let arguments = arguments.ok_or_else(|| ServerError::MissingArguments(command.to_string()))?;
    serde_json::from_value(arguments).map_err(|source| ServerError::InvalidArguments {
        command: command.to_string(),
        source,
    })
}

/// Keys present in a settings patch, unwrapping a nested section.
fn changed_keys(settings: &Value) -> Vec<String> {
    let settings = settings
        .get(crate::engine::SETTINGS_SECTION)
        .unwrap_or(settings);
    settings
        .as_object()
        .map(|fields| fields.keys().cloned().collect())
        .unwrap_or_default()
}
