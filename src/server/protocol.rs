use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::io::{BufRead, Write};

use super::ServerError;

/// One frame exchanged with the editor host.
///
/// `seq` increases per sender, `type` is `request`, `response` or `event`,
/// and the remaining fields depend on which [`MessageContent`] it carries:
/// a request names a scratchpad `command`, a response echoes it with
/// `request_seq`, and an event such as `annotations` carries a `body`.
#[derive(Debug, Serialize, Deserialize)]
pub struct Message {
    pub seq: u64,
    #[serde(rename = "type")]
    pub msg_type: String,
    #[serde(flatten)]
    pub content: MessageContent,
}

/// Untagged, so the variant is picked by which fields are present.
#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Request {
        command: String,
        arguments: Option<Value>,
    },
    Response {
        request_seq: u64,
        success: bool,
        command: String,
        message: Option<String>,
        body: Option<Value>,
    },
    Event {
        event: String,
        body: Option<Value>,
    },
}

/// Read one `Content-Length` framed message. `Ok(None)` at end of input.
pub fn read_message<R: BufRead>(reader: &mut R) -> Result<Option<Message>, ServerError> {
    let mut content_length: Option<usize> = None;
    let mut line = String::new();

    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let header = line.trim_end_matches(['\r', '\n']);
        if header.is_empty() {
            if content_length.is_some() {
                break;
            }
            continue;
        }
        if let Some(value) = header.strip_prefix("Content-Length:") {
            content_length = value.trim().parse().ok();
            if content_length.is_none() {
                return Err(ServerError::MissingContentLength);
            }
        }
    }

    let length = content_length.ok_or(ServerError::MissingContentLength)?;
    let mut buffer = vec![0u8; length];
    reader.read_exact(&mut buffer)?;
    Ok(Some(serde_json::from_slice(&buffer)?))
}

/// Write `msg` as `Content-Length: {len}\r\n\r\n{json}` and flush.
pub fn write_message<W: Write>(writer: &mut W, msg: &Message) -> Result<(), ServerError> {
    let json = serde_json::to_string(msg)?;
    write!(writer, "Content-Length: {}\r\n\r\n{}", json.len(), json)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_framed_requests() {
        let body = r#"{"seq":1,"type":"request","command":"recompute"}"#;
        let framed = format!(
            "Content-Length: {}\r\nContent-Type: application/json\r\n\r\n{}",
            body.len(),
            body
        );
        let mut reader = Cursor::new(framed.into_bytes());

        let msg = read_message(&mut reader).unwrap().unwrap();
        assert_eq!(msg.seq, 1);
        match msg.content {
            MessageContent::Request { command, arguments } => {
                assert_eq!(command, "recompute");
                assert!(arguments.is_none());
            }
            other => panic!("unexpected {:?}", other),
        }
        assert!(read_message(&mut reader).unwrap().is_none());
    }

    #[test]
    fn test_rejects_bad_frames() {
        let mut reader = Cursor::new(b"Content-Length: abc\r\n\r\n{}".to_vec());
        assert!(matches!(
            read_message(&mut reader),
            Err(ServerError::MissingContentLength)
        ));

        let mut reader = Cursor::new(b"Content-Length: 2\r\n\r\n{]".to_vec());
        assert!(matches!(read_message(&mut reader), Err(ServerError::Json(_))));
    }

    #[test]
    fn test_write_message_framing() {
        let msg = Message {
            seq: 3,
            msg_type: "event".to_string(),
            content: MessageContent::Event {
                event: "initialized".to_string(),
                body: None,
            },
        };
        let mut out = Vec::new();
        write_message(&mut out, &msg).unwrap();
        let text = String::from_utf8(out).unwrap();
        let (header, json) = text.split_once("\r\n\r\n").unwrap();
        assert_eq!(header, format!("Content-Length: {}", json.len()));
        assert!(json.contains(r#""event":"initialized""#));
    }
}
