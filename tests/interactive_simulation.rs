// tests/interactive_simulation.rs
// Simulates an editor host driving the server over in-memory streams

use math_scratchpad::engine::{Scratchpad, Settings};
use math_scratchpad::server::ScratchpadServer;
use math_scratchpad::ExprEvaluator;
use serde_json::{json, Value};
use std::io::Cursor;

fn frame(body: &str) -> String {
    format!("Content-Length: {}\r\n\r\n{}", body.len(), body)
}

fn request(seq: u64, command: &str, arguments: Option<Value>) -> String {
    let mut msg = json!({ "seq": seq, "type": "request", "command": command });
    if let Some(arguments) = arguments {
        msg["arguments"] = arguments;
    }
    frame(&msg.to_string())
}

// Split the server's output back into JSON messages.
fn parse_frames(output: &[u8]) -> Vec<Value> {
    let text = String::from_utf8(output.to_vec()).expect("utf-8 output");
    let mut rest = text.as_str();
    let mut messages = Vec::new();

    while let Some(header_end) = rest.find("\r\n\r\n") {
        let length: usize = rest[..header_end]
            .trim_start_matches("Content-Length:")
            .trim()
            .parse()
            .expect("content length");
        let body_start = header_end + 4;
        let body = &rest[body_start..body_start + length];
        messages.push(serde_json::from_str(body).expect("json body"));
        rest = &rest[body_start + length..];
    }

    messages
}

fn run_session(input: String) -> Vec<Value> {
    let pad = Scratchpad::new(ExprEvaluator::new(), Settings::default());
    let mut server = ScratchpadServer::new(Cursor::new(input.into_bytes()), Vec::new(), pad);
    server.run().expect("session runs to completion");
    parse_frames(&server.into_writer())
}

fn margins(event: &Value) -> Vec<u64> {
    event["body"]["annotations"]
        .as_array()
        .expect("annotations array")
        .iter()
        .map(|a| a["margin"].as_u64().unwrap())
        .collect()
}

#[cfg(test)]
mod session_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_host_session() {
        let mut input = String::new();
        input.push_str(&frame("{not json"));
        input.push_str(&request(1, "initialize", None));
        input.push_str(&request(
            2,
            "didOpen",
            Some(json!({ "text": "r = 5\nr * 2 =\n# c\nhex(6699)" })),
        ));
        input.push_str(&request(3, "completion", Some(json!({ "line": 1, "character": 7 }))));
        input.push_str(&request(
            4,
            "didChangeConfiguration",
            Some(json!({ "settings": { "alignColumn": 20 }, "changed": ["mathScratchpad.alignColumn"] })),
        ));
        input.push_str(&request(
            5,
            "didChangeConfiguration",
            Some(json!({ "changed": ["editor.fontSize"] })),
        ));
        input.push_str(&request(6, "variables", None));
        input.push_str(&request(7, "bogus", None));
        input.push_str(&request(8, "completion", None));
        input.push_str(&request(9, "disconnect", None));
        input.push_str(&request(10, "recompute", None));

        let messages = run_session(input);
        assert_eq!(messages.len(), 12);

        // initialize
        assert_eq!(messages[0]["type"], "response");
        assert_eq!(messages[0]["request_seq"], 1);
        assert_eq!(messages[0]["body"]["completionTriggerCharacters"], json!(["="]));
        assert_eq!(messages[1]["event"], "initialized");

        // didOpen publishes a full annotation set
        assert_eq!(messages[2]["success"], true);
        assert_eq!(messages[3]["event"], "annotations");
        let annotations = &messages[3]["body"]["annotations"];
        assert_eq!(annotations.as_array().unwrap().len(), 3);
        assert_eq!(annotations[0]["line"], 0);
        assert_eq!(annotations[0]["text"], "\u{a0}\u{a0}\u{a0}\u{a0}5");
        assert_eq!(annotations[1]["text"], "\u{a0}\u{a0}\u{a0}10");
        assert_eq!(annotations[2]["line"], 3);
        assert_eq!(annotations[2]["text"], "1A 2B");
        assert_eq!(margins(&messages[3]), vec![75, 73, 71]);

        // completion
        assert_eq!(
            messages[4]["body"]["items"],
            json!([{
                "label": " 10",
                "insertText": " 10",
                "kind": "value",
                "detail": "Math Result",
                "documentation": "Evaluates to:  10"
            }])
        );

        // a recognised setting re-aligns everything
        assert_eq!(messages[5]["command"], "didChangeConfiguration");
        assert_eq!(messages[6]["event"], "annotations");
        assert_eq!(margins(&messages[6]), vec![15, 13, 11]);

        // an unrelated setting leaves the annotations alone
        assert_eq!(messages[7]["request_seq"], 5);
        assert_eq!(messages[7]["type"], "response");

        assert_eq!(
            messages[8]["body"]["variables"],
            json!([{ "name": "r", "value": "5" }])
        );

        assert_eq!(messages[9]["success"], false);
        assert_eq!(messages[9]["message"], "unknown command `bogus`");
        assert_eq!(messages[10]["success"], false);
        assert_eq!(messages[10]["message"], "`completion` requires arguments");

        assert_eq!(messages[11]["command"], "disconnect");
        assert_eq!(messages[11]["success"], true);
    }

    #[test]
    fn test_hiding_results_clears_annotations() {
        let mut input = String::new();
        input.push_str(&request(1, "didChange", Some(json!({ "text": "1 + 1\n2 * 3" }))));
        input.push_str(&request(
            2,
            "didChangeConfiguration",
            Some(json!({ "settings": { "mathScratchpad": { "showResults": false } } })),
        ));
        input.push_str(&request(3, "recompute", None));

        let messages = run_session(input);
        assert_eq!(messages.len(), 5);
        assert_eq!(margins(&messages[1]).len(), 2);
        assert_eq!(messages[3]["event"], "annotations");
        assert!(margins(&messages[3]).is_empty());
        assert_eq!(messages[4]["body"]["annotations"], json!([]));
    }

    #[test]
    fn test_switching_editor_replaces_document() {
        let mut input = String::new();
        input.push_str(&request(1, "didOpen", Some(json!({ "text": "a = 1" }))));
        input.push_str(&request(
            2,
            "didChangeActiveEditor",
            Some(json!({ "text": "# other\nb = 2\nb + 2 =" })),
        ));
        input.push_str(&request(3, "variables", Some(json!({ "line": 2 }))));
        input.push_str(&request(4, "didChange", Some(json!({ "txt": "oops" }))));

        let messages = run_session(input);
        assert_eq!(messages.len(), 6);
        let lines: Vec<u64> = messages[3]["body"]["annotations"]
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["line"].as_u64().unwrap())
            .collect();
        assert_eq!(lines, vec![1, 2]);
        assert_eq!(
            messages[4]["body"]["variables"],
            json!([{ "name": "b", "value": "2" }])
        );
        assert_eq!(messages[5]["success"], false);
    }
}
